//! Programmer trait definitions

use crate::error::{Error, Result};
use crate::spi::SpiCommand;

/// SPI Master trait
///
/// This trait represents anything that can clock a single SPI command
/// through to the flash chip and hand back the bytes it returned. All calls
/// are blocking.
pub trait SpiMaster {
    /// Get the maximum number of bytes that can be read in a single transaction
    fn max_read_len(&self) -> usize;

    /// Execute a single SPI command
    ///
    /// The command contains all the information needed for the transaction:
    /// - `opcode`: The SPI command opcode
    /// - `address`: Optional 24-bit address
    /// - `write_data`: Data to write after the header
    /// - `read_buf`: Buffer to read data into
    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()>;

    /// Delay for the specified number of microseconds
    fn delay_us(&mut self, us: u32);
}

impl<M: SpiMaster + ?Sized> SpiMaster for &mut M {
    fn max_read_len(&self) -> usize {
        (**self).max_read_len()
    }

    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()> {
        (**self).execute(cmd)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

/// Helper function for implementing `SpiMaster::execute()` when the
/// underlying transfer returns the response as a `Vec<u8>`.
///
/// The closure receives the encoded command bytes (opcode, address, write
/// data) and the number of response bytes wanted; its result is copied into
/// the command's read buffer.
///
/// # Example
///
/// ```ignore
/// fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()> {
///     execute_with_vec(cmd, |bytes, read_len| self.execute_command(bytes, read_len))
/// }
/// ```
pub fn execute_with_vec<F>(cmd: &mut SpiCommand<'_>, transfer_fn: F) -> Result<()>
where
    F: FnOnce(&[u8], usize) -> Result<Vec<u8>>,
{
    let write_data = cmd.command_bytes();
    let read_len = cmd.read_buf.len();

    let result = transfer_fn(&write_data, read_len)?;
    if result.len() < read_len {
        return Err(Error::ShortResponse {
            expected: read_len,
            actual: result.len(),
        });
    }
    cmd.read_buf.copy_from_slice(&result[..read_len]);

    Ok(())
}
