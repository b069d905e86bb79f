//! no2bootloader command relay
//!
//! [`Bootloader`] owns a [`ControlTransport`] and turns it into an
//! [`SpiMaster`]: every SPI command becomes one execute transfer followed by
//! one result transfer. The type is neither `Clone` nor `Copy`, and every
//! operation takes `&mut self`, so two callers can never interleave
//! commands on the same device.

mod protocol;
mod transport;

pub use protocol::*;
pub use transport::ControlTransport;

use crate::error::{Error, Result};
use crate::programmer::{execute_with_vec, SpiMaster};
use crate::spi::{SpiCommand, ADDRESS_LEN};

/// A connected no2bootloader
pub struct Bootloader<T: ControlTransport> {
    transport: T,
    version: ProtocolVersion,
}

impl<T: ControlTransport> Bootloader<T> {
    /// Take ownership of a transport and validate the protocol version
    ///
    /// Fails with [`Error::UnsupportedVersion`] unless the device reports
    /// exactly 1.0. No SPI command is issued before the check passes.
    pub fn new(mut transport: T) -> Result<Self> {
        let version = query_version(&mut transport)?;
        if version != SUPPORTED_VERSION {
            log::error!("Bootloader reports protocol version {}", version);
            return Err(Error::UnsupportedVersion {
                major: version.major,
                minor: version.minor,
            });
        }

        log::info!("no2bootloader protocol version {}", version);

        Ok(Self { transport, version })
    }

    /// Protocol version read when the bootloader was opened
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Query the protocol version from the device
    ///
    /// Returns the two response bytes verbatim, without validation.
    pub fn get_version(&mut self) -> Result<ProtocolVersion> {
        query_version(&mut self.transport)
    }

    /// Run a raw SPI command through the bootloader
    ///
    /// `command` is clocked out followed by `extra` zero bytes, then the
    /// latched result is read back. The bytes echoed during `command` are
    /// dropped and exactly `extra` response bytes are returned.
    pub fn execute_command(&mut self, command: &[u8], extra: usize) -> Result<Vec<u8>> {
        let total = command
            .len()
            .checked_add(extra)
            .filter(|&total| total <= MAX_TRANSFER_LEN)
            .ok_or(Error::TransferTooLarge {
                len: command.len().saturating_add(extra),
            })?;

        let mut buf = Vec::with_capacity(total);
        buf.extend_from_slice(command);
        buf.resize(total, 0);

        log::trace!("SPI execute: {:02X?}", buf);
        self.transport.control_out(REQ_SPI_EXECUTE, 0, 0, &buf)?;

        let mut result = self
            .transport
            .control_in(REQ_SPI_RESULT, 0, 0, total as u16)?;
        log::trace!("SPI result: {:02X?}", result);

        if result.len() < total {
            return Err(Error::ShortResponse {
                expected: total,
                actual: result.len(),
            });
        }

        result.truncate(total);
        Ok(result.split_off(command.len()))
    }

    /// Get a reference to the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

}

fn query_version<T: ControlTransport + ?Sized>(transport: &mut T) -> Result<ProtocolVersion> {
    let data = transport.control_in(REQ_GET_VERSION, 0, 0, VERSION_LEN)?;
    if data.len() < VERSION_LEN as usize {
        return Err(Error::ShortResponse {
            expected: VERSION_LEN as usize,
            actual: data.len(),
        });
    }

    Ok(ProtocolVersion::new(data[0], data[1]))
}

impl<T: ControlTransport> SpiMaster for Bootloader<T> {
    fn max_read_len(&self) -> usize {
        MAX_TRANSFER_LEN - 1 - ADDRESS_LEN
    }

    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()> {
        log::debug!(
            "SPI cmd 0x{:02X} addr {:?} write {} read {}",
            cmd.opcode,
            cmd.address,
            cmd.write_data.len(),
            cmd.read_buf.len()
        );
        execute_with_vec(cmd, |bytes, read_len| self.execute_command(bytes, read_len))
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(us as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Transfer {
        In { request: u8, length: u16 },
        Out { request: u8, data: Vec<u8> },
    }

    /// Records every transfer and answers IN requests from a script
    struct RecordingTransport {
        transfers: Vec<Transfer>,
        responses: VecDeque<Vec<u8>>,
        fail_out: bool,
    }

    impl RecordingTransport {
        fn new(responses: &[&[u8]]) -> Self {
            Self {
                transfers: Vec::new(),
                responses: responses.iter().map(|r| r.to_vec()).collect(),
                fail_out: false,
            }
        }
    }

    impl ControlTransport for RecordingTransport {
        fn control_in(
            &mut self,
            request: u8,
            value: u16,
            index: u16,
            length: u16,
        ) -> Result<Vec<u8>> {
            assert_eq!((value, index), (0, 0));
            self.transfers.push(Transfer::In { request, length });
            self.responses
                .pop_front()
                .ok_or_else(|| Error::Transport("stall".into()))
        }

        fn control_out(&mut self, request: u8, value: u16, index: u16, data: &[u8]) -> Result<()> {
            assert_eq!((value, index), (0, 0));
            self.transfers.push(Transfer::Out {
                request,
                data: data.to_vec(),
            });
            if self.fail_out {
                return Err(Error::Transport("device detached".into()));
            }
            Ok(())
        }
    }

    fn open(responses: &[&[u8]]) -> Bootloader<RecordingTransport> {
        let mut all: Vec<&[u8]> = vec![&[1, 0]];
        all.extend_from_slice(responses);
        let mut bl = Bootloader::new(RecordingTransport::new(&all)).unwrap();
        bl.transport_mut().transfers.clear();
        bl
    }

    #[test]
    fn test_version_query() {
        let bl = Bootloader::new(RecordingTransport::new(&[&[1, 0]])).unwrap();
        assert_eq!(bl.version(), ProtocolVersion::new(1, 0));
        assert_eq!(
            bl.transport().transfers,
            vec![Transfer::In {
                request: REQ_GET_VERSION,
                length: 2
            }]
        );
    }

    #[test]
    fn test_unsupported_version() {
        let result = Bootloader::new(RecordingTransport::new(&[&[2, 0]]));
        assert_eq!(
            result.err(),
            Some(Error::UnsupportedVersion { major: 2, minor: 0 })
        );

        let result = Bootloader::new(RecordingTransport::new(&[&[1, 1]]));
        assert!(matches!(result, Err(Error::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_get_version_is_not_validated() {
        let mut bl = open(&[&[7, 3]]);
        assert_eq!(bl.get_version().unwrap(), ProtocolVersion::new(7, 3));
    }

    #[test]
    fn test_execute_command_framing() {
        let mut bl = open(&[&[0xEE, 0xEE, 0xEE, 0xEE, 0x11, 0x22, 0x33]]);
        let result = bl.execute_command(&[0x03, 0x00, 0x10, 0x00], 3).unwrap();

        assert_eq!(result, vec![0x11, 0x22, 0x33]);
        assert_eq!(
            bl.transport().transfers,
            vec![
                Transfer::Out {
                    request: REQ_SPI_EXECUTE,
                    data: vec![0x03, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00],
                },
                Transfer::In {
                    request: REQ_SPI_RESULT,
                    length: 7
                },
            ]
        );
    }

    #[test]
    fn test_execute_command_without_response() {
        let mut bl = open(&[&[0x06]]);
        let result = bl.execute_command(&[0x06], 0).unwrap();
        assert!(result.is_empty());
        assert_eq!(bl.transport().transfers.len(), 2);
    }

    #[test]
    fn test_execute_command_short_result() {
        let mut bl = open(&[&[0x05]]);
        assert_eq!(
            bl.execute_command(&[0x05], 1),
            Err(Error::ShortResponse {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_execute_command_transport_error() {
        let mut bl = open(&[]);
        bl.transport_mut().fail_out = true;
        assert!(matches!(
            bl.execute_command(&[0x06], 0),
            Err(Error::Transport(_))
        ));
        // The result transfer is never issued after a failed execute
        assert_eq!(bl.transport().transfers.len(), 1);
    }

    #[test]
    fn test_execute_command_too_large() {
        let mut bl = open(&[]);
        assert_eq!(
            bl.execute_command(&[0x03, 0, 0, 0], MAX_TRANSFER_LEN),
            Err(Error::TransferTooLarge {
                len: MAX_TRANSFER_LEN + 4
            })
        );
        assert!(bl.transport().transfers.is_empty());
    }

    #[test]
    fn test_execute_command_length_overflow() {
        let mut bl = open(&[]);
        assert_eq!(
            bl.execute_command(&[0x03, 0, 0, 0], usize::MAX),
            Err(Error::TransferTooLarge { len: usize::MAX })
        );
        assert!(bl.transport().transfers.is_empty());
    }

    #[test]
    fn test_is_busy_status_bytes() {
        for (status, busy) in [(0x00, false), (0x01, true), (0x02, false), (0xFF, true)] {
            let mut bl = open(&[&[0x05, status]]);
            assert_eq!(protocol::is_busy(&mut bl).unwrap(), busy, "status {:#04x}", status);
        }
    }
}
