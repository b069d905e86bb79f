//! SPI command structure

/// Number of address bytes sent after the opcode (24-bit, big-endian)
pub const ADDRESS_LEN: usize = 3;

/// A single SPI transaction
///
/// The lifetime parameter `'a` ties the command to the buffers it references.
/// On the wire a command is the opcode, an optional 3-byte big-endian
/// address, then `write_data`; `read_buf` is filled with whatever the chip
/// clocks out after those bytes.
pub struct SpiCommand<'a> {
    /// The opcode byte
    pub opcode: u8,

    /// 24-bit address (if any)
    pub address: Option<u32>,

    /// Data to write after opcode/address
    pub write_data: &'a [u8],

    /// Buffer to read into (mutable)
    pub read_buf: &'a mut [u8],
}

impl<'a> SpiCommand<'a> {
    /// Create a simple command with no address or data (e.g., WREN)
    pub fn simple(opcode: u8) -> Self {
        Self {
            opcode,
            address: None,
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Create a read register command with no address (e.g., RDSR)
    pub fn read_reg(opcode: u8, buf: &'a mut [u8]) -> Self {
        Self {
            opcode,
            address: None,
            write_data: &[],
            read_buf: buf,
        }
    }

    /// Create a read command with 3-byte address (e.g., READ)
    pub fn read_3b(opcode: u8, addr: u32, buf: &'a mut [u8]) -> Self {
        Self {
            opcode,
            address: Some(addr),
            write_data: &[],
            read_buf: buf,
        }
    }

    /// Create a write command with 3-byte address (e.g., PP)
    pub fn write_3b(opcode: u8, addr: u32, data: &'a [u8]) -> Self {
        Self {
            opcode,
            address: Some(addr),
            write_data: data,
            read_buf: &mut [],
        }
    }

    /// Create an erase command with 3-byte address
    pub fn erase_3b(opcode: u8, addr: u32) -> Self {
        Self {
            opcode,
            address: Some(addr),
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Length of opcode plus address bytes
    pub fn header_len(&self) -> usize {
        1 + if self.address.is_some() { ADDRESS_LEN } else { 0 }
    }

    /// Write opcode and address into `buf`, returning the number of bytes used
    ///
    /// `buf` must be at least [`header_len`](Self::header_len) bytes long.
    pub fn encode_header(&self, buf: &mut [u8]) -> usize {
        buf[0] = self.opcode;
        match self.address {
            Some(addr) => {
                buf[1..=ADDRESS_LEN].copy_from_slice(&addr.to_be_bytes()[1..]);
                1 + ADDRESS_LEN
            }
            None => 1,
        }
    }

    /// Bytes clocked out before the response phase: header then write data
    pub fn command_bytes(&self) -> Vec<u8> {
        let header_len = self.header_len();
        let mut bytes = vec![0u8; header_len + self.write_data.len()];
        self.encode_header(&mut bytes);
        bytes[header_len..].copy_from_slice(self.write_data);
        bytes
    }
}
