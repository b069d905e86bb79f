//! no2bootloader vendor protocol constants and types
//!
//! The bootloader exposes three vendor requests on the default control
//! pipe. A raw SPI transaction is run with an OUT request carrying the bytes
//! to clock out, and its result is fetched with a separate IN request. There
//! is no request identifier: the result always belongs to the last command.

use std::fmt;

/// Default USB vendor ID (OpenMoko, shared by the no2 boards)
pub const NO2_USB_VENDOR: u16 = 0x1d50;
/// Default USB product ID of the no2bootloader
pub const NO2_USB_PRODUCT: u16 = 0x6146;

/// IN request type: DEVICE_TO_HOST | VENDOR | RECIPIENT_INTERFACE
pub const REQTYPE_VENDOR_IN: u8 = 0xC1;
/// OUT request type: HOST_TO_DEVICE | VENDOR | RECIPIENT_INTERFACE
pub const REQTYPE_VENDOR_OUT: u8 = 0x41;

/// Query the protocol version (IN, 2 bytes)
pub const REQ_GET_VERSION: u8 = 0;
/// Clock the payload out on the SPI bus (OUT)
pub const REQ_SPI_EXECUTE: u8 = 1;
/// Fetch the bytes latched during the last execute (IN)
pub const REQ_SPI_RESULT: u8 = 2;

/// Length of the version response
pub const VERSION_LEN: u16 = 2;

/// Largest payload a single control transfer can carry (wLength is 16 bits)
pub const MAX_TRANSFER_LEN: usize = u16::MAX as usize;

/// Bootloader protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProtocolVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl ProtocolVersion {
    /// Create a version from its two components
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The only protocol version this host side speaks
pub const SUPPORTED_VERSION: ProtocolVersion = ProtocolVersion::new(1, 0);
