//! Error types for no2flash-core

use thiserror::Error;

/// Core error type shared by the bootloader, protocol and flash layers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The bootloader reported a protocol version other than 1.0
    #[error("unsupported bootloader protocol version {major}.{minor} (expected 1.0)")]
    UnsupportedVersion {
        /// Reported major version
        major: u8,
        /// Reported minor version
        minor: u8,
    },

    /// A flash operation base address is not sector aligned
    #[error("address 0x{addr:06X} is not aligned to a 4 KiB sector")]
    InvalidAlignment {
        /// Offending address
        addr: u32,
    },

    /// The requested range does not fit in a 24-bit flash address
    #[error("range ending at 0x{end:X} is outside the 24-bit flash address space")]
    AddressOutOfRange {
        /// End of the requested range (exclusive)
        end: u64,
    },

    /// A page program payload is larger than one page
    #[error("page program of {len} bytes exceeds the 256 byte page size")]
    PageOverflow {
        /// Payload length
        len: usize,
    },

    /// A command plus its response does not fit a single control transfer
    #[error("command of {len} bytes does not fit in a control transfer")]
    TransferTooLarge {
        /// Total transfer length
        len: usize,
    },

    /// The device returned fewer result bytes than requested
    #[error("short result from device: expected {expected} bytes, got {actual}")]
    ShortResponse {
        /// Requested length
        expected: usize,
        /// Received length
        actual: usize,
    },

    /// The flash stayed busy for longer than the configured poll limit
    #[error("flash still busy after {polls} status polls")]
    Timeout {
        /// Number of status polls issued
        polls: u32,
    },

    /// A USB control transfer failed
    #[error("USB transfer failed: {0}")]
    Transport(String),
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
