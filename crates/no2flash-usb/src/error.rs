//! Error types for the USB transport

use thiserror::Error;

/// Errors that can occur when opening the bootloader over USB
#[derive(Debug, Error)]
pub enum UsbError {
    /// No attached device matches the requested identifiers
    #[error("no2bootloader not found (VID:{vid:04x} PID:{pid:04x})")]
    DeviceNotFound {
        /// Vendor ID searched for
        vid: u16,
        /// Product ID searched for
        pid: u16,
    },

    /// Device enumeration or open failed
    #[error("Failed to open device: {0}")]
    OpenFailed(String),

    /// Selecting the USB configuration failed
    #[error("Failed to set configuration {config}: {message}")]
    ConfigurationFailed {
        /// Configuration value
        config: u8,
        /// Underlying error
        message: String,
    },

    /// Invalid option value
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Option key
        name: String,
        /// Rejected value
        value: String,
    },

    /// Protocol error from the bootloader
    #[error(transparent)]
    Core(#[from] no2flash_core::Error),
}

/// Result type for USB transport operations
pub type Result<T> = std::result::Result<T, UsbError>;
