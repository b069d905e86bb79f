//! no2flash-usb - nusb transport for the no2bootloader
//!
//! This crate opens a no2bootloader over USB with `nusb` and exposes it as a
//! [`ControlTransport`](no2flash_core::bootloader::ControlTransport). The
//! bootloader only uses vendor control requests on the default pipe, so no
//! interface needs to be claimed.
//!
//! Known boards (all VID 0x1d50):
//! - no2bootloader (generic): PID 0x6146
//! - icE1usb: PID 0x6144
//! - iCEpick: PID 0x6148
//! - e1-tracer: PID 0x6150
//! - ReDIP SID: PID 0x6156
//! - iCE40 usbtrace: PID 0x617d
//!
//! # Example
//!
//! ```no_run
//! use no2flash_usb::{connect, UsbConfig};
//!
//! let bootloader = connect(&UsbConfig::default())?;
//! println!("Protocol version: {}", bootloader.version());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Configuration Options
//!
//! - `board=NAME`: use the PID of a known board
//! - `vid=0xXXXX` / `pid=0xXXXX`: explicit USB identifiers
//! - `index=N` or `device=N`: select the Nth matching device (0-indexed)
//! - `timeout=MS`: per-transfer timeout in milliseconds

mod config;
mod device;
mod error;

pub use config::{parse_options, Board, UsbConfig};
pub use device::{connect, list_devices, UsbDeviceInfo, UsbTransport};
pub use error::{Result, UsbError};
