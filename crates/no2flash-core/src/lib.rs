//! no2flash-core - no2bootloader protocol and SPI flash programming
//!
//! This crate contains everything needed to program an SPI NOR flash through
//! the no2bootloader USB vendor interface, without depending on any USB
//! stack. The pieces stack up as follows:
//!
//! - [`bootloader::ControlTransport`] - the two raw control transfers a
//!   backend must provide (implemented with `nusb` in `no2flash-usb` and
//!   in memory in `no2flash-dummy`)
//! - [`bootloader::Bootloader`] - owns a transport, validates the protocol
//!   version and relays raw SPI commands through the device
//! - [`protocol`] - SPI25 command sequences (status, write enable, sector
//!   erase, page program, read) with busy polling
//! - [`flash`] - image level operations such as [`flash::program_image`]
//!
//! # Example
//!
//! ```ignore
//! use no2flash_core::bootloader::{Bootloader, ControlTransport};
//! use no2flash_core::flash::{self, NoProgress};
//! use no2flash_core::protocol::WaitPolicy;
//!
//! fn write_image<T: ControlTransport>(transport: T, image: &[u8]) -> no2flash_core::Result<()> {
//!     let mut bl = Bootloader::new(transport)?;
//!     flash::program_image(&mut bl, 0x0006_0000, image, &WaitPolicy::default(), &mut NoProgress)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bootloader;
pub mod error;
pub mod flash;
pub mod programmer;
pub mod protocol;
pub mod spi;

pub use error::{Error, Result};
