//! SPI types and command structures
//!
//! This module provides the command representation relayed through the
//! bootloader and the SPI NOR opcodes it uses.

mod command;
pub mod opcodes;
mod status;

pub use command::{SpiCommand, ADDRESS_LEN};
pub use opcodes::*;
pub use status::StatusRegister;
