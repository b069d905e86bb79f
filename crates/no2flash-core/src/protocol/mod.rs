//! Protocol implementations
//!
//! This module contains the SPI25 command sequences run through any
//! [`SpiMaster`](crate::programmer::SpiMaster), and the busy-wait policy
//! they share.

mod spi25;
mod wait;

pub use spi25::*;
pub use wait::WaitPolicy;
