//! High-level flash operations
//!
//! This module provides image level programming, range erase and chunked
//! read on top of the SPI25 command sequences. Geometry is fixed: 4 KiB
//! erase sectors, 256 byte program pages, 24-bit addresses.

mod operations;
mod progress;

pub use operations::*;
pub use progress::{FlashProgress, NoProgress, WriteStats};

/// Erase granularity in bytes
pub const SECTOR_SIZE: usize = 4096;

/// Program granularity in bytes
pub const PAGE_SIZE: usize = 256;

/// Size of the 24-bit address space
pub const ADDRESS_SPACE: u64 = 1 << 24;
