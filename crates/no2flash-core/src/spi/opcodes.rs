//! SPI NOR flash opcodes
//!
//! Only the single-I/O, 3-byte address subset that the no2bootloader relays
//! is listed here.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before any write/erase operation
pub const WREN: u8 = 0x06;

// ============================================================================
// Status register
// ============================================================================

/// Read Status Register 1
pub const RDSR: u8 = 0x05;

// ============================================================================
// Read / program / erase (3-byte address)
// ============================================================================

/// Read Data
pub const READ: u8 = 0x03;
/// Page Program (up to 256 bytes)
pub const PP: u8 = 0x02;
/// Sector Erase 4 KiB
pub const SE_20: u8 = 0x20;
