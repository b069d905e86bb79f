//! Programmer abstraction
//!
//! The flash protocol functions are generic over [`SpiMaster`] so they can
//! be driven by the bootloader or by a test double.

mod traits;

pub use traits::{execute_with_vec, SpiMaster};
