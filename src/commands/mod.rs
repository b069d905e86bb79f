//! CLI command implementations
//!
//! Flash commands are generic over [`SpiMaster`](no2flash_core::programmer::SpiMaster)
//! so they run the same against the USB bootloader and the dummy emulator.

mod erase;
mod info;
mod list;
mod progress;
mod read;
mod write;

pub use erase::run_erase;
pub use info::run_info;
pub use list::run_list;
pub use progress::IndicatifProgress;
pub use read::run_read;
pub use write::run_write;
