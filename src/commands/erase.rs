//! Erase command implementation

use super::IndicatifProgress;
use no2flash_core::flash::{self, SECTOR_SIZE};
use no2flash_core::programmer::SpiMaster;
use no2flash_core::protocol::WaitPolicy;

/// Run the erase command
pub fn run_erase<M: SpiMaster + ?Sized>(
    master: &mut M,
    address: u32,
    length: usize,
    policy: &WaitPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let rounded = length.div_ceil(SECTOR_SIZE) * SECTOR_SIZE;
    println!("Erasing 0x{:06x}..0x{:06x}", address, address as usize + rounded);

    let mut progress = IndicatifProgress::new(address, rounded, "Erasing");
    if let Err(e) = flash::erase_range(master, address, length, policy, &mut progress) {
        progress.finish("failed");
        return Err(e.into());
    }

    Ok(())
}
