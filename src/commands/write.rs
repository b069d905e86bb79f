//! Write command implementation

use super::IndicatifProgress;
use no2flash_core::flash;
use no2flash_core::programmer::SpiMaster;
use no2flash_core::protocol::WaitPolicy;
use std::fs;
use std::path::Path;

/// Run the write command
///
/// Loads the whole image, then erases and programs it at `address`.
pub fn run_write<M: SpiMaster + ?Sized>(
    master: &mut M,
    input: &Path,
    address: u32,
    policy: &WaitPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = fs::read(input)?;

    if image.is_empty() {
        println!("{:?} is empty, nothing to write", input);
        return Ok(());
    }

    println!(
        "Writing {} bytes from {:?} to 0x{:06x}",
        image.len(),
        input,
        address
    );

    let mut progress = IndicatifProgress::new(address, image.len(), "Writing");
    if let Err(e) = flash::program_image(master, address, &image, policy, &mut progress) {
        progress.finish("failed");
        return Err(e.into());
    }

    Ok(())
}
