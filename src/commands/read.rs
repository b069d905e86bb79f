//! Read command implementation

use super::IndicatifProgress;
use no2flash_core::flash;
use no2flash_core::programmer::SpiMaster;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Default chunk size for reading (4 KiB)
const READ_CHUNK_SIZE: usize = 4096;

/// Run the read command
pub fn run_read<M: SpiMaster + ?Sized>(
    master: &mut M,
    output: &Path,
    address: u32,
    length: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut data = vec![0u8; length];

    let mut progress = IndicatifProgress::new(0, length, "Reading");
    if let Err(e) = flash::read_range(master, address, &mut data, READ_CHUNK_SIZE, &mut progress) {
        progress.finish("failed");
        return Err(e.into());
    }
    progress.finish("Read complete");

    let mut file = File::create(output)?;
    file.write_all(&data)?;

    println!("Wrote {} bytes to {:?}", data.len(), output);

    Ok(())
}
