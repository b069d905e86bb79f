//! Image, range and read operations

use super::{FlashProgress, WriteStats, ADDRESS_SPACE, PAGE_SIZE, SECTOR_SIZE};
use crate::error::{Error, Result};
use crate::programmer::SpiMaster;
use crate::protocol::{self, WaitPolicy};

/// Check that `addr` sits on a 4 KiB sector boundary
pub fn check_sector_aligned(addr: u32) -> Result<()> {
    if addr as usize % SECTOR_SIZE != 0 {
        return Err(Error::InvalidAlignment { addr });
    }
    Ok(())
}

/// Check that `[addr, addr + len)` fits in the 24-bit address space
pub fn check_range(addr: u32, len: usize) -> Result<()> {
    let end = addr as u64 + len as u64;
    if end > ADDRESS_SPACE || (addr as u64) >= ADDRESS_SPACE {
        return Err(Error::AddressOutOfRange { end });
    }
    Ok(())
}

/// Erase and program `image` starting at `base`
///
/// The image is written in 256 byte pages. Each page that starts a new
/// 4 KiB sector first erases that sector, so sectors are erased only as the
/// image reaches them. A final partial page is zero padded to 256 bytes.
/// Nothing is read back.
///
/// `base` must be sector aligned; misalignment is reported as
/// [`Error::InvalidAlignment`] before any command is sent. Any transport
/// error aborts the write, leaving earlier sectors erased and programmed
/// and later ones untouched.
pub fn program_image<M, P>(
    master: &mut M,
    base: u32,
    image: &[u8],
    policy: &WaitPolicy,
    progress: &mut P,
) -> Result<WriteStats>
where
    M: SpiMaster + ?Sized,
    P: FlashProgress + ?Sized,
{
    check_sector_aligned(base)?;
    check_range(base, image.len().div_ceil(PAGE_SIZE) * PAGE_SIZE)?;

    log::info!(
        "Programming {} bytes at 0x{:06X} ({} pages)",
        image.len(),
        base,
        image.len().div_ceil(PAGE_SIZE)
    );

    let mut stats = WriteStats {
        image_bytes: image.len(),
        ..Default::default()
    };
    let mut tail = [0u8; PAGE_SIZE];

    for (index, chunk) in image.chunks(PAGE_SIZE).enumerate() {
        let addr = base + (index * PAGE_SIZE) as u32;

        if addr as usize % SECTOR_SIZE == 0 {
            progress.erasing(addr);
            log::debug!("Erasing sector at 0x{:06X}", addr);
            protocol::erase_sector(master, addr, policy)?;
            stats.sectors_erased += 1;
        }

        let page: &[u8] = if chunk.len() == PAGE_SIZE {
            chunk
        } else {
            tail[..chunk.len()].copy_from_slice(chunk);
            &tail
        };

        progress.programming(addr);
        log::debug!("Programming page at 0x{:06X}", addr);
        protocol::program_page(master, addr, page, policy)?;
        stats.pages_programmed += 1;
    }

    progress.complete(&stats);
    Ok(stats)
}

/// Erase every 4 KiB sector touched by `[addr, addr + len)`
///
/// `addr` must be sector aligned; `len` is rounded up to whole sectors.
pub fn erase_range<M, P>(
    master: &mut M,
    addr: u32,
    len: usize,
    policy: &WaitPolicy,
    progress: &mut P,
) -> Result<WriteStats>
where
    M: SpiMaster + ?Sized,
    P: FlashProgress + ?Sized,
{
    check_sector_aligned(addr)?;
    let sectors = len.div_ceil(SECTOR_SIZE);
    check_range(addr, sectors * SECTOR_SIZE)?;

    log::info!("Erasing {} sectors at 0x{:06X}", sectors, addr);

    let mut stats = WriteStats::default();
    for index in 0..sectors {
        let sector = addr + (index * SECTOR_SIZE) as u32;
        progress.erasing(sector);
        protocol::erase_sector(master, sector, policy)?;
        stats.sectors_erased += 1;
    }

    progress.complete(&stats);
    Ok(stats)
}

/// Read `len` bytes at `addr` with a single read command
pub fn read_flash<M: SpiMaster + ?Sized>(master: &mut M, addr: u32, len: usize) -> Result<Vec<u8>> {
    check_range(addr, len)?;
    let mut buf = vec![0u8; len];
    protocol::read_data(master, addr, &mut buf)?;
    Ok(buf)
}

/// Fill `buf` from `addr`, issuing one read command per `chunk_size` bytes
pub fn read_range<M, P>(
    master: &mut M,
    addr: u32,
    buf: &mut [u8],
    chunk_size: usize,
    progress: &mut P,
) -> Result<()>
where
    M: SpiMaster + ?Sized,
    P: FlashProgress + ?Sized,
{
    check_range(addr, buf.len())?;
    let chunk_size = chunk_size.min(master.max_read_len()).max(1);

    let mut offset = 0;
    while offset < buf.len() {
        let chunk_len = core::cmp::min(chunk_size, buf.len() - offset);
        let chunk = &mut buf[offset..offset + chunk_len];
        protocol::read_data(master, addr + offset as u32, chunk)?;
        offset += chunk_len;
        progress.read_progress(offset);
    }

    Ok(())
}
