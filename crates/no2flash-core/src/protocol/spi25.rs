//! SPI25 protocol implementation
//!
//! This module implements the SPI NOR command sequences the no2bootloader
//! relays: status read, write enable, 4 KiB sector erase, page program and
//! plain read, all with 3-byte addressing and single I/O.
//!
//! Erase and program are synchronous from the caller's point of view: each
//! one sends Write Enable, the operation itself, then blocks in
//! [`wait_ready`] until the chip reports it is idle.

use super::WaitPolicy;
use crate::error::{Error, Result};
use crate::flash::PAGE_SIZE;
use crate::programmer::SpiMaster;
use crate::spi::{opcodes, SpiCommand, StatusRegister};

/// Read the status register 1
pub fn read_status<M: SpiMaster + ?Sized>(master: &mut M) -> Result<StatusRegister> {
    let mut buf = [0u8; 1];
    let mut cmd = SpiCommand::read_reg(opcodes::RDSR, &mut buf);
    master.execute(&mut cmd)?;
    Ok(StatusRegister::from_raw(buf[0]))
}

/// Check if a write or erase operation is in progress
///
/// True iff bit 0 (WIP) of status register 1 is set.
pub fn is_busy<M: SpiMaster + ?Sized>(master: &mut M) -> Result<bool> {
    Ok(read_status(master)?.is_busy())
}

/// Send the Write Enable command
pub fn write_enable<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    let mut cmd = SpiCommand::simple(opcodes::WREN);
    master.execute(&mut cmd)
}

/// Wait for the WIP (Write In Progress) bit to clear
///
/// Polls the status register according to `policy`. With the default
/// policy this never gives up.
pub fn wait_ready<M: SpiMaster + ?Sized>(master: &mut M, policy: &WaitPolicy) -> Result<()> {
    let mut polls: u32 = 0;

    loop {
        polls = polls.saturating_add(1);
        if !is_busy(master)? {
            log::trace!("Flash ready after {} polls", polls);
            return Ok(());
        }

        if let Some(max) = policy.max_polls {
            if polls >= max {
                log::warn!("Flash still busy after {} polls, giving up", polls);
                return Err(Error::Timeout { polls });
            }
        }

        if policy.poll_interval_us > 0 {
            master.delay_us(policy.poll_interval_us);
        }
    }
}

/// Erase the 4 KiB sector at `addr`
///
/// `addr` is expected to be sector aligned; that is checked by the callers
/// in [`crate::flash`], not here.
pub fn erase_sector<M: SpiMaster + ?Sized>(
    master: &mut M,
    addr: u32,
    policy: &WaitPolicy,
) -> Result<()> {
    write_enable(master)?;

    let mut cmd = SpiCommand::erase_3b(opcodes::SE_20, addr);
    master.execute(&mut cmd)?;

    wait_ready(master, policy)
}

/// Program a single page (up to 256 bytes)
///
/// The data must not cross a page boundary; chips wrap around within the
/// page if it does.
pub fn program_page<M: SpiMaster + ?Sized>(
    master: &mut M,
    addr: u32,
    data: &[u8],
    policy: &WaitPolicy,
) -> Result<()> {
    if data.len() > PAGE_SIZE {
        return Err(Error::PageOverflow { len: data.len() });
    }

    write_enable(master)?;

    let mut cmd = SpiCommand::write_3b(opcodes::PP, addr, data);
    master.execute(&mut cmd)?;

    wait_ready(master, policy)
}

/// Read `buf.len()` bytes starting at `addr` in a single command
///
/// Reads complete while the data is clocked out, so there is no busy wait.
pub fn read_data<M: SpiMaster + ?Sized>(master: &mut M, addr: u32, buf: &mut [u8]) -> Result<()> {
    let mut cmd = SpiCommand::read_3b(opcodes::READ, addr, buf);
    master.execute(&mut cmd)
}
