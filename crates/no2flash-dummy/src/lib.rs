//! no2flash-dummy - In-memory no2bootloader emulator for testing
//!
//! This crate provides a dummy bootloader that answers the vendor control
//! requests the way the real firmware does and relays them to an emulated
//! SPI NOR chip held in memory. It's useful for testing and development
//! without real hardware.
//!
//! Erase and program leave the chip busy for a configurable number of
//! status reads, so callers exercise their busy polling.

use no2flash_core::bootloader::{
    ControlTransport, ProtocolVersion, REQ_GET_VERSION, REQ_SPI_EXECUTE, REQ_SPI_RESULT,
    SUPPORTED_VERSION,
};
use no2flash_core::error::{Error, Result};
use no2flash_core::flash::{PAGE_SIZE, SECTOR_SIZE};
use no2flash_core::spi::{opcodes, StatusRegister, ADDRESS_LEN};

/// Configuration for the dummy bootloader
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Flash size in bytes
    pub size: usize,
    /// Protocol version reported by the version request
    pub version: ProtocolVersion,
    /// Status reads that report busy after each erase or program
    pub busy_polls: u32,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            size: 1024 * 1024,
            version: SUPPORTED_VERSION,
            busy_polls: 2,
        }
    }
}

/// A flash operation carried out by the emulated chip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DummyOp {
    /// 4 KiB sector erase at the given (aligned) address
    Erase(u32),
    /// Page program
    Program {
        /// Start address
        addr: u32,
        /// Payload bytes
        data: Vec<u8>,
    },
    /// Data read
    Read {
        /// Start address
        addr: u32,
        /// Number of bytes
        len: usize,
    },
}

/// Dummy bootloader
///
/// Emulates the no2bootloader vendor interface and the SPI flash behind it.
pub struct DummyBootloader {
    config: DummyConfig,
    data: Vec<u8>,
    write_enabled: bool,
    protection: StatusRegister,
    busy_remaining: u32,
    result: Vec<u8>,
    ops: Vec<DummyOp>,
    transfers: usize,
    status_reads: usize,
    fail_at: Option<usize>,
}

impl DummyBootloader {
    /// Create a new dummy bootloader with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let data = vec![0xFF; config.size];
        Self {
            config,
            data,
            write_enabled: false,
            protection: StatusRegister::empty(),
            busy_remaining: 0,
            result: Vec::new(),
            ops: Vec::new(),
            transfers: 0,
            status_reads: 0,
            fail_at: None,
        }
    }

    /// Create a new dummy bootloader with default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy bootloader with pre-filled flash contents
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut dummy = Self::new(config);
        let len = core::cmp::min(initial_data.len(), dummy.data.len());
        dummy.data[..len].copy_from_slice(&initial_data[..len]);
        dummy
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Flash operations performed so far
    pub fn ops(&self) -> &[DummyOp] {
        &self.ops
    }

    /// Addresses of every sector erase performed so far
    pub fn erases(&self) -> Vec<u32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DummyOp::Erase(addr) => Some(*addr),
                _ => None,
            })
            .collect()
    }

    /// Address and payload of every page program performed so far
    pub fn programs(&self) -> Vec<(u32, Vec<u8>)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DummyOp::Program { addr, data } => Some((*addr, data.clone())),
                _ => None,
            })
            .collect()
    }

    /// Number of control transfers handled so far
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    /// Number of status register reads handled so far
    pub fn status_reads(&self) -> usize {
        self.status_reads
    }

    /// Make the `n`th control transfer from now fail, as if the device
    /// had been unplugged
    pub fn fail_after(&mut self, n: usize) {
        self.fail_at = Some(self.transfers + n);
    }

    /// Set or clear the block protection bits reported in the status register
    pub fn set_protection(&mut self, bits: StatusRegister) {
        self.protection = bits & StatusRegister::PROTECTION;
    }

    fn status(&mut self) -> u8 {
        let mut status = self.protection;
        if self.write_enabled {
            status |= StatusRegister::WEL;
        }
        if self.busy_remaining > 0 {
            self.busy_remaining -= 1;
            status |= StatusRegister::WIP;
        }
        status.bits()
    }

    fn address(&self, bytes: &[u8]) -> Option<usize> {
        if bytes.len() < 1 + ADDRESS_LEN || self.data.is_empty() {
            return None;
        }
        let addr = u32::from_be_bytes([0, bytes[1], bytes[2], bytes[3]]) as usize;
        Some(addr % self.data.len())
    }

    fn handle_sector_erase(&mut self, bytes: &[u8]) {
        let Some(addr) = self.address(bytes) else {
            log::warn!("Sector erase without address");
            return;
        };
        if !self.write_enabled {
            log::warn!("Sector erase at 0x{:06X} ignored: write not enabled", addr);
            return;
        }

        let aligned = addr & !(SECTOR_SIZE - 1);
        let end = core::cmp::min(aligned + SECTOR_SIZE, self.data.len());
        self.data[aligned..end].fill(0xFF);

        self.ops.push(DummyOp::Erase(aligned as u32));
        self.write_enabled = false;
        self.busy_remaining = self.config.busy_polls;
    }

    fn handle_page_program(&mut self, bytes: &[u8]) {
        let Some(addr) = self.address(bytes) else {
            log::warn!("Page program without address");
            return;
        };
        if !self.write_enabled {
            log::warn!("Page program at 0x{:06X} ignored: write not enabled", addr);
            return;
        }

        // Data past the end of the page wraps to the page start, and a
        // page hanging off the end of a short chip wraps to address 0
        let payload = &bytes[1 + ADDRESS_LEN..];
        let page_base = addr & !(PAGE_SIZE - 1);
        let len = self.data.len();
        for (i, &byte) in payload.iter().enumerate() {
            let offset = (addr - page_base + i) % PAGE_SIZE;
            // Flash programming: can only change 1 -> 0
            self.data[(page_base + offset) % len] &= byte;
        }

        self.ops.push(DummyOp::Program {
            addr: addr as u32,
            data: payload.to_vec(),
        });
        self.write_enabled = false;
        self.busy_remaining = self.config.busy_polls;
    }

    /// Clock `bytes` through the emulated chip and latch what it returns
    fn spi_transfer(&mut self, bytes: &[u8]) {
        let mut result = bytes.to_vec();

        match bytes.first().copied() {
            Some(opcodes::RDSR) => {
                self.status_reads += 1;
                let status = self.status();
                // The status register is clocked out repeatedly
                result[1..].fill(status);
            }
            Some(opcodes::WREN) => self.write_enabled = true,
            Some(opcodes::SE_20) => self.handle_sector_erase(bytes),
            Some(opcodes::PP) => self.handle_page_program(bytes),
            Some(opcodes::READ) => {
                if let Some(addr) = self.address(bytes) {
                    let len = bytes.len() - 1 - ADDRESS_LEN;
                    for i in 0..len {
                        result[1 + ADDRESS_LEN + i] = self.data[(addr + i) % self.data.len()];
                    }
                    self.ops.push(DummyOp::Read {
                        addr: addr as u32,
                        len,
                    });
                }
            }
            Some(op) => {
                log::debug!("Unsupported opcode 0x{:02X}", op);
                result[1..].fill(0xFF);
            }
            None => {}
        }

        self.result = result;
    }

    fn count_transfer(&mut self) -> Result<()> {
        self.transfers += 1;
        if self.fail_at == Some(self.transfers) {
            return Err(Error::Transport("device disconnected".to_string()));
        }
        Ok(())
    }
}

impl ControlTransport for DummyBootloader {
    fn control_in(
        &mut self,
        request: u8,
        _value: u16,
        _index: u16,
        length: u16,
    ) -> Result<Vec<u8>> {
        self.count_transfer()?;

        let mut data = match request {
            REQ_GET_VERSION => vec![self.config.version.major, self.config.version.minor],
            REQ_SPI_RESULT => self.result.clone(),
            _ => return Err(Error::Transport(format!("request {} stalled", request))),
        };
        data.truncate(length as usize);
        Ok(data)
    }

    fn control_out(&mut self, request: u8, _value: u16, _index: u16, data: &[u8]) -> Result<()> {
        self.count_transfer()?;

        match request {
            REQ_SPI_EXECUTE => {
                self.spi_transfer(data);
                Ok(())
            }
            _ => Err(Error::Transport(format!("request {} stalled", request))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use no2flash_core::bootloader::Bootloader;
    use no2flash_core::flash::{self, NoProgress};
    use no2flash_core::protocol::{self, WaitPolicy};

    fn open(config: DummyConfig) -> Bootloader<DummyBootloader> {
        Bootloader::new(DummyBootloader::new(config)).unwrap()
    }

    #[test]
    fn test_read_write() {
        let mut bl = open(DummyConfig::default());

        let data = [0x12, 0x34, 0x56, 0x78];
        protocol::program_page(&mut bl, 0x1000, &data, &WaitPolicy::default()).unwrap();

        let mut buf = [0u8; 6];
        protocol::read_data(&mut bl, 0x1000, &mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34, 0x56, 0x78, 0xFF, 0xFF]);
    }

    #[test]
    fn test_erase() {
        let mut bl = open(DummyConfig::default());

        protocol::program_page(&mut bl, 0x2100, &[0u8; 256], &WaitPolicy::default()).unwrap();
        protocol::erase_sector(&mut bl, 0x2000, &WaitPolicy::default()).unwrap();

        let mut buf = [0u8; 256];
        protocol::read_data(&mut bl, 0x2100, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_busy_polling() {
        let mut bl = open(DummyConfig {
            busy_polls: 5,
            ..Default::default()
        });

        protocol::erase_sector(&mut bl, 0, &WaitPolicy::default()).unwrap();
        // 5 busy reads plus the one that finds the chip idle
        assert_eq!(bl.transport().status_reads(), 6);
        assert!(!protocol::is_busy(&mut bl).unwrap());
    }

    #[test]
    fn test_program_without_write_enable_is_ignored() {
        let mut dummy = DummyBootloader::new_default();
        dummy
            .control_out(REQ_SPI_EXECUTE, 0, 0, &[opcodes::PP, 0, 0, 0, 0x00])
            .unwrap();
        assert_eq!(dummy.data()[0], 0xFF);
        assert!(dummy.ops().is_empty());
    }

    #[test]
    fn test_page_program_wraps_within_page() {
        let mut bl = open(DummyConfig::default());

        protocol::program_page(&mut bl, 0x00FE, &[0x01, 0x02, 0x03], &WaitPolicy::default())
            .unwrap();
        let data = bl.transport().data();
        assert_eq!(data[0xFE], 0x01);
        assert_eq!(data[0xFF], 0x02);
        assert_eq!(data[0x00], 0x03);
        assert_eq!(data[0x100], 0xFF);
    }

    #[test]
    fn test_size_not_page_multiple() {
        let mut bl = open(DummyConfig {
            size: 1000,
            busy_polls: 0,
            ..Default::default()
        });

        flash::program_image(&mut bl, 0, &[0x11; 1000], &WaitPolicy::default(), &mut NoProgress)
            .unwrap();

        // The zero padded tail page runs past 1000 and wraps onto the start
        let data = bl.transport().data();
        assert!(data[..24].iter().all(|&b| b == 0x00));
        assert!(data[24..].iter().all(|&b| b == 0x11));
    }

    #[test]
    fn test_zero_size_chip_ignores_addressed_commands() {
        let mut bl = open(DummyConfig {
            size: 0,
            ..Default::default()
        });

        protocol::program_page(&mut bl, 0, &[0x00; 4], &WaitPolicy::default()).unwrap();
        let mut buf = [0u8; 4];
        protocol::read_data(&mut bl, 0, &mut buf).unwrap();
        assert!(bl.transport().ops().is_empty());
    }

    #[test]
    fn test_status_reports_protection() {
        let mut dummy = DummyBootloader::new_default();
        dummy.set_protection(StatusRegister::BP0 | StatusRegister::SRP0);
        let mut bl = Bootloader::new(dummy).unwrap();

        let status = protocol::read_status(&mut bl).unwrap();
        assert!(status.is_protected());
        assert!(!status.contains(StatusRegister::SRP0));
    }
}
