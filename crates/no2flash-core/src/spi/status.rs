//! Status register 1 decoding

use bitflags::bitflags;

bitflags! {
    /// SPI NOR status register 1
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusRegister: u8 {
        /// Write In Progress (erase or program cycle running)
        const WIP  = 1 << 0;
        /// Write Enable Latch
        const WEL  = 1 << 1;
        /// Block Protect bit 0
        const BP0  = 1 << 2;
        /// Block Protect bit 1
        const BP1  = 1 << 3;
        /// Block Protect bit 2
        const BP2  = 1 << 4;
        /// Top/Bottom protect
        const TB   = 1 << 5;
        /// Sector/Block protect
        const SEC  = 1 << 6;
        /// Status Register Protect
        const SRP0 = 1 << 7;

        /// Every bit that restricts which region may be written
        const PROTECTION = Self::BP0.bits()
            | Self::BP1.bits()
            | Self::BP2.bits()
            | Self::TB.bits()
            | Self::SEC.bits();
    }
}

impl StatusRegister {
    /// Decode a raw status byte, keeping every bit
    pub fn from_raw(value: u8) -> Self {
        Self::from_bits_retain(value)
    }

    /// Returns true while an erase or program cycle is running
    pub fn is_busy(&self) -> bool {
        self.contains(Self::WIP)
    }

    /// Returns true if any block protection bit is set
    ///
    /// The bootloader firmware only allows upgrading itself when this is
    /// false.
    pub fn is_protected(&self) -> bool {
        self.intersects(Self::PROTECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protection_mask() {
        assert_eq!(StatusRegister::PROTECTION.bits(), 0x7c);
        assert!(!StatusRegister::from_raw(0x83).is_protected());
        assert!(StatusRegister::from_raw(0x04).is_protected());
        assert!(StatusRegister::from_raw(0x40).is_protected());
    }

    #[test]
    fn test_busy_bit() {
        assert!(!StatusRegister::from_raw(0x00).is_busy());
        assert!(StatusRegister::from_raw(0x01).is_busy());
        assert!(!StatusRegister::from_raw(0x02).is_busy());
        assert!(StatusRegister::from_raw(0xFF).is_busy());
    }
}
