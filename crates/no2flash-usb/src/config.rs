//! Connection options

use std::fmt;
use std::time::Duration;

use no2flash_core::bootloader::{NO2_USB_PRODUCT, NO2_USB_VENDOR};

use crate::error::{Result, UsbError};

/// Default per-transfer timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Boards known to ship the no2bootloader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    /// Generic no2bootloader
    Generic,
    /// icE1usb
    Ice1Usb,
    /// iCEpick
    IcePick,
    /// e1-tracer
    E1Tracer,
    /// ReDIP SID
    RedipSid,
    /// iCE40 usbtrace
    Ice40UsbTrace,
}

impl Board {
    /// Every known board
    pub const ALL: [Board; 6] = [
        Board::Generic,
        Board::Ice1Usb,
        Board::IcePick,
        Board::E1Tracer,
        Board::RedipSid,
        Board::Ice40UsbTrace,
    ];

    /// Name accepted by the `board=` option
    pub fn name(&self) -> &'static str {
        match self {
            Board::Generic => "no2",
            Board::Ice1Usb => "ice1usb",
            Board::IcePick => "icepick",
            Board::E1Tracer => "e1tracer",
            Board::RedipSid => "redip-sid",
            Board::Ice40UsbTrace => "ice40-usbtrace",
        }
    }

    /// USB product ID the board enumerates with in bootloader mode
    pub fn product_id(&self) -> u16 {
        match self {
            Board::Generic => NO2_USB_PRODUCT,
            Board::Ice1Usb => 0x6144,
            Board::IcePick => 0x6148,
            Board::E1Tracer => 0x6150,
            Board::RedipSid => 0x6156,
            Board::Ice40UsbTrace => 0x617d,
        }
    }

    /// Look up a board by name (case insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Look up a board by USB identifiers
    pub fn from_ids(vid: u16, pid: u16) -> Option<Self> {
        if vid != NO2_USB_VENDOR {
            return None;
        }
        Self::ALL.into_iter().find(|b| b.product_id() == pid)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration options for opening the bootloader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbConfig {
    /// USB vendor ID
    pub vendor_id: u16,
    /// USB product ID
    pub product_id: u16,
    /// Device index (when multiple devices match)
    pub device_index: usize,
    /// Timeout applied to each control transfer
    pub timeout: Duration,
}

impl Default for UsbConfig {
    fn default() -> Self {
        Self {
            vendor_id: NO2_USB_VENDOR,
            product_id: NO2_USB_PRODUCT,
            device_index: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn invalid(name: &str, value: &str) -> UsbError {
    UsbError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// Parse a hex (0x prefixed) or decimal u16
fn parse_u16(s: &str) -> Option<u16> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Parse options from key=value pairs
///
/// `board` and `pid` both set the product ID; whichever comes last wins.
pub fn parse_options(options: &[(&str, &str)]) -> Result<UsbConfig> {
    let mut config = UsbConfig::default();

    for (key, value) in options {
        match *key {
            "vid" => {
                config.vendor_id = parse_u16(value).ok_or_else(|| invalid(key, value))?;
            }
            "pid" => {
                config.product_id = parse_u16(value).ok_or_else(|| invalid(key, value))?;
            }
            "board" => {
                let board = Board::from_name(value).ok_or_else(|| invalid(key, value))?;
                config.product_id = board.product_id();
            }
            "device" | "index" => {
                config.device_index = value.parse().map_err(|_| invalid(key, value))?;
            }
            "timeout" => {
                let ms: u64 = value.parse().map_err(|_| invalid(key, value))?;
                if ms == 0 {
                    return Err(invalid(key, value));
                }
                config.timeout = Duration::from_millis(ms);
            }
            _ => {
                return Err(UsbError::InvalidParameter {
                    name: key.to_string(),
                    value: "unknown option".to_string(),
                });
            }
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_options(&[]).unwrap();
        assert_eq!(config.vendor_id, 0x1d50);
        assert_eq!(config.product_id, 0x6146);
        assert_eq!(config.device_index, 0);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_explicit_ids() {
        let config = parse_options(&[("vid", "0x1209"), ("pid", "4660"), ("index", "2")]).unwrap();
        assert_eq!(config.vendor_id, 0x1209);
        assert_eq!(config.product_id, 4660);
        assert_eq!(config.device_index, 2);
    }

    #[test]
    fn test_board_sets_pid() {
        let config = parse_options(&[("board", "iCEpick")]).unwrap();
        assert_eq!(config.product_id, 0x6148);

        let config = parse_options(&[("board", "redip-sid"), ("timeout", "250")]).unwrap();
        assert_eq!(config.product_id, 0x6156);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_options(&[("board", "nope")]).is_err());
        assert!(parse_options(&[("pid", "0xZZZZ")]).is_err());
        assert!(parse_options(&[("timeout", "0")]).is_err());
        assert!(parse_options(&[("speed", "1")]).is_err());
    }

    #[test]
    fn test_board_from_ids() {
        assert_eq!(Board::from_ids(0x1d50, 0x6146), Some(Board::Generic));
        assert_eq!(Board::from_ids(0x1d50, 0x617d), Some(Board::Ice40UsbTrace));
        assert_eq!(Board::from_ids(0x1d51, 0x6146), None);
        assert_eq!(Board::from_ids(0x1d50, 0x0001), None);
    }
}
