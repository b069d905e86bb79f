//! CLI argument parsing

use crate::device;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the device argument
fn device_help() -> String {
    format!(
        "Device to use, as name[:key=value,...] [available: {}]",
        device::backend_names_short()
    )
}

#[derive(Parser)]
#[command(name = "no2flash")]
#[command(author, version, about = "Flash programmer for the no2bootloader", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short, long, global = true, default_value = "usb", help = device_help())]
    pub device: String,

    /// Delay between status register polls while the flash is busy
    #[arg(long, global = true, default_value_t = 0)]
    pub poll_interval_us: u32,

    /// Give up after this many status polls (default: wait forever)
    #[arg(long, global = true)]
    pub max_polls: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Erase and program an image file
    Write {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Flash address to write to (must be 4 KiB aligned)
        #[arg(short, long, value_parser = parse_hex_u32, default_value = "0")]
        address: u32,
    },

    /// Read flash contents to file
    Read {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Flash address to read from
        #[arg(short, long, value_parser = parse_hex_u32, default_value = "0")]
        address: u32,

        /// Number of bytes to read
        #[arg(short, long, value_parser = parse_hex_u32)]
        length: u32,
    },

    /// Erase the 4 KiB sectors covering a range
    Erase {
        /// Start address (must be 4 KiB aligned)
        #[arg(short, long, value_parser = parse_hex_u32)]
        address: u32,

        /// Number of bytes to erase (rounded up to whole sectors)
        #[arg(short, long, value_parser = parse_hex_u32)]
        length: u32,
    },

    /// Show bootloader version and flash status
    Info,

    /// List attached bootloaders and available backends
    List,
}
