//! Info command implementation

use crate::device::DynBootloader;
use no2flash_core::protocol;
use no2flash_core::spi::StatusRegister;

/// Print the protocol version and decoded status register
pub fn run_info(bootloader: &mut DynBootloader) -> Result<(), Box<dyn std::error::Error>> {
    let version = bootloader.version();
    let status = protocol::read_status(bootloader)?;

    println!("Bootloader protocol: {}", version);
    println!("Status register:     0x{:02x}", status.bits());
    println!("  Busy:              {}", yes_no(status.is_busy()));
    println!(
        "  Write enabled:     {}",
        yes_no(status.contains(StatusRegister::WEL))
    );
    println!(
        "  Block protection:  {}",
        if status.is_protected() {
            format!("0x{:02x}", (status & StatusRegister::PROTECTION).bits())
        } else {
            "none".to_string()
        }
    );
    println!(
        "  SR protect:        {}",
        yes_no(status.contains(StatusRegister::SRP0))
    );

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
