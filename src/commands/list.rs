//! List command implementation

use crate::device;

/// List available backends and, with USB support, attached bootloaders
pub fn run_list() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available backends:");
    println!();
    for backend in device::available_backends() {
        println!("  {:<8} - {}", backend.name, backend.description);
    }

    #[cfg(feature = "usb")]
    list_usb_devices()?;

    Ok(())
}

#[cfg(feature = "usb")]
fn list_usb_devices() -> Result<(), Box<dyn std::error::Error>> {
    use no2flash_usb::Board;

    println!();
    println!("Known boards:");
    println!();
    for board in Board::ALL {
        println!("  {:<16} 1d50:{:04x}", board.name(), board.product_id());
    }

    let devices = no2flash_usb::list_devices()?;

    println!();
    if devices.is_empty() {
        println!("No bootloaders attached");
        return Ok(());
    }

    println!("Attached bootloaders:");
    println!();
    println!(
        "{:<6} {:<5} {:<10} {:<16} {}",
        "Index", "Bus", "Address", "Board", "Serial"
    );
    println!("{}", "-".repeat(56));

    // Index counts matches per product ID, as the index= option does
    let mut seen: Vec<u16> = Vec::new();
    for dev in &devices {
        let index = seen.iter().filter(|&&pid| pid == dev.product_id).count();
        seen.push(dev.product_id);
        println!(
            "{:<6} {:<5} {:<10} {:<16} {}",
            index,
            dev.bus,
            dev.address,
            dev.board.name(),
            dev.serial.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
