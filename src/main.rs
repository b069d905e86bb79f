//! no2flash - Flash programmer for the no2bootloader
//!
//! Writes, reads and erases the SPI NOR flash behind a no2bootloader USB DFU
//! bootloader. The bootloader only relays raw SPI transactions; every flash
//! operation is built on the host and sent as vendor control transfers.
//!
//! Backends are selected with a device string (`-d usb:board=icepick`,
//! `-d dummy`), see `no2flash list`.

mod cli;
mod commands;
mod device;

use clap::Parser;
use cli::{Cli, Commands};
use no2flash_core::protocol::WaitPolicy;

/// Default log filter for a `-v` count; RUST_LOG still takes precedence
fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(cli.verbose)),
    )
    .init();

    let mut policy = WaitPolicy::unbounded().with_poll_interval_us(cli.poll_interval_us);
    if let Some(max) = cli.max_polls {
        policy = policy.with_max_polls(max);
    }

    match cli.command {
        Commands::Write { input, address } => {
            let mut bootloader = device::open_bootloader(&cli.device)?;
            commands::run_write(&mut bootloader, &input, address, &policy)
        }
        Commands::Read {
            output,
            address,
            length,
        } => {
            let mut bootloader = device::open_bootloader(&cli.device)?;
            commands::run_read(&mut bootloader, &output, address, length as usize)
        }
        Commands::Erase { address, length } => {
            let mut bootloader = device::open_bootloader(&cli.device)?;
            commands::run_erase(&mut bootloader, address, length as usize, &policy)
        }
        Commands::Info => {
            let mut bootloader = device::open_bootloader(&cli.device)?;
            commands::run_info(&mut bootloader)
        }
        Commands::List => commands::run_list(),
    }
}
