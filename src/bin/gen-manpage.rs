//! Writes no2flash.1 plus one no2flash-<command>.1 per subcommand
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
mod cli;
#[allow(dead_code)]
#[path = "../device.rs"]
mod device;

fn render(cmd: clap::Command, title: &str, dir: &Path) -> std::io::Result<PathBuf> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd).title(title).render(&mut buffer)?;

    let path = dir.join(format!("{}.1", title));
    fs::write(&path, buffer)?;
    Ok(path)
}

fn main() -> std::io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    fs::create_dir_all(&output_dir)?;

    let cmd = cli::Cli::command();
    for sub in cmd.get_subcommands() {
        let title = format!("no2flash-{}", sub.get_name());
        println!("{}", render(sub.clone(), &title, &output_dir)?.display());
    }
    println!("{}", render(cmd, "no2flash", &output_dir)?.display());

    Ok(())
}
