//! indicatif progress reporting

use indicatif::{ProgressBar, ProgressStyle};
use no2flash_core::flash::{FlashProgress, WriteStats, PAGE_SIZE, SECTOR_SIZE};

/// Progress reporter using an indicatif progress bar
///
/// The bar position tracks how far into `[base, base + len)` the operation
/// has got; the message shows the sector or page being worked on.
pub struct IndicatifProgress {
    bar: ProgressBar,
    base: u32,
    len: u64,
}

impl IndicatifProgress {
    /// Create a bar for an operation over `len` bytes starting at `base`
    pub fn new(base: u32, len: usize, phase: &str) -> Self {
        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {} {{msg}}",
                    phase
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self {
            bar,
            base,
            len: len as u64,
        }
    }

    fn advance_to(&self, addr: u32) {
        let done = addr.saturating_sub(self.base) as u64;
        self.bar.set_position(done.min(self.len));
    }

    /// Finish the bar, leaving `message` behind
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl FlashProgress for IndicatifProgress {
    fn erasing(&mut self, addr: u32) {
        self.advance_to(addr);
        self.bar.set_message(format!("Erasing @0x{:06x}", addr));
        log::debug!("Erasing @0x{:06x} ({} bytes)", addr, SECTOR_SIZE);
    }

    fn programming(&mut self, addr: u32) {
        self.advance_to(addr);
        self.bar.set_message(format!("Programming @0x{:06x}", addr));
        log::trace!("Programming @0x{:06x} ({} bytes)", addr, PAGE_SIZE);
    }

    fn read_progress(&mut self, bytes_read: usize) {
        self.bar.set_position(bytes_read as u64);
    }

    fn complete(&mut self, stats: &WriteStats) {
        self.bar.set_position(self.len);
        self.finish("done");

        if stats.pages_programmed > 0 {
            println!(
                "Wrote {} bytes: {} sectors erased, {} pages programmed",
                stats.image_bytes, stats.sectors_erased, stats.pages_programmed
            );
        } else {
            println!("Erased {} sectors", stats.sectors_erased);
        }
    }
}
