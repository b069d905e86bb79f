//! Progress reporting for flash operations

/// Statistics from a write operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Number of 4 KiB sectors erased
    pub sectors_erased: usize,
    /// Number of page program operations
    pub pages_programmed: usize,
    /// Bytes of the image written (excluding tail padding)
    pub image_bytes: usize,
}

/// Progress callback for flash operations
///
/// `erasing` and `programming` fire right before the corresponding command
/// is sent, with the absolute flash address.
pub trait FlashProgress {
    /// Called before a sector erase
    fn erasing(&mut self, addr: u32);

    /// Called before a page program
    fn programming(&mut self, addr: u32);

    /// Called after each chunk of a read
    fn read_progress(&mut self, _bytes_read: usize) {}

    /// Called when a write or erase finished without error
    fn complete(&mut self, _stats: &WriteStats) {}
}

/// A no-op progress reporter
pub struct NoProgress;

impl FlashProgress for NoProgress {
    fn erasing(&mut self, _addr: u32) {}
    fn programming(&mut self, _addr: u32) {}
}
