//! Busy-wait policy

/// How to wait for the flash to finish an erase or program cycle
///
/// The chip never signals completion on its own; the only way to find out
/// is to poll status register 1 until the WIP bit clears. The default policy
/// polls back to back with no limit, so a chip that never clears WIP blocks
/// the caller forever. `max_polls` turns that into an
/// [`Error::Timeout`](crate::Error::Timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitPolicy {
    /// Delay between two status polls, in microseconds
    pub poll_interval_us: u32,
    /// Give up after this many status polls (None = wait forever)
    pub max_polls: Option<u32>,
}

impl WaitPolicy {
    /// Poll back to back until the chip is ready, however long that takes
    pub const fn unbounded() -> Self {
        Self {
            poll_interval_us: 0,
            max_polls: None,
        }
    }

    /// Set the delay between status polls
    pub const fn with_poll_interval_us(mut self, us: u32) -> Self {
        self.poll_interval_us = us;
        self
    }

    /// Limit the number of status polls
    pub const fn with_max_polls(mut self, polls: u32) -> Self {
        self.max_polls = Some(polls);
        self
    }
}
