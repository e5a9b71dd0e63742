//! Monotonic Time Source

use crate::domain::clock::TimeSource;
use std::time::Instant;

/// Wall-clock [`TimeSource`] backed by [`Instant`]
///
/// Readings are milliseconds since the source was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    /// Start measuring from now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_ms(&mut self) -> i64 {
        i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}
