//! Time Sources

use std::cell::Cell;
use std::rc::Rc;

/// A millisecond clock
pub trait TimeSource {
    /// Current reading in milliseconds; only differences are meaningful
    fn now_ms(&mut self) -> i64;
}

/// Manually advanced time source
///
/// Clones share the same reading, so a test can keep one handle and give
/// the other to a [`GameClock`](super::GameClock).
///
/// # Example
///
/// ```rust
/// use tickwork::domain::clock::{ManualSource, TimeSource};
///
/// let handle = ManualSource::new();
/// let mut source = handle.clone();
///
/// handle.advance(16);
/// assert_eq!(source.now_ms(), 16);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    ms: Rc<Cell<i64>>,
}

impl ManualSource {
    /// Create a source reading zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the reading forward by `ms`
    pub fn advance(&self, ms: i64) {
        self.ms.set(self.ms.get().saturating_add(ms));
    }

    /// Set the reading
    pub fn set(&self, ms: i64) {
        self.ms.set(ms);
    }

    /// Current reading
    pub fn get(&self) -> i64 {
        self.ms.get()
    }
}

impl TimeSource for ManualSource {
    fn now_ms(&mut self) -> i64 {
        self.ms.get()
    }
}
