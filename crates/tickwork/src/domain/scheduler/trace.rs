//! Invocation Trace - Bounded Record of Body Invocations
//!
//! Replaying the same inputs must produce the same trace; comparing traces
//! is how determinism is checked in tests and by the CLI's `replay
//! --repeat`. Recording is off unless a capacity is configured.

use super::types::{RoutineId, VirtualTime};
use std::collections::VecDeque;
use std::fmt;

/// What happened to a slot after its body returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The body asked to continue; the slot wakes again at `wake_at`
    Rescheduled {
        /// Next wake-time
        wake_at: VirtualTime,
    },
    /// The body finished
    Completed,
    /// The routine was canceled during its own invocation
    Canceled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Rescheduled { wake_at } => write!(f, "RESCHEDULED({})", wake_at),
            Outcome::Completed => write!(f, "COMPLETED"),
            Outcome::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// One body invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Invocation {
    /// Virtual time of the drain that ran the body
    pub at: VirtualTime,
    /// Routine that ran
    pub id: RoutineId,
    /// What happened afterwards
    pub outcome: Outcome,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={} {} {}", self.at, self.id, self.outcome)
    }
}

/// Ring buffer of the most recent invocations
#[derive(Debug, Clone, Default)]
pub struct InvocationTrace {
    capacity: usize,
    records: VecDeque<Invocation>,
    total: u64,
}

impl InvocationTrace {
    /// Create a trace keeping at most `capacity` records (0 disables it)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(1024)),
            total: 0,
        }
    }

    /// Check if recording is enabled
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Maximum number of retained records
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record an invocation, evicting the oldest one when full
    pub fn record(&mut self, invocation: Invocation) {
        if !self.is_enabled() {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(invocation);
        self.total += 1;
    }

    /// Retained records, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Invocation> + '_ {
        self.records.iter()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing is retained
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of invocations recorded since creation, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.total
    }

    /// Drop every retained record
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
