//! Scheduler Types - Foundation for the Routine Scheduler
//!
//! # Overview
//!
//! This module defines the vocabulary shared by every other part of the
//! scheduler: the virtual clock units, routine identities, the value a body
//! returns after each invocation, and the error type of the strict entry
//! points.
//!
//! # Time Units
//!
//! ```text
//! SleepTime (i64)     caller-supplied: delays, continuation Δ, elapsed
//!      │
//!      │ normalize() : negative → 0
//!      ▼
//! VirtualTime (u64)   scheduler-owned: clock value, wake-times
//! ```
//!
//! Callers speak in signed units because game code routinely computes
//! intervals by subtraction. The scheduler only ever stores non-negative
//! values, so the clock can never run backwards.

use std::fmt;

/// Virtual time, in caller-defined units (usually milliseconds)
///
/// Advanced only by the elapsed amounts passed to `process_events`.
pub type VirtualTime = u64;

/// Signed interval supplied by callers and routine bodies
pub type SleepTime = i64;

/// Normalize a caller-supplied interval
///
/// Negative intervals mean "as soon as possible" and become zero.
#[inline]
pub fn normalize(interval: SleepTime) -> VirtualTime {
    if interval < 0 {
        tracing::warn!(interval, "negative interval normalized to zero");
        0
    } else {
        interval as VirtualTime
    }
}

/// Routine identifier
///
/// Identities are handed out in strictly increasing order by one scheduler
/// and never reused. Ties between routines due at the same virtual time are
/// broken by ascending identity, which is what makes same-time wakeups run
/// in registration order.
///
/// # Example
///
/// ```rust
/// use tickwork::domain::scheduler::RoutineId;
///
/// let first = RoutineId::new(0);
/// let second = RoutineId::new(1);
///
/// assert!(first < second);
/// assert_eq!(second.as_u64(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutineId(u64);

impl RoutineId {
    /// Create a RoutineId from its raw value
    #[inline(always)]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric ID
    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Routine({})", self.0)
    }
}

/// Result of one body invocation
///
/// # State Transitions
///
/// ```text
///             Sleep(Δ)
///          ┌───────────┐
///          ▼           │
/// run ──> PENDING ──> RUNNING ──Done──> DESTROYED
///          │
///          └──cancel──> DESTROYED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Invoke again after Δ units of virtual time
    ///
    /// Δ = 0 still waits for the next `process_events` call.
    Sleep(SleepTime),

    /// The routine is finished; its slot is destroyed
    Done,
}

impl Step {
    /// Shorthand for `Step::Sleep(delay)`
    #[inline(always)]
    pub const fn after(delay: SleepTime) -> Self {
        Step::Sleep(delay)
    }

    /// Check if the routine asked to continue
    #[inline(always)]
    pub const fn is_sleep(self) -> bool {
        matches!(self, Step::Sleep(_))
    }

    /// Check if the routine finished
    #[inline(always)]
    pub const fn is_done(self) -> bool {
        matches!(self, Step::Done)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Sleep(delay) => write!(f, "SLEEP({})", delay),
            Step::Done => write!(f, "DONE"),
        }
    }
}

/// Error type for the strict scheduler entry points
///
/// The lenient operations (`run`, `cancel`, `process_events`) never fail:
/// stale identities are ignored and negative intervals are normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// A negative initial delay was passed to `try_run`
    #[error("negative delay {delay} rejected")]
    NegativeDelay {
        /// The rejected delay
        delay: SleepTime,
    },
}
