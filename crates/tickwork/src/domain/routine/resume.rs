//! Resume Points - Multi-segment Routine Bodies
//!
//! # Design
//!
//! A multi-segment body is a private state machine. Its states are
//! "segment N runs next", numbered in appearance order, plus one terminal
//! state:
//!
//! ```text
//!  At(0) ──Yield::To{next:1}──> At(1) ──Yield::To{next:2}──> At(2) ...
//!    │                            │                            │
//!    └────────Yield::Finish───────┴──────────────┬─────────────┘
//!                                                ▼
//!                                            Exhausted
//! ```
//!
//! The body is a plain function of `(segment, &mut locals, ctx)` that
//! dispatches on the segment tag at entry. It can only suspend by returning
//! a [`Yield`], and every non-terminal `Yield` names the segment that follows,
//! so the resume point always records where execution continues.
//!
//! # Ownership
//!
//! The [`ResumePoint`] lives inside its [`Segmented`] routine, which is
//! boxed into exactly one routine slot. It is never handed out: the body
//! only ever sees the locals, and a segmented routine cannot be registered
//! twice because registration takes it by value.

use super::Routine;
use crate::domain::scheduler::{Context, SleepTime, Step};

/// Position of a segmented routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// This segment runs on the next invocation
    At(u32),

    /// The chain is finished; no further invocation
    Exhausted,
}

impl Segment {
    /// The default state: start of the body
    pub const START: Segment = Segment::At(0);

    /// Check if the chain is finished
    #[inline(always)]
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Segment::Exhausted)
    }
}

impl Default for Segment {
    fn default() -> Self {
        Segment::START
    }
}

/// How a segment ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Yield {
    /// Suspend; resume at segment `next` after `delay`
    To {
        /// Segment to run on the next invocation
        next: u32,
        /// Continuation delay
        delay: SleepTime,
    },

    /// Terminal suspension
    Finish,
}

impl Yield {
    /// Shorthand for `Yield::To { next, delay }`
    #[inline(always)]
    pub const fn to(next: u32, delay: SleepTime) -> Self {
        Yield::To { next, delay }
    }
}

/// Persisted execution position and locals of a segmented routine
#[derive(Debug)]
pub struct ResumePoint<L> {
    next: Segment,
    locals: L,
}

impl<L> ResumePoint<L> {
    fn new(locals: L) -> Self {
        Self {
            next: Segment::START,
            locals,
        }
    }

    /// Segment that runs on the next invocation
    #[inline]
    pub fn next(&self) -> Segment {
        self.next
    }

    /// Locals preserved across suspensions
    #[inline]
    pub fn locals(&self) -> &L {
        &self.locals
    }
}

/// A routine written as a sequence of segments
///
/// # Example
///
/// ```rust
/// use tickwork::domain::routine::{segmented, Yield};
/// use tickwork::domain::scheduler::Scheduler;
///
/// let mut scheduler = Scheduler::new();
/// scheduler.run_routine(
///     segmented(0u32, |segment, hits, _ctx| match segment {
///         0 => {
///             *hits += 1;
///             Yield::to(1, 10)
///         }
///         1 => {
///             *hits += 1;
///             Yield::Finish
///         }
///         _ => Yield::Finish,
///     }),
///     0,
/// );
///
/// scheduler.process_events(0);
/// scheduler.process_events(10);
/// assert_eq!(scheduler.proc_count(), 0);
/// ```
pub struct Segmented<L, F> {
    point: ResumePoint<L>,
    body: F,
}

impl<L, F> Segmented<L, F>
where
    F: FnMut(u32, &mut L, &mut Context<'_>) -> Yield,
{
    /// Wrap a segment-dispatching body and its initial locals
    pub fn new(locals: L, body: F) -> Self {
        Self {
            point: ResumePoint::new(locals),
            body,
        }
    }

    /// Read-only view of the resume point
    pub fn resume_point(&self) -> &ResumePoint<L> {
        &self.point
    }
}

/// Build a [`Segmented`] routine
pub fn segmented<L, F>(locals: L, body: F) -> Segmented<L, F>
where
    F: FnMut(u32, &mut L, &mut Context<'_>) -> Yield,
{
    Segmented::new(locals, body)
}

impl<L, F> Routine for Segmented<L, F>
where
    F: FnMut(u32, &mut L, &mut Context<'_>) -> Yield,
{
    fn resume(&mut self, ctx: &mut Context<'_>) -> Step {
        let Segment::At(segment) = self.point.next else {
            return Step::Done;
        };

        match (self.body)(segment, &mut self.point.locals, ctx) {
            Yield::To { next, delay } => {
                self.point.next = Segment::At(next);
                Step::Sleep(delay)
            }
            Yield::Finish => {
                self.point.next = Segment::Exhausted;
                Step::Done
            }
        }
    }
}
