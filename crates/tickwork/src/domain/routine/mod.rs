//! Routine Module - Schedulable Units of Work
//!
//! # Overview
//!
//! A routine is anything the scheduler can invoke repeatedly. Each
//! invocation returns a [`Step`]: sleep for Δ and come back, or done.
//!
//! ```text
//! domain/routine/
//! ├── mod.rs      Routine trait (+ blanket impl for closures)
//! ├── resume.rs   ResumePoint, Yield, Segmented (multi-segment bodies)
//! └── slot.rs     RoutineSlot (identity + wake-time + body + canceled)
//! ```
//!
//! # Type Erasure
//!
//! Bodies are heterogeneous closures over arbitrary captured state. The
//! scheduler stores them as `Box<dyn Routine>` so every slot in the wake
//! store has the same shape, while each body keeps full ownership of its
//! captures (and, for segmented routines, of its resume point).

mod resume;
mod slot;

pub use resume::{segmented, ResumePoint, Segment, Segmented, Yield};
pub use slot::RoutineSlot;

#[cfg(test)]
pub(crate) use slot::test_slot;

use crate::domain::scheduler::{Context, Step};

/// A resumable unit of work
///
/// Implemented automatically for every `FnMut(&mut Context<'_>) -> Step`,
/// so plain closures can be registered directly.
///
/// # Example
///
/// ```rust
/// use tickwork::domain::routine::Routine;
/// use tickwork::domain::scheduler::{Context, Scheduler, Step};
///
/// struct Countdown(u32);
///
/// impl Routine for Countdown {
///     fn resume(&mut self, _ctx: &mut Context<'_>) -> Step {
///         self.0 -= 1;
///         if self.0 == 0 { Step::Done } else { Step::after(5) }
///     }
/// }
///
/// let mut scheduler = Scheduler::new();
/// scheduler.run_routine(Countdown(3), 0);
/// while scheduler.process_events(5) {}
/// assert_eq!(scheduler.proc_count(), 0);
/// ```
pub trait Routine {
    /// Run the next piece of work and say what happens afterwards
    fn resume(&mut self, ctx: &mut Context<'_>) -> Step;
}

impl<F> Routine for F
where
    F: FnMut(&mut Context<'_>) -> Step,
{
    #[inline]
    fn resume(&mut self, ctx: &mut Context<'_>) -> Step {
        self(ctx)
    }
}
