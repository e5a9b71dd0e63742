//! Tickwork - Deterministic Cooperative Routines on Virtual Time
//!
//! # Overview
//!
//! `tickwork` runs many small resumable routines on a single thread against
//! a logical clock that only moves when the host says so. Each call to
//! `process_events(elapsed)` advances the clock and invokes every routine
//! whose wake-time has arrived; a routine answers "sleep Δ and call me
//! again" or "done".
//!
//! # Architecture
//!
//! - **Domain**: scheduler, wake stores, routines, events, clocks
//! - **Infrastructure**: monotonic OS clock, configuration files
//! - **Adapters**: the fixed-step main loop joining the two
//!
//! # Guarantees
//!
//! - Time only moves forward; negative intervals are treated as zero.
//! - Routines due at the same time run in registration order.
//! - A routine registered or rescheduled during a tick never runs in that
//!   same tick, even with a zero delay.
//! - A canceled routine is never invoked again.
//! - Identical call sequences produce identical invocation sequences.
//!
//! # Usage
//!
//! ```rust
//! use tickwork::{segmented, Scheduler, Yield};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mut scheduler = Scheduler::new();
//!
//! let sink = Rc::clone(&log);
//! scheduler.run_routine(
//!     segmented(0u32, move |segment, hits: &mut u32, ctx| {
//!         *hits += 1;
//!         sink.borrow_mut().push((segment, ctx.now()));
//!         match segment {
//!             0 => Yield::to(1, 10),
//!             _ => Yield::Finish,
//!         }
//!     }),
//!     5,
//! );
//!
//! while scheduler.process_events(5) {}
//! assert_eq!(*log.borrow(), vec![(0, 5), (1, 15)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod infrastructure;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-export Primary Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Scheduler types
pub use domain::{
    normalize, Context, RoutineId, Scheduler, SchedulerBuilder, SchedulerConfig, SchedulerError,
    SleepTime, Step, VirtualTime,
};

// Routine types
pub use domain::{segmented, ResumePoint, Routine, Segment, Segmented, Yield};

// Wake stores
pub use domain::{HeapStore, SortedStore, WakeStore};

// Events and clocks
pub use domain::{EventSimulator, EventType, GameClock, GameClockRemainder};

// Main loop
pub use adapters::{FrameReport, MainLoop};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
