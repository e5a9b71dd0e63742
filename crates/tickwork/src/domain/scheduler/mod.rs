//! Scheduler Module - Deterministic Cooperative Routine Scheduling
//!
//! # Overview
//!
//! The scheduler keeps a set of routines, each due at some virtual time.
//! Every call to [`Scheduler::process_events`] advances the clock by the
//! caller-supplied elapsed amount and invokes each due routine exactly once,
//! earliest wake-time first, ties broken by registration order.
//!
//! ```text
//! domain/scheduler/
//! ├── mod.rs       public surface
//! ├── types.rs     VirtualTime, SleepTime, RoutineId, Step, SchedulerError
//! ├── context.rs   Context (what a running body can do) + staging area
//! ├── engine.rs    Scheduler (registration, drain, merge)
//! ├── builder.rs   SchedulerBuilder
//! ├── config.rs    SchedulerConfig (TOML)
//! └── trace.rs     InvocationTrace
//! ```
//!
//! # Determinism
//!
//! The scheduler never reads a wall clock, never spawns threads and never
//! iterates a hash map to pick work. Given the same sequence of calls it
//! produces the same sequence of invocations, on every backend.

mod builder;
mod config;
mod context;
mod engine;
mod trace;
mod types;

pub use builder::SchedulerBuilder;
pub use config::{ConfigError, SchedulerConfig, MAX_TRACE_CAPACITY};
pub use context::Context;
pub use engine::Scheduler;
pub use trace::{Invocation, InvocationTrace, Outcome};
pub use types::{normalize, RoutineId, SchedulerError, SleepTime, Step, VirtualTime};
