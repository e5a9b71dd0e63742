//! Domain Layer - Pure Scheduling Logic
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Scheduler Module              Store Module                 │
//! │  ├─ Scheduler<S>               ├─ WakeStore (trait)         │
//! │  ├─ Context (staging view)     ├─ HeapStore                 │
//! │  ├─ SchedulerBuilder/Config    └─ SortedStore               │
//! │  └─ InvocationTrace                                         │
//! │                                                             │
//! │  Routine Module                Events Module                │
//! │  ├─ Routine (trait)            ├─ EventDispatcher           │
//! │  ├─ RoutineSlot                └─ EventSimulator<S>         │
//! │  └─ Segmented / ResumePoint                                 │
//! │                                                             │
//! │                    Clock Module                             │
//! │                    ├─ TimeSource / ManualSource             │
//! │                    ├─ Timer / FrameTimer                    │
//! │                    └─ GameClock                             │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this layer reads a wall clock, touches the file system or
//! spawns a thread.
//!
//! # Type Aliases for Convenience
//!
//! - `DefaultScheduler`: `Scheduler<HeapStore>`, for any routine count
//! - `CompactScheduler`: `Scheduler<SortedStore>`, for a handful of routines

pub mod clock;
pub mod events;
pub mod routine;
pub mod scheduler;
pub mod store;

pub use clock::{ClockError, FrameTimer, GameClock, GameClockRemainder, ManualSource, TimeSource, Timer};
pub use events::{Emitter, EventDispatcher, EventSimulator, EventType, Subscription, SubscriptionId};
pub use routine::{segmented, ResumePoint, Routine, RoutineSlot, Segment, Segmented, Yield};
pub use scheduler::{
    normalize, ConfigError, Context, Invocation, InvocationTrace, Outcome, RoutineId, Scheduler,
    SchedulerBuilder, SchedulerConfig, SchedulerError, SleepTime, Step, VirtualTime,
    MAX_TRACE_CAPACITY,
};
pub use store::{HeapStore, SortedStore, WakeKey, WakeStore};

/// Scheduler over the heap-backed wake store
pub type DefaultScheduler = Scheduler<HeapStore>;

/// Scheduler over the sorted-vector wake store
pub type CompactScheduler = Scheduler<SortedStore>;
