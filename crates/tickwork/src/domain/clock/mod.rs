//! Clock Module - Measuring Real Time, Slicing Simulated Time
//!
//! # Overview
//!
//! The scheduler only understands virtual time. This module is the bridge
//! from a wall clock to fixed, replayable slices of virtual time:
//!
//! ```text
//! TimeSource (ms)          MonotonicSource | ManualSource
//!      │
//!      ├─ Timer            elapsed ms since creation
//!      ├─ FrameTimer       per-frame delta, fps, speed modifier
//!      └─ GameClock        fixed-step catch-up: f(step) until lag < step
//! ```
//!
//! Because game logic only ever sees whole steps from [`GameClock`], the
//! same input sequence replays to the same state whatever the hardware
//! speed. [`ManualSource`] makes the wall clock itself scriptable.

mod game_clock;
mod source;
mod timer;

pub use game_clock::{ClockError, GameClock, GameClockRemainder};
pub use source::{ManualSource, TimeSource};
pub use timer::{FrameTimer, Timer};
