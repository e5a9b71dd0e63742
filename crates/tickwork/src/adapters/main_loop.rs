//! Main Loop - Fixed-step Driver for the Event Simulator
//!
//! ```text
//! frame():
//!     GameClock::run_updates(|step| {
//!         per_step(&mut simulator, step)   (optional)
//!         simulator.process_events(step)
//!     })
//! ```
//!
//! The simulator advances only in whole steps, so replaying the same wall
//! clock readings produces the same routine invocations.

use crate::domain::clock::{ClockError, GameClock, GameClockRemainder, TimeSource};
use crate::domain::events::EventSimulator;
use crate::domain::store::{HeapStore, WakeStore};

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Fixed steps simulated this frame
    pub updates: u32,
    /// Time left for the next frame
    pub remainder: GameClockRemainder,
    /// Whether routines remain pending
    pub pending: bool,
}

/// Game clock plus event simulator
///
/// # Example
///
/// ```rust
/// use tickwork::adapters::MainLoop;
/// use tickwork::domain::clock::ManualSource;
/// use tickwork::domain::events::EventType;
///
/// let wall = ManualSource::new();
/// let mut main_loop = MainLoop::new(wall.clone(), 10).unwrap();
/// main_loop.simulator_mut().emit(EventType(1), (), 25);
///
/// wall.advance(32);
/// let report = main_loop.frame();
/// assert_eq!(report.updates, 3);
/// assert_eq!(report.remainder.ms, 2);
/// assert!(!report.pending);
/// ```
pub struct MainLoop<T: TimeSource, S: WakeStore = HeapStore> {
    clock: GameClock<T>,
    simulator: EventSimulator<S>,
}

impl<T: TimeSource> MainLoop<T, HeapStore> {
    /// Create a loop stepping a fresh simulator every `step_ms`
    pub fn new(source: T, step_ms: i64) -> Result<Self, ClockError> {
        Ok(Self::with_parts(GameClock::new(source, step_ms)?, EventSimulator::new()))
    }
}

impl<T: TimeSource, S: WakeStore> MainLoop<T, S> {
    /// Assemble a loop from an existing clock and simulator
    pub fn with_parts(clock: GameClock<T>, simulator: EventSimulator<S>) -> Self {
        Self { clock, simulator }
    }

    /// Run the fixed steps owed since the last frame
    pub fn frame(&mut self) -> FrameReport {
        self.frame_with(|_, _| {})
    }

    /// Like [`frame`](Self::frame), calling `per_step` before each drain
    pub fn frame_with<F>(&mut self, mut per_step: F) -> FrameReport
    where
        F: FnMut(&mut EventSimulator<S>, i64),
    {
        let simulator = &mut self.simulator;
        let mut updates = 0u32;
        let mut pending = simulator.proc_count() > 0;

        let remainder = self.clock.run_updates(|step| {
            per_step(simulator, step);
            pending = simulator.process_events(step);
            updates += 1;
        });

        tracing::trace!(updates, remainder_ms = remainder.ms, pending, "frame complete");
        FrameReport {
            updates,
            remainder,
            pending,
        }
    }

    /// Fixed step length in milliseconds
    pub fn step_ms(&self) -> i64 {
        self.clock.step_ms()
    }

    /// The simulator
    pub fn simulator(&self) -> &EventSimulator<S> {
        &self.simulator
    }

    /// The simulator, mutably
    pub fn simulator_mut(&mut self) -> &mut EventSimulator<S> {
        &mut self.simulator
    }
}
