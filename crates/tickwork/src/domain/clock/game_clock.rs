//! Game Clock - Fixed-step Catch-up
//!
//! # Algorithm
//!
//! ```text
//! run_updates(f):
//!     lag += elapsed since last frame    (capped at max_lag)
//!     while lag >= step:
//!         f(step); lag -= step
//!     return { ms: lag, percent_of_frame: lag / step }
//! ```
//!
//! Logic always advances by exactly `step` milliseconds. The remainder is
//! what a renderer interpolates over.

use super::source::TimeSource;
use super::timer::Timer;

/// Clock configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// The fixed step must be positive
    #[error("invalid update step {step}ms: must be positive")]
    InvalidStep {
        /// The rejected step
        step: i64,
    },

    /// The lag cap must hold at least one step
    #[error("invalid max lag {max_lag}ms: must be at least one step of {step}ms")]
    InvalidMaxLag {
        /// The rejected cap
        max_lag: i64,
        /// The configured step
        step: i64,
    },
}

/// Time left unsimulated by [`GameClock::run_updates`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameClockRemainder {
    /// Milliseconds not yet simulated
    pub ms: i64,
    /// Fraction of one step not yet simulated, in `[0, 1)`
    pub percent_of_frame: f64,
}

/// Runs logic in fixed slices until it has caught up with real time
///
/// # Example
///
/// ```rust
/// use tickwork::domain::clock::{GameClock, ManualSource};
///
/// let handle = ManualSource::new();
/// let mut clock = GameClock::new(handle.clone(), 16).unwrap();
///
/// handle.advance(40);
/// let mut steps = Vec::new();
/// let remainder = clock.run_updates(|ms| steps.push(ms));
///
/// assert_eq!(steps, vec![16, 16]);
/// assert_eq!(remainder.ms, 8);
/// assert_eq!(remainder.percent_of_frame, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct GameClock<S: TimeSource> {
    timer: Timer<S>,
    step_ms: i64,
    lag: i64,
    max_lag: Option<i64>,
    previous: i64,
}

impl<S: TimeSource> GameClock<S> {
    /// Create a clock whose logic runs in `step_ms` slices
    pub fn new(source: S, step_ms: i64) -> Result<Self, ClockError> {
        if step_ms <= 0 {
            return Err(ClockError::InvalidStep { step: step_ms });
        }
        let mut timer = Timer::new(source);
        let previous = timer.get_time();
        Ok(Self {
            timer,
            step_ms,
            lag: 0,
            max_lag: None,
            previous,
        })
    }

    /// Cap accumulated lag, dropping time beyond it after a stall
    pub fn with_max_lag(mut self, max_lag: i64) -> Result<Self, ClockError> {
        if max_lag < self.step_ms {
            return Err(ClockError::InvalidMaxLag {
                max_lag,
                step: self.step_ms,
            });
        }
        self.max_lag = Some(max_lag);
        Ok(self)
    }

    /// Fixed step length in milliseconds
    #[inline]
    pub fn step_ms(&self) -> i64 {
        self.step_ms
    }

    /// Call `f(step_ms)` until the simulation has caught up
    pub fn run_updates<F>(&mut self, mut f: F) -> GameClockRemainder
    where
        F: FnMut(i64),
    {
        self.start_frame();
        while self.run_game_logic() {
            f(self.step_ms);
        }
        self.remainder()
    }

    fn start_frame(&mut self) -> i64 {
        let now = self.timer.get_time();
        let elapsed = (now - self.previous).max(0);
        self.previous = now;

        self.lag = self.lag.saturating_add(elapsed);
        if let Some(cap) = self.max_lag {
            if self.lag > cap {
                tracing::warn!(lag = self.lag, cap, "game clock fell behind; dropping lag");
                self.lag = cap;
            }
        }
        elapsed
    }

    fn run_game_logic(&mut self) -> bool {
        if self.lag >= self.step_ms {
            self.lag -= self.step_ms;
            true
        } else {
            false
        }
    }

    fn remainder(&self) -> GameClockRemainder {
        GameClockRemainder {
            ms: self.lag,
            percent_of_frame: self.lag as f64 / self.step_ms as f64,
        }
    }
}
