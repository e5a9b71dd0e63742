//! Timer and FrameTimer

use super::source::TimeSource;

/// Elapsed real time since creation
#[derive(Debug, Clone)]
pub struct Timer<S: TimeSource> {
    source: S,
    origin: i64,
    current: i64,
}

impl<S: TimeSource> Timer<S> {
    /// Start a timer at the source's current reading
    pub fn new(mut source: S) -> Self {
        let origin = source.now_ms();
        Self {
            source,
            origin,
            current: 0,
        }
    }

    /// Refresh and return milliseconds elapsed since creation
    pub fn get_time(&mut self) -> i64 {
        self.current = self.source.now_ms().saturating_sub(self.origin);
        self.current
    }

    /// Value from the last refresh
    #[inline]
    pub fn cached_time(&self) -> i64 {
        self.current
    }
}

/// Measures frames of a game loop
///
/// # Example
///
/// ```rust
/// use tickwork::domain::clock::{FrameTimer, ManualSource};
///
/// let handle = ManualSource::new();
/// let mut frames = FrameTimer::new(handle.clone(), None);
///
/// handle.advance(20);
/// assert_eq!(frames.next_frame(), 20);
/// assert_eq!(frames.fps(), 50.0);
/// assert_eq!(frames.speed_mod(), 0.02);
/// ```
#[derive(Debug, Clone)]
pub struct FrameTimer<S: TimeSource> {
    timer: Timer<S>,
    frame_start: i64,
    frame_count: u32,
    fps: f32,
    average_fps: f32,
    speed_mod: f32,
    max_frame_diff: Option<f32>,
}

impl<S: TimeSource> FrameTimer<S> {
    /// Create a frame timer
    ///
    /// `max_frame_diff` caps [`speed_mod`](Self::speed_mod), so a stall
    /// (a paused window, a debugger) does not produce one enormous frame.
    pub fn new(source: S, max_frame_diff: Option<f32>) -> Self {
        let mut timer = Timer::new(source);
        let frame_start = timer.get_time();
        Self {
            timer,
            frame_start,
            frame_count: 0,
            fps: 0.0,
            average_fps: 0.0,
            speed_mod: 0.0,
            max_frame_diff,
        }
    }

    /// Signal the next frame; returns the milliseconds since the last one
    ///
    /// Must be called once per frame.
    pub fn next_frame(&mut self) -> i64 {
        let now = self.timer.get_time();
        let diff = now - self.frame_start;
        self.frame_start = now;

        self.speed_mod = diff as f32 / 1000.0;
        if let Some(cap) = self.max_frame_diff {
            self.speed_mod = self.speed_mod.min(cap);
        }
        if diff > 0 {
            self.fps = 1000.0 / diff as f32;
        }

        let frames = self.frame_count as f32;
        self.average_fps = (self.average_fps * frames + self.fps) / (frames + 1.0);
        self.frame_count = self.frame_count.saturating_add(1);
        diff
    }

    /// Frames per second, from the last frame
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Mean of every per-frame fps reading
    #[inline]
    pub fn average_fps(&self) -> f32 {
        self.average_fps
    }

    /// Fraction of a second the last frame took
    #[inline]
    pub fn speed_mod(&self) -> f32 {
        self.speed_mod
    }

    /// Milliseconds since creation, as of the last frame
    #[inline]
    pub fn cached_time(&self) -> i64 {
        self.timer.cached_time()
    }
}
