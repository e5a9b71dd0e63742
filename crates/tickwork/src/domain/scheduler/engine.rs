//! Scheduler Engine - Registration, Drain and Merge
//!
//! # Architecture
//!
//! ```text
//! Scheduler<S: WakeStore>
//!   ├─ store: S                  live slots, earliest first
//!   ├─ staging: Staging          effects produced during a drain
//!   ├─ now: VirtualTime          advanced only by process_events
//!   ├─ next_id: u64              identity allocator
//!   └─ trace: InvocationTrace    bounded invocation record
//! ```
//!
//! # Tick Algorithm
//!
//! ```text
//! process_events(elapsed):
//!     now += elapsed
//!     while let Some(slot) = store.pop_due(now):
//!         if staged-canceled(slot): drop it; continue
//!         step = slot.body(Context { staging, .. })
//!         match step:
//!             Sleep(Δ) => slot.wake_at = now + Δ; staging.rescheduled.push(slot)
//!             Done     => drop slot
//!     merge(staging) into store
//!     return proc_count() > 0
//! ```
//!
//! Rescheduled slots wait in staging like new registrations, so a body that
//! returns `Sleep(0)` runs at most once per call.

use super::config::{ConfigError, SchedulerConfig};
use super::context::{allocate_id, Context, Staging};
use super::trace::{Invocation, InvocationTrace, Outcome};
use super::types::{normalize, RoutineId, SchedulerError, SleepTime, Step, VirtualTime};
use crate::domain::routine::{Routine, RoutineSlot};
use crate::domain::store::{HeapStore, WakeStore};

/// Deterministic cooperative routine scheduler
///
/// # Example
///
/// ```rust
/// use tickwork::domain::scheduler::{Scheduler, Step};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let history = Rc::new(RefCell::new(String::new()));
/// let mut scheduler = Scheduler::new();
///
/// let a = Rc::clone(&history);
/// scheduler.run(move |_| { a.borrow_mut().push('a'); Step::Done }, 30);
/// let b = Rc::clone(&history);
/// scheduler.run(move |_| { b.borrow_mut().push('b'); Step::Done }, 20);
///
/// assert!(scheduler.process_events(16));
/// assert!(!scheduler.process_events(16));
/// assert_eq!(*history.borrow(), "ba");
/// ```
pub struct Scheduler<S: WakeStore = HeapStore> {
    store: S,
    staging: Staging,
    now: VirtualTime,
    next_id: u64,
    trace: InvocationTrace,
}

impl Scheduler<HeapStore> {
    /// Create a scheduler over a [`HeapStore`] with default configuration
    pub fn new() -> Self {
        Self::with_store(HeapStore::new())
    }
}

impl Default for Scheduler<HeapStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WakeStore> Scheduler<S> {
    /// Create a scheduler over a custom wake store
    ///
    /// Anything already in the store is discarded.
    pub fn with_store(store: S) -> Self {
        Self::from_parts(store, &SchedulerConfig::default())
    }

    /// Create a scheduler from a validated configuration
    pub fn with_config(store: S, config: &SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(store, config))
    }

    fn from_parts(mut store: S, config: &SchedulerConfig) -> Self {
        store.clear();
        Self {
            store,
            staging: Staging::default(),
            now: config.start_time,
            next_id: 0,
            trace: InvocationTrace::with_capacity(config.trace_capacity),
        }
    }

    /// Current virtual time
    #[inline]
    pub fn now(&self) -> VirtualTime {
        self.now
    }

    /// Number of live, non-canceled routines
    #[inline]
    pub fn proc_count(&self) -> usize {
        self.store.len()
    }

    /// Check if no routine is pending
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.store.is_empty()
    }

    /// Wake-time of the earliest pending routine
    pub fn next_wake(&self) -> Option<VirtualTime> {
        self.store.next_wake()
    }

    /// Recorded invocations
    pub fn trace(&self) -> &InvocationTrace {
        &self.trace
    }

    /// The wake store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a closure to run after `delay` (negative delays count as 0)
    ///
    /// The body is never invoked here, even for a zero delay; it waits for
    /// the next [`process_events`](Self::process_events).
    pub fn run<F>(&mut self, body: F, delay: SleepTime) -> RoutineId
    where
        F: FnMut(&mut Context<'_>) -> Step + 'static,
    {
        self.register(Box::new(body), normalize(delay))
    }

    /// Register any [`Routine`] to run after `delay`
    pub fn run_routine<R>(&mut self, routine: R, delay: SleepTime) -> RoutineId
    where
        R: Routine + 'static,
    {
        self.register(Box::new(routine), normalize(delay))
    }

    /// Register a closure, rejecting a negative delay
    pub fn try_run<F>(&mut self, body: F, delay: SleepTime) -> Result<RoutineId, SchedulerError>
    where
        F: FnMut(&mut Context<'_>) -> Step + 'static,
    {
        if delay < 0 {
            return Err(SchedulerError::NegativeDelay { delay });
        }
        Ok(self.register(Box::new(body), delay as VirtualTime))
    }

    /// Cancel a routine
    ///
    /// Returns `true` if a pending routine was removed. Unknown, completed
    /// and already-canceled identities are ignored.
    pub fn cancel(&mut self, id: RoutineId) -> bool {
        match self.store.remove(id) {
            Some(slot) => {
                tracing::debug!(%id, wake_at = slot.wake_at(), "routine canceled");
                true
            }
            None => {
                tracing::trace!(%id, "cancel ignored: routine not pending");
                false
            }
        }
    }

    /// Advance the clock and invoke every due routine once
    ///
    /// Returns whether any routine is still pending afterwards, so a caller
    /// can `while scheduler.process_events(step) {}` until idle.
    pub fn process_events(&mut self, elapsed: SleepTime) -> bool {
        self.now = self.now.saturating_add(normalize(elapsed));
        let now = self.now;

        let mut invoked = 0usize;
        while let Some(mut slot) = self.store.pop_due(now) {
            let id = slot.id();
            if self.staging.canceled.remove(&id) {
                tracing::trace!(%id, "skipping routine canceled during drain");
                continue;
            }

            let step = {
                let mut ctx = Context::new(now, id, &mut self.next_id, &self.store, &mut self.staging);
                slot.resume(&mut ctx)
            };
            invoked += 1;

            if self.staging.take_cancel_current() {
                slot.cancel();
            }
            let outcome = self.settle(slot, step, now);
            tracing::trace!(%id, now, %step, %outcome, "routine invoked");
            self.trace.record(Invocation { at: now, id, outcome });
        }

        self.merge();
        tracing::debug!(now, invoked, pending = self.store.len(), "drain complete");
        !self.store.is_empty()
    }

    fn register(&mut self, body: Box<dyn Routine>, delay: VirtualTime) -> RoutineId {
        let id = allocate_id(&mut self.next_id);
        let wake_at = self.now.saturating_add(delay);
        self.store.insert(RoutineSlot::new(id, wake_at, body));
        tracing::debug!(%id, wake_at, "routine registered");
        id
    }

    /// Decide the fate of a slot whose body just returned
    fn settle(&mut self, mut slot: RoutineSlot, step: Step, now: VirtualTime) -> Outcome {
        if slot.is_canceled() {
            return Outcome::Canceled;
        }
        match step {
            Step::Sleep(delta) => {
                let wake_at = now.saturating_add(normalize(delta));
                slot.set_wake_at(wake_at);
                self.staging.rescheduled.push(slot);
                Outcome::Rescheduled { wake_at }
            }
            Step::Done => Outcome::Completed,
        }
    }

    /// Apply staged effects to the wake store
    fn merge(&mut self) {
        if self.staging.is_empty() {
            return;
        }

        let canceled = std::mem::take(&mut self.staging.canceled);
        for id in &canceled {
            self.store.remove(*id);
        }

        let rescheduled = self.staging.rescheduled.len();
        let spawned = self.staging.spawned.len();
        for slot in self.staging.rescheduled.drain(..) {
            self.store.insert(slot);
        }
        for slot in self.staging.spawned.drain(..) {
            self.store.insert(slot);
        }

        tracing::debug!(
            canceled = canceled.len(),
            rescheduled,
            spawned,
            "staging merged"
        );
    }
}
