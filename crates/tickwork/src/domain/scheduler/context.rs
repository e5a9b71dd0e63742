//! Routine Context - The Reentrant Scheduler Surface
//!
//! # Two-phase Discipline
//!
//! While the scheduler drains due slots it holds `&mut self`, so a running
//! body cannot touch the live wake store. Instead it receives a
//! [`Context`]: a view onto the *staging area*. Everything a body asks for
//! is buffered there and applied when the drain ends:
//!
//! ```text
//! process_events(elapsed)
//!   │
//!   ├─ drain ─────────────────────────────────────────────┐
//!   │    pop_due(now) ──> body(&mut Context)               │
//!   │                         │ run()    ──> staging.spawned
//!   │                         │ cancel() ──> staging.{spawned, rescheduled,
//!   │                         │                  canceled, cancel_current}
//!   │                         ▼                            │
//!   │                   Sleep(Δ) ──> staging.rescheduled   │
//!   │                   Done     ──> slot dropped          │
//!   ├──────────────────────────────────────────────────────┘
//!   └─ merge: canceled → spawned/rescheduled → wake store
//! ```
//!
//! Nothing staged can be selected by the drain that staged it, which bounds
//! every drain by the number of slots that were due when it started.

use super::types::{normalize, RoutineId, SchedulerError, SleepTime, Step, VirtualTime};
use crate::domain::routine::{Routine, RoutineSlot};
use crate::domain::store::WakeStore;
use std::collections::BTreeSet;

/// Effects produced during one drain, merged when it ends
#[derive(Debug, Default)]
pub(crate) struct Staging {
    /// Routines registered by bodies
    pub(crate) spawned: Vec<RoutineSlot>,

    /// Slots whose bodies asked to continue
    pub(crate) rescheduled: Vec<RoutineSlot>,

    /// Cancellations targeting slots still in the wake store
    pub(crate) canceled: BTreeSet<RoutineId>,

    /// The running body canceled its own routine
    cancel_current: bool,
}

impl Staging {
    /// Consume the self-cancel flag of the invocation that just returned
    pub(crate) fn take_cancel_current(&mut self) -> bool {
        std::mem::take(&mut self.cancel_current)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.spawned.is_empty()
            && self.rescheduled.is_empty()
            && self.canceled.is_empty()
            && !self.cancel_current
    }

    fn cancel(&mut self, id: RoutineId, current: RoutineId, store: &dyn WakeStore) -> bool {
        if id == current {
            return !std::mem::replace(&mut self.cancel_current, true);
        }
        if let Some(at) = self.spawned.iter().position(|slot| slot.id() == id) {
            self.spawned.remove(at);
            return true;
        }
        if let Some(at) = self.rescheduled.iter().position(|slot| slot.id() == id) {
            self.rescheduled.remove(at);
            return true;
        }
        store.contains(id) && self.canceled.insert(id)
    }
}

/// Allocate the next routine identity
#[inline]
pub(crate) fn allocate_id(next_id: &mut u64) -> RoutineId {
    let id = RoutineId::new(*next_id);
    *next_id += 1;
    id
}

/// Scheduler surface available to a running body
///
/// Registrations made through the context become eligible on the *next*
/// `process_events` call. Cancellations take effect immediately from the
/// routine's point of view: a canceled routine is never invoked again.
pub struct Context<'a> {
    now: VirtualTime,
    current: RoutineId,
    next_id: &'a mut u64,
    store: &'a dyn WakeStore,
    staging: &'a mut Staging,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        now: VirtualTime,
        current: RoutineId,
        next_id: &'a mut u64,
        store: &'a dyn WakeStore,
        staging: &'a mut Staging,
    ) -> Self {
        Self {
            now,
            current,
            next_id,
            store,
            staging,
        }
    }

    /// Current virtual time
    #[inline]
    pub fn now(&self) -> VirtualTime {
        self.now
    }

    /// Identity of the routine being invoked
    #[inline]
    pub fn id(&self) -> RoutineId {
        self.current
    }

    /// Register a closure; it becomes eligible on the next tick at the earliest
    pub fn run<F>(&mut self, body: F, delay: SleepTime) -> RoutineId
    where
        F: FnMut(&mut Context<'_>) -> Step + 'static,
    {
        self.stage(Box::new(body), normalize(delay))
    }

    /// Register any [`Routine`]
    pub fn run_routine<R>(&mut self, routine: R, delay: SleepTime) -> RoutineId
    where
        R: Routine + 'static,
    {
        self.stage(Box::new(routine), normalize(delay))
    }

    /// Register a closure, rejecting a negative delay
    pub fn try_run<F>(&mut self, body: F, delay: SleepTime) -> Result<RoutineId, SchedulerError>
    where
        F: FnMut(&mut Context<'_>) -> Step + 'static,
    {
        if delay < 0 {
            return Err(SchedulerError::NegativeDelay { delay });
        }
        Ok(self.stage(Box::new(body), delay as VirtualTime))
    }

    /// Cancel a routine; unknown or finished identities are ignored
    ///
    /// Canceling the running routine lets the current invocation finish and
    /// then destroys the slot whatever the body returns.
    pub fn cancel(&mut self, id: RoutineId) -> bool {
        let canceled = self.staging.cancel(id, self.current, self.store);
        if canceled {
            tracing::debug!(%id, by = %self.current, "routine canceled during drain");
        }
        canceled
    }

    /// Live routines, as seen from inside the drain
    ///
    /// Counts the running routine (unless it canceled itself), slots still
    /// in the wake store and slots waiting to be reinserted. Routines
    /// registered during this drain are not counted until it finishes.
    pub fn proc_count(&self) -> usize {
        let running = usize::from(!self.staging.cancel_current);
        self.store.len() - self.staging.canceled.len() + self.staging.rescheduled.len() + running
    }

    fn stage(&mut self, body: Box<dyn Routine>, delay: VirtualTime) -> RoutineId {
        let id = allocate_id(self.next_id);
        let wake_at = self.now.saturating_add(delay);
        self.staging.spawned.push(RoutineSlot::new(id, wake_at, body));
        tracing::debug!(%id, wake_at, parent = %self.current, "routine staged");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::routine::test_slot;
    use crate::domain::store::SortedStore;

    fn idle(_ctx: &mut Context<'_>) -> Step {
        Step::Done
    }

    #[test]
    fn test_allocate_id_is_monotonic() {
        let mut next = 5;
        assert_eq!(allocate_id(&mut next), RoutineId::new(5));
        assert_eq!(allocate_id(&mut next), RoutineId::new(6));
        assert_eq!(next, 7);
    }

    #[test]
    fn test_context_stages_registrations() {
        let store = SortedStore::new();
        let mut staging = Staging::default();
        let mut next_id = 10;

        let mut ctx = Context::new(100, RoutineId::new(0), &mut next_id, &store, &mut staging);
        let id = ctx.run(idle, 25);
        assert_eq!(id, RoutineId::new(10));
        assert_eq!(ctx.proc_count(), 1);

        assert_eq!(staging.spawned.len(), 1);
        assert_eq!(staging.spawned[0].wake_at(), 125);
        assert_eq!(next_id, 11);
    }

    #[test]
    fn test_context_cancel_targets() {
        let mut store = SortedStore::new();
        store.insert(test_slot(1, 500));
        let mut staging = Staging::default();
        staging.rescheduled.push(test_slot(2, 300));
        let mut next_id = 3;

        let current = RoutineId::new(0);
        let mut ctx = Context::new(0, current, &mut next_id, &store, &mut staging);
        let spawned = ctx.run(idle, 0);
        assert_eq!(ctx.proc_count(), 3);

        assert!(ctx.cancel(spawned));
        assert!(ctx.cancel(RoutineId::new(2)));
        assert!(ctx.cancel(RoutineId::new(1)));
        assert!(!ctx.cancel(RoutineId::new(1)));
        assert!(!ctx.cancel(RoutineId::new(99)));
        assert!(ctx.cancel(current));
        assert!(!ctx.cancel(current));
        assert_eq!(ctx.proc_count(), 0);

        assert!(staging.spawned.is_empty());
        assert!(staging.rescheduled.is_empty());
        assert!(staging.canceled.contains(&RoutineId::new(1)));
        assert!(staging.take_cancel_current());
        assert!(!staging.take_cancel_current());
    }

    #[test]
    fn test_context_try_run_rejects_negative_delay() {
        let store = SortedStore::new();
        let mut staging = Staging::default();
        let mut next_id = 0;

        let mut ctx = Context::new(0, RoutineId::new(0), &mut next_id, &store, &mut staging);
        assert_eq!(
            ctx.try_run(idle, -1),
            Err(SchedulerError::NegativeDelay { delay: -1 })
        );
        assert!(staging.is_empty());
    }
}
