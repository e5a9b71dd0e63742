//! Routine Slot - A Registered Unit of Work

use super::Routine;
use crate::domain::scheduler::{Context, RoutineId, Step, VirtualTime};
use crate::domain::store::WakeKey;
use std::fmt;

/// A registered routine: identity, wake-time, body, canceled flag
///
/// # Invariant
///
/// `wake_at` is never earlier than the virtual time at which the slot was
/// last inserted into a wake store. Only the scheduler moves it, and only
/// forward (`now + Δ` with Δ ≥ 0).
pub struct RoutineSlot {
    id: RoutineId,
    wake_at: VirtualTime,
    body: Box<dyn Routine>,
    canceled: bool,
}

impl RoutineSlot {
    pub(crate) fn new(id: RoutineId, wake_at: VirtualTime, body: Box<dyn Routine>) -> Self {
        Self {
            id,
            wake_at,
            body,
            canceled: false,
        }
    }

    /// Routine identity
    #[inline]
    pub fn id(&self) -> RoutineId {
        self.id
    }

    /// Virtual time at which the routine becomes due
    #[inline]
    pub fn wake_at(&self) -> VirtualTime {
        self.wake_at
    }

    /// Ordering key used by the wake stores
    #[inline]
    pub fn key(&self) -> WakeKey {
        WakeKey::new(self.wake_at, self.id)
    }

    /// Check if the slot was canceled while its body was running
    #[inline]
    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    pub(crate) fn set_wake_at(&mut self, wake_at: VirtualTime) {
        self.wake_at = wake_at;
    }

    pub(crate) fn cancel(&mut self) {
        self.canceled = true;
    }

    pub(crate) fn resume(&mut self, ctx: &mut Context<'_>) -> Step {
        self.body.resume(ctx)
    }
}

impl fmt::Debug for RoutineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutineSlot")
            .field("id", &self.id)
            .field("wake_at", &self.wake_at)
            .field("canceled", &self.canceled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn test_slot(id: u64, wake_at: VirtualTime) -> RoutineSlot {
    fn done(_ctx: &mut Context<'_>) -> Step {
        Step::Done
    }
    RoutineSlot::new(RoutineId::new(id), wake_at, Box::new(done))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_accessors() {
        let mut slot = test_slot(7, 100);
        assert_eq!(slot.id(), RoutineId::new(7));
        assert_eq!(slot.wake_at(), 100);
        assert!(!slot.is_canceled());

        slot.set_wake_at(150);
        slot.cancel();
        assert_eq!(slot.key(), WakeKey::new(150, RoutineId::new(7)));
        assert!(slot.is_canceled());
    }

    #[test]
    fn test_slot_debug_omits_body() {
        let rendered = format!("{:?}", test_slot(1, 5));
        assert!(rendered.contains("wake_at: 5"));
        assert!(!rendered.contains("body"));
    }
}
