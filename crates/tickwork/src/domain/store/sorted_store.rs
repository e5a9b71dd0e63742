//! Sorted Store
//!
//! # Design
//! A single `Vec<RoutineSlot>` kept sorted by `(wake_at, id)` in
//! *descending* order, so the earliest slot is always at the end:
//!
//! ```text
//! index:   0          1          2          3
//!        [ (90, #4) | (40, #2) | (40, #1) | (10, #3) ]
//!                                            ▲
//!                                        pop_due()
//! ```
//!
//! - `pop_due`: O(1), pops from the end
//! - `insert`: O(log n) search + O(n) shift
//! - `remove`: O(n) scan + shift
//!
//! No side tables and no stale entries. For the few dozen routines a typical
//! scene runs, this is as fast as the heap and easier to inspect.

use super::WakeStore;
use crate::domain::routine::RoutineSlot;
use crate::domain::scheduler::{RoutineId, VirtualTime};

/// Wake store for small routine counts
#[derive(Debug, Default)]
pub struct SortedStore {
    slots: Vec<RoutineSlot>,
}

impl SortedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    fn position(&self, id: RoutineId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id() == id)
    }
}

impl WakeStore for SortedStore {
    fn insert(&mut self, slot: RoutineSlot) {
        let key = (slot.wake_at(), slot.id());
        let at = self
            .slots
            .partition_point(|other| (other.wake_at(), other.id()) > key);
        self.slots.insert(at, slot);
    }

    fn pop_due(&mut self, now: VirtualTime) -> Option<RoutineSlot> {
        match self.slots.last() {
            Some(slot) if slot.wake_at() <= now => self.slots.pop(),
            _ => None,
        }
    }

    fn remove(&mut self, id: RoutineId) -> Option<RoutineSlot> {
        let at = self.position(id)?;
        Some(self.slots.remove(at))
    }

    fn contains(&self, id: RoutineId) -> bool {
        self.position(id).is_some()
    }

    fn next_wake(&self) -> Option<VirtualTime> {
        self.slots.last().map(RoutineSlot::wake_at)
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn clear(&mut self) {
        self.slots.clear();
    }
}
