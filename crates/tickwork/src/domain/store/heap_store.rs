//! Heap Store
//!
//! # Design
//! - `BinaryHeap<WakeKey>` gives O(log n) insertion and earliest-first pops
//! - `HashMap<RoutineId, RoutineSlot>` owns the slots and answers `contains`
//!   and `remove` in O(1)
//!
//! Removal is lazy: `remove` only takes the slot out of the map and leaves
//! its key in the heap. Keys without a slot are discarded when they reach
//! the top. Identities are never reused, so a stale key can never be
//! mistaken for a live one. When stale keys outnumber live slots the heap is
//! rebuilt.

use super::types::WakeKey;
use super::WakeStore;
use crate::domain::routine::RoutineSlot;
use crate::domain::scheduler::{RoutineId, VirtualTime};
use std::collections::{BinaryHeap, HashMap};

/// Stale keys tolerated before a rebuild is considered
const COMPACT_THRESHOLD: usize = 64;

/// Wake store for large routine counts
#[derive(Debug, Default)]
pub struct HeapStore {
    keys: BinaryHeap<WakeKey>,
    slots: HashMap<RoutineId, RoutineSlot>,
}

impl HeapStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: BinaryHeap::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    fn is_live(&self, key: &WakeKey) -> bool {
        self.slots.contains_key(&key.id)
    }

    fn stale_keys(&self) -> usize {
        self.keys.len() - self.slots.len()
    }

    fn maybe_compact(&mut self) {
        let stale = self.stale_keys();
        if stale > COMPACT_THRESHOLD && stale > self.slots.len() {
            let slots = &self.slots;
            self.keys.retain(|key| slots.contains_key(&key.id));
            tracing::trace!(dropped = stale, live = self.slots.len(), "compacted heap store");
        }
    }
}

impl WakeStore for HeapStore {
    fn insert(&mut self, slot: RoutineSlot) {
        self.keys.push(slot.key());
        self.slots.insert(slot.id(), slot);
    }

    fn pop_due(&mut self, now: VirtualTime) -> Option<RoutineSlot> {
        loop {
            let key = *self.keys.peek()?;
            if !self.is_live(&key) {
                self.keys.pop();
                continue;
            }
            if !key.is_due(now) {
                return None;
            }
            self.keys.pop();
            return self.slots.remove(&key.id);
        }
    }

    fn remove(&mut self, id: RoutineId) -> Option<RoutineSlot> {
        let slot = self.slots.remove(&id)?;
        self.maybe_compact();
        Some(slot)
    }

    fn contains(&self, id: RoutineId) -> bool {
        self.slots.contains_key(&id)
    }

    fn next_wake(&self) -> Option<VirtualTime> {
        match self.keys.peek() {
            Some(top) if self.is_live(top) => Some(top.wake_at),
            Some(_) => self
                .keys
                .iter()
                .filter(|key| self.is_live(key))
                .max()
                .map(|key| key.wake_at),
            None => None,
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.slots.clear();
    }
}
