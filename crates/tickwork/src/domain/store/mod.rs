//! Wake Store Module - Time-ordered Routine Storage
//!
//! # Design Philosophy
//!
//! The scheduler never cares *how* slots are kept in wake order, only that
//! it can insert, pull out the earliest due slot, and remove by identity.
//! That contract is the [`WakeStore`] trait, and the scheduler is generic
//! over it:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Scheduler<S: WakeStore>                            │
//! └─────────────────────────────────────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          │                       │
//!      HeapStore               SortedStore
//!          │                       │
//!   BinaryHeap<WakeKey>      Vec<RoutineSlot>
//!   + HashMap<id, slot>      sorted by (wake_at, id)
//!   (O(log n), lazy          (O(n) insert/remove,
//!    removal)                 no side tables)
//! ```
//!
//! Both backends select slots in exactly the same order: smallest
//! `wake_at` first, ties broken by ascending [`RoutineId`]. Swapping one for
//! the other never changes observable behavior.

mod heap_store;
mod sorted_store;
mod types;

pub use heap_store::HeapStore;
pub use sorted_store::SortedStore;
pub use types::WakeKey;

use crate::domain::routine::RoutineSlot;
use crate::domain::scheduler::{RoutineId, VirtualTime};

/// Time-ordered collection of live routine slots
///
/// Extracting every due slot is done by calling [`WakeStore::pop_due`]
/// until it returns `None`; the scheduler does it one slot at a time so
/// that cancellations issued by one body can affect the rest of the drain.
pub trait WakeStore {
    /// Insert a slot at its current wake-time
    fn insert(&mut self, slot: RoutineSlot);

    /// Remove and return the earliest slot with `wake_at <= now`
    fn pop_due(&mut self, now: VirtualTime) -> Option<RoutineSlot>;

    /// Remove a slot by identity
    fn remove(&mut self, id: RoutineId) -> Option<RoutineSlot>;

    /// Check if a slot with this identity is stored
    fn contains(&self, id: RoutineId) -> bool;

    /// Wake-time of the earliest stored slot
    fn next_wake(&self) -> Option<VirtualTime>;

    /// Number of stored slots
    fn len(&self) -> usize;

    /// Check if the store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored slot
    fn clear(&mut self);
}

#[cfg(test)]
pub(crate) mod conformance {
    //! Behavior every backend must share.

    use super::*;
    use crate::domain::routine::test_slot;

    pub fn pops_in_wake_order<S: WakeStore>(mut store: S) {
        store.insert(test_slot(2, 200));
        store.insert(test_slot(1, 100));
        store.insert(test_slot(3, 150));

        assert_eq!(store.next_wake(), Some(100));
        assert_eq!(store.pop_due(1_000).map(|s| s.wake_at()), Some(100));
        assert_eq!(store.pop_due(1_000).map(|s| s.wake_at()), Some(150));
        assert_eq!(store.pop_due(1_000).map(|s| s.wake_at()), Some(200));
        assert!(store.pop_due(1_000).is_none());
    }

    pub fn breaks_ties_by_id<S: WakeStore>(mut store: S) {
        store.insert(test_slot(9, 50));
        store.insert(test_slot(4, 50));
        store.insert(test_slot(6, 50));

        let order: Vec<u64> = std::iter::from_fn(|| store.pop_due(50))
            .map(|s| s.id().as_u64())
            .collect();
        assert_eq!(order, vec![4, 6, 9]);
    }

    pub fn respects_now<S: WakeStore>(mut store: S) {
        store.insert(test_slot(1, 10));
        store.insert(test_slot(2, 20));

        assert!(store.pop_due(9).is_none());
        assert_eq!(store.pop_due(15).map(|s| s.id().as_u64()), Some(1));
        assert!(store.pop_due(15).is_none());
        assert_eq!(store.len(), 1);
    }

    pub fn removes_by_id<S: WakeStore>(mut store: S) {
        store.insert(test_slot(1, 10));
        store.insert(test_slot(2, 20));
        store.insert(test_slot(3, 30));

        assert!(store.contains(RoutineId::new(1)));
        assert_eq!(store.remove(RoutineId::new(1)).map(|s| s.wake_at()), Some(10));
        assert!(!store.contains(RoutineId::new(1)));
        assert!(store.remove(RoutineId::new(1)).is_none());

        assert_eq!(store.len(), 2);
        assert_eq!(store.next_wake(), Some(20));
        assert_eq!(store.pop_due(100).map(|s| s.id().as_u64()), Some(2));
    }

    pub fn clears<S: WakeStore>(mut store: S) {
        store.insert(test_slot(1, 10));
        store.insert(test_slot(2, 20));
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.next_wake(), None);
        assert!(store.pop_due(u64::MAX).is_none());
    }
}
