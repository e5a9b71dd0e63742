//! Wake Store Types

use crate::domain::scheduler::{RoutineId, VirtualTime};
use std::cmp::Ordering;

/// Ordering key of a slot in a wake store
///
/// # Ordering
///
/// Keys compare in *reverse* so that `BinaryHeap<WakeKey>` (a max-heap)
/// yields the earliest key first:
///
/// 1. earlier `wake_at` is greater
/// 2. on a tie, smaller `id` is greater (first registered, first invoked)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WakeKey {
    /// When the slot becomes due
    pub wake_at: VirtualTime,

    /// Identity of the slot
    pub id: RoutineId,
}

impl WakeKey {
    /// Create a new key
    #[inline(always)]
    pub const fn new(wake_at: VirtualTime, id: RoutineId) -> Self {
        Self { wake_at, id }
    }

    /// Check if the key is due at `now`
    #[inline(always)]
    pub const fn is_due(&self, now: VirtualTime) -> bool {
        self.wake_at <= now
    }
}

impl PartialOrd for WakeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WakeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .wake_at
            .cmp(&self.wake_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}
