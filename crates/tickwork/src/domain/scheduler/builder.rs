//! Scheduler Builder

use super::config::{ConfigError, SchedulerConfig};
use super::engine::Scheduler;
use super::types::VirtualTime;
use crate::domain::store::{HeapStore, WakeStore};

/// Builder for [`Scheduler`]
///
/// # Example
///
/// ```rust
/// use tickwork::domain::scheduler::SchedulerBuilder;
/// use tickwork::domain::store::SortedStore;
///
/// let scheduler = SchedulerBuilder::new()
///     .start_time(500)
///     .trace_capacity(64)
///     .build_with_store(SortedStore::new())
///     .unwrap();
///
/// assert_eq!(scheduler.now(), 500);
/// assert!(scheduler.trace().is_enabled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
}

impl SchedulerBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the virtual time of the first tick
    pub fn start_time(mut self, start_time: VirtualTime) -> Self {
        self.config.start_time = start_time;
        self
    }

    /// Set the number of invocations kept in the trace (0 disables it)
    pub fn trace_capacity(mut self, capacity: usize) -> Self {
        self.config.trace_capacity = capacity;
        self
    }

    /// Build a scheduler over a [`HeapStore`]
    pub fn build(self) -> Result<Scheduler<HeapStore>, ConfigError> {
        self.build_with_store(HeapStore::new())
    }

    /// Build a scheduler over a custom wake store
    pub fn build_with_store<S: WakeStore>(self, store: S) -> Result<Scheduler<S>, ConfigError> {
        Scheduler::with_config(store, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduler::MAX_TRACE_CAPACITY;

    #[test]
    fn test_builder_defaults() {
        let scheduler = SchedulerBuilder::new().build().unwrap();
        assert_eq!(scheduler.now(), 0);
        assert!(!scheduler.trace().is_enabled());
    }

    #[test]
    fn test_builder_rejects_oversized_trace() {
        let result = SchedulerBuilder::new()
            .trace_capacity(MAX_TRACE_CAPACITY + 1)
            .build();
        assert!(matches!(result, Err(ConfigError::TraceCapacity { .. })));
    }

    #[test]
    fn test_builder_from_config() {
        let config = SchedulerConfig {
            start_time: 42,
            trace_capacity: 0,
        };
        let scheduler = SchedulerBuilder::new().config(config).trace_capacity(3).build().unwrap();
        assert_eq!(scheduler.now(), 42);
        assert_eq!(scheduler.trace().capacity(), 3);
    }
}
