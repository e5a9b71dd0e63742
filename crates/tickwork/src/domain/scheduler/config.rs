//! Scheduler Configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! start_time = 0        # virtual time of the first tick
//! trace_capacity = 4096 # invocations kept in the trace (0 = off)
//! ```

use super::types::VirtualTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted trace capacity
pub const MAX_TRACE_CAPACITY: usize = 1 << 20;

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Virtual time the clock starts at
    pub start_time: VirtualTime,

    /// Number of invocations kept in the trace (0 disables tracing)
    pub trace_capacity: usize,
}

impl SchedulerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trace_capacity > MAX_TRACE_CAPACITY {
            return Err(ConfigError::TraceCapacity {
                requested: self.trace_capacity,
                max: MAX_TRACE_CAPACITY,
            });
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has unknown/mistyped fields
    #[error("invalid scheduler configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Trace capacity out of range
    #[error("trace capacity {requested} exceeds maximum of {max}")]
    TraceCapacity {
        /// Requested capacity
        requested: usize,
        /// Largest accepted capacity
        max: usize,
    },

    /// The configuration file could not be read
    #[error("failed to read configuration file {}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SchedulerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[test]
    fn test_parse_fields() {
        let config = SchedulerConfig::from_toml_str("start_time = 100\ntrace_capacity = 8\n").unwrap();
        assert_eq!(config.start_time, 100);
        assert_eq!(config.trace_capacity, 8);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SchedulerConfig::from_toml_str("tick_rate = 60\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_trace_capacity_limit() {
        let source = format!("trace_capacity = {}\n", MAX_TRACE_CAPACITY + 1);
        let err = SchedulerConfig::from_toml_str(&source).unwrap_err();
        assert!(matches!(err, ConfigError::TraceCapacity { .. }));
        assert!(err.to_string().contains("exceeds maximum"));
    }
}
