//! Configuration File Loading

use crate::domain::scheduler::{ConfigError, SchedulerConfig};
use std::fs;
use std::path::Path;

/// Read and validate a [`SchedulerConfig`] from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<SchedulerConfig, ConfigError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = SchedulerConfig::from_toml_str(&source)?;
    tracing::debug!(path = %path.display(), ?config, "scheduler configuration loaded");
    Ok(config)
}
