//! Word store configuration module.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Durable word store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the word log
    pub state_dir: PathBuf,

    /// Whether to fsync after every accepted write
    pub sync_writes: bool,

    /// Number of words per batch when seeding
    pub seed_batch_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("data"),
            sync_writes: true,
            seed_batch_size: 1000,
        }
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.state_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "state_dir cannot be empty".to_string(),
            ));
        }

        if self.seed_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "seed_batch_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
