//! Limits configuration module.
//!
//! This module bounds what a single request may ask for: how many
//! suggestions come back and how long a word may be.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use crate::word::{DEFAULT_MAX_WORD_LENGTH, MAX_WORD_LENGTH_CEILING};
use serde::{Deserialize, Serialize};

/// Hard ceiling on `max_limit`, whatever the configuration says.
pub const ABSOLUTE_MAX_LIMIT: usize = 100;

/// Query and word limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Suggestions returned when the client does not send a limit
    pub default_limit: usize,

    /// Largest limit a client may request; larger values are clamped
    pub max_limit: usize,

    /// Maximum word length in characters
    pub max_word_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: ABSOLUTE_MAX_LIMIT,
            max_word_length: DEFAULT_MAX_WORD_LENGTH,
        }
    }
}

impl Validate for LimitsConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_limit == 0 || self.max_limit > ABSOLUTE_MAX_LIMIT {
            return Err(ConfigError::ValueOutOfRange {
                key: "limits.max_limit".to_string(),
                message: format!("must be between 1 and {ABSOLUTE_MAX_LIMIT}"),
            });
        }

        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(ConfigError::ValueOutOfRange {
                key: "limits.default_limit".to_string(),
                message: format!("must be between 1 and max_limit ({})", self.max_limit),
            });
        }

        if self.max_word_length == 0 || self.max_word_length > MAX_WORD_LENGTH_CEILING {
            return Err(ConfigError::ValueOutOfRange {
                key: "limits.max_word_length".to_string(),
                message: format!("must be between 1 and {MAX_WORD_LENGTH_CEILING}"),
            });
        }

        Ok(())
    }
}
