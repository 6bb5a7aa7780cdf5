//! Read-only query gateway.
//!
//! Normalizes prefixes, clamps limits, and reads the shared prefix index.
//! Nothing here mutates the index or the store.

use serde_json::Value;
use tracing::trace;

use crate::config::limits::LimitsConfig;
use crate::data_structures::prefix_index::SharedIndex;
use crate::word::normalize_prefix;

/// Answer to a prefix query.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Suggestions {
    /// The normalized prefix that was searched
    pub prefix: String,

    /// Matching words in lexicographic order
    pub suggestions: Vec<String>,
}

/// Query front-end over a shared prefix index.
#[derive(Debug, Clone)]
pub struct QueryGateway {
    index: SharedIndex,
    limits: LimitsConfig,
}

impl QueryGateway {
    /// Creates a gateway reading `index` under the given limits.
    pub fn new(index: SharedIndex, limits: LimitsConfig) -> Self {
        Self { index, limits }
    }

    /// Clamps a requested limit into `1..=max_limit`.
    ///
    /// A missing limit falls back to `default_limit`.
    pub fn clamp_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.limits.default_limit,
            Some(n) if n < 1 => 1,
            Some(n) => usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(self.limits.max_limit),
        }
    }

    /// Interprets a wire `limit` value.
    ///
    /// Integers, floats (truncated) and numeric strings are accepted; anything
    /// else is treated as absent rather than rejected.
    pub fn limit_from_value(value: Option<&Value>) -> Option<i64> {
        match value? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|_| i64::MAX))
                .or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Returns at most `clamp_limit(limit)` words starting with `raw_prefix`.
    pub fn query(&self, raw_prefix: &str, limit: Option<i64>) -> Suggestions {
        let prefix = normalize_prefix(raw_prefix);
        let limit = self.clamp_limit(limit);

        let suggestions = self.index.read().search_limited(&prefix, limit);

        trace!(prefix = %prefix, limit, matches = suggestions.len(), "Prefix query");
        Suggestions {
            prefix,
            suggestions,
        }
    }
}
