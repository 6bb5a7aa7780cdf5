//! Word store error module.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for word store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the durable word store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("Store I/O error: {0}")]
    Io(#[from] io::Error),

    /// A persisted entry could not be parsed back into a word.
    #[error("Corrupt entry in {path:?} at line {line}: {reason}")]
    Corrupt {
        /// The log file holding the entry
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Why the entry was rejected
        reason: String,
    },

    /// The store refused the operation (offline, closed, injected outage).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
