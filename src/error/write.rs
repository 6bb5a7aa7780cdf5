//! Write path error module.
//!
//! Failures of `add_word`, split into client-side validation problems and
//! server-side store failures.

use thiserror::Error;

use super::store::StoreError;
use crate::word::WordError;

/// Errors returned by the write path.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The text was empty after normalization.
    #[error("Please enter text")]
    EmptyWord,

    /// The normalized word exceeds the configured length bound.
    #[error("Word is {length} characters long, maximum is {max_length}")]
    WordTooLong {
        /// Length of the normalized word in chars
        length: usize,
        /// The configured maximum
        max_length: usize,
    },

    /// The word contains a control character.
    #[error("Word contains control character {0:?}")]
    InvalidCharacter(char),

    /// The durable upsert failed; the index was left untouched.
    #[error("Failed to store word: {0}")]
    StoreFailure(#[from] StoreError),
}

impl WriteError {
    /// Whether the caller sent bad input, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, WriteError::StoreFailure(_))
    }

    /// Stable machine-readable name, sent to clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            WriteError::EmptyWord => "EmptyWord",
            WriteError::WordTooLong { .. } => "WordTooLong",
            WriteError::InvalidCharacter(_) => "InvalidCharacter",
            WriteError::StoreFailure(_) => "StoreFailure",
        }
    }
}

impl From<WordError> for WriteError {
    fn from(err: WordError) -> Self {
        match err {
            WordError::Empty => WriteError::EmptyWord,
            WordError::TooLong { length, max_length } => {
                WriteError::WordTooLong { length, max_length }
            }
            WordError::InvalidCharacter(c) => WriteError::InvalidCharacter(c),
        }
    }
}
