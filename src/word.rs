//! Normalized vocabulary words.
//!
//! Every piece of user text passes through [`Word::parse`] exactly once, at the
//! protocol boundary, before it reaches either the word store or the prefix
//! index. Both components therefore see byte-identical text.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use thiserror::Error;

/// Default maximum length of a word, in `char`s.
pub const DEFAULT_MAX_WORD_LENGTH: usize = 64;

/// Upper bound on any configured word length, in `char`s.
pub const MAX_WORD_LENGTH_CEILING: usize = 1024;

/// Reasons raw text cannot become a [`Word`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// Nothing left after trimming.
    #[error("Please enter text")]
    Empty,

    /// The normalized word is longer than the configured bound.
    #[error("Word is {length} characters long, maximum is {max_length}")]
    TooLong {
        /// Length of the normalized word in chars.
        length: usize,
        /// The configured maximum.
        max_length: usize,
    },

    /// The word contains a control character (newline, tab, NUL, ...).
    #[error("Word contains control character {0:?}")]
    InvalidCharacter(char),
}

/// A trimmed, lowercased, non-empty word.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    /// Normalizes `raw` using the default length bound.
    pub fn parse(raw: &str) -> Result<Self, WordError> {
        Self::parse_with_limit(raw, DEFAULT_MAX_WORD_LENGTH)
    }

    /// Normalizes `raw`, rejecting words longer than `max_length` chars.
    pub fn parse_with_limit(raw: &str, max_length: usize) -> Result<Self, WordError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(WordError::Empty);
        }

        if let Some(c) = normalized.chars().find(|c| c.is_control()) {
            return Err(WordError::InvalidCharacter(c));
        }

        let length = normalized.chars().count();
        if length > max_length {
            return Err(WordError::TooLong { length, max_length });
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the word, returning the normalized text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Word {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Word::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Normalizes a query prefix.
///
/// Prefixes get the same trim and lowercase as write input, so a prefix typed
/// exactly like a stored word finds it. An empty result is legal and matches
/// the whole vocabulary.
pub fn normalize_prefix(raw: &str) -> String {
    raw.trim().to_lowercase()
}
