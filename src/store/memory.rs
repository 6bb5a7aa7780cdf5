//! In-memory word store.
//!
//! Not durable. Used by tests and local experiments; it can be switched
//! offline to simulate an outage of the real store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use fnv::FnvHashSet;
use parking_lot::Mutex;

use super::{UpsertOutcome, WordStore};
use crate::error::{StoreError, StoreResult};
use crate::word::Word;

/// A word store kept entirely in memory.
#[derive(Debug)]
pub struct MemoryWordStore {
    words: Mutex<FnvHashSet<Word>>,
    available: AtomicBool,
}

impl MemoryWordStore {
    /// Creates an empty, available store.
    pub fn new() -> Self {
        Self {
            words: Mutex::new(FnvHashSet::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Creates a store pre-populated with `words`.
    pub fn with_words<I: IntoIterator<Item = Word>>(words: I) -> Self {
        let store = Self::new();
        store.words.lock().extend(words);
        store
    }

    /// Takes the store offline (`false`) or back online (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Checks whether `word` is stored.
    pub fn contains(&self, word: &str) -> bool {
        self.words.lock().contains(word)
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        }
    }
}

impl Default for MemoryWordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WordStore for MemoryWordStore {
    async fn upsert(&self, word: &Word) -> StoreResult<UpsertOutcome> {
        self.ensure_available()?;
        if self.words.lock().insert(word.clone()) {
            Ok(UpsertOutcome::Inserted)
        } else {
            Ok(UpsertOutcome::AlreadyPresent)
        }
    }

    async fn list_all(&self) -> StoreResult<Vec<Word>> {
        self.ensure_available()?;
        Ok(self.words.lock().iter().cloned().collect())
    }

    async fn len(&self) -> StoreResult<usize> {
        self.ensure_available()?;
        Ok(self.words.lock().len())
    }
}
