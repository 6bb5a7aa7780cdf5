//! Durable word storage.
//!
//! The store is the source of truth for the vocabulary. The prefix index is
//! rebuilt from [`WordStore::list_all`] at startup and only mutated after
//! [`WordStore::upsert`] has reported success.

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::word::Word;

pub use file::FileWordStore;
pub use memory::MemoryWordStore;

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The word was not present and is now durable.
    Inserted,
    /// The word was already stored; nothing changed.
    AlreadyPresent,
}

impl UpsertOutcome {
    /// Returns `true` for [`UpsertOutcome::Inserted`].
    pub fn is_inserted(self) -> bool {
        matches!(self, UpsertOutcome::Inserted)
    }
}

/// Capability contract for a durable, duplicate-free word set.
///
/// Implementations must make an accepted word durable before `upsert`
/// returns `Ok`, and must treat repeated upserts of the same word as no-ops.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Stores `word` if it is not already present.
    async fn upsert(&self, word: &Word) -> StoreResult<UpsertOutcome>;

    /// Stores every word in `words`, returning how many were new.
    ///
    /// The default implementation upserts one by one; implementations backed
    /// by real I/O should override it with a single durability barrier.
    async fn upsert_batch(&self, words: &[Word]) -> StoreResult<usize> {
        let mut inserted = 0;
        for word in words {
            if self.upsert(word).await?.is_inserted() {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Returns every stored word, in no particular order.
    async fn list_all(&self) -> StoreResult<Vec<Word>>;

    /// Returns the number of stored words.
    async fn len(&self) -> StoreResult<usize>;
}
