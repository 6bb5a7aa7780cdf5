//! Index synchronization against the durable word store.
//!
//! [`IndexSynchronizer`] owns the write path. Every accepted word is committed
//! to the store first and only then inserted into the prefix index, so the
//! index never holds a word the store does not.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::data_structures::prefix_index::{PrefixIndex, SharedIndex};
use crate::error::{report_error, ErrorContext, MakaniError, MakaniResult, WriteError};
use crate::store::WordStore;
use crate::word::{Word, DEFAULT_MAX_WORD_LENGTH};

/// Outcome of an accepted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    /// The normalized word as stored
    pub word: Word,

    /// Whether the word was new to the vocabulary
    pub inserted: bool,
}

/// Keeps the prefix index in step with the word store.
#[derive(Clone)]
pub struct IndexSynchronizer {
    store: Arc<dyn WordStore>,
    index: SharedIndex,
    max_word_length: usize,
}

impl std::fmt::Debug for IndexSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexSynchronizer")
            .field("words", &self.index.read().len())
            .field("max_word_length", &self.max_word_length)
            .finish_non_exhaustive()
    }
}

impl IndexSynchronizer {
    /// Builds a fresh index from every word in `store`.
    ///
    /// This must succeed before any traffic is accepted; a store that cannot
    /// list its contents yields [`MakaniError::Bootstrap`].
    #[instrument(skip(store))]
    pub async fn bootstrap(
        store: Arc<dyn WordStore>,
        max_word_length: usize,
    ) -> MakaniResult<Self> {
        let words = store.list_all().await.map_err(MakaniError::Bootstrap)?;
        let count = words.len();

        let index: PrefixIndex = words.into_iter().collect();
        info!(words = count, nodes = index.node_count(), "Loaded words into index");

        Ok(Self {
            store,
            index: index.into_shared(),
            max_word_length,
        })
    }

    /// Bootstraps with the default word length bound.
    pub async fn bootstrap_default(store: Arc<dyn WordStore>) -> MakaniResult<Self> {
        Self::bootstrap(store, DEFAULT_MAX_WORD_LENGTH).await
    }

    /// Normalizes `raw_text`, commits it to the store and then to the index.
    ///
    /// On [`WriteError::StoreFailure`] the index is untouched. The index lock is
    /// only taken after the store has confirmed, and only for the insert.
    #[instrument(skip(self))]
    pub async fn apply_write(&self, raw_text: &str) -> Result<WriteAck, WriteError> {
        let word = Word::parse_with_limit(raw_text, self.max_word_length).map_err(|e| {
            debug!(error = %e, "Rejected word");
            WriteError::from(e)
        })?;

        let outcome = match self.store.upsert(&word).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(word = %word, error = %e, "Store upsert failed, index left untouched");
                report_error(
                    ErrorContext::new(&e, "index_synchronizer")
                        .with_details(format!("upsert of {word:?} failed"))
                        .with_span_trace(),
                );
                return Err(WriteError::StoreFailure(e));
            }
        };

        let newly_indexed = self.index.write().insert(&word);
        if outcome.is_inserted() != newly_indexed {
            // Only reachable when the store and index were built from
            // different sources; the next bootstrap reconciles them.
            warn!(word = %word, ?outcome, newly_indexed, "Store and index disagreed on word");
        }

        debug!(word = %word, inserted = outcome.is_inserted(), "Word accepted");
        Ok(WriteAck {
            word,
            inserted: outcome.is_inserted(),
        })
    }

    /// Returns a handle to the shared index, for building query gateways.
    pub fn index(&self) -> SharedIndex {
        Arc::clone(&self.index)
    }

    /// Returns the number of indexed words.
    pub fn word_count(&self) -> usize {
        self.index.read().len()
    }
}
