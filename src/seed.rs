//! Bulk loading of word files into a store.

use std::path::Path;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::store::WordStore;
use crate::word::{Word, WordError};

/// Totals from one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Lines read from the input
    pub lines: usize,

    /// Lines that were blank after trimming
    pub blank: usize,

    /// Lines rejected by validation
    pub rejected: usize,

    /// Valid words handed to the store
    pub accepted: usize,

    /// Words the store did not already hold
    pub inserted: usize,
}

/// Upserts every valid line of `contents` in batches of `batch_size`.
pub async fn seed_words(
    store: &dyn WordStore,
    contents: &str,
    batch_size: usize,
    max_word_length: usize,
) -> StoreResult<SeedReport> {
    let batch_size = batch_size.max(1);
    let mut report = SeedReport::default();
    let mut batch = Vec::with_capacity(batch_size);

    for (number, line) in contents.lines().enumerate() {
        report.lines += 1;
        match Word::parse_with_limit(line, max_word_length) {
            Ok(word) => batch.push(word),
            Err(WordError::Empty) => report.blank += 1,
            Err(e) => {
                warn!(line = number + 1, error = %e, "Skipping invalid word");
                report.rejected += 1;
            }
        }

        if batch.len() == batch_size {
            report.accepted += batch.len();
            report.inserted += store.upsert_batch(&batch).await?;
            debug!(accepted = report.accepted, "Seed batch stored");
            batch.clear();
        }
    }

    if !batch.is_empty() {
        report.accepted += batch.len();
        report.inserted += store.upsert_batch(&batch).await?;
    }

    Ok(report)
}

/// Reads `path` and seeds its words into `store`.
pub async fn seed_file(
    store: &dyn WordStore,
    path: &Path,
    batch_size: usize,
    max_word_length: usize,
) -> anyhow::Result<SeedReport> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read word file {}", path.display()))?;

    let report = seed_words(store, &contents, batch_size, max_word_length)
        .await
        .with_context(|| format!("failed to store words from {}", path.display()))?;

    info!(
        path = %path.display(),
        lines = report.lines,
        accepted = report.accepted,
        inserted = report.inserted,
        rejected = report.rejected,
        "Seeding finished"
    );
    Ok(report)
}
