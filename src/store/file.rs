//! Append-only file word store.
//!
//! Words are kept one per line in `words.log` inside the configured state
//! directory. The whole file is read at open to rebuild the key set; after
//! that, only new words touch the disk.
//!
//! A failed append is truncated back to the last committed length, so the log
//! never keeps a word whose write was reported as failed. If the truncation
//! itself fails the store refuses every later write.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fnv::FnvHashSet;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::{UpsertOutcome, WordStore};
use crate::error::{StoreError, StoreResult};
use crate::word::{Word, MAX_WORD_LENGTH_CEILING};

/// File name of the word log inside the state directory.
pub const WORD_LOG_FILE: &str = "words.log";

#[derive(Debug)]
struct LogState {
    file: File,
    words: FnvHashSet<Word>,
    /// Log length covered by acknowledged writes
    committed: u64,
    /// Set when a failed append could not be rolled back
    poisoned: bool,
    #[cfg(test)]
    fail_after: Option<usize>,
}

/// A durable word store backed by an append-only log file.
///
/// The mutex covers both the open file and the key set, so the uniqueness
/// check and the append happen as one step.
#[derive(Debug)]
pub struct FileWordStore {
    path: PathBuf,
    sync_writes: bool,
    state: Mutex<LogState>,
}

impl FileWordStore {
    /// Opens (or creates) the word log under `state_dir`.
    ///
    /// # Arguments
    ///
    /// * `state_dir` - Directory holding the log; created if missing.
    /// * `sync_writes` - Whether to `fsync` after every append.
    pub async fn open<P: AsRef<Path>>(state_dir: P, sync_writes: bool) -> StoreResult<Self> {
        let dir = state_dir.as_ref();
        fs::create_dir_all(dir).await?;
        let path = dir.join(WORD_LOG_FILE);

        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let mut words = FnvHashSet::default();
        for (idx, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let word = parse_entry(&path, idx + 1, line)?;
            if !words.insert(word) {
                debug!(line = idx + 1, "Duplicate entry in word log");
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        // A crash mid-append can leave the last entry without its newline.
        if !contents.is_empty() && !contents.ends_with('\n') {
            warn!(path = ?path, "Word log missing trailing newline, repairing");
            file.write_all(b"\n").await?;
            file.flush().await?;
        }

        let committed = file.metadata().await?.len();
        info!(path = ?path, words = words.len(), "Opened word log");

        Ok(Self {
            path,
            sync_writes,
            state: Mutex::new(LogState {
                file,
                words,
                committed,
                poisoned: false,
                #[cfg(test)]
                fail_after: None,
            }),
        })
    }

    /// Returns the path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `buf`, truncating the log back to its committed length if any
    /// step fails.
    async fn append(&self, state: &mut LogState, buf: &[u8]) -> StoreResult<()> {
        if state.poisoned {
            return Err(StoreError::Unavailable(format!(
                "word log {:?} holds an unrolled partial write",
                self.path
            )));
        }

        match self.write_entries(state, buf).await {
            Ok(()) => {
                state.committed += buf.len() as u64;
                Ok(())
            }
            Err(e) => {
                match state.file.set_len(state.committed).await {
                    Ok(()) => {
                        warn!(path = ?self.path, error = %e, "Append failed, log rolled back")
                    }
                    Err(rollback) => {
                        error!(path = ?self.path, error = %rollback, "Rollback failed, store disabled");
                        state.poisoned = true;
                    }
                }
                Err(e)
            }
        }
    }

    async fn write_entries(&self, state: &mut LogState, buf: &[u8]) -> StoreResult<()> {
        #[cfg(test)]
        {
            if let Some(after) = state.fail_after.take() {
                state.file.write_all(&buf[..after.min(buf.len())]).await?;
                state.file.flush().await?;
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "injected").into());
            }
        }

        state.file.write_all(buf).await?;
        state.file.flush().await?;
        if self.sync_writes {
            state.file.sync_data().await?;
        }
        Ok(())
    }

    /// Makes the next append write `after` bytes and then fail.
    #[cfg(test)]
    async fn fail_next_append(&self, after: usize) {
        self.state.lock().await.fail_after = Some(after);
    }
}

fn parse_entry(path: &Path, line_no: usize, line: &str) -> StoreResult<Word> {
    let corrupt = |reason: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        line: line_no,
        reason,
    };

    // Entries were bounded by whatever limit was configured when they were
    // written, which never exceeds the ceiling.
    let word = Word::parse_with_limit(line, MAX_WORD_LENGTH_CEILING)
        .map_err(|e| corrupt(e.to_string()))?;
    if word.as_str() != line {
        return Err(corrupt("entry is not normalized".to_string()));
    }
    Ok(word)
}

#[async_trait]
impl WordStore for FileWordStore {
    async fn upsert(&self, word: &Word) -> StoreResult<UpsertOutcome> {
        let mut state = self.state.lock().await;
        if state.words.contains(word) {
            return Ok(UpsertOutcome::AlreadyPresent);
        }

        let mut line = String::with_capacity(word.len() + 1);
        line.push_str(word);
        line.push('\n');

        self.append(&mut state, line.as_bytes()).await?;
        state.words.insert(word.clone());
        Ok(UpsertOutcome::Inserted)
    }

    async fn upsert_batch(&self, words: &[Word]) -> StoreResult<usize> {
        let mut state = self.state.lock().await;

        let mut seen = FnvHashSet::default();
        let fresh: Vec<&Word> = words
            .iter()
            .filter(|w| !state.words.contains(*w) && seen.insert(*w))
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        let mut buf = String::new();
        for word in &fresh {
            buf.push_str(word);
            buf.push('\n');
        }

        self.append(&mut state, buf.as_bytes()).await?;
        let inserted = fresh.len();
        state.words.extend(fresh.into_iter().cloned());
        Ok(inserted)
    }

    async fn list_all(&self) -> StoreResult<Vec<Word>> {
        Ok(self.state.lock().await.words.iter().cloned().collect())
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.state.lock().await.words.len())
    }
}
