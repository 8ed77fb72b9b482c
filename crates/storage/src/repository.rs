use std::sync::{Arc, Mutex};

use thiserror::Error;

use drill_core::model::{DailyHistory, TrainingStats, WordRecord};

use crate::file::{DrillPaths, FileStorage};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by storage adapters.
///
/// A missing backing file is not represented here: adapters treat it as the
/// empty state and return an empty vocabulary, history, or `None` header.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Load and persist the vocabulary word list.
///
/// `load_words` returns records already merged by term (first mastery wins)
/// and sorted lexicographically, so output is stable across runs.
/// `save_words` is a full rewrite in the given order.
pub trait VocabularyRepository: Send + Sync {
    /// Load the full vocabulary, or an empty list when none is persisted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MalformedRecord` if any data row fails to
    /// parse; the whole load aborts rather than dropping rows silently.
    fn load_words(&self) -> Result<Vec<WordRecord>, StorageError>;

    /// Rewrite the persisted vocabulary from the in-memory records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the rewrite fails.
    fn save_words(&self, records: &[WordRecord]) -> Result<(), StorageError>;
}

/// Load and persist the aggregate training statistics.
pub trait TrainingLogRepository: Send + Sync {
    /// Load the stats header, or `None` when none is persisted yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MalformedRecord` if the header row is corrupt.
    fn load_stats_header(&self) -> Result<Option<TrainingStats>, StorageError>;

    /// Rewrite the stats header.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the rewrite fails.
    fn save_stats_header(&self, stats: &TrainingStats) -> Result<(), StorageError>;

    /// Load the daily history, or an empty map when none is persisted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MalformedRecord` if the log cannot be decoded.
    fn load_daily_log(&self) -> Result<DailyHistory, StorageError>;

    /// Rewrite the daily history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the rewrite fails.
    fn save_daily_log(&self, history: &DailyHistory) -> Result<(), StorageError>;
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Bundles the repository handles the services need.
#[derive(Clone)]
pub struct Storage {
    pub words: Arc<dyn VocabularyRepository>,
    pub stats: Arc<dyn TrainingLogRepository>,
}

impl Storage {
    /// Build a `Storage` backed by the plain-text and JSON files.
    #[must_use]
    pub fn files(paths: DrillPaths) -> Self {
        let adapter = Arc::new(FileStorage::new(paths));
        Self {
            words: Arc::clone(&adapter) as Arc<dyn VocabularyRepository>,
            stats: adapter,
        }
    }

    /// Build a `Storage` held entirely in memory, for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        let adapter = Arc::new(InMemoryStorage::default());
        Self {
            words: Arc::clone(&adapter) as Arc<dyn VocabularyRepository>,
            stats: adapter,
        }
    }
}

//
// ─── IN-MEMORY ADAPTER ─────────────────────────────────────────────────────────
//

/// Mutex-held storage with the same contract as the file adapter.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    words: Mutex<Vec<WordRecord>>,
    header: Mutex<Option<TrainingStats>>,
    history: Mutex<DailyHistory>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the vocabulary directly, bypassing the save path.
    pub fn seed_words(&self, records: Vec<WordRecord>) {
        *self.words.lock().expect("words lock poisoned") = records;
    }

    /// Seed the daily history directly.
    pub fn seed_history(&self, history: DailyHistory) {
        *self.history.lock().expect("history lock poisoned") = history;
    }
}

impl VocabularyRepository for InMemoryStorage {
    fn load_words(&self) -> Result<Vec<WordRecord>, StorageError> {
        Ok(self.words.lock().expect("words lock poisoned").clone())
    }

    fn save_words(&self, records: &[WordRecord]) -> Result<(), StorageError> {
        *self.words.lock().expect("words lock poisoned") = records.to_vec();
        Ok(())
    }
}

impl TrainingLogRepository for InMemoryStorage {
    fn load_stats_header(&self) -> Result<Option<TrainingStats>, StorageError> {
        Ok(self.header.lock().expect("header lock poisoned").clone())
    }

    fn save_stats_header(&self, stats: &TrainingStats) -> Result<(), StorageError> {
        *self.header.lock().expect("header lock poisoned") = Some(stats.clone());
        Ok(())
    }

    fn load_daily_log(&self) -> Result<DailyHistory, StorageError> {
        Ok(self.history.lock().expect("history lock poisoned").clone())
    }

    fn save_daily_log(&self, history: &DailyHistory) -> Result<(), StorageError> {
        *self.history.lock().expect("history lock poisoned") = history.clone();
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
