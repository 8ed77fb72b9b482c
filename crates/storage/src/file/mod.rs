use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use drill_core::model::{DailyHistory, TrainingStats, WordRecord};

use crate::repository::{StorageError, TrainingLogRepository, VocabularyRepository};

mod daily_log;
mod stats_header;
mod word_list;

//
// ─── PATHS ─────────────────────────────────────────────────────────────────────
//

/// Locations of the three backing files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillPaths {
    pub word_list: PathBuf,
    pub stats_header: PathBuf,
    pub daily_log: PathBuf,
}

impl DrillPaths {
    /// Default file names inside a data directory, matching the original
    /// tool's layout (`word_list.md`, `training_stats.md`, `log.json`).
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            word_list: dir.join("word_list.md"),
            stats_header: dir.join("training_stats.md"),
            daily_log: dir.join("log.json"),
        }
    }
}

//
// ─── FILE ADAPTER ──────────────────────────────────────────────────────────────
//

/// File-backed storage. Every save is a synchronous full-file rewrite, so the
/// files are never stale between turns; there is exactly one writer.
pub struct FileStorage {
    paths: DrillPaths,
}

impl FileStorage {
    #[must_use]
    pub fn new(paths: DrillPaths) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &DrillPaths {
        &self.paths
    }

    /// Read a backing file, mapping "missing" to the empty state.
    fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!("{}: {e}", path.display()))),
        }
    }

    fn write(path: &Path, contents: &str) -> Result<(), StorageError> {
        fs::write(path, contents)
            .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))
    }
}

impl VocabularyRepository for FileStorage {
    fn load_words(&self) -> Result<Vec<WordRecord>, StorageError> {
        match Self::read_optional(&self.paths.word_list)? {
            Some(text) => word_list::parse(&text),
            None => Ok(Vec::new()),
        }
    }

    fn save_words(&self, records: &[WordRecord]) -> Result<(), StorageError> {
        debug!(count = records.len(), path = %self.paths.word_list.display(), "saving word list");
        Self::write(&self.paths.word_list, &word_list::render(records))
    }
}

impl TrainingLogRepository for FileStorage {
    fn load_stats_header(&self) -> Result<Option<TrainingStats>, StorageError> {
        match Self::read_optional(&self.paths.stats_header)? {
            Some(text) => stats_header::parse(&text),
            None => Ok(None),
        }
    }

    fn save_stats_header(&self, stats: &TrainingStats) -> Result<(), StorageError> {
        Self::write(&self.paths.stats_header, &stats_header::render(stats))
    }

    fn load_daily_log(&self) -> Result<DailyHistory, StorageError> {
        match Self::read_optional(&self.paths.daily_log)? {
            Some(text) => daily_log::parse(&text),
            None => Ok(DailyHistory::new()),
        }
    }

    fn save_daily_log(&self, history: &DailyHistory) -> Result<(), StorageError> {
        debug!(days = history.len(), "saving daily log");
        Self::write(&self.paths.daily_log, &daily_log::render(history))
    }
}
