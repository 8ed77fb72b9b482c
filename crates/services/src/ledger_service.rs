use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use drill_core::Clock;
use drill_core::model::{
    DailySummary, DatedSummary, StatsSnapshot, TrainingStats, WordRecord, mean_mastery_percent,
    prune_history,
};
use storage::{StorageError, TrainingLogRepository};

//
// ─── STATISTICS LEDGER ─────────────────────────────────────────────────────────
//

/// Maintains the aggregate training statistics across sessions.
///
/// Holds the process-wide counters (seeded from the persisted header) and
/// writes both durable tables: the single-row stats header and the bounded
/// daily log.
pub struct LedgerService {
    clock: Clock,
    stats: Arc<dyn TrainingLogRepository>,
    session_start: DateTime<Utc>,
    total_tests: u64,
    avg_mastery: f64,
}

impl LedgerService {
    /// Load persisted state and prune the daily history.
    ///
    /// Pruning runs here, once, before the history is handed to any
    /// consumer: only the 10 most-recently-dated entries survive. The
    /// session-start timestamp and cumulative test count are seeded from the
    /// stats header; with no header, the session starts now at zero.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the persisted history or header is corrupt
    /// or cannot be rewritten.
    pub fn bootstrap(
        clock: Clock,
        stats: Arc<dyn TrainingLogRepository>,
    ) -> Result<Self, StorageError> {
        let mut history = stats.load_daily_log()?;
        let before = history.len();
        prune_history(&mut history);
        if history.len() < before {
            debug!(dropped = before - history.len(), "pruned daily history");
        }
        stats.save_daily_log(&history)?;

        let (session_start, total_tests) = match stats.load_stats_header()? {
            Some(header) => (header.session_start, header.total_tests),
            None => (clock.now(), 0),
        };

        Ok(Self {
            clock,
            stats,
            session_start,
            total_tests,
            avg_mastery: 0.0,
        })
    }

    /// Count one drill and recompute the session-facing average.
    ///
    /// The average divides the mastery sum by the cumulative *test* count,
    /// not the word count, so it drifts down over a long session unless
    /// mastery genuinely rises. That is the tool's long-standing observable
    /// behavior and is kept as-is; the persisted tables use the per-word
    /// mean instead (see [`LedgerService::persist`]).
    pub fn record_outcome(&mut self, records: &[WordRecord]) {
        self.total_tests += 1;
        let sum: f64 = records.iter().map(WordRecord::mastery).sum();
        #[allow(clippy::cast_precision_loss)]
        let denominator = self.total_tests as f64;
        self.avg_mastery = sum / denominator * 100.0;
    }

    /// Rewrite the stats header and upsert today's daily summary.
    ///
    /// Repeated writes on the same calendar day overwrite that day's entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either table cannot be rewritten.
    pub fn persist(&self, records: &[WordRecord]) -> Result<(), StorageError> {
        let total_words = records.len() as u64;
        let avg_mastery = mean_mastery_percent(records);

        self.stats.save_stats_header(&TrainingStats {
            session_start: self.session_start,
            last_update: self.clock.now(),
            total_tests: self.total_tests,
            total_words,
            avg_mastery,
        })?;

        let mut history = self.stats.load_daily_log()?;
        history.insert(
            self.clock.day_key(),
            DailySummary {
                total_tests: self.total_tests,
                total_words,
                avg_mastery,
            },
        );
        self.stats.save_daily_log(&history)
    }

    /// The session counter pair shown by the UI shell.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_tests: self.total_tests,
            avg_mastery: self.avg_mastery,
        }
    }

    #[must_use]
    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    /// The daily series, date-ascending, for charting.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the persisted log cannot be read.
    pub fn history(&self) -> Result<Vec<DatedSummary>, StorageError> {
        Ok(self
            .stats
            .load_daily_log()?
            .into_iter()
            .map(|(date, summary)| DatedSummary { date, summary })
            .collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
