use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::WordRecord;

//
// ─── DAILY HISTORY ─────────────────────────────────────────────────────────────
//

/// Maximum number of daily entries retained after pruning.
pub const HISTORY_LIMIT: usize = 10;

/// One day's training totals, written at that day's last persist.
///
/// `avg_mastery` is the mean mastery across all words, as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub total_tests: u64,
    pub total_words: u64,
    pub avg_mastery: f64,
}

/// Daily summaries keyed by an `MM-DD` day string.
///
/// The key is year-independent but sorts unambiguously, so the newest entries
/// are always at the back of the map.
pub type DailyHistory = BTreeMap<String, DailySummary>;

/// A history entry paired with its day key, for the read-only chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedSummary {
    pub date: String,
    pub summary: DailySummary,
}

/// Drop everything but the `HISTORY_LIMIT` most-recently-dated entries.
///
/// Runs once at process start, before the history is handed to any consumer.
pub fn prune_history(history: &mut DailyHistory) {
    if history.len() <= HISTORY_LIMIT {
        return;
    }
    let stale: Vec<String> = history
        .keys()
        .rev()
        .skip(HISTORY_LIMIT)
        .cloned()
        .collect();
    for date in stale {
        history.remove(&date);
    }
}

//
// ─── TRAINING STATS ────────────────────────────────────────────────────────────
//

/// The persisted stats-header row: session window plus cumulative totals.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingStats {
    pub session_start: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
    pub total_tests: u64,
    pub total_words: u64,
    pub avg_mastery: f64,
}

/// The collaborator-facing counter pair shown during a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_tests: u64,
    pub avg_mastery: f64,
}

/// Mean mastery across all records, as a percentage. Zero for an empty set.
#[must_use]
pub fn mean_mastery_percent(records: &[WordRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(WordRecord::mastery).sum();
    #[allow(clippy::cast_precision_loss)]
    let count = records.len() as f64;
    sum / count * 100.0
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(tests: u64) -> DailySummary {
        DailySummary {
            total_tests: tests,
            total_words: 5,
            avg_mastery: 50.0,
        }
    }

    #[test]
    fn prune_keeps_the_ten_most_recent_days() {
        let mut history = DailyHistory::new();
        for day in 1..=15 {
            history.insert(format!("03-{day:02}"), summary(day));
        }

        prune_history(&mut history);

        assert_eq!(history.len(), HISTORY_LIMIT);
        assert!(!history.contains_key("03-05"));
        assert!(history.contains_key("03-06"));
        assert!(history.contains_key("03-15"));
    }

    #[test]
    fn prune_leaves_small_histories_untouched() {
        let mut history = DailyHistory::new();
        history.insert("03-01".to_owned(), summary(1));
        history.insert("03-02".to_owned(), summary(2));

        prune_history(&mut history);

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn prune_orders_across_month_boundaries() {
        let mut history = DailyHistory::new();
        for day in 25u64..=31 {
            history.insert(format!("01-{day}"), summary(u64::from(day)));
        }
        for day in 1u64..=5 {
            history.insert(format!("02-{day:02}"), summary(u64::from(day)));
        }

        prune_history(&mut history);

        assert_eq!(history.len(), HISTORY_LIMIT);
        // 01-25 and 01-26 are the oldest of the twelve.
        assert!(!history.contains_key("01-25"));
        assert!(!history.contains_key("01-26"));
        assert!(history.contains_key("02-05"));
    }

    #[test]
    fn mean_mastery_is_zero_for_empty_vocabulary() {
        assert_eq!(mean_mastery_percent(&[]), 0.0);
    }

    #[test]
    fn mean_mastery_is_a_percentage() {
        let records = vec![
            WordRecord::new("a", vec!["x".to_owned()], 0.2).unwrap(),
            WordRecord::new("b", vec!["y".to_owned()], 0.6).unwrap(),
        ];
        assert!((mean_mastery_percent(&records) - 40.0).abs() < 1e-9);
    }
}
