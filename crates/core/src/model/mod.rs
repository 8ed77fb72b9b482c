mod stats;
mod word;

pub use stats::{
    DailyHistory, DailySummary, DatedSummary, HISTORY_LIMIT, StatsSnapshot, TrainingStats,
    mean_mastery_percent, prune_history,
};
pub use word::{MEANING_SEPARATOR, WordError, WordRecord, merge_meanings};
