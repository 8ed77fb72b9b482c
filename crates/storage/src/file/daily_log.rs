use drill_core::model::DailyHistory;

use crate::repository::StorageError;

/// Decode the daily log mapping (`MM-DD` → summary).
///
/// An empty document is an empty history.
///
/// # Errors
///
/// Returns `StorageError::MalformedRecord` when the JSON cannot be decoded.
pub fn parse(text: &str) -> Result<DailyHistory, StorageError> {
    if text.trim().is_empty() {
        return Ok(DailyHistory::new());
    }
    serde_json::from_str(text).map_err(|e| StorageError::MalformedRecord {
        line: e.line(),
        reason: e.to_string(),
    })
}

/// Encode the daily log, pretty-printed for hand inspection.
#[must_use]
pub fn render(history: &DailyHistory) -> String {
    // A string map of plain numbers cannot fail to serialize.
    serde_json::to_string_pretty(history).unwrap_or_default()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
