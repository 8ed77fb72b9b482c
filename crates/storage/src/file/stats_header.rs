use chrono::NaiveDateTime;

use drill_core::model::TrainingStats;

use crate::repository::StorageError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn malformed(line: usize, reason: impl Into<String>) -> StorageError {
    StorageError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

/// Parse the single-row stats header table.
///
/// Two header lines, then
/// `| session_start | last_update | total_tests | total_words | avg_mastery |`.
/// Returns `None` when no data row is present.
///
/// # Errors
///
/// Returns `StorageError::MalformedRecord` when the data row is corrupt.
pub fn parse(text: &str) -> Result<Option<TrainingStats>, StorageError> {
    let Some((index, row)) = text
        .lines()
        .enumerate()
        .skip(2)
        .map(|(i, l)| (i, l.trim()))
        .find(|(_, l)| !l.is_empty())
    else {
        return Ok(None);
    };
    let line_no = index + 1;

    let parts: Vec<&str> = row.split('|').map(str::trim).collect();
    if parts.len() != 7 {
        return Err(malformed(line_no, "expected 5 `|`-delimited fields"));
    }

    let session_start = NaiveDateTime::parse_from_str(parts[1], TIMESTAMP_FORMAT)
        .map_err(|e| malformed(line_no, format!("bad session_start: {e}")))?
        .and_utc();
    let last_update = NaiveDateTime::parse_from_str(parts[2], TIMESTAMP_FORMAT)
        .map_err(|e| malformed(line_no, format!("bad last_update: {e}")))?
        .and_utc();
    let total_tests: u64 = parts[3]
        .parse()
        .map_err(|_| malformed(line_no, format!("total_tests is not numeric: {}", parts[3])))?;
    let total_words: u64 = parts[4]
        .parse()
        .map_err(|_| malformed(line_no, format!("total_words is not numeric: {}", parts[4])))?;
    let avg_mastery: f64 = parts[5]
        .parse()
        .map_err(|_| malformed(line_no, format!("avg_mastery is not numeric: {}", parts[5])))?;

    Ok(Some(TrainingStats {
        session_start,
        last_update,
        total_tests,
        total_words,
        avg_mastery,
    }))
}

/// Render the stats header table, average to 2 decimal places.
#[must_use]
pub fn render(stats: &TrainingStats) -> String {
    format!(
        "| session_start | last_update | total_tests | total_words | avg_mastery |\n\
         | :---: | :---: | :---: | :---: | :---: |\n\
         | {} | {} | {} | {} | {:.2} |\n",
        stats.session_start.format(TIMESTAMP_FORMAT),
        stats.last_update.format(TIMESTAMP_FORMAT),
        stats.total_tests,
        stats.total_words,
        stats.avg_mastery,
    )
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
