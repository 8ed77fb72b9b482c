use std::collections::BTreeMap;
use std::fmt::Write as _;

use drill_core::model::{MEANING_SEPARATOR, WordRecord};

use crate::repository::StorageError;

/// Number of header lines before the data rows.
const HEADER_LINES: usize = 2;

fn malformed(line: usize, reason: impl Into<String>) -> StorageError {
    StorageError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

/// Parse the persisted word-list table into merged, sorted records.
///
/// The first two lines are the column titles and the alignment separator and
/// are skipped. Each data row is `| term | m1，m2 | mastery |`. Rows repeating
/// a term are merged: unseen meanings append, the first row's mastery wins.
/// The result is sorted lexicographically by term so a following save is
/// byte-stable.
///
/// # Errors
///
/// Returns `StorageError::MalformedRecord` when a row does not have exactly
/// three fields or its mastery is not a valid score. The whole load aborts;
/// partially corrupt files are never half-read.
pub fn parse(text: &str) -> Result<Vec<WordRecord>, StorageError> {
    let mut by_term: BTreeMap<String, WordRecord> = BTreeMap::new();

    for (index, line) in text.lines().enumerate().skip(HEADER_LINES) {
        let line_no = index + 1;
        let row = line.trim();
        if row.is_empty() {
            continue;
        }

        // `| a | b | c |` splits into five parts with empty ends.
        let parts: Vec<&str> = row.split('|').collect();
        if parts.len() != 5 || !parts[0].trim().is_empty() || !parts[4].trim().is_empty() {
            return Err(malformed(line_no, "expected 3 `|`-delimited fields"));
        }

        let term = parts[1].trim();
        let meanings: Vec<String> = parts[2]
            .trim()
            .split(MEANING_SEPARATOR)
            .map(str::to_owned)
            .collect();
        let mastery: f64 = parts[3]
            .trim()
            .parse()
            .map_err(|_| malformed(line_no, format!("mastery is not numeric: {}", parts[3].trim())))?;

        match by_term.get_mut(term) {
            Some(existing) => existing.absorb_duplicate_row(&meanings),
            None => {
                let record = WordRecord::new(term, meanings, mastery)
                    .map_err(|e| malformed(line_no, e.to_string()))?;
                by_term.insert(term.to_owned(), record);
            }
        }
    }

    // BTreeMap iteration order is the lexicographic term order.
    Ok(by_term.into_values().collect())
}

/// Render records into the word-list table, mastery to 4 decimal places.
#[must_use]
pub fn render(records: &[WordRecord]) -> String {
    let mut out = String::from("| term | meanings | mastery |\n| :---: | :---: | :---: |\n");
    for record in records {
        let _ = writeln!(
            out,
            "| {} | {} | {:.4} |",
            record.term(),
            record.display_meanings(),
            record.mastery()
        );
    }
    out
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
| term | meanings | mastery |
| :---: | :---: | :---: |
| dog | 狗 | 0.9000 |
| cat | 猫，猫咪 | 0.5000 |
";

    #[test]
    fn parses_and_sorts_by_term() {
        let records = parse(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].term(), "cat");
        assert_eq!(records[0].meanings(), ["猫", "猫咪"]);
        assert_eq!(records[1].term(), "dog");
        assert_eq!(records[1].mastery(), 0.9);
    }

    #[test]
    fn duplicate_rows_merge_with_first_mastery_winning() {
        let text = "\
| term | meanings | mastery |
| :---: | :---: | :---: |
| cat | 猫 | 0.3000 |
| cat | 猫咪，猫 | 0.8000 |
";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].meanings(), ["猫", "猫咪"]);
        assert_eq!(records[0].mastery(), 0.3);
    }

    #[test]
    fn duplicate_rows_clean_spaced_and_trailing_fragments() {
        // A trailing separator splits off an empty fragment; a space after
        // the separator pads the next one. Neither may reach the stored
        // meanings through the merge path.
        let text = "\
| term | meanings | mastery |
| :---: | :---: | :---: |
| cat | 猫 | 0.3000 |
| cat | 猫， 猫咪， | 0.8000 |
";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].meanings(), ["猫", "猫咪"]);
    }

    #[test]
    fn duplicate_row_merge_is_idempotent_across_reload() {
        let text = "\
| term | meanings | mastery |
| :---: | :---: | :---: |
| cat | 猫 | 0.3000 |
| cat | 猫咪，，猫 | 0.8000 |
";
        let first = parse(text).unwrap();
        let second = parse(&render(&first)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let text = "\
| term | meanings | mastery |
| :---: | :---: | :---: |

| cat | 猫 | 0.5000 |

";
        assert_eq!(parse(text).unwrap().len(), 1);
    }

    #[test]
    fn missing_field_aborts_the_load() {
        let text = "\
| term | meanings | mastery |
| :---: | :---: | :---: |
| cat | 0.5000 |
";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, StorageError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn non_numeric_mastery_aborts_the_load() {
        let text = "\
| term | meanings | mastery |
| :---: | :---: | :---: |
| cat | 猫 | high |
";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, StorageError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn out_of_range_mastery_aborts_the_load() {
        let text = "\
| term | meanings | mastery |
| :---: | :---: | :---: |
| cat | 猫 | 1.5000 |
";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, StorageError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn render_formats_mastery_to_four_decimals() {
        let records = vec![WordRecord::new("cat", vec!["猫".to_owned()], 0.5).unwrap()];
        let text = render(&records);
        assert!(text.ends_with("| cat | 猫 | 0.5000 |\n"));
    }

    #[test]
    fn parse_render_parse_is_idempotent() {
        let first = parse(SAMPLE).unwrap();
        let second = parse(&render(&first)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse("").unwrap().is_empty());
    }
}
