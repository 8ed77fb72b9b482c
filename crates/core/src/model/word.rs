use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WordError {
    #[error("term must not be empty")]
    EmptyTerm,

    #[error("mastery must be finite and within [0, 1], got {provided}")]
    MasteryOutOfRange { provided: f64 },
}

//
// ─── MEANING MERGE ─────────────────────────────────────────────────────────────
//

/// Separator used between meanings in the persisted word list (U+FF0C).
pub const MEANING_SEPARATOR: char = '，';

/// Merge two meaning lists without introducing duplicates.
///
/// Each incoming meaning not already present (by exact string match) is
/// appended after the existing ones, so first-insertion order is preserved
/// for display.
#[must_use]
pub fn merge_meanings(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = existing.to_vec();
    for meaning in incoming {
        if !merged.iter().any(|m| m == meaning) {
            merged.push(meaning.clone());
        }
    }
    merged
}

//
// ─── WORD RECORD ───────────────────────────────────────────────────────────────
//

/// One vocabulary entry: a term, its known translations, and a mastery score.
///
/// Mastery is a proficiency estimate in `[0, 1]`; every mutation path clamps
/// back into that interval. Meaning lists never contain exact duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    term: String,
    meanings: Vec<String>,
    mastery: f64,
}

impl WordRecord {
    /// Build a record, de-duplicating meanings and validating mastery.
    ///
    /// Empty meaning fragments are dropped (they appear when a persisted row
    /// carries a trailing separator).
    ///
    /// # Errors
    ///
    /// Returns `WordError::EmptyTerm` for a blank term and
    /// `WordError::MasteryOutOfRange` when mastery is not finite or falls
    /// outside `[0, 1]`.
    pub fn new(
        term: impl Into<String>,
        meanings: impl IntoIterator<Item = String>,
        mastery: f64,
    ) -> Result<Self, WordError> {
        let term = term.into();
        if term.trim().is_empty() {
            return Err(WordError::EmptyTerm);
        }
        if !mastery.is_finite() || !(0.0..=1.0).contains(&mastery) {
            return Err(WordError::MasteryOutOfRange { provided: mastery });
        }

        let cleaned: Vec<String> = meanings
            .into_iter()
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
            .collect();

        Ok(Self {
            term,
            meanings: merge_meanings(&[], &cleaned),
            mastery,
        })
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn meanings(&self) -> &[String] {
        &self.meanings
    }

    /// The meanings joined with the persisted-format separator, for display.
    #[must_use]
    pub fn display_meanings(&self) -> String {
        self.meanings.join(&MEANING_SEPARATOR.to_string())
    }

    #[must_use]
    pub fn mastery(&self) -> f64 {
        self.mastery
    }

    /// Overwrite mastery, clamped into `[0, 1]`.
    pub fn set_mastery(&mut self, value: f64) {
        self.mastery = value.clamp(0.0, 1.0);
    }

    /// Exact-match an answer against the meaning list.
    ///
    /// Not substring, not fuzzy: the answer must equal one meaning verbatim.
    #[must_use]
    pub fn matches(&self, answer: &str) -> bool {
        self.meanings.iter().any(|m| m == answer)
    }

    /// Append a meaning unless it is already present.
    ///
    /// Returns `true` when the meaning was added.
    pub fn add_meaning(&mut self, meaning: impl Into<String>) -> bool {
        let meaning = meaning.into();
        let meaning = meaning.trim();
        if meaning.is_empty() || self.meanings.iter().any(|m| m == meaning) {
            return false;
        }
        self.meanings.push(meaning.to_owned());
        true
    }

    /// Fold a duplicate persisted row into this record.
    ///
    /// Incoming fragments get the same cleanup as the constructor: trimmed,
    /// with empties dropped. Meanings merge; the duplicate row's mastery is
    /// discarded. The first occurrence's mastery wins.
    pub fn absorb_duplicate_row(&mut self, incoming_meanings: &[String]) {
        let cleaned: Vec<String> = incoming_meanings
            .iter()
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
            .collect();
        self.meanings = merge_meanings(&self.meanings, &cleaned);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
