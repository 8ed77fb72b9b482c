use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use drill_core::Clock;
use drill_core::model::{DatedSummary, StatsSnapshot, WordRecord};
use drill_core::proficiency::{on_acknowledge_error, on_correct};
use drill_core::scheduler;
use storage::{Storage, VocabularyRepository};

use crate::error::DrillError;
use crate::ledger_service::LedgerService;

//
// ─── TURN TYPES ────────────────────────────────────────────────────────────────
//

/// The two phases of an interactive turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillPhase {
    /// Waiting for a translation (or an empty submission to skip).
    AwaitingAnswer,
    /// The last answer was wrong; a correction decision is required before
    /// anything else.
    AwaitingCorrectionDecision,
}

/// The word currently being drilled, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentWord {
    pub term: String,
    pub meanings: String,
}

/// Result of one answer submission.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// The answer matched a meaning exactly; mastery grew to this value.
    Correct { mastery: f64 },
    /// No meaning matched; the correct display string is returned and a
    /// correction decision is now pending.
    Incorrect { meanings: String },
    /// Empty input: the drill advanced without touching mastery.
    Skipped,
}

/// How to resolve a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionDecision {
    /// The submitted answer was actually right: keep it as a new meaning.
    AcceptNew,
    /// The answer was wrong: lower mastery.
    AcknowledgeError,
}

/// State of the current word after a correction was resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionOutcome {
    pub mastery: f64,
    pub meanings: String,
}

//
// ─── DRILL SERVICE ─────────────────────────────────────────────────────────────
//

/// Orchestrates one interactive turn: present a word, take the answer, update
/// mastery, update the ledger, advance.
///
/// The record list stays sorted by term for the whole process lifetime (the
/// load normalizes it and nothing reorders afterwards), so the current word
/// is tracked by term and found by binary search.
pub struct DrillService {
    words: Arc<dyn VocabularyRepository>,
    ledger: LedgerService,
    records: Vec<WordRecord>,
    current: Option<String>,
    pending_answer: Option<String>,
    phase: DrillPhase,
    rng: StdRng,
}

impl DrillService {
    /// Load the vocabulary and statistics and get ready for the first turn.
    ///
    /// The loaded word list is saved straight back, so duplicate rows left by
    /// hand edits are merged on disk immediately. No word is scheduled until
    /// the first [`DrillService::advance`].
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Storage` if any backing file is corrupt or
    /// unwritable.
    pub fn bootstrap(clock: Clock, storage: &Storage) -> Result<Self, DrillError> {
        let ledger = LedgerService::bootstrap(clock, Arc::clone(&storage.stats))?;

        let mut records = storage.words.load_words()?;
        records.sort_by(|a, b| a.term().cmp(b.term()));
        storage.words.save_words(&records)?;
        debug!(words = records.len(), "vocabulary loaded");

        Ok(Self {
            words: Arc::clone(&storage.words),
            ledger,
            records,
            current: None,
            pending_answer: None,
            phase: DrillPhase::AwaitingAnswer,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Replace the draw RNG with a seeded one, for deterministic tests.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    /// The word being drilled, or `None` when the vocabulary is empty or no
    /// word has been scheduled yet.
    #[must_use]
    pub fn current_word(&self) -> Option<CurrentWord> {
        self.current_index().map(|i| {
            let record = &self.records[i];
            CurrentWord {
                term: record.term().to_owned(),
                meanings: record.display_meanings(),
            }
        })
    }

    /// Bare term of the current word, for the dictionary-lookup pass-through.
    #[must_use]
    pub fn current_term(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Draw the next word and reset the correction gate.
    ///
    /// Returns `Ok(None)` when the vocabulary is empty: the "no more words"
    /// display state.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Storage` if the statistics cannot be persisted.
    pub fn advance(&mut self) -> Result<Option<CurrentWord>, DrillError> {
        self.phase = DrillPhase::AwaitingAnswer;
        self.pending_answer = None;
        self.current = scheduler::pick_index(&self.records, &mut self.rng)
            .map(|i| self.records[i].term().to_owned());
        if let Some(term) = &self.current {
            debug!(%term, "next word scheduled");
        }

        self.ledger.persist(&self.records)?;
        Ok(self.current_word())
    }

    /// Submit a translation for the current word.
    ///
    /// Empty input skips: the drill advances immediately and neither mastery
    /// nor the counters change. A match applies the growth curve; a miss
    /// opens the correction gate and keeps the answer for a possible
    /// accept-correction.
    ///
    /// # Errors
    ///
    /// - `DrillError::AwaitingCorrection` while a correction is pending
    /// - `DrillError::NoCurrentWord` when nothing is scheduled
    /// - `DrillError::Storage` if persistence fails
    pub fn submit_answer(&mut self, text: &str) -> Result<AnswerOutcome, DrillError> {
        if self.phase == DrillPhase::AwaitingCorrectionDecision {
            return Err(DrillError::AwaitingCorrection);
        }

        let answer = text.trim();
        if answer.is_empty() {
            self.advance()?;
            return Ok(AnswerOutcome::Skipped);
        }

        let index = self.current_index().ok_or(DrillError::NoCurrentWord)?;
        let outcome = if self.records[index].matches(answer) {
            let next = on_correct(self.records[index].mastery());
            self.records[index].set_mastery(next);
            self.words.save_words(&self.records)?;
            AnswerOutcome::Correct { mastery: next }
        } else {
            self.phase = DrillPhase::AwaitingCorrectionDecision;
            self.pending_answer = Some(answer.to_owned());
            AnswerOutcome::Incorrect {
                meanings: self.records[index].display_meanings(),
            }
        };

        self.ledger.record_outcome(&self.records);
        self.ledger.persist(&self.records)?;
        Ok(outcome)
    }

    /// Resolve a pending wrong answer.
    ///
    /// `AcceptNew` appends the retained answer as an additional meaning and
    /// leaves mastery alone; `AcknowledgeError` applies the shrink curve.
    /// Either way the gate clears, the ledger counts one more drill, and the
    /// same word stays current.
    ///
    /// # Errors
    ///
    /// - `DrillError::NotAwaitingCorrection` when no correction is pending
    /// - `DrillError::NoCurrentWord` when nothing is scheduled
    /// - `DrillError::Storage` if persistence fails
    pub fn resolve_correction(
        &mut self,
        decision: CorrectionDecision,
    ) -> Result<CorrectionOutcome, DrillError> {
        if self.phase != DrillPhase::AwaitingCorrectionDecision {
            return Err(DrillError::NotAwaitingCorrection);
        }
        let index = self.current_index().ok_or(DrillError::NoCurrentWord)?;

        match decision {
            CorrectionDecision::AcceptNew => {
                if let Some(answer) = self.pending_answer.take() {
                    self.records[index].add_meaning(answer);
                }
            }
            CorrectionDecision::AcknowledgeError => {
                let next = on_acknowledge_error(self.records[index].mastery());
                self.records[index].set_mastery(next);
            }
        }
        self.words.save_words(&self.records)?;

        self.phase = DrillPhase::AwaitingAnswer;
        self.pending_answer = None;
        self.ledger.record_outcome(&self.records);
        self.ledger.persist(&self.records)?;

        Ok(CorrectionOutcome {
            mastery: self.records[index].mastery(),
            meanings: self.records[index].display_meanings(),
        })
    }

    /// Session counters for the UI shell.
    #[must_use]
    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.ledger.snapshot()
    }

    /// The daily history series, read-only, for charting.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Storage` if the persisted log cannot be read.
    pub fn history_series(&self) -> Result<Vec<DatedSummary>, DrillError> {
        Ok(self.ledger.history()?)
    }

    fn current_index(&self) -> Option<usize> {
        let term = self.current.as_deref()?;
        self.records
            .binary_search_by(|r| r.term().cmp(term))
            .ok()
    }
}
