#![forbid(unsafe_code)]

//! Session orchestration for the vocabulary drill: the per-turn state
//! machine and the durable statistics ledger.

pub mod drill_service;
pub mod error;
pub mod ledger_service;

pub use drill_core::Clock;

pub use drill_service::{
    AnswerOutcome, CorrectionDecision, CorrectionOutcome, CurrentWord, DrillPhase, DrillService,
};
pub use error::DrillError;
pub use ledger_service::LedgerService;
