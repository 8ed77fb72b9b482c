//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;

/// Errors emitted by `DrillService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DrillError {
    #[error("no word is currently scheduled")]
    NoCurrentWord,

    #[error("the previous answer is awaiting a correction decision")]
    AwaitingCorrection,

    #[error("no incorrect answer is awaiting a correction decision")]
    NotAwaitingCorrection,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
