#![forbid(unsafe_code)]

//! Persistence for the vocabulary drill: repository traits, the plain-text
//! and JSON file adapters, and an in-memory adapter for tests.

pub mod file;
pub mod repository;

pub use file::{DrillPaths, FileStorage};
pub use repository::{
    InMemoryStorage, Storage, StorageError, TrainingLogRepository, VocabularyRepository,
};
