//! Error types for monthcal.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in monthcal operations.
///
/// None of these are fatal: callers surface a message and keep the
/// previous state.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid event: {0}")]
    Validation(#[from] ValidationError),

    #[error("No event '{id}' on {date}")]
    NotFound { date: NaiveDate, id: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No date selected")]
    NoDateSelected,
}

/// Reasons an event draft or patch is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("title is {len} characters, the maximum is {max}")]
    TitleTooLong { len: usize, max: usize },

    #[error("duplicate event id '{id}' on {date}")]
    DuplicateId { date: NaiveDate, id: String },
}

/// Failures of the persistent key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("quota exceeded writing '{key}' ({size} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for monthcal operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
