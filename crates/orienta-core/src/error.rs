//! Core error types for orienta-core.
//!
//! This module defines the error hierarchy using thiserror. Network-origin
//! errors are translated into session state transitions at the fetch and
//! submission boundaries; they are never thrown upward into rendering code.

use std::path::PathBuf;
use thiserror::Error;

use crate::quiz::question::TestId;
use crate::quiz::session::SessionState;

/// Core error type for orienta-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Question provider errors
    #[error("question provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Result submission errors
    #[error("submission error: {0}")]
    Submit(#[from] SubmitError),

    /// Session state machine errors
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Storage-related errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from a [`crate::providers::QuestionProvider`].
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The test does not exist on the question service.
    #[error("test '{test_id}' not found")]
    NotFound { test_id: TestId },

    /// Transport-level failure. Retryable.
    #[error("question fetch failed: {0}")]
    Network(String),

    /// The service answered with an empty question sequence. Retrying the
    /// same fetch returns the same empty result, so this is not retryable.
    #[error("test '{test_id}' has no questions")]
    EmptyQuestionSet { test_id: TestId },

    /// The payload could not be decoded.
    #[error("malformed question payload: {0}")]
    Malformed(String),
}

/// Errors from a [`crate::providers::ResultSubmitter`].
#[derive(Error, Debug, Clone)]
pub enum SubmitError {
    /// The result service recorded a completion for this user+test already.
    #[error("test '{test_id}' was already completed for this user")]
    DuplicateCompletion { test_id: TestId },

    /// Transport-level failure.
    #[error("result submission failed: {0}")]
    Network(String),

    /// The result service answered with a non-success status.
    #[error("result service error (status {status})")]
    Server { status: u16 },
}

/// Errors from [`crate::quiz::QuizSession`] commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A command arrived in a state that cannot accept it.
    #[error("unexpected command in state {state:?}")]
    InvalidState { state: SessionState },

    /// The session is not displaying a question right now.
    #[error("session is not accepting answers (state: {state:?})")]
    NotAnswerable { state: SessionState },

    /// The selected option index does not exist on the current question.
    #[error("option {index} out of range ({len} options)")]
    OptionOutOfRange { index: usize, len: usize },

    /// Advancing requires an answer for the current question.
    #[error("question {index} has no answer yet")]
    Unanswered { index: usize },

    /// Submission attempted with an incomplete answer sheet.
    #[error("cannot submit: {answered} of {total} questions answered")]
    NotComplete { answered: usize, total: usize },
}

/// Storage-specific errors.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Failed to open the database file.
    #[error("failed to open database at {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another connection.
    #[error("database is locked")]
    Locked,

    /// A record could not be encoded for storage.
    #[error("failed to encode record: {0}")]
    Encode(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// Failed to load configuration.
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration.
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration.
    #[error("failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
