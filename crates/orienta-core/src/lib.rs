//! # Orienta Core Library
//!
//! This library provides the core logic for Orienta, a career-assessment
//! quiz engine. It follows a CLI-first philosophy: all operations are
//! available through a standalone CLI binary, with any GUI shell being a
//! thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Quiz Session**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` for the auto-advance to fire
//! - **Scoring**: Pure dimension-tally scorer producing an MBTI-style type
//!   code and trait-pair percentage splits
//! - **Providers**: Trait seams for the question service, result service
//!   and completion-marker store, with HTTP and in-memory implementations
//! - **Storage**: SQLite-based result history and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`QuizSession`]: Session state machine
//! - [`SessionRunner`]: IO choreography around the session
//! - [`scoring::score`]: Answer sheet to type analysis
//! - [`Database`]: Result history persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod providers;
pub mod quiz;
pub mod scoring;
pub mod storage;

pub use error::{ConfigError, CoreError, ProviderError, SessionError, StorageError, SubmitError};
pub use events::Event;
pub use providers::{
    CompletionMarkerStore, HttpApi, QuestionProvider, ResultSubmitter, SubmissionRequest,
    SubmittedResult,
};
pub use quiz::{
    AnswerOption, AnswerRecord, AnswerSheet, CompletionOutcome, FailureKind, Question, QuestionSet,
    QuizSession, SessionRunner, SessionState, TestId,
};
pub use scoring::{Dimension, DimensionTally, TraitPair, TraitPairResult, TypeAnalysis};
pub use storage::{Config, Database, ResultRecord, SqliteMarkerStore};
