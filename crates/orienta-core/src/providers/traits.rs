use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, StorageError, SubmitError};
use crate::quiz::answers::AnswerRecord;
use crate::quiz::question::{QuestionSet, TestId};
use crate::scoring::TypeAnalysis;

/// Serves the ordered question sequence of a test.
/// Implementations are stateless between calls.
pub trait QuestionProvider: Send + Sync {
    fn fetch(&self, test_id: &TestId) -> Result<QuestionSet, ProviderError>;
}

/// Persists a finished answer set and returns the stored record.
pub trait ResultSubmitter: Send + Sync {
    fn submit(&self, request: &SubmissionRequest) -> Result<SubmittedResult, SubmitError>;
}

/// Key→timestamp store used for the short-window resubmission guard.
///
/// Keys follow the `lastSubmission_<testId>` layout. Read/write only, no
/// transactional guarantees required: the marker is defensive, not a lock.
pub trait CompletionMarkerStore: Send + Sync {
    fn mark(&self, test_id: &TestId, at: DateTime<Utc>) -> Result<(), StorageError>;
    fn last_mark(&self, test_id: &TestId) -> Result<Option<DateTime<Utc>>, StorageError>;
}

/// Storage key for a test's completion marker.
pub fn marker_key(test_id: &TestId) -> String {
    format!("lastSubmission_{test_id}")
}

/// Everything the result service needs to store a completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub user_id: String,
    pub test_id: TestId,
    pub test_name: String,
    /// Answer records in question order.
    pub answers: Vec<AnswerRecord>,
    /// Locally computed analysis, sent for the instant-result display.
    pub analysis: TypeAnalysis,
    pub duration_minutes: i64,
}

/// The persisted result record acknowledged by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedResult {
    pub id: String,
    pub test_id: TestId,
    /// Authoritative server-computed code; supersedes the local analysis
    /// when present.
    #[serde(default)]
    pub code: Option<String>,
    pub completed_at: DateTime<Utc>,
}
