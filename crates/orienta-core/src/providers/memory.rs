//! Deterministic in-memory collaborators.
//!
//! Used by tests and by embedders that run fully offline. The marker store
//! is the reference implementation of the injected-idempotency-store
//! redesign: substituting it makes the runner deterministic to test.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::{ProviderError, StorageError, SubmitError};
use crate::providers::traits::{
    marker_key, CompletionMarkerStore, QuestionProvider, ResultSubmitter, SubmissionRequest,
    SubmittedResult,
};
use crate::quiz::question::{QuestionSet, TestId};

/// Serves one fixed question set.
pub struct StaticQuestionProvider {
    set: QuestionSet,
}

impl StaticQuestionProvider {
    pub fn new(set: QuestionSet) -> Self {
        Self { set }
    }
}

impl QuestionProvider for StaticQuestionProvider {
    fn fetch(&self, test_id: &TestId) -> Result<QuestionSet, ProviderError> {
        if test_id != self.set.test_id() {
            return Err(ProviderError::NotFound {
                test_id: test_id.clone(),
            });
        }
        Ok(self.set.clone())
    }
}

/// Always fails with a clone of the given error.
pub struct FailingQuestionProvider {
    error: ProviderError,
}

impl FailingQuestionProvider {
    pub fn new(error: ProviderError) -> Self {
        Self { error }
    }
}

impl QuestionProvider for FailingQuestionProvider {
    fn fetch(&self, _test_id: &TestId) -> Result<QuestionSet, ProviderError> {
        Err(self.error.clone())
    }
}

/// Records every submission and replays scripted outcomes.
///
/// With no scripted outcomes queued, every submission succeeds with a
/// generated record id.
#[derive(Default)]
pub struct ScriptedSubmitter {
    outcomes: Mutex<VecDeque<Result<SubmittedResult, SubmitError>>>,
    requests: Mutex<Vec<SubmissionRequest>>,
}

impl ScriptedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful outcome for the next submission.
    pub fn push_ok(&self, result: SubmittedResult) {
        self.outcomes.lock().unwrap().push_back(Ok(result));
    }

    /// Queue a failure for the next submission.
    pub fn push_err(&self, error: SubmitError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Copies of all requests seen so far.
    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ResultSubmitter for ScriptedSubmitter {
    fn submit(&self, request: &SubmissionRequest) -> Result<SubmittedResult, SubmitError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.outcomes.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Ok(SubmittedResult {
                id: format!("result-{}", self.call_count()),
                test_id: request.test_id.clone(),
                code: Some(request.analysis.code.clone()),
                completed_at: Utc::now(),
            }),
        }
    }
}

/// Marker store backed by a process-local map.
#[derive(Default)]
pub struct MemoryMarkerStore {
    marks: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl MemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionMarkerStore for MemoryMarkerStore {
    fn mark(&self, test_id: &TestId, at: DateTime<Utc>) -> Result<(), StorageError> {
        self.marks.lock().unwrap().insert(marker_key(test_id), at);
        Ok(())
    }

    fn last_mark(&self, test_id: &TestId) -> Result<Option<DateTime<Utc>>, StorageError> {
        Ok(self.marks.lock().unwrap().get(&marker_key(test_id)).copied())
    }
}
