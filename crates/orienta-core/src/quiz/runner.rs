//! Session driver: the IO choreography around the pure state machine.
//!
//! The runner owns a [`QuizSession`] plus the injected collaborators and
//! translates their results into session transitions. Network-origin errors
//! never propagate past this layer; they become state.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::error::{CoreError, ProviderError};
use crate::events::Event;
use crate::providers::traits::{
    CompletionMarkerStore, QuestionProvider, ResultSubmitter, SubmissionRequest,
};
use crate::quiz::answers::AnswerSheet;
use crate::quiz::question::TestId;
use crate::quiz::session::{FailureKind, QuizSession, SessionState};

/// Default resubmission suppression window in seconds.
pub const DEFAULT_RESUBMIT_GUARD_SECS: u64 = 30;

pub struct SessionRunner {
    session: QuizSession,
    provider: Arc<dyn QuestionProvider>,
    submitter: Arc<dyn ResultSubmitter>,
    markers: Arc<dyn CompletionMarkerStore>,
    user_id: String,
    test_name: String,
    resubmit_guard_secs: u64,
}

impl SessionRunner {
    pub fn new(
        test_id: TestId,
        user_id: impl Into<String>,
        test_name: impl Into<String>,
        provider: Arc<dyn QuestionProvider>,
        submitter: Arc<dyn ResultSubmitter>,
        markers: Arc<dyn CompletionMarkerStore>,
    ) -> Self {
        Self {
            session: QuizSession::new(test_id),
            provider,
            submitter,
            markers,
            user_id: user_id.into(),
            test_name: test_name.into(),
            resubmit_guard_secs: DEFAULT_RESUBMIT_GUARD_SECS,
        }
    }

    pub fn with_auto_advance_delay_ms(mut self, delay_ms: u64) -> Self {
        self.session = self.session.with_auto_advance_delay_ms(delay_ms);
        self
    }

    pub fn with_resubmit_guard_secs(mut self, secs: u64) -> Self {
        self.resubmit_guard_secs = secs;
        self
    }

    /// Seed answers from a prior partial session before loading.
    pub fn restore_answers(&mut self, answers: AnswerSheet) {
        self.session.restore_answers(answers);
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut QuizSession {
        &mut self.session
    }

    /// Fetch questions and feed them into the session.
    pub fn load(&mut self) -> Result<Event, CoreError> {
        match self.provider.fetch(self.session.test_id()) {
            Ok(set) => Ok(self.session.questions_loaded(set)?),
            Err(err @ ProviderError::EmptyQuestionSet { .. }) => {
                Ok(self.session.load_failed(FailureKind::NoQuestions, err.to_string()))
            }
            Err(err) => Ok(self
                .session
                .load_failed(FailureKind::LoadFailed, err.to_string())),
        }
    }

    /// Retry a failed load. Valid only after a retryable failure.
    pub fn retry(&mut self) -> Result<Event, CoreError> {
        self.session.retry_load()?;
        self.load()
    }

    /// Whether a submission for this test went out within the guard window.
    pub fn recently_submitted(&self) -> bool {
        let Ok(Some(marked_at)) = self.markers.last_mark(self.session.test_id()) else {
            return false;
        };
        Utc::now() - marked_at < Duration::seconds(self.resubmit_guard_secs as i64)
    }

    /// Perform the submission the session is waiting on.
    ///
    /// Outcomes:
    /// - service acknowledged → `Completed` (persisted), marker written;
    /// - network/server failure → `Completed` with local analysis only,
    ///   marker still written;
    /// - duplicate completion → `Failed`, shell redirects to history;
    /// - a marker within the guard window → the network call is suppressed
    ///   and the session completes locally (remount/retry protection).
    pub fn submit(&mut self) -> Result<Event, CoreError> {
        if self.session.state() != SessionState::Submitting {
            return Err(crate::error::SessionError::InvalidState {
                state: self.session.state(),
            }
            .into());
        }
        if self.recently_submitted() {
            return Ok(self.session.complete_locally()?);
        }
        let request = SubmissionRequest {
            user_id: self.user_id.clone(),
            test_id: self.session.test_id().clone(),
            test_name: self.test_name.clone(),
            answers: self.session.answers().ordered_records(),
            analysis: self.session.preview_analysis(),
            duration_minutes: self.session.duration_minutes(),
        };
        match self.submitter.submit(&request) {
            Ok(result) => {
                let event = self.session.submission_succeeded(&result.id)?;
                self.write_marker();
                Ok(event)
            }
            Err(error) => {
                let event = self.session.submission_failed(&error)?;
                // The service was unreachable but the user still finished;
                // the marker guards their retry window too.
                if self.session.state() == SessionState::Completed {
                    self.write_marker();
                }
                Ok(event)
            }
        }
    }

    fn write_marker(&self) {
        // Best-effort: a failed marker write must never fail a completion.
        let _ = self.markers.mark(self.session.test_id(), Utc::now());
    }
}
