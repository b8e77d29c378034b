use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::question::TestId;
use crate::quiz::session::SessionState;
use crate::scoring::Dimension;

/// Every state change in a quiz session produces an Event.
/// The embedding shell (CLI, GUI) renders or logs them; they serialize to
/// tagged JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Questions arrived and the session is ready for interaction.
    SessionLoaded {
        test_id: TestId,
        question_count: usize,
        /// Index the pointer was restored to (non-zero when resuming a
        /// partial session).
        resumed_at_index: usize,
        at: DateTime<Utc>,
    },
    /// An option was selected for the current question. Selecting a
    /// different option for an already-answered question produces this
    /// event again with the same `question_index`.
    AnswerRecorded {
        question_index: usize,
        option_text: String,
        dimension: Option<Dimension>,
        weight: f64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    /// The pointer moved to the next question (manually or by auto-advance).
    QuestionAdvanced {
        from_index: usize,
        to_index: usize,
        auto: bool,
        at: DateTime<Utc>,
    },
    /// The pointer moved to the previous question.
    QuestionRetreated {
        from_index: usize,
        to_index: usize,
        at: DateTime<Utc>,
    },
    /// The final answer set is being sent to the result service.
    SubmissionStarted {
        test_id: TestId,
        answered: usize,
        at: DateTime<Utc>,
    },
    /// Terminal: the session finished. `persisted` is false when the
    /// result service was unreachable and the session completed with the
    /// locally computed analysis only.
    SessionCompleted {
        test_id: TestId,
        code: String,
        persisted: bool,
        at: DateTime<Utc>,
    },
    /// The result service reported this test as already completed for the
    /// user; the shell should redirect to the result history.
    DuplicateDetected {
        test_id: TestId,
        at: DateTime<Utc>,
    },
    /// Question loading failed. `retryable` distinguishes transport errors
    /// from an empty question set.
    SessionFailed {
        test_id: TestId,
        reason: String,
        retryable: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        test_id: TestId,
        current_index: usize,
        question_count: usize,
        answered: usize,
        progress_pct: f64,
        pending_advance: bool,
        at: DateTime<Utc>,
    },
}
