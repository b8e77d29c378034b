//! Quiz session state machine.
//!
//! The session is a wall-clock-based state machine. It performs no IO and
//! spawns no threads: the embedding layer fetches questions, submits results
//! and calls `tick()` periodically for the auto-advance to fire.
//!
//! ## State transitions
//!
//! ```text
//! Loading -> Ready -> Answering -> Submitting -> Completed
//!    |                                  |
//!    +-> Failed (load)                  +-> Failed (already completed)
//! ```
//!
//! Selecting an option records the answer and schedules a delayed advance;
//! the delay is a UX debounce so the selection's visual feedback can render,
//! not a correctness requirement. At most one advance is ever pending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SubmitError};
use crate::events::Event;
use crate::quiz::answers::{AnswerRecord, AnswerSheet};
use crate::quiz::question::{Question, QuestionSet, TestId};
use crate::scoring::{self, TypeAnalysis};

/// Default auto-advance delay in milliseconds.
pub const DEFAULT_AUTO_ADVANCE_DELAY_MS: u64 = 350;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Loading,
    Ready,
    Answering,
    Submitting,
    Completed,
    Failed,
}

/// Why a session is in the `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Question fetch failed; retryable.
    LoadFailed,
    /// The service returned zero questions; retrying returns the same.
    NoQuestions,
    /// The result service already holds a completion for this user+test;
    /// the shell redirects to the result history instead of retrying.
    AlreadyCompleted,
}

impl FailureKind {
    pub fn retryable(self) -> bool {
        matches!(self, FailureKind::LoadFailed)
    }
}

/// How a completed session ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    /// False when the result service was unreachable and the session
    /// completed with the locally computed analysis only.
    pub persisted: bool,
    /// Identifier of the stored result record, when one exists.
    pub result_id: Option<String>,
    pub analysis: TypeAnalysis,
}

/// Drives a single user through an ordered question sequence: one answer per
/// question, backward navigation without losing progress, auto-advance on
/// selection, and exactly one submission on completion.
///
/// Serializable, so a partial session survives process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    test_id: TestId,
    state: SessionState,
    questions: Option<QuestionSet>,
    answers: AnswerSheet,
    current_index: usize,
    /// Option index highlighted on the current question.
    #[serde(default)]
    selected_option: Option<usize>,
    /// Epoch-millisecond deadline of the pending auto-advance. At most one
    /// exists; selecting a new answer replaces it.
    #[serde(default)]
    pending_advance_at: Option<u64>,
    auto_advance_delay_ms: u64,
    #[serde(default)]
    failure: Option<FailureKind>,
    #[serde(default)]
    outcome: Option<CompletionOutcome>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Create a session for `test_id`, waiting for questions.
    pub fn new(test_id: TestId) -> Self {
        Self {
            test_id,
            state: SessionState::Loading,
            questions: None,
            answers: AnswerSheet::new(),
            current_index: 0,
            selected_option: None,
            pending_advance_at: None,
            auto_advance_delay_ms: DEFAULT_AUTO_ADVANCE_DELAY_MS,
            failure: None,
            outcome: None,
            started_at: Utc::now(),
        }
    }

    pub fn with_auto_advance_delay_ms(mut self, delay_ms: u64) -> Self {
        self.auto_advance_delay_ms = delay_ms;
        self
    }

    /// Seed answers from a prior partial session (page reload, process
    /// restart). Must happen before the questions arrive; the pointer is
    /// restored in [`QuizSession::questions_loaded`].
    pub fn restore_answers(&mut self, answers: AnswerSheet) {
        if self.state == SessionState::Loading {
            self.answers = answers;
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.as_ref()?.get(self.current_index)
    }

    /// Highlighted option index on the current question.
    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn total_questions(&self) -> usize {
        self.questions.as_ref().map(QuestionSet::len).unwrap_or(0)
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn progress_pct(&self) -> f64 {
        self.answers.progress_pct(self.total_questions())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.is_complete(self.total_questions())
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    pub fn outcome(&self) -> Option<&CompletionOutcome> {
        self.outcome.as_ref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Minutes elapsed since the questions arrived, for the result payload.
    pub fn duration_minutes(&self) -> i64 {
        (Utc::now() - self.started_at).num_minutes()
    }

    /// Deadline of the pending auto-advance, if one is scheduled.
    pub fn pending_advance_deadline(&self) -> Option<u64> {
        self.pending_advance_at
    }

    /// Instant preview of the current tally; safe on a partial sheet.
    pub fn preview_analysis(&self) -> TypeAnalysis {
        scoring::score(&self.answers)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            test_id: self.test_id.clone(),
            current_index: self.current_index,
            question_count: self.total_questions(),
            answered: self.answered_count(),
            progress_pct: self.progress_pct(),
            pending_advance: self.pending_advance_at.is_some(),
            at: Utc::now(),
        }
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Question data arrived. Restores the pointer to the furthest answered
    /// index when resuming; otherwise resets to zero and clears any stale
    /// selection left over from a different test.
    pub fn questions_loaded(&mut self, questions: QuestionSet) -> Result<Event, SessionError> {
        if self.state != SessionState::Loading {
            return Err(SessionError::InvalidState { state: self.state });
        }
        let last = questions.len() - 1;
        self.questions = Some(questions);
        if self.answers.is_empty() {
            self.current_index = 0;
            self.selected_option = None;
        } else {
            self.current_index = self.answers.furthest_index().unwrap_or(0).min(last);
            self.selected_option = self.selected_for(self.current_index);
        }
        self.state = SessionState::Ready;
        self.started_at = Utc::now();
        Ok(Event::SessionLoaded {
            test_id: self.test_id.clone(),
            question_count: self.total_questions(),
            resumed_at_index: self.current_index,
            at: Utc::now(),
        })
    }

    /// Question fetch failed or returned nothing usable.
    pub fn load_failed(&mut self, kind: FailureKind, reason: impl Into<String>) -> Event {
        self.state = SessionState::Failed;
        self.failure = Some(kind);
        Event::SessionFailed {
            test_id: self.test_id.clone(),
            reason: reason.into(),
            retryable: kind.retryable(),
            at: Utc::now(),
        }
    }

    /// Go back to `Loading` for another fetch attempt. Only valid after a
    /// retryable load failure.
    pub fn retry_load(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Failed || self.failure != Some(FailureKind::LoadFailed) {
            return Err(SessionError::InvalidState { state: self.state });
        }
        self.state = SessionState::Loading;
        self.failure = None;
        Ok(())
    }

    // ── Answering ────────────────────────────────────────────────────

    /// Select an option for the current question.
    ///
    /// Writes or overwrites the answer record at the current index and
    /// schedules the auto-advance, replacing any pending one.
    pub fn select_option(&mut self, option_index: usize) -> Result<Event, SessionError> {
        self.select_option_at(option_index, now_ms())
    }

    /// [`QuizSession::select_option`] with an explicit clock, for
    /// deterministic tests.
    pub fn select_option_at(
        &mut self,
        option_index: usize,
        now_ms: u64,
    ) -> Result<Event, SessionError> {
        if !matches!(self.state, SessionState::Ready | SessionState::Answering) {
            return Err(SessionError::NotAnswerable { state: self.state });
        }
        let question = self
            .current_question()
            .ok_or(SessionError::NotAnswerable { state: self.state })?;
        let options = &question.options;
        let option = options.get(option_index).ok_or(SessionError::OptionOutOfRange {
            index: option_index,
            len: options.len(),
        })?;
        let record = AnswerRecord::from_selection(question, option);
        let index = self.current_index;
        let (option_text, dimension, weight) =
            (record.option_text.clone(), record.dimension, record.weight);
        self.answers.record(index, record);
        self.selected_option = Some(option_index);
        self.state = SessionState::Answering;
        // Replaces any pending deadline: at most one auto-advance exists.
        self.pending_advance_at = Some(now_ms + self.auto_advance_delay_ms);
        debug_assert!(self.answered_count() <= self.total_questions());
        Ok(Event::AnswerRecorded {
            question_index: index,
            option_text,
            dimension,
            weight,
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        })
    }

    /// Move to the next question, or into `Submitting` from the last one.
    /// Requires an answer for the current question.
    pub fn advance(&mut self) -> Result<Event, SessionError> {
        self.advance_with(false)
    }

    fn advance_with(&mut self, auto: bool) -> Result<Event, SessionError> {
        if !matches!(self.state, SessionState::Ready | SessionState::Answering) {
            return Err(SessionError::InvalidState { state: self.state });
        }
        if self.answers.get(self.current_index).is_none() {
            return Err(SessionError::Unanswered {
                index: self.current_index,
            });
        }
        self.pending_advance_at = None;
        let total = self.total_questions();
        if self.current_index + 1 < total {
            let from = self.current_index;
            self.current_index += 1;
            self.selected_option = self.selected_for(self.current_index);
            self.state = SessionState::Answering;
            return Ok(Event::QuestionAdvanced {
                from_index: from,
                to_index: self.current_index,
                auto,
                at: Utc::now(),
            });
        }
        // Last question: attempt submission exactly once. The state check
        // above already rules out Submitting/Completed re-entry.
        if !self.answers.is_complete(total) {
            return Err(SessionError::NotComplete {
                answered: self.answered_count(),
                total,
            });
        }
        debug_assert!(self.answered_count() == total);
        self.state = SessionState::Submitting;
        Ok(Event::SubmissionStarted {
            test_id: self.test_id.clone(),
            answered: self.answered_count(),
            at: Utc::now(),
        })
    }

    /// Move to the previous question (floor zero). Does not touch answers.
    pub fn retreat(&mut self) -> Result<Event, SessionError> {
        if !matches!(self.state, SessionState::Ready | SessionState::Answering) {
            return Err(SessionError::InvalidState { state: self.state });
        }
        self.pending_advance_at = None;
        let from = self.current_index;
        self.current_index = self.current_index.saturating_sub(1);
        self.selected_option = self.selected_for(self.current_index);
        self.state = SessionState::Answering;
        Ok(Event::QuestionRetreated {
            from_index: from,
            to_index: self.current_index,
            at: Utc::now(),
        })
    }

    /// Call periodically. Fires the pending auto-advance once its deadline
    /// has passed.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    /// [`QuizSession::tick`] with an explicit clock, for deterministic tests.
    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        if !matches!(self.state, SessionState::Ready | SessionState::Answering) {
            return None;
        }
        let deadline = self.pending_advance_at?;
        if now_ms < deadline {
            return None;
        }
        self.pending_advance_at = None;
        match self.advance_with(true) {
            Ok(event) => Some(event),
            Err(_) => {
                // A deadline is only scheduled right after an answer is
                // recorded, so advancing cannot lack an answer.
                debug_assert!(false, "auto-advance fired without an answer");
                None
            }
        }
    }

    /// Drop the pending auto-advance. Cleanup obligation when the view
    /// owning this session goes away mid-quiz.
    pub fn cancel_pending_advance(&mut self) {
        self.pending_advance_at = None;
    }

    // ── Submission ───────────────────────────────────────────────────

    /// The result service acknowledged the submission.
    pub fn submission_succeeded(&mut self, result_id: &str) -> Result<Event, SessionError> {
        if self.state != SessionState::Submitting {
            debug_assert!(false, "submission_succeeded outside Submitting");
            return Err(SessionError::InvalidState { state: self.state });
        }
        self.finish(true, Some(result_id.to_string()))
    }

    /// The result service failed. A duplicate completion fails the session
    /// toward a redirect; anything else degrades to a local-only completion
    /// so the user is never blocked by a backend outage.
    pub fn submission_failed(&mut self, error: &SubmitError) -> Result<Event, SessionError> {
        if self.state != SessionState::Submitting {
            debug_assert!(false, "submission_failed outside Submitting");
            return Err(SessionError::InvalidState { state: self.state });
        }
        match error {
            SubmitError::DuplicateCompletion { .. } => {
                self.state = SessionState::Failed;
                self.failure = Some(FailureKind::AlreadyCompleted);
                Ok(Event::DuplicateDetected {
                    test_id: self.test_id.clone(),
                    at: Utc::now(),
                })
            }
            SubmitError::Network(_) | SubmitError::Server { .. } => self.complete_locally(),
        }
    }

    /// Complete with the locally computed analysis only (no stored record).
    pub fn complete_locally(&mut self) -> Result<Event, SessionError> {
        if self.state != SessionState::Submitting {
            return Err(SessionError::InvalidState { state: self.state });
        }
        self.finish(false, None)
    }

    fn finish(&mut self, persisted: bool, result_id: Option<String>) -> Result<Event, SessionError> {
        let analysis = scoring::score(&self.answers);
        let code = analysis.code.clone();
        self.outcome = Some(CompletionOutcome {
            persisted,
            result_id,
            analysis,
        });
        self.state = SessionState::Completed;
        self.pending_advance_at = None;
        Ok(Event::SessionCompleted {
            test_id: self.test_id.clone(),
            code,
            persisted,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Reconstruct the highlighted option for `index` by matching the stored
    /// answer text back to the question's option list.
    fn selected_for(&self, index: usize) -> Option<usize> {
        let record = self.answers.get(index)?;
        let question = self.questions.as_ref()?.get(index)?;
        question
            .options
            .iter()
            .position(|option| option.text == record.option_text)
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::question::AnswerOption;
    use crate::scoring::Dimension;
    use uuid::Uuid;

    fn option(text: &str, dimension: Dimension, weight: f64) -> AnswerOption {
        AnswerOption {
            text: text.into(),
            dimension: Some(dimension),
            weight: Some(weight),
            order: None,
        }
    }

    fn question(text: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: text.into(),
            section: None,
            options: vec![
                option("(A) go out", Dimension::E, 1.0),
                option("(B) stay in", Dimension::I, 1.0),
            ],
        }
    }

    fn question_set(count: usize) -> QuestionSet {
        let questions = (0..count).map(|i| question(&format!("Q{i}"))).collect();
        QuestionSet::new(TestId::from("mbti"), questions).unwrap()
    }

    fn loaded_session(count: usize) -> QuizSession {
        let mut session = QuizSession::new(TestId::from("mbti"));
        session.questions_loaded(question_set(count)).unwrap();
        session
    }

    #[test]
    fn load_transitions_to_ready() {
        let mut session = QuizSession::new(TestId::from("mbti"));
        assert_eq!(session.state(), SessionState::Loading);
        let event = session.questions_loaded(question_set(3)).unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert!(matches!(event, Event::SessionLoaded { question_count: 3, .. }));
    }

    #[test]
    fn load_failure_is_retryable_only_for_fetch_errors() {
        let mut session = QuizSession::new(TestId::from("mbti"));
        session.load_failed(FailureKind::LoadFailed, "timeout");
        assert_eq!(session.state(), SessionState::Failed);
        assert!(session.retry_load().is_ok());
        assert_eq!(session.state(), SessionState::Loading);

        let mut session = QuizSession::new(TestId::from("mbti"));
        session.load_failed(FailureKind::NoQuestions, "empty");
        assert!(session.retry_load().is_err());
    }

    #[test]
    fn select_records_answer_and_schedules_advance() {
        let mut session = loaded_session(3);
        let event = session.select_option_at(0, 1_000).unwrap();
        assert_eq!(session.state(), SessionState::Answering);
        assert_eq!(session.answered_count(), 1);
        assert_eq!(
            session.pending_advance_deadline(),
            Some(1_000 + DEFAULT_AUTO_ADVANCE_DELAY_MS)
        );
        assert!(matches!(event, Event::AnswerRecorded { question_index: 0, .. }));
    }

    #[test]
    fn rapid_reselection_keeps_one_pending_advance() {
        let mut session = loaded_session(3);
        for tick in 0..5u64 {
            session.select_option_at((tick % 2) as usize, 1_000 + tick).unwrap();
        }
        // Only the last deadline survives; the tick before it does nothing.
        let deadline = session.pending_advance_deadline().unwrap();
        assert_eq!(deadline, 1_004 + DEFAULT_AUTO_ADVANCE_DELAY_MS);
        assert!(session.tick_at(deadline - 1).is_none());
        let event = session.tick_at(deadline).unwrap();
        assert!(matches!(event, Event::QuestionAdvanced { auto: true, .. }));
        assert_eq!(session.current_index(), 1);
        // Nothing left pending after it fires.
        assert!(session.pending_advance_deadline().is_none());
        assert!(session.tick_at(deadline + 10_000).is_none());
    }

    #[test]
    fn reselection_overwrites_single_record() {
        let mut session = loaded_session(3);
        session.select_option_at(0, 0).unwrap();
        session.select_option_at(1, 1).unwrap();
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.answers().get(0).unwrap().option_text, "(B) stay in");
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut session = loaded_session(3);
        let err = session.select_option_at(9, 0).unwrap_err();
        assert_eq!(err, SessionError::OptionOutOfRange { index: 9, len: 2 });
        assert_eq!(session.answered_count(), 0);
        assert!(session.pending_advance_deadline().is_none());
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let mut session = loaded_session(4);
        session.select_option_at(0, 0).unwrap();
        match session.snapshot() {
            Event::StateSnapshot {
                state,
                current_index,
                question_count,
                answered,
                pending_advance,
                ..
            } => {
                assert_eq!(state, SessionState::Answering);
                assert_eq!(current_index, 0);
                assert_eq!(question_count, 4);
                assert_eq!(answered, 1);
                assert!(pending_advance);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn manual_advance_requires_answer() {
        let mut session = loaded_session(3);
        let err = session.advance().unwrap_err();
        assert_eq!(err, SessionError::Unanswered { index: 0 });
    }

    #[test]
    fn retreat_floors_at_zero_and_keeps_answers() {
        let mut session = loaded_session(3);
        session.select_option_at(0, 0).unwrap();
        session.advance().unwrap();
        session.select_option_at(0, 0).unwrap();
        session.retreat().unwrap();
        assert_eq!(session.current_index(), 0);
        session.retreat().unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answered_count(), 2);
    }

    #[test]
    fn back_navigation_answer_change_keeps_progress() {
        // Scenario B: answer 0,1,2, go back to 0, pick a different option.
        let mut session = loaded_session(5);
        for _ in 0..3 {
            session.select_option_at(0, 0).unwrap();
            session.advance().unwrap();
        }
        let progress = session.progress_pct();
        session.retreat().unwrap();
        session.retreat().unwrap();
        session.retreat().unwrap();
        assert_eq!(session.current_index(), 0);
        session.select_option_at(1, 0).unwrap();
        assert_eq!(session.answered_count(), 3);
        assert_eq!(session.progress_pct(), progress);
        assert_eq!(session.selected_option(), Some(1));
    }

    #[test]
    fn selection_highlight_restored_when_revisiting() {
        let mut session = loaded_session(3);
        session.select_option_at(1, 0).unwrap();
        session.advance().unwrap();
        assert_eq!(session.selected_option(), None);
        session.retreat().unwrap();
        assert_eq!(session.selected_option(), Some(1));
    }

    #[test]
    fn last_answer_then_advance_enters_submitting() {
        let mut session = loaded_session(2);
        session.select_option_at(0, 0).unwrap();
        session.advance().unwrap();
        session.select_option_at(1, 100).unwrap();
        let event = session.tick_at(100 + DEFAULT_AUTO_ADVANCE_DELAY_MS).unwrap();
        assert!(matches!(event, Event::SubmissionStarted { answered: 2, .. }));
        assert_eq!(session.state(), SessionState::Submitting);
        // Stray manual trigger after the timer already fired.
        assert!(session.advance().is_err());
    }

    #[test]
    fn advance_requires_answer_at_each_step() {
        let mut session = loaded_session(3);
        session.select_option_at(0, 0).unwrap();
        session.advance().unwrap();
        session.advance().unwrap_err(); // question 1 unanswered
        session.select_option_at(0, 0).unwrap();
        session.advance().unwrap();
        session.select_option_at(0, 0).unwrap();
        let event = session.advance().unwrap();
        assert!(matches!(event, Event::SubmissionStarted { .. }));
    }

    #[test]
    fn submission_success_completes_with_record_id() {
        let mut session = loaded_session(1);
        session.select_option_at(0, 0).unwrap();
        session.advance().unwrap();
        let event = session.submission_succeeded("res-1").unwrap();
        assert!(matches!(event, Event::SessionCompleted { persisted: true, .. }));
        let outcome = session.outcome().unwrap();
        assert!(outcome.persisted);
        assert_eq!(outcome.result_id.as_deref(), Some("res-1"));
    }

    #[test]
    fn network_failure_degrades_to_local_completion() {
        let mut session = loaded_session(1);
        session.select_option_at(0, 0).unwrap();
        session.advance().unwrap();
        let event = session
            .submission_failed(&SubmitError::Network("boom".into()))
            .unwrap();
        assert!(matches!(event, Event::SessionCompleted { persisted: false, .. }));
        assert_eq!(session.state(), SessionState::Completed);
        assert!(!session.outcome().unwrap().persisted);
    }

    #[test]
    fn duplicate_completion_redirects_instead_of_completing() {
        let mut session = loaded_session(1);
        session.select_option_at(0, 0).unwrap();
        session.advance().unwrap();
        let event = session
            .submission_failed(&SubmitError::DuplicateCompletion {
                test_id: TestId::from("mbti"),
            })
            .unwrap();
        assert!(matches!(event, Event::DuplicateDetected { .. }));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.failure(), Some(FailureKind::AlreadyCompleted));
        assert!(session.outcome().is_none());
    }

    #[test]
    fn resume_restores_furthest_pointer_and_highlight() {
        let mut donor = loaded_session(4);
        donor.select_option_at(0, 0).unwrap();
        donor.advance().unwrap();
        donor.select_option_at(1, 0).unwrap();
        donor.advance().unwrap();
        donor.select_option_at(0, 0).unwrap();

        let mut session = QuizSession::new(TestId::from("mbti"));
        session.restore_answers(donor.answers().clone());
        session.questions_loaded(question_set(4)).unwrap();
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.selected_option(), Some(0));
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn fresh_session_resets_pointer_and_selection() {
        let mut session = QuizSession::new(TestId::from("mbti"));
        session.restore_answers(AnswerSheet::new());
        session.questions_loaded(question_set(4)).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.selected_option(), None);
    }

    #[test]
    fn unmount_cancels_pending_advance() {
        let mut session = loaded_session(2);
        session.select_option_at(0, 0).unwrap();
        assert!(session.pending_advance_deadline().is_some());
        session.cancel_pending_advance();
        assert!(session.tick_at(u64::MAX / 2).is_none());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn session_round_trips_through_serde() {
        let mut session = loaded_session(3);
        session.select_option_at(1, 0).unwrap();
        let json = serde_json::to_string(&session).unwrap();
        let restored: QuizSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), SessionState::Answering);
        assert_eq!(restored.answered_count(), 1);
        assert_eq!(restored.current_index(), 0);
    }
}
