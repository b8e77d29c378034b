//! End-to-end session scenarios over the in-memory collaborators.
//!
//! Covers the full load → answer → auto-advance → submit flow, including
//! degraded completion on submission failure, duplicate-completion redirect
//! and the resubmission suppression window.

use std::sync::Arc;

use chrono::{Duration, Utc};
use orienta_core::providers::memory::{
    FailingQuestionProvider, MemoryMarkerStore, ScriptedSubmitter, StaticQuestionProvider,
};
use orienta_core::providers::CompletionMarkerStore;
use orienta_core::scoring::Dimension;
use orienta_core::{
    AnswerOption, Event, FailureKind, ProviderError, Question, QuestionSet, SessionRunner,
    SessionState, SubmitError, TestId,
};
use uuid::Uuid;

const DELAY_MS: u64 = 350;

fn question(text: &str, first: Dimension, second: Dimension, second_weight: f64) -> Question {
    Question {
        id: Uuid::new_v4(),
        text: text.into(),
        section: None,
        options: vec![
            AnswerOption {
                text: format!("(A) {text} first"),
                dimension: Some(first),
                weight: Some(1.0),
                order: Some(1),
            },
            AnswerOption {
                text: format!("(B) {text} second"),
                dimension: Some(second),
                weight: Some(second_weight),
                order: Some(2),
            },
        ],
    }
}

/// Four questions whose (B) answers produce the E=2/I=3 scenario tally.
fn mbti_questions() -> QuestionSet {
    QuestionSet::new(
        TestId::from("mbti"),
        vec![
            question("Q0", Dimension::E, Dimension::I, 1.0),
            question("Q1", Dimension::I, Dimension::E, 1.0),
            question("Q2", Dimension::E, Dimension::I, 1.0),
            question("Q3", Dimension::I, Dimension::E, 2.0),
        ],
    )
    .unwrap()
}

struct Harness {
    runner: SessionRunner,
    submitter: Arc<ScriptedSubmitter>,
    markers: Arc<MemoryMarkerStore>,
}

fn harness() -> Harness {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let markers = Arc::new(MemoryMarkerStore::new());
    let runner = SessionRunner::new(
        TestId::from("mbti"),
        "user-1",
        "MBTI",
        Arc::new(StaticQuestionProvider::new(mbti_questions())),
        submitter.clone(),
        markers.clone(),
    )
    .with_auto_advance_delay_ms(DELAY_MS);
    Harness {
        runner,
        submitter,
        markers,
    }
}

/// Answer every question with option (A) and let the auto-advance fire,
/// leaving the session in `Submitting`.
fn answer_all(runner: &mut SessionRunner) {
    let total = runner.session().total_questions();
    let mut now = 1_000;
    for _ in 0..total {
        runner.session_mut().select_option_at(0, now).unwrap();
        now += DELAY_MS;
        runner.session_mut().tick_at(now).unwrap();
    }
}

#[test]
fn full_session_submits_once_and_writes_marker() {
    let mut h = harness();
    let event = h.runner.load().unwrap();
    assert!(matches!(event, Event::SessionLoaded { question_count: 4, .. }));

    answer_all(&mut h.runner);
    assert_eq!(h.runner.session().state(), SessionState::Submitting);

    let event = h.runner.submit().unwrap();
    assert!(matches!(event, Event::SessionCompleted { persisted: true, .. }));
    assert_eq!(h.submitter.call_count(), 1);

    let outcome = h.runner.session().outcome().unwrap();
    assert!(outcome.persisted);
    assert!(outcome.result_id.is_some());

    let mark = h.markers.last_mark(&TestId::from("mbti")).unwrap();
    assert!(mark.is_some());

    // The submitted payload carries all answers plus the local analysis.
    let requests = h.submitter.requests();
    assert_eq!(requests[0].answers.len(), 4);
    assert_eq!(requests[0].user_id, "user-1");
    assert_eq!(requests[0].analysis.code.len(), 4);
}

#[test]
fn submission_network_failure_completes_locally() {
    // Scenario C: submission throws a network error; the user still gets a
    // completed session with the local analysis, and the marker is written.
    let mut h = harness();
    h.submitter.push_err(SubmitError::Network("connection reset".into()));
    h.runner.load().unwrap();
    answer_all(&mut h.runner);

    let event = h.runner.submit().unwrap();
    assert!(matches!(event, Event::SessionCompleted { persisted: false, .. }));
    assert_eq!(h.runner.session().state(), SessionState::Completed);
    assert!(!h.runner.session().outcome().unwrap().persisted);
    assert!(h.markers.last_mark(&TestId::from("mbti")).unwrap().is_some());
}

#[test]
fn duplicate_completion_redirects() {
    // Scenario D: the service says this user already completed the test.
    let mut h = harness();
    h.submitter.push_err(SubmitError::DuplicateCompletion {
        test_id: TestId::from("mbti"),
    });
    h.runner.load().unwrap();
    answer_all(&mut h.runner);

    let event = h.runner.submit().unwrap();
    assert!(matches!(event, Event::DuplicateDetected { .. }));
    assert_eq!(h.runner.session().state(), SessionState::Failed);
    assert_eq!(
        h.runner.session().failure(),
        Some(FailureKind::AlreadyCompleted)
    );
    // No completion happened, so no marker either.
    assert!(h.markers.last_mark(&TestId::from("mbti")).unwrap().is_none());
}

#[test]
fn fresh_marker_suppresses_resubmission() {
    // A remounted session for the same test within the guard window must
    // not hit the result service again.
    let mut h = harness();
    h.markers
        .mark(&TestId::from("mbti"), Utc::now() - Duration::seconds(5))
        .unwrap();
    h.runner.load().unwrap();
    answer_all(&mut h.runner);

    let event = h.runner.submit().unwrap();
    assert!(matches!(event, Event::SessionCompleted { persisted: false, .. }));
    assert_eq!(h.submitter.call_count(), 0);
}

#[test]
fn stale_marker_does_not_suppress() {
    let mut h = harness();
    h.markers
        .mark(&TestId::from("mbti"), Utc::now() - Duration::seconds(120))
        .unwrap();
    h.runner.load().unwrap();
    answer_all(&mut h.runner);

    h.runner.submit().unwrap();
    assert_eq!(h.submitter.call_count(), 1);
    assert!(h.runner.session().outcome().unwrap().persisted);
}

#[test]
fn scenario_tally_reaches_submission_payload() {
    // Answer with option (B) everywhere: weights {I:1},{E:1},{I:1},{E:2}
    // mirrored to produce E=2/I=3 -> 40/60 with I dominant.
    let mut h = harness();
    h.runner.load().unwrap();
    let mut now = 1_000;
    for _ in 0..4 {
        h.runner.session_mut().select_option_at(1, now).unwrap();
        now += DELAY_MS;
        h.runner.session_mut().tick_at(now).unwrap();
    }
    h.runner.submit().unwrap();

    let analysis = &h.submitter.requests()[0].analysis;
    assert_eq!(analysis.tally.get(Dimension::E), 2.0);
    assert_eq!(analysis.tally.get(Dimension::I), 3.0);
    let ei = &analysis.pairs[0];
    assert_eq!(ei.first_pct, 40);
    assert_eq!(ei.second_pct, 60);
    assert_eq!(ei.winner, Dimension::I);
}

#[test]
fn fetch_failure_is_retryable() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let markers = Arc::new(MemoryMarkerStore::new());
    let mut runner = SessionRunner::new(
        TestId::from("mbti"),
        "user-1",
        "MBTI",
        Arc::new(FailingQuestionProvider::new(ProviderError::Network(
            "timeout".into(),
        ))),
        submitter,
        markers,
    );
    let event = runner.load().unwrap();
    assert!(matches!(event, Event::SessionFailed { retryable: true, .. }));
    assert_eq!(runner.session().failure(), Some(FailureKind::LoadFailed));

    // Retry re-enters Loading and fetches again (still failing here).
    let event = runner.retry().unwrap();
    assert!(matches!(event, Event::SessionFailed { retryable: true, .. }));
}

#[test]
fn empty_question_set_is_not_retryable() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let markers = Arc::new(MemoryMarkerStore::new());
    let mut runner = SessionRunner::new(
        TestId::from("empty"),
        "user-1",
        "Empty",
        Arc::new(FailingQuestionProvider::new(ProviderError::EmptyQuestionSet {
            test_id: TestId::from("empty"),
        })),
        submitter,
        markers,
    );
    let event = runner.load().unwrap();
    assert!(matches!(event, Event::SessionFailed { retryable: false, .. }));
    assert_eq!(runner.session().failure(), Some(FailureKind::NoQuestions));
    assert!(runner.retry().is_err());
}

#[test]
fn resumed_runner_continues_at_furthest_question() {
    let mut h = harness();
    h.runner.load().unwrap();
    h.runner.session_mut().select_option_at(0, 0).unwrap();
    h.runner.session_mut().tick_at(DELAY_MS).unwrap();
    h.runner.session_mut().select_option_at(0, DELAY_MS).unwrap();
    let saved = h.runner.session().answers().clone();

    // Simulate a page reload: a brand-new runner seeded with the sheet.
    let mut h2 = harness();
    h2.runner.restore_answers(saved);
    let event = h2.runner.load().unwrap();
    assert!(matches!(event, Event::SessionLoaded { resumed_at_index: 1, .. }));
    assert_eq!(h2.runner.session().answered_count(), 2);
    assert_eq!(h2.runner.session().selected_option(), Some(0));
}
