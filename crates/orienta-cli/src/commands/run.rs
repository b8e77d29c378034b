//! Interactive quiz session.
//!
//! Drives a [`SessionRunner`] from the terminal: one question at a time,
//! numbered options, 'p'/'n' navigation and 'q' to save-and-quit. Partial
//! answer sheets are persisted in the local kv store so a quit session
//! resumes where it left off.

use std::error::Error;
use std::io::{BufRead, Write};
use std::sync::Arc;

use orienta_core::storage::Config;
use orienta_core::{
    AnswerSheet, Database, Event, FailureKind, HttpApi, ResultRecord, SessionRunner, SessionState,
    SqliteMarkerStore, TestId,
};

fn session_key(test_id: &TestId) -> String {
    format!("session_{test_id}")
}

pub fn run(test_id: &str, api: Option<String>, no_auto_advance: bool) -> Result<(), Box<dyn Error>> {
    let cfg = Config::load_or_default();
    let base_url = api.unwrap_or_else(|| cfg.api.base_url.clone());
    let api = Arc::new(HttpApi::new(&base_url)?);
    let markers = Arc::new(SqliteMarkerStore::new(Database::open()?));
    let db = Database::open()?;
    let test = TestId::from(test_id);
    let auto_advance = cfg.quiz.auto_advance && !no_auto_advance;

    let mut runner = SessionRunner::new(
        test.clone(),
        &cfg.api.user_id,
        test_id,
        api.clone(),
        api,
        markers,
    )
    .with_auto_advance_delay_ms(cfg.quiz.auto_advance_delay_ms)
    .with_resubmit_guard_secs(cfg.quiz.resubmit_guard_secs);

    // Resume a partial sheet saved by a previous quit.
    if let Some(json) = db.kv_get(&session_key(&test))? {
        if let Ok(sheet) = serde_json::from_str::<AnswerSheet>(&json) {
            if !sheet.is_empty() {
                println!("Resuming a previous session ({} answered).", sheet.len());
            }
            runner.restore_answers(sheet);
        }
    }

    let mut event = runner.load()?;
    loop {
        match runner.session().state() {
            SessionState::Failed => {
                return handle_failure(&runner, &event);
            }
            SessionState::Ready | SessionState::Answering => {
                if !prompt_question(&mut runner, auto_advance, cfg.quiz.auto_advance_delay_ms)? {
                    // User quit: persist the sheet for a later resume.
                    runner.session_mut().cancel_pending_advance();
                    let sheet = serde_json::to_string(runner.session().answers())?;
                    db.kv_set(&session_key(&test), &sheet)?;
                    println!("Saved. Run the same command to resume.");
                    return Ok(());
                }
            }
            SessionState::Submitting => {
                println!("Submitting...");
                event = runner.submit()?;
            }
            SessionState::Completed => {
                db.kv_delete(&session_key(&test))?;
                return finish(&db, &runner, test_id);
            }
            SessionState::Loading => unreachable!("load() always leaves Loading"),
        }
    }
}

fn handle_failure(runner: &SessionRunner, event: &Event) -> Result<(), Box<dyn Error>> {
    match runner.session().failure() {
        Some(FailureKind::AlreadyCompleted) => {
            // Duplicate completion: redirect to the result history.
            println!("This test was already completed. Recent results:");
            super::results::run(5, false)
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(event)?);
            Err("question loading failed (run again to retry)".into())
        }
    }
}

/// Show the current question and read one input. Returns false on quit.
fn prompt_question(
    runner: &mut SessionRunner,
    auto_advance: bool,
    delay_ms: u64,
) -> Result<bool, Box<dyn Error>> {
    let session = runner.session();
    let index = session.current_index();
    let total = session.total_questions();
    let question = session
        .current_question()
        .ok_or("no current question")?
        .clone();

    println!();
    if let Some(section) = &question.section {
        println!("[{section}]");
    }
    println!(
        "({}/{}) {}  [{:.0}% done]",
        index + 1,
        total,
        question.text,
        session.progress_pct()
    );
    for (i, option) in question.options.iter().enumerate() {
        let marker = if session.selected_option() == Some(i) {
            "*"
        } else {
            " "
        };
        println!(" {marker} {}. {}", i + 1, option.text);
    }
    print!("answer (1-{}), p=prev, n=next, q=quit> ", question.options.len());
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    match line.trim() {
        "q" => return Ok(false),
        "p" => {
            if let Err(e) = runner.session_mut().retreat() {
                println!("{e}");
            }
        }
        "n" => {
            if let Err(e) = runner.session_mut().advance() {
                println!("{e}");
            }
        }
        input => match input.parse::<usize>() {
            Ok(choice) if choice >= 1 => {
                match runner.session_mut().select_option(choice - 1) {
                    Ok(_) => {
                        if auto_advance {
                            // Let the selection render, then fire the advance.
                            std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                            runner.session_mut().tick();
                        } else {
                            runner.session_mut().cancel_pending_advance();
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
            _ => println!("unrecognized input '{input}'"),
        },
    }
    Ok(true)
}

fn finish(db: &Database, runner: &SessionRunner, test_name: &str) -> Result<(), Box<dyn Error>> {
    let session = runner.session();
    let outcome = session.outcome().ok_or("completed without outcome")?;
    let record = ResultRecord {
        id: outcome
            .result_id
            .clone()
            .unwrap_or_else(|| format!("local-{}", uuid::Uuid::new_v4())),
        test_id: session.test_id().to_string(),
        test_name: test_name.to_string(),
        code: outcome.analysis.code.clone(),
        answers: session.answers().ordered_records(),
        duration_min: session.duration_minutes(),
        persisted: outcome.persisted,
        completed_at: chrono::Utc::now(),
    };
    db.record_result(&record)?;

    println!();
    println!("Type: {}", outcome.analysis.code);
    for pair in &outcome.analysis.pairs {
        println!(
            "  {}: {} {}% / {} {}%",
            pair.pair.label(),
            pair.pair.first().letter(),
            pair.first_pct,
            pair.pair.second().letter(),
            pair.second_pct
        );
    }
    if !outcome.persisted {
        println!("(result saved locally only; the result service was unavailable)");
    }
    Ok(())
}
