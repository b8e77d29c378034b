//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. They only
//! touch commands that work offline (score, help); the dev data directory
//! is selected so a developer's real config is never touched.

use std::io::Write;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "orienta-cli", "--"])
        .args(args)
        .env("ORIENTA_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let (stdout, _stderr, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("career-assessment"));
    assert!(stdout.contains("score"));
}

#[test]
fn test_score_answer_sheet() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let sheet = serde_json::json!({
        "0": { "question_text": "Q0", "option_text": "(A)", "dimension": "E", "weight": 1.0, "score": 1.0 },
        "1": { "question_text": "Q1", "option_text": "(B)", "dimension": "I", "weight": 2.0, "score": 2.0 }
    });
    write!(file, "{sheet}").unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let (stdout, stderr, code) = run_cli(&["score", &path]);
    assert_eq!(code, 0, "score failed: {stderr}");

    let analysis: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    assert_eq!(analysis["code"].as_str().unwrap().len(), 4);
    assert!(analysis["code"].as_str().unwrap().starts_with('I'));
}

#[test]
fn test_score_missing_file_fails() {
    let (_stdout, stderr, code) = run_cli(&["score", "/nonexistent/answers.json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let (_stdout, _stderr, code) = run_cli(&["frobnicate"]);
    assert_ne!(code, 0);
}
