//! SQLite-based result history and key-value storage.
//!
//! Provides persistent storage for:
//! - Completed assessment results (including local-only completions)
//! - A key-value store used for completion markers and partial-session state

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StorageError;
use crate::providers::traits::{marker_key, CompletionMarkerStore};
use crate::quiz::answers::AnswerRecord;
use crate::quiz::question::TestId;

/// One completed assessment as stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    pub test_id: String,
    pub test_name: String,
    /// Four-letter code from the analysis used for display.
    pub code: String,
    pub answers: Vec<AnswerRecord>,
    pub duration_min: i64,
    /// False when the result service was unreachable and only the local
    /// analysis exists.
    pub persisted: bool,
    pub completed_at: DateTime<Utc>,
}

/// SQLite database for result history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/orienta/orienta.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::OpenFailed {
                path: "~/.config/orienta".into(),
                message: e.to_string(),
            })?
            .join("orienta.db");
        let conn = Connection::open(&path).map_err(|e| StorageError::OpenFailed {
            path,
            message: e.to_string(),
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::OpenFailed {
            path: ":memory:".into(),
            message: e.to_string(),
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS results (
                id           TEXT PRIMARY KEY,
                test_id      TEXT NOT NULL,
                test_name    TEXT NOT NULL DEFAULT '',
                code         TEXT NOT NULL DEFAULT '',
                answers      TEXT NOT NULL DEFAULT '[]',
                duration_min INTEGER NOT NULL DEFAULT 0,
                persisted    INTEGER NOT NULL DEFAULT 1,
                completed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_results_completed_at ON results(completed_at);
            CREATE INDEX IF NOT EXISTS idx_results_test_id ON results(test_id);",
        )?;
        Ok(())
    }

    /// Record a completed assessment.
    pub fn record_result(&self, record: &ResultRecord) -> Result<(), StorageError> {
        let answers =
            serde_json::to_string(&record.answers).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO results
                 (id, test_id, test_name, code, answers, duration_min, persisted, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.test_id,
                record.test_name,
                record.code,
                answers,
                record.duration_min,
                record.persisted as i64,
                record.completed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Most recent results first.
    pub fn recent_results(&self, limit: usize) -> Result<Vec<ResultRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, test_id, test_name, code, answers, duration_min, persisted, completed_at
             FROM results
             ORDER BY completed_at DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (id, test_id, test_name, code, answers, duration_min, persisted, completed_at) =
                row?;
            results.push(ResultRecord {
                id,
                test_id,
                test_name,
                code,
                answers: serde_json::from_str(&answers)
                    .map_err(|e| StorageError::Encode(e.to_string()))?,
                duration_min,
                persisted: persisted != 0,
                completed_at: completed_at
                    .parse()
                    .map_err(|_| StorageError::Encode(format!("bad timestamp '{completed_at}'")))?,
            });
        }
        Ok(results)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// [`CompletionMarkerStore`] over the database's kv table.
///
/// The connection is wrapped in a mutex because marker reads/writes can
/// arrive from a shell thread while the session thread owns the runner.
pub struct SqliteMarkerStore {
    db: std::sync::Mutex<Database>,
}

impl SqliteMarkerStore {
    pub fn new(db: Database) -> Self {
        Self {
            db: std::sync::Mutex::new(db),
        }
    }
}

impl CompletionMarkerStore for SqliteMarkerStore {
    fn mark(&self, test_id: &TestId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let db = self.db.lock().map_err(|_| StorageError::Locked)?;
        db.kv_set(&marker_key(test_id), &at.to_rfc3339())
    }

    fn last_mark(&self, test_id: &TestId) -> Result<Option<DateTime<Utc>>, StorageError> {
        let db = self.db.lock().map_err(|_| StorageError::Locked)?;
        let Some(value) = db.kv_get(&marker_key(test_id))? else {
            return Ok(None);
        };
        value
            .parse()
            .map(Some)
            .map_err(|_| StorageError::Encode(format!("bad marker timestamp '{value}'")))
    }
}
