mod config;
pub mod database;

pub use config::{ApiConfig, Config, QuizConfig};
pub use database::{Database, ResultRecord, SqliteMarkerStore};

use std::path::PathBuf;

/// Returns `~/.config/orienta[-dev]/` based on ORIENTA_ENV.
///
/// Set ORIENTA_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ORIENTA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("orienta-dev")
    } else {
        base_dir.join("orienta")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
