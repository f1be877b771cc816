//! Environment-driven CLI configuration.
//!
//! Variables (a `.env` file in the working directory is loaded first):
//! - `SMARTNOTES_DB`: SQLite file path, default `smartnotes.sqlite3`.
//! - `SMARTNOTES_LOG_LEVEL`: trace|debug|info|warn|error.
//! - `SMARTNOTES_LOG_DIR`: absolute directory for rolling log files; when
//!   unset, logs go to stderr.

use smartnotes_core::{default_log_level, LogTarget, LoggingError};
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "smartnotes.sqlite3";
const STDERR_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_target: LogTarget,
}

impl CliConfig {
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let db_path = non_empty("SMARTNOTES_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
        let log_target = match non_empty("SMARTNOTES_LOG_DIR") {
            Some(dir) => LogTarget::directory(&dir)?,
            None => LogTarget::Stderr,
        };
        // Stderr is shared with command output, so keep it quiet by default.
        let fallback_level = match &log_target {
            LogTarget::Stderr => STDERR_LOG_LEVEL,
            LogTarget::Directory(_) => default_log_level(),
        };
        let log_level =
            non_empty("SMARTNOTES_LOG_LEVEL").unwrap_or_else(|| fallback_level.to_string());

        Ok(Self {
            db_path,
            log_level,
            log_target,
        })
    }
}
