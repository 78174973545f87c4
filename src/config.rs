use std::env;
use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::{JournalError, Result};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".brewlog";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "brewlog.sqlite";

/// Overrides the database location.
pub const DB_PATH_VAR: &str = "BREWLOG_DB";
/// `tracing` filter directives, e.g. `brewlog=debug`.
pub const LOG_FILTER_VAR: &str = "BREWLOG_LOG";
/// Set to `json` for machine-readable log lines.
pub const LOG_FORMAT_VAR: &str = "BREWLOG_LOG_FORMAT";

const DEFAULT_LOG_FILTER: &str = "brewlog=info";

#[derive(Debug, Clone, PartialEq)]
pub struct JournalConfig {
    pub db_path: PathBuf,
    pub log_filter: String,
    pub json_logs: bool,
}

impl JournalConfig {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through `lookup`, which stands in for the
    /// environment so tests do not have to mutate process state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match lookup(DB_PATH_VAR).filter(|value| !value.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };
        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let json_logs = lookup(LOG_FORMAT_VAR).is_some_and(|value| value == "json");

        Ok(Self {
            db_path,
            log_filter,
            json_logs,
        })
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(JournalError::NoHomeDir)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
