//! Connection parameters for the SQLite-backed repositories

use std::path::PathBuf;
use std::time::Duration;

/// Explicit configuration handed to every `SqliteRepository`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file; created on first connection
    pub db_path: PathBuf,

    /// How long a connection waits for another process's lock
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Configuration for the given database file with the default timeout
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_busy_timeout_ms(mut self, millis: u64) -> Self {
        self.busy_timeout = Duration::from_millis(millis);
        self
    }
}
