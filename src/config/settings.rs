//! User settings for bookkeeper
//!
//! Manages user preferences including the database file, the default budget
//! period and display formatting.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::BookkeeperPaths;
use super::store::StoreConfig;
use crate::error::BookkeeperError;
use crate::models::PeriodType;

/// User settings for bookkeeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for the settings file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// SQLite database file name, relative to the data directory
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Period used when a command does not name one
    #[serde(default)]
    pub default_period: PeriodType,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// How long a store operation waits on a locked database, in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_database_name() -> String {
    "bookkeeper.db".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            database_name: default_database_name(),
            default_period: PeriodType::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BookkeeperPaths) -> Result<Self, BookkeeperError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BookkeeperError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BookkeeperError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Reject values that would only fail once they are used
    pub fn validate(&self) -> Result<(), BookkeeperError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(BookkeeperError::Config(format!(
                "Invalid date_format '{}'",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BookkeeperPaths) -> Result<(), BookkeeperError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BookkeeperError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BookkeeperError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Build the store configuration for the table-backed repositories
    pub fn store_config(&self, paths: &BookkeeperPaths) -> StoreConfig {
        StoreConfig::new(paths.database_file(&self.database_name))
            .with_busy_timeout_ms(self.busy_timeout_ms)
    }
}
