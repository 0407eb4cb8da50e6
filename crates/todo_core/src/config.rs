//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Resolve storage key, database path and log settings from defaults and
//!   environment overrides.
//!
//! # Invariants
//! - Blank environment values are ignored rather than treated as overrides.
//! - Resolution never fails; invalid log settings surface at `init_logging`.

use crate::logging::default_log_level;
use crate::repo::todo_repo::TODOS_STORAGE_KEY;
use std::path::PathBuf;

pub const STORAGE_KEY_ENV: &str = "TODO_STORAGE_KEY";
pub const DB_PATH_ENV: &str = "TODO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TODO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TODO_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "todo_local_storage.sqlite3";

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Local storage key holding the collection.
    pub storage_key: String,
    /// SQLite file backing local storage.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute log directory; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_key: TODOS_STORAGE_KEY.to_string(),
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TodoConfig {
    /// Defaults overlaid with `TODO_STORAGE_KEY`, `TODO_DB_PATH`,
    /// `TODO_LOG_LEVEL` and `TODO_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(key) = non_blank(STORAGE_KEY_ENV) {
            config.storage_key = key;
        }
        if let Some(path) = non_blank(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config.log_dir = non_blank(LOG_DIR_ENV).map(PathBuf::from);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{TodoConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV, STORAGE_KEY_ENV};
    use std::path::PathBuf;

    #[test]
    fn defaults_use_todos_key_and_no_log_dir() {
        let config = TodoConfig::from_lookup(|_| None);
        assert_eq!(config.storage_key, "todos");
        assert_eq!(config.log_dir, None);
        assert!(config.db_path.ends_with("todo_local_storage.sqlite3"));
    }

    #[test]
    fn overrides_apply_and_blank_values_are_ignored() {
        let config = TodoConfig::from_lookup(|name| match name {
            DB_PATH_ENV => Some(" /data/todos.sqlite3 ".to_string()),
            LOG_LEVEL_ENV => Some("   ".to_string()),
            LOG_DIR_ENV => Some("/var/log/todo".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/data/todos.sqlite3"));
        assert_eq!(config.log_level, TodoConfig::default().log_level);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/todo")));
        assert_eq!(config.storage_key, "todos");
    }

    #[test]
    fn storage_key_override_applies() {
        let config = TodoConfig::from_lookup(|name| match name {
            STORAGE_KEY_ENV => Some("work-todos".to_string()),
            _ => None,
        });
        assert_eq!(config.storage_key, "work-todos");
    }
}
