//! Core domain logic for the to-do list.
//! This crate is the single source of truth for storage and view invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod storage;
pub mod view;

pub use config::TodoConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{NewTodo, Todo, TodoId, TodoPatch, TodoValidationError};
pub use repo::todo_repo::{
    LocalStorageTodoRepository, RepoError, RepoResult, TodoRepository, TODOS_STORAGE_KEY,
};
pub use storage::{LocalStorage, MemoryLocalStorage, SqliteLocalStorage};
pub use view::filter::{filter_todos, FilteringMode, UnknownFilteringMode};
pub use view::list_view::{EditOutcome, EditState, ErrorMessage, TodoListView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
