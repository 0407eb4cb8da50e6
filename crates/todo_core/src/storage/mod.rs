//! Key-value local storage abstraction.
//!
//! # Responsibility
//! - Define the `LocalStorage` contract the to-do repository persists through.
//! - Provide SQLite-backed and process-memory implementations.
//!
//! # Invariants
//! - A key maps to at most one string value.
//! - `set_item` fully replaces any previous value for the key.

mod memory;
mod sqlite;

pub use memory::MemoryLocalStorage;
pub use sqlite::SqliteLocalStorage;

use crate::db::DbResult;

/// Synchronous string key-value store.
pub trait LocalStorage {
    /// Returns the stored value, or `None` when the key is absent.
    fn get_item(&self, key: &str) -> DbResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> DbResult<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> DbResult<()>;
}

impl<S: LocalStorage + ?Sized> LocalStorage for &S {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> DbResult<()> {
        (**self).remove_item(key)
    }
}
