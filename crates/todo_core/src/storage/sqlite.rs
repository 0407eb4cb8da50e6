//! SQLite-backed local storage.
//!
//! # Invariants
//! - Rows live in the `local_storage` table created by migration 1.
//! - Writes are single-statement upserts; no multi-key transactions.
//! - Reads never fail on the stored bytes: non-text or non-UTF-8 values come
//!   back lossily decoded and are left for the caller to reject.

use super::LocalStorage;
use crate::db::{DbError, DbResult};
use log::warn;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};

/// Local storage over a migrated SQLite connection.
pub struct SqliteLocalStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLocalStorage<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// Rejects connections whose schema lacks the `local_storage` table.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'local_storage'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(DbError::MissingRequiredTable("local_storage"));
        }
        Ok(Self { conn })
    }
}

impl LocalStorage for SqliteLocalStorage<'_> {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1;",
                [key],
                |row| Ok(value_to_string(key, row.get_ref(0)?)),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> DbResult<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn value_to_string(key: &str, value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                warn!("event=storage_get module=storage status=degraded reason=invalid_utf8 key={key}");
                String::from_utf8_lossy(bytes).into_owned()
            }
        },
        ValueRef::Blob(bytes) => {
            warn!("event=storage_get module=storage status=degraded reason=blob_value key={key}");
            String::from_utf8_lossy(bytes).into_owned()
        }
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Null => String::new(),
    }
}
