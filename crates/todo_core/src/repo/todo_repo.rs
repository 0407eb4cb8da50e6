//! Todo repository contract and local-storage implementation.
//!
//! # Responsibility
//! - Provide whole-collection list/add/delete/patch operations.
//! - Provide batched bulk mutations that persist once per call.
//!
//! # Invariants
//! - Every mutation is one read-modify-write of the full collection.
//! - A missing or unparseable stored value reads as an empty collection.
//! - Patch/delete on an unknown id is a no-op returning the unchanged
//!   collection; nothing is written when nothing changed.
//! - New ids are strictly greater than every id already in the collection.

use crate::db::DbError;
use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch, TodoValidationError};
use crate::storage::LocalStorage;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Storage key holding the JSON-encoded collection.
pub const TODOS_STORAGE_KEY: &str = "todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence operations.
///
/// Stored-value anomalies are never reported here; they read as empty.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode todos: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Repository interface for todo collection operations.
///
/// Every mutating call returns the full updated collection.
pub trait TodoRepository {
    fn list_todos(&self) -> RepoResult<Vec<Todo>>;
    fn add_todo(&self, todo: &NewTodo) -> RepoResult<Vec<Todo>>;
    fn delete_todo(&self, id: TodoId) -> RepoResult<Vec<Todo>>;
    fn patch_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Vec<Todo>>;
    /// Applies one patch to every listed id in a single persist cycle.
    fn patch_todos(&self, ids: &[TodoId], patch: &TodoPatch) -> RepoResult<Vec<Todo>>;
    /// Removes every listed id in a single persist cycle.
    fn delete_todos(&self, ids: &[TodoId]) -> RepoResult<Vec<Todo>>;
}

/// Todo repository persisting one JSON array under one storage key.
pub struct LocalStorageTodoRepository<S: LocalStorage> {
    storage: S,
    key: String,
    clock: fn() -> i64,
}

impl<S: LocalStorage> LocalStorageTodoRepository<S> {
    /// Creates a repository on the default `todos` key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, TODOS_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            clock: epoch_millis_now,
        }
    }

    /// Replaces the epoch-millisecond clock used for id assignment.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Reads the stored collection.
    ///
    /// `None` means absent or unparseable; callers decide whether that is an
    /// empty collection or a fresh one.
    fn load(&self) -> RepoResult<Option<Vec<Todo>>> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<Todo>>(&raw) {
            Ok(todos) => Ok(Some(todos)),
            Err(err) => {
                warn!(
                    "event=todos_load module=repo status=degraded reason=unparseable_value key={} line={} column={}",
                    self.key,
                    err.line(),
                    err.column()
                );
                Ok(None)
            }
        }
    }

    fn persist(&self, todos: &[Todo]) -> RepoResult<()> {
        let encoded = serde_json::to_string(todos)?;
        self.storage.set_item(&self.key, &encoded)?;
        Ok(())
    }

    /// Runs one read-modify-write cycle; persists only when `mutate` reports
    /// a change.
    fn mutate(
        &self,
        event: &'static str,
        mutate: impl FnOnce(&mut Vec<Todo>) -> bool,
    ) -> RepoResult<Vec<Todo>> {
        let mut todos = self.load()?.unwrap_or_default();
        let changed = mutate(&mut todos);

        if changed {
            self.persist(&todos)?;
            info!(
                "event={event} module=repo status=ok count={}",
                todos.len()
            );
        } else {
            debug!(
                "event={event} module=repo status=noop count={}",
                todos.len()
            );
        }

        Ok(todos)
    }
}

impl<S: LocalStorage> TodoRepository for LocalStorageTodoRepository<S> {
    fn list_todos(&self) -> RepoResult<Vec<Todo>> {
        Ok(self.load()?.unwrap_or_default())
    }

    fn add_todo(&self, todo: &NewTodo) -> RepoResult<Vec<Todo>> {
        todo.validate()?;
        let now = (self.clock)();

        self.mutate("todo_add", |todos| {
            let id = next_todo_id(todos, now);
            todos.push(todo.clone().into_todo(id));
            true
        })
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<Vec<Todo>> {
        self.delete_todos(&[id])
    }

    fn patch_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Vec<Todo>> {
        self.patch_todos(&[id], patch)
    }

    fn patch_todos(&self, ids: &[TodoId], patch: &TodoPatch) -> RepoResult<Vec<Todo>> {
        patch.validate()?;
        let targets: HashSet<TodoId> = ids.iter().copied().collect();

        self.mutate("todo_patch", |todos| {
            let mut changed = false;
            for todo in todos.iter_mut().filter(|todo| targets.contains(&todo.id)) {
                changed |= todo.apply_patch(patch);
            }
            changed
        })
    }

    fn delete_todos(&self, ids: &[TodoId]) -> RepoResult<Vec<Todo>> {
        let targets: HashSet<TodoId> = ids.iter().copied().collect();

        self.mutate("todo_delete", |todos| {
            let before = todos.len();
            todos.retain(|todo| !targets.contains(&todo.id));
            todos.len() != before
        })
    }
}

/// Picks an id for a new record appended to `existing`.
///
/// Uses the clock reading unless it would not exceed the largest existing id.
/// When the largest id is `i64::MAX`, the first free id at or after the clock
/// reading is taken instead.
pub fn next_todo_id(existing: &[Todo], now_epoch_ms: i64) -> TodoId {
    let max_id = match existing.iter().map(|todo| todo.id).max() {
        Some(max_id) if max_id >= now_epoch_ms => max_id,
        _ => return now_epoch_ms,
    };
    if let Some(next) = max_id.checked_add(1) {
        return next;
    }

    let used: HashSet<TodoId> = existing.iter().map(|todo| todo.id).collect();
    (now_epoch_ms..i64::MAX)
        .find(|id| !used.contains(id))
        .or_else(|| (i64::MIN..now_epoch_ms).rev().find(|id| !used.contains(id)))
        .unwrap_or(now_epoch_ms)
}

fn epoch_millis_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
