//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record persisted in local storage.
//! - Define the creation input (`NewTodo`) and partial update (`TodoPatch`).
//!
//! # Invariants
//! - `id` is unique within one collection and never reused while the record
//!   exists.
//! - The persisted shape is exactly `{ id, title, completed }`.
//! - Write inputs reject blank titles via `validate()`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of one to-do record.
///
/// Epoch-millisecond derived, bumped past the largest id in the collection
/// when the clock would collide.
pub type TodoId = i64;

/// Validation failures for todo write inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
        }
    }
}

impl Error for TodoValidationError {}

/// One to-do record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Merges `patch` into this record.
    ///
    /// Returns whether any field actually changed.
    pub fn apply_patch(&mut self, patch: &TodoPatch) -> bool {
        let mut changed = false;

        if let Some(title) = patch.title.as_ref() {
            if &self.title != title {
                self.title = title.clone();
                changed = true;
            }
        }

        if let Some(completed) = patch.completed {
            if self.completed != completed {
                self.completed = completed;
                changed = true;
            }
        }

        changed
    }
}

/// Creation input: a todo without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
}

impl NewTodo {
    /// Creates an incomplete todo input.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_title(&self.title)
    }

    /// Materializes the record with an assigned id.
    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title,
            completed: self.completed,
        }
    }
}

/// Partial field set merged into an existing record.
///
/// `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }

    /// Rejects a patch that would blank out a title.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        match self.title.as_deref() {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

/// Returns whether `title` is empty or whitespace only.
pub fn is_blank_title(title: &str) -> bool {
    title.trim().is_empty()
}

fn validate_title(title: &str) -> Result<(), TodoValidationError> {
    if is_blank_title(title) {
        return Err(TodoValidationError::EmptyTitle);
    }
    Ok(())
}
