//! Todo list view state and gesture handlers.
//!
//! # Responsibility
//! - Hold component-local UI state: collection, filter, input buffers, error.
//! - Map gestures (submit, toggle, toggle-all, delete, clear, edit) onto
//!   repository calls and replace local state with the returned collection.
//!
//! # Invariants
//! - Local collection state is only ever replaced by a repository result.
//! - Mass actions issue one batched repository call.
//! - Edit text is buffered locally; storage is touched only on commit.

use crate::model::todo::{is_blank_title, NewTodo, Todo, TodoId, TodoPatch};
use crate::repo::todo_repo::{RepoResult, TodoRepository};
use crate::view::filter::{filter_todos, FilteringMode};
use log::debug;
use std::fmt::{Display, Formatter};

/// User-facing validation message surfaced by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMessage {
    EmptyTitle,
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => f.write_str("title must not be empty"),
        }
    }
}

/// Edit mode of the list. Only one item can be edited at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Viewing,
    Editing { id: TodoId, buffer: String },
}

impl EditState {
    pub fn editing_id(&self) -> Option<TodoId> {
        match self {
            Self::Viewing => None,
            Self::Editing { id, .. } => Some(*id),
        }
    }
}

/// Result of committing an inline edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Buffer equals the stored title; nothing written.
    Unchanged,
    /// Buffer was blank; the item was deleted.
    Deleted,
    /// Title was patched.
    Renamed,
}

/// Todo list view over a repository.
pub struct TodoListView<R: TodoRepository> {
    repo: R,
    todos: Vec<Todo>,
    filtering_mode: FilteringMode,
    new_title: String,
    edit: EditState,
    error: Option<ErrorMessage>,
}

impl<R: TodoRepository> TodoListView<R> {
    /// Creates the view and loads the current collection.
    pub fn load(repo: R) -> RepoResult<Self> {
        let todos = repo.list_todos()?;
        Ok(Self {
            repo,
            todos,
            filtering_mode: FilteringMode::default(),
            new_title: String::new(),
            edit: EditState::Viewing,
            error: None,
        })
    }

    /// Re-reads the collection from storage.
    pub fn reload(&mut self) -> RepoResult<()> {
        self.todos = self.repo.list_todos()?;
        Ok(())
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Full collection in insertion order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Records displayed under the current filter.
    pub fn visible_todos(&self) -> Vec<&Todo> {
        filter_todos(&self.todos, self.filtering_mode)
    }

    pub fn filtering_mode(&self) -> FilteringMode {
        self.filtering_mode
    }

    pub fn set_filtering_mode(&mut self, mode: FilteringMode) {
        self.filtering_mode = mode;
    }

    pub fn new_title(&self) -> &str {
        self.new_title.as_str()
    }

    pub fn set_new_title(&mut self, title: impl Into<String>) {
        self.new_title = title.into();
    }

    pub fn error_message(&self) -> Option<ErrorMessage> {
        self.error
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Number of incomplete items.
    pub fn items_left(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    pub fn has_completed(&self) -> bool {
        self.todos.iter().any(|todo| todo.completed)
    }

    /// True for an empty collection as well.
    pub fn all_completed(&self) -> bool {
        self.todos.iter().all(|todo| todo.completed)
    }

    /// Commits the new-title input.
    ///
    /// Returns `Ok(false)` and surfaces `ErrorMessage::EmptyTitle` when the
    /// input is blank; storage is not touched in that case.
    pub fn submit_new_todo(&mut self) -> RepoResult<bool> {
        if is_blank_title(&self.new_title) {
            self.error = Some(ErrorMessage::EmptyTitle);
            return Ok(false);
        }

        self.todos = self.repo.add_todo(&NewTodo::new(self.new_title.clone()))?;
        self.new_title.clear();
        self.error = None;
        Ok(true)
    }

    /// Inverts `completed` for one item.
    ///
    /// Unknown ids are ignored and reported as `Ok(false)`.
    pub fn toggle(&mut self, id: TodoId) -> RepoResult<bool> {
        let Some(completed) = self.find(id).map(|todo| todo.completed) else {
            debug!("event=todo_toggle module=view status=noop reason=unknown_id");
            return Ok(false);
        };
        self.todos = self.repo.patch_todo(id, &TodoPatch::completed(!completed))?;
        Ok(true)
    }

    /// Completes every incomplete item, or uncompletes everything when all
    /// items are already completed.
    pub fn toggle_all(&mut self) -> RepoResult<()> {
        let target = !self.all_completed();
        let ids: Vec<TodoId> = self
            .todos
            .iter()
            .filter(|todo| todo.completed != target)
            .map(|todo| todo.id)
            .collect();
        if ids.is_empty() {
            return Ok(());
        }

        self.todos = self
            .repo
            .patch_todos(&ids, &TodoPatch::completed(target))?;
        Ok(())
    }

    pub fn delete(&mut self, id: TodoId) -> RepoResult<()> {
        self.todos = self.repo.delete_todo(id)?;
        if self.edit.editing_id() == Some(id) {
            self.edit = EditState::Viewing;
        }
        Ok(())
    }

    /// Deletes every completed item in one batch.
    pub fn clear_completed(&mut self) -> RepoResult<()> {
        let ids: Vec<TodoId> = self
            .todos
            .iter()
            .filter(|todo| todo.completed)
            .map(|todo| todo.id)
            .collect();
        if ids.is_empty() {
            return Ok(());
        }

        self.todos = self.repo.delete_todos(&ids)?;
        if let Some(editing) = self.edit.editing_id() {
            if ids.contains(&editing) {
                self.edit = EditState::Viewing;
            }
        }
        Ok(())
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    /// Enters edit mode for `id`, seeding the buffer with its title.
    ///
    /// Any other pending edit is discarded. Returns `false` for unknown ids.
    pub fn begin_edit(&mut self, id: TodoId) -> bool {
        let Some(title) = self.find(id).map(|todo| todo.title.clone()) else {
            return false;
        };
        self.edit = EditState::Editing { id, buffer: title };
        true
    }

    /// Replaces the edit buffer. Ignored outside edit mode.
    pub fn update_edit_buffer(&mut self, text: impl Into<String>) {
        if let EditState::Editing { buffer, .. } = &mut self.edit {
            *buffer = text.into();
        }
    }

    /// Leaves edit mode without writing anything.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Viewing;
    }

    /// Commits the edit buffer and returns to viewing.
    ///
    /// Returns `Ok(None)` outside edit mode. On a storage error the view
    /// stays in edit mode so the buffer is not lost.
    pub fn commit_edit(&mut self) -> RepoResult<Option<EditOutcome>> {
        let EditState::Editing { id, buffer } = &self.edit else {
            return Ok(None);
        };
        let (id, buffer) = (*id, buffer.clone());

        let stored_title = self.find(id).map(|todo| todo.title.clone());
        let outcome = match stored_title {
            None => EditOutcome::Unchanged,
            Some(title) if title == buffer => EditOutcome::Unchanged,
            Some(_) if is_blank_title(&buffer) => {
                self.todos = self.repo.delete_todo(id)?;
                EditOutcome::Deleted
            }
            Some(_) => {
                self.todos = self.repo.patch_todo(id, &TodoPatch::title(buffer))?;
                EditOutcome::Renamed
            }
        };

        self.edit = EditState::Viewing;
        Ok(Some(outcome))
    }

    fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }
}
