//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the todo list gestures to Dart via FRB as sync calls.
//! - Return one response envelope shape carrying the re-render state.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens its own connection; no state is held between calls
//!   beyond the pinned `TodoConfig`.
//! - Gestures that cannot apply (blank title, unknown id) answer `ok=false`
//!   but still carry the current list.

use log::{debug, warn};
use std::path::PathBuf;
use std::sync::OnceLock;
use todo_core::db::open_db;
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    EditOutcome, FilteringMode, LocalStorageTodoRepository, RepoError, RepoResult,
    SqliteLocalStorage, Todo, TodoConfig, TodoListView,
};

static TODO_CONFIG: OnceLock<TodoConfig> = OnceLock::new();

type SqliteTodoView<'conn> = TodoListView<LocalStorageTodoRepository<SqliteLocalStorage<'conn>>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by all later calls.
///
/// The remaining settings come from the environment. Must run before the
/// first todo call; afterwards only the already pinned path is accepted.
/// Returns an empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_todo_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    let active = TODO_CONFIG.get_or_init(|| TodoConfig {
        db_path: requested.clone(),
        ..TodoConfig::from_env()
    });
    if active.db_path == requested {
        String::new()
    } else {
        format!(
            "todo db path already set to `{}`; refusing to switch to `{}`",
            active.db_path.display(),
            requested.display()
        )
    }
}

/// One todo row for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Response envelope for every todo call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    /// Whether the gesture was applied.
    pub ok: bool,
    /// Human-readable result or error message.
    pub message: String,
    /// Items visible under `filtering_mode`, in collection order.
    pub items: Vec<TodoItem>,
    pub filtering_mode: String,
    /// Incomplete item count over the full collection.
    pub items_left: u32,
    pub has_completed: bool,
    pub all_completed: bool,
}

impl TodoListResponse {
    fn from_view(view: &SqliteTodoView<'_>, gesture: Gesture) -> Self {
        let (ok, message) = match gesture {
            Gesture::Applied(message) => (true, message),
            Gesture::Rejected(message) => (false, message),
        };
        Self {
            ok,
            message,
            items: view.visible_todos().into_iter().map(to_todo_item).collect(),
            filtering_mode: view.filtering_mode().as_str().to_string(),
            items_left: u32::try_from(view.items_left()).unwrap_or(u32::MAX),
            has_completed: view.has_completed(),
            all_completed: view.all_completed(),
        }
    }

    fn failure(message: impl Into<String>, filtering_mode: &str) -> Self {
        Self {
            ok: false,
            message: message.into(),
            items: Vec::new(),
            filtering_mode: filtering_mode.to_string(),
            items_left: 0,
            has_completed: false,
            all_completed: false,
        }
    }
}

/// What a gesture did to the list, with the message shown to the user.
enum Gesture {
    Applied(String),
    /// Nothing was written; the list is still returned for re-render.
    Rejected(String),
}

impl Gesture {
    fn applied(message: &str) -> Self {
        Self::Applied(message.to_string())
    }

    fn not_found() -> Self {
        Self::Rejected("Todo not found.".to_string())
    }
}

/// Lists todos under `filtering_mode` (`all|active|completed`).
#[flutter_rust_bridge::frb(sync)]
pub fn todos_list(filtering_mode: String) -> TodoListResponse {
    with_view("todos_list", &filtering_mode, |view| {
        Ok(Gesture::Applied(format!("{} item(s).", view.todos().len())))
    })
}

/// Creates a todo from the new-title input.
///
/// Blank titles yield `ok=false` with the validation message.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(title: String, filtering_mode: String) -> TodoListResponse {
    with_view("todo_add", &filtering_mode, |view| {
        view.set_new_title(title);
        if view.submit_new_todo()? {
            return Ok(Gesture::applied("Todo created."));
        }
        let message = view
            .error_message()
            .map(|message| message.to_string())
            .unwrap_or_default();
        Ok(Gesture::Rejected(message))
    })
}

/// Inverts completion of one todo. Unknown ids answer `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(id: i64, filtering_mode: String) -> TodoListResponse {
    with_view("todo_toggle", &filtering_mode, |view| {
        if view.toggle(id)? {
            Ok(Gesture::applied("Todo toggled."))
        } else {
            Ok(Gesture::not_found())
        }
    })
}

/// Commits an inline title edit; blank titles delete the todo.
///
/// Unknown ids answer `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_rename(id: i64, title: String, filtering_mode: String) -> TodoListResponse {
    with_view("todo_rename", &filtering_mode, |view| {
        if !view.begin_edit(id) {
            return Ok(Gesture::not_found());
        }
        view.update_edit_buffer(title);
        let message = match view.commit_edit()? {
            Some(EditOutcome::Renamed) => "Todo renamed.",
            Some(EditOutcome::Deleted) => "Todo deleted.",
            Some(EditOutcome::Unchanged) | None => "Todo unchanged.",
        };
        Ok(Gesture::applied(message))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(id: i64, filtering_mode: String) -> TodoListResponse {
    with_view("todo_delete", &filtering_mode, |view| {
        view.delete(id)?;
        Ok(Gesture::applied("Todo deleted."))
    })
}

/// Completes all, or uncompletes all when everything is already completed.
#[flutter_rust_bridge::frb(sync)]
pub fn todos_toggle_all(filtering_mode: String) -> TodoListResponse {
    with_view("todos_toggle_all", &filtering_mode, |view| {
        view.toggle_all()?;
        Ok(Gesture::applied("Todos toggled."))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todos_clear_completed(filtering_mode: String) -> TodoListResponse {
    with_view("todos_clear_completed", &filtering_mode, |view| {
        view.clear_completed()?;
        Ok(Gesture::applied("Completed todos cleared."))
    })
}

fn active_config() -> &'static TodoConfig {
    TODO_CONFIG.get_or_init(TodoConfig::from_env)
}

fn with_view(
    op: &'static str,
    filtering_mode: &str,
    f: impl FnOnce(&mut SqliteTodoView<'_>) -> RepoResult<Gesture>,
) -> TodoListResponse {
    let mode = match filtering_mode.parse::<FilteringMode>() {
        Ok(mode) => mode,
        Err(err) => return TodoListResponse::failure(format!("{op} failed: {err}"), "all"),
    };

    let config = active_config();
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={op} error_code=db_open_failed");
            return TodoListResponse::failure(format!("{op} failed: {err}"), mode.as_str());
        }
    };

    let result = SqliteLocalStorage::try_new(&conn)
        .map_err(RepoError::from)
        .and_then(|storage| {
            TodoListView::load(LocalStorageTodoRepository::with_key(
                storage,
                config.storage_key.as_str(),
            ))
        })
        .and_then(|mut view| {
            view.set_filtering_mode(mode);
            let gesture = f(&mut view)?;
            if let Gesture::Rejected(_) = gesture {
                debug!("event=ffi_call module=ffi status=rejected op={op}");
            }
            Ok(TodoListResponse::from_view(&view, gesture))
        });

    match result {
        Ok(response) => response,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={op} error_code=repo_failed");
            TodoListResponse::failure(format!("{op} failed: {err}"), mode.as_str())
        }
    }
}

fn to_todo_item(todo: &Todo) -> TodoItem {
    TodoItem {
        id: todo.id,
        title: todo.title.clone(),
        completed: todo.completed,
    }
}
