//! Terminal front-end for the to-do list.
//!
//! # Responsibility
//! - Run a line-oriented event loop: one stdin line is one user gesture.
//! - Redraw the list after every gesture.
//!
//! Usage: `todo_cli [--db <path>]`. Environment: `TODO_STORAGE_KEY`,
//! `TODO_DB_PATH`, `TODO_LOG_LEVEL`, `TODO_LOG_DIR`.

mod command;
mod render;

use command::{Command, HELP};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_core::{
    init_logging, EditOutcome, LocalStorageTodoRepository, RepoError, SqliteLocalStorage,
    TodoConfig, TodoListView, TodoRepository,
};

/// Failure of one gesture: storage errors are reported and the loop goes
/// on, terminal write errors end the session.
#[derive(Debug)]
enum DispatchError {
    Repo(RepoError),
    Io(io::Error),
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "output failed: {err}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RepoError> for DispatchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<io::Error> for DispatchError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

fn main() -> ExitCode {
    let mut config = TodoConfig::from_env();
    if let Err(message) = apply_args(&mut config, std::env::args().skip(1)) {
        eprintln!("{message}");
        return ExitCode::from(2);
    }

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn apply_args(
    config: &mut TodoConfig,
    mut args: impl Iterator<Item = String>,
) -> Result<(), String> {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let path = args.next().ok_or("--db requires a path")?;
                config.db_path = PathBuf::from(path);
            }
            "-h" | "--help" => {
                return Err(format!("usage: todo_cli [--db <path>]\n{HELP}"));
            }
            other => return Err(format!("unexpected argument `{other}`")),
        }
    }
    Ok(())
}

fn run(config: &TodoConfig) -> Result<(), String> {
    let conn = open_db(&config.db_path)
        .map_err(|err| format!("failed to open `{}`: {err}", config.db_path.display()))?;
    let storage = SqliteLocalStorage::try_new(&conn).map_err(|err| err.to_string())?;
    let repo = LocalStorageTodoRepository::with_key(storage, config.storage_key.as_str());
    let mut view = TodoListView::load(repo).map_err(|err| err.to_string())?;
    info!("event=cli_start module=cli status=ok count={}", view.todos().len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::render(&mut out, &view).map_err(|err| err.to_string())?;

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|err| err.to_string())?;
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}").map_err(|err| err.to_string())?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{HELP}").map_err(|err| err.to_string())?;
                continue;
            }
            other => match dispatch(&mut view, other, &mut out) {
                Ok(()) => {}
                Err(DispatchError::Repo(err)) => {
                    writeln!(out, "error: {err}").map_err(|err| err.to_string())?;
                }
                Err(err @ DispatchError::Io(_)) => return Err(err.to_string()),
            },
        }
        render::render(&mut out, &view).map_err(|err| err.to_string())?;
    }

    Ok(())
}

fn dispatch<R: TodoRepository>(
    view: &mut TodoListView<R>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), DispatchError> {
    view.dismiss_error();
    match command {
        Command::Add(title) => {
            view.set_new_title(title);
            view.submit_new_todo()?;
        }
        Command::Toggle(id) => {
            if !view.toggle(id)? {
                writeln!(out, "no todo with id {id}")?;
            }
        }
        Command::ToggleAll => view.toggle_all()?,
        Command::Delete(id) => view.delete(id)?,
        Command::ClearCompleted => view.clear_completed()?,
        Command::Edit(id) => {
            if !view.begin_edit(id) {
                writeln!(out, "no todo with id {id}")?;
            }
        }
        Command::Type(text) => view.update_edit_buffer(text),
        Command::Commit => {
            let note = match view.commit_edit()? {
                Some(EditOutcome::Renamed) => "renamed",
                Some(EditOutcome::Deleted) => "deleted",
                Some(EditOutcome::Unchanged) => "unchanged",
                None => "not editing",
            };
            writeln!(out, "{note}")?;
        }
        Command::Cancel => view.cancel_edit(),
        Command::Filter(mode) => view.set_filtering_mode(mode),
        Command::List | Command::Help | Command::Quit => {}
    }
    Ok(())
}
