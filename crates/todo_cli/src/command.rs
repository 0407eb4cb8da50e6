//! Gesture commands read from the terminal.
//!
//! One line is one gesture; the first word selects the command and the rest
//! of the line is its argument.

use std::error::Error;
use std::fmt::{Display, Formatter};
use todo_core::{FilteringMode, TodoId, UnknownFilteringMode};

pub const HELP: &str = "\
commands:
  add <title>        create a todo
  toggle <id>        flip completion of one todo
  toggle-all         complete all, or uncomplete all when all are completed
  delete <id>        delete one todo
  clear              delete completed todos
  edit <id>          start editing a title
  type <text>        replace the edit buffer
  commit             save the edit (empty text deletes the todo)
  cancel             leave edit mode without saving
  filter <mode>      all | active | completed
  list               redraw the list
  help               show this text
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(TodoId),
    ToggleAll,
    Delete(TodoId),
    ClearCompleted,
    Edit(TodoId),
    Type(String),
    Commit,
    Cancel,
    Filter(FilteringMode),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    InvalidId(String),
    Filter(UnknownFilteringMode),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command; try `help`"),
            Self::Unknown(word) => write!(f, "unknown command `{word}`; try `help`"),
            Self::InvalidId(raw) => write!(f, "invalid todo id `{raw}`"),
            Self::Filter(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Filter(err) => Some(err),
            _ => None,
        }
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_start();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line.trim_end(), ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            // Titles keep their inner text verbatim; blank ones are rejected
            // by the view, not here.
            "add" => Ok(Self::Add(rest.trim_end_matches(['\r', '\n']).to_string())),
            "toggle" => parse_id(rest).map(Self::Toggle),
            "toggle-all" => Ok(Self::ToggleAll),
            "delete" | "rm" => parse_id(rest).map(Self::Delete),
            "clear" => Ok(Self::ClearCompleted),
            "edit" => parse_id(rest).map(Self::Edit),
            "type" => Ok(Self::Type(rest.trim_end_matches(['\r', '\n']).to_string())),
            "commit" => Ok(Self::Commit),
            "cancel" => Ok(Self::Cancel),
            "filter" => rest
                .parse::<FilteringMode>()
                .map(Self::Filter)
                .map_err(CommandError::Filter),
            "list" | "ls" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(raw: &str) -> Result<TodoId, CommandError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<TodoId>()
        .map_err(|_| CommandError::InvalidId(trimmed.to_string()))
}
