//! Display filter over a todo collection.

use crate::model::todo::Todo;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Display selector for the todo list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilteringMode {
    #[default]
    All,
    /// Incomplete items only.
    Active,
    Completed,
}

impl FilteringMode {
    pub const ALL_MODES: [FilteringMode; 3] = [Self::All, Self::Active, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Returns whether `todo` is displayed under this mode.
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl Display for FilteringMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilteringMode(pub String);

impl Display for UnknownFilteringMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filtering mode `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for UnknownFilteringMode {}

impl FromStr for FilteringMode {
    type Err = UnknownFilteringMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownFilteringMode(other.to_string())),
        }
    }
}

/// Returns the records displayed under `mode`, in collection order.
pub fn filter_todos(todos: &[Todo], mode: FilteringMode) -> Vec<&Todo> {
    todos.iter().filter(|todo| mode.matches(todo)).collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_todos, FilteringMode};
    use crate::model::todo::Todo;

    fn collection() -> Vec<Todo> {
        vec![
            Todo {
                id: 1,
                title: "a".to_string(),
                completed: false,
            },
            Todo {
                id: 2,
                title: "b".to_string(),
                completed: true,
            },
            Todo {
                id: 3,
                title: "c".to_string(),
                completed: false,
            },
        ]
    }

    fn ids(todos: &[&Todo]) -> Vec<i64> {
        todos.iter().map(|todo| todo.id).collect()
    }

    #[test]
    fn all_mode_returns_input_unchanged() {
        let todos = collection();
        let filtered = filter_todos(&todos, FilteringMode::All);
        assert_eq!(
            filtered.into_iter().cloned().collect::<Vec<_>>(),
            todos
        );
    }

    #[test]
    fn active_and_completed_partition_in_order() {
        let todos = collection();
        assert_eq!(ids(&filter_todos(&todos, FilteringMode::Active)), vec![1, 3]);
        assert_eq!(ids(&filter_todos(&todos, FilteringMode::Completed)), vec![2]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let todos = collection();
        for mode in FilteringMode::ALL_MODES {
            let once: Vec<_> = filter_todos(&todos, mode).into_iter().cloned().collect();
            let twice: Vec<_> = filter_todos(&once, mode).into_iter().cloned().collect();
            assert_eq!(once, twice);
            assert_eq!(once, filter_todos(&todos, mode).into_iter().cloned().collect::<Vec<_>>());
        }
    }

    #[test]
    fn parse_accepts_known_names_and_rejects_others() {
        assert_eq!(" Active ".parse::<FilteringMode>(), Ok(FilteringMode::Active));
        assert_eq!("".parse::<FilteringMode>(), Ok(FilteringMode::All));
        let err = "done".parse::<FilteringMode>().unwrap_err();
        assert!(err.to_string().contains("done"));
        for mode in FilteringMode::ALL_MODES {
            assert_eq!(mode.as_str().parse::<FilteringMode>(), Ok(mode));
        }
    }
}
