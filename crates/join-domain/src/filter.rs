use crate::grouped::GroupedTasks;
use crate::task::{Task, TaskStatus};

/// Single-value status filter from the board header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn allows(&self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(only) => *only == status,
        }
    }
}

/// Free-text search plus status filter over the board.
///
/// `apply` is a pure function of its inputs: the same filter applied twice
/// yields the same view, and an empty term with `All` is a passthrough.
#[derive(Debug, Clone, Default)]
pub struct BoardFilter {
    term: String,
    pub status: StatusFilter,
}

impl BoardFilter {
    pub fn new(term: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            term: term.into().to_lowercase(),
            status,
        }
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into().to_lowercase();
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_passthrough(&self) -> bool {
        self.term.is_empty() && self.status == StatusFilter::All
    }

    /// Case-insensitive substring match against title or description.
    pub fn matches(&self, task: &Task) -> bool {
        if !self.status.allows(task.status) {
            return false;
        }
        if self.term.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(&self.term)
            || task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&self.term))
    }

    pub fn apply(&self, grouped: &GroupedTasks) -> GroupedTasks {
        if self.is_passthrough() {
            return grouped.clone();
        }
        let mut filtered = GroupedTasks::default();
        for status in TaskStatus::ORDER {
            *filtered.column_mut(status) = grouped
                .column(status)
                .iter()
                .filter(|task| self.matches(task))
                .cloned()
                .collect();
        }
        filtered
    }
}
