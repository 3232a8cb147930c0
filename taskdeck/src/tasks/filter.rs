//! Pure projection of the task list for display.
//!
//! Filtering is a view over the snapshot, never a mutation of it: clearing
//! the criteria restores the full list without another fetch.

use taskdeck_api::task::{Task, TaskStatus};

/// Status portion of the projection: either everything or one status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// No status restriction.
    #[default]
    All,
    /// Only tasks with exactly this status.
    Only(TaskStatus),
}

impl StatusFilter {
    /// Cycles All -> Pending -> In Progress -> Completed -> All.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Only(TaskStatus::Pending),
            Self::Only(TaskStatus::Pending) => Self::Only(TaskStatus::InProgress),
            Self::Only(TaskStatus::InProgress) => Self::Only(TaskStatus::Completed),
            Self::Only(TaskStatus::Completed) => Self::All,
        }
    }

    /// Display label for the filter selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.as_str(),
        }
    }

    /// Whether a task with the given status passes this filter.
    #[must_use]
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => status == wanted,
        }
    }
}

/// Returns the tasks visible under the given search text and status filter.
///
/// The title match is a case-insensitive substring test, the status match
/// is exact equality, and the two are ANDed. An empty search matches
/// everything.
#[must_use]
pub fn project(tasks: &[Task], search: &str, status: StatusFilter) -> Vec<Task> {
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|t| needle.is_empty() || t.title.to_lowercase().contains(&needle))
        .filter(|t| status.matches(t.status))
        .cloned()
        .collect()
}
