//! Task resource types for the `TaskDeck` backend.
//!
//! The backend owns the task collection: ids are assigned server-side and
//! every mutation is confirmed by re-fetching, so the client never invents
//! or patches documents locally. These types mirror the JSON documents the
//! REST API produces and accepts. Fields the client does not interpret are
//! carried through [`Task::extra`] so updates round-trip them unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task.
///
/// Serialized with the exact strings the backend stores. `"In Progress"`
/// contains a space, so the wire form doubles as the display form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started yet. The backend default for new tasks.
    #[default]
    Pending,
    /// Actively being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// All statuses in the order the UI cycles through them.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Returns the backend string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Returns the next status in the cycle, wrapping back to `Pending`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task document as served by the REST API.
///
/// Only `id`, `title`, and `status` are interpreted by the client. Ownership
/// and sharing metadata are resolved server-side (the shared-tasks endpoint
/// already returns the tasks visible to the caller), and any field this
/// struct does not name survives in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Backend-assigned identifier. Opaque to the client.
    #[serde(rename = "_id")]
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Current lifecycle state.
    #[serde(default)]
    pub status: TaskStatus,
    /// User id of the task owner, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// User ids this task has been shared with.
    #[serde(default, rename = "sharedWith", skip_serializing_if = "Vec::is_empty")]
    pub shared_with: Vec<String>,
    /// Creation timestamp, when the backend includes it.
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Backend fields the client does not interpret, preserved for updates.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Fields the client supplies when creating a task (`POST /api/tasks`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Title for the new task.
    pub title: String,
    /// Initial lifecycle state.
    pub status: TaskStatus,
}

/// Body of a share request (`PUT /api/tasks/{id}/share`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Backend user id of the recipient.
    #[serde(rename = "userId")]
    pub user_id: String,
}
