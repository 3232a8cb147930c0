//! REST endpoint paths and the backend error envelope.
//!
//! Paths are relative to the configured base URL. The task-id segments are
//! backend-assigned opaque strings, interpolated verbatim.

use serde::{Deserialize, Serialize};

/// Owned-tasks collection. `GET` to list, `POST` to create.
pub const TASKS: &str = "/api/tasks";

/// Tasks other users have shared with the caller. `GET` only.
pub const SHARED_TASKS: &str = "/api/tasks/shared";

/// Login endpoint. `POST` with [`crate::auth::Credentials`].
pub const LOGIN: &str = "/api/auth/login";

/// Registration endpoint. `POST` with [`crate::auth::Credentials`].
pub const REGISTER: &str = "/api/auth/register";

/// Path for a single task. `PUT` to update, `DELETE` to remove.
#[must_use]
pub fn task(id: &str) -> String {
    format!("{TASKS}/{id}")
}

/// Path for sharing a task. `PUT` with [`crate::task::ShareRequest`].
#[must_use]
pub fn share(id: &str) -> String {
    format!("{TASKS}/{id}/share")
}

/// Error envelope the backend attaches to rejected requests.
///
/// Not every failure carries one; callers should treat its absence as a
/// generic error rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason, suitable for showing to the user.
    pub message: String,
}
