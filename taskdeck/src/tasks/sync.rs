//! Backend synchronization for the task list.
//!
//! All reads go through [`Synchronizer::refresh`]: both task endpoints are
//! fetched concurrently, merged, and returned as one atomic snapshot.
//! Mutations are fire-and-confirm: the change is sent, then the list is
//! re-fetched, so the UI only ever shows state the backend confirmed and
//! there is nothing optimistic to roll back.
//!
//! Refreshes are not serialized against each other. Two refreshes under the
//! same session generation may overlap, and whichever completes last
//! overwrites the list; both reflect backend state from the same session,
//! so the later snapshot is the fresher one. A login or logout between a
//! refresh's start and finish changes the generation, and that refresh's
//! result is dropped instead of published.

use std::sync::Arc;

use taskdeck_api::task::{Task, TaskDraft};

use crate::api::{ApiClient, ApiError};
use crate::session::SessionManager;
use crate::tasks::merge_task_lists;

/// Outcome of a refresh attempt.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// A fresh snapshot, ready to replace the current task list.
    Snapshot(Vec<Task>),
    /// No snapshot to apply: the session changed while the fetch was in
    /// flight, or the refetch after an accepted mutation failed.
    Stale,
    /// No session is active; nothing was fetched.
    LoggedOut,
}

/// Fetches and mutates the task list against the backend.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    api: Arc<ApiClient>,
    session: Arc<SessionManager>,
}

impl Synchronizer {
    /// Creates a synchronizer over the shared API client and session.
    #[must_use]
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    /// Fetches owned and shared tasks concurrently and merges them.
    ///
    /// Skips the fetch entirely when no session is active, and discards the
    /// result when the session generation moved while the requests were in
    /// flight.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if either fetch fails.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ApiError> {
        if !self.session.is_active() {
            return Ok(RefreshOutcome::LoggedOut);
        }
        let generation = self.session.generation();
        let (owned, shared) = tokio::join!(self.api.owned_tasks(), self.api.shared_tasks());
        let owned = owned?;
        let shared = shared?;
        if self.session.generation() != generation {
            tracing::debug!(generation, "discarding refresh from a superseded session");
            return Ok(RefreshOutcome::Stale);
        }
        Ok(RefreshOutcome::Snapshot(merge_task_lists(owned, shared)))
    }

    /// Creates a task, then re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the create is rejected, or
    /// [`ApiError::Unauthorized`] if any call sees a 401.
    pub async fn create(&self, draft: &TaskDraft) -> Result<RefreshOutcome, ApiError> {
        self.api.create_task(draft).await?;
        self.refresh_after_mutation().await
    }

    /// Replaces a task document, then re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the update is rejected, or
    /// [`ApiError::Unauthorized`] if any call sees a 401.
    pub async fn update(&self, task: &Task) -> Result<RefreshOutcome, ApiError> {
        self.api.update_task(task).await?;
        self.refresh_after_mutation().await
    }

    /// Deletes a task, then re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the delete is rejected, or
    /// [`ApiError::Unauthorized`] if any call sees a 401.
    pub async fn delete(&self, id: &str) -> Result<RefreshOutcome, ApiError> {
        self.api.delete_task(id).await?;
        self.refresh_after_mutation().await
    }

    /// Shares a task with another user, then re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the share is rejected, or
    /// [`ApiError::Unauthorized`] if any call sees a 401.
    pub async fn share(&self, id: &str, user_id: &str) -> Result<RefreshOutcome, ApiError> {
        self.api.share_task(id, user_id).await?;
        self.refresh_after_mutation().await
    }

    /// Refresh for the tail end of a mutation. The mutation has already been
    /// accepted at this point, so a failed refetch is not the caller's error
    /// to report; it is logged and the current list simply stays stale until
    /// the next refresh. A 401 still propagates so the session gets closed.
    async fn refresh_after_mutation(&self) -> Result<RefreshOutcome, ApiError> {
        match self.refresh().await {
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
            Err(e) => {
                tracing::warn!(error = %e, "refetch after mutation failed");
                Ok(RefreshOutcome::Stale)
            }
            ok => ok,
        }
    }
}
