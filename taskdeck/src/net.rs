//! Networking coordinator for wiring the TUI to the backend.
//!
//! This module bridges the synchronous TUI event loop (crossterm poll-based)
//! with the async [`ApiClient`] / [`Synchronizer`] stack. It spawns a tokio
//! background task and communicates with the main thread via [`NetCommand`] /
//! [`NetEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── NetEvent ───  tokio background tasks
//!                     ─── NetCommand →
//! ```
//!
//! The main thread sends [`NetCommand`]s (e.g., refresh the task list) and
//! drains [`NetEvent`]s (e.g., a fresh snapshot arrived) on each tick of the
//! poll-based event loop.
//!
//! Each command runs in its own spawned task, so a slow backend call never
//! blocks the command queue. Overlapping refreshes are therefore possible;
//! within one session generation the last snapshot to arrive wins, and the
//! synchronizer drops any snapshot that crosses a login or logout.

use std::sync::Arc;

use tokio::sync::mpsc;

use taskdeck_api::auth::Credentials;
use taskdeck_api::push::Notification;
use taskdeck_api::task::{Task, TaskDraft};

use crate::api::{ApiClient, ApiError};
use crate::session::SessionManager;
use crate::tasks::{RefreshOutcome, Synchronizer};

/// Commands sent from the TUI main loop to the networking worker.
#[derive(Debug)]
pub enum NetCommand {
    /// Authenticate against an existing account.
    LogIn {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
    /// Create an account, then open a session with it.
    Register {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
    /// Re-fetch the task list.
    Refresh,
    /// Create a task on the backend.
    Create {
        /// Title and status for the new task.
        draft: TaskDraft,
    },
    /// Replace a task document on the backend.
    Update {
        /// The full task document to store.
        task: Task,
    },
    /// Delete a task on the backend.
    Delete {
        /// Backend id of the task.
        task_id: String,
    },
    /// Grant another user access to a task.
    Share {
        /// Backend id of the task.
        task_id: String,
        /// Backend id of the recipient user.
        user_id: String,
    },
    /// Discard the session token.
    LogOut,
    /// Gracefully shut down the networking worker.
    Shutdown,
}

/// Events sent from the networking worker to the TUI main loop.
#[derive(Debug)]
pub enum NetEvent {
    /// Login or registration succeeded and the token is stored.
    SessionOpened,
    /// Login or registration was rejected.
    AuthFailed {
        /// Reason to show on the login screen.
        message: String,
    },
    /// A refresh produced a fresh task snapshot.
    TasksRefreshed {
        /// The merged owned-plus-shared task list.
        tasks: Vec<Task>,
    },
    /// The backend rejected the session token; the session is closed.
    SessionExpired,
    /// The backend accepted a task creation.
    CreateCompleted,
    /// The backend rejected a task creation.
    CreateFailed {
        /// Reason to show the user.
        message: String,
    },
    /// The backend accepted a task replacement.
    UpdateCompleted,
    /// The backend accepted a share grant.
    ShareCompleted,
    /// The backend rejected a share grant.
    ShareFailed {
        /// Reason to show the user.
        message: String,
    },
    /// A push notification arrived.
    Notification(Notification),
    /// The push channel closed; no further notifications will arrive.
    PushClosed,
}

/// Spawns the networking worker and returns the command handle.
///
/// Events flow back through `events`, which the caller keeps the receiving
/// half of. The push listener shares the same event channel, so the TUI
/// drains a single stream.
#[must_use]
pub fn spawn_worker(
    api: Arc<ApiClient>,
    sync: Synchronizer,
    session: Arc<SessionManager>,
    events: mpsc::Sender<NetEvent>,
    capacity: usize,
) -> mpsc::Sender<NetCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel(capacity);
    let worker = Worker {
        api,
        sync,
        session,
        events,
    };
    tokio::spawn(command_loop(worker, cmd_rx));
    cmd_tx
}

/// Background task: dispatch commands from the TUI main loop.
///
/// Backend calls are spawned so the queue keeps draining while they run.
/// `LogOut` is handled inline; it only touches local state and must not race
/// with a later `LogIn` that re-orders the queue.
async fn command_loop(worker: Worker, mut commands: mpsc::Receiver<NetCommand>) {
    while let Some(command) = commands.recv().await {
        match command {
            NetCommand::LogIn { username, password } => {
                let w = worker.clone();
                tokio::spawn(async move { w.log_in(Credentials { username, password }).await });
            }
            NetCommand::Register { username, password } => {
                let w = worker.clone();
                tokio::spawn(async move { w.register(Credentials { username, password }).await });
            }
            NetCommand::Refresh => {
                let w = worker.clone();
                tokio::spawn(async move { w.refresh().await });
            }
            NetCommand::Create { draft } => {
                let w = worker.clone();
                tokio::spawn(async move { w.create(draft).await });
            }
            NetCommand::Update { task } => {
                let w = worker.clone();
                tokio::spawn(async move { w.update(task).await });
            }
            NetCommand::Delete { task_id } => {
                let w = worker.clone();
                tokio::spawn(async move { w.delete(&task_id).await });
            }
            NetCommand::Share { task_id, user_id } => {
                let w = worker.clone();
                tokio::spawn(async move { w.share(&task_id, &user_id).await });
            }
            NetCommand::LogOut => worker.session.logout(),
            NetCommand::Shutdown => {
                tracing::info!("net worker shutting down");
                break;
            }
        }
    }
}

/// Shared context for the per-command tasks.
#[derive(Debug, Clone)]
struct Worker {
    api: Arc<ApiClient>,
    sync: Synchronizer,
    session: Arc<SessionManager>,
    events: mpsc::Sender<NetEvent>,
}

impl Worker {
    async fn log_in(&self, creds: Credentials) {
        match self.api.login(&creds).await {
            Ok(resp) => self.open_session(resp.token).await,
            Err(e) => {
                self.send(NetEvent::AuthFailed {
                    message: user_message(&e),
                })
                .await;
            }
        }
    }

    async fn register(&self, creds: Credentials) {
        match self.api.register(&creds).await {
            Ok(resp) => self.open_session(resp.token).await,
            Err(e) => {
                self.send(NetEvent::AuthFailed {
                    message: user_message(&e),
                })
                .await;
            }
        }
    }

    async fn open_session(&self, token: String) {
        self.session.login(token);
        self.send(NetEvent::SessionOpened).await;
        self.refresh().await;
    }

    /// A failed refresh leaves the current list on screen; only a 401 is
    /// surfaced, by closing the session.
    async fn refresh(&self) {
        match self.sync.refresh().await {
            Ok(outcome) => self.apply(outcome).await,
            Err(ApiError::Unauthorized) => self.expire().await,
            Err(e) => tracing::warn!(error = %e, "task refresh failed"),
        }
    }

    async fn create(&self, draft: TaskDraft) {
        match self.sync.create(&draft).await {
            Ok(outcome) => {
                self.apply(outcome).await;
                self.send(NetEvent::CreateCompleted).await;
            }
            Err(ApiError::Unauthorized) => self.expire().await,
            Err(e) => {
                self.send(NetEvent::CreateFailed {
                    message: user_message(&e),
                })
                .await;
            }
        }
    }

    async fn update(&self, task: Task) {
        match self.sync.update(&task).await {
            Ok(outcome) => {
                self.apply(outcome).await;
                self.send(NetEvent::UpdateCompleted).await;
            }
            Err(ApiError::Unauthorized) => self.expire().await,
            Err(e) => tracing::warn!(task = %task.id, error = %e, "task update failed"),
        }
    }

    async fn delete(&self, task_id: &str) {
        match self.sync.delete(task_id).await {
            Ok(outcome) => self.apply(outcome).await,
            Err(ApiError::Unauthorized) => self.expire().await,
            // TODO: surface update/delete rejections in the status line;
            // today they reach the user only through the log.
            Err(e) => tracing::warn!(task = %task_id, error = %e, "task delete failed"),
        }
    }

    async fn share(&self, task_id: &str, user_id: &str) {
        match self.sync.share(task_id, user_id).await {
            Ok(outcome) => {
                self.apply(outcome).await;
                self.send(NetEvent::ShareCompleted).await;
            }
            Err(ApiError::Unauthorized) => self.expire().await,
            Err(e) => {
                self.send(NetEvent::ShareFailed {
                    message: user_message(&e),
                })
                .await;
            }
        }
    }

    async fn apply(&self, outcome: RefreshOutcome) {
        match outcome {
            RefreshOutcome::Snapshot(tasks) => {
                self.send(NetEvent::TasksRefreshed { tasks }).await;
            }
            RefreshOutcome::Stale | RefreshOutcome::LoggedOut => {}
        }
    }

    async fn expire(&self) {
        self.session.logout();
        self.send(NetEvent::SessionExpired).await;
    }

    async fn send(&self, event: NetEvent) {
        if self.events.send(event).await.is_err() {
            tracing::debug!("net event receiver dropped");
        }
    }
}

/// User-facing failure text: the backend's own message when it sent one.
fn user_message(err: &ApiError) -> String {
    err.backend_message().unwrap_or("Unknown error").to_string()
}
