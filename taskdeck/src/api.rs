//! HTTP client for the task service REST API.
//!
//! A thin wrapper over [`reqwest`] that knows the endpoint layout, attaches
//! the session token from the shared [`AuthSlot`] on every request, and maps
//! responses into [`ApiError`]. The client performs no retries and no local
//! caching: callers re-fetch after every mutation, so the backend stays the
//! single source of truth.

use std::time::Duration;

use reqwest::{Method, Response, StatusCode, header};
use url::Url;

use taskdeck_api::auth::{AuthResponse, Credentials};
use taskdeck_api::rest::{self, ErrorBody};
use taskdeck_api::task::{ShareRequest, Task, TaskDraft};

use crate::session::AuthSlot;

/// Errors produced by REST calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (connection refused, timeout, etc.).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid request URL: {0}")]
    BadUrl(#[from] url::ParseError),

    /// The backend rejected the session token (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The backend rejected the request and said why.
    #[error("rejected by backend ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Backend-supplied reason, suitable for showing to the user.
        message: String,
    },

    /// The backend failed without a parseable error body.
    #[error("unexpected status {status}")]
    Unexpected {
        /// HTTP status code.
        status: u16,
    },
}

impl ApiError {
    /// Backend-supplied failure message, when the response carried one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Client for the task service REST API.
///
/// Cheap to share behind an `Arc`. The auth slot is injected at construction
/// so the session manager and this client observe the same token without
/// either owning the other.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    auth: AuthSlot,
}

impl ApiClient {
    /// Creates a client for the service at `base`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base: Url, auth: AuthSlot, request_timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self { http, base, auth })
    }

    /// Authenticates with the backend. Does not store the returned token;
    /// that is the session manager's job.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn login(&self, creds: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(rest::LOGIN)?;
        let response = self.request(Method::POST, url).json(creds).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn register(&self, creds: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(rest::REGISTER)?;
        let response = self.request(Method::POST, url).json(creds).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Fetches the caller's own tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn owned_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint(rest::TASKS)?;
        let response = self.request(Method::GET, url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Fetches tasks other users have shared with the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn shared_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint(rest::SHARED_TASKS)?;
        let response = self.request(Method::GET, url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Creates a task. The backend assigns the id; callers observe the new
    /// task through the next fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        let url = self.endpoint(rest::TASKS)?;
        let response = self.request(Method::POST, url).json(draft).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Replaces a task document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn update_task(&self, task: &Task) -> Result<(), ApiError> {
        let url = self.endpoint(&rest::task(&task.id))?;
        let response = self.request(Method::PUT, url).json(task).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Deletes a task by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&rest::task(id))?;
        let response = self.request(Method::DELETE, url).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Shares a task with another user by backend user id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn share_task(&self, id: &str, user_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&rest::share(id))?;
        let body = ShareRequest {
            user_id: user_id.to_string(),
        };
        let response = self.request(Method::PUT, url).json(&body).send().await?;
        check(response).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    /// Starts a request, attaching the session token when one is held.
    ///
    /// The backend expects the raw token in the `Authorization` header,
    /// without a `Bearer` prefix.
    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match self.auth.get() {
            Some(token) => builder.header(header::AUTHORIZATION, token),
            None => builder,
        }
    }
}

/// Maps a non-success response to the appropriate [`ApiError`].
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    let code = status.as_u16();
    match response.json::<ErrorBody>().await {
        Ok(body) => Err(ApiError::Rejected {
            status: code,
            message: body.message,
        }),
        Err(_) => Err(ApiError::Unexpected { status: code }),
    }
}
