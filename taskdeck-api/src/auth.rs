//! Authentication request and response bodies.
//!
//! Login and registration share the same shape: credentials in, a session
//! token out. The token is opaque to the client and is echoed back verbatim
//! as the `Authorization` header of every subsequent request, with no
//! `Bearer` prefix.

use serde::{Deserialize, Serialize};

/// Credentials for `POST /api/auth/login` and `POST /api/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Plaintext password. Sent over the wire only, never stored.
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque session token.
    pub token: String,
}
