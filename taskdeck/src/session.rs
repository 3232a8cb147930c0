//! Session lifecycle: token custody and the refresh generation counter.
//!
//! The token lives in an [`AuthSlot`] shared with the API client, so the
//! header attaches and detaches the moment the session changes, and in the
//! [`StateStore`] so it survives restarts. Every login and logout bumps a
//! generation counter; in-flight refreshes capture the generation when they
//! start and their results are discarded if it has moved on, so a fetch
//! started under an old session can never repopulate the screen after
//! logout.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::storage::StateStore;

/// Shared slot holding the current session token.
///
/// Cloning shares the underlying slot. The session manager writes it; the
/// API client reads it per request.
#[derive(Debug, Clone, Default)]
pub struct AuthSlot(Arc<RwLock<Option<String>>>);

impl AuthSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current token, if one is held.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.0.read().clone()
    }

    /// Installs or clears the token.
    pub fn set(&self, token: Option<String>) {
        *self.0.write() = token;
    }

    /// Whether a token is currently held.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.read().is_some()
    }
}

/// Owns the session state: the auth slot, its durable copy, and the
/// generation counter.
#[derive(Debug)]
pub struct SessionManager {
    auth: AuthSlot,
    store: StateStore,
    generation: AtomicU64,
}

impl SessionManager {
    /// Creates a manager over the given slot and store, seeding the slot
    /// with the saved token if one exists. Called once at startup, so a
    /// previous session resumes without re-entering credentials.
    #[must_use]
    pub fn restore(auth: AuthSlot, store: StateStore) -> Self {
        if let Some(token) = store.token() {
            auth.set(Some(token));
        }
        Self {
            auth,
            store,
            generation: AtomicU64::new(0),
        }
    }

    /// Whether a session is currently active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.auth.is_set()
    }

    /// Current refresh generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Installs a new session token in the slot and the durable store.
    ///
    /// A failure to persist is logged and otherwise ignored; the in-memory
    /// session is still fully usable, it just will not survive a restart.
    pub fn login(&self, token: String) {
        self.auth.set(Some(token.clone()));
        if let Err(e) = self.store.set_token(Some(&token)) {
            tracing::warn!(err = %e, "failed to persist session token");
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::info!("session opened");
    }

    /// Discards the session from the slot and the durable store.
    ///
    /// Safe to call when already logged out.
    pub fn logout(&self) {
        self.auth.set(None);
        if let Err(e) = self.store.set_token(None) {
            tracing::warn!(err = %e, "failed to clear persisted session token");
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::info!("session closed");
    }
}
