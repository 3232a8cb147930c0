//! Dark/light appearance preference.
//!
//! The flag defaults to dark, flips instantly, and every change is written
//! through to the state store so the choice survives restarts. A persist
//! failure is logged; the in-memory flag keeps the new value either way.

use crate::storage::StateStore;

/// The active color mode plus its durable backing.
#[derive(Debug)]
pub struct Appearance {
    dark: bool,
    store: StateStore,
}

impl Appearance {
    /// Loads the saved preference, dark if none was ever saved.
    #[must_use]
    pub fn load(store: StateStore) -> Self {
        let dark = store.dark_mode();
        Self { dark, store }
    }

    /// Whether dark mode is active.
    #[must_use]
    pub const fn dark(&self) -> bool {
        self.dark
    }

    /// Flips the mode and persists the new value.
    pub fn toggle(&mut self) {
        self.dark = !self.dark;
        if let Err(e) = self.store.set_dark_mode(self.dark) {
            tracing::warn!(err = %e, "failed to persist appearance preference");
        }
    }
}
