use std::sync::Arc;

use pollbook_store::{keys, KeyValueStore};
use tracing::debug;

use crate::error::LedgerResult;

/// Persisted UI preferences. Currently only the theme.
pub struct Preferences<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The stored theme, or `default` when nothing has been saved yet.
    pub fn dark_mode(&self, default: bool) -> LedgerResult<bool> {
        let value = self.store.get(keys::DARK_MODE)?;
        Ok(match value.as_deref() {
            Some(raw) => raw == "true",
            None => default,
        })
    }

    pub fn set_dark_mode(&self, enabled: bool) -> LedgerResult<()> {
        self.store.set(keys::DARK_MODE, if enabled { "true" } else { "false" })?;
        debug!(enabled, "saved theme preference");
        Ok(())
    }

    /// Flip the theme and return the new value.
    pub fn toggle_dark_mode(&self, default: bool) -> LedgerResult<bool> {
        let next = !self.dark_mode(default)?;
        self.set_dark_mode(next)?;
        Ok(next)
    }
}
