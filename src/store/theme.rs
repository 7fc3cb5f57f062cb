//! Theme store: a persisted dark/light flag

use crate::storage::{SharedStore, THEME_KEY};

pub struct ThemeStore {
    dark_mode: bool,
    storage: SharedStore,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore").field("dark_mode", &self.dark_mode).finish()
    }
}

impl ThemeStore {
    /// Read the saved mode; defaults to dark
    pub fn load(storage: SharedStore) -> Self {
        let dark_mode = storage
            .get(THEME_KEY)
            .map(|v| v != "light")
            .unwrap_or(true);
        Self { dark_mode, storage }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn toggle(&mut self) -> bool {
        self.set(!self.dark_mode);
        self.dark_mode
    }

    pub fn set(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
        let value = if dark_mode { "dark" } else { "light" };
        tracing::debug!(theme = value, "Theme changed");
        if let Err(e) = self.storage.set(THEME_KEY, value) {
            tracing::warn!(error = %e, "Failed to persist theme");
        }
    }
}
