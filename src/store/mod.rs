//! Application state stores
//!
//! - `session`: login gate
//! - `favorites`: persisted favorite ids and their resolved records
//! - `theme`: persisted dark/light flag
//! - `catalog`: paginated listings per query mode
//! - `recent`: top hit of the last search
//!
//! [`Stores`] bundles them so the app receives one explicitly constructed
//! object instead of reaching for globals.

pub mod catalog;
pub mod favorites;
pub mod recent;
pub mod session;
pub mod theme;

pub use catalog::{CatalogStore, FetchTicket, PageCursor, PageRequest};
pub use favorites::{FavoritesStore, ResolveTicket};
pub use recent::LastSearched;
pub use session::{CredentialVerifier, SessionStore, StaticCredentials};
pub use theme::ThemeStore;

use crate::models::QueryMode;
use crate::storage::SharedStore;

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Idle => None,
            LoadingState::Loading(msg) => msg.as_deref(),
            LoadingState::Error(msg) => Some(msg),
        }
    }
}

// =============================================================================
// Stores
// =============================================================================

#[derive(Debug)]
pub struct Stores {
    pub session: SessionStore,
    pub favorites: FavoritesStore,
    pub theme: ThemeStore,
    pub catalog: CatalogStore,
    pub recent: LastSearched,
}

impl Stores {
    /// Build every store over one storage backend
    pub fn init(storage: SharedStore, verifier: Box<dyn CredentialVerifier>) -> Self {
        let stores = Self {
            session: SessionStore::new(verifier),
            favorites: FavoritesStore::load(storage.clone()),
            theme: ThemeStore::load(storage.clone()),
            catalog: CatalogStore::new(),
            recent: LastSearched::load(storage),
        };
        tracing::debug!(
            favorites = stores.favorites.len(),
            dark_mode = stores.theme.dark_mode(),
            "Stores initialized"
        );
        stores
    }

    /// Stores with the built-in credentials
    pub fn with_storage(storage: SharedStore) -> Self {
        Self::init(storage, Box::new(StaticCredentials::default()))
    }

    /// Abandon all in-flight work; late completions are discarded
    pub fn shutdown(&mut self) {
        for mode in QueryMode::ALL {
            self.catalog.cancel(mode);
        }
        self.favorites.cancel();
        tracing::debug!("Stores shut down");
    }
}
