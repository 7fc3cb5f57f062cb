//! Remembers the top hit of the last fresh search

use crate::models::MovieSummary;
use crate::storage::{read_json, write_json, SharedStore, LAST_SEARCHED_KEY};

pub struct LastSearched {
    movie: Option<MovieSummary>,
    storage: SharedStore,
}

impl std::fmt::Debug for LastSearched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastSearched").field("movie", &self.movie).finish()
    }
}

impl LastSearched {
    pub fn load(storage: SharedStore) -> Self {
        let movie = read_json(storage.as_ref(), LAST_SEARCHED_KEY);
        Self { movie, storage }
    }

    pub fn get(&self) -> Option<&MovieSummary> {
        self.movie.as_ref()
    }

    /// Title offered as a suggestion in an empty search box
    pub fn title(&self) -> Option<&str> {
        self.movie.as_ref().map(|m| m.title.as_str())
    }

    pub fn record(&mut self, movie: &MovieSummary) {
        if let Err(e) = write_json(self.storage.as_ref(), LAST_SEARCHED_KEY, movie) {
            tracing::warn!(error = %e, "Failed to persist last searched movie");
        }
        self.movie = Some(movie.clone());
    }
}
