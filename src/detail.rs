//! Detail view activations
//!
//! Opening a movie creates a [`DetailActivation`] with a fresh id. The detail
//! record and the trailer list load independently; each result is applied
//! only while its activation is still the open one.

use crate::models::{select_trailer, MovieDetail, MovieSummary, Trailer};

/// Shown in place of the record when the detail lookup fails
pub const DETAIL_FAILED: &str = "Failed to load details.";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailLoad {
    Loading,
    Loaded(MovieDetail),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrailerLoad {
    Pending,
    Found(Trailer),
    NotFound,
    /// Lookup failed; not surfaced to the user
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailActivation {
    pub activation: u64,
    /// The list entry that was selected
    pub movie: MovieSummary,
    pub detail: DetailLoad,
    pub trailer: TrailerLoad,
}

impl DetailActivation {
    pub fn loaded(&self) -> Option<&MovieDetail> {
        match &self.detail {
            DetailLoad::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn trailer(&self) -> Option<&Trailer> {
        match &self.trailer {
            TrailerLoad::Found(trailer) => Some(trailer),
            _ => None,
        }
    }

    pub fn tmdb_url(&self) -> String {
        format!("https://www.themoviedb.org/movie/{}", self.movie.id)
    }
}

/// Holds at most one open activation
#[derive(Debug, Default)]
pub struct DetailView {
    last_activation: u64,
    open: Option<DetailActivation>,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `movie`, replacing whatever was open; returns the activation id
    pub fn open(&mut self, movie: MovieSummary) -> u64 {
        self.last_activation += 1;
        tracing::debug!(movie_id = movie.id, activation = self.last_activation, "Detail opened");
        self.open = Some(DetailActivation {
            activation: self.last_activation,
            movie,
            detail: DetailLoad::Loading,
            trailer: TrailerLoad::Pending,
        });
        self.last_activation
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<&DetailActivation> {
        self.open.as_ref()
    }

    fn current_mut(&mut self, activation: u64) -> Option<&mut DetailActivation> {
        match self.open.as_mut() {
            Some(open) if open.activation == activation => Some(open),
            _ => {
                tracing::debug!(activation, "Discarding stale detail completion");
                None
            }
        }
    }

    pub fn apply_detail(&mut self, activation: u64, result: Result<MovieDetail, String>) -> bool {
        let Some(open) = self.current_mut(activation) else {
            return false;
        };
        open.detail = match result {
            Ok(detail) => DetailLoad::Loaded(detail),
            Err(reason) => {
                tracing::warn!(movie_id = open.movie.id, %reason, "Detail lookup failed");
                DetailLoad::Failed(DETAIL_FAILED.to_string())
            }
        };
        true
    }

    pub fn apply_trailers(&mut self, activation: u64, result: Result<Vec<Trailer>, String>) -> bool {
        let Some(open) = self.current_mut(activation) else {
            return false;
        };
        open.trailer = match result {
            Ok(videos) => match select_trailer(&videos) {
                Some(trailer) => TrailerLoad::Found(trailer.clone()),
                None => TrailerLoad::NotFound,
            },
            Err(reason) => {
                tracing::warn!(movie_id = open.movie.id, %reason, "Trailer lookup failed");
                TrailerLoad::Failed
            }
        };
        true
    }
}
