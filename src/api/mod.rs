//! API clients for external services
//!
//! - TMDB: movie metadata, search, trending and trailers

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};
