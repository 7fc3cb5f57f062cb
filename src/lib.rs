//! MovieTUI - terminal movie browser backed by TMDB
//!
//! # Modules
//!
//! - `models` - Movie summaries, pages, details, trailers
//! - `api` - TMDB client
//! - `storage` - Local key-value persistence
//! - `store` - Session, favorites, theme, catalog pagination
//! - `router` - Views and the authentication guard
//! - `detail` - Detail view activations
//! - `controller` - Async work dispatched from key handling
//! - `app` - Application state and key handling
//! - `ui` - TUI components
//! - `cli`, `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod detail;
pub mod logging;
pub mod models;
pub mod router;
pub mod storage;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use models::{
    DiscoverFilters, Genre, MovieDetail, MoviePage, MovieSummary, PartialResults, QueryMode,
    Trailer,
};

pub use api::{TmdbClient, TmdbError};
pub use app::App;
pub use controller::{Completion, Controller, Intent};
pub use router::Route;
pub use store::Stores;
