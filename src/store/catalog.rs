//! Catalog store
//!
//! Paginated result lists for the three query modes. Each mode owns a
//! [`PageCursor`]; every request started through [`CatalogStore::begin_fetch`]
//! receives the mode's next generation, and a completion is applied only if
//! its generation is still the latest one. That serializes page requests per
//! mode and drops completions from superseded or torn-down requests.

use super::LoadingState;
use crate::models::{DiscoverFilters, MoviePage, MovieSummary, QueryMode};

/// Inline message for a failed list fetch
pub const FETCH_FAILED: &str = "Failed to fetch movies.";

/// Identifies one issued page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub mode: QueryMode,
    pub page: u32,
    pub generation: u64,
}

/// What to ask the service for, captured when the request starts
#[derive(Debug, Clone, PartialEq)]
pub enum PageRequest {
    Discover(DiscoverFilters),
    Search(String),
    Trending,
}

/// Pagination state for one query mode
#[derive(Debug, Clone)]
pub struct PageCursor {
    pub current_page: u32,
    pub total_pages: u32,
    pub results: Vec<MovieSummary>,
    pub status: LoadingState,
    generation: u64,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            results: Vec::new(),
            status: LoadingState::Idle,
            generation: 0,
        }
    }
}

impl PageCursor {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Nothing fetched since the last reset
    pub fn is_fresh(&self) -> bool {
        self.total_pages == 0 && self.results.is_empty()
    }

    /// Page to request when loading more
    pub fn next_page(&self) -> u32 {
        if self.is_fresh() {
            1
        } else {
            self.current_page + 1
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn reset(&mut self) {
        self.results.clear();
        self.current_page = 1;
        self.total_pages = 0;
        self.status = LoadingState::Idle;
        self.generation += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    discover: PageCursor,
    search: PageCursor,
    trending: PageCursor,
    filters: DiscoverFilters,
    query: String,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self, mode: QueryMode) -> &PageCursor {
        match mode {
            QueryMode::Discover => &self.discover,
            QueryMode::Search => &self.search,
            QueryMode::Trending => &self.trending,
        }
    }

    fn cursor_mut(&mut self, mode: QueryMode) -> &mut PageCursor {
        match mode {
            QueryMode::Discover => &mut self.discover,
            QueryMode::Search => &mut self.search,
            QueryMode::Trending => &mut self.trending,
        }
    }

    pub fn results(&self, mode: QueryMode) -> &[MovieSummary] {
        &self.cursor(mode).results
    }

    pub fn has_more(&self, mode: QueryMode) -> bool {
        self.cursor(mode).has_more()
    }

    pub fn is_loading(&self, mode: QueryMode) -> bool {
        self.cursor(mode).is_loading()
    }

    pub fn next_page(&self, mode: QueryMode) -> u32 {
        self.cursor(mode).next_page()
    }

    pub fn filters(&self) -> &DiscoverFilters {
        &self.filters
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Request parameters for `mode` as of now
    pub fn request(&self, mode: QueryMode) -> PageRequest {
        match mode {
            QueryMode::Discover => PageRequest::Discover(self.filters),
            QueryMode::Search => PageRequest::Search(self.query.clone()),
            QueryMode::Trending => PageRequest::Trending,
        }
    }

    /// Start a request for `page` of `mode`.
    ///
    /// Page 1 always starts and supersedes anything in flight. Later pages
    /// are refused while the mode is loading or has no more pages.
    pub fn begin_fetch(&mut self, mode: QueryMode, page: u32) -> Option<FetchTicket> {
        if page == 0 {
            return None;
        }

        let cursor = self.cursor_mut(mode);
        if page > 1 && (cursor.is_loading() || !cursor.has_more()) {
            tracing::debug!(%mode, page, "Skipping page request");
            return None;
        }

        cursor.generation += 1;
        cursor.status = LoadingState::Loading(None);
        tracing::debug!(%mode, page, generation = cursor.generation, "Page request started");

        Some(FetchTicket {
            mode,
            page,
            generation: cursor.generation,
        })
    }

    /// Start a request for the next page of `mode`
    pub fn begin_next(&mut self, mode: QueryMode) -> Option<FetchTicket> {
        self.begin_fetch(mode, self.next_page(mode))
    }

    /// Apply a finished request. Returns false when the ticket was superseded.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<MoviePage, String>) -> bool {
        let cursor = self.cursor_mut(ticket.mode);
        if ticket.generation != cursor.generation {
            tracing::debug!(
                mode = %ticket.mode,
                page = ticket.page,
                generation = ticket.generation,
                latest = cursor.generation,
                "Discarding stale page completion"
            );
            return false;
        }

        match result {
            Ok(page) => {
                if ticket.page == 1 {
                    cursor.results = page.results;
                } else {
                    cursor.results.extend(page.results);
                }
                cursor.current_page = page.page;
                cursor.total_pages = page.total_pages;
                cursor.status = LoadingState::Idle;
            }
            Err(reason) => {
                tracing::warn!(mode = %ticket.mode, page = ticket.page, %reason, "Page request failed");
                cursor.status = LoadingState::Error(FETCH_FAILED.to_string());
            }
        }
        true
    }

    /// Replace the discover filters. A changed value resets the discover list.
    pub fn set_filters(&mut self, filters: DiscoverFilters) -> bool {
        if self.filters == filters {
            return false;
        }
        tracing::debug!(?filters, "Discover filters changed");
        self.filters = filters;
        self.discover.reset();
        true
    }

    /// Record a submitted search. Returns the mode that should now be listed:
    /// a blank query falls back to discover.
    pub fn submit_query(&mut self, query: &str) -> QueryMode {
        let query = query.trim();
        self.search.reset();
        if query.is_empty() {
            self.query.clear();
            QueryMode::Discover
        } else {
            self.query = query.to_string();
            QueryMode::Search
        }
    }

    /// Drop accumulated results for `mode`
    pub fn reset(&mut self, mode: QueryMode) {
        self.cursor_mut(mode).reset();
    }

    /// Abandon any request in flight for `mode`, keeping results
    pub fn cancel(&mut self, mode: QueryMode) {
        let cursor = self.cursor_mut(mode);
        cursor.generation += 1;
        if cursor.is_loading() {
            cursor.status = LoadingState::Idle;
        }
    }
}
