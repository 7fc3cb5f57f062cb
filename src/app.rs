//! App state and core application logic
//!
//! Owns the route, per-view state and the [`Stores`]. Key handling mutates
//! state synchronously and queues [`Intent`]s for the controller; async
//! results come back through [`App::apply`].

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::{Completion, Intent};
use crate::detail::DetailView;
use crate::models::{DiscoverFilters, Genre, MovieSummary, QueryMode};
use crate::router::{guard, Route};
use crate::store::{FetchTicket, Stores};

/// Rows from the end of a listing at which the next page is requested
pub const SENTINEL_MARGIN: usize = 3;

pub const LOGIN_SUCCESS: &str = "Login successful!";

// =============================================================================
// Input Mode
// =============================================================================

/// Text field that currently receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Search,
    Year,
    Rating,
}

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode
    Editing(InputField),
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Whether the selection is close enough to the end to load more
    pub fn near_end(&self, margin: usize) -> bool {
        self.len > 0 && self.selected + margin + 1 >= self.len
    }

    /// Apply a movement key; returns false for keys that do not move
    fn handle_movement(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.up(),
            KeyCode::Down | KeyCode::Char('j') => self.down(),
            KeyCode::PageUp => self.page_up(10),
            KeyCode::PageDown => self.page_down(10),
            KeyCode::Home => self.first(),
            KeyCode::End => self.last(),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Text Input
// =============================================================================

/// Single-line text buffer; the cursor counts characters, not bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the contents and put the cursor at the end
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Text before and after the cursor
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_index())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key; returns false for keys that are not edits
    fn handle_edit(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor_home(),
            KeyCode::End => self.cursor_end(),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Login screen form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: TextInput,
    pub password: TextInput,
    pub focus: LoginField,
}

impl LoginForm {
    fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

/// Home view: discover listing or search results, plus the filter bar
#[derive(Debug, Clone)]
pub struct HomeView {
    /// `Discover` or `Search`
    pub mode: QueryMode,
    pub list: ListState,
    pub search: TextInput,
    pub year: TextInput,
    pub rating: TextInput,
    /// Genre taxonomy for the filter cycler
    pub genres: Vec<Genre>,
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            mode: QueryMode::Discover,
            list: ListState::default(),
            search: TextInput::default(),
            year: TextInput::default(),
            rating: TextInput::default(),
            genres: Vec::new(),
        }
    }
}

impl HomeView {
    pub fn genre_name(&self, id: u32) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }
}

/// Parse the year filter field; empty clears the filter
pub fn parse_year(input: &str) -> Result<Option<u16>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<u16>() {
        Ok(year) if year >= 1900 => Ok(Some(year)),
        _ => Err(format!("Invalid year: {}", input)),
    }
}

/// Parse the minimum rating field; empty clears the filter
pub fn parse_rating(input: &str) -> Result<Option<f32>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<f32>() {
        Ok(rating) if (0.0..=10.0).contains(&rating) => Ok(Some(rating)),
        _ => Err(format!("Invalid rating: {} (expected 0-10)", input)),
    }
}

// =============================================================================
// Main Application State
// =============================================================================

#[derive(Debug)]
pub struct App {
    pub route: Route,
    /// Navigation history for Esc
    pub history: Vec<Route>,
    pub running: bool,
    pub input_mode: InputMode,
    /// Error popup, cleared on the next key
    pub error: Option<String>,
    /// Status line message, cleared on the next key
    pub notice: Option<String>,

    pub stores: Stores,

    // View-specific states
    pub login: LoginForm,
    pub home: HomeView,
    pub trending: ListState,
    pub favorites: ListState,
    pub detail: DetailView,

    intents: VecDeque<Intent>,
}

impl App {
    pub fn new(stores: Stores) -> Self {
        Self {
            route: Route::Login,
            history: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            error: None,
            notice: None,
            stores,
            login: LoginForm::default(),
            home: HomeView::default(),
            trending: ListState::default(),
            favorites: ListState::default(),
            detail: DetailView::new(),
            intents: VecDeque::new(),
        }
    }

    /// Take all queued intents
    pub fn drain_intents(&mut self) -> Vec<Intent> {
        self.intents.drain(..).collect()
    }

    pub fn pending_intents(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter()
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Stop the app and abandon in-flight work
    pub fn shutdown(&mut self) {
        self.running = false;
        self.detail.close();
        self.stores.shutdown();
    }

    pub fn dark_mode(&self) -> bool {
        self.stores.theme.dark_mode()
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Navigate to `route`, subject to the login guard
    pub fn navigate(&mut self, route: Route) {
        let target = guard(route, self.stores.session.is_authenticated());
        if target == self.route {
            return;
        }
        self.leave();
        self.history.push(self.route);
        self.enter(target);
    }

    /// Return to the previous route
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                let target = guard(prev, self.stores.session.is_authenticated());
                self.leave();
                self.enter(target);
                true
            }
            None => false,
        }
    }

    fn enter(&mut self, route: Route) {
        tracing::debug!(route = %route, "Entering view");
        self.route = route;
        self.input_mode = InputMode::Normal;
        match route {
            Route::Login => {}
            Route::Home => self.mount_home(),
            Route::Trending => self.mount_listing(QueryMode::Trending),
            Route::Favorites => self.mount_favorites(),
        }
    }

    /// Tear down the current view: cancel its requests and close the detail
    fn leave(&mut self) {
        self.detail.close();
        self.input_mode = InputMode::Normal;
        match self.route {
            Route::Login => {}
            Route::Home => {
                self.stores.catalog.cancel(QueryMode::Discover);
                self.stores.catalog.cancel(QueryMode::Search);
            }
            Route::Trending => self.stores.catalog.cancel(QueryMode::Trending),
            Route::Favorites => self.stores.favorites.cancel(),
        }
    }

    fn mount_home(&mut self) {
        if self.home.genres.is_empty() {
            self.intents.push_back(Intent::LoadGenres);
        }
        self.mount_listing(self.home.mode);
    }

    fn mount_listing(&mut self, mode: QueryMode) {
        let cursor = self.stores.catalog.cursor(mode);
        if cursor.is_fresh() || cursor.status.is_error() {
            let ticket = self.stores.catalog.begin_fetch(mode, 1);
            self.request_page(ticket);
        }
        self.sync_lists();
    }

    fn mount_favorites(&mut self) {
        if !self.stores.favorites.is_empty() {
            let ticket = self.stores.favorites.begin_resolve();
            self.intents.push_back(Intent::ResolveFavorites(ticket));
        }
        self.sync_lists();
    }

    fn request_page(&mut self, ticket: Option<FetchTicket>) -> bool {
        match ticket {
            Some(ticket) => {
                let request = self.stores.catalog.request(ticket.mode);
                self.intents.push_back(Intent::FetchPage { ticket, request });
                true
            }
            None => false,
        }
    }

    fn sync_lists(&mut self) {
        let catalog = &self.stores.catalog;
        self.home.list.set_len(catalog.results(self.home.mode).len());
        self.trending.set_len(catalog.results(QueryMode::Trending).len());
        self.favorites.set_len(self.stores.favorites.resolved().len());
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    pub fn submit_login(&mut self) -> bool {
        let accepted = self
            .stores
            .session
            .login(self.login.username.value(), self.login.password.value());
        if accepted {
            self.login = LoginForm::default();
            self.navigate(Route::Home);
            self.history.clear();
            self.notice = Some(LOGIN_SUCCESS.to_string());
        }
        accepted
    }

    pub fn logout(&mut self) {
        self.leave();
        self.stores.session.logout();
        for mode in QueryMode::ALL {
            self.stores.catalog.reset(mode);
        }
        self.stores.favorites.cancel();
        self.home.mode = QueryMode::Discover;
        self.home.search = TextInput::default();
        self.home.list.reset();
        self.trending.reset();
        self.favorites.reset();
        self.sync_lists();
        self.history.clear();
        self.login = LoginForm::default();
        self.enter(Route::Login);
    }

    pub fn toggle_theme(&mut self) {
        self.stores.theme.toggle();
    }

    // -------------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------------

    /// Query mode shown by the current route, if it shows a listing
    pub fn listing_mode(&self) -> Option<QueryMode> {
        match self.route {
            Route::Home => Some(self.home.mode),
            Route::Trending => Some(QueryMode::Trending),
            _ => None,
        }
    }

    /// Currently highlighted movie in the active view
    pub fn selected_movie(&self) -> Option<MovieSummary> {
        match self.route {
            Route::Home => self
                .stores
                .catalog
                .results(self.home.mode)
                .get(self.home.list.selected)
                .cloned(),
            Route::Trending => self
                .stores
                .catalog
                .results(QueryMode::Trending)
                .get(self.trending.selected)
                .cloned(),
            Route::Favorites => self
                .stores
                .favorites
                .resolved()
                .get(self.favorites.selected)
                .map(|d| d.summary()),
            Route::Login => None,
        }
    }

    /// Submit the search box; a blank query shows discover results
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        let mode = self.stores.catalog.submit_query(self.home.search.value());
        self.home.mode = mode;
        self.home.list.reset();
        let ticket = self.stores.catalog.begin_fetch(mode, 1);
        self.request_page(ticket);
        self.sync_lists();
    }

    /// Fill the empty search box with the last searched title and search
    pub fn apply_suggestion(&mut self) -> bool {
        if !self.home.search.is_empty() {
            return false;
        }
        let Some(title) = self.stores.recent.title().map(str::to_string) else {
            return false;
        };
        self.home.search.set(title);
        self.submit_search();
        true
    }

    /// Explicit "load more" for the discover listing
    pub fn load_more(&mut self) -> bool {
        if self.home.mode != QueryMode::Discover {
            return false;
        }
        let ticket = self.stores.catalog.begin_next(QueryMode::Discover);
        self.request_page(ticket)
    }

    /// Request the next page when the selection reaches the end of an
    /// infinite-scroll listing
    fn check_sentinel(&mut self, mode: QueryMode) {
        if mode == QueryMode::Discover {
            return;
        }
        let list = match mode {
            QueryMode::Trending => &self.trending,
            _ => &self.home.list,
        };
        if !list.near_end(SENTINEL_MARGIN) {
            return;
        }
        let cursor = self.stores.catalog.cursor(mode);
        if cursor.status.is_error() || cursor.is_loading() || !cursor.has_more() {
            return;
        }
        let ticket = self.stores.catalog.begin_next(mode);
        self.request_page(ticket);
    }

    /// Re-issue the request that failed for `mode`
    pub fn retry(&mut self, mode: QueryMode) -> bool {
        let cursor = self.stores.catalog.cursor(mode);
        if !cursor.status.is_error() {
            return false;
        }
        let ticket = if cursor.is_fresh() {
            self.stores.catalog.begin_fetch(mode, 1)
        } else {
            self.stores.catalog.begin_next(mode)
        };
        self.request_page(ticket)
    }

    /// Replace the discover filters; a change shows the refreshed discover list
    pub fn apply_filters(&mut self, filters: DiscoverFilters) -> bool {
        if !self.stores.catalog.set_filters(filters) {
            return false;
        }
        self.home.mode = QueryMode::Discover;
        self.home.list.reset();
        let ticket = self.stores.catalog.begin_fetch(QueryMode::Discover, 1);
        self.request_page(ticket);
        self.sync_lists();
        true
    }

    /// Step through the genre taxonomy; wraps through "any genre"
    pub fn cycle_genre(&mut self, forward: bool) -> bool {
        let count = self.home.genres.len();
        if count == 0 {
            self.error = Some("Genres are not loaded yet".into());
            return false;
        }

        let mut filters = *self.stores.catalog.filters();
        let current = filters
            .genre
            .and_then(|id| self.home.genres.iter().position(|g| g.id == id));
        let next = match (current, forward) {
            (None, true) => Some(0),
            (Some(i), true) if i + 1 < count => Some(i + 1),
            (Some(_), true) => None,
            (None, false) => Some(count - 1),
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
        filters.genre = next.map(|i| self.home.genres[i].id);
        self.apply_filters(filters)
    }

    pub fn clear_filters(&mut self) -> bool {
        self.home.year.clear();
        self.home.rating.clear();
        self.apply_filters(DiscoverFilters::default())
    }

    fn commit_filter_field(&mut self, field: InputField) {
        let mut filters = *self.stores.catalog.filters();
        let parsed = match field {
            InputField::Year => parse_year(self.home.year.value()).map(|y| filters.year = y),
            InputField::Rating => {
                parse_rating(self.home.rating.value()).map(|r| filters.min_rating = r)
            }
            InputField::Search => return,
        };
        match parsed {
            Ok(()) => {
                self.input_mode = InputMode::Normal;
                self.apply_filters(filters);
            }
            Err(msg) => self.error = Some(msg),
        }
    }

    /// Put the filter field back to the active filter value
    fn revert_filter_field(&mut self, field: InputField) {
        let filters = *self.stores.catalog.filters();
        match field {
            InputField::Year => self
                .home
                .year
                .set(filters.year.map(|y| y.to_string()).unwrap_or_default()),
            InputField::Rating => self
                .home
                .rating
                .set(filters.min_rating.map(|r| r.to_string()).unwrap_or_default()),
            InputField::Search => {}
        }
    }

    // -------------------------------------------------------------------------
    // Favorites & detail
    // -------------------------------------------------------------------------

    pub fn toggle_favorite(&mut self, id: u64) -> bool {
        let now_favorite = self.stores.favorites.toggle(id);
        self.notice = Some(if now_favorite {
            "Added to favorites".to_string()
        } else {
            "Removed from favorites".to_string()
        });
        self.sync_lists();
        now_favorite
    }

    pub fn remove_favorite(&mut self, id: u64) -> bool {
        let removed = self.stores.favorites.remove(id);
        if removed {
            self.notice = Some("Removed from favorites".into());
        }
        self.sync_lists();
        removed
    }

    pub fn clear_favorites(&mut self) {
        self.stores.favorites.clear();
        self.notice = Some("Favorites cleared".into());
        self.sync_lists();
    }

    /// Open the detail view for `movie` and request its record and trailers
    pub fn open_detail(&mut self, movie: MovieSummary) {
        let movie_id = movie.id;
        let activation = self.detail.open(movie);
        self.intents.push_back(Intent::OpenDetail {
            activation,
            movie_id,
        });
    }

    // -------------------------------------------------------------------------
    // Async completions
    // -------------------------------------------------------------------------

    /// Apply a finished request; returns false when it was stale
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Genres(Ok(genres)) => {
                tracing::debug!(count = genres.len(), "Genres loaded");
                self.home.genres = genres;
                true
            }
            Completion::Genres(Err(reason)) => {
                tracing::warn!(%reason, "Failed to load genres");
                false
            }
            Completion::Page { ticket, result } => {
                let top_hit = match &result {
                    Ok(page) if ticket.mode == QueryMode::Search && ticket.page == 1 => {
                        page.results.first().cloned()
                    }
                    _ => None,
                };

                if !self.stores.catalog.complete(ticket, result) {
                    return false;
                }
                if let Some(movie) = top_hit {
                    self.stores.recent.record(&movie);
                }
                if ticket.page == 1 {
                    if ticket.mode == self.home.mode {
                        self.home.list.reset();
                    }
                    if ticket.mode == QueryMode::Trending {
                        self.trending.reset();
                    }
                }
                self.sync_lists();
                if self.listing_mode() == Some(ticket.mode) {
                    self.check_sentinel(ticket.mode);
                }
                true
            }
            Completion::Detail { activation, result } => {
                self.detail.apply_detail(activation, result)
            }
            Completion::Trailers { activation, result } => {
                self.detail.apply_trailers(activation, result)
            }
            Completion::Favorites { ticket, results } => {
                let applied = self.stores.favorites.complete_resolve(&ticket, results);
                self.sync_lists();
                applied
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.error = None;
        self.notice = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.route == Route::Login {
            return self.handle_login_key(key);
        }

        if let InputMode::Editing(field) = self.input_mode {
            return self.handle_editing_key(field, key);
        }

        if self.detail.is_open() {
            return self.handle_detail_key(key);
        }

        self.handle_normal_key(key)
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.quit();
                true
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.toggle_focus();
                true
            }
            KeyCode::Enter => {
                self.submit_login();
                true
            }
            code => self.login.focused_mut().handle_edit(code),
        }
    }

    fn handle_editing_key(&mut self, field: InputField, key: KeyEvent) -> bool {
        match (field, key.code) {
            (_, KeyCode::Esc) => {
                self.revert_filter_field(field);
                self.input_mode = InputMode::Normal;
                true
            }
            (InputField::Search, KeyCode::Enter) => {
                self.submit_search();
                true
            }
            (InputField::Search, KeyCode::Tab) => {
                if self.apply_suggestion() {
                    self.input_mode = InputMode::Normal;
                }
                true
            }
            (InputField::Search, code) => self.home.search.handle_edit(code),
            (_, KeyCode::Enter) => {
                self.commit_filter_field(field);
                true
            }
            (InputField::Year, KeyCode::Char(c)) if !c.is_ascii_digit() => false,
            (InputField::Year, code) => self.home.year.handle_edit(code),
            (InputField::Rating, KeyCode::Char(c)) if !(c.is_ascii_digit() || c == '.') => false,
            (InputField::Rating, code) => self.home.rating.handle_edit(code),
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
        let Some(movie_id) = self.detail.current().map(|open| open.movie.id) else {
            return false;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {
                self.detail.close();
                true
            }
            KeyCode::Char('f') | KeyCode::Char('d') | KeyCode::Delete
                if self.route == Route::Favorites =>
            {
                self.remove_favorite(movie_id);
                self.detail.close();
                true
            }
            KeyCode::Char('f') => {
                self.toggle_favorite(movie_id);
                true
            }
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            _ => false,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
                return true;
            }
            KeyCode::Char('L') => {
                self.logout();
                return true;
            }
            KeyCode::Char('1') => {
                self.navigate(Route::Home);
                return true;
            }
            KeyCode::Char('2') => {
                self.navigate(Route::Trending);
                return true;
            }
            KeyCode::Char('3') => {
                self.navigate(Route::Favorites);
                return true;
            }
            KeyCode::Esc => return self.back(),
            KeyCode::Enter => {
                if let Some(movie) = self.selected_movie() {
                    self.open_detail(movie);
                }
                return true;
            }
            _ => {}
        }

        match self.route {
            Route::Home => self.handle_home_key(key),
            Route::Trending => self.handle_trending_key(key),
            Route::Favorites => self.handle_favorites_key(key),
            Route::Login => false,
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> bool {
        if self.home.list.handle_movement(key.code) {
            self.check_sentinel(self.home.mode);
            return true;
        }

        match key.code {
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.input_mode = InputMode::Editing(InputField::Search);
                true
            }
            KeyCode::Tab => self.apply_suggestion(),
            KeyCode::Char('f') => match self.selected_movie() {
                Some(movie) => {
                    self.toggle_favorite(movie.id);
                    true
                }
                None => false,
            },
            KeyCode::Char('m') => self.load_more(),
            KeyCode::Char('g') => self.cycle_genre(true),
            KeyCode::Char('G') => self.cycle_genre(false),
            KeyCode::Char('y') => {
                self.input_mode = InputMode::Editing(InputField::Year);
                true
            }
            KeyCode::Char('r') => {
                self.input_mode = InputMode::Editing(InputField::Rating);
                true
            }
            KeyCode::Char('x') => self.clear_filters(),
            KeyCode::Char('R') => self.retry(self.home.mode),
            _ => false,
        }
    }

    fn handle_trending_key(&mut self, key: KeyEvent) -> bool {
        if self.trending.handle_movement(key.code) {
            self.check_sentinel(QueryMode::Trending);
            return true;
        }

        match key.code {
            KeyCode::Char('f') => match self.selected_movie() {
                Some(movie) => {
                    self.toggle_favorite(movie.id);
                    true
                }
                None => false,
            },
            KeyCode::Char('R') => self.retry(QueryMode::Trending),
            _ => false,
        }
    }

    fn handle_favorites_key(&mut self, key: KeyEvent) -> bool {
        if self.favorites.handle_movement(key.code) {
            return true;
        }

        match key.code {
            KeyCode::Char('d') | KeyCode::Delete => match self.selected_movie() {
                Some(movie) => self.remove_favorite(movie.id),
                None => false,
            },
            KeyCode::Char('C') => {
                self.clear_favorites();
                true
            }
            KeyCode::Char('R') => {
                self.mount_favorites();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MoviePage;
    use crate::storage::MemoryStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app() -> App {
        App::new(Stores::with_storage(MemoryStore::shared()))
    }

    fn logged_in() -> App {
        let mut app = app();
        app.login.username.set("admin");
        app.login.password.set("1234");
        assert!(app.submit_login());
        app
    }

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            release_date: Some("2020-01-01".into()),
            vote_average: Some(6.5),
        }
    }

    fn page(ids: std::ops::RangeInclusive<u64>, page: u32, total_pages: u32) -> MoviePage {
        MoviePage {
            results: ids.map(movie).collect(),
            page,
            total_pages,
        }
    }

    fn take_page_ticket(app: &mut App, mode: QueryMode) -> FetchTicket {
        app.drain_intents()
            .into_iter()
            .find_map(|intent| match intent {
                Intent::FetchPage { ticket, .. } if ticket.mode == mode => Some(ticket),
                _ => None,
            })
            .expect("page request queued")
    }

    // -------------------------------------------------------------------------
    // ListState / TextInput
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        list.up();
        assert_eq!(list.selected, 0);
        list.down();
        list.down();
        assert_eq!(list.selected, 2);
        list.last();
        assert_eq!(list.selected, 4);
        list.down();
        assert_eq!(list.selected, 4);
        list.page_up(10);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_list_state_set_len_clamps() {
        let mut list = ListState::new(10);
        list.last();
        list.set_len(3);
        assert_eq!(list.selected, 2);
        list.set_len(0);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_list_state_near_end() {
        let mut list = ListState::new(10);
        assert!(!list.near_end(SENTINEL_MARGIN));
        list.selected = 6;
        assert!(list.near_end(SENTINEL_MARGIN));
        assert!(!ListState::new(0).near_end(SENTINEL_MARGIN));
    }

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::default();
        for c in "héllo".chars() {
            input.insert(c);
        }
        assert_eq!(input.cursor(), 5);

        input.cursor_left();
        input.cursor_left();
        input.insert('X');
        assert_eq!(input.value(), "hélXlo");

        input.backspace();
        input.cursor_home();
        input.delete();
        assert_eq!(input.value(), "éllo");
        assert_eq!(input.split_at_cursor(), ("", "éllo"));

        input.cursor_end();
        assert_eq!(input.cursor(), 4);
        input.clear();
        assert!(input.is_empty());
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(parse_year(""), Ok(None));
        assert_eq!(parse_year("1999"), Ok(Some(1999)));
        assert!(parse_year("99").is_err());
        assert_eq!(parse_rating(" 7.5 "), Ok(Some(7.5)));
        assert!(parse_rating("11").is_err());
    }

    // -------------------------------------------------------------------------
    // Session & routing
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_via_keys() {
        let mut app = app();
        type_text(&mut app, "admin");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "1234");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.route, Route::Home);
        assert_eq!(app.notice.as_deref(), Some(LOGIN_SUCCESS));
        assert!(app.login.username.is_empty());

        let intents = app.drain_intents();
        assert!(intents.contains(&Intent::LoadGenres));
        assert!(intents
            .iter()
            .any(|i| matches!(i, Intent::FetchPage { ticket, .. } if ticket.mode == QueryMode::Discover && ticket.page == 1)));
    }

    #[test]
    fn test_login_rejected_stays_on_login() {
        let mut app = app();
        app.login.username.set("admin");
        app.login.password.set("wrong");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.route, Route::Login);
        assert_eq!(
            app.stores.session.error(),
            Some("Invalid username or password.")
        );
        assert_eq!(app.pending_intents().count(), 0);
    }

    #[test]
    fn test_q_is_typed_on_login() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.login.username.value(), "q");
    }

    #[test]
    fn test_guard_blocks_anonymous_navigation() {
        let mut app = app();
        app.navigate(Route::Favorites);
        assert_eq!(app.route, Route::Login);
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_logout_returns_to_login() {
        let mut app = logged_in();
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Char('L')));

        assert_eq!(app.route, Route::Login);
        assert!(!app.stores.session.is_authenticated());
        assert!(app.history.is_empty());

        app.navigate(Route::Home);
        assert_eq!(app.route, Route::Login);
    }

    #[test]
    fn test_login_after_logout_refetches_listing() {
        let mut app = logged_in();
        let first = take_page_ticket(&mut app, QueryMode::Discover);
        app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=20, 1, 3)),
        });
        assert_eq!(app.home.list.len, 20);

        app.logout();
        assert!(app.stores.catalog.results(QueryMode::Discover).is_empty());
        assert_eq!(app.home.list.len, 0);

        app.login.username.set("admin");
        app.login.password.set("1234");
        assert!(app.submit_login());
        let again = take_page_ticket(&mut app, QueryMode::Discover);
        assert_eq!(again.page, 1);

        // the previous session's request is stale
        assert!(!app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=20, 1, 3)),
        }));
    }

    #[test]
    fn test_view_switch_and_back() {
        let mut app = logged_in();
        app.drain_intents();

        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.route, Route::Trending);
        let ticket = take_page_ticket(&mut app, QueryMode::Trending);
        assert_eq!(ticket.page, 1);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.route, Route::Home);
        assert!(!app.stores.catalog.is_loading(QueryMode::Trending));

        // login is never in the history
        assert!(!app.back());
        assert_eq!(app.route, Route::Home);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = logged_in();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);

        let mut app = logged_in();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_theme_toggle_key() {
        let mut app = logged_in();
        assert!(app.dark_mode());
        app.handle_key(key(KeyCode::Char('t')));
        assert!(!app.dark_mode());
    }

    // -------------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------------

    #[test]
    fn test_discover_load_more_appends() {
        let mut app = logged_in();
        let first = take_page_ticket(&mut app, QueryMode::Discover);
        assert!(app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=20, 1, 3)),
        }));
        assert_eq!(app.home.list.len, 20);

        app.handle_key(key(KeyCode::Char('m')));
        let second = take_page_ticket(&mut app, QueryMode::Discover);
        assert_eq!(second.page, 2);

        // a second press while loading is ignored
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.pending_intents().count(), 0);

        app.apply(Completion::Page {
            ticket: second,
            result: Ok(page(21..=40, 2, 3)),
        });
        assert_eq!(app.stores.catalog.results(QueryMode::Discover).len(), 40);
        assert!(app.stores.catalog.has_more(QueryMode::Discover));
    }

    #[test]
    fn test_search_infinite_scroll_and_last_searched() {
        let mut app = logged_in();
        app.drain_intents();

        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "alien");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.home.mode, QueryMode::Search);
        assert_eq!(app.input_mode, InputMode::Normal);

        let first = take_page_ticket(&mut app, QueryMode::Search);
        app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=6, 1, 2)),
        });
        assert_eq!(app.stores.recent.title(), Some("Movie 1"));

        // moving near the end requests page 2 exactly once
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        let second = take_page_ticket(&mut app, QueryMode::Search);
        assert_eq!(second.page, 2);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.pending_intents().count(), 0);

        app.apply(Completion::Page {
            ticket: second,
            result: Ok(page(7..=12, 2, 2)),
        });
        assert_eq!(app.home.list.len, 12);
        assert_eq!(app.home.list.selected, 3);
        assert_eq!(app.stores.recent.title(), Some("Movie 1"));
    }

    #[test]
    fn test_short_page_requests_next_while_near_end() {
        let mut app = logged_in();
        app.drain_intents();
        app.handle_key(key(KeyCode::Char('2')));

        let first = take_page_ticket(&mut app, QueryMode::Trending);
        assert!(app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=2, 1, 3)),
        }));
        let second = take_page_ticket(&mut app, QueryMode::Trending);
        assert_eq!(second.page, 2);

        // a long enough page stops the chain
        app.apply(Completion::Page {
            ticket: second,
            result: Ok(page(3..=20, 2, 3)),
        });
        assert_eq!(app.pending_intents().count(), 0);
        assert_eq!(app.trending.len, 20);
    }

    #[test]
    fn test_blank_search_shows_discover() {
        let mut app = logged_in();
        app.drain_intents();
        app.handle_key(key(KeyCode::Char('/')));
        type_text(&mut app, "   ");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.home.mode, QueryMode::Discover);
        let ticket = take_page_ticket(&mut app, QueryMode::Discover);
        assert_eq!(ticket.page, 1);
    }

    #[test]
    fn test_suggestion_applies_last_search() {
        let storage = MemoryStore::shared();
        let mut app = App::new(Stores::with_storage(storage));
        app.stores.recent.record(&movie(9));
        app.login.username.set("admin");
        app.login.password.set("1234");
        app.submit_login();
        app.drain_intents();

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.home.search.value(), "Movie 9");
        assert_eq!(app.stores.catalog.query(), "Movie 9");
        take_page_ticket(&mut app, QueryMode::Search);
    }

    #[test]
    fn test_filter_change_resets_listing() {
        let mut app = logged_in();
        let first = take_page_ticket(&mut app, QueryMode::Discover);
        app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=5, 1, 3)),
        });

        app.handle_key(key(KeyCode::Char('y')));
        type_text(&mut app, "1999");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.stores.catalog.filters().year, Some(1999));
        assert!(app.stores.catalog.results(QueryMode::Discover).is_empty());
        let ticket = take_page_ticket(&mut app, QueryMode::Discover);
        assert_eq!(ticket.page, 1);

        // stale page from before the filter change is ignored
        assert!(!app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=5, 1, 3)),
        }));
    }

    #[test]
    fn test_invalid_filter_keeps_editing() {
        let mut app = logged_in();
        app.handle_key(key(KeyCode::Char('r')));
        type_text(&mut app, "12");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.error.is_some());
        assert_eq!(app.input_mode, InputMode::Editing(InputField::Rating));

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.home.rating.is_empty());
    }

    #[test]
    fn test_genre_cycle() {
        let mut app = logged_in();
        app.apply(Completion::Genres(Ok(vec![
            Genre { id: 28, name: "Action".into() },
            Genre { id: 35, name: "Comedy".into() },
        ])));

        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.stores.catalog.filters().genre, Some(28));
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.stores.catalog.filters().genre, Some(35));
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.stores.catalog.filters().genre, None);
        app.handle_key(key(KeyCode::Char('G')));
        assert_eq!(app.stores.catalog.filters().genre, Some(35));
    }

    #[test]
    fn test_retry_after_failure() {
        let mut app = logged_in();
        let first = take_page_ticket(&mut app, QueryMode::Discover);
        app.apply(Completion::Page {
            ticket: first,
            result: Err("Server error: 500".into()),
        });
        assert_eq!(
            app.stores.catalog.cursor(QueryMode::Discover).error(),
            Some("Failed to fetch movies.")
        );

        app.handle_key(key(KeyCode::Char('R')));
        let retry = take_page_ticket(&mut app, QueryMode::Discover);
        assert_eq!(retry.page, 1);
    }

    // -------------------------------------------------------------------------
    // Favorites & detail
    // -------------------------------------------------------------------------

    #[test]
    fn test_favorite_toggle_from_listing() {
        let mut app = logged_in();
        let first = take_page_ticket(&mut app, QueryMode::Discover);
        app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=3, 1, 1)),
        });

        app.handle_key(key(KeyCode::Char('f')));
        assert!(app.stores.favorites.contains(1));
        app.handle_key(key(KeyCode::Char('f')));
        assert!(!app.stores.favorites.contains(1));
    }

    #[test]
    fn test_open_detail_queues_activation() {
        let mut app = logged_in();
        let first = take_page_ticket(&mut app, QueryMode::Discover);
        app.apply(Completion::Page {
            ticket: first,
            result: Ok(page(1..=3, 1, 1)),
        });

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.detail.is_open());
        let intents = app.drain_intents();
        assert!(matches!(
            intents.as_slice(),
            [Intent::OpenDetail { movie_id: 2, .. }]
        ));

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.detail.is_open());
        assert_eq!(app.route, Route::Home);
    }

    #[test]
    fn test_navigation_closes_detail() {
        let mut app = logged_in();
        app.open_detail(movie(7));
        let activation = app.detail.current().map(|d| d.activation).unwrap();
        app.detail.close();
        app.navigate(Route::Trending);

        assert!(!app.detail.is_open());
        assert!(!app.apply(Completion::Detail {
            activation,
            result: Err("late".into()),
        }));
    }

    #[test]
    fn test_favorites_view_resolves_and_removes() {
        let mut app = logged_in();
        app.stores.favorites.add(1);
        app.stores.favorites.add(2);
        app.drain_intents();

        app.handle_key(key(KeyCode::Char('3')));
        let ticket = app
            .drain_intents()
            .into_iter()
            .find_map(|i| match i {
                Intent::ResolveFavorites(ticket) => Some(ticket),
                _ => None,
            })
            .expect("resolve queued");
        assert_eq!(ticket.ids, vec![1, 2]);

        let detail = |id: u64| crate::models::MovieDetail {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            release_date: None,
            vote_average: None,
            overview: String::new(),
            runtime: None,
            genres: vec![],
        };
        app.apply(Completion::Favorites {
            ticket,
            results: crate::models::PartialResults {
                succeeded: vec![detail(1), detail(2)],
                failed: vec![],
            },
        });
        assert_eq!(app.favorites.len, 2);

        // remove from inside the detail modal
        app.handle_key(key(KeyCode::Enter));
        assert!(app.detail.is_open());
        app.handle_key(key(KeyCode::Char('f')));
        assert!(!app.detail.is_open());
        assert_eq!(app.stores.favorites.ids(), &[2]);
        assert_eq!(app.favorites.len, 1);

        app.handle_key(key(KeyCode::Char('C')));
        assert!(app.stores.favorites.is_empty());
    }
}
