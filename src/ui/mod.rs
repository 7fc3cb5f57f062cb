//! Terminal UI components
//!
//! Everything renders from `&App`; the palette follows the persisted
//! theme flag.

pub mod browser;
pub mod detail;
pub mod login;
pub mod search;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{MovieSummary, QueryMode};
use crate::router::Route;
use browser::{render_listing, Listing, Pager};

/// Main render function - dispatches to view-specific renderers
pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::from_dark_mode(app.dark_mode());
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(theme.base()), area);

    if app.route == Route::Login {
        login::render_login(frame, area, app, &theme);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app, &theme);
    match app.route {
        Route::Home => render_home(frame, chunks[1], app, &theme),
        Route::Trending => render_trending(frame, chunks[1], app, &theme),
        Route::Favorites => render_favorites(frame, chunks[1], app, &theme),
        Route::Login => {}
    }
    render_status_bar(frame, chunks[2], app, &theme);

    if let Some(open) = app.detail.current() {
        let favorite = app.stores.favorites.contains(open.movie.id);
        detail::render_detail(frame, area, &theme, open, favorite, app.route);
    }

    if let Some(error) = &app.error {
        render_error_popup(frame, area, &theme, error);
    }
}

/// Rect of at most `width` x `height` centered in `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Logo, route tabs and the signed-in user
fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = vec![
        Span::styled("MOVIE", theme.title()),
        Span::styled("TUI", theme.secondary().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
    ];
    for (i, route) in Route::PROTECTED.iter().enumerate() {
        let style = if *route == app.route {
            theme.list_item_selected()
        } else {
            theme.dimmed()
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, route.title()), style));
        spans.push(Span::raw(" "));
    }
    if let Some(user) = app.stores.session.user() {
        spans.push(Span::styled(format!("  ● {}", user.username), theme.success()));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border()),
    );
    frame.render_widget(header, area);
}

fn render_home(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Length(1), // Filters
            Constraint::Min(1),    // Results
        ])
        .split(area);

    search::render_search_bar(frame, chunks[0], app, theme);
    search::render_filter_bar(frame, chunks[1], app, theme);

    let mode = app.home.mode;
    let cursor = app.stores.catalog.cursor(mode);
    let (title, pager) = match mode {
        QueryMode::Search => (
            format!("RESULTS FOR \"{}\"", app.stores.catalog.query()),
            Pager::Scroll,
        ),
        _ => ("DISCOVER".to_string(), Pager::Button),
    };
    let listing = Listing {
        title,
        movies: &cursor.results,
        list: &app.home.list,
        status: &cursor.status,
        has_more: cursor.has_more(),
        pager,
        empty_text: "No movies found.",
    };
    render_listing(frame, chunks[2], theme, &app.stores.favorites, &listing);
}

fn render_trending(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let cursor = app.stores.catalog.cursor(QueryMode::Trending);
    let listing = Listing {
        title: "⚡ TRENDING THIS WEEK".to_string(),
        movies: &cursor.results,
        list: &app.trending,
        status: &cursor.status,
        has_more: cursor.has_more(),
        pager: Pager::Scroll,
        empty_text: "Nothing trending right now.",
    };
    render_listing(frame, area, theme, &app.stores.favorites, &listing);
}

fn render_favorites(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let favorites = &app.stores.favorites;
    let failed = favorites.failed().len();

    let (list_area, degraded_area) = if failed > 0 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);
        (chunks[1], Some(chunks[0]))
    } else {
        (area, None)
    };

    if let Some(line_area) = degraded_area {
        let noun = if failed == 1 { "favorite" } else { "favorites" };
        let line = Paragraph::new(Span::styled(
            format!("⚠ {} {} could not be loaded", failed, noun),
            theme.warning(),
        ));
        frame.render_widget(line, line_area);
    }

    let movies: Vec<MovieSummary> = favorites.resolved().iter().map(|d| d.summary()).collect();
    let listing = Listing {
        title: "♥ FAVORITES".to_string(),
        movies: &movies,
        list: &app.favorites,
        status: favorites.status(),
        has_more: false,
        pager: Pager::None,
        empty_text: "No favorites yet.",
    };
    render_listing(frame, list_area, theme, favorites, &listing);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let line = if let Some(notice) = &app.notice {
        Line::from(Span::styled(format!(" ✓ {}", notice), theme.success()))
    } else {
        let hints: &[(&str, &str)] = match app.route {
            Route::Home => &[
                ("/", "search"),
                ("↵", "details"),
                ("f", "favorite"),
                ("m", "more"),
                ("t", "theme"),
                ("L", "logout"),
                ("q", "quit"),
            ],
            Route::Trending => &[
                ("↵", "details"),
                ("f", "favorite"),
                ("t", "theme"),
                ("L", "logout"),
                ("q", "quit"),
            ],
            Route::Favorites => &[
                ("↵", "details"),
                ("d", "remove"),
                ("C", "clear all"),
                ("t", "theme"),
                ("L", "logout"),
                ("q", "quit"),
            ],
            Route::Login => &[],
        };
        let mut spans = vec![Span::raw(" ")];
        for (key, desc) in hints {
            spans.push(Span::styled(format!("{} ", key), theme.keybind()));
            spans.push(Span::styled(format!("{}  ", desc), theme.dimmed()));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).style(theme.status_bar()), area);
}

fn render_error_popup(frame: &mut Frame, area: Rect, theme: &Theme, error: &str) {
    let popup = centered_rect(area, 50, 5);
    frame.render_widget(Clear, popup);
    let body = Paragraph::new(Span::styled(error.to_string(), theme.error()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme.error())
                .title(Span::styled(" ERROR ", theme.error()))
                .style(theme.text()),
        );
    frame.render_widget(body, popup);
}
