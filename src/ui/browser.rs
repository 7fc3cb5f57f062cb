//! Movie list view
//!
//! Renders one accumulated listing with a favorite marker per row and a
//! footer line for loading, errors and pagination hints.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, ListState as WidgetListState, Paragraph},
};

use crate::app::ListState;
use crate::models::MovieSummary;
use crate::store::{FavoritesStore, LoadingState};
use crate::ui::Theme;

/// Pagination affordance shown under a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pager {
    /// Explicit "load more" key
    Button,
    /// Next page loads when the selection nears the end
    Scroll,
    None,
}

/// Everything needed to draw one listing
pub struct Listing<'a> {
    pub title: String,
    pub movies: &'a [MovieSummary],
    pub list: &'a ListState,
    pub status: &'a LoadingState,
    pub has_more: bool,
    pub pager: Pager,
    pub empty_text: &'a str,
}

pub fn render_listing(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    favorites: &FavoritesStore,
    listing: &Listing<'_>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focused())
        .title(Span::styled(
            format!(" {} ({}) ", listing.title, listing.movies.len()),
            theme.title(),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if listing.movies.is_empty() {
        let text = if listing.status.is_loading() {
            Span::styled("⟳ Loading movies...", theme.loading())
        } else if let LoadingState::Error(msg) = listing.status {
            Span::styled(msg.clone(), theme.error())
        } else {
            Span::styled(listing.empty_text.to_string(), theme.dimmed())
        };
        let empty = Paragraph::new(Line::from(text)).alignment(Alignment::Center);
        frame.render_widget(empty, chunks[0]);
        return;
    }

    let items: Vec<ListItem> = listing
        .movies
        .iter()
        .map(|movie| movie_row(theme, movie, favorites.contains(movie.id)))
        .collect();

    let list = List::new(items)
        .style(theme.text())
        .highlight_style(theme.list_item_selected())
        .highlight_symbol("▸ ");
    let mut state = WidgetListState::default().with_selected(Some(listing.list.selected));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    frame.render_widget(footer(theme, listing), chunks[1]);
}

/// Format: ♥ Title (Year)   ★ 7.8
fn movie_row(theme: &Theme, movie: &MovieSummary, favorite: bool) -> ListItem<'static> {
    let marker = if favorite {
        Span::styled("♥ ", theme.favorite())
    } else {
        Span::raw("  ")
    };

    let mut spans = vec![marker, Span::raw(movie.title.clone())];
    if let Some(year) = movie.year() {
        spans.push(Span::styled(format!(" ({})", year), theme.year()));
    }
    if let Some(rating) = movie.vote_average {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("★ {:.1}", rating), theme.rating(rating)));
    }

    ListItem::new(Line::from(spans))
}

fn footer<'a>(theme: &Theme, listing: &Listing<'_>) -> Paragraph<'a> {
    let line = match listing.status {
        LoadingState::Loading(_) => Line::from(Span::styled("⟳ Loading more...", theme.loading())),
        LoadingState::Error(msg) => Line::from(vec![
            Span::styled(msg.clone(), theme.error()),
            Span::styled("  R ", theme.keybind()),
            Span::styled("retry", theme.dimmed()),
        ]),
        LoadingState::Idle if listing.has_more => match listing.pager {
            Pager::Button => Line::from(vec![
                Span::styled("[ m ] ", theme.keybind()),
                Span::styled("Load More", theme.accent()),
            ]),
            Pager::Scroll => Line::from(Span::styled("↓ more below", theme.dimmed())),
            Pager::None => Line::default(),
        },
        LoadingState::Idle => Line::default(),
    };
    Paragraph::new(line).alignment(Alignment::Center)
}
