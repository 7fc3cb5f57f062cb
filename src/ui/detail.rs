//! Movie detail modal
//!
//! Shows the list entry immediately, then the full record once it loads.
//! The trailer line only appears with a loaded record and a qualifying
//! trailer.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::detail::{DetailActivation, DetailLoad};
use crate::router::Route;
use crate::ui::{centered_rect, Theme};

pub fn render_detail(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    open: &DetailActivation,
    favorite: bool,
    route: Route,
) {
    let modal = centered_rect(area, 72, 20);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focused())
        .title(Span::styled(format!(" {} ", open.movie.title), theme.title()))
        .style(theme.text());

    let mut lines: Vec<Line> = Vec::new();
    match &open.detail {
        DetailLoad::Loading => {
            lines.push(Line::from(Span::styled("⟳ Loading details...", theme.loading())));
        }
        DetailLoad::Failed(msg) => {
            lines.push(Line::from(Span::styled(msg.clone(), theme.error())));
        }
        DetailLoad::Loaded(detail) => {
            let mut meta = vec![Span::styled(
                detail.release_date.clone().unwrap_or_else(|| "Unknown date".into()),
                theme.year(),
            )];
            if let Some(runtime) = detail.runtime {
                meta.push(Span::styled(
                    format!("  {}h {}m", runtime / 60, runtime % 60),
                    theme.dimmed(),
                ));
            }
            if let Some(rating) = detail.vote_average {
                meta.push(Span::styled(format!("  ★ {:.1}", rating), theme.rating(rating)));
            }
            lines.push(Line::from(meta));

            if !detail.genres.is_empty() {
                lines.push(Line::from(Span::styled(detail.genre_names(), theme.secondary())));
            }
            lines.push(Line::default());
            let overview = if detail.overview.is_empty() {
                "No overview available."
            } else {
                detail.overview.as_str()
            };
            lines.push(Line::from(Span::raw(overview.to_string())));

            if let Some(trailer) = open.trailer() {
                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::styled("▶ Trailer: ", theme.accent()),
                    Span::styled(trailer.youtube_url(), theme.link()),
                ]));
            }
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("TMDB: ", theme.dimmed()),
        Span::styled(open.tmdb_url(), theme.link()),
    ]));

    lines.push(Line::default());
    let favorite_hint = match (route, favorite) {
        (Route::Favorites, _) => "remove from favorites",
        (_, true) => "unfavorite",
        (_, false) => "favorite",
    };
    lines.push(Line::from(vec![
        Span::styled("f ", theme.keybind()),
        Span::styled(format!("{}  ", favorite_hint), theme.dimmed()),
        Span::styled("Esc ", theme.keybind()),
        Span::styled("close", theme.dimmed()),
    ]));

    let body = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, modal);
}
