//! Search bar and filter bar for the home view

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, InputField, InputMode, TextInput};
use crate::ui::Theme;

/// Search input; shows the last searched title when the box is empty
pub fn render_search_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let editing = app.input_mode == InputMode::Editing(InputField::Search);
    let input = &app.home.search;

    let line = if editing {
        with_cursor(input, theme)
    } else if input.is_empty() {
        match app.stores.recent.title() {
            Some(title) => Line::from(vec![
                Span::styled("⌕ / to search · ", theme.dimmed()),
                Span::styled("Tab ", theme.keybind()),
                Span::styled(format!("last searched: {}", title), theme.secondary()),
            ]),
            None => Line::from(Span::styled("⌕ Type / to search...", theme.dimmed())),
        }
    } else {
        Line::from(Span::raw(format!("⌕ {}", input.value())))
    };

    let border = if editing {
        theme.border_focused()
    } else {
        theme.border()
    };

    let search = Paragraph::new(line).style(theme.input()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Span::styled(" SEARCH ", theme.title())),
    );
    frame.render_widget(search, area);
}

/// One-line summary of the discover filters with their edit keys
pub fn render_filter_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let filters = app.stores.catalog.filters();

    let genre = filters
        .genre
        .map(|id| {
            app.home
                .genre_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string())
        })
        .unwrap_or_else(|| "All".to_string());

    let mut spans = vec![
        Span::styled(" g ", theme.keybind()),
        Span::styled("Genre: ", theme.dimmed()),
        Span::styled(genre, theme.secondary()),
        Span::raw("   "),
        Span::styled("y ", theme.keybind()),
        Span::styled("Year: ", theme.dimmed()),
    ];
    spans.extend(field_spans(app, theme, InputField::Year, &app.home.year, "Any"));
    spans.extend([
        Span::raw("   "),
        Span::styled("r ", theme.keybind()),
        Span::styled("Min rating: ", theme.dimmed()),
    ]);
    spans.extend(field_spans(app, theme, InputField::Rating, &app.home.rating, "Any"));
    if !filters.is_empty() {
        spans.extend([
            Span::raw("   "),
            Span::styled("x ", theme.keybind()),
            Span::styled("clear", theme.dimmed()),
        ]);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn field_spans(
    app: &App,
    theme: &Theme,
    field: InputField,
    input: &TextInput,
    placeholder: &str,
) -> Vec<Span<'static>> {
    if app.input_mode == InputMode::Editing(field) {
        with_cursor(input, theme).spans
    } else if input.is_empty() {
        vec![Span::styled(placeholder.to_string(), theme.dimmed())]
    } else {
        vec![Span::styled(input.value().to_string(), theme.secondary())]
    }
}

/// Render `input` with a bar at the cursor position
fn with_cursor(input: &TextInput, theme: &Theme) -> Line<'static> {
    let (before, after) = input.split_at_cursor();
    Line::from(vec![
        Span::styled(before.to_string(), theme.title()),
        Span::styled("│", theme.accent()),
        Span::styled(after.to_string(), theme.title()),
    ])
}
