//! Login screen

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, LoginField};
use crate::ui::{centered_rect, Theme};

pub fn render_login(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let card = centered_rect(area, 44, 13);
    frame.render_widget(Clear, card);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_focused())
        .title(Span::styled(" MovieTUI ", theme.title()))
        .title_alignment(Alignment::Center)
        .style(theme.text());
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // username
            Constraint::Length(3), // password
            Constraint::Length(2), // message
            Constraint::Min(1),    // hints
        ])
        .split(inner);

    let form = &app.login;
    let masked = "•".repeat(form.password.value().chars().count());
    field(
        frame,
        rows[0],
        theme,
        "Username",
        form.username.value(),
        form.focus == LoginField::Username,
    );
    field(
        frame,
        rows[1],
        theme,
        "Password",
        &masked,
        form.focus == LoginField::Password,
    );

    if let Some(error) = app.stores.session.error() {
        let message = Paragraph::new(Span::styled(format!("✗ {}", error), theme.error()))
            .alignment(Alignment::Center);
        frame.render_widget(message, rows[2]);
    }

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Tab ", theme.keybind()),
        Span::styled("switch  ", theme.dimmed()),
        Span::styled("↵ ", theme.keybind()),
        Span::styled("login  ", theme.dimmed()),
        Span::styled("Esc ", theme.keybind()),
        Span::styled("quit", theme.dimmed()),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(hints, rows[3]);
}

fn field(frame: &mut Frame, area: Rect, theme: &Theme, label: &str, value: &str, focused: bool) {
    let border = if focused {
        theme.border_focused()
    } else {
        theme.border()
    };
    let text = if focused {
        format!("{}│", value)
    } else {
        value.to_string()
    };
    let input = Paragraph::new(text).style(theme.input()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Span::styled(format!(" {} ", label), theme.dimmed())),
    );
    frame.render_widget(input, area);
}
