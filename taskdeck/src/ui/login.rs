//! Login and registration screen.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::theme::Theme;
use crate::app::{App, AuthField, AuthMode};

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let boxed = super::centered_rect(area, 46, 10);

    let (title, hint) = match app.login.mode {
        AuthMode::LogIn => ("Log In", "Enter: log in | Ctrl+R: register instead"),
        AuthMode::Register => ("Register", "Enter: register | Ctrl+R: log in instead"),
    };

    let mut lines = vec![
        Line::from(Span::styled("Task Manager App", theme.bold())),
        Line::default(),
        field_line(
            "Username",
            &app.login.username,
            app.login.field == AuthField::Username,
            false,
            theme,
        ),
        field_line(
            "Password",
            &app.login.password,
            app.login.field == AuthField::Password,
            true,
            theme,
        ),
        Line::default(),
    ];

    if let Some(error) = &app.login.error {
        lines.push(Line::from(Span::styled(error.clone(), theme.error())));
    } else if app.login.busy {
        lines.push(Line::from(Span::styled("Contacting server...", theme.dimmed())));
    } else {
        lines.push(Line::from(Span::styled(hint, theme.dimmed())));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.highlighted());

    frame.render_widget(Paragraph::new(lines).block(block), boxed);
}

fn field_line(
    label: &str,
    value: &str,
    focused: bool,
    mask: bool,
    theme: &Theme,
) -> Line<'static> {
    let shown = if mask {
        "\u{2022}".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "\u{2588}" } else { "" };
    let value_style = if focused {
        theme.normal().add_modifier(Modifier::BOLD)
    } else {
        theme.normal()
    };
    Line::from(vec![
        Span::styled(format!(" {label}: "), theme.dimmed()),
        Span::styled(format!("{shown}{cursor}"), value_style),
    ])
}
