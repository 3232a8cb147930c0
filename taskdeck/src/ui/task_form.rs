//! Task create/edit form.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::theme::{self, Theme};
use crate::app::{App, PanelFocus};

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let focused = app.focus == PanelFocus::Form;
    let title = if app.form.is_editing() { "Edit Task" } else { "New Task" };

    let cursor = if focused { "\u{2588}" } else { "" };
    let title_line = if app.form.title.is_empty() && !focused {
        Line::from(vec![
            Span::styled(" Title: ", theme.dimmed()),
            Span::styled("What needs doing?", theme.dimmed()),
        ])
    } else {
        Line::from(vec![
            Span::styled(" Title: ", theme.dimmed()),
            Span::styled(format!("{}{cursor}", app.form.title), theme.normal()),
        ])
    };

    let status_line = Line::from(vec![
        Span::styled(" Status: < ", theme.dimmed()),
        Span::styled(
            app.form.status.as_str(),
            Style::default().fg(theme::status_color(app.form.status)),
        ),
        Span::styled(" >", theme.dimmed()),
    ]);

    let feedback = match &app.form.error {
        Some(error) => Line::from(Span::styled(format!(" {error}"), theme.error())),
        None if app.form.is_editing() => {
            Line::from(Span::styled(" Enter: save changes | Esc: cancel edit", theme.dimmed()))
        }
        None => Line::default(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.border(focused));

    let lines = vec![title_line, status_line, feedback];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
