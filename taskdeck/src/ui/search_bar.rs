//! Search input and the status filter indicator.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::theme::{self, Theme};
use crate::app::{App, PanelFocus};
use crate::tasks::StatusFilter;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(22)])
        .split(area);

    render_search(frame, columns[0], app, theme);
    render_filter(frame, columns[1], app, theme);
}

fn render_search(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let focused = app.focus == PanelFocus::Search;

    let line = if app.search.is_empty() && !focused {
        Line::from(Span::styled("Search tasks by title...", theme.dimmed()))
    } else {
        let cursor = if focused { "\u{2588}" } else { "" };
        Line::from(Span::styled(format!("{}{cursor}", app.search), theme.normal()))
    };

    let block = Block::default()
        .title("Search")
        .borders(Borders::ALL)
        .border_style(theme.border(focused));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_filter(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let label_style = match app.status_filter {
        StatusFilter::All => theme.normal(),
        StatusFilter::Only(status) => Style::default().fg(theme::status_color(status)),
    };

    let line = Line::from(vec![
        Span::styled("< ", theme.dimmed()),
        Span::styled(app.status_filter.label().to_string(), label_style),
        Span::styled(" >", theme.dimmed()),
    ]);

    let block = Block::default()
        .title("Filter")
        .borders(Borders::ALL)
        .border_style(theme.dimmed());

    frame.render_widget(Paragraph::new(line).block(block), area);
}
