//! Analytics view: one completion gauge per status.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use taskdeck_api::task::TaskStatus;

use super::theme::{self, Theme};
use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let counts = app.status_counts();
    let total: usize = counts.iter().map(|(_, count)| count).sum();

    let block = Block::default()
        .title("Analytics")
        .borders(Borders::ALL)
        .border_style(theme.highlighted());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        format!("{total} tasks in view"),
        theme.bold(),
    )));
    frame.render_widget(header, rows[0]);

    for (row, (status, count)) in rows.iter().skip(1).zip(counts) {
        render_status_gauge(frame, *row, status, count, total, theme);
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_status_gauge(
    frame: &mut Frame,
    area: Rect,
    status: TaskStatus,
    count: usize,
    total: usize,
    theme: &Theme,
) {
    let ratio = if total == 0 { 0.0 } else { count as f64 / total as f64 };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(status.as_str())
                .borders(Borders::ALL)
                .border_style(theme.dimmed()),
        )
        .gauge_style(Style::default().fg(theme::status_color(status)).bg(theme.surface))
        .ratio(ratio)
        .label(format!("{count} of {total}"));

    frame.render_widget(gauge, area);
}
