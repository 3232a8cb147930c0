//! Task list panel with the completion gauge underneath.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph};

use taskdeck_api::task::{Task, TaskStatus};

use super::theme::{self, Theme};
use crate::app::{App, PanelFocus};

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let visible = app.visible();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    render_items(frame, rows[0], app, &visible, theme);
    render_progress(frame, rows[1], &visible, theme);
}

fn render_items(frame: &mut Frame, area: Rect, app: &App, visible: &[Task], theme: &Theme) {
    let focused = app.focus == PanelFocus::List;

    let block = Block::default()
        .title(format!("Tasks ({})", visible.len()))
        .borders(Borders::ALL)
        .border_style(theme.border(focused));

    if visible.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Nothing here. Add a task above or loosen the filter.",
            theme.dimmed(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(|task| task_item(task, theme)).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected.min(visible.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_item<'a>(task: &'a Task, theme: &Theme) -> ListItem<'a> {
    let status_style = Style::default().fg(theme::status_color(task.status));
    let mut spans = vec![
        Span::styled("\u{25cf} ", status_style),
        Span::styled(task.title.as_str(), theme.normal()),
        Span::raw(" "),
        Span::styled(format!("[{}]", task.status.as_str()), status_style),
    ];
    if !task.shared_with.is_empty() {
        spans.push(Span::styled(
            format!(" shared({})", task.shared_with.len()),
            theme.dimmed(),
        ));
    }
    ListItem::new(Line::from(spans))
}

#[allow(clippy::cast_precision_loss)]
fn render_progress(frame: &mut Frame, area: Rect, visible: &[Task], theme: &Theme) {
    let total = visible.len();
    let done = visible
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .count();
    let ratio = if total == 0 { 0.0 } else { done as f64 / total as f64 };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("Progress")
                .borders(Borders::ALL)
                .border_style(theme.dimmed()),
        )
        .gauge_style(Style::default().fg(theme::STATUS_COMPLETED).bg(theme.surface))
        .ratio(ratio)
        .label(format!("{done} of {total} completed"));

    frame.render_widget(gauge, area);
}
