//! Notification log panel, newest entry first.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::theme::{self, Theme};
use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default()
        .title(format!("Notifications ({})", app.notifications.len()))
        .borders(Borders::ALL)
        .border_style(theme.dimmed());

    if app.notifications.is_empty() {
        let hint = if app.push_connected {
            "No notifications yet."
        } else {
            "Push channel offline."
        };
        let empty = Paragraph::new(Line::from(Span::styled(hint, theme.dimmed()))).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .notifications
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(entry.received_at.clone(), theme.dimmed()),
                Span::raw(" "),
                Span::styled(
                    entry.message.clone(),
                    Style::default().fg(theme::NOTIFICATION),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
