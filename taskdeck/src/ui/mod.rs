//! Terminal UI rendering.
//!
//! One function per panel, each taking the frame, the area to draw into, the
//! immutable [`App`] state and the resolved [`Theme`]. Nothing in here mutates
//! state; key handling lives in [`crate::app`].

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Block;

use crate::app::{App, Screen};

pub mod analytics;
pub mod login;
pub mod modal;
pub mod notifications;
pub mod search_bar;
pub mod status_bar;
pub mod task_form;
pub mod task_list;
pub mod theme;

use theme::Theme;

/// Renders the whole UI for the current frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.appearance.dark());
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    match app.screen {
        Screen::Login => login::render(frame, chunks[0], app, &theme),
        Screen::Tasks if app.show_analytics => analytics::render(frame, chunks[0], app, &theme),
        Screen::Tasks => draw_board(frame, chunks[0], app, &theme),
    }

    status_bar::render(frame, chunks[1], app, &theme);

    // Dialogs paint over everything else.
    modal::render(frame, frame.area(), app, &theme);
}

/// Lays out the task board: search row, task form, then the task list next to
/// the notification log.
fn draw_board(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .split(area);

    search_bar::render(frame, rows[0], app, theme);
    task_form::render(frame, rows[1], app, theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(rows[2]);

    task_list::render(frame, columns[0], app, theme);
    notifications::render(frame, columns[1], app, theme);
}

/// A rectangle of at most `width` x `height` centered inside `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
