//! Modal dialogs drawn over the rest of the UI.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::theme::Theme;
use crate::app::App;
use crate::modal::ModalState;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    match &app.modal {
        ModalState::None => {}
        ModalState::Alert { message } => {
            let lines = vec![
                Line::from(Span::styled(message.clone(), theme.normal())),
                Line::default(),
                Line::from(Span::styled("Enter or Esc: dismiss", theme.dimmed())),
            ];
            draw_dialog(frame, area, theme, "Notice", lines, 7);
        }
        ModalState::Prompt { message, input, .. } => {
            let lines = vec![
                Line::from(Span::styled(message.clone(), theme.normal())),
                Line::default(),
                Line::from(Span::styled(format!("> {input}\u{2588}"), theme.bold())),
                Line::default(),
                Line::from(Span::styled("Enter: confirm | Esc: cancel", theme.dimmed())),
            ];
            draw_dialog(frame, area, theme, "Input", lines, 9);
        }
    }
}

fn draw_dialog(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    title: &str,
    lines: Vec<Line<'static>>,
    height: u16,
) {
    let boxed = super::centered_rect(area, 52, height);
    frame.render_widget(Clear, boxed);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.highlighted())
        .style(theme.base());

    let dialog = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(dialog, boxed);
}
