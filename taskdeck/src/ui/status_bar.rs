//! Bottom status bar: key hints and the push channel indicator.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::theme::{self, Theme};
use crate::app::{App, PanelFocus, Screen};

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let hints = help_text(app);

    let (dot, dot_style) = if app.push_connected {
        ("\u{25cf}", Style::default().fg(theme::NOTIFICATION).bg(theme.surface))
    } else {
        ("\u{25cb}", theme.status_bar())
    };

    let line = Line::from(vec![
        Span::styled(" TaskDeck ", theme.status_bar()),
        Span::styled(dot, dot_style),
        Span::styled(" push ", theme.status_bar()),
        Span::styled("| ", theme.status_bar()),
        Span::styled(hints, theme.status_bar()),
    ]);

    frame.render_widget(Paragraph::new(line).style(theme.status_bar()), area);
}

fn help_text(app: &App) -> &'static str {
    if app.modal.is_open() {
        return "Enter: confirm | Esc: dismiss";
    }
    match app.screen {
        Screen::Login => "Tab: next field | Enter: submit | Ctrl+R: switch mode | Esc: quit",
        Screen::Tasks if app.show_analytics => {
            "Esc: back to tasks | Ctrl+T: theme | Ctrl+L: log out"
        }
        Screen::Tasks => match app.focus {
            PanelFocus::Search => {
                "Type to search | Ctrl+F: filter | Tab: next panel | Ctrl+A: analytics"
            }
            PanelFocus::Form => {
                "Enter: save | arrows: status | Tab: next panel | Ctrl+R: refresh"
            }
            PanelFocus::List => {
                "j/k: move | Space: status | e: edit | d: delete | s: share | Ctrl+L: log out"
            }
        },
    }
}
