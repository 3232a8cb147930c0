//! Theme and styling for the TUI.
//!
//! Two palettes, dark and light, resolved once per frame from the persisted
//! display preference. Status colors are fixed across both palettes.

use ratatui::style::{Color, Modifier, Style};

use taskdeck_api::task::TaskStatus;

/// Pending status color.
pub const STATUS_PENDING: Color = Color::Rgb(243, 156, 18);

/// In-progress status color.
pub const STATUS_IN_PROGRESS: Color = Color::Rgb(52, 152, 219);

/// Completed status color.
pub const STATUS_COMPLETED: Color = Color::Rgb(46, 204, 113);

/// Notification text color.
pub const NOTIFICATION: Color = Color::Rgb(26, 188, 156);

/// Error text color.
pub const ERROR: Color = Color::Rgb(231, 76, 60);

/// Color for a task status marker.
#[must_use]
pub const fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => STATUS_PENDING,
        TaskStatus::InProgress => STATUS_IN_PROGRESS,
        TaskStatus::Completed => STATUS_COMPLETED,
    }
}

/// Resolved color palette for one display mode.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Screen background.
    pub bg: Color,
    /// Primary text.
    pub fg: Color,
    /// Surface background (inputs, status bar).
    pub surface: Color,
    /// Focus and action color.
    pub accent: Color,
    /// Secondary text.
    pub muted: Color,
}

impl Theme {
    /// Dark palette (the default).
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            bg: Color::Rgb(31, 42, 56),
            fg: Color::Rgb(236, 240, 241),
            surface: Color::Rgb(52, 73, 94),
            accent: Color::Rgb(52, 152, 219),
            muted: Color::Rgb(189, 195, 199),
        }
    }

    /// Light palette.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            bg: Color::Rgb(244, 246, 248),
            fg: Color::Rgb(44, 62, 80),
            surface: Color::White,
            accent: Color::Rgb(41, 128, 185),
            muted: Color::Rgb(127, 140, 141),
        }
    }

    /// Palette for the persisted preference.
    #[must_use]
    pub const fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    /// Base style painting the whole screen.
    #[must_use]
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Normal text style.
    #[must_use]
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Dimmed text style (timestamps, hints, idle borders).
    #[must_use]
    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Bold text style.
    #[must_use]
    pub fn bold(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    /// Highlighted style (focused panel borders).
    #[must_use]
    pub fn highlighted(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Border style for a panel, focused or not.
    #[must_use]
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.highlighted()
        } else {
            self.dimmed()
        }
    }

    /// Selected list item style.
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Error text style.
    #[must_use]
    pub fn error(&self) -> Style {
        Style::default().fg(ERROR)
    }

    /// Status bar style.
    #[must_use]
    pub fn status_bar(&self) -> Style {
        Style::default().fg(self.fg).bg(self.surface)
    }
}
