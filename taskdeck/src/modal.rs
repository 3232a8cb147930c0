//! Modal dialog state.
//!
//! One tagged enum replaces ad-hoc alert/prompt flags: at most one dialog
//! is up at a time, which kind is explicit, and a prompt's submit behavior
//! is a typed [`PromptAction`] rather than a stored callback. Opening a
//! dialog while another is showing replaces it.

/// What submitting a prompt's input should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    /// Share a task with the user id typed into the prompt.
    ShareTask {
        /// Backend id of the task being shared.
        task_id: String,
    },
}

/// The currently displayed dialog, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    /// No dialog; keys go to the main view.
    #[default]
    None,
    /// A message with a single dismiss button.
    Alert {
        /// Text shown in the dialog.
        message: String,
    },
    /// A message, a text input, and the action to run on submit.
    Prompt {
        /// Text shown above the input.
        message: String,
        /// Current contents of the input field.
        input: String,
        /// What submit does with the input.
        action: PromptAction,
    },
}

impl ModalState {
    /// Whether any dialog is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Shows an alert, replacing any dialog already up.
    pub fn open_alert(&mut self, message: impl Into<String>) {
        *self = Self::Alert {
            message: message.into(),
        };
    }

    /// Shows a prompt with an empty input, replacing any dialog already up.
    pub fn open_prompt(&mut self, message: impl Into<String>, action: PromptAction) {
        *self = Self::Prompt {
            message: message.into(),
            input: String::new(),
            action,
        };
    }

    /// Dismisses the dialog. For a prompt this cancels it: the typed input
    /// is discarded and no action runs.
    pub fn close(&mut self) {
        *self = Self::None;
    }

    /// Appends a character to the prompt input. No-op for other states.
    pub fn push_char(&mut self, c: char) {
        if let Self::Prompt { input, .. } = self {
            input.push(c);
        }
    }

    /// Removes the last character of the prompt input. No-op otherwise.
    pub fn backspace(&mut self) {
        if let Self::Prompt { input, .. } = self {
            input.pop();
        }
    }

    /// Confirms the dialog and closes it.
    ///
    /// For a prompt, returns the action and whatever was typed; deciding
    /// what to do with an empty input is the caller's business. For an
    /// alert this is just a dismiss.
    pub fn submit(&mut self) -> Option<(PromptAction, String)> {
        match std::mem::take(self) {
            Self::Prompt { input, action, .. } => Some((action, input)),
            Self::None | Self::Alert { .. } => None,
        }
    }
}
