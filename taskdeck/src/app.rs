//! Application state and event handling.
//!
//! [`App`] owns everything the UI renders: the current screen, the task
//! list, filters, forms, the modal, and the notification log. Key handling
//! returns a [`NetCommand`] when the action needs the backend; network
//! results come back through [`App::apply_net_event`]. The task list itself
//! is only ever replaced by a snapshot from the synchronizer, never patched
//! locally.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use taskdeck_api::push::Notification;
use taskdeck_api::task::{Task, TaskDraft, TaskStatus};

use crate::appearance::Appearance;
use crate::modal::{ModalState, PromptAction};
use crate::net::{NetCommand, NetEvent};
use crate::tasks::{StatusFilter, project};

/// Which top-level screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Credential entry; no session is active.
    Login,
    /// The task board; a session is active.
    Tasks,
}

/// Which panel of the task board is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// The search input (default).
    Search,
    /// The create/edit form.
    Form,
    /// The task list.
    List,
}

/// Which login field is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    /// Account name input.
    Username,
    /// Password input.
    Password,
}

/// Whether submitting the login form logs in or registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Authenticate an existing account.
    LogIn,
    /// Create a new account.
    Register,
}

/// State of the credential screen.
#[derive(Debug)]
pub struct LoginForm {
    /// Account name input.
    pub username: String,
    /// Password input.
    pub password: String,
    /// Focused field.
    pub field: AuthField,
    /// Submit action.
    pub mode: AuthMode,
    /// Last failure message, shown under the fields.
    pub error: Option<String>,
    /// A submit is in flight; further submits are ignored.
    pub busy: bool,
}

impl LoginForm {
    fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            field: AuthField::Username,
            mode: AuthMode::LogIn,
            error: None,
            busy: false,
        }
    }

    const fn toggle_field(&mut self) {
        self.field = match self.field {
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Username,
        };
    }

    fn focused_input(&mut self) -> &mut String {
        match self.field {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
        }
    }
}

/// State of the create/edit form.
#[derive(Debug)]
pub struct TaskForm {
    /// Title input.
    pub title: String,
    /// Status the task will be stored with.
    pub status: TaskStatus,
    /// When set, submitting replaces this task instead of creating one.
    pub editing: Option<Task>,
    /// Last rejection message, shown under the form.
    pub error: Option<String>,
}

impl TaskForm {
    fn new() -> Self {
        Self {
            title: String::new(),
            status: TaskStatus::Pending,
            editing: None,
            error: None,
        }
    }

    /// Whether the form is replacing an existing task.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Prefills the form from an existing task.
    fn load(&mut self, task: Task) {
        self.title = task.title.clone();
        self.status = task.status;
        self.editing = Some(task);
        self.error = None;
    }

    /// Back to an empty create form.
    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// One received notification, newest first in [`App::notifications`].
#[derive(Debug, Clone)]
pub struct NotificationEntry {
    /// Local arrival time, already formatted for display.
    pub received_at: String,
    /// Notification text from the backend.
    pub message: String,
}

/// Main application state.
pub struct App {
    /// Current screen.
    pub screen: Screen,
    /// Credential screen state.
    pub login: LoginForm,
    /// The merged owned-plus-shared task set, as last confirmed by the
    /// backend. Filtering never mutates this.
    pub tasks: Vec<Task>,
    /// Case-insensitive title search text.
    pub search: String,
    /// Status selector applied on top of the search.
    pub status_filter: StatusFilter,
    /// Create/edit form state.
    pub form: TaskForm,
    /// Focused panel on the task board.
    pub focus: PanelFocus,
    /// Selection index into the visible (filtered) list.
    pub selected: usize,
    /// Whether the analytics view covers the task board.
    pub show_analytics: bool,
    /// Received notifications, most recent first. Client-local; lost on exit.
    pub notifications: Vec<NotificationEntry>,
    /// Alert/prompt dialog state.
    pub modal: ModalState,
    /// Display preference.
    pub appearance: Appearance,
    /// Whether the push channel is delivering notifications.
    pub push_connected: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Format for notification arrival times.
    pub timestamp_format: String,
}

impl App {
    /// Creates the app on the login screen.
    #[must_use]
    pub fn new(appearance: Appearance) -> Self {
        Self {
            screen: Screen::Login,
            login: LoginForm::new(),
            tasks: Vec::new(),
            search: String::new(),
            status_filter: StatusFilter::All,
            form: TaskForm::new(),
            focus: PanelFocus::Search,
            selected: 0,
            show_analytics: false,
            notifications: Vec::new(),
            modal: ModalState::None,
            appearance,
            push_connected: false,
            should_quit: false,
            timestamp_format: "%H:%M".to_string(),
        }
    }

    /// Sets the strftime format used for notification arrival times.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: &str) -> Self {
        self.timestamp_format = format.to_string();
        self
    }

    /// The task list after applying search and status filter.
    ///
    /// Recomputed on demand from the unfiltered set.
    #[must_use]
    pub fn visible(&self) -> Vec<Task> {
        project(&self.tasks, &self.search, self.status_filter)
    }

    /// The currently selected visible task, if any.
    #[must_use]
    pub fn selected_task(&self) -> Option<Task> {
        self.visible().into_iter().nth(self.selected)
    }

    /// Tasks per status over the whole (unfiltered) set, for analytics.
    #[must_use]
    pub fn status_counts(&self) -> [(TaskStatus, usize); 3] {
        TaskStatus::ALL.map(|s| (s, self.tasks.iter().filter(|t| t.status == s).count()))
    }

    // --- key handling ---

    /// Handles a key press. Returns a command when the action needs the
    /// backend; all purely local effects are applied directly.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<NetCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            self.should_quit = true;
            return None;
        }
        if self.modal.is_open() {
            return self.handle_modal_key(key);
        }
        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Tasks if self.show_analytics => self.handle_analytics_key(key),
            Screen::Tasks => self.handle_tasks_key(key),
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match key.code {
            KeyCode::Esc => {
                self.modal.close();
                None
            }
            // submit() dismisses the dialog either way; an alert yields no
            // action to run.
            KeyCode::Enter => match self.modal.submit() {
                Some((action, input)) => Self::run_prompt_action(action, &input),
                None => None,
            },
            KeyCode::Backspace => {
                self.modal.backspace();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.modal.push_char(c);
                None
            }
            _ => None,
        }
    }

    /// Dispatches a confirmed prompt. An empty input is a no-op: the dialog
    /// closes and no request is sent.
    fn run_prompt_action(action: PromptAction, input: &str) -> Option<NetCommand> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        match action {
            PromptAction::ShareTask { task_id } => Some(NetCommand::Share {
                task_id,
                user_id: input.to_string(),
            }),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.should_quit = true;
                None
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.login.toggle_field();
                None
            }
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
                self.login.mode = match self.login.mode {
                    AuthMode::LogIn => AuthMode::Register,
                    AuthMode::Register => AuthMode::LogIn,
                };
                self.login.error = None;
                None
            }
            (KeyCode::Enter, _) => self.submit_login(),
            (KeyCode::Backspace, _) => {
                self.login.focused_input().pop();
                None
            }
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                self.login.focused_input().push(c);
                self.login.error = None;
                None
            }
            _ => None,
        }
    }

    fn submit_login(&mut self) -> Option<NetCommand> {
        if self.login.busy {
            return None;
        }
        if self.login.username.is_empty() || self.login.password.is_empty() {
            self.login.error = Some("Username and password are required".to_string());
            return None;
        }
        self.login.busy = true;
        let username = self.login.username.clone();
        let password = self.login.password.clone();
        Some(match self.login.mode {
            AuthMode::LogIn => NetCommand::LogIn { username, password },
            AuthMode::Register => NetCommand::Register { username, password },
        })
    }

    fn handle_tasks_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                if self.form.is_editing() {
                    self.form.reset();
                } else {
                    self.should_quit = true;
                }
                None
            }
            (KeyCode::Tab, KeyModifiers::SHIFT) | (KeyCode::BackTab, _) => {
                self.cycle_focus_backward();
                None
            }
            (KeyCode::Tab, _) => {
                self.cycle_focus_forward();
                None
            }
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                self.appearance.toggle();
                None
            }
            (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.show_analytics = true;
                None
            }
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
                self.log_out_locally();
                Some(NetCommand::LogOut)
            }
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => Some(NetCommand::Refresh),
            (KeyCode::Char('f'), KeyModifiers::CONTROL) => {
                self.status_filter = self.status_filter.next();
                self.clamp_selection();
                None
            }
            _ => match self.focus {
                PanelFocus::Search => self.handle_search_key(key),
                PanelFocus::Form => self.handle_form_key(key),
                PanelFocus::List => self.handle_list_key(key),
            },
        }
    }

    /// Leaving the analytics view re-fetches, so the board comes back
    /// current. Entering it does not.
    fn handle_analytics_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.show_analytics = false;
                Some(NetCommand::Refresh)
            }
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                self.appearance.toggle();
                None
            }
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
                self.log_out_locally();
                Some(NetCommand::LogOut)
            }
            _ => None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match key.code {
            KeyCode::Backspace => {
                self.search.pop();
                self.clamp_selection();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.push(c);
                self.clamp_selection();
            }
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match key.code {
            KeyCode::Enter => return self.submit_form(),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.form.status = self.form.status.next();
            }
            KeyCode::Backspace => {
                self.form.title.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.title.push(c);
                self.form.error = None;
            }
            _ => {}
        }
        None
    }

    fn submit_form(&mut self) -> Option<NetCommand> {
        let title = self.form.title.trim();
        if title.is_empty() {
            self.form.error = Some("Title is required".to_string());
            return None;
        }
        match self.form.editing.clone() {
            Some(mut task) => {
                task.title = title.to_string();
                task.status = self.form.status;
                Some(NetCommand::Update { task })
            }
            None => Some(NetCommand::Create {
                draft: TaskDraft {
                    title: title.to_string(),
                    status: self.form.status,
                },
            }),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.visible().len().saturating_sub(1);
                if self.selected < last {
                    self.selected += 1;
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    return Some(NetCommand::Delete { task_id: task.id });
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    self.form.load(task);
                    self.focus = PanelFocus::Form;
                }
            }
            KeyCode::Char('s') => {
                if let Some(task) = self.selected_task() {
                    self.modal.open_prompt(
                        "Enter User ID to share with:",
                        PromptAction::ShareTask { task_id: task.id },
                    );
                }
            }
            KeyCode::Char(' ') => {
                // Full-document update with only the status advanced.
                if let Some(mut task) = self.selected_task() {
                    task.status = task.status.next();
                    return Some(NetCommand::Update { task });
                }
            }
            _ => {}
        }
        None
    }

    /// Cycle focus forward: Search -> Form -> List -> Search.
    const fn cycle_focus_forward(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Search => PanelFocus::Form,
            PanelFocus::Form => PanelFocus::List,
            PanelFocus::List => PanelFocus::Search,
        };
    }

    /// Cycle focus backward: Search -> List -> Form -> Search.
    const fn cycle_focus_backward(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Search => PanelFocus::List,
            PanelFocus::List => PanelFocus::Form,
            PanelFocus::Form => PanelFocus::Search,
        };
    }

    // --- network events ---

    /// Applies one event from the networking layer.
    pub fn apply_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::SessionOpened => {
                self.screen = Screen::Tasks;
                self.login.busy = false;
                self.login.error = None;
                self.login.password.clear();
            }
            NetEvent::AuthFailed { message } => {
                self.login.busy = false;
                self.login.error = Some(message);
            }
            NetEvent::TasksRefreshed { tasks } => {
                // A snapshot queued before a logout is not applied.
                if self.screen == Screen::Tasks {
                    self.tasks = tasks;
                    self.clamp_selection();
                }
            }
            NetEvent::SessionExpired => {
                self.log_out_locally();
                self.login.error = Some("Session expired, log in again".to_string());
            }
            NetEvent::CreateCompleted => {
                if !self.form.is_editing() {
                    self.form.reset();
                }
            }
            NetEvent::CreateFailed { message } => {
                self.form.error = Some(message);
            }
            NetEvent::UpdateCompleted => {
                if self.form.is_editing() {
                    self.form.reset();
                }
            }
            NetEvent::ShareCompleted => {
                self.modal.open_alert("Task shared successfully!");
            }
            NetEvent::ShareFailed { message } => {
                self.modal.open_alert(format!("Error sharing task: {message}"));
            }
            NetEvent::Notification(notification) => {
                self.push_notification(&notification);
            }
            NetEvent::PushClosed => {
                self.push_connected = false;
            }
        }
    }

    /// Prepends the notification to the log and raises the alert.
    fn push_notification(&mut self, notification: &Notification) {
        let entry = NotificationEntry {
            received_at: chrono::Local::now()
                .format(&self.timestamp_format)
                .to_string(),
            message: notification.message.clone(),
        };
        self.notifications.insert(0, entry);
        self.modal
            .open_alert(format!("New Notification: {}", notification.message));
    }

    /// Drops all session-scoped state and returns to the login screen.
    ///
    /// The notification log survives; it is client-local and not tied to the
    /// session.
    fn log_out_locally(&mut self) {
        self.screen = Screen::Login;
        self.login = LoginForm::new();
        self.tasks.clear();
        self.search.clear();
        self.status_filter = StatusFilter::All;
        self.form.reset();
        self.focus = PanelFocus::Search;
        self.selected = 0;
        self.show_analytics = false;
        self.modal = ModalState::None;
    }

    /// Keeps the selection inside the visible list.
    fn clamp_selection(&mut self) {
        let last = self.visible().len().saturating_sub(1);
        if self.selected > last {
            self.selected = last;
        }
    }
}
