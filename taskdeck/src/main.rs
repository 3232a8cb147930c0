//! `TaskDeck` terminal client for a shared task-management service.
//!
//! Launches the TUI, restores any persisted session, and talks to the
//! backend over REST with live notifications over a WebSocket. Configuration
//! via CLI flags, environment variables, or config file
//! (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Against the default backend (http://localhost:5000)
//! cargo run --bin taskdeck
//!
//! # Against another deployment
//! cargo run --bin taskdeck -- --base-url https://tasks.example.com
//!
//! # Or via environment variables
//! TASKDECK_BASE_URL=https://tasks.example.com cargo run
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use url::Url;

use taskdeck::api::ApiClient;
use taskdeck::app::{App, Screen};
use taskdeck::appearance::Appearance;
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::net::{self, NetCommand, NetEvent};
use taskdeck::notify;
use taskdeck::session::{AuthSlot, SessionManager};
use taskdeck::storage::StateStore;
use taskdeck::tasks::Synchronizer;
use taskdeck::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logging goes to a file, so it must be up before raw mode is entered.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("taskdeck starting");

    // Wire up storage, session custody, and the REST client. Failures here
    // happen before the terminal is touched, so plain error returns are fine.
    let state_dir = config.resolve_state_dir().map_err(io::Error::other)?;
    let store = StateStore::open(&state_dir).map_err(io::Error::other)?;

    let auth = AuthSlot::new();
    let session = Arc::new(SessionManager::restore(auth.clone(), store.clone()));

    let backend_url = config.backend_url().map_err(io::Error::other)?;
    let push_url = config.push_url().map_err(io::Error::other)?;
    let api = Arc::new(
        ApiClient::new(backend_url, auth, config.request_timeout).map_err(io::Error::other)?,
    );
    let sync = Synchronizer::new(Arc::clone(&api), Arc::clone(&session));

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config, api, sync, session, store, push_url).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Nothing may print to stdout while ratatui owns the terminal, so all log
/// output lands in a file. The returned [`WorkerGuard`] has to live until
/// shutdown or buffered entries are lost.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
    api: Arc<ApiClient>,
    sync: Synchronizer,
    session: Arc<SessionManager>,
    store: StateStore,
    push_url: Url,
) -> io::Result<()> {
    let (evt_tx, mut evt_rx) = mpsc::channel::<NetEvent>(config.channel_capacity);
    let cmd_tx = net::spawn_worker(
        api,
        sync,
        Arc::clone(&session),
        evt_tx.clone(),
        config.channel_capacity,
    );

    let mut app = App::new(Appearance::load(store)).with_timestamp_format(&config.timestamp_format);

    // The push channel is best effort. Everything still works over plain
    // REST; notifications just stop arriving live.
    let mut listener =
        match notify::spawn_listener(&push_url, config.push_connect_timeout, evt_tx).await {
            Ok(handle) => {
                app.push_connected = true;
                Some(handle)
            }
            Err(e) => {
                tracing::warn!(error = %e, "push channel unavailable");
                None
            }
        };

    // A persisted token skips the login screen; the first refresh settles
    // whether the backend still honors it.
    if session.is_active() {
        app.screen = Screen::Tasks;
        let _ = cmd_tx.try_send(NetCommand::Refresh);
    }

    loop {
        // Step 1: Draw the frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Apply everything the background tasks finished.
        while let Ok(net_event) = evt_rx.try_recv() {
            app.apply_net_event(net_event);
        }

        // Step 3: Poll for terminal input.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // handle_key_event returns Some(NetCommand) when the key maps to
            // a backend call (login, refresh, create, share, ...).
            if let Some(command) = app.handle_key_event(key) {
                match cmd_tx.try_send(command) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(command)) => {
                        tracing::warn!(?command, "command channel full, dropping input");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        tracing::error!("network worker gone, shutting down");
                        app.should_quit = true;
                    }
                }
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(NetCommand::Shutdown);
            if let Some(handle) = listener.take() {
                handle.close().await;
            }
            return Ok(());
        }
    }
}
