//! Configuration system for the `TaskDeck` client.
//!
//! Settings come in layers: CLI flags beat environment variables (folded in
//! through clap's `env` attribute), which beat the TOML file at
//! `~/.config/taskdeck/config.toml`, which beats compiled defaults.
//!
//! A missing config file is fine and falls through to defaults. An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Base URL used when neither CLI, env, nor config file supplies one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Failures while loading or interpreting configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// File that was being read.
        path: PathBuf,
        /// The I/O failure.
        source: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The configured base URL is not parseable.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The offending value.
        url: String,
        /// Underlying parse error.
        source: url::ParseError,
    },

    /// The base URL scheme cannot be mapped to a push-channel scheme.
    #[error("unsupported base URL scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme {
        /// The offending scheme.
        scheme: String,
    },

    /// No platform config directory could be located.
    #[error("could not determine config directory (no HOME or XDG_CONFIG_HOME)")]
    NoConfigDir,
}

// ---------------------------------------------------------------------------
// TOML file layer (everything optional so partial files merge cleanly)
// ---------------------------------------------------------------------------

/// Shape of the on-disk TOML file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    backend: BackendFileConfig,
    push: PushFileConfig,
    ui: UiFileConfig,
    storage: StorageFileConfig,
}

/// `[backend]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BackendFileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    channel_capacity: Option<usize>,
}

/// `[push]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct PushFileConfig {
    connect_timeout_secs: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    timestamp_format: Option<String>,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    state_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved layer (concrete values, nothing optional)
// ---------------------------------------------------------------------------

/// Client configuration with every layer folded in.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -- Backend --
    /// Base URL of the task service, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Timeout applied to each REST request.
    pub request_timeout: Duration,
    /// Bound for the command and event mpsc channels.
    pub channel_capacity: usize,

    // -- Push --
    /// Timeout for establishing the push-channel WebSocket.
    pub push_connect_timeout: Duration,

    // -- UI --
    /// How long the event loop waits for terminal input each tick.
    pub poll_timeout: Duration,
    /// chrono format string for displayed timestamps.
    pub timestamp_format: String,

    // -- Storage --
    /// Directory holding the persisted client state. `None` means the
    /// platform default (`~/.config/taskdeck`).
    pub state_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            channel_capacity: 256,
            push_connect_timeout: Duration::from_secs(10),
            poll_timeout: Duration::from_millis(50),
            timestamp_format: "%H:%M".to_string(),
            state_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from CLI args, environment, and the TOML file.
    ///
    /// clap has already folded env vars into `cli` by the time this runs.
    /// An explicit `--config` path must exist; without one the default path
    /// (`~/.config/taskdeck/config.toml`) is tried and silently skipped
    /// when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. Split out of `load()` so tests can
    /// feed a parsed file in directly.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| file.backend.base_url.clone())
                .unwrap_or(defaults.base_url),
            request_timeout: file
                .backend
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            channel_capacity: file
                .backend
                .channel_capacity
                .unwrap_or(defaults.channel_capacity),
            push_connect_timeout: file
                .push
                .connect_timeout_secs
                .map_or(defaults.push_connect_timeout, Duration::from_secs),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            timestamp_format: file
                .ui
                .timestamp_format
                .clone()
                .unwrap_or(defaults.timestamp_format),
            state_dir: cli
                .state_dir
                .clone()
                .or_else(|| file.storage.state_dir.clone()),
        }
    }

    /// Parses the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the value does not parse.
    pub fn backend_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    /// Derives the push-channel WebSocket URL from the base URL.
    ///
    /// `http` maps to `ws` and `https` to `wss`; the path is replaced with
    /// the push endpoint path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL does not parse or has a
    /// scheme with no WebSocket counterpart.
    pub fn push_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.backend_url()?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(ConfigError::UnsupportedScheme {
                    scheme: other.to_string(),
                });
            }
        };
        if url.set_scheme(scheme).is_err() {
            return Err(ConfigError::UnsupportedScheme {
                scheme: scheme.to_string(),
            });
        }
        url.set_path(taskdeck_api::push::PUSH_PATH);
        Ok(url)
    }

    /// Resolves the directory holding persisted client state.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if no directory is configured and
    /// the platform config directory cannot be determined.
    pub fn resolve_state_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.state_dir {
            return Ok(dir.clone());
        }
        dirs::config_dir()
            .map(|d| d.join("taskdeck"))
            .ok_or(ConfigError::NoConfigDir)
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal client for a shared task-management service")]
pub struct CliArgs {
    /// Base URL of the task service.
    #[arg(long, env = "TASKDECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to config file (default: `~/.config/taskdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for persisted client state (default: `~/.config/taskdeck`).
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskdeck.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// An explicit path must exist. Without one the default location is tried,
/// and a missing file there reads as an empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir on this platform; fall back to defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskdeck").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
