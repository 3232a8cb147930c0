//! Durable client state.
//!
//! A single JSON file (`state.json`) survives restarts and holds the two
//! things worth remembering between runs: the session token and the
//! dark-mode flag. Reads are forgiving (a missing or unparsable file yields
//! defaults); each write replaces the whole file, preserving the keys it
//! does not touch.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const STATE_FILE_NAME: &str = "state.json";

/// Errors that can occur when persisting client state.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to create the state directory.
    #[error("failed to create state directory {path}: {source}")]
    CreateDir {
        /// Directory that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the state file.
    #[error("failed to write state file {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to serialize the state document.
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk state document. All fields optional so partial files parse;
/// cleared fields are dropped from the file rather than written as null.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct PersistedState {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dark_mode: Option<bool>,
}

/// Handle to the persisted client state file.
///
/// Cheap to clone; every accessor re-reads the file so concurrent handles
/// observe each other's writes.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Opens (creating if needed) the state directory and returns a handle
    /// to the state file inside it. The file itself is created lazily on
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::CreateDir` if the directory cannot be created.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: dir.join(STATE_FILE_NAME),
        })
    }

    /// Path of the underlying state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().token
    }

    /// Saves or clears the session token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the state file cannot be written.
    pub fn set_token(&self, token: Option<&str>) -> Result<(), StorageError> {
        let mut state = self.read();
        state.token = token.map(str::to_string);
        self.write(&state)
    }

    /// Returns the saved dark-mode flag. Defaults to `true` when the file
    /// is absent, unparsable, or has never recorded a preference.
    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.read().dark_mode.unwrap_or(true)
    }

    /// Saves the dark-mode flag.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the state file cannot be written.
    pub fn set_dark_mode(&self, dark: bool) -> Result<(), StorageError> {
        let mut state = self.read();
        state.dark_mode = Some(dark);
        self.write(&state)
    }

    /// Reads the state document, falling back to defaults on any failure.
    fn read(&self) -> PersistedState {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return PersistedState::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), err = %e,
                    "failed to open state file, using defaults");
                return PersistedState::default();
            }
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), err = %e,
                    "state file unparsable, using defaults");
                PersistedState::default()
            }
        }
    }

    /// Replaces the state file with the given document.
    fn write(&self, state: &PersistedState) -> Result<(), StorageError> {
        let file = File::create(&self.path).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush().map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
