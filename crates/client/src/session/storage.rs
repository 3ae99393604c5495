//! Durable token storage backends.
//!
//! The session file holds a single token under the `token` key, written with
//! restricted permissions (0600 on unix). Tokens are never logged.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionError;

/// Where a session token survives between runs.
///
/// Implementations are synchronous: the payload is one short string.
pub trait TokenStorage: Send + Sync {
    /// Read the stored token, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backend exists but cannot be read.
    fn read(&self) -> Result<Option<String>, SessionError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the token cannot be written.
    fn write(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the stored token. Removing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if an existing token cannot be removed.
    fn remove(&self) -> Result<(), SessionError>;
}

/// On-disk session file contents.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token storage in a JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Store the token at `path`. Parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })?;
        let session: PersistedSession =
            serde_json::from_str(&contents).map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        Ok(Some(session.token).filter(|token| !token.is_empty()))
    }

    fn write(&self, token: &str) -> Result<(), SessionError> {
        let io_err = |source: std::io::Error| SessionError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let session = PersistedSession {
            token: token.to_owned(),
            saved_at: Utc::now(),
        };
        let contents =
            serde_json::to_string_pretty(&session).map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path).map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;

        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Token storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    token: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `token`, as if persisted by an earlier run.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, SessionError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn write(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
