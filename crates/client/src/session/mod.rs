//! Session store: the single source of truth for "is someone signed in".
//!
//! # Architecture
//!
//! - [`SessionStore`] is an owned, cloneable handle; clones share one session
//! - The active token lives in memory, behind a lock
//! - A [`TokenStorage`] backend keeps the token across restarts
//! - Presence is the only thing checked: signatures and expiry belong to the
//!   service, which reports a dead token with a 401
//! - An empty token, or one that cannot be sent in an `Authorization`
//!   header, never becomes the active session

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, TokenStorage};

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur while persisting the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("Session storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session file exists but is not a valid session.
    #[error("Session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Authentication state shared by everything that talks to the service.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    storage: Box<dyn TokenStorage>,
    token: RwLock<Option<SecretString>>,
}

impl SessionStore {
    /// Create an empty session persisted through `storage`.
    ///
    /// Call [`SessionStore::load`] to pick up a token saved by an earlier run.
    #[must_use]
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                storage: Box::new(storage),
                token: RwLock::new(None),
            }),
        }
    }

    /// Create a session that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Read the persisted token and make it the active session.
    ///
    /// Absence of a token is a normal state. Storage failures are logged and
    /// treated the same way.
    #[instrument(skip(self))]
    pub fn load(&self) -> Option<SecretString> {
        let stored = match self.inner.storage.read() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session storage");
                None
            }
        };

        let token = stored
            .filter(|token| {
                let usable = is_usable(token);
                if !usable {
                    warn!("Ignoring stored session token that cannot be sent");
                }
                usable
            })
            .map(SecretString::from);
        debug!(authenticated = token.is_some(), "Session loaded");
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token.clone();
        token
    }

    /// Make `token` the active session credential and persist it.
    ///
    /// The token is active for subsequent requests even if persisting fails.
    /// An empty or unsendable token ends the session instead, as
    /// [`SessionStore::clear`] does.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the token could not be persisted.
    #[instrument(skip_all)]
    pub fn set(&self, token: SecretString) -> Result<(), SessionError> {
        if !is_usable(token.expose_secret()) {
            warn!("Refusing unusable session token");
            return self.clear();
        }

        let persisted = self.inner.storage.write(token.expose_secret());
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
        debug!("Session token set");
        persisted
    }

    /// End the session: forget the active token and remove the persisted one.
    ///
    /// The in-memory token is cleared even if removing the persisted copy fails.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the persisted token could not be removed.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), SessionError> {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        debug!("Session cleared");
        self.inner.storage.remove()
    }

    /// Whether a session token is present. Does not check validity.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The active token, if any.
    pub(crate) fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Whether `token` can be sent as a bearer credential.
fn is_usable(token: &str) -> bool {
    !token.is_empty() && HeaderValue::from_str(token).is_ok()
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
