//! Command implementations.
//!
//! Each command writes its result to the given output and returns a
//! [`CommandError`] on failure. `main` logs the error and exits non-zero.

pub mod auth;
pub mod products;

use stockroom_client::{
    ApiError, ClientConfig, ConfigError, FileStorage, HttpError, InventoryClient, SessionError,
    SessionStore,
};
use stockroom_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be created.
    #[error("Client setup failed: {0}")]
    Client(#[from] HttpError),

    /// The service call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Input rejected before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The saved session could not be updated.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Writing results failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Load configuration, restore the saved session and build a client.
///
/// # Errors
///
/// Returns `CommandError` if configuration is invalid or the HTTP client
/// cannot be built.
pub fn connect() -> Result<InventoryClient, CommandError> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(
        api_url = %config.base_url,
        session_file = %config.session_file.display(),
        "Configuration loaded"
    );

    let session = SessionStore::new(FileStorage::new(&config.session_file));
    session.load();

    Ok(InventoryClient::from_config(
        &config,
        session,
        session_expired,
    )?)
}

/// Called when the service rejects the saved session.
fn session_expired() {
    tracing::warn!("Session expired. Run `stockroom login` to sign in again.");
}
