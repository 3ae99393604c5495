//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCKROOM_API_URL` - Inventory service base URL
//!   (default: `https://inventry-management-system-cijl.onrender.com/`)
//! - `STOCKROOM_SESSION_FILE` - Where the session token is persisted
//!   (default: `~/.stockroom/session.json`)
//! - `STOCKROOM_HTTP_TIMEOUT_SECS` - Request timeout in seconds
//!   (default: none, the transport's own behavior applies)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Base URL of the hosted inventory service.
pub const DEFAULT_API_URL: &str = "https://inventry-management-system-cijl.onrender.com/";

/// Directory under the user's home that holds client state.
const STATE_DIR: &str = ".stockroom";

/// Session file name inside [`STATE_DIR`].
const SESSION_FILE: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Could not determine home directory; set STOCKROOM_SESSION_FILE")]
    MissingHomeDir,
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service base URL, always ending in `/`
    pub base_url: Url,
    /// Session token file
    pub session_file: PathBuf,
    /// Optional request timeout
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value or no
    /// session file location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("STOCKROOM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = parse_base_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKROOM_API_URL".to_string(), e))?;

        let session_file = match lookup("STOCKROOM_SESSION_FILE") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_session_file()?,
        };

        let timeout = lookup("STOCKROOM_HTTP_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar(
                            "STOCKROOM_HTTP_TIMEOUT_SECS".to_string(),
                            e.to_string(),
                        )
                    })
            })
            .transpose()?;

        Ok(Self {
            base_url,
            session_file,
            timeout,
        })
    }
}

/// Parse a service URL and make sure relative joins keep its path.
///
/// `https://host/api` and `https://host/api/` both become `https://host/api/`.
///
/// # Errors
///
/// Returns a description of the problem if the URL does not parse or is not
/// an `http`/`https` URL.
pub fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(STATE_DIR).join(SESSION_FILE))
        .ok_or(ConfigError::MissingHomeDir)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("STOCKROOM_SESSION_FILE", "/tmp/s.json")]))
                .unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("STOCKROOM_API_URL", "http://localhost:8080"),
            ("STOCKROOM_SESSION_FILE", "/var/lib/stockroom/token.json"),
            ("STOCKROOM_HTTP_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            ("STOCKROOM_API_URL", "not a url"),
            ("STOCKROOM_SESSION_FILE", "/tmp/s.json"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "STOCKROOM_API_URL"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            ("STOCKROOM_HTTP_TIMEOUT_SECS", "soon"),
            ("STOCKROOM_SESSION_FILE", "/tmp/s.json"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "STOCKROOM_HTTP_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        assert_eq!(
            parse_base_url("https://example.com/api").unwrap().as_str(),
            "https://example.com/api/"
        );
        assert_eq!(
            parse_base_url("https://example.com/api/").unwrap().as_str(),
            "https://example.com/api/"
        );
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com").is_err());
    }
}
