//! Authenticated HTTP transport for the inventory service.
//!
//! Every request goes through one send path, which:
//! - attaches `Authorization: Bearer <token>` when the session holds a token
//! - tags the request with a fresh `x-request-id`
//! - ends the session when the service rejects an authenticated request with 401
//!
//! Nothing is retried. One call, one attempt.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{Span, debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::session::SessionStore;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Errors from a single request to the inventory service.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Service returned {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: u16,
        /// The `message` field of the error body, when there was one.
        message: Option<String>,
    },

    /// A success response whose body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// An endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The session token cannot be sent as a header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl HttpError {
    /// HTTP status of the response, if the service answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The service's own error message, if it sent one.
    #[must_use]
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Whether an endpoint needs a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Open endpoints (register, login).
    ///
    /// A 401 here is a plain failure. It reports rejected credentials rather
    /// than an expired token, so the current session is kept and the
    /// [`UnauthorizedHandler`] does not run.
    Public,
    /// Endpoints behind the bearer token. A 401 here ends the session.
    Authenticated,
}

/// Reaction to the service rejecting the session.
///
/// Called once per 401 on an [`Access::Authenticated`] request, after the
/// session has been cleared.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}

impl<F> UnauthorizedHandler for F
where
    F: Fn() + Send + Sync,
{
    fn on_unauthorized(&self) {
        self();
    }
}

/// Handler that does nothing beyond the session being cleared.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreUnauthorized;

impl UnauthorizedHandler for IgnoreUnauthorized {
    fn on_unauthorized(&self) {}
}

/// HTTP client bound to one service base URL and one session.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: SessionStore,
    on_unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl HttpClient {
    /// Create a client for `base_url` with the transport's default timeouts.
    ///
    /// `base_url` should end in `/` (see [`crate::config::parse_base_url`])
    /// so that endpoint paths are appended to it.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Transport` if the HTTP client fails to build.
    pub fn new(
        base_url: Url,
        session: SessionStore,
        on_unauthorized: impl UnauthorizedHandler + 'static,
    ) -> Result<Self, HttpError> {
        Self::build(reqwest::Client::builder(), base_url, session, on_unauthorized)
    }

    /// Create a client from loaded configuration, applying its timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Transport` if the HTTP client fails to build.
    pub fn from_config(
        config: &ClientConfig,
        session: SessionStore,
        on_unauthorized: impl UnauthorizedHandler + 'static,
    ) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Self::build(builder, config.base_url.clone(), session, on_unauthorized)
    }

    fn build(
        builder: reqwest::ClientBuilder,
        base_url: Url,
        session: SessionStore,
        on_unauthorized: impl UnauthorizedHandler + 'static,
    ) -> Result<Self, HttpError> {
        let client = builder
            .user_agent(concat!("stockroom/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HttpError::Transport)?;

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                client,
                base_url,
                session,
                on_unauthorized: Arc::new(on_unauthorized),
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The service base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// GET `segments` with optional query parameters.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        access: Access,
    ) -> Result<T, HttpError> {
        let mut url = self.endpoint(segments)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.send(Method::GET, url, None::<&()>, access).await
    }

    /// POST a JSON body to `segments`.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn post<B, T>(&self, segments: &[&str], body: &B, access: Access) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        self.send(Method::POST, url, Some(body), access).await
    }

    /// PUT a JSON body to `segments`.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn put<B, T>(&self, segments: &[&str], body: &B, access: Access) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        self.send(Method::PUT, url, Some(body), access).await
    }

    /// Build an endpoint URL. Each segment is percent-encoded on its own, so
    /// an id containing `/` stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, HttpError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| HttpError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(
        skip(self, url, body),
        fields(path = %url.path(), request_id = tracing::field::Empty)
    )]
    async fn send<B, T>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        access: Access,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let mut request = self
            .inner
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id.as_str());

        if let Some(token) = self.inner.session.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(HttpError::Transport)?;
        let status = response.status();
        debug!(status = status.as_u16(), "Response received");

        if status == StatusCode::UNAUTHORIZED && access == Access::Authenticated {
            self.expire_session();
        }

        if !status.is_success() {
            // An unreadable error body still reports the status.
            let body = response.bytes().await.unwrap_or_default();
            return Err(HttpError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.bytes().await.map_err(HttpError::Transport)?;
        serde_json::from_slice(&body).map_err(HttpError::Decode)
    }

    fn expire_session(&self) {
        warn!("Service rejected the session token; signing out");
        if let Err(e) = self.inner.session.clear() {
            warn!(error = %e, "Failed to remove persisted session");
        }
        self.inner.on_unauthorized.on_unauthorized();
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

/// Pull a non-empty string `message` out of a JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::parse_base_url;

    fn client_for(server: &MockServer, session: SessionStore) -> HttpClient {
        HttpClient::new(
            parse_base_url(&server.uri()).unwrap(),
            session,
            IgnoreUnauthorized,
        )
        .unwrap()
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(br#"{"message": "User already exists!"}"#).as_deref(),
            Some("User already exists!")
        );
        assert_eq!(error_message(br#"{"message": ""}"#), None);
        assert_eq!(error_message(br#"{"message": 42}"#), None);
        assert_eq!(error_message(b"Could not verify"), None);
        assert_eq!(error_message(b""), None);
    }

    #[tokio::test]
    async fn test_bearer_header_only_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let session = SessionStore::in_memory();
        let client = client_for(&server, session.clone());

        let _: Vec<serde_json::Value> = client
            .get(&["products"], &[], Access::Authenticated)
            .await
            .unwrap();

        session.set(SecretString::from("jwt-123")).unwrap();
        let _: Vec<serde_json::Value> = client
            .get(&["products"], &[], Access::Authenticated)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].headers.get("authorization").is_none());
        assert_eq!(
            requests[1].headers.get("authorization").unwrap(),
            "Bearer jwt-123"
        );
    }

    #[tokio::test]
    async fn test_request_id_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "5"))
            .and(header_exists(REQUEST_ID_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let items: Vec<serde_json::Value> = client
            .get(
                &["products"],
                &[("page", "2"), ("per_page", "5")],
                Access::Authenticated,
            )
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/products/a%2Fb/quantity"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let base = parse_base_url(&format!("{}/api", server.uri())).unwrap();
        let client = HttpClient::new(base, SessionStore::in_memory(), IgnoreUnauthorized).unwrap();
        let _: serde_json::Value = client
            .put(
                &["products", "a/b", "quantity"],
                &json!({"quantity": 1}),
                Access::Authenticated,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_status_error_keeps_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "User already exists!"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let err = client
            .post::<_, serde_json::Value>(&["register"], &json!({}), Access::Public)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(409));
        assert_eq!(err.service_message(), Some("User already exists!"));
        assert_eq!(err.to_string(), "Service returned 409: User already exists!");
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let err = client
            .get::<Vec<serde_json::Value>>(&["products"], &[], Access::Authenticated)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Decode(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_notifies_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token is invalid!"})))
            .mount(&server)
            .await;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let session = SessionStore::in_memory();
        session.set(SecretString::from("stale")).unwrap();

        let client = HttpClient::new(
            parse_base_url(&server.uri()).unwrap(),
            session.clone(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();

        let err = client
            .get::<Vec<serde_json::Value>>(&["products"], &[], Access::Authenticated)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(!session.is_authenticated());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_on_public_endpoint_keeps_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Could not verify"))
            .mount(&server)
            .await;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let session = SessionStore::in_memory();
        session.set(SecretString::from("still-valid")).unwrap();

        let client = HttpClient::new(
            parse_base_url(&server.uri()).unwrap(),
            session.clone(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();

        let err = client
            .post::<_, serde_json::Value>(&["login"], &json!({}), Access::Public)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.service_message(), None);
        assert!(session.is_authenticated());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 1.
        let base = parse_base_url("http://127.0.0.1:1").unwrap();
        let client = HttpClient::new(base, SessionStore::in_memory(), IgnoreUnauthorized).unwrap();
        let err = client
            .get::<serde_json::Value>(&["products"], &[], Access::Authenticated)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Transport(_)));
    }
}
