//! Integration tests for Stockroom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockroom-integration-tests
//! ```
//!
//! Every test runs against a local [`MockServer`] standing in for the
//! inventory service, so no network access or credentials are needed.
//!
//! # Test Categories
//!
//! - `default_messages` - Error messages for each operation
//! - `session_expiry` - 401 handling across endpoints
//! - `products` - Pagination, validation and quantity updates

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use stockroom_client::config::parse_base_url;
use stockroom_client::{HttpClient, InventoryClient, SessionStore};
use stockroom_core::Credentials;
use wiremock::MockServer;

/// A client wired to a mock service, an in-memory session and a handler
/// that counts how often the session was rejected.
pub struct TestContext {
    pub server: MockServer,
    pub session: SessionStore,
    pub client: InventoryClient,
    unauthorized: Arc<AtomicUsize>,
}

impl TestContext {
    /// Start a mock service with nobody signed in.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built for the mock server URL.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let session = SessionStore::in_memory();
        let unauthorized = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&unauthorized);
        let http = HttpClient::new(
            parse_base_url(&server.uri()).expect("Mock server URL should parse"),
            session.clone(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )
        .expect("Failed to create HTTP client");

        Self {
            server,
            session,
            client: InventoryClient::new(http),
            unauthorized,
        }
    }

    /// Start a mock service with `token` as the active session.
    ///
    /// # Panics
    ///
    /// Panics if the context cannot be created.
    pub async fn signed_in(token: &str) -> Self {
        let ctx = Self::new().await;
        ctx.session
            .set(SecretString::from(token))
            .expect("In-memory session should accept a token");
        ctx
    }

    /// How many times the unauthorized handler has run.
    #[must_use]
    pub fn unauthorized_calls(&self) -> usize {
        self.unauthorized.load(Ordering::SeqCst)
    }
}

/// Valid credentials for a test user.
///
/// # Panics
///
/// Never; the fixed values are valid.
#[must_use]
pub fn test_credentials() -> Credentials {
    Credentials::new("alice", SecretString::from("wonderland")).expect("Fixed credentials are valid")
}

/// A product as the service lists it.
#[must_use]
pub fn product_json(id: &str, quantity: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Product {id}"),
        "type": "Hardware",
        "sku": format!("SKU-{id}"),
        "image_url": null,
        "description": null,
        "quantity": quantity,
        "price": 2.5
    })
}
