//! Stockroom Client - Talking to the inventory service.
//!
//! # Architecture
//!
//! Three layers, each owning one concern:
//!
//! - [`session`] - Who is signed in. The bearer token, in memory and on disk
//! - [`http`] - How requests go out. Token injection, error bodies, 401s
//! - [`api`] - What can be asked. One typed method per service endpoint
//!
//! Nothing here is global. A [`SessionStore`] is created by the caller and
//! handed to the [`HttpClient`]; when the service rejects the token the
//! client clears that session and calls the caller's
//! [`UnauthorizedHandler`].
//!
//! # Example
//!
//! ```no_run
//! use stockroom_client::{ClientConfig, FileStorage, InventoryClient, SessionStore};
//! use stockroom_core::PageRequest;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let session = SessionStore::new(FileStorage::new(&config.session_file));
//! session.load();
//!
//! let client = InventoryClient::from_config(&config, session, || {
//!     eprintln!("Session expired, please log in again");
//! })?;
//!
//! let page = client.list_products(PageRequest::default()).await?;
//! for product in page.items() {
//!     println!("{} {}", product.sku, product.quantity);
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod http;
pub mod session;

pub use api::{ApiError, InventoryClient, LoginResponse, Operation, RegisterResponse};
pub use config::{ClientConfig, ConfigError};
pub use http::{Access, HttpClient, HttpError, IgnoreUnauthorized, UnauthorizedHandler};
pub use session::{FileStorage, MemoryStorage, SessionError, SessionStore, TokenStorage};
