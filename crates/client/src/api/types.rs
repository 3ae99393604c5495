//! Request and response bodies exchanged with the inventory service.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use stockroom_core::{Credentials, ProductId, Quantity};

/// Body of `POST /register` and `POST /login`.
#[derive(Serialize)]
pub(crate) struct CredentialsBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> CredentialsBody<'a> {
    pub(crate) fn new(credentials: &'a Credentials) -> Self {
        use secrecy::ExposeSecret;

        Self {
            username: credentials.username(),
            password: credentials.password().expose_secret(),
        }
    }
}

/// Body of `PUT /products/{id}/quantity`.
#[derive(Serialize)]
pub(crate) struct QuantityBody {
    pub quantity: Quantity,
}

/// Successful registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    /// Confirmation text from the service, e.g. "New user created!".
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful login.
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub access_token: SecretString,
    /// Any other fields the service included.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

/// Login response as sent on the wire.
#[derive(Deserialize)]
pub(crate) struct LoginBody {
    pub access_token: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `POST /products` response: the id assigned to the new product.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedBody {
    #[serde(alias = "id")]
    pub product_id: ProductId,
}
