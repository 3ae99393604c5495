//! Inventory service operations.
//!
//! [`InventoryClient`] maps each service endpoint to one typed method. Every
//! method makes exactly one request and reports failure as an [`ApiError`]
//! carrying the service's message or the operation's default.
//!
//! # Endpoints
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | `POST` | `/register` | public |
//! | `POST` | `/login` | public |
//! | `GET` | `/products?page=N&per_page=M` | bearer token |
//! | `POST` | `/products` | bearer token |
//! | `PUT` | `/products/{id}/quantity` | bearer token |

mod error;
mod types;

pub use error::{ApiError, Operation};
pub use types::{LoginResponse, RegisterResponse};

use secrecy::SecretString;
use stockroom_core::{
    Credentials, NewProduct, Page, PageRequest, Product, ProductDraft, ProductId, Quantity,
    UpdatedProduct,
};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::http::{Access, HttpClient, HttpError, UnauthorizedHandler};
use crate::session::{SessionError, SessionStore};
use types::{CreatedBody, CredentialsBody, LoginBody, QuantityBody};

/// Typed client for the inventory service.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: HttpClient,
}

impl InventoryClient {
    /// Wrap an existing HTTP client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if the HTTP client fails to build.
    pub fn from_config(
        config: &ClientConfig,
        session: SessionStore,
        on_unauthorized: impl UnauthorizedHandler + 'static,
    ) -> Result<Self, HttpError> {
        HttpClient::from_config(config, session, on_unauthorized).map(Self::new)
    }

    /// The session requests are authenticated with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.http.session()
    }

    /// The underlying HTTP client.
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Registration`, e.g. "User already exists!" with
    /// status 409, or "Registration failed" when the service gives no reason.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse, ApiError> {
        let response: RegisterResponse = self
            .http
            .post(&["register"], &CredentialsBody::new(credentials), Access::Public)
            .await
            .map_err(failed(Operation::Register))?;

        info!("Account registered");
        Ok(response)
    }

    /// Exchange credentials for an access token.
    ///
    /// Does not touch the session; see [`InventoryClient::sign_in`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Login`. Rejected credentials come back as
    /// "Login failed" with status 401.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body: LoginBody = self
            .http
            .post(&["login"], &CredentialsBody::new(credentials), Access::Public)
            .await
            .map_err(failed(Operation::Login))?;

        if body.access_token.is_empty() {
            debug!("Login response carried an empty token");
            return Err(ApiError::default_for(Operation::Login));
        }

        Ok(LoginResponse {
            access_token: SecretString::from(body.access_token),
            extra: body.extra,
        })
    }

    /// Log in and make the returned token the active session.
    ///
    /// A token that cannot be persisted is still used for this process.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Login` if the login request fails.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let response = self.login(credentials).await?;

        if let Err(e) = self.session().set(response.access_token) {
            warn!(error = %e, "Signed in, but the session could not be saved");
        }

        info!("Signed in");
        Ok(())
    }

    /// End the session locally. The service keeps no session state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the persisted token could not be removed.
    /// The in-memory session is cleared regardless.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.session().clear()
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch one page of products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Fetch`, default "Failed to fetch products".
    #[instrument(skip(self, page), fields(page = page.page(), per_page = page.per_page()))]
    pub async fn list_products(&self, page: PageRequest) -> Result<Page<Product>, ApiError> {
        let page_number = page.page().to_string();
        let per_page = page.per_page().to_string();

        let items: Vec<Product> = self
            .http
            .get(
                &["products"],
                &[("page", page_number.as_str()), ("per_page", per_page.as_str())],
                Access::Authenticated,
            )
            .await
            .map_err(failed(Operation::ListProducts))?;

        debug!(count = items.len(), "Products fetched");
        Ok(Page::new(items, page))
    }

    /// Create a product.
    ///
    /// The returned [`Product`] is `product` with the id the service assigned.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Create`, default "Failed to add product".
    #[instrument(skip(self, product), fields(sku = %product.sku))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let created: CreatedBody = self
            .http
            .post(&["products"], product, Access::Authenticated)
            .await
            .map_err(failed(Operation::CreateProduct))?;

        info!(product_id = %created.product_id, "Product created");
        Ok(product.clone().with_id(created.product_id))
    }

    /// Validate a product form and create it.
    ///
    /// Nothing is sent when validation fails.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for bad input, otherwise as
    /// [`InventoryClient::create_product`].
    pub async fn submit_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let product = draft.validate()?;
        self.create_product(&product).await
    }

    /// Set the stock quantity of a product. Zero is allowed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Update`, e.g. "Product not found!" with status 404,
    /// default "Failed to update quantity".
    #[instrument(skip(self, id, quantity), fields(product_id = %id, quantity = %quantity))]
    pub async fn update_quantity(
        &self,
        id: &ProductId,
        quantity: Quantity,
    ) -> Result<UpdatedProduct, ApiError> {
        let updated: UpdatedProduct = self
            .http
            .put(
                &["products", id.as_str(), "quantity"],
                &QuantityBody { quantity },
                Access::Authenticated,
            )
            .await
            .map_err(failed(Operation::UpdateQuantity))?;

        info!(quantity = %updated.quantity, "Quantity updated");
        Ok(updated)
    }
}

/// Log a failed request and convert it to the operation's error.
fn failed(operation: Operation) -> impl Fn(HttpError) -> ApiError {
    move |e| {
        debug!(?operation, error = %e, "Request failed");
        ApiError::from_http(operation, &e)
    }
}
