//! Operation-level errors.
//!
//! Each facade operation fails with its own variant. The message is the one
//! the service sent, or the operation's fixed default when it sent none.

use stockroom_core::ValidationError;
use thiserror::Error;

use crate::http::HttpError;

/// The facade operations, used to pick a default error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    ListProducts,
    CreateProduct,
    UpdateQuantity,
}

impl Operation {
    /// Message reported when the service gives no reason for a failure.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Register => "Registration failed",
            Self::Login => "Login failed",
            Self::ListProducts => "Failed to fetch products",
            Self::CreateProduct => "Failed to add product",
            Self::UpdateQuantity => "Failed to update quantity",
        }
    }
}

/// Errors returned by [`crate::InventoryClient`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{message}")]
    Registration { message: String, status: Option<u16> },

    #[error("{message}")]
    Login { message: String, status: Option<u16> },

    #[error("{message}")]
    Fetch { message: String, status: Option<u16> },

    #[error("{message}")]
    Create { message: String, status: Option<u16> },

    #[error("{message}")]
    Update { message: String, status: Option<u16> },

    /// Input rejected before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Build the error for `operation`.
    #[must_use]
    pub fn new(operation: Operation, message: String, status: Option<u16>) -> Self {
        match operation {
            Operation::Register => Self::Registration { message, status },
            Operation::Login => Self::Login { message, status },
            Operation::ListProducts => Self::Fetch { message, status },
            Operation::CreateProduct => Self::Create { message, status },
            Operation::UpdateQuantity => Self::Update { message, status },
        }
    }

    /// The error for `operation` with its default message and no status.
    #[must_use]
    pub fn default_for(operation: Operation) -> Self {
        Self::new(operation, operation.default_message().to_string(), None)
    }

    /// Translate a transport-level failure of `operation`.
    ///
    /// Only a non-success response carries a status. Its `message` wins over
    /// the default when present.
    #[must_use]
    pub fn from_http(operation: Operation, err: &HttpError) -> Self {
        let message = err
            .service_message()
            .unwrap_or_else(|| operation.default_message())
            .to_string();
        Self::new(operation, message, err.status())
    }

    /// The operation that failed, `None` for local validation errors.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Registration { .. } => Some(Operation::Register),
            Self::Login { .. } => Some(Operation::Login),
            Self::Fetch { .. } => Some(Operation::ListProducts),
            Self::Create { .. } => Some(Operation::CreateProduct),
            Self::Update { .. } => Some(Operation::UpdateQuantity),
            Self::Validation(_) => None,
        }
    }

    /// HTTP status of the failed response, if the service answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Registration { status, .. }
            | Self::Login { status, .. }
            | Self::Fetch { status, .. }
            | Self::Create { status, .. }
            | Self::Update { status, .. } => *status,
            Self::Validation(_) => None,
        }
    }

    /// Whether the service rejected the session token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_messages() {
        let cases = [
            (Operation::Register, "Registration failed"),
            (Operation::Login, "Login failed"),
            (Operation::ListProducts, "Failed to fetch products"),
            (Operation::CreateProduct, "Failed to add product"),
            (Operation::UpdateQuantity, "Failed to update quantity"),
        ];

        for (operation, expected) in cases {
            let err = ApiError::default_for(operation);
            assert_eq!(err.to_string(), expected);
            assert_eq!(err.status(), None);
            assert_eq!(err.operation(), Some(operation));
        }
    }

    #[test]
    fn test_from_http_prefers_service_message() {
        let err = ApiError::from_http(
            Operation::UpdateQuantity,
            &HttpError::Status {
                status: 404,
                message: Some("Product not found!".to_string()),
            },
        );
        assert_eq!(
            err,
            ApiError::Update {
                message: "Product not found!".to_string(),
                status: Some(404),
            }
        );
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_from_http_without_message() {
        let err = ApiError::from_http(
            Operation::ListProducts,
            &HttpError::Status {
                status: 401,
                message: None,
            },
        );
        assert_eq!(err.to_string(), "Failed to fetch products");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_validation_passes_through() {
        let err = ApiError::from(ValidationError::NegativeQuantity);
        assert_eq!(err.to_string(), ValidationError::NegativeQuantity.to_string());
        assert_eq!(err.operation(), None);
    }
}
