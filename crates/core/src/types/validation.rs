//! Local input validation errors.

/// Errors raised while checking user input before it is sent anywhere.
///
/// A `ValidationError` never reaches the network: every constructor that
/// returns one runs before a request is built.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The quantity is not a whole number.
    #[error("quantity must be a whole number (got '{0}')")]
    InvalidQuantity(String),

    /// The quantity is below zero.
    #[error("quantity cannot be negative")]
    NegativeQuantity,

    /// The price is not a number.
    #[error("price must be a number (got '{0}')")]
    InvalidPrice(String),

    /// The price is below zero.
    #[error("price cannot be negative")]
    NegativePrice,

    /// A pagination parameter is below 1.
    #[error("{field} must be at least 1 (got {value})")]
    InvalidPage {
        /// Parameter name (`page` or `per_page`).
        field: &'static str,
        /// Rejected value.
        value: u32,
    },

    /// The password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The password is shorter than the minimum length.
    #[error("password must be at least {min} characters long")]
    PasswordTooShort {
        /// Minimum allowed length.
        min: usize,
    },
}

/// Trim `value` and fail with [`ValidationError::MissingField`] when nothing is left.
pub(crate) fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::MissingField("sku").to_string(),
            "sku is required"
        );
        assert_eq!(
            ValidationError::InvalidPage {
                field: "per_page",
                value: 0
            }
            .to_string(),
            "per_page must be at least 1 (got 0)"
        );
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "password must be at least 6 characters long"
        );
    }

    #[test]
    fn test_require_trims() {
        assert_eq!(require("  widget ", "name"), Ok("widget"));
        assert_eq!(
            require("   ", "name"),
            Err(ValidationError::MissingField("name"))
        );
    }
}
