//! Type-safe price representation using decimal arithmetic.
//!
//! The inventory service stores prices as plain JSON numbers without a
//! currency, so [`Price`] is a non-negative [`Decimal`] that travels as a
//! number on the wire.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::validation::{ValidationError, require};

/// A non-negative unit price.
///
/// [`Price::new`] and [`Price::parse`] reject negative amounts. A negative
/// amount decoded from the service reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativePrice`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::NegativePrice);
        }
        Ok(Self(amount))
    }

    /// Parse a price typed by a user.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] if the input is blank
    /// - [`ValidationError::InvalidPrice`] if the input is not a number
    /// - [`ValidationError::NegativePrice`] if the number is below zero
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = require(input, "price")?;
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| ValidationError::InvalidPrice(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount: Decimal = rust_decimal::serde::float::deserialize(deserializer)?;
        Ok(Self(amount.max(Decimal::ZERO)))
    }
}
