//! Stock quantities.

use core::fmt;
use core::str::FromStr;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{ValidationError, require};

/// Units of a product held in stock. Always non-negative.
///
/// User input goes through [`Quantity::parse`], which rejects anything that
/// is not a whole number of zero or more. Values decoded from the service are
/// taken as stored: any finite JSON number is accepted and clamped into range
/// with [`Quantity::clamped`], so one odd row never hides the rest of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// No units in stock.
    pub const ZERO: Self = Self(0);

    /// Above this many units a product counts as comfortably stocked.
    pub const LOW_STOCK_THRESHOLD: u32 = 10;

    /// Create a quantity from a unit count.
    #[must_use]
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    /// Create a quantity from a signed count, saturating at both ends.
    #[must_use]
    pub fn clamped(units: i64) -> Self {
        if units < 0 {
            return Self::ZERO;
        }
        Self(u32::try_from(units).unwrap_or(u32::MAX))
    }

    /// Get the unit count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Parse a quantity typed by a user.
    ///
    /// Surrounding whitespace is ignored. The value must be a whole number
    /// that is zero or greater.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] if the input is blank
    /// - [`ValidationError::NegativeQuantity`] for values below zero
    /// - [`ValidationError::InvalidQuantity`] for anything that is not a whole number
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = require(input, "quantity")?;

        match trimmed.parse::<i64>() {
            Ok(units) if units < 0 => Err(ValidationError::NegativeQuantity),
            Ok(units) => u32::try_from(units)
                .map(Self)
                .map_err(|_| ValidationError::InvalidQuantity(trimmed.to_owned())),
            Err(_) => Err(ValidationError::InvalidQuantity(trimmed.to_owned())),
        }
    }

    /// Classify how well stocked this quantity is.
    #[must_use]
    pub const fn stock_level(self) -> StockLevel {
        match self.0 {
            0 => StockLevel::OutOfStock,
            n if n > Self::LOW_STOCK_THRESHOLD => StockLevel::InStock,
            _ => StockLevel::Low,
        }
    }
}

impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Quantity {
    fn from(units: u32) -> Self {
        Self(units)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StoredQuantity)
    }
}

struct StoredQuantity;

impl Visitor<'_> for StoredQuantity {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a stock quantity")
    }

    fn visit_u64<E: de::Error>(self, units: u64) -> Result<Quantity, E> {
        Ok(Quantity(u32::try_from(units).unwrap_or(u32::MAX)))
    }

    fn visit_i64<E: de::Error>(self, units: i64) -> Result<Quantity, E> {
        Ok(Quantity::clamped(units))
    }

    // Float-to-int `as` saturates; fractions are truncated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn visit_f64<E: de::Error>(self, units: f64) -> Result<Quantity, E> {
        if !units.is_finite() {
            return Err(E::invalid_value(Unexpected::Float(units), &self));
        }
        Ok(Quantity(units.trunc() as u32))
    }
}

/// Coarse stock classification shown next to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// More than [`Quantity::LOW_STOCK_THRESHOLD`] units.
    InStock,
    /// Between 1 and [`Quantity::LOW_STOCK_THRESHOLD`] units.
    Low,
    /// Zero units.
    OutOfStock,
}

impl StockLevel {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "in stock",
            Self::Low => "low stock",
            Self::OutOfStock => "out of stock",
        }
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
