//! Product domain types.
//!
//! Products are owned by the inventory service. The client holds transient
//! copies fetched one page at a time and submits new products as
//! [`NewProduct`] values, which can only be built from validated input.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::quantity::Quantity;
use super::validation::{ValidationError, require};

/// A product as returned by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Service-assigned identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Type or category.
    #[serde(rename = "type")]
    pub product_type: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Units in stock.
    pub quantity: Quantity,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    /// Free-form description.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

/// A product to be created. Every [`Product`] field except the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Type or category.
    #[serde(rename = "type")]
    pub product_type: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Units in stock.
    pub quantity: Quantity,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewProduct {
    /// Attach the identifier the service assigned on creation.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            product_type: self.product_type,
            sku: self.sku,
            quantity: self.quantity,
            price: self.price,
            image_url: self.image_url,
            description: self.description,
        }
    }
}

/// Raw product form input, exactly as typed.
///
/// Call [`ProductDraft::validate`] to obtain a [`NewProduct`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub product_type: String,
    pub sku: String,
    pub quantity: String,
    pub price: String,
    pub image_url: String,
    pub description: String,
}

impl ProductDraft {
    /// Check the draft and convert it into a [`NewProduct`].
    ///
    /// Name, type, SKU, quantity and price are required. Quantity must be a
    /// non-negative whole number and price a non-negative number. Blank image
    /// URL and description are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking required fields
    /// before numeric ones.
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        let name = require(&self.name, "name")?;
        let product_type = require(&self.product_type, "type")?;
        let sku = require(&self.sku, "sku")?;
        require(&self.quantity, "quantity")?;
        require(&self.price, "price")?;

        let quantity = Quantity::parse(&self.quantity)?;
        let price = Price::parse(&self.price)?;

        Ok(NewProduct {
            name: name.to_owned(),
            product_type: product_type.to_owned(),
            sku: sku.to_owned(),
            quantity,
            price,
            image_url: non_blank(&self.image_url),
            description: non_blank(&self.description),
        })
    }
}

/// Result of a stock quantity update.
///
/// The service answers with a partial product: identity, name and the new
/// quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedProduct {
    pub id: ProductId,
    pub name: String,
    pub quantity: Quantity,
    /// Confirmation message from the service.
    #[serde(default)]
    pub message: Option<String>,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// The service stores missing optional text as `""` or `null`; both mean absent.
fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Widget".to_string(),
            product_type: "Hardware".to_string(),
            sku: "WID-001".to_string(),
            quantity: "5".to_string(),
            price: "9.99".to_string(),
            image_url: String::new(),
            description: " Small widget ".to_string(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let product = draft().validate().unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.quantity, Quantity::new(5));
        assert_eq!(product.price.amount(), Decimal::new(999, 2));
        assert_eq!(product.image_url, None);
        assert_eq!(product.description.as_deref(), Some("Small widget"));
    }

    #[test]
    fn test_draft_rejects_negative_quantity() {
        let mut input = draft();
        input.quantity = "-1".to_string();
        assert_eq!(input.validate(), Err(ValidationError::NegativeQuantity));
    }

    #[test]
    fn test_draft_rejects_non_numeric_price() {
        let mut input = draft();
        input.price = "abc".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidPrice("abc".to_string()))
        );
    }

    #[test]
    fn test_draft_requires_fields_before_numbers() {
        let mut input = draft();
        input.sku = "  ".to_string();
        input.price = "abc".to_string();
        assert_eq!(input.validate(), Err(ValidationError::MissingField("sku")));
    }

    #[test]
    fn test_new_product_wire_format() {
        let product = draft().validate().unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Widget",
                "type": "Hardware",
                "sku": "WID-001",
                "quantity": 5,
                "price": 9.99,
                "description": "Small widget"
            })
        );
    }

    #[test]
    fn test_product_from_service_json() {
        let product: Product = serde_json::from_value(json!({
            "id": "64f1",
            "name": "Bolt",
            "type": "Hardware",
            "sku": "B-1",
            "image_url": "",
            "description": null,
            "quantity": 0,
            "price": 0.5
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "64f1");
        assert_eq!(product.product_type, "Hardware");
        assert_eq!(product.quantity, Quantity::ZERO);
        assert_eq!(product.image_url, None);
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_with_id() {
        let product = draft().validate().unwrap().with_id(ProductId::new("new-1"));
        assert_eq!(product.id.as_str(), "new-1");
        assert_eq!(product.sku, "WID-001");
    }
}
