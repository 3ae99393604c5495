//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for the inventory domain.

pub mod credentials;
pub mod id;
pub mod page;
pub mod price;
pub mod product;
pub mod quantity;
pub mod validation;

pub use credentials::{Credentials, Registration};
pub use id::ProductId;
pub use page::{Page, PageRequest};
pub use price::Price;
pub use product::{NewProduct, Product, ProductDraft, UpdatedProduct};
pub use quantity::{Quantity, StockLevel};
pub use validation::ValidationError;
