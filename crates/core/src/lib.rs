//! Stockroom Core - Shared domain types.
//!
//! This crate provides the types used across all Stockroom components:
//! - `client` - Session store, authenticated HTTP client and API facade
//! - `cli` - The `stockroom` command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no persistence. Product identity and uniqueness belong to the
//! remote inventory service; the only rules enforced here are the ones a
//! form would check before submitting.
//!
//! # Modules
//!
//! - [`types`] - Products, quantities, prices, credentials and pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
