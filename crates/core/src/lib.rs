//! Tech Store Core - Shared types library.
//!
//! This crate provides common types used across all Tech Store components:
//! - `storefront` - Cart, shipping, catalog, wishlist and checkout logic
//! - `cli` - Command-line tools for quoting carts and checking forms
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, phones, regions and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
