//! Tech Store storefront - client-side shopping logic.
//!
//! Everything here runs in-process on plain owned values: the backend API
//! owns persistence, this crate owns what the customer sees between
//! requests.
//!
//! # Modules
//!
//! - [`cart`] - Cart aggregate with derived subtotal, shipping and total
//! - [`shipping`] - Courier price list and tier selection
//! - [`weight`] - Per-category parcel weight estimates
//! - [`catalog`] - Product records, fetch status and listing queries
//! - [`wishlist`] - Saved-for-later products
//! - [`checkout`] - Form validation and order/payment payloads
//! - [`signup`] - Sign-up form validation and register payload
//! - [`session`] - Signed-in customer and auth token
//! - [`validation`] - Per-field form errors
//! - [`config`] - Environment configuration
//! - [`error`] - Crate-wide error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
pub mod shipping;
pub mod signup;
pub mod validation;
pub mod weight;
pub mod wishlist;

pub use cart::{Cart, CartAction, CartError, CartLine, CartSummary};
pub use catalog::Product;
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use session::{AuthFlow, AuthResponse, Session};
pub use shipping::{RateTable, ShippingTier};
pub use signup::{RegisterRequest, SignupErrors, SignupForm};
pub use validation::FieldErrors;
pub use wishlist::Wishlist;
