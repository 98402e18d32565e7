//! Unified error handling.
//!
//! Provides a unified `StorefrontError` type wrapping each module's error so
//! callers that drive several steps (configure, fill the cart, check out)
//! can propagate with `?` and report once.

use thiserror::Error;

use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::shipping::RateTableError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A cart mutation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The order could not be built.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// The courier price list is invalid.
    #[error("Rate table error: {0}")]
    RateTable(#[from] RateTableError),
}

impl StorefrontError {
    /// Returns `true` if the error was caused by customer input rather than
    /// deployment configuration.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Cart(_) | Self::Checkout(_))
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
