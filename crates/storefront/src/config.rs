//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_SHIPPING_REGION` - Region new carts ship to (default: Cairo)
//! - `STOREFRONT_RATE_TABLE` - Path to a YAML courier price list (default: built-in table)
//! - `STOREFRONT_CURRENCY` - ISO 4217 currency for cart totals (default: EGP)

use std::path::PathBuf;
use std::sync::Arc;

use techstore_core::{CurrencyCode, ShippingRegion};
use thiserror::Error;
use tracing::info;

use crate::cart::Cart;
use crate::shipping::{RateTable, RateTableError};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Rate table error: {0}")]
    RateTable(#[from] RateTableError),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Region selected for a fresh cart
    pub default_region: ShippingRegion,
    /// Currency all cart amounts are expressed in
    pub currency_code: CurrencyCode,
    /// Courier price list
    pub rates: Arc<RateTable>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            default_region: ShippingRegion::default(),
            currency_code: CurrencyCode::default(),
            rates: Arc::new(RateTable::default()),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable holds an unknown region or
    /// currency, or if the rate table cannot be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_region = lookup("STOREFRONT_SHIPPING_REGION")
            .map_or(Ok(ShippingRegion::default()), |value| {
                value.parse::<ShippingRegion>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "STOREFRONT_SHIPPING_REGION".to_string(),
                        e.to_string(),
                    )
                })
            })?;

        let currency_code = lookup("STOREFRONT_CURRENCY")
            .map_or(Ok(CurrencyCode::default()), |value| {
                value.parse::<CurrencyCode>().map_err(|e| {
                    ConfigError::InvalidEnvVar("STOREFRONT_CURRENCY".to_string(), e.to_string())
                })
            })?;

        let rates = match lookup("STOREFRONT_RATE_TABLE").filter(|p| !p.trim().is_empty()) {
            Some(path) => {
                let path = PathBuf::from(path);
                let table = RateTable::from_path(&path)?;
                info!(path = %path.display(), "Loaded shipping rate table");
                table
            }
            None => RateTable::default(),
        };

        Ok(Self {
            default_region,
            currency_code,
            rates: Arc::new(rates),
        })
    }

    /// A fresh, empty cart using this configuration.
    #[must_use]
    pub fn new_cart(&self) -> Cart {
        Cart::new(Arc::clone(&self.rates), self.default_region, self.currency_code)
    }
}
