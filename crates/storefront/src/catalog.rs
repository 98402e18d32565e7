//! Product catalog state and listing views.
//!
//! Products arrive from the remote API; this module only mirrors them with a
//! fetch status and derives the filtered, sorted listings the product and
//! category pages show.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use techstore_core::{FetchStatus, ProductId};
use tracing::debug;

/// A product as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price. The API sends either a number or a numeric string.
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Remote data mirrored into client state with its fetch status.
///
/// A failed refresh keeps whatever data was loaded before, so pages can keep
/// rendering stale results next to the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loadable<T> {
    pub status: FetchStatus,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> Loadable<T> {
    /// Mark a request as in flight and clear the previous error.
    pub fn start(&mut self) {
        self.status = FetchStatus::Loading;
        self.error = None;
    }

    /// Store a successful response.
    pub fn succeed(&mut self, data: T) {
        self.status = FetchStatus::Succeeded;
        self.data = Some(data);
        self.error = None;
    }

    /// Record a failed request. An empty message becomes "Unknown error".
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = FetchStatus::Failed;
        self.error = Some(if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        });
    }

    /// Drop data and error and return to idle.
    pub fn reset(&mut self) {
        self.status = FetchStatus::Idle;
        self.data = None;
        self.error = None;
    }
}

/// Catalog slices fetched independently of each other.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Loadable<Vec<Product>>,
    pub current_product: Loadable<Product>,
    pub categories: Loadable<Vec<String>>,
    pub products_by_category: Loadable<Vec<Product>>,
}

/// Canonical category spelling used by the API: first letter uppercase,
/// the rest lowercase.
///
/// ```
/// use techstore_storefront::catalog::normalize_category;
///
/// assert_eq!(normalize_category("KEYBOARDS"), "Keyboards");
/// assert_eq!(normalize_category("mice"), "Mice");
/// ```
#[must_use]
pub fn normalize_category(name: &str) -> String {
    let mut chars = name.trim().chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Sort order offered on listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// API order, which is newest first.
    #[default]
    Latest,
    PriceLowHigh,
    PriceHighLow,
}

/// Search and sort settings for a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ProductQuery {
    /// Returns `true` when the listing differs from the unfiltered default.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty() || self.sort != SortOrder::Latest
    }

    /// Filter `products` by the search text, then sort them.
    ///
    /// Search is a case-insensitive substring match on name or description.
    /// Price sorts are stable, so equal prices keep API order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = self.search.trim().to_lowercase();
        let mut listed: Vec<&Product> = products
            .iter()
            .filter(|product| needle.is_empty() || matches_search(product, &needle))
            .collect();

        match self.sort {
            SortOrder::Latest => {}
            SortOrder::PriceLowHigh => listed.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHighLow => listed.sort_by(|a, b| b.price.cmp(&a.price)),
        }

        debug!(
            total = products.len(),
            listed = listed.len(),
            sort = ?self.sort,
            "Applied product query"
        );
        listed
    }
}

fn matches_search(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}
