//! Integration tests for the Tech Store storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p techstore-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Browsing, wishlist and cart working together
//! - `checkout_flow` - Form validation through order and payment payloads
//! - `cart_properties` - Property tests for cart invariants

use rust_decimal::Decimal;
use techstore_core::ProductId;
use techstore_storefront::Product;

/// Build a catalog product with a whole-pound price.
#[must_use]
pub fn product(id: &str, price: i64, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("{category} {id}"),
        description: Some(format!("A fine piece of {category}")),
        price: Decimal::from(price),
        image: Some(format!("/uploads/{id}.webp")),
        category: Some(category.to_string()),
    }
}

/// A small catalog covering light, medium and heavy categories.
#[must_use]
pub fn sample_catalog() -> Vec<Product> {
    vec![
        product("kb-1", 1850, "Keyboards"),
        product("ms-1", 420, "Mice"),
        product("sp-1", 2200, "Speakers"),
        product("cb-1", 90, "Cables"),
        product("hp-1", 1300, "Headphones"),
        product("xx-1", 500, "Drones"),
    ]
}
