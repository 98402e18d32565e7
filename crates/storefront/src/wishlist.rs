//! Saved-for-later product list.

use serde::{Deserialize, Serialize};
use techstore_core::ProductId;
use tracing::{debug, instrument};

use crate::cart::{Cart, CartError};
use crate::catalog::Product;

/// Products the customer saved, in the order they were saved.
///
/// A product appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a product. Returns `false` if it was already saved.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product);
        debug!(len = self.items.len(), "Saved to wishlist");
        true
    }

    /// Remove a saved product, returning it if it was present.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn remove(&mut self, product_id: &ProductId) -> Option<Product> {
        let index = self.items.iter().position(|p| &p.id == product_id)?;
        debug!("Removed from wishlist");
        Some(self.items.remove(index))
    }

    /// Save the product if absent, otherwise remove it. Returns whether the
    /// product is saved afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.remove(&product.id).is_some() {
            false
        } else {
            self.add(product)
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|p| &p.id == product_id)
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Move a saved product into the cart.
    ///
    /// Returns `Ok(false)` without touching the cart when the product is not
    /// on the wishlist. If the cart rejects the product it stays saved.
    ///
    /// # Errors
    ///
    /// Propagates [`CartError`] from [`Cart::add_item`].
    pub fn move_to_cart(&mut self, product_id: &ProductId, cart: &mut Cart) -> Result<bool, CartError> {
        let Some(product) = self.items.iter().find(|p| &p.id == product_id) else {
            return Ok(false);
        };
        cart.add_item(product)?;
        self.remove(product_id);
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            description: None,
            price: Decimal::from(100),
            image: None,
            category: Some("Gaming".to_string()),
        }
    }

    #[test]
    fn test_add_is_deduplicated() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(product("a")));
        assert!(!wishlist.add(product("a")));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle(product("a")));
        assert!(wishlist.contains(&ProductId::new("a")));
        assert!(!wishlist.toggle(product("a")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_remove_missing_returns_none() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.remove(&ProductId::new("nope")).is_none());
    }

    #[test]
    fn test_move_to_cart() {
        let mut wishlist = Wishlist::new();
        wishlist.add(product("a"));
        wishlist.add(product("b"));
        let mut cart = Cart::default();

        assert!(wishlist.move_to_cart(&ProductId::new("a"), &mut cart).unwrap());
        assert!(!wishlist.contains(&ProductId::new("a")));
        assert_eq!(cart.item_count(), 1);

        assert!(!wishlist.move_to_cart(&ProductId::new("zzz"), &mut cart).unwrap());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(wishlist.items()[0].id.as_str(), "b");
    }
}
