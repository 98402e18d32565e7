//! The shopping cart aggregate.
//!
//! A [`Cart`] owns its lines outright. Every mutation goes through `&mut self`
//! and re-prices shipping before returning, so [`Cart::shipping_cost`] always
//! matches the current lines and region.
//!
//! # Invariants
//!
//! - No two lines share a product ID.
//! - Every line has a quantity of at least 1. A line that would drop to zero
//!   is removed instead.
//! - Lines keep the order in which their products were first added.
//! - An empty cart ships for free.
//! - Subtotal plus the dearest price in the rate table fits in a `Decimal`,
//!   so totals stay exact in every region. A change that would break this
//!   is rejected and the cart is left as it was.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use techstore_core::{CurrencyCode, Price, ProductId, ShippingRegion};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::catalog::Product;
use crate::shipping::{Parcel, RateTable, ShippingQuote, ShippingTier};
use crate::weight::estimate_item_weight;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// A product was offered with a price below zero.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    /// A requested quantity does not fit in a cart line.
    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),
    /// The change would push the cart total past the largest representable amount.
    #[error("cart total overflows after changing product {0}")]
    AmountOverflow(ProductId),
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
        }
    }

    /// Unit price times quantity.
    ///
    /// Saturates at `Decimal::MAX`. Lines held by a [`Cart`] never reach it.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Estimated weight in kilograms of all units on this line.
    #[must_use]
    pub fn weight(&self) -> Decimal {
        estimate_item_weight(self.category.as_deref()) * Decimal::from(self.quantity)
    }
}

/// A cart mutation, as dispatched by UI events or replayed from a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CartAction {
    AddItem { product: Product },
    RemoveItem { product_id: ProductId },
    SetQuantity { product_id: ProductId, quantity: i64 },
    Clear,
    /// Region labels the store doesn't know are priced as Cairo.
    SetShippingRegion { region: String },
}

/// The shopping cart.
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    region: ShippingRegion,
    currency_code: CurrencyCode,
    shipping: ShippingQuote,
    rates: Arc<RateTable>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(
            Arc::new(RateTable::default()),
            ShippingRegion::default(),
            CurrencyCode::default(),
        )
    }
}

impl Cart {
    /// Create an empty cart priced with `rates`.
    #[must_use]
    pub fn new(rates: Arc<RateTable>, region: ShippingRegion, currency_code: CurrencyCode) -> Self {
        let shipping = rates.quote(Parcel::default(), region, currency_code);
        Self {
            lines: Vec::new(),
            region,
            currency_code,
            shipping,
            rates,
        }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line if the product is already in the cart,
    /// otherwise appends a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the product price is negative, the line is
    /// already at the maximum quantity, or the new total would overflow.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: &Product) -> Result<(), CartError> {
        if product.price.is_sign_negative() && !product.price.is_zero() {
            return Err(CartError::NegativePrice(product.id.clone()));
        }

        let previous = self.lines.clone();
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity = line
                .quantity
                .checked_add(1)
                .ok_or(CartError::QuantityTooLarge(i64::from(u32::MAX) + 1))?;
            debug!(quantity = line.quantity, "Incremented cart line");
        } else {
            self.lines.push(CartLine::from_product(product));
            debug!("Added cart line");
        }

        self.reprice_or_restore(previous, &product.id)
    }

    /// Remove the line for `product_id`. Missing products are ignored.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn remove_item(&mut self, product_id: &ProductId) {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        if self.lines.len() != before {
            debug!("Removed cart line");
        }
        self.reprice();
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity below 1 removes the line. Products not in the cart are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` does not fit in a `u32` or the new
    /// total would overflow. The cart is unchanged on error.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity < 1 {
            self.remove_item(product_id);
            return Ok(());
        }

        let quantity = u32::try_from(quantity).map_err(|_| CartError::QuantityTooLarge(quantity))?;
        let previous = self.lines.clone();
        let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) else {
            debug!("Ignoring quantity update for product not in cart");
            return Ok(());
        };
        line.quantity = quantity;
        debug!(quantity, "Updated cart line quantity");

        self.reprice_or_restore(previous, product_id)
    }

    /// Remove every line and reset shipping to zero.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.lines.clear();
        self.shipping = ShippingQuote {
            tier: None,
            region: self.region,
            cost: Price::zero(self.currency_code),
        };
        debug!("Cleared cart");
    }

    /// Change the shipping region and re-price shipping.
    #[instrument(skip(self))]
    pub fn set_shipping_region(&mut self, region: ShippingRegion) {
        self.region = region;
        self.reprice();
    }

    /// Apply a dispatched action.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Cart::add_item`] and [`Cart::set_quantity`].
    pub fn apply(&mut self, action: CartAction) -> Result<(), CartError> {
        match action {
            CartAction::AddItem { product } => self.add_item(&product)?,
            CartAction::RemoveItem { product_id } => self.remove_item(&product_id),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(&product_id, quantity)?,
            CartAction::Clear => self.clear(),
            CartAction::SetShippingRegion { region } => {
                self.set_shipping_region(ShippingRegion::from_label_or_default(&region));
            }
        }
        Ok(())
    }

    /// Re-price after a mutation. If the new total cannot be represented,
    /// put `previous` back and reject the change.
    fn reprice_or_restore(
        &mut self,
        previous: Vec<CartLine>,
        product_id: &ProductId,
    ) -> Result<(), CartError> {
        self.reprice();
        if self.checked_worst_case_total().is_some() {
            return Ok(());
        }

        warn!(product_id = %product_id, "Rejected cart change: total overflows");
        self.lines = previous;
        self.reprice();
        Err(CartError::AmountOverflow(product_id.clone()))
    }

    /// Subtotal plus the highest shipping price the table can charge, or
    /// `None` if any step overflows.
    fn checked_worst_case_total(&self) -> Option<Price> {
        let shipping = Price::new(self.rates.max_price(), self.currency_code);
        self.lines.iter().try_fold(shipping, |total, line| {
            let line_total =
                Price::new(line.unit_price, self.currency_code).checked_times(line.quantity)?;
            total.checked_add(line_total)
        })
    }

    fn reprice(&mut self) {
        self.shipping = self
            .rates
            .quote(self.parcel(), self.region, self.currency_code);
        debug!(
            region = %self.region,
            tier = ?self.shipping.tier,
            shipping_cost = %self.shipping.cost,
            "Re-priced shipping"
        );
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Estimated parcel weight in kilograms.
    #[must_use]
    pub fn total_weight(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::weight)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    fn parcel(&self) -> Parcel {
        Parcel {
            total_weight: self.total_weight(),
            item_count: self.item_count(),
        }
    }

    /// Sum of line totals, before shipping.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let amount = self
            .lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        Price::new(amount, self.currency_code)
    }

    #[must_use]
    pub const fn shipping_cost(&self) -> Price {
        self.shipping.cost
    }

    #[must_use]
    pub const fn shipping_region(&self) -> ShippingRegion {
        self.region
    }

    /// The tier shipping is priced at. `None` for an empty cart.
    #[must_use]
    pub const fn shipping_tier(&self) -> Option<ShippingTier> {
        self.shipping.tier
    }

    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total_with_shipping(&self) -> Price {
        Price::new(
            self.subtotal().amount.saturating_add(self.shipping.cost.amount),
            self.currency_code,
        )
    }

    /// A serialisable snapshot of the cart and its derived totals.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            lines: self.lines.clone(),
            item_count: self.item_count(),
            total_weight: self.total_weight(),
            subtotal: self.subtotal(),
            shipping: self.shipping,
            total: self.total_with_shipping(),
        }
    }
}

/// Cart contents with derived totals, for display or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub total_weight: Decimal,
    pub subtotal: Price,
    pub shipping: ShippingQuote,
    pub total: Price,
}
