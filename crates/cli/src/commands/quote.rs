//! Replay a cart action script and report the resulting totals.
//!
//! # Script format
//!
//! ```yaml
//! - action: addItem
//!   product: { _id: k1, name: Mechanical Keyboard, price: 1850, category: Keyboards }
//! - action: addItem
//!   product: { _id: m1, name: Wireless Mouse, price: "420.50", category: Mice }
//! - action: setQuantity
//!   productId: m1
//!   quantity: 3
//! - action: setShippingRegion
//!   region: Delta
//! ```

use std::path::Path;

use techstore_core::ShippingRegion;
use techstore_storefront::{Cart, CartAction, StorefrontConfig};
use tracing::{debug, info};

use super::{print_json, read_yaml};

/// Load a script and replay it on a fresh cart.
///
/// # Errors
///
/// Returns an error if the script cannot be read or an action is rejected.
pub fn replay(
    config: &StorefrontConfig,
    script: &Path,
    region: Option<ShippingRegion>,
) -> Result<Cart, Box<dyn std::error::Error>> {
    let actions: Vec<CartAction> = read_yaml(script)?;
    info!(path = %script.display(), actions = actions.len(), "Replaying cart script");

    let mut cart = config.new_cart();
    if let Some(region) = region {
        cart.set_shipping_region(region);
    }

    for (index, action) in actions.into_iter().enumerate() {
        debug!(index, ?action, "Applying action");
        cart.apply(action)
            .map_err(|e| format!("action #{} failed: {e}", index + 1))?;
    }

    Ok(cart)
}

/// Replay `script` and print the summary.
///
/// # Errors
///
/// Returns an error if the script cannot be replayed or output fails.
pub fn run(
    config: &StorefrontConfig,
    script: &Path,
    region: Option<ShippingRegion>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let cart = replay(config, script, region)?;

    if json {
        print_json(&cart.summary())?;
        return Ok(());
    }

    info!("Cart quote");
    info!("==========");
    for line in cart.lines() {
        info!(
            "  {} x{} @ {} = {}",
            line.name,
            line.quantity,
            line.unit_price,
            line.line_total()
        );
    }
    info!("Items: {} ({} kg est.)", cart.item_count(), cart.total_weight());
    info!("Subtotal: {}", cart.subtotal());
    match cart.shipping_tier() {
        Some(tier) => info!(
            "Shipping ({}, {tier:?}): {}",
            cart.shipping_region(),
            cart.shipping_cost()
        ),
        None => info!("Shipping: {}", cart.shipping_cost()),
    }
    info!("Total: {}", cart.total_with_shipping());
    Ok(())
}
