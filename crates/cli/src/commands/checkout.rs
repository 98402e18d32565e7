//! Validate a checkout form and, given a cart script, build the order payload.

use std::path::Path;

use techstore_core::UserId;
use techstore_storefront::StorefrontConfig;
use techstore_storefront::checkout::{CheckoutForm, Customer, OrderDraft};
use tracing::{error, info};

use super::{print_json, quote, read_yaml};

/// Validate the form at `form_path`.
///
/// With a cart script, also build and print the order draft for `user_id`.
///
/// # Errors
///
/// Returns an error if the form is invalid, the script fails, or the order
/// cannot be built.
pub fn run(
    config: &StorefrontConfig,
    form_path: &Path,
    cart_script: Option<&Path>,
    user_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let form: CheckoutForm = read_yaml(form_path)?;

    let checkout = match form.validate() {
        Ok(checkout) => checkout,
        Err(errors) => {
            error!("Checkout form is invalid:");
            for (field, message) in errors.iter() {
                error!("  - {field}: {}", message.key());
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };
    info!(payment_method = %checkout.payment_method, "Checkout form is valid");

    let Some(script) = cart_script else {
        return Ok(());
    };

    let cart = quote::replay(config, script, None)?;
    let customer = Customer {
        id: UserId::new(user_id),
        name: format!("{} {}", checkout.first_name, checkout.last_name),
        email: Some(checkout.email.to_string()),
        phone: Some(checkout.phone.to_string()),
    };
    let draft = OrderDraft::build(&customer, &cart, &checkout)?;
    print_json(&draft)?;
    Ok(())
}
