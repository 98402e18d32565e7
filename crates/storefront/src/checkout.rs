//! Checkout form validation and order payload assembly.
//!
//! Checkout runs in three steps:
//!
//! 1. [`CheckoutForm::validate`] checks the shipping form and returns a
//!    [`ValidatedCheckout`], or every field error at once.
//! 2. [`OrderDraft::build`] turns the cart and form into the order payload
//!    the backend expects. For card payments, [`PaymentRequest::build`] then
//!    builds the hosted-payment request for the created order.
//! 3. [`after_submit`] settles the cart. Cash-on-delivery orders clear it
//!    straight away. Card orders keep it until [`confirm_payment`] sees the
//!    order marked paid.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use techstore_core::{
    Email, OrderId, OrderStatus, PaymentMethod, PhoneNumber, ShippingRegion, UserId,
    phone::normalize_international,
};
use thiserror::Error;
use tracing::{info, instrument};

use crate::cart::Cart;
use crate::validation::{FieldErrors, required};

/// Postal code sent when the customer leaves it blank.
pub const DEFAULT_POSTAL_CODE: &str = "00000";

/// Country name on order shipping addresses.
pub const ORDER_COUNTRY: &str = "Egypt";

/// ISO 3166 alpha-3 country code the payment gateway expects.
pub const PAYMENT_COUNTRY: &str = "EGY";

/// Errors that stop an order from being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,
    #[error("checkout form is invalid: {0}")]
    Validation(ValidationErrors),
}

/// Checkout form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
    FirstName,
    LastName,
    Phone,
    Email,
    City,
    Address,
    PostalCode,
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::City => "city",
            Self::Address => "address",
            Self::PostalCode => "postalCode",
        };
        f.write_str(name)
    }
}

/// Why a field failed validation. Serialises to the translation key the UI
/// shows under the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationMessage {
    #[serde(rename = "validation.required")]
    Required,
    #[serde(rename = "validation.invalid_phone")]
    InvalidPhone,
    #[serde(rename = "validation.invalid_email")]
    InvalidEmail,
}

impl ValidationMessage {
    /// Translation key for the message.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Required => "validation.required",
            Self::InvalidPhone => "validation.invalid_phone",
            Self::InvalidEmail => "validation.invalid_email",
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Every failing checkout field with its message.
pub type ValidationErrors = FieldErrors<CheckoutField, ValidationMessage>;

/// A signed-in customer, as returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Raw checkout form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub area: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub payment_method: PaymentMethod,
}

/// A checkout form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub first_name: String,
    pub last_name: String,
    pub phone: PhoneNumber,
    pub email: Email,
    pub city: String,
    pub area: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Fill contact fields from the signed-in customer's profile.
    ///
    /// The first word of the display name becomes the first name and the
    /// rest the last name.
    pub fn prefill(&mut self, customer: &Customer) {
        let mut words = customer.name.split_whitespace();
        self.first_name = words.next().unwrap_or_default().to_owned();
        self.last_name = words.collect::<Vec<_>>().join(" ");
        self.email = customer.email.clone().unwrap_or_default();
        self.phone = customer.phone.clone().unwrap_or_default();
    }

    /// Validate every field, collecting all errors.
    ///
    /// # Errors
    ///
    /// Returns the failing fields if any required field is blank, the phone
    /// is not an `01XXXXXXXXX` mobile number, or the email is malformed.
    pub fn validate(&self) -> Result<ValidatedCheckout, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let mut present = |field, value: &str| {
            required(&mut errors, field, value, ValidationMessage::Required)
        };
        let first_name = present(CheckoutField::FirstName, &self.first_name);
        let last_name = present(CheckoutField::LastName, &self.last_name);
        let city = present(CheckoutField::City, &self.city);
        let address = present(CheckoutField::Address, &self.address);
        let postal_code = present(CheckoutField::PostalCode, &self.postal_code);
        let phone = present(CheckoutField::Phone, &self.phone);
        let email = present(CheckoutField::Email, &self.email);

        let phone = phone.and_then(|raw| {
            PhoneNumber::parse(&raw)
                .map_err(|_| errors.insert(CheckoutField::Phone, ValidationMessage::InvalidPhone))
                .ok()
        });
        let email = email.and_then(|raw| {
            Email::parse(&raw)
                .map_err(|_| errors.insert(CheckoutField::Email, ValidationMessage::InvalidEmail))
                .ok()
        });

        match (first_name, last_name, phone, email, city, address, postal_code) {
            (
                Some(first_name),
                Some(last_name),
                Some(phone),
                Some(email),
                Some(city),
                Some(address),
                Some(postal_code),
            ) if errors.is_empty() => Ok(ValidatedCheckout {
                first_name,
                last_name,
                phone,
                email,
                city,
                area: self
                    .area
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_owned),
                address,
                postal_code,
                payment_method: self.payment_method,
            }),
            _ => Err(errors),
        }
    }
}

/// Truncate to at most `max` characters without splitting a character.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn postal_code_or_default(postal_code: &str) -> String {
    let trimmed = postal_code.trim();
    if trimmed.is_empty() {
        DEFAULT_POSTAL_CODE.to_owned()
    } else {
        trimmed.to_owned()
    }
}

// =============================================================================
// Order payload
// =============================================================================

/// One line of an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product: String,
    pub name: String,
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub qty: u32,
}

/// Shipping address on an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// The body posted to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub user: UserId,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub shipping_location: ShippingRegion,
    pub status: OrderStatus,
}

impl OrderDraft {
    /// Build the order payload from the cart and a validated form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    #[instrument(skip_all, fields(user_id = %customer.id))]
    pub fn build(
        customer: &Customer,
        cart: &Cart,
        form: &ValidatedCheckout,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order_items = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                product: line.product_id.to_string(),
                name: line.name.clone(),
                image: line.image.clone(),
                price: line.unit_price,
                qty: line.quantity,
            })
            .collect();

        let draft = Self {
            user: customer.id.clone(),
            order_items,
            shipping_address: ShippingAddress {
                address: form.address.clone(),
                city: form.city.clone(),
                postal_code: postal_code_or_default(&form.postal_code),
                country: ORDER_COUNTRY.to_owned(),
            },
            payment_method: form.payment_method,
            subtotal: cart.subtotal().amount,
            shipping_cost: cart.shipping_cost().amount,
            total_price: cart.total_with_shipping().amount,
            shipping_location: cart.shipping_region(),
            status: OrderStatus::Pending,
        };

        info!(
            lines = draft.order_items.len(),
            total = %draft.total_price,
            payment_method = %draft.payment_method,
            "Built order draft"
        );
        Ok(draft)
    }
}

// =============================================================================
// Card payment payload
// =============================================================================

/// Field length limits imposed by the payment gateway.
mod limits {
    pub const ITEM_NAME: usize = 50;
    pub const ITEM_DESCRIPTION: usize = 100;
    pub const PERSON_NAME: usize = 30;
    pub const STREET: usize = 100;
    pub const CITY: usize = 30;
    pub const AREA: usize = 30;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItem {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentAddress {
    pub street: String,
    pub city: String,
    pub area: String,
    pub postal_code: String,
    pub country: String,
}

/// The body posted to start a hosted card payment for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub items: Vec<PaymentItem>,
    pub customer: PaymentCustomer,
    #[serde(rename = "shipping_address")]
    pub shipping_address: PaymentAddress,
}

impl PaymentRequest {
    /// Build the payment request for an order the backend already created.
    ///
    /// Text fields are cut to the gateway's limits and the phone number is
    /// sent in `+20` form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    #[instrument(skip_all, fields(order_id = %order_id))]
    pub fn build(
        order_id: OrderId,
        customer: &Customer,
        cart: &Cart,
        form: &ValidatedCheckout,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let items = cart
            .lines()
            .iter()
            .map(|line| PaymentItem {
                name: truncate_chars(&line.name, limits::ITEM_NAME),
                description: truncate_chars(
                    line.description
                        .as_deref()
                        .filter(|d| !d.is_empty())
                        .unwrap_or(&line.name),
                    limits::ITEM_DESCRIPTION,
                ),
                price: line.unit_price,
                quantity: line.quantity,
                product_id: line.product_id.to_string(),
            })
            .collect();

        Ok(Self {
            amount: cart.total_with_shipping().amount,
            order_id,
            user_id: customer.id.clone(),
            items,
            customer: PaymentCustomer {
                first_name: truncate_chars(&form.first_name, limits::PERSON_NAME),
                last_name: truncate_chars(&form.last_name, limits::PERSON_NAME),
                email: form.email.to_string(),
                phone_number: normalize_international(form.phone.as_str()),
            },
            shipping_address: PaymentAddress {
                street: truncate_chars(&form.address, limits::STREET),
                city: truncate_chars(&form.city, limits::CITY),
                area: form
                    .area
                    .as_deref()
                    .map(|a| truncate_chars(a, limits::AREA))
                    .unwrap_or_default(),
                postal_code: postal_code_or_default(&form.postal_code),
                country: PAYMENT_COUNTRY.to_owned(),
            },
        })
    }
}

// =============================================================================
// After submission
// =============================================================================

/// A card order waiting for the gateway to report payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub order_id: OrderId,
    pub started_at: DateTime<Utc>,
}

/// What the storefront does once the backend accepted an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// The order is complete; show the success page.
    Completed { order_id: OrderId },
    /// Send the customer to the payment page and poll the order status.
    AwaitPayment(PendingOrder),
}

/// Settle the cart after the backend created `order_id`.
///
/// Cash-on-delivery orders are complete, so the cart is cleared. Card orders
/// leave the cart untouched until payment is confirmed.
#[instrument(skip(cart))]
pub fn after_submit(cart: &mut Cart, order_id: OrderId, payment_method: PaymentMethod) -> NextStep {
    match payment_method {
        PaymentMethod::CashOnDelivery => {
            cart.clear();
            info!("Cash on delivery order placed");
            NextStep::Completed { order_id }
        }
        PaymentMethod::CreditCard => {
            info!("Awaiting card payment");
            NextStep::AwaitPayment(PendingOrder {
                order_id,
                started_at: Utc::now(),
            })
        }
    }
}

/// Handle a payment status poll for a pending card order.
///
/// Returns the completed step and clears the cart once the order is paid.
/// Returns `None` while payment is still outstanding.
#[instrument(skip(cart, pending), fields(order_id = %pending.order_id))]
pub fn confirm_payment(cart: &mut Cart, pending: &PendingOrder, is_paid: bool) -> Option<NextStep> {
    if !is_paid {
        return None;
    }
    cart.clear();
    info!("Card payment confirmed");
    Some(NextStep::Completed {
        order_id: pending.order_id.clone(),
    })
}
