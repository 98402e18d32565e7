//! Integration tests for checkout: form, order payload, payment, settlement.

use rust_decimal::Decimal;
use techstore_core::{OrderId, PaymentMethod, ShippingRegion, UserId};
use techstore_integration_tests::product;
use techstore_storefront::Cart;
use techstore_storefront::checkout::{
    CheckoutError, CheckoutField, CheckoutForm, Customer, NextStep, OrderDraft, PaymentRequest,
    ValidationMessage, after_submit, confirm_payment,
};

fn customer() -> Customer {
    Customer {
        id: UserId::new("6650aa01"),
        name: "Youssef Adel Mahmoud".to_string(),
        email: Some("youssef@example.org".to_string()),
        phone: Some("01234567890".to_string()),
    }
}

fn filled_form(payment_method: PaymentMethod) -> CheckoutForm {
    let mut form = CheckoutForm {
        city: "Mansoura".to_string(),
        address: "5 Gomhoreya St, floor 3".to_string(),
        postal_code: "35511".to_string(),
        payment_method,
        ..CheckoutForm::default()
    };
    form.prefill(&customer());
    form
}

fn delta_cart() -> Cart {
    let mut cart = Cart::default();
    cart.set_shipping_region(ShippingRegion::Delta);
    cart.add_item(&product("kb-1", 1850, "Keyboards")).unwrap();
    cart.add_item(&product("ms-1", 420, "Mice")).unwrap();
    cart
}

#[test]
fn test_prefilled_form_validates() {
    let form = filled_form(PaymentMethod::CashOnDelivery);
    assert_eq!(form.first_name, "Youssef");
    assert_eq!(form.last_name, "Adel Mahmoud");

    let checkout = form.validate().unwrap();
    assert_eq!(checkout.email.as_str(), "youssef@example.org");
}

#[test]
fn test_profile_with_bad_phone_is_caught() {
    let mut form = filled_form(PaymentMethod::CashOnDelivery);
    form.phone = "+201234567890".to_string();
    let errors = form.validate().unwrap_err();
    assert_eq!(
        errors.get(CheckoutField::Phone),
        Some(ValidationMessage::InvalidPhone)
    );
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_cash_on_delivery_flow() {
    let mut cart = delta_cart();
    let checkout = filled_form(PaymentMethod::CashOnDelivery).validate().unwrap();

    let draft = OrderDraft::build(&customer(), &cart, &checkout).unwrap();
    assert_eq!(draft.subtotal, Decimal::from(2270));
    // 1.2 + 0.3 kg, two items: standard Delta delivery
    assert_eq!(draft.shipping_cost, Decimal::from(91));
    assert_eq!(draft.total_price, Decimal::from(2361));
    assert_eq!(draft.shipping_location, ShippingRegion::Delta);
    assert_eq!(draft.order_items.len(), 2);

    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(json["shippingLocation"], "Delta");
    assert_eq!(json["shippingAddress"]["city"], "Mansoura");

    let step = after_submit(&mut cart, OrderId::new("ord-1"), checkout.payment_method);
    assert!(matches!(step, NextStep::Completed { .. }));
    assert!(cart.is_empty());
    assert!(cart.shipping_cost().is_zero());
}

#[test]
fn test_card_payment_flow() {
    let mut cart = delta_cart();
    let checkout = filled_form(PaymentMethod::CreditCard).validate().unwrap();

    let draft = OrderDraft::build(&customer(), &cart, &checkout).unwrap();
    let order_id = OrderId::new("ord-2");
    let request = PaymentRequest::build(order_id.clone(), &customer(), &cart, &checkout).unwrap();
    assert_eq!(request.amount, draft.total_price);
    assert_eq!(request.customer.phone_number, "+201234567890");
    assert_eq!(request.items[0].description, "A fine piece of Keyboards");

    let NextStep::AwaitPayment(pending) =
        after_submit(&mut cart, order_id.clone(), checkout.payment_method)
    else {
        panic!("card orders must wait for payment");
    };
    assert_eq!(pending.order_id, order_id);

    // Polling before the gateway confirms leaves the cart alone
    assert!(confirm_payment(&mut cart, &pending, false).is_none());
    assert_eq!(cart.item_count(), 2);

    let done = confirm_payment(&mut cart, &pending, true).unwrap();
    assert_eq!(done, NextStep::Completed { order_id });
    assert!(cart.is_empty());
}

#[test]
fn test_cannot_order_empty_cart() {
    let checkout = filled_form(PaymentMethod::CashOnDelivery).validate().unwrap();
    let cart = Cart::default();
    assert_eq!(
        OrderDraft::build(&customer(), &cart, &checkout),
        Err(CheckoutError::EmptyCart)
    );
    assert_eq!(
        PaymentRequest::build(OrderId::new("o"), &customer(), &cart, &checkout),
        Err(CheckoutError::EmptyCart)
    );
}
