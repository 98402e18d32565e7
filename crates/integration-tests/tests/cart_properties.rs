//! Property-based tests for cart invariants.
//!
//! These tests verify invariants that should hold for all inputs,
//! not just specific test cases.

use proptest::prelude::*;
use rust_decimal::Decimal;
use techstore_core::{ProductId, ShippingRegion};
use techstore_integration_tests::product;
use techstore_storefront::{Cart, CartAction};

const CATEGORIES: &[&str] = &[
    "Keyboards", "Mice", "Speakers", "Cables", "Gaming", "Power", "Unknown",
];

fn region_strategy() -> impl Strategy<Value = ShippingRegion> {
    prop::sample::select(ShippingRegion::ALL.to_vec())
}

fn action_strategy() -> impl Strategy<Value = CartAction> {
    let id = prop::sample::select(vec!["a", "b", "c", "d"]);
    let category = prop::sample::select(CATEGORIES.to_vec());
    prop_oneof![
        4 => (id.clone(), 0..5000i64, category).prop_map(|(id, price, category)| {
            CartAction::AddItem { product: product(id, price, category) }
        }),
        1 => id.clone().prop_map(|id| CartAction::RemoveItem { product_id: ProductId::new(id) }),
        2 => (id, -3..12i64).prop_map(|(id, quantity)| CartAction::SetQuantity {
            product_id: ProductId::new(id),
            quantity,
        }),
        1 => Just(CartAction::Clear),
        1 => region_strategy().prop_map(|r| CartAction::SetShippingRegion { region: r.to_string() }),
    ]
}

proptest! {
    /// Property: N adds of the same product give quantity N
    #[test]
    fn test_repeated_adds_count_up(n in 1u32..60, category in prop::sample::select(CATEGORIES.to_vec())) {
        let mut cart = Cart::default();
        let item = product("p", 100, category);
        for _ in 0..n {
            cart.add_item(&item).unwrap();
        }
        prop_assert_eq!(cart.lines().len(), 1);
        prop_assert_eq!(cart.line(&item.id).unwrap().quantity, n);
    }

    /// Property: removing then re-adding restarts at quantity 1
    #[test]
    fn test_remove_then_add_restarts(n in 1i64..50) {
        let mut cart = Cart::default();
        let item = product("p", 100, "Mice");
        cart.add_item(&item).unwrap();
        cart.set_quantity(&item.id, n).unwrap();
        cart.remove_item(&item.id);
        cart.add_item(&item).unwrap();
        prop_assert_eq!(cart.line(&item.id).unwrap().quantity, 1);
    }

    /// Property: structural invariants survive any action sequence
    #[test]
    fn test_invariants_hold(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let mut cart = Cart::default();
        for action in actions {
            cart.apply(action).unwrap();

            let mut ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
            let len = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), len, "duplicate product lines");
            prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));

            if cart.is_empty() {
                prop_assert!(cart.shipping_cost().is_zero());
            } else {
                prop_assert!(cart.shipping_cost().amount > Decimal::ZERO);
            }
            prop_assert_eq!(
                cart.total_with_shipping().amount,
                cart.subtotal().amount + cart.shipping_cost().amount
            );
        }
    }

    /// Property: for a fixed region, shipping never gets cheaper as weight grows
    #[test]
    fn test_shipping_monotonic_in_weight(
        region in region_strategy(),
        category in prop::sample::select(CATEGORIES.to_vec()),
    ) {
        let mut cart = Cart::default();
        cart.set_shipping_region(region);
        let item = product("p", 10, category);
        cart.add_item(&item).unwrap();

        let mut previous = cart.shipping_cost().amount;
        for quantity in 2..=40 {
            cart.set_quantity(&item.id, quantity).unwrap();
            let cost = cart.shipping_cost().amount;
            prop_assert!(cost >= previous, "cost fell from {} to {} at qty {}", previous, cost, quantity);
            previous = cost;
        }
    }

    /// Property: every change the cart accepts leaves totals exact, and a
    /// rejected change leaves the cart untouched
    #[test]
    fn test_accepted_changes_stay_priceable(
        steps in prop::collection::vec(
            (
                prop::sample::select(vec!["a", "b", "c"]),
                0..i64::MAX,
                1..=i64::from(u32::MAX),
                region_strategy(),
            ),
            1..20,
        ),
    ) {
        let mut cart = Cart::default();
        for (id, price, quantity, region) in steps {
            let item = product(id, price, "Mice");

            let before = cart.summary();
            if cart.add_item(&item).is_err() {
                prop_assert_eq!(cart.summary(), before);
            }
            let before = cart.summary();
            if cart.set_quantity(&item.id, quantity).is_err() {
                prop_assert_eq!(cart.summary(), before);
            }
            cart.set_shipping_region(region);

            let exact_subtotal = cart.lines().iter().try_fold(Decimal::ZERO, |sum, line| {
                sum.checked_add(line.unit_price.checked_mul(Decimal::from(line.quantity))?)
            });
            prop_assert_eq!(exact_subtotal, Some(cart.subtotal().amount));
            prop_assert_eq!(
                cart.subtotal().amount.checked_add(cart.shipping_cost().amount),
                Some(cart.total_with_shipping().amount)
            );
        }
    }

    /// Property: clear empties the cart whatever came before
    #[test]
    fn test_clear_resets(actions in prop::collection::vec(action_strategy(), 0..30)) {
        let mut cart = Cart::default();
        for action in actions {
            cart.apply(action).unwrap();
        }
        cart.clear();
        prop_assert!(cart.lines().is_empty());
        prop_assert!(cart.shipping_cost().is_zero());
        prop_assert!(cart.subtotal().is_zero());
    }
}
