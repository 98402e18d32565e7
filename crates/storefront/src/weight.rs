//! Per-category parcel weight estimates.
//!
//! Products carry no shipping weight in the catalog, so the cart estimates
//! one from the product category. Weights are kept as decimals so that the
//! tier thresholds compare exactly.

use rust_decimal::Decimal;

/// Estimated weight in kilograms for categories we don't recognise.
pub const DEFAULT_WEIGHT_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Known category weights in tenths of a kilogram.
const CATEGORY_WEIGHTS: &[(&str, i64)] = &[
    ("Keyboards", 12),
    ("Mice", 3),
    ("Headphones", 4),
    ("Cables", 2),
    ("Adapters", 1),
    ("Memory", 1),
    ("Storage", 3),
    ("Networking", 5),
    ("Accessories", 3),
    ("Gaming", 8),
    ("Cleaning", 4),
    ("Power", 6),
    ("Speakers", 15),
    ("Webcams", 4),
];

/// Estimated weight in kilograms of one unit in `category`.
///
/// Category names match exactly as the catalog spells them; a missing or
/// unknown category weighs [`DEFAULT_WEIGHT_KG`].
#[must_use]
pub fn estimate_item_weight(category: Option<&str>) -> Decimal {
    category
        .and_then(|name| CATEGORY_WEIGHTS.iter().find(|(known, _)| *known == name))
        .map_or(DEFAULT_WEIGHT_KG, |(_, tenths)| Decimal::new(*tenths, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories() {
        assert_eq!(estimate_item_weight(Some("Keyboards")), Decimal::new(12, 1));
        assert_eq!(estimate_item_weight(Some("Speakers")), Decimal::new(15, 1));
        assert_eq!(estimate_item_weight(Some("Memory")), Decimal::new(1, 1));
    }

    #[test]
    fn test_unknown_and_missing_fall_back() {
        assert_eq!(estimate_item_weight(Some("Drones")), Decimal::new(5, 1));
        assert_eq!(estimate_item_weight(None), Decimal::new(5, 1));
        assert_eq!(DEFAULT_WEIGHT_KG, Decimal::new(5, 1));
    }

    #[test]
    fn test_match_is_exact() {
        assert_eq!(estimate_item_weight(Some("keyboards")), DEFAULT_WEIGHT_KG);
    }
}
