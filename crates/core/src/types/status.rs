//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Progress of a remote fetch mirrored into client state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl FetchStatus {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Status sent with a new order. The backend moves it on from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    /// Online card payment through the hosted payment page.
    CreditCard,
    #[default]
    CashOnDelivery,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreditCard => write!(f, "creditCard"),
            Self::CashOnDelivery => write!(f, "cashOnDelivery"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FetchStatus::Succeeded).unwrap(),
            "\"succeeded\""
        );
        assert_eq!(FetchStatus::default(), FetchStatus::Idle);
    }

    #[test]
    fn test_payment_method_display_matches_serde() {
        for method in [PaymentMethod::CreditCard, PaymentMethod::CashOnDelivery] {
            assert_eq!(
                serde_json::to_string(&method).unwrap(),
                format!("\"{method}\"")
            );
        }
        assert!(serde_json::from_str::<PaymentMethod>("\"bitcoin\"").is_err());
    }

    #[test]
    fn test_order_status_default_is_pending() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::default()).unwrap(),
            "\"pending\""
        );
    }
}
