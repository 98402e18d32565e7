//! Shipping regions and the governorates that belong to them.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A courier shipping zone. Each zone has a flat price per service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ShippingRegion {
    /// Greater Cairo, including Giza.
    #[default]
    Cairo,
    Alexandria,
    /// Delta and Suez Canal governorates.
    Delta,
    /// Upper Egypt and the Red Sea coast.
    UpperEgypt,
}

/// Returned when a region label is not one of the known zones.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown shipping region: {0}")]
pub struct UnknownRegion(pub String);

/// Governorates served at Delta prices.
const DELTA_GOVERNORATES: &[&str] = &[
    "Dakahlia",
    "Sharqia",
    "Gharbia",
    "Monufia",
    "Qalyubia",
    "Ismailia",
    "Suez",
    "PortSaid",
    "Damietta",
    "Beheira",
    "KafrElSheikh",
];

impl ShippingRegion {
    /// All regions in display order.
    pub const ALL: [Self; 4] = [Self::Cairo, Self::Alexandria, Self::Delta, Self::UpperEgypt];

    /// The identifier used by the API and in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cairo => "Cairo",
            Self::Alexandria => "Alexandria",
            Self::Delta => "Delta",
            Self::UpperEgypt => "UpperEgypt",
        }
    }

    /// Customer-facing Arabic label for the region picker.
    #[must_use]
    pub const fn label_ar(&self) -> &'static str {
        match self {
            Self::Cairo => "القاهرة والجيزة",
            Self::Alexandria => "الإسكندرية",
            Self::Delta => "الدلتا والقناة",
            Self::UpperEgypt => "الصعيد والبحر الأحمر",
        }
    }

    /// Resolve a free-form label, falling back to Cairo when unrecognised.
    ///
    /// Client state can carry stale or hand-edited region strings; those
    /// are priced as Cairo rather than rejected.
    #[must_use]
    pub fn from_label_or_default(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    /// Map a governorate name to its shipping region.
    ///
    /// Cairo and Giza ship at Cairo prices, Alexandria at its own, the Delta
    /// and Canal governorates at Delta prices, and everything else at Upper
    /// Egypt prices. Matching ignores case, spaces and hyphens.
    #[must_use]
    pub fn for_governorate(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "cairo" | "giza" => Self::Cairo,
            "alexandria" => Self::Alexandria,
            _ if DELTA_GOVERNORATES
                .iter()
                .any(|g| g.to_lowercase() == key) =>
            {
                Self::Delta
            }
            _ => Self::UpperEgypt,
        }
    }
}

impl fmt::Display for ShippingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingRegion {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRegion(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "upperegypt".parse::<ShippingRegion>().unwrap(),
            ShippingRegion::UpperEgypt
        );
        assert_eq!(" Delta ".parse::<ShippingRegion>().unwrap(), ShippingRegion::Delta);
        assert!("Mars".parse::<ShippingRegion>().is_err());
    }

    #[test]
    fn test_unknown_label_falls_back_to_cairo() {
        assert_eq!(
            ShippingRegion::from_label_or_default("Atlantis"),
            ShippingRegion::Cairo
        );
        assert_eq!(
            ShippingRegion::from_label_or_default("Alexandria"),
            ShippingRegion::Alexandria
        );
    }

    #[test]
    fn test_governorate_mapping() {
        assert_eq!(ShippingRegion::for_governorate("Giza"), ShippingRegion::Cairo);
        assert_eq!(
            ShippingRegion::for_governorate("Alexandria"),
            ShippingRegion::Alexandria
        );
        assert_eq!(ShippingRegion::for_governorate("Port Said"), ShippingRegion::Delta);
        assert_eq!(
            ShippingRegion::for_governorate("kafr-el-sheikh"),
            ShippingRegion::Delta
        );
        assert_eq!(ShippingRegion::for_governorate("Aswan"), ShippingRegion::UpperEgypt);
        assert_eq!(
            ShippingRegion::for_governorate("Red Sea"),
            ShippingRegion::UpperEgypt
        );
    }

    #[test]
    fn test_serde_uses_api_identifiers() {
        let json = serde_json::to_string(&ShippingRegion::UpperEgypt).unwrap();
        assert_eq!(json, "\"UpperEgypt\"");
    }
}
