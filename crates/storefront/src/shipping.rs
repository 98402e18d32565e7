//! Courier price list and shipping tier selection.
//!
//! The courier charges a flat price per (service, region). Cart shipping uses
//! three of those services, picked by the parcel's estimated weight and item
//! count:
//!
//! | Tier | Condition | Service |
//! |------|-----------|---------|
//! | Heavy | weight > 5 kg | `heavyPackages` |
//! | Light | more than 3 items, or weight > 2 kg | `lightPackages` |
//! | Standard | otherwise | `delivery` |
//!
//! Conditions are checked top to bottom, so a 6 kg single item is Heavy.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use techstore_core::{CurrencyCode, Price, ShippingRegion};
use thiserror::Error;

/// Above this many kilograms a parcel ships as Heavy.
pub const HEAVY_THRESHOLD_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Above this many kilograms a parcel ships at least as Light.
pub const LIGHT_THRESHOLD_KG: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Above this many units a parcel ships at least as Light.
pub const LIGHT_ITEM_COUNT: u32 = 3;

/// Errors from loading or validating a [`RateTable`].
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("failed to read rate table {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse rate table: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("rate table is missing the {0} service")]
    MissingService(ServiceKind),
    #[error("{0} has no Cairo price to fall back on")]
    MissingCairoPrice(ServiceKind),
    #[error("{service} price for {region} is negative")]
    NegativePrice {
        service: ServiceKind,
        region: ShippingRegion,
    },
    #[error("tier prices for {region} decrease as parcels get heavier")]
    NotMonotonic { region: ShippingRegion },
}

/// Parcel size class used to pick a courier service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingTier {
    Standard,
    Light,
    Heavy,
}

impl ShippingTier {
    /// Classify a parcel by estimated weight (kg) and unit count.
    #[must_use]
    pub fn classify(total_weight: Decimal, item_count: u32) -> Self {
        if total_weight > HEAVY_THRESHOLD_KG {
            Self::Heavy
        } else if item_count > LIGHT_ITEM_COUNT || total_weight > LIGHT_THRESHOLD_KG {
            Self::Light
        } else {
            Self::Standard
        }
    }

    /// The courier service that prices this tier.
    #[must_use]
    pub const fn service(self) -> ServiceKind {
        match self {
            Self::Standard => ServiceKind::Delivery,
            Self::Light => ServiceKind::LightPackages,
            Self::Heavy => ServiceKind::HeavyPackages,
        }
    }
}

/// One column of the courier's price list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceKind {
    Delivery,
    ReturnToSource,
    CustomerReturns,
    Exchange,
    LightPackages,
    HeavyPackages,
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Delivery => "delivery",
            Self::ReturnToSource => "returnToSource",
            Self::CustomerReturns => "customerReturns",
            Self::Exchange => "exchange",
            Self::LightPackages => "lightPackages",
            Self::HeavyPackages => "heavyPackages",
        };
        f.write_str(name)
    }
}

type ServicePrices = BTreeMap<ShippingRegion, Decimal>;

/// Flat courier prices per service and region.
///
/// Every service in the table has a Cairo price, and lookups for a region
/// without its own entry use it. Tier prices never decrease from Standard
/// to Light to Heavy within a region. Both rules are checked whenever a
/// table is built, so lookups cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<ServiceKind, ServicePrices>", into = "BTreeMap<ServiceKind, ServicePrices>")]
pub struct RateTable {
    prices: BTreeMap<ServiceKind, ServicePrices>,
}

impl Default for RateTable {
    /// The courier's published price list, in EGP.
    fn default() -> Self {
        use ShippingRegion::{Alexandria, Cairo, Delta, UpperEgypt};

        let rows: [(ServiceKind, [i64; 4]); 6] = [
            (ServiceKind::Delivery, [80, 85, 91, 116]),
            (ServiceKind::ReturnToSource, [70, 70, 70, 70]),
            (ServiceKind::CustomerReturns, [90, 90, 90, 90]),
            (ServiceKind::Exchange, [95, 100, 106, 131]),
            (ServiceKind::LightPackages, [180, 185, 191, 216]),
            (ServiceKind::HeavyPackages, [430, 480, 540, 790]),
        ];

        let prices = rows
            .into_iter()
            .map(|(service, [cairo, alexandria, delta, upper])| {
                let by_region = BTreeMap::from([
                    (Cairo, Decimal::from(cairo)),
                    (Alexandria, Decimal::from(alexandria)),
                    (Delta, Decimal::from(delta)),
                    (UpperEgypt, Decimal::from(upper)),
                ]);
                (service, by_region)
            })
            .collect();

        Self { prices }
    }
}

impl TryFrom<BTreeMap<ServiceKind, ServicePrices>> for RateTable {
    type Error = RateTableError;

    fn try_from(prices: BTreeMap<ServiceKind, ServicePrices>) -> Result<Self, Self::Error> {
        let table = Self { prices };
        table.validate()?;
        Ok(table)
    }
}

impl From<RateTable> for BTreeMap<ServiceKind, ServicePrices> {
    fn from(table: RateTable) -> Self {
        table.prices
    }
}

impl RateTable {
    /// Parse a table from YAML.
    ///
    /// ```yaml
    /// delivery:      { Cairo: 80, Alexandria: 85 }
    /// lightPackages: { Cairo: 180 }
    /// heavyPackages: { Cairo: 430, UpperEgypt: 790 }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the table fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RateTableError> {
        let prices: BTreeMap<ServiceKind, ServicePrices> = serde_yaml::from_str(yaml)?;
        Self::try_from(prices)
    }

    /// Read and parse a YAML table from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the table is invalid.
    pub fn from_path(path: &Path) -> Result<Self, RateTableError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| RateTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    fn validate(&self) -> Result<(), RateTableError> {
        for tier in [ShippingTier::Standard, ShippingTier::Light, ShippingTier::Heavy] {
            if !self.prices.contains_key(&tier.service()) {
                return Err(RateTableError::MissingService(tier.service()));
            }
        }

        for (service, by_region) in &self.prices {
            if !by_region.contains_key(&ShippingRegion::Cairo) {
                return Err(RateTableError::MissingCairoPrice(*service));
            }
            if let Some((region, _)) = by_region.iter().find(|(_, p)| p.is_sign_negative() && !p.is_zero()) {
                return Err(RateTableError::NegativePrice {
                    service: *service,
                    region: *region,
                });
            }
        }

        for region in ShippingRegion::ALL {
            let standard = self.tier_price(ShippingTier::Standard, region);
            let light = self.tier_price(ShippingTier::Light, region);
            let heavy = self.tier_price(ShippingTier::Heavy, region);
            if standard > light || light > heavy {
                return Err(RateTableError::NotMonotonic { region });
            }
        }

        Ok(())
    }

    /// Price of `service` in `region`, or the Cairo price when the region
    /// has no entry. `None` only if the service is not in the table.
    #[must_use]
    pub fn price(&self, service: ServiceKind, region: ShippingRegion) -> Option<Decimal> {
        let by_region = self.prices.get(&service)?;
        by_region
            .get(&region)
            .or_else(|| by_region.get(&ShippingRegion::Cairo))
            .copied()
    }

    /// Price of a shipping tier in `region`.
    #[must_use]
    pub fn tier_price(&self, tier: ShippingTier, region: ShippingRegion) -> Decimal {
        // Tier services are guaranteed present by validation.
        self.price(tier.service(), region).unwrap_or(Decimal::ZERO)
    }

    /// The highest price of any service in any region.
    #[must_use]
    pub fn max_price(&self) -> Decimal {
        self.prices
            .values()
            .flat_map(BTreeMap::values)
            .copied()
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Services listed in the table.
    pub fn services(&self) -> impl Iterator<Item = ServiceKind> + '_ {
        self.prices.keys().copied()
    }

    /// Quote shipping for a parcel.
    ///
    /// An empty parcel ships for free and has no tier.
    #[must_use]
    pub fn quote(
        &self,
        parcel: Parcel,
        region: ShippingRegion,
        currency_code: CurrencyCode,
    ) -> ShippingQuote {
        if parcel.item_count == 0 {
            return ShippingQuote {
                tier: None,
                region,
                cost: Price::zero(currency_code),
            };
        }

        let tier = ShippingTier::classify(parcel.total_weight, parcel.item_count);
        ShippingQuote {
            tier: Some(tier),
            region,
            cost: Price::new(self.tier_price(tier, region), currency_code),
        }
    }
}

/// Aggregate size of everything being shipped together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parcel {
    /// Estimated weight in kilograms.
    pub total_weight: Decimal,
    /// Number of units, counting quantities.
    pub item_count: u32,
}

/// The result of pricing a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShippingQuote {
    pub tier: Option<ShippingTier>,
    pub region: ShippingRegion,
    pub cost: Price,
}
