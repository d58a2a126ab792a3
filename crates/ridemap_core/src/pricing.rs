//! Tiered pricing: vehicle tiers, per-tier rate structures, and fare math.

use serde::{Deserialize, Serialize};

/// Base fare for the economy tier in currency units.
pub const ECONOMY_BASE_FARE: f64 = 2.50;
/// Per-kilometre rate for the economy tier in currency units.
pub const ECONOMY_PER_KM_RATE: f64 = 1.50;

/// Vehicle/service class. A fixed set: rate lookups are total and the feed
/// cannot introduce tiers the client has no rates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleTier {
    Economy,
    Comfort,
    Premium,
}

impl VehicleTier {
    pub const ALL: [VehicleTier; 3] = [
        VehicleTier::Economy,
        VehicleTier::Comfort,
        VehicleTier::Premium,
    ];
}

/// One value per vehicle tier. Used for both the feed's placeholder estimates
/// and the client's rate configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub economy: T,
    pub comfort: T,
    pub premium: T,
}

impl<T> TierTable<T> {
    pub fn get(&self, tier: VehicleTier) -> &T {
        match tier {
            VehicleTier::Economy => &self.economy,
            VehicleTier::Comfort => &self.comfort,
            VehicleTier::Premium => &self.premium,
        }
    }

    pub fn get_mut(&mut self, tier: VehicleTier) -> &mut T {
        match tier {
            VehicleTier::Economy => &mut self.economy,
            VehicleTier::Comfort => &mut self.comfort,
            VehicleTier::Premium => &mut self.premium,
        }
    }
}

/// Rate structure for one vehicle tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRates {
    pub base_fare: f64,
    pub per_km_rate: f64,
}

impl TierRates {
    /// Fare for a trip leg of the given road distance.
    ///
    /// Formula: `fare = base_fare + (distance_km * per_km_rate)`, rounded to
    /// two decimal places.
    pub fn fare_for_distance(&self, distance_km: f64) -> f64 {
        round_to_cents(self.base_fare + distance_km * self.per_km_rate)
    }
}

/// Per-tier rates used when converting routed distances into prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub rates: TierTable<TierRates>,
}

impl PricingConfig {
    pub fn rates(&self, tier: VehicleTier) -> TierRates {
        *self.rates.get(tier)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rates: TierTable {
                economy: TierRates {
                    base_fare: ECONOMY_BASE_FARE,
                    per_km_rate: ECONOMY_PER_KM_RATE,
                },
                comfort: TierRates {
                    base_fare: 3.50,
                    per_km_rate: 2.00,
                },
                premium: TierRates {
                    base_fare: 5.00,
                    per_km_rate: 2.75,
                },
            },
        }
    }
}

/// Round a currency amount to two decimal places.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
