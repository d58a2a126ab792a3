//! Driver feed records and the markers the map renders for them.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::pricing::{TierTable, VehicleTier};

/// Stable identity of a driver across feed refreshes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DriverId(pub u64);

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "driver-{}", self.0)
    }
}

/// Static placeholder fare and pickup time shipped with the feed, shown until
/// the routed estimate arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedEstimate {
    pub price: f64,
    pub time_mins: f64,
}

/// One driver as delivered by the external listing feed. A snapshot: the feed
/// replaces the whole list on refresh rather than patching records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDriverRecord {
    pub id: DriverId,
    pub first_name: String,
    pub last_name: String,
    /// Absent while the driver's device has not reported a position yet.
    pub coordinate: Option<Coordinate>,
    pub tier: VehicleTier,
    pub seed_estimates: TierTable<SeedEstimate>,
}

/// Where a marker's current time/price figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    /// Placeholder from the feed's static table; shown de-emphasized.
    Seeded,
    /// Refined from a live routing call.
    Routed,
}

/// A renderable driver pin. The ETA estimator rewrites `time_mins`, `price`,
/// and `source` in place; everything else is fixed at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: DriverId,
    pub coordinate: Coordinate,
    pub title: String,
    pub tier: VehicleTier,
    pub seed_estimates: TierTable<SeedEstimate>,
    pub time_mins: f64,
    pub price: f64,
    pub source: EstimateSource,
}

impl Marker {
    /// Build a marker from a located feed record, seeded with the record's
    /// placeholder figures for its own tier.
    fn seeded_from(record: &RawDriverRecord, coordinate: Coordinate) -> Self {
        let seed = *record.seed_estimates.get(record.tier);
        Self {
            id: record.id,
            coordinate,
            title: format!("{} {}", record.first_name, record.last_name),
            tier: record.tier,
            seed_estimates: record.seed_estimates,
            time_mins: seed.time_mins,
            price: seed.price,
            source: EstimateSource::Seeded,
        }
    }

    /// The placeholder figures for this marker's tier.
    pub fn seed_estimate(&self) -> SeedEstimate {
        *self.seed_estimates.get(self.tier)
    }
}

/// Turn the current feed snapshot into markers.
///
/// No user location means the map is not ready to place anything, so the
/// result is empty rather than an error. Drivers without a reported position
/// are skipped; everyone else yields exactly one marker in feed order.
pub fn generate_markers(records: &[RawDriverRecord], user: Option<Coordinate>) -> Vec<Marker> {
    if user.is_none() {
        return Vec::new();
    }
    records
        .iter()
        .filter_map(|record| {
            record
                .coordinate
                .map(|coordinate| Marker::seeded_from(record, coordinate))
        })
        .collect()
}
