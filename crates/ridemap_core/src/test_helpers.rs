//! Test helpers for common fixtures and builders.
//!
//! This module provides shared geography and feed fixtures to reduce
//! duplication across test files. All coordinates sit in central Berlin, the
//! crate's default map geography.

use crate::drivers::{DriverId, RawDriverRecord, SeedEstimate};
use crate::geo::Coordinate;
use crate::geocoding::Suggestion;
use crate::pricing::{TierTable, VehicleTier};

/// A standard user position: central Berlin, near the TV tower.
pub fn berlin_user() -> Coordinate {
    Coordinate::new(52.5200, 13.4050).expect("fixture coordinate should be valid")
}

/// A standard destination a few kilometres east of [`berlin_user`].
pub fn berlin_destination() -> Coordinate {
    Coordinate::new(52.5080, 13.4530).expect("fixture coordinate should be valid")
}

/// A driver position within pickup range of [`berlin_user`].
pub fn berlin_driver_position(offset: u64) -> Coordinate {
    Coordinate::new(52.5150 + offset as f64 * 0.004, 13.3980 + offset as f64 * 0.003)
        .expect("fixture coordinate should be valid")
}

/// Placeholder estimates used by every fixture driver: economy 5.00 / 9 min,
/// comfort 7.50 / 9 min, premium 11.00 / 10 min.
pub fn seed_estimates() -> TierTable<SeedEstimate> {
    TierTable {
        economy: SeedEstimate {
            price: 5.0,
            time_mins: 9.0,
        },
        comfort: SeedEstimate {
            price: 7.5,
            time_mins: 9.0,
        },
        premium: SeedEstimate {
            price: 11.0,
            time_mins: 10.0,
        },
    }
}

/// An economy-tier feed record positioned via [`berlin_driver_position`].
pub fn driver_record(id: u64) -> RawDriverRecord {
    RawDriverRecord {
        id: DriverId(id),
        first_name: format!("Driver{id}"),
        last_name: "Fixture".to_string(),
        coordinate: Some(berlin_driver_position(id)),
        tier: VehicleTier::Economy,
        seed_estimates: seed_estimates(),
    }
}

/// A record with a custom position, or none for an unlocated driver.
pub fn driver_record_at(id: u64, coordinate: Option<Coordinate>) -> RawDriverRecord {
    RawDriverRecord {
        coordinate,
        ..driver_record(id)
    }
}

/// A suggestion without provider extras, located at the given point.
pub fn suggestion(formatted: &str, coordinate: Coordinate) -> Suggestion {
    Suggestion {
        address_line1: formatted.to_string(),
        address_line2: "Berlin, Germany".to_string(),
        formatted: format!("{formatted}, Berlin, Germany"),
        coordinate,
        raw: serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_points_are_distinct_and_close() {
        let user = berlin_user();
        assert_ne!(user, berlin_destination());
        assert!(user.haversine_km(berlin_destination()) < 10.0);
        assert!(user.haversine_km(berlin_driver_position(0)) < 5.0);
    }

    #[test]
    fn fixture_drivers_carry_their_id_in_position_and_name() {
        let a = driver_record(1);
        let b = driver_record(2);
        assert_ne!(a.coordinate, b.coordinate);
        assert_eq!(a.first_name, "Driver1");
    }
}
