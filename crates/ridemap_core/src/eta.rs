//! Per-driver pickup ETA refinement.
//!
//! Markers start with the feed's placeholder figures; this module replaces
//! them with routed estimates by asking the routing provider for each
//! driver's pickup leg (driver position to user position). One failing leg
//! never sinks the batch: that marker keeps its placeholder and stays
//! flagged [`EstimateSource::Seeded`] so the UI can de-emphasize it.

use futures::future::join_all;

use crate::drivers::{EstimateSource, Marker};
use crate::geo::Coordinate;
use crate::pricing::PricingConfig;
use crate::routing::{RouteProvider, TravelMode};

/// Minutes added to every routed pickup time to cover dispatch latency
/// (driver accepting, pulling out, etc.).
pub const DEFAULT_DISPATCH_OVERHEAD_MINS: f64 = 3.0;

/// Knobs for [`estimate_driver_etas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    pub dispatch_overhead_mins: f64,
    /// Travel mode of the pickup leg.
    pub mode: TravelMode,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            dispatch_overhead_mins: DEFAULT_DISPATCH_OVERHEAD_MINS,
            mode: TravelMode::Drive,
        }
    }
}

impl EstimatorConfig {
    pub fn with_dispatch_overhead_mins(mut self, mins: f64) -> Self {
        self.dispatch_overhead_mins = mins;
        self
    }
}

/// Refine marker time/price estimates with one routing call per driver.
///
/// Until both trip endpoints are known there is no trip to quote, so the
/// markers come back unchanged. Otherwise every marker gets a concurrent
/// pickup-leg request; successes are rewritten to routed figures, failures
/// are logged and keep their seeded placeholder. The result is sorted by
/// ascending pickup time, ties broken by driver id, so the output order is
/// deterministic regardless of request completion order.
pub async fn estimate_driver_etas(
    provider: &dyn RouteProvider,
    pricing: &PricingConfig,
    config: &EstimatorConfig,
    markers: Vec<Marker>,
    user: Option<Coordinate>,
    destination: Option<Coordinate>,
) -> Vec<Marker> {
    let (Some(user), Some(_destination)) = (user, destination) else {
        return markers;
    };

    let refinements = markers.into_iter().map(|mut marker| async move {
        match provider.route(&[marker.coordinate, user], config.mode).await {
            Ok(route) => {
                marker.time_mins =
                    (route.duration_secs / 60.0).round() + config.dispatch_overhead_mins;
                marker.price = pricing
                    .rates(marker.tier)
                    .fare_for_distance(route.distance_km);
                marker.source = EstimateSource::Routed;
            }
            Err(err) => {
                tracing::warn!(
                    driver = %marker.id,
                    error = %err,
                    "pickup route failed, keeping seeded estimate"
                );
            }
        }
        marker
    });

    let mut refined = join_all(refinements).await;
    refined.sort_by(|a, b| a.time_mins.total_cmp(&b.time_mins).then(a.id.cmp(&b.id)));
    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{generate_markers, DriverId, RawDriverRecord, SeedEstimate};
    use crate::error::ProviderError;
    use crate::pricing::{TierTable, VehicleTier};
    use crate::routing::Route;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn record(id: u64, lat: f64, lng: f64) -> RawDriverRecord {
        let seed = |price, time_mins| SeedEstimate { price, time_mins };
        RawDriverRecord {
            id: DriverId(id),
            first_name: format!("Driver{id}"),
            last_name: "Test".to_string(),
            coordinate: Some(coord(lat, lng)),
            tier: VehicleTier::Economy,
            seed_estimates: TierTable {
                economy: seed(5.0, 9.0),
                comfort: seed(7.5, 9.0),
                premium: seed(11.0, 10.0),
            },
        }
    }

    /// Answers pickup legs from a per-origin script; origins without an entry
    /// fail the call.
    struct PerOriginProvider {
        legs: HashMap<(i64, i64), Route>,
    }

    impl PerOriginProvider {
        fn new() -> Self {
            Self {
                legs: HashMap::new(),
            }
        }

        fn key(origin: Coordinate) -> (i64, i64) {
            (
                (origin.latitude() * 1e6).round() as i64,
                (origin.longitude() * 1e6).round() as i64,
            )
        }

        fn leg(mut self, origin: Coordinate, duration_secs: f64, distance_km: f64) -> Self {
            self.legs.insert(
                Self::key(origin),
                Route {
                    geometry: vec![origin],
                    distance_km,
                    duration_secs,
                },
            );
            self
        }
    }

    #[async_trait]
    impl RouteProvider for PerOriginProvider {
        async fn route(
            &self,
            waypoints: &[Coordinate],
            _mode: TravelMode,
        ) -> Result<Route, ProviderError> {
            self.legs
                .get(&Self::key(waypoints[0]))
                .cloned()
                .ok_or(ProviderError::Empty)
        }
    }

    fn markers_for(records: &[RawDriverRecord], user: Coordinate) -> Vec<Marker> {
        generate_markers(records, Some(user))
    }

    #[tokio::test]
    async fn missing_endpoint_returns_markers_unchanged() {
        let user = coord(52.52, 13.40);
        let records = vec![record(1, 52.51, 13.39)];
        let markers = markers_for(&records, user);
        let provider = PerOriginProvider::new();

        let out = estimate_driver_etas(
            &provider,
            &PricingConfig::default(),
            &EstimatorConfig::default(),
            markers.clone(),
            Some(user),
            None,
        )
        .await;

        assert_eq!(out, markers);
    }

    #[tokio::test]
    async fn output_is_sorted_by_routed_pickup_time() {
        let user = coord(52.52, 13.40);
        let far = coord(52.58, 13.48);
        let near = coord(52.525, 13.41);
        let records = vec![record(1, far.latitude(), far.longitude()),
                           record(2, near.latitude(), near.longitude())];
        let provider = PerOriginProvider::new()
            .leg(far, 300.0, 4.0)
            .leg(near, 180.0, 1.2);

        let out = estimate_driver_etas(
            &provider,
            &PricingConfig::default(),
            &EstimatorConfig::default(),
            markers_for(&records, user),
            Some(user),
            Some(coord(52.60, 13.50)),
        )
        .await;

        // 3 min leg beats the 5 min leg regardless of feed order.
        assert_eq!(out[0].id, DriverId(2));
        assert_eq!(out[1].id, DriverId(1));
        assert_eq!(out[0].time_mins, 3.0 + DEFAULT_DISPATCH_OVERHEAD_MINS);
        assert_eq!(out[1].time_mins, 5.0 + DEFAULT_DISPATCH_OVERHEAD_MINS);
        assert!(out.iter().all(|m| m.source == EstimateSource::Routed));
    }

    #[tokio::test]
    async fn routed_price_applies_the_tier_rates_to_the_leg_distance() {
        let user = coord(52.52, 13.40);
        let origin = coord(52.53, 13.42);
        let records = vec![record(1, origin.latitude(), origin.longitude())];
        let provider = PerOriginProvider::new().leg(origin, 240.0, 4.0);
        let pricing = PricingConfig::default();

        let out = estimate_driver_etas(
            &provider,
            &pricing,
            &EstimatorConfig::default(),
            markers_for(&records, user),
            Some(user),
            Some(coord(52.60, 13.50)),
        )
        .await;

        let expected = pricing.rates(VehicleTier::Economy).fare_for_distance(4.0);
        assert_eq!(out[0].price, expected);
    }

    #[tokio::test]
    async fn failed_leg_falls_back_to_the_seeded_placeholder() {
        let user = coord(52.52, 13.40);
        let routed = coord(52.525, 13.41);
        let unrouted = coord(52.58, 13.48);
        let records = vec![
            record(1, routed.latitude(), routed.longitude()),
            record(2, unrouted.latitude(), unrouted.longitude()),
        ];
        // Driver 2 has no scripted leg: its call fails.
        let provider = PerOriginProvider::new().leg(routed, 180.0, 1.2);

        let out = estimate_driver_etas(
            &provider,
            &PricingConfig::default(),
            &EstimatorConfig::default(),
            markers_for(&records, user),
            Some(user),
            Some(coord(52.60, 13.50)),
        )
        .await;

        assert_eq!(out.len(), 2);
        let fallback = out.iter().find(|m| m.id == DriverId(2)).unwrap();
        assert_eq!(fallback.source, EstimateSource::Seeded);
        assert_eq!(fallback.time_mins, 9.0);
        assert_eq!(fallback.price, 5.0);

        let routed_marker = out.iter().find(|m| m.id == DriverId(1)).unwrap();
        assert_eq!(routed_marker.source, EstimateSource::Routed);
    }

    #[tokio::test]
    async fn equal_times_break_ties_by_ascending_driver_id() {
        let user = coord(52.52, 13.40);
        let a = coord(52.53, 13.41);
        let b = coord(52.53, 13.42);
        let records = vec![
            record(7, b.latitude(), b.longitude()),
            record(3, a.latitude(), a.longitude()),
        ];
        let provider = PerOriginProvider::new().leg(a, 240.0, 2.0).leg(b, 240.0, 2.0);

        let out = estimate_driver_etas(
            &provider,
            &PricingConfig::default(),
            &EstimatorConfig::default(),
            markers_for(&records, user),
            Some(user),
            Some(coord(52.60, 13.50)),
        )
        .await;

        let ids: Vec<_> = out.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![DriverId(3), DriverId(7)]);
    }
}
