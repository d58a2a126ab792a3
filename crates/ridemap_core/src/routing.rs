//! Pluggable route providers: trait abstraction for routing backends.
//!
//! The live implementation is [`crate::geoapify::GeoapifyClient`]; tests and
//! offline development use [`TableRouteProvider`]. Any provider can be wrapped
//! in a [`CachedRouteProvider`] to absorb repeated identical queries.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::geo::Coordinate;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// How the route should be traversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Drive,
    Walk,
    Bicycle,
}

impl TravelMode {
    /// Wire value used in provider requests.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Drive => "drive",
            TravelMode::Walk => "walk",
            TravelMode::Bicycle => "bicycle",
        }
    }
}

/// Result of a route query between waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Path geometry flattened into draw order.
    pub geometry: Vec<Coordinate>,
    /// Road-network distance in kilometres.
    pub distance_km: f64,
    /// Travel time in seconds.
    pub duration_secs: f64,
}

/// Trait for routing backends. Implementations must be `Send + Sync` so one
/// provider instance can be shared behind an `Arc` by the scene builder and
/// the ETA estimator.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Route through `waypoints` in order using the given travel mode.
    async fn route(&self, waypoints: &[Coordinate], mode: TravelMode)
        -> Result<Route, ProviderError>;
}

// ---------------------------------------------------------------------------
// Route line for the map
// ---------------------------------------------------------------------------

/// Fetch the polyline to draw between the user and their destination.
///
/// Missing endpoints mean there is nothing to draw yet, so no request is
/// issued. Provider failures degrade to an empty line: the map still renders
/// its markers.
pub async fn route_line(
    provider: &dyn RouteProvider,
    user: Option<Coordinate>,
    destination: Option<Coordinate>,
) -> Vec<Coordinate> {
    let (Some(user), Some(destination)) = (user, destination) else {
        return Vec::new();
    };

    match provider.route(&[user, destination], TravelMode::Drive).await {
        Ok(route) => route.geometry,
        Err(err) => {
            tracing::warn!(error = %err, "route fetch failed, rendering without a polyline");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Cache keys
// ---------------------------------------------------------------------------

/// Coordinates on a 1e-6 degree grid (about 0.1 m), so float noise from
/// repeated snapshots of the same position still hits the same entry.
fn quantize(coordinate: Coordinate) -> (i64, i64) {
    (
        (coordinate.latitude() * 1e6).round() as i64,
        (coordinate.longitude() * 1e6).round() as i64,
    )
}

/// Directional lookup key for a waypoint sequence plus travel mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    points: Vec<(i64, i64)>,
    mode: TravelMode,
}

impl RouteKey {
    pub fn new(waypoints: &[Coordinate], mode: TravelMode) -> Self {
        Self {
            points: waypoints.iter().copied().map(quantize).collect(),
            mode,
        }
    }
}

// ---------------------------------------------------------------------------
// Table provider (offline)
// ---------------------------------------------------------------------------

/// Routes answered from an in-memory table. No network, deterministic:
/// the backing store for tests and offline demos.
#[derive(Default)]
pub struct TableRouteProvider {
    table: HashMap<RouteKey, Route>,
}

impl TableRouteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a pre-built table.
    pub fn from_table(table: HashMap<RouteKey, Route>) -> Self {
        Self { table }
    }

    /// Register the route returned for this exact waypoint sequence and mode.
    pub fn insert(&mut self, waypoints: &[Coordinate], mode: TravelMode, route: Route) {
        self.table.insert(RouteKey::new(waypoints, mode), route);
    }
}

#[async_trait]
impl RouteProvider for TableRouteProvider {
    async fn route(
        &self,
        waypoints: &[Coordinate],
        mode: TravelMode,
    ) -> Result<Route, ProviderError> {
        self.table
            .get(&RouteKey::new(waypoints, mode))
            .cloned()
            .ok_or(ProviderError::Empty)
    }
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Default capacity for [`CachedRouteProvider`].
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 256;

/// LRU-cached wrapper around any [`RouteProvider`].
///
/// Scene refreshes re-request the identical user-to-destination route every
/// time the driver list ticks; the cache absorbs that. Errors are never
/// cached, so a transient failure does not pin an empty result.
pub struct CachedRouteProvider {
    inner: Box<dyn RouteProvider>,
    cache: Mutex<LruCache<RouteKey, Route>>,
}

impl CachedRouteProvider {
    /// Wrap `inner` with a cache of the given capacity.
    pub fn new(inner: Box<dyn RouteProvider>, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("cache capacity must be > 0"),
            )),
        }
    }
}

#[async_trait]
impl RouteProvider for CachedRouteProvider {
    async fn route(
        &self,
        waypoints: &[Coordinate],
        mode: TravelMode,
    ) -> Result<Route, ProviderError> {
        let key = RouteKey::new(waypoints, mode);

        // Fast path: cache hit. The guard drops before any await.
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return Ok(cached.clone());
            }
        }

        // Slow path: query the inner provider.
        let result = self.inner.route(waypoints, mode).await;

        if let Ok(ref route) = result {
            if let Ok(mut cache) = self.cache.lock() {
                cache.put(key, route.clone());
            }
        }

        result
    }
}
