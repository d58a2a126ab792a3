//! Scene composition: one refresh of everything the map renders.
//!
//! `build_scene` is the read side of the data flow: it takes a snapshot of
//! the location store and the driver feed and produces the viewport, the
//! annotated marker list, and the route polyline in one pass. It is
//! infallible; every provider failure inside degrades to an emptier but
//! still renderable scene.

use std::sync::Arc;

use crate::drivers::{generate_markers, Marker, RawDriverRecord};
use crate::eta::{estimate_driver_etas, EstimatorConfig};
use crate::geo::Coordinate;
use crate::pricing::PricingConfig;
use crate::region::{compute_region, Region, RegionConfig};
use crate::routing::{route_line, RouteProvider};
use crate::store::LocationStore;

/// Everything the map draws for one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub region: Region,
    /// Sorted ascending by pickup time once a destination is set.
    pub markers: Vec<Marker>,
    /// Empty until both endpoints are known or when the route fetch failed.
    pub route: Vec<Coordinate>,
}

/// Long-lived wiring for scene refreshes. The provider is shared between the
/// ETA fan-out and the route fetch, so wrapping it in a
/// [`crate::routing::CachedRouteProvider`] pays off across refreshes.
pub struct SceneContext {
    pub route_provider: Arc<dyn RouteProvider>,
    pub region: RegionConfig,
    pub pricing: PricingConfig,
    pub estimator: EstimatorConfig,
}

impl SceneContext {
    pub fn new(route_provider: Arc<dyn RouteProvider>) -> Self {
        Self {
            route_provider,
            region: RegionConfig::default(),
            pricing: PricingConfig::default(),
            estimator: EstimatorConfig::default(),
        }
    }
}

/// Build the scene for the current endpoints and feed snapshot.
///
/// Markers are generated fresh from the feed and that same list flows into
/// the estimator and the returned scene; nothing downstream reads an older
/// marker list. ETA refinement and the route fetch run concurrently.
pub async fn build_scene(
    ctx: &SceneContext,
    locations: &LocationStore,
    feed: &[RawDriverRecord],
) -> MapScene {
    let user = locations.user();
    let destination = locations.destination();

    let region = compute_region(user, destination, &ctx.region);
    let markers = generate_markers(feed, user);

    let (markers, route) = tokio::join!(
        estimate_driver_etas(
            ctx.route_provider.as_ref(),
            &ctx.pricing,
            &ctx.estimator,
            markers,
            user,
            destination,
        ),
        route_line(ctx.route_provider.as_ref(), user, destination),
    );

    MapScene {
        region,
        markers,
        route,
    }
}
