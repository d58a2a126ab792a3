//! Viewport region math: which rectangle of the map the client should show.
//!
//! Three cases, in order of preference: a trip in progress frames both
//! endpoints with padding, a located user gets a default-sized box around
//! their position, and everything else falls back to a fixed city center.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Span applied when the viewport is centered on a single point.
pub const DEFAULT_SPAN_DEG: f64 = 0.01;
/// Padding factor applied to the bounding span of a trip viewport.
pub const REGION_MARGIN: f64 = 1.3;
/// Spans never shrink below this, so a zero-length trip still renders.
pub const MIN_SPAN_DEG: f64 = 0.01;

/// Shown when no user location is available yet: central Berlin.
pub const FALLBACK_CENTER: Coordinate = Coordinate::from_validated(52.520008, 13.404954);

/// A map viewport: center plus the visible span on each axis, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub lat_span_deg: f64,
    pub lng_span_deg: f64,
}

impl Region {
    pub fn centered(center: Coordinate, lat_span_deg: f64, lng_span_deg: f64) -> Self {
        Self {
            center,
            lat_span_deg,
            lng_span_deg,
        }
    }

    /// Whether `point` falls inside the viewport rectangle (inclusive).
    pub fn contains(&self, point: Coordinate) -> bool {
        let half_lat = self.lat_span_deg / 2.0;
        let half_lng = self.lng_span_deg / 2.0;
        (point.latitude() - self.center.latitude()).abs() <= half_lat
            && (point.longitude() - self.center.longitude()).abs() <= half_lng
    }
}

/// Knobs for [`compute_region`]. Defaults match the production map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionConfig {
    pub fallback_center: Coordinate,
    pub default_span_deg: f64,
    pub margin: f64,
    pub min_span_deg: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            fallback_center: FALLBACK_CENTER,
            default_span_deg: DEFAULT_SPAN_DEG,
            margin: REGION_MARGIN,
            min_span_deg: MIN_SPAN_DEG,
        }
    }
}

impl RegionConfig {
    pub fn with_fallback_center(mut self, center: Coordinate) -> Self {
        self.fallback_center = center;
        self
    }

    pub fn with_default_span_deg(mut self, span: f64) -> Self {
        self.default_span_deg = span;
        self
    }
}

/// Compute the viewport for the current user/destination pair.
///
/// Without a user location the destination is ignored: the map has nothing
/// meaningful to anchor a trip view to, so it shows the fallback city center.
pub fn compute_region(
    user: Option<Coordinate>,
    destination: Option<Coordinate>,
    config: &RegionConfig,
) -> Region {
    let Some(user) = user else {
        return Region::centered(
            config.fallback_center,
            config.default_span_deg,
            config.default_span_deg,
        );
    };

    match destination {
        None => Region::centered(user, config.default_span_deg, config.default_span_deg),
        Some(destination) => {
            let lat_span = (destination.latitude() - user.latitude()).abs() * config.margin;
            let lng_span = (destination.longitude() - user.longitude()).abs() * config.margin;
            Region::centered(
                user.midpoint(destination),
                lat_span.max(config.min_span_deg),
                lng_span.max(config.min_span_deg),
            )
        }
    }
}
