//! Geoapify `/v1/routing` endpoint: request building, response schema, and
//! geometry parsing.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::GeoapifyClient;
use crate::error::ProviderError;
use crate::geo::Coordinate;
use crate::routing::{Route, RouteProvider, TravelMode};

#[derive(Deserialize)]
pub(super) struct RoutingResponse {
    pub(super) features: Vec<RouteFeature>,
}

#[derive(Deserialize)]
pub(super) struct RouteFeature {
    pub(super) properties: RouteProperties,
    pub(super) geometry: RouteGeometry,
}

#[derive(Deserialize)]
pub(super) struct RouteProperties {
    /// Metres.
    pub(super) distance: f64,
    /// Seconds.
    pub(super) time: f64,
}

#[derive(Deserialize)]
pub(super) struct RouteGeometry {
    /// MultiLineString rings; each point is `[lon, lat]` per GeoJSON.
    pub(super) coordinates: Vec<Vec<Vec<f64>>>,
}

/// Pick the first route feature and flatten its geometry into draw order.
pub(super) fn parse_routing_response(resp: RoutingResponse) -> Result<Route, ProviderError> {
    let feature = resp.features.into_iter().next().ok_or(ProviderError::Empty)?;
    Ok(Route {
        geometry: flatten_rings(feature.geometry.coordinates),
        distance_km: feature.properties.distance / 1000.0,
        duration_secs: feature.properties.time,
    })
}

/// Flatten nested rings into one path, swapping GeoJSON `[lon, lat]` points
/// into coordinates. Unparseable points are skipped rather than failing the
/// whole route.
pub(super) fn flatten_rings(rings: Vec<Vec<Vec<f64>>>) -> Vec<Coordinate> {
    rings
        .into_iter()
        .flatten()
        .filter_map(|point| match point.as_slice() {
            [lon, lat, ..] => Coordinate::new(*lat, *lon).ok(),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl RouteProvider for GeoapifyClient {
    async fn route(
        &self,
        waypoints: &[Coordinate],
        mode: TravelMode,
    ) -> Result<Route, ProviderError> {
        if waypoints.len() < 2 {
            return Err(ProviderError::Api(
                "routing needs at least two waypoints".to_string(),
            ));
        }

        // Waypoints go on the wire as lat,lon pairs joined with '|'.
        let waypoint_segment = waypoints
            .iter()
            .map(|point| format!("{},{}", point.latitude(), point.longitude()))
            .collect::<Vec<_>>()
            .join("|");

        let url = Url::parse_with_params(
            &format!("{}/v1/routing", self.config.endpoint),
            &[
                ("waypoints", waypoint_segment.as_str()),
                ("mode", mode.as_str()),
                ("apiKey", self.config.api_key.as_str()),
            ],
        )
        .map_err(|err| ProviderError::Api(format!("failed to build routing URL: {err}")))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "routing request returned {}",
                response.status()
            )));
        }

        let parsed: RoutingResponse = response.json().await.map_err(ProviderError::Json)?;
        parse_routing_response(parsed)
    }
}
