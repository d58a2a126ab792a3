//! Geoapify `/v1/geocode/autocomplete` endpoint: request building, response
//! schema, and suggestion parsing.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::GeoapifyClient;
use crate::error::ProviderError;
use crate::geo::Coordinate;
use crate::geocoding::{AutocompleteProvider, AutocompleteRequest, Suggestion};

#[derive(Deserialize)]
pub(super) struct AutocompleteResponse {
    /// Kept as raw values so each feature can be retained on its suggestion.
    pub(super) features: Vec<Value>,
}

#[derive(Deserialize)]
struct SuggestionFeature {
    properties: SuggestionProperties,
}

#[derive(Deserialize)]
struct SuggestionProperties {
    formatted: String,
    address_line1: Option<String>,
    address_line2: Option<String>,
    lat: f64,
    lon: f64,
}

/// Parse raw candidate features into suggestions. Malformed features are
/// skipped so one bad candidate never hides the rest; an empty result is a
/// valid answer, not an error.
pub(super) fn parse_autocomplete_features(features: Vec<Value>) -> Vec<Suggestion> {
    features
        .into_iter()
        .filter_map(|raw| {
            let feature: SuggestionFeature = serde_json::from_value(raw.clone()).ok()?;
            let coordinate =
                Coordinate::new(feature.properties.lat, feature.properties.lon).ok()?;
            Some(Suggestion {
                address_line1: feature
                    .properties
                    .address_line1
                    .unwrap_or_else(|| feature.properties.formatted.clone()),
                address_line2: feature.properties.address_line2.unwrap_or_default(),
                formatted: feature.properties.formatted,
                coordinate,
                raw,
            })
        })
        .collect()
}

#[async_trait]
impl AutocompleteProvider for GeoapifyClient {
    async fn suggest(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let mut params = vec![
            ("text", request.text.clone()),
            ("limit", request.limit.to_string()),
            ("lang", request.language.clone()),
            ("apiKey", self.config.api_key.clone()),
        ];
        if let Some(bias) = request.bias {
            // The proximity filter takes lon,lat order on the wire.
            params.push((
                "bias",
                format!("proximity:{},{}", bias.longitude(), bias.latitude()),
            ));
        }

        let url = Url::parse_with_params(
            &format!("{}/v1/geocode/autocomplete", self.config.endpoint),
            &params,
        )
        .map_err(|err| ProviderError::Api(format!("failed to build autocomplete URL: {err}")))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "autocomplete request returned {}",
                response.status()
            )));
        }

        let parsed: AutocompleteResponse = response.json().await.map_err(ProviderError::Json)?;
        Ok(parse_autocomplete_features(parsed.features))
    }
}
