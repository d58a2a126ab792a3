//! Geoapify-backed live providers.
//!
//! One shared HTTP client implements both provider traits: routing
//! ([`crate::routing::RouteProvider`]) and address autocomplete
//! ([`crate::geocoding::AutocompleteProvider`]). Each endpoint lives in its
//! own submodule with its response schema and a pure parser, so the wire
//! handling stays testable without a server.

mod geocoding;
mod routing;

use std::time::Duration;

use reqwest::Client;

/// Public Geoapify API host.
pub const DEFAULT_ENDPOINT: &str = "https://api.geoapify.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`GeoapifyClient`].
#[derive(Debug, Clone)]
pub struct GeoapifyConfig {
    pub api_key: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl GeoapifyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Read the key from `GEOAPIFY_API_KEY`, and the host from
    /// `GEOAPIFY_ENDPOINT` when set.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let mut config = Self::new(std::env::var("GEOAPIFY_API_KEY")?);
        if let Ok(endpoint) = std::env::var("GEOAPIFY_ENDPOINT") {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Thin HTTP client for the Geoapify routing and autocomplete endpoints.
#[derive(Debug, Clone)]
pub struct GeoapifyClient {
    client: Client,
    config: GeoapifyConfig,
}

impl GeoapifyClient {
    pub fn new(mut config: GeoapifyConfig) -> Self {
        config.endpoint = config.endpoint.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build Geoapify HTTP client");
        Self { client, config }
    }
}
