//! Scripted provider fakes shared by the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ridemap_core::error::ProviderError;
use ridemap_core::geo::Coordinate;
use ridemap_core::geocoding::{AutocompleteProvider, AutocompleteRequest, Suggestion};
use ridemap_core::routing::{Route, RouteProvider, TravelMode};

fn quantize(coordinate: Coordinate) -> (i64, i64) {
    (
        (coordinate.latitude() * 1e6).round() as i64,
        (coordinate.longitude() * 1e6).round() as i64,
    )
}

/// A straight-line stand-in route between two points.
pub fn straight_route(from: Coordinate, to: Coordinate, duration_secs: f64) -> Route {
    Route {
        geometry: vec![from, from.midpoint(to), to],
        distance_km: from.haversine_km(to),
        duration_secs,
    }
}

/// Route provider scripted per origin waypoint. Origins registered with
/// [`ScriptedRouteProvider::leg`] answer their route, origins registered
/// with [`ScriptedRouteProvider::failing_from`] fail, everything else is
/// `Empty`. Counts every call.
#[derive(Default)]
pub struct ScriptedRouteProvider {
    legs: HashMap<(i64, i64), Route>,
    failing: Vec<(i64, i64)>,
    calls: AtomicUsize,
}

impl ScriptedRouteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leg(mut self, origin: Coordinate, route: Route) -> Self {
        self.legs.insert(quantize(origin), route);
        self
    }

    pub fn failing_from(mut self, origin: Coordinate) -> Self {
        self.failing.push(quantize(origin));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteProvider for ScriptedRouteProvider {
    async fn route(
        &self,
        waypoints: &[Coordinate],
        _mode: TravelMode,
    ) -> Result<Route, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let origin = quantize(waypoints[0]);
        if self.failing.contains(&origin) {
            return Err(ProviderError::Api("scripted routing failure".to_string()));
        }
        self.legs.get(&origin).cloned().ok_or(ProviderError::Empty)
    }
}

/// A route provider that fails every call.
pub struct FailingRouteProvider;

#[async_trait]
impl RouteProvider for FailingRouteProvider {
    async fn route(
        &self,
        _waypoints: &[Coordinate],
        _mode: TravelMode,
    ) -> Result<Route, ProviderError> {
        Err(ProviderError::Api("provider down".to_string()))
    }
}

enum SuggestScript {
    Respond {
        delay: Duration,
        suggestions: Vec<Suggestion>,
    },
    Fail,
}

/// Autocomplete provider scripted per exact query text, with optional
/// artificial latency so tests can stage out-of-order completions. Records
/// the text of every query that reaches it.
#[derive(Default)]
pub struct ScriptedSuggestionProvider {
    scripts: HashMap<String, SuggestScript>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSuggestionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, query: &str, delay: Duration, suggestions: Vec<Suggestion>) -> Self {
        self.scripts.insert(
            query.to_string(),
            SuggestScript::Respond { delay, suggestions },
        );
        self
    }

    pub fn fail(mut self, query: &str) -> Self {
        self.scripts.insert(query.to_string(), SuggestScript::Fail);
        self
    }

    /// Queries that actually hit the provider, in arrival order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AutocompleteProvider for ScriptedSuggestionProvider {
    async fn suggest(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        self.queries.lock().unwrap().push(request.text.clone());
        match self.scripts.get(&request.text) {
            Some(SuggestScript::Respond { delay, suggestions }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(suggestions.clone())
            }
            Some(SuggestScript::Fail) => {
                Err(ProviderError::Api("scripted autocomplete failure".to_string()))
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Share a provider between a test and the controller tasks.
pub fn shared<T>(provider: T) -> Arc<T> {
    Arc::new(provider)
}
