//! Drive the search-and-map flow offline: pick a destination through the
//! autocomplete controller, then build and print one map scene.
//!
//! Run with: cargo run -p ridemap_core --example map_scene

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ridemap_core::geocoding::StaticSuggestionProvider;
use ridemap_core::routing::{CachedRouteProvider, TableRouteProvider, TravelMode};
use ridemap_core::scene::{build_scene, SceneContext};
use ridemap_core::search::{run_fetch, SearchConfig, SearchController};
use ridemap_core::store::{DriverStore, LocationStore};
use ridemap_core::test_helpers::{
    berlin_destination, berlin_driver_position, berlin_user, driver_record, suggestion,
};

use ridemap_core::geo::Coordinate;
use ridemap_core::routing::Route;

fn straight_route(from: Coordinate, to: Coordinate, duration_secs: f64) -> Route {
    Route {
        geometry: vec![from, from.midpoint(to), to],
        distance_km: from.haversine_km(to),
        duration_secs,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let user = berlin_user();
    let destination = berlin_destination();

    // Offline providers: a static suggestion table and a route table.
    let mut suggestions = StaticSuggestionProvider::new();
    suggestions.insert("Alexanderplatz", suggestion("Alexanderplatz", destination));
    let suggestions = Arc::new(suggestions);

    let mut routes = TableRouteProvider::new();
    routes.insert(
        &[user, destination],
        TravelMode::Drive,
        straight_route(user, destination, 780.0),
    );
    for id in 1..=3u64 {
        let origin = berlin_driver_position(id);
        routes.insert(
            &[origin, user],
            TravelMode::Drive,
            straight_route(origin, user, 120.0 * id as f64),
        );
    }

    // Shared state, owned here and passed by reference.
    let locations = Arc::new(Mutex::new(LocationStore::new()));
    locations.lock().unwrap().set_user_location(user, None);
    let mut drivers = DriverStore::new();

    // Type a destination and pick the first suggestion.
    let store_sink = Arc::clone(&locations);
    let controller = Arc::new(Mutex::new(SearchController::new(
        SearchConfig::default().with_debounce(Duration::from_millis(10)),
        Box::new(move |location| {
            println!("selected destination: {}", location.address);
            store_sink.lock().unwrap().set_destination(location);
        }),
    )));
    controller.lock().unwrap().set_focused(true);
    controller.lock().unwrap().set_bias(Some(user));

    let ticket = controller
        .lock()
        .unwrap()
        .input("Alexanderplatz")
        .expect("query is long enough to fetch");
    run_fetch(Arc::clone(&controller), suggestions, ticket).await;
    controller.lock().unwrap().select(0);

    // One scene refresh against the live driver feed snapshot.
    let ctx = SceneContext::new(Arc::new(CachedRouteProvider::new(Box::new(routes), 32)));
    let feed: Vec<_> = (1..=3).map(driver_record).collect();
    let snapshot = locations.lock().unwrap().clone();
    let scene = build_scene(&ctx, &snapshot, &feed).await;
    drivers.set_markers(scene.markers.clone());

    println!(
        "--- Map scene ({} drivers, route points: {}) ---",
        scene.markers.len(),
        scene.route.len()
    );
    println!(
        "viewport: center=({:.4}, {:.4}) span=({:.4}, {:.4})",
        scene.region.center.latitude(),
        scene.region.center.longitude(),
        scene.region.lat_span_deg,
        scene.region.lng_span_deg
    );
    for marker in drivers.markers() {
        println!(
            "  {}  {}  {:.0} min  {:.2} EUR  [{:?}]",
            marker.id, marker.title, marker.time_mins, marker.price, marker.source
        );
    }
}
