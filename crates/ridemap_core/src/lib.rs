pub mod geo;
pub mod error;
pub mod region;
pub mod pricing;
pub mod drivers;
pub mod eta;
pub mod routing;
pub mod geocoding;
pub mod geoapify;
pub mod search;
pub mod store;
pub mod scene;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
