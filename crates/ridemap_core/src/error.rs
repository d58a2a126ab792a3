use thiserror::Error;

/// Errors surfaced by routing and autocomplete providers.
///
/// Stale responses and unmet coordinate preconditions are deliberately not in
/// here: staleness is handled by the search controller's generation check and
/// missing coordinates short-circuit components to empty results.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure: provider unreachable or the request never completed.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider answered but the body could not be decoded.
    #[error("provider response could not be decoded: {0}")]
    Json(#[source] reqwest::Error),
    /// The provider answered with a non-success status or an error payload.
    #[error("provider rejected the request: {0}")]
    Api(String),
    /// Structurally valid response with nothing usable in it.
    #[error("provider returned no usable result")]
    Empty,
}
