//! Address autocomplete boundary: provider trait and typed suggestion shapes.
//!
//! The live implementation is [`crate::geoapify::GeoapifyClient`]; tests and
//! offline development use [`StaticSuggestionProvider`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::geo::Coordinate;

/// Parameters of one autocomplete lookup. Limit and language come from the
/// search configuration, the proximity bias from the user's last known
/// position; call sites never hardcode either.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteRequest {
    pub text: String,
    pub limit: usize,
    /// Ranks candidates near this point higher when present.
    pub bias: Option<Coordinate>,
    /// BCP 47 language tag for the formatted addresses.
    pub language: String,
}

/// One selectable address candidate. Typed at the provider boundary; the raw
/// provider feature rides along for callers that need provider-specific
/// extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub address_line1: String,
    pub address_line2: String,
    pub formatted: String,
    pub coordinate: Coordinate,
    pub raw: serde_json::Value,
}

/// Trait for autocomplete backends. Zero candidates is an ordinary `Ok` with
/// an empty list, not an error: plenty of partial queries match nothing.
#[async_trait]
pub trait AutocompleteProvider: Send + Sync {
    async fn suggest(&self, request: &AutocompleteRequest)
        -> Result<Vec<Suggestion>, ProviderError>;
}

/// Suggestions answered from a static in-memory table. A registered entry
/// matches every query that is a case-insensitive prefix of its key, so
/// typing toward a known address narrows the list the way a live provider
/// would. The backing store for tests and offline demos.
#[derive(Default)]
pub struct StaticSuggestionProvider {
    entries: Vec<(String, Suggestion)>,
}

impl StaticSuggestionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suggestion under the query text that should surface it.
    pub fn insert(&mut self, key: impl Into<String>, suggestion: Suggestion) {
        self.entries.push((key.into().to_lowercase(), suggestion));
    }
}

#[async_trait]
impl AutocompleteProvider for StaticSuggestionProvider {
    async fn suggest(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let query = request.text.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(&query))
            .map(|(_, suggestion)| suggestion.clone())
            .take(request.limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(formatted: &str, lat: f64, lng: f64) -> Suggestion {
        Suggestion {
            address_line1: formatted.to_string(),
            address_line2: String::new(),
            formatted: formatted.to_string(),
            coordinate: Coordinate::new(lat, lng).unwrap(),
            raw: serde_json::Value::Null,
        }
    }

    fn request(text: &str, limit: usize) -> AutocompleteRequest {
        AutocompleteRequest {
            text: text.to_string(),
            limit,
            bias: None,
            language: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn prefix_queries_narrow_the_static_table() {
        let mut provider = StaticSuggestionProvider::new();
        provider.insert("Alexanderplatz", suggestion("Alexanderplatz, Berlin", 52.5219, 13.4132));
        provider.insert("Alexandrinenstr", suggestion("Alexandrinenstr., Berlin", 52.5047, 13.3989));
        provider.insert("Potsdamer Platz", suggestion("Potsdamer Platz, Berlin", 52.5096, 13.3759));

        let broad = provider.suggest(&request("alex", 10)).await.unwrap();
        assert_eq!(broad.len(), 2);

        let narrow = provider.suggest(&request("alexanderp", 10)).await.unwrap();
        assert_eq!(narrow.len(), 1);
        assert_eq!(narrow[0].formatted, "Alexanderplatz, Berlin");

        let none = provider.suggest(&request("friedrich", 10)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn result_limit_is_honored() {
        let mut provider = StaticSuggestionProvider::new();
        for i in 0..5 {
            provider.insert("main st", suggestion(&format!("{i} Main St"), 52.5, 13.4));
        }

        let limited = provider.suggest(&request("main", 3)).await.unwrap();
        assert_eq!(limited.len(), 3);
    }
}
