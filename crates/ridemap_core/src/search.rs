//! Destination search controller: debounced autocomplete with staleness
//! suppression.
//!
//! The controller is split into a pure transition core (`input`,
//! `apply_fetch`, `select`, `clear`) that owns the session state, and a thin
//! async driver ([`run_fetch`]) that sleeps through the debounce window and
//! talks to the provider. Staleness is an explicit generation counter: every
//! keystroke and every clear bump it, and a fetch result only lands if its
//! ticket still carries the current generation. Responses to superseded
//! queries are expected traffic and are discarded silently.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::ProviderError;
use crate::geo::Coordinate;
use crate::geocoding::{AutocompleteProvider, AutocompleteRequest, Suggestion};

/// Queries shorter than this never hit the provider.
pub const MIN_QUERY_LEN: usize = 2;
/// Default pause after the last keystroke before a fetch goes out.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Default number of candidates requested per fetch.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// The chosen destination as handed to the selection handler. The only way
/// location data leaves the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedLocation {
    pub coordinate: Coordinate,
    pub address: String,
}

/// Where the search session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Empty field, no suggestions, cancel affordance hidden.
    Idle,
    /// Text entered, no usable suggestions yet.
    Typing,
    /// At least one suggestion for the current query is on screen.
    SuggestionsShown,
    /// Pass-through phase while the selection handler runs.
    Selected,
}

/// Knobs for the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub min_query_len: usize,
    pub limit: usize,
    pub language: String,
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: MIN_QUERY_LEN,
            limit: DEFAULT_SUGGESTION_LIMIT,
            language: "en".to_string(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl SearchConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Callback invoked with the chosen destination.
pub type SelectionHandler = Box<dyn FnMut(SelectedLocation) + Send>;

/// Permission to run one fetch for one specific generation of the query.
/// Issued by [`SearchController::input`], consumed by [`run_fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: AutocompleteRequest,
}

/// What became of a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Suggestions replaced; controller now shows them.
    Applied,
    /// Current query, but zero candidates; list cleared.
    Empty,
    /// Provider failed; logged, list cleared, controller still usable.
    Failed,
    /// Response to a superseded query; dropped without touching state.
    Stale,
}

/// State machine behind one destination text field.
pub struct SearchController {
    config: SearchConfig,
    phase: SearchPhase,
    query: String,
    suggestions: Vec<Suggestion>,
    focused: bool,
    cancel_visible: bool,
    /// Gate against fetches triggered by programmatic text changes: only a
    /// focused keystroke reopens it after a clear.
    search_enabled: bool,
    bias: Option<Coordinate>,
    generation: u64,
    handler: SelectionHandler,
}

impl SearchController {
    pub fn new(config: SearchConfig, handler: SelectionHandler) -> Self {
        Self {
            config,
            phase: SearchPhase::Idle,
            query: String::new(),
            suggestions: Vec::new(),
            focused: false,
            cancel_visible: false,
            search_enabled: true,
            bias: None,
            generation: 0,
            handler,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn cancel_visible(&self) -> bool {
        self.cancel_visible
    }

    /// Generation of the newest input; fetch results for anything older are
    /// stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Track whether the field is actively being edited.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Proximity bias attached to every subsequent fetch, normally the
    /// user's last known position.
    pub fn set_bias(&mut self, bias: Option<Coordinate>) {
        self.bias = bias;
    }

    /// Apply one text change and decide whether it warrants a fetch.
    ///
    /// Empty text is an implicit clear. Non-empty text moves to `Typing`,
    /// shows the cancel affordance, and supersedes every in-flight fetch by
    /// bumping the generation. A ticket is issued only when the query is long
    /// enough and the field is being edited by the user (the enable-search
    /// gate); otherwise stale suggestions are dropped and nothing goes out.
    pub fn input(&mut self, text: &str) -> Option<FetchTicket> {
        if text.is_empty() {
            self.clear();
            return None;
        }

        self.query = text.to_string();
        self.phase = SearchPhase::Typing;
        self.cancel_visible = true;
        if self.focused {
            self.search_enabled = true;
        }
        self.generation += 1;

        if text.chars().count() < self.config.min_query_len || !self.search_enabled {
            self.suggestions.clear();
            return None;
        }

        Some(FetchTicket {
            generation: self.generation,
            request: AutocompleteRequest {
                text: self.query.clone(),
                limit: self.config.limit,
                bias: self.bias,
                language: self.config.language.clone(),
            },
        })
    }

    /// Land the result of a fetch issued for `generation`.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        result: Result<Vec<Suggestion>, ProviderError>,
    ) -> ApplyOutcome {
        if generation != self.generation {
            tracing::trace!(
                fetched = generation,
                current = self.generation,
                "discarding suggestions for a superseded query"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(suggestions) if !suggestions.is_empty() => {
                self.suggestions = suggestions;
                self.phase = SearchPhase::SuggestionsShown;
                ApplyOutcome::Applied
            }
            Ok(_) => {
                self.suggestions.clear();
                ApplyOutcome::Empty
            }
            Err(err) => {
                tracing::warn!(query = %self.query, error = %err, "suggestion fetch failed");
                self.suggestions.clear();
                ApplyOutcome::Failed
            }
        }
    }

    /// Pick the suggestion at `index` and hand it to the selection handler.
    ///
    /// Only valid while suggestions are shown; anything else is a no-op that
    /// returns `false`. A successful pick ends the session like an explicit
    /// clear.
    pub fn select(&mut self, index: usize) -> bool {
        if self.phase != SearchPhase::SuggestionsShown {
            return false;
        }
        let Some(suggestion) = self.suggestions.get(index) else {
            return false;
        };

        self.phase = SearchPhase::Selected;
        let location = SelectedLocation {
            coordinate: suggestion.coordinate,
            address: suggestion.formatted.clone(),
        };
        (self.handler)(location);
        self.clear();
        true
    }

    /// Reset to `Idle`: empty field, no suggestions, cancel hidden, gate
    /// closed. Bumps the generation so in-flight fetches land stale.
    pub fn clear(&mut self) {
        self.query.clear();
        self.suggestions.clear();
        self.phase = SearchPhase::Idle;
        self.cancel_visible = false;
        self.search_enabled = false;
        self.generation += 1;
    }
}

/// Drive one ticket through debounce, fetch, and apply.
///
/// Sleeps out the debounce window first; a ticket superseded during the
/// sleep never reaches the network, which is the closest thing to request
/// cancellation this layer needs. Locks are taken briefly and never held
/// across an await.
pub async fn run_fetch(
    controller: Arc<Mutex<SearchController>>,
    provider: Arc<dyn AutocompleteProvider>,
    ticket: FetchTicket,
) -> ApplyOutcome {
    let debounce = controller
        .lock()
        .expect("search controller lock poisoned")
        .config
        .debounce;
    tokio::time::sleep(debounce).await;

    {
        let controller = controller.lock().expect("search controller lock poisoned");
        if controller.generation != ticket.generation {
            tracing::trace!(
                ticket = ticket.generation,
                current = controller.generation,
                "query superseded during debounce, skipping fetch"
            );
            return ApplyOutcome::Stale;
        }
    }

    let result = provider.suggest(&ticket.request).await;

    let mut controller = controller.lock().expect("search controller lock poisoned");
    controller.apply_fetch(ticket.generation, result)
}
