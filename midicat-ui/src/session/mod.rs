//! Search session coordinator
//!
//! **Module Structure:**
//! - `input.rs`: User-facing event handlers (text edits, facet toggles, submits)
//! - `requests.rs`: Debounce timer and request lifecycle arbitration
//!
//! One session owns the complete interaction state for a catalog
//! search screen. User events mutate that state through the handlers
//! in `input.rs`; network traffic is issued and arbitrated in
//! `requests.rs`. Observers either poll [`SearchSession::snapshot`]
//! or subscribe to the session's event bus.

mod input;
mod requests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;

use midicat_common::config::SearchConfig;
use midicat_common::events::{EventBus, SearchEvent};
use midicat_common::records::ResultRecord;
use midicat_common::FilterState;

use crate::client::{CatalogClient, ClientError};

const EVENT_BUS_CAPACITY: usize = 100;

/// Snapshot of everything a front end needs to render
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    /// Free text exactly as typed, untrimmed
    pub query_text: String,
    /// Active facet selections and numeric constraints
    pub filters: FilterState,
    /// Suggestions for the current text, newest response only
    pub suggestions: Vec<String>,
    /// Results of the newest settled search
    pub results: Vec<ResultRecord>,
    /// True from search issue until the newest search settles
    pub searching: bool,
    /// Error banner from the newest settled search
    pub error: Option<String>,
}

/// Monotonic token source for request arbitration
///
/// Every issued request claims a token; a response may be applied only
/// while its token is still the newest. Advancing without issuing a
/// request retires anything in flight.
struct Generation {
    counter: AtomicU64,
}

impl Generation {
    fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Claim the next token, superseding all earlier ones
    fn advance(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while `token` is the newest claimed
    fn is_current(&self, token: u64) -> bool {
        self.counter.load(Ordering::SeqCst) == token
    }
}

/// State shared between the session handle and its spawned tasks
struct SessionInner {
    config: SearchConfig,
    client: CatalogClient,
    event_bus: EventBus,
    state: RwLock<ViewState>,
    /// Arbitration for autocomplete responses
    autocomplete_gen: Generation,
    /// Arbitration for search responses
    search_gen: Generation,
    /// Cancels the pending debounce timer, if any
    debounce_cancel: std::sync::Mutex<Option<CancellationToken>>,
}

/// Interactive search session against one catalog service
///
/// All handlers are cheap to call from a UI loop: anything that talks
/// to the network runs in a spawned task and settles through the
/// arbitration in `requests.rs`.
pub struct SearchSession {
    inner: Arc<SessionInner>,
}

impl SearchSession {
    /// Create a session and its HTTP client from configuration
    pub fn new(config: SearchConfig) -> Result<Self, ClientError> {
        let client = CatalogClient::new(
            &config.service_url,
            std::time::Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                client,
                event_bus: EventBus::new(EVENT_BUS_CAPACITY),
                state: RwLock::new(ViewState::default()),
                autocomplete_gen: Generation::new(),
                search_gen: Generation::new(),
                debounce_cancel: std::sync::Mutex::new(None),
            }),
        })
    }

    /// Snapshot the current view state
    pub async fn snapshot(&self) -> ViewState {
        self.inner.state.read().await.clone()
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.inner.event_bus.subscribe()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        // Stop a pending debounce timer from firing after the handle is gone
        if let Ok(mut slot) = self.inner.debounce_cancel.lock() {
            if let Some(cancel) = slot.take() {
                cancel.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_tokens_monotonic() {
        let tokens = Generation::new();
        let first = tokens.advance();
        let second = tokens.advance();

        assert!(second > first);
        assert!(!tokens.is_current(first));
        assert!(tokens.is_current(second));
    }

    #[test]
    fn test_generation_advance_retires_current() {
        let tokens = Generation::new();
        let token = tokens.advance();
        assert!(tokens.is_current(token));

        tokens.advance();
        assert!(!tokens.is_current(token));
    }

    #[test]
    fn test_view_state_default_is_empty() {
        let state = ViewState::default();
        assert!(state.query_text.is_empty());
        assert!(state.suggestions.is_empty());
        assert!(state.results.is_empty());
        assert!(!state.searching);
        assert!(state.error.is_none());
        assert_eq!(state.filters, FilterState::default());
    }
}
