//! Debounce timer and request lifecycle arbitration
//!
//! Both request kinds follow the same discipline: claim a token, run
//! the request, and apply the response only while the token is still
//! the newest. Anything else is stale and dropped without touching the
//! view state. Search tokens are claimed in the submit path itself so
//! token order always matches user-event order; autocomplete tokens
//! are claimed when the debounce timer fires.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use midicat_common::events::SearchEvent;
use midicat_common::QueryDescriptor;

use super::SessionInner;

impl SessionInner {
    /// Arm the autocomplete debounce timer for `text`
    ///
    /// A previously armed timer is cancelled first, so at most one
    /// timer is pending and only the newest text can reach the network.
    pub(super) fn arm_debounce(self: Arc<Self>, text: String) {
        let cancel = CancellationToken::new();
        {
            let mut slot = self.debounce_cancel.lock().unwrap();
            if let Some(prev) = slot.replace(cancel.clone()) {
                prev.cancel();
            }
        }

        let delay = Duration::from_millis(self.config.debounce_ms);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    self.issue_autocomplete(&text).await;
                }
            }
        });
    }

    /// Cancel the pending debounce timer, if any
    pub(super) fn cancel_debounce(&self) {
        let mut slot = self.debounce_cancel.lock().unwrap();
        if let Some(prev) = slot.take() {
            prev.cancel();
        }
    }

    /// Fetch suggestions for `text`, applying only the newest response
    ///
    /// Failures are silent at the surface: the list clears and a
    /// warning is logged. Search results are never touched from here.
    pub(super) async fn issue_autocomplete(&self, text: &str) {
        let token = self.autocomplete_gen.advance();

        tracing::debug!(text = %text, token, "Issuing autocomplete request");

        let outcome = self.client.autocomplete(text).await;

        let mut state = self.state.write().await;
        if !self.autocomplete_gen.is_current(token) {
            tracing::debug!(token, "Discarding stale autocomplete response");
            return;
        }

        match outcome {
            Ok(suggestions) => {
                state.suggestions = suggestions.clone();
                drop(state);
                self.event_bus.emit_lossy(SearchEvent::SuggestionsUpdated {
                    suggestions,
                    timestamp: Utc::now(),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Autocomplete request failed");
                if !state.suggestions.is_empty() {
                    state.suggestions.clear();
                    drop(state);
                    self.event_bus.emit_lossy(SearchEvent::SuggestionsUpdated {
                        suggestions: Vec::new(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }
    }

    /// Run `descriptor` in a spawned task so submits never block the caller
    ///
    /// `token` is claimed by the caller before spawning, so settlement
    /// order follows submit order regardless of task scheduling.
    pub(super) fn spawn_search(self: Arc<Self>, token: u64, descriptor: QueryDescriptor) {
        tokio::spawn(async move {
            self.issue_search(token, descriptor).await;
        });
    }

    /// Execute one search, applying only the newest settlement
    ///
    /// A task that is already superseded when it starts issues nothing.
    /// The in-flight flag stays set until the newest token settles; an
    /// older response can neither clear it nor replace results. On
    /// failure the previous results stay visible behind the error
    /// banner.
    pub(super) async fn issue_search(&self, token: u64, descriptor: QueryDescriptor) {
        {
            let mut state = self.state.write().await;
            if !self.search_gen.is_current(token) {
                tracing::debug!(token, "Skipping search superseded before issue");
                return;
            }
            state.searching = true;
        }
        self.event_bus.emit_lossy(SearchEvent::SearchStarted {
            descriptor: descriptor.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(token, text = ?descriptor.text, "Issuing search request");

        let outcome = self.client.search(&descriptor).await;

        let mut state = self.state.write().await;
        if !self.search_gen.is_current(token) {
            tracing::debug!(token, "Discarding stale search response");
            return;
        }

        state.searching = false;
        match outcome {
            Ok(results) => {
                let result_count = results.len();
                state.error = None;
                state.results = results;
                drop(state);
                self.event_bus.emit_lossy(SearchEvent::SearchCompleted {
                    result_count,
                    timestamp: Utc::now(),
                });
            }
            Err(e) => {
                let message = format!("Search failed: {}", e);
                tracing::warn!(error = %e, "Search request failed");
                state.error = Some(message.clone());
                drop(state);
                self.event_bus.emit_lossy(SearchEvent::SearchFailed {
                    message,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Empty the suggestion list, broadcasting only on an actual change
    pub(super) async fn clear_suggestions(&self) {
        let mut state = self.state.write().await;
        if state.suggestions.is_empty() {
            return;
        }
        state.suggestions.clear();
        drop(state);
        self.event_bus.emit_lossy(SearchEvent::SuggestionsUpdated {
            suggestions: Vec::new(),
            timestamp: Utc::now(),
        });
    }
}
