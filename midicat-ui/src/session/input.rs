//! User-facing event handlers
//!
//! Each handler applies one interaction to the view state and decides
//! whether network traffic follows. Handlers return once state is
//! updated; requests run in spawned tasks and settle through
//! `requests.rs`.

use chrono::Utc;

use midicat_common::events::SearchEvent;
use midicat_common::facets::{Difficulty, Genre};
use midicat_common::query;
use midicat_common::FilterState;

use super::SearchSession;

impl SearchSession {
    /// Replace the free text, re-arming the autocomplete debounce timer
    ///
    /// Trimmed text shorter than the configured minimum issues no
    /// request: the timer is cancelled, anything in flight is retired,
    /// and stale suggestions clear immediately.
    pub async fn set_query_text(&self, text: &str) {
        let trimmed = text.trim().to_string();

        {
            let mut state = self.inner.state.write().await;
            state.query_text = text.to_string();
        }

        if trimmed.chars().count() < self.inner.config.min_autocomplete_len {
            self.inner.cancel_debounce();
            self.inner.autocomplete_gen.advance();
            self.inner.clear_suggestions().await;
        } else {
            self.inner.clone().arm_debounce(trimmed);
        }
    }

    /// Toggle a difficulty facet
    pub async fn toggle_difficulty(&self, difficulty: Difficulty) {
        self.update_filters(|filters| filters.toggle_difficulty(difficulty))
            .await;
    }

    /// Toggle a genre facet
    pub async fn toggle_genre(&self, genre: Genre) {
        self.update_filters(|filters| filters.toggle_genre(genre))
            .await;
    }

    /// Set or clear the lower tempo bound (BPM)
    pub async fn set_tempo_min(&self, bpm: Option<u32>) {
        self.update_filters(|filters| filters.set_tempo_min(bpm))
            .await;
    }

    /// Set or clear the upper tempo bound (BPM)
    pub async fn set_tempo_max(&self, bpm: Option<u32>) {
        self.update_filters(|filters| filters.set_tempo_max(bpm))
            .await;
    }

    /// Set or clear the maximum duration in seconds
    pub async fn set_duration_max(&self, seconds: Option<f64>) {
        self.update_filters(|filters| filters.set_duration_max(seconds))
            .await;
    }

    /// Set the minimum quality score
    pub async fn set_min_quality(&self, score: f64) {
        self.update_filters(|filters| filters.set_min_quality(score))
            .await;
    }

    /// Reset the free text and all filters to their defaults
    ///
    /// Cancels the pending debounce timer and retires any in-flight
    /// autocomplete, so a late response cannot repopulate the list.
    /// Clearing an already-clear session is a no-op.
    pub async fn clear_filters(&self) {
        self.inner.cancel_debounce();
        self.inner.autocomplete_gen.advance();
        self.inner.clear_suggestions().await;

        let filters = {
            let mut state = self.inner.state.write().await;
            state.query_text.clear();
            state.filters.clear();
            state.filters.clone()
        };

        self.inner.event_bus.emit_lossy(SearchEvent::FiltersChanged {
            filters,
            timestamp: Utc::now(),
        });
    }

    /// Submit a search with the current text and filters
    ///
    /// Retires any pending autocomplete and clears the suggestion list
    /// at issue time. Suppressed entirely when the trimmed text is
    /// empty and no facet is selected; numeric constraints alone do
    /// not qualify.
    pub async fn submit_search(&self) {
        self.inner.cancel_debounce();
        self.inner.autocomplete_gen.advance();
        self.inner.clear_suggestions().await;

        let (text, filters) = {
            let state = self.inner.state.read().await;
            (state.query_text.clone(), state.filters.clone())
        };

        if text.trim().is_empty() && !filters.has_facet_selection() {
            tracing::debug!("Suppressing search with no text and no facet selection");
            return;
        }

        let descriptor = query::build_descriptor(&text, &filters, self.inner.config.search_limit);
        let token = self.inner.search_gen.advance();
        self.inner.clone().spawn_search(token, descriptor);
    }

    /// Adopt `suggestion` as the query text and search immediately
    ///
    /// Bypasses the debounce timer. The suggestion list clears at
    /// issue time so a stale autocomplete response cannot resurrect it.
    pub async fn pick_suggestion(&self, suggestion: &str) {
        self.inner.cancel_debounce();
        self.inner.autocomplete_gen.advance();

        let filters = {
            let mut state = self.inner.state.write().await;
            state.query_text = suggestion.to_string();
            state.filters.clone()
        };
        self.inner.clear_suggestions().await;

        if suggestion.trim().is_empty() && !filters.has_facet_selection() {
            return;
        }

        let descriptor =
            query::build_descriptor(suggestion, &filters, self.inner.config.search_limit);
        let token = self.inner.search_gen.advance();
        self.inner.clone().spawn_search(token, descriptor);
    }

    /// Dismiss the suggestion list without searching
    ///
    /// Cancels the pending debounce timer and retires any in-flight
    /// autocomplete so a late response cannot reopen the list.
    pub async fn dismiss_suggestions(&self) {
        self.inner.cancel_debounce();
        self.inner.autocomplete_gen.advance();
        self.inner.clear_suggestions().await;
    }

    /// Apply one mutation to the filter state and broadcast the result
    async fn update_filters<F>(&self, apply: F)
    where
        F: FnOnce(&mut FilterState),
    {
        let filters = {
            let mut state = self.inner.state.write().await;
            apply(&mut state.filters);
            state.filters.clone()
        };

        self.inner.event_bus.emit_lossy(SearchEvent::FiltersChanged {
            filters,
            timestamp: Utc::now(),
        });
    }
}
