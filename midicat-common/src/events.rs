//! Search session event types and broadcast bus
//!
//! Events are broadcast via [`EventBus`] so observers (the terminal
//! front end, tests, future push channels) can follow the search
//! lifecycle without polling snapshots.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::filter::FilterState;
use crate::query::QueryDescriptor;

/// Search session event types
///
/// Every variant carries the moment it was produced. Events serialize
/// with a `type` tag so they can be logged or forwarded as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchEvent {
    /// Autocomplete suggestions replaced
    ///
    /// Triggers:
    /// - UI: Redraw the suggestion list (possibly empty)
    SuggestionsUpdated {
        /// Replacement suggestion list, newest response wins
        suggestions: Vec<String>,
        /// When the suggestions were applied
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Filter state changed (facet toggle, numeric edit, or clear)
    ///
    /// Triggers:
    /// - UI: Redraw filter controls
    FiltersChanged {
        /// Complete filter state after the change
        filters: FilterState,
        /// When the change was applied
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A search request was issued to the catalog
    ///
    /// Triggers:
    /// - UI: Show the in-flight indicator
    SearchStarted {
        /// Exact descriptor sent to the catalog
        descriptor: QueryDescriptor,
        /// When the request was issued
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The newest search settled successfully
    ///
    /// Triggers:
    /// - UI: Redraw the result list, clear the in-flight indicator
    SearchCompleted {
        /// Number of results now visible
        result_count: usize,
        /// When the results were applied
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The newest search settled with an error
    ///
    /// Previous results stay visible; only the error banner changes.
    ///
    /// Triggers:
    /// - UI: Show the error banner, clear the in-flight indicator
    SearchFailed {
        /// Human-readable failure description
        message: String,
        /// When the failure was recorded
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Central event broadcast bus
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
///
/// # Examples
///
/// ```
/// use midicat_common::events::{EventBus, SearchEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit(SearchEvent::SearchCompleted {
///     result_count: 3,
///     timestamp: chrono::Utc::now(),
/// }).ok();
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SearchEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Old events are dropped once `capacity` unread events are queued
    /// for a subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SearchEvent,
    ) -> Result<usize, broadcast::error::SendError<SearchEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Used for routine lifecycle events where a momentarily empty
    /// subscriber set is acceptable.
    pub fn emit_lossy(&self, event: SearchEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
