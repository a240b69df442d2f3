//! In-process catalog service fixture
//!
//! Serves the two catalog endpoints on an ephemeral local port and
//! records every request it handles, so tests can assert on exactly
//! what the client sent. Responses are scripted per query text, which
//! lets one test serve a slow answer to an early request and a fast
//! answer to a later one.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;

use midicat_common::config::SearchConfig;

/// One captured request with its decoded query parameters
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl CapturedRequest {
    /// Values for one repeated query key, in arrival order
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value for a key
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values(key).into_iter().next()
    }
}

/// Scripted behavior for one endpoint
#[derive(Debug, Clone, Default)]
struct Script {
    /// JSON body per query text; the empty-string key is the default
    bodies: HashMap<String, String>,
    /// Artificial response delay per query text
    delays: HashMap<String, Duration>,
    /// When set, every request gets this status with a plain body
    fail_status: Option<u16>,
}

impl Script {
    async fn respond(&self, text: &str) -> Response {
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(status) = self.fail_status {
            let status = StatusCode::from_u16(status).expect("Invalid scripted status");
            return (status, "fixture failure".to_string()).into_response();
        }

        let body = self
            .bodies
            .get(text)
            .or_else(|| self.bodies.get(""))
            .cloned()
            .unwrap_or_else(|| "[]".to_string());

        ([(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

#[derive(Clone, Default)]
struct FixtureState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    autocomplete: Arc<Mutex<Script>>,
    search: Arc<Mutex<Script>>,
}

async fn autocomplete_handler(
    State(state): State<FixtureState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    handle(&state, "/autocomplete", &state.autocomplete, params).await
}

async fn search_handler(
    State(state): State<FixtureState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    handle(&state, "/search", &state.search, params).await
}

async fn handle(
    state: &FixtureState,
    path: &str,
    script: &Arc<Mutex<Script>>,
    params: Vec<(String, String)>,
) -> Response {
    let text = params
        .iter()
        .find(|(k, _)| k == "query")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();

    state.requests.lock().await.push(CapturedRequest {
        path: path.to_string(),
        params,
    });

    // Clone the script so a scripted delay never holds the lock
    let script = script.lock().await.clone();
    script.respond(&text).await
}

/// Catalog service fixture listening on an ephemeral port
pub struct CatalogFixture {
    base_url: String,
    state: FixtureState,
    server: tokio::task::JoinHandle<()>,
}

impl CatalogFixture {
    /// Bind and start serving; returns once the listener is ready
    pub async fn start() -> Self {
        let state = FixtureState::default();

        let router = Router::new()
            .route("/autocomplete", get(autocomplete_handler))
            .route("/search", get(search_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fixture listener");
        let addr = listener.local_addr().expect("Fixture has no local addr");

        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// SearchConfig pointed at this fixture with test-friendly timing
    pub fn config(&self) -> SearchConfig {
        SearchConfig {
            service_url: self.base_url.clone(),
            debounce_ms: 150,
            min_autocomplete_len: 2,
            search_limit: 50,
            request_timeout_secs: 5,
        }
    }

    /// Serve `suggestions` for autocomplete requests whose query is `text`
    pub async fn suggest(&self, text: &str, suggestions: &[&str]) {
        let body = serde_json::to_string(suggestions).expect("Suggestions must serialize");
        self.state
            .autocomplete
            .lock()
            .await
            .bodies
            .insert(text.to_string(), body);
    }

    /// Serve `suggestions` for every autocomplete request
    pub async fn suggest_default(&self, suggestions: &[&str]) {
        self.suggest("", suggestions).await;
    }

    /// Serve raw JSON `body` for search requests whose query is `text`
    pub async fn answer_search(&self, text: &str, body: &str) {
        self.state
            .search
            .lock()
            .await
            .bodies
            .insert(text.to_string(), body.to_string());
    }

    /// Serve raw JSON `body` for every search request
    pub async fn answer_search_default(&self, body: &str) {
        self.answer_search("", body).await;
    }

    /// Delay autocomplete responses for query `text`
    pub async fn delay_autocomplete(&self, text: &str, delay: Duration) {
        self.state
            .autocomplete
            .lock()
            .await
            .delays
            .insert(text.to_string(), delay);
    }

    /// Delay search responses for query `text`
    pub async fn delay_search(&self, text: &str, delay: Duration) {
        self.state
            .search
            .lock()
            .await
            .delays
            .insert(text.to_string(), delay);
    }

    /// Force every autocomplete response to `status`
    pub async fn fail_autocomplete(&self, status: u16) {
        self.state.autocomplete.lock().await.fail_status = Some(status);
    }

    /// Force every search response to `status`
    pub async fn fail_search(&self, status: u16) {
        self.state.search.lock().await.fail_status = Some(status);
    }

    /// Stop forcing failures on both endpoints
    pub async fn heal(&self) {
        self.state.autocomplete.lock().await.fail_status = None;
        self.state.search.lock().await.fail_status = None;
    }

    /// All captured requests, in arrival order
    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Captured requests for one path
    pub async fn requests_for(&self, path: &str) -> Vec<CapturedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Number of requests seen for one path
    pub async fn count(&self, path: &str) -> usize {
        self.requests_for(path).await.len()
    }
}

impl Drop for CatalogFixture {
    fn drop(&mut self) {
        self.server.abort();
    }
}
