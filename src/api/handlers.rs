//! API Handlers
//!
//! HTTP request handlers for the shell endpoints and the intercept fallback.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    Json,
};

use crate::cache::{CacheStorage, MemoryCacheStorage};
use crate::chat::Responder;
use crate::config::Config;
use crate::error::Result;
use crate::models::{ChatRequest, ChatResponse, HealthResponse, JamResponse, StatusResponse};
use crate::shell::{AssetRequest, AssetResponse, HttpFetcher, OfflineShell, ShellOptions};
use crate::tasks::Sequencer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<OfflineShell>,
    pub sequencer: Arc<Sequencer>,
    pub responder: Responder,
}

impl AppState {
    /// Creates a new AppState around an existing shell.
    pub fn new(shell: OfflineShell) -> Self {
        Self {
            shell: Arc::new(shell),
            sequencer: Arc::new(Sequencer::new()),
            responder: Responder::default(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires an in-memory store and an HTTP fetcher aimed at the upstream
    /// origin.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage: Arc<dyn CacheStorage> = Arc::new(MemoryCacheStorage::new());
        let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout())?);
        let shell = OfflineShell::new(storage, fetcher, ShellOptions::new(config.origin()?));
        Ok(Self::new(shell))
    }
}

/// Fallback handler: every request not addressed to `/_shell/*`.
///
/// Resolves the request against the upstream origin and runs it through
/// the cache-first intercept. An unresolved request becomes a 502.
pub async fn intercept_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<AssetResponse> {
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let url = state.shell.resolve(path)?;

    let request = AssetRequest::new(method, url)
        .with_headers(headers)
        .with_body(body);
    state.shell.intercept(request).await
}

/// Handler for POST /_shell/chat
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let reply = state.responder.reply(&req.text, &mut rand::thread_rng())?;
    Ok(Json(ChatResponse::new(reply, req.speak)))
}

/// Handler for GET /_shell/jam
pub async fn jam_handler(State(state): State<AppState>) -> Json<JamResponse> {
    Json(JamResponse::new(
        state.sequencer.is_running(),
        state.sequencer.step(),
        state.sequencer.last_beat(),
    ))
}

/// Handler for POST /_shell/jam/toggle
pub async fn jam_toggle_handler(State(state): State<AppState>) -> Json<JamResponse> {
    let running = state.sequencer.toggle();
    Json(JamResponse::new(
        running,
        state.sequencer.step(),
        state.sequencer.last_beat(),
    ))
}

/// Handler for GET /_shell/status
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let lifecycle = state.shell.lifecycle().await;
    let active = lifecycle.active().map(str::to_string);
    let cached_entries = active
        .as_deref()
        .map_or(0, |generation| state.shell.storage().len(generation));

    Json(StatusResponse::new(
        active,
        lifecycle.incoming().cloned(),
        cached_entries,
        state.shell.stats().await,
    ))
}

/// Handler for GET /_shell/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
