//! # chatrelay_api
//!
//! HTTP API library for the chat relay.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use chatrelay_core::secrets::{EnvSecret, SecretSource};
use chatrelay_core::upstream::{GeminiClient, UpstreamError};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{health, relay};
use crate::middleware::cors;

/// Route paths.
pub mod routes {
    /// Relay endpoint.
    pub const POST_RELAY: &str = "/relay";
    /// Same handler under the hosted edge-function path.
    pub const POST_FUNCTIONS_CHAT: &str = "/functions/v1/chat";
    /// Liveness probe.
    pub const GET_HEALTH: &str = "/health";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Upstream Gemini client (shares one connection pool across requests).
    pub upstream: GeminiClient,
    /// Source of the upstream API key, consulted on every request.
    pub secrets: Arc<dyn SecretSource>,
}

impl AppState {
    /// Builds state whose API key comes from the environment variable named
    /// in `config.api_key_var`.
    pub fn from_config(config: ApiConfig) -> Result<Self, UpstreamError> {
        let secrets = Arc::new(EnvSecret::new(config.api_key_var.clone()));
        Self::with_secrets(config, secrets)
    }

    /// Builds state with an explicit key source.
    pub fn with_secrets(
        config: ApiConfig,
        secrets: Arc<dyn SecretSource>,
    ) -> Result<Self, UpstreamError> {
        let upstream = GeminiClient::new(&config.upstream_base_url, config.model.clone())?;
        Ok(Self {
            config,
            upstream,
            secrets,
        })
    }
}

/// Builds the Axum router with all routes and shared state.
///
/// Layers run outermost-last: the CORS headers wrap the preflight
/// short-circuit, so preflight replies carry them too.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(routes::POST_RELAY, post(relay::relay_handler))
        .route(routes::POST_FUNCTIONS_CHAT, post(relay::relay_handler))
        .route(routes::GET_HEALTH, get(health::health_handler))
        .layer(axum::middleware::from_fn(cors::preflight))
        .layer(cors::allow_headers_layer())
        .layer(cors::allow_origin_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
