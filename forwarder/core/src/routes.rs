//! HTTP Routes
//!
//! The forwarder exposes exactly two routes, each making one upstream call:
//!
//! | Route | Upstream | Failure payload |
//! |---|---|---|
//! | `POST /api/generate` | `POST /api/generate` | `Failed to generate response from Ollama` |
//! | `GET /api/tags` | `GET /api/tags` | `Failed to fetch models` |
//!
//! Successful upstream bodies are relayed byte-for-byte with status 200.
//! Every failure (connect error, timeout, non-2xx) becomes HTTP 500 with a
//! fixed `{"error": ...}` body; the cause is logged, never returned.
//!
//! Cross-origin requests are accepted from any origin.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::messages::{ErrorBody, GENERATE_FAILED, TAGS_FAILED};
use crate::upstream::{ModelServer, UpstreamClient};

/// Shared handler state
///
/// Holds only the upstream handle; nothing is mutated between requests.
#[derive(Clone)]
pub struct AppState {
    upstream: Arc<dyn ModelServer>,
}

impl AppState {
    /// Wrap any [`ModelServer`] implementation
    pub fn new(upstream: impl ModelServer + 'static) -> Self {
        Self {
            upstream: Arc::new(upstream),
        }
    }
}

impl From<UpstreamClient> for AppState {
    fn from(client: UpstreamClient) -> Self {
        Self::new(client)
    }
}

/// Build the forwarder router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/tags", get(tags))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow any origin, the way a browser surface served from elsewhere needs
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

/// `POST /api/generate`
async fn generate(State(state): State<AppState>, Json(body): Json<serde_json::Value>) -> Response {
    debug!(model = ?body.get("model"), "Forwarding generate request");

    match state.upstream.generate(&body).await {
        Ok(bytes) => relay(bytes),
        Err(e) => {
            error!(error = %e, route = "/api/generate", "Error proxying to Ollama");
            failure(GENERATE_FAILED)
        }
    }
}

/// `GET /api/tags`
async fn tags(State(state): State<AppState>) -> Response {
    debug!("Forwarding tags request");

    match state.upstream.tags().await {
        Ok(bytes) => relay(bytes),
        Err(e) => {
            error!(error = %e, route = "/api/tags", "Error fetching models from Ollama");
            failure(TAGS_FAILED)
        }
    }
}

/// Relay an upstream body untouched
fn relay(bytes: Bytes) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        bytes,
    )
        .into_response()
}

fn failure(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(message)),
    )
        .into_response()
}
