//! HTTP surface of the bridge.
//!
//! Two endpoints for the upstream form plus a health check:
//! - `POST /sendEav` — submit one acquisition proposal (form-encoded)
//! - `POST /sendToElisa` — forward pre-built titles, fire-and-forget
//! - `GET /status` — health

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::submit::Submitter;

/// Shared state for API handlers.
pub struct ApiState {
    /// The submission pipeline with its collaborators.
    pub submitter: Submitter,
}

impl ApiState {
    pub fn new(submitter: Submitter) -> Self {
        Self { submitter }
    }
}

/// Build the API router with all routes.
pub fn router(state: Arc<ApiState>) -> Router {
    // The form is served from a different origin than this bridge.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/status", get(handlers::health))
        .route("/sendEav", post(handlers::send_eav))
        .route("/sendToElisa", post(handlers::send_to_elisa))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

/// Serve the API on the given address.
pub async fn serve(state: Arc<ApiState>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!("elisa-bridge listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
