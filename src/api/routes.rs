//! Route configuration

use axum::{
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::assessment::handlers::{analyze_damage, AssessmentState};
use crate::metrics::METRICS;

/// Build the application router
///
/// The body limit replaces axum's 2 MB default, which is too small for
/// base64-encoded photos. Oversized bodies surface as a JSON extractor
/// rejection, so the handler answers them with the usual error body.
pub fn build_router(state: AssessmentState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/analyze-damage", post(analyze_damage))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Prometheus scrape endpoint
async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}
