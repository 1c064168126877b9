//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use super::handlers::{health, info, status};
use crate::metrics::{metrics_router, track_requests};

/// Routes served under the `/api` prefix.
pub fn api_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/status", get(status))
}

/// Create the mock service router.
///
/// `GET /metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_router(metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new().nest("/api", api_routes());

    if let Some(handle) = metrics {
        router = router.merge(metrics_router(handle));
    }

    router
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
}
