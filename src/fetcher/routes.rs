//! HTTP surface of the vulnerability fetcher.

use std::sync::Arc;

use axum::{extract::State, middleware, routing::get, Json, Router};
use chrono::{NaiveDateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::client::SnykClient;
use super::types::{PermitDocument, SnykReport};
use crate::config::Config;
use crate::error::FetcherError;
use crate::metrics::{metrics_router, track_requests};

/// Fetcher state shared with handlers.
pub type FetcherState = Arc<SnykClient>;

/// Fetcher health response.
#[derive(Debug, Serialize)]
pub struct FetcherHealth {
    /// Always "healthy".
    pub status: &'static str,
    /// UTC time of the check.
    pub timestamp: NaiveDateTime,
}

/// Health check handler.
pub async fn health() -> Json<FetcherHealth> {
    Json(FetcherHealth {
        status: "healthy",
        timestamp: Utc::now().naive_utc(),
    })
}

/// Categorized vulnerability report.
pub async fn snyk(State(client): State<FetcherState>) -> Result<Json<SnykReport>, FetcherError> {
    client.fetch_report().await.map(Json)
}

/// Report reshaped for policy evaluation.
pub async fn fetch_and_format(
    State(client): State<FetcherState>,
) -> Result<Json<PermitDocument>, FetcherError> {
    let report = client.fetch_report().await?;
    Ok(Json(PermitDocument::from(report)))
}

/// Create the fetcher router.
pub fn create_fetcher_router(client: SnykClient, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/snyk", get(snyk))
        .route("/fetch-and-format", get(fetch_and_format))
        .with_state(Arc::new(client));

    if let Some(handle) = metrics {
        router = router.merge(metrics_router(handle));
    }

    router
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
}

/// Build the Snyk client from `config` and wrap it in the fetcher router.
pub fn fetcher_router_from_config(
    config: &Config,
    metrics: Option<PrometheusHandle>,
) -> crate::Result<Router> {
    let client = SnykClient::new(config)?;
    Ok(create_fetcher_router(client, metrics))
}
