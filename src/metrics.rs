//! Prometheus metrics for request and upstream tracking.
//!
//! This module provides:
//! - HTTP request counts and latency for every router
//! - Snyk fetch outcomes and latency
//! - Mock report fallbacks
//!
//! Recording goes through the `metrics` facade, so calls are no-ops until a
//! recorder is installed with [`install_prometheus`].

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Snyk fetch latency metric name.
pub const METRIC_SNYK_FETCH_LATENCY: &str = "snyk_fetch_latency_ms";
/// Snyk fetches counter metric name.
pub const METRIC_SNYK_FETCHES: &str = "snyk_fetches_total";
/// Mock report fallbacks counter metric name.
pub const METRIC_MOCK_FALLBACKS: &str = "snyk_mock_fallbacks_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_SNYK_FETCH_LATENCY,
        "Snyk issue fetch latency in milliseconds"
    );

    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests served");
    describe_counter!(
        METRIC_SNYK_FETCHES,
        "Total number of Snyk fetches by outcome"
    );
    describe_counter!(
        METRIC_MOCK_FALLBACKS,
        "Total number of times the mock report was served"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return its render handle.
///
/// Fails if a recorder is already installed for this process.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Router exposing `GET /metrics` in Prometheus text format.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}

/// Record a served HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(METRIC_HTTP_REQUEST_LATENCY, "path" => path.to_string()).record(latency_ms);
}

/// Increment the Snyk fetch counter with the given outcome label.
pub fn inc_snyk_fetches(outcome: &'static str) {
    counter!(METRIC_SNYK_FETCHES, "outcome" => outcome).increment(1);
}

/// Increment the mock fallback counter with the given reason label.
pub fn inc_mock_fallbacks(reason: &'static str) {
    counter!(METRIC_MOCK_FALLBACKS, "reason" => reason).increment(1);
}

/// Middleware recording count and latency of every request.
///
/// Unrouted requests are labelled `unmatched` to keep path cardinality bounded.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_http_request(&method, &path, response.status().as_u16(), start);
    response
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for Snyk fetches.
pub fn timer_snyk_fetch() -> LatencyTimer {
    LatencyTimer::new(METRIC_SNYK_FETCH_LATENCY)
}
