//! HTTP API handlers for the mock service.

use axum::Json;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "gating-poc-app";

/// Service version reported by the health endpoint.
pub const SERVICE_VERSION: &str = "1.0.0";

/// Body of `GET /api/status`.
pub const STATUS_MESSAGE: &str = "Service is running";

/// Health check response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    /// Always "UP".
    pub status: &'static str,
    /// Local wall-clock time, no offset.
    pub timestamp: NaiveDateTime,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
}

impl HealthResponse {
    /// Build the health payload observed at `timestamp`.
    pub fn at(timestamp: NaiveDateTime) -> Self {
        Self {
            status: "UP",
            timestamp,
            service: SERVICE_NAME,
            version: SERVICE_VERSION,
        }
    }
}

/// Info response describing the application and its declared weaknesses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoResponse {
    /// Application name.
    pub application: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Known vulnerable components by severity.
    pub vulnerabilities: DeclaredVulnerabilities,
}

/// Vulnerable components the mock service ships with, keyed by severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredVulnerabilities {
    /// Critical severity component.
    pub critical: &'static str,
    /// High severity component.
    pub high: &'static str,
    /// Medium severity component.
    pub medium: &'static str,
}

/// The fixed info payload.
pub const INFO: InfoResponse = InfoResponse {
    application: "CI/CD Gating PoC",
    description: "Mock application with intentional vulnerabilities for testing gates",
    vulnerabilities: DeclaredVulnerabilities {
        critical: "log4j 2.14.1 (CVE-2021-44228)",
        high: "commons-collections 3.2.1 (CVE-2015-6420)",
        medium: "jackson-databind 2.9.10.1",
    },
};

/// Health check handler - always returns 200.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::at(Local::now().naive_local()))
}

/// Info handler - returns the static application description.
pub async fn info() -> Json<InfoResponse> {
    Json(INFO)
}

/// Status handler - plain text liveness message.
pub async fn status() -> &'static str {
    STATUS_MESSAGE
}
