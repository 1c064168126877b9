//! Unified error types for the gating PoC services.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Unified error type for the gating PoC services.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration values failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Vulnerability fetcher error.
    #[error("fetcher error: {0}")]
    Fetcher(#[from] FetcherError),

    /// Listener bind or serve error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while pulling vulnerability data from Snyk.
#[derive(Error, Debug)]
pub enum FetcherError {
    /// Token or organization id is not configured.
    #[error("Snyk configuration missing")]
    MissingConfiguration,

    /// Upstream answered with a non-success status.
    #[error("snyk api returned {status} for {url}")]
    UpstreamStatus {
        /// Status code returned by Snyk.
        status: u16,
        /// Request URL.
        url: String,
    },

    /// Request could not be sent or the body could not be read.
    #[error("snyk request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetcherError {
    /// Whether the caller should fall back to the mock report.
    ///
    /// Only upstream failures qualify; missing configuration is surfaced.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            FetcherError::UpstreamStatus { .. } | FetcherError::Transport(_)
        )
    }
}

impl IntoResponse for FetcherError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
