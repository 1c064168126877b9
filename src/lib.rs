//! Mock microservice for exercising CI/CD security gates.
//!
//! The service intentionally advertises vulnerable dependencies so that a
//! pipeline's scanning and policy stages have something to block on. It
//! exposes three endpoints under `/api`:
//!
//! ```text
//! GET /api/health  -> {"status":"UP","timestamp":...,"service":"gating-poc-app","version":"1.0.0"}
//! GET /api/info    -> {"application":"CI/CD Gating PoC",...,"vulnerabilities":{...}}
//! GET /api/status  -> Service is running
//! ```
//!
//! A companion fetcher pulls the project's issues from Snyk, groups them by
//! severity and derives hard/soft gate flags for the policy engine.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: Mock service HTTP endpoints
//! - [`fetcher`]: Snyk vulnerability fetcher and its HTTP endpoints
//! - [`metrics`]: Prometheus request metrics
//! - [`utils`]: Server bootstrap and shutdown helpers

pub mod api;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{FetcherError, Result, ServiceError};
