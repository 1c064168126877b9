//! Vulnerability data fetcher.
//!
//! This module handles:
//! - Snyk API client and project discovery
//! - Report types, severity grouping, and gating decisions
//! - Mock report served when live data is unavailable
//! - HTTP routes for the fetcher service

pub mod client;
pub mod mock;
pub mod routes;
pub mod types;

pub use client::{categorize, select_project, SnykClient};
pub use mock::{mock_report, MOCK_PROJECT_ID};
pub use routes::{create_fetcher_router, fetcher_router_from_config};
pub use types::{GatingDecision, PermitDocument, Severity, SeverityBuckets, SnykReport, Summary, Vulnerability};
