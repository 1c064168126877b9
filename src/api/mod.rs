//! HTTP API module for the mock service's health, info, and status endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::{HealthResponse, InfoResponse, INFO, SERVICE_NAME, SERVICE_VERSION};
pub use routes::{api_routes, create_router};
