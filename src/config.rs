//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

use crate::error::{Result, ServiceError};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP port for the mock service endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP port for the vulnerability fetcher.
    #[serde(default = "default_fetcher_port")]
    pub fetcher_port: u16,

    // === Snyk Credentials ===
    /// Snyk API token.
    #[serde(default)]
    pub snyk_token: Option<String>,

    /// Snyk organization id.
    #[serde(default)]
    pub snyk_org_id: Option<String>,

    /// Pin a specific project (bypasses project discovery).
    #[serde(default)]
    pub snyk_project_id: Option<String>,

    /// Snyk v1 REST API base URL.
    #[serde(default = "default_snyk_api_base")]
    pub snyk_api_base: String,

    /// Timeout for upstream Snyk requests.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_fetcher_port() -> u16 {
    8000
}

fn default_snyk_api_base() -> String {
    "https://api.snyk.io/v1".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn invalid(reason: impl Into<String>) -> ServiceError {
    ServiceError::InvalidConfig(reason.into())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            fetcher_port: default_fetcher_port(),
            snyk_token: None,
            snyk_org_id: None,
            snyk_project_id: None,
            snyk_api_base: default_snyk_api_base(),
            http_timeout_ms: default_http_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.http_timeout_ms == 0 {
            return Err(invalid("HTTP_TIMEOUT_MS must be greater than 0"));
        }

        match Url::parse(&self.snyk_api_base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(invalid(format!(
                    "SNYK_API_BASE must be http or https, got {}",
                    url.scheme()
                )))
            }
            Err(e) => return Err(invalid(format!("SNYK_API_BASE is not a valid URL: {}", e))),
        }

        Ok(())
    }

    /// Whether both token and organization id are present and non-empty.
    pub fn has_snyk_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.snyk_token) && present(&self.snyk_org_id)
    }

    /// Snyk API base without a trailing slash.
    pub fn snyk_api_base_trimmed(&self) -> &str {
        self.snyk_api_base.trim_end_matches('/')
    }
}
