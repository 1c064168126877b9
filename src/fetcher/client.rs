//! Snyk v1 REST API client.

use std::time::Duration;

use chrono::Utc;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::error::FetcherError;
use crate::metrics;

use super::mock::mock_report;
use super::types::{IssuesResponse, Project, ProjectsResponse, SeverityBuckets, SnykIssue, SnykReport};

/// Substring identifying the mock service's project in a projects listing.
pub const PROJECT_NAME_HINT: &str = "gating-poc";

/// Snyk API client.
#[derive(Debug, Clone)]
pub struct SnykClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// API base URL without trailing slash.
    api_base: String,
    /// API token.
    token: Option<String>,
    /// Organization id.
    org_id: Option<String>,
    /// Pinned project id.
    project_id: Option<String>,
}

/// Credentials required for any upstream call.
struct Credentials<'a> {
    token: &'a str,
    org_id: &'a str,
}

impl SnykClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, FetcherError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

        Ok(Self {
            http,
            api_base: config.snyk_api_base_trimmed().to_string(),
            token: non_empty(&config.snyk_token),
            org_id: non_empty(&config.snyk_org_id),
            project_id: non_empty(&config.snyk_project_id),
        })
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn credentials(&self) -> Result<Credentials<'_>, FetcherError> {
        match (self.token.as_deref(), self.org_id.as_deref()) {
            (Some(token), Some(org_id)) => Ok(Credentials { token, org_id }),
            _ => Err(FetcherError::MissingConfiguration),
        }
    }

    fn authorized(&self, request: RequestBuilder, creds: &Credentials<'_>) -> RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, format!("token {}", creds.token))
    }

    /// Fetch a categorized report, falling back to the mock report when
    /// upstream data is unavailable.
    ///
    /// Only missing credentials are returned as an error.
    #[instrument(skip(self))]
    pub async fn fetch_report(&self) -> Result<SnykReport, FetcherError> {
        let creds = self.credentials().map_err(|e| {
            error!("Missing Snyk configuration");
            e
        })?;

        let _timer = metrics::timer_snyk_fetch();

        match self.fetch_live(&creds).await {
            Ok(Some(report)) => {
                metrics::inc_snyk_fetches("live");
                info!("Successfully fetched Snyk data: {:?}", report.summary);
                Ok(report)
            }
            Ok(None) => {
                metrics::inc_snyk_fetches("fallback");
                metrics::inc_mock_fallbacks("no_project");
                warn!("No Snyk project found, returning mock data");
                Ok(mock_report(Utc::now().naive_utc()))
            }
            Err(e) if e.is_upstream() => {
                metrics::inc_snyk_fetches("fallback");
                metrics::inc_mock_fallbacks("upstream_error");
                error!("Error fetching Snyk data: {}", e);
                Ok(mock_report(Utc::now().naive_utc()))
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_live(&self, creds: &Credentials<'_>) -> Result<Option<SnykReport>, FetcherError> {
        let project_id = match self.resolve_project(creds).await? {
            Some(id) => id,
            None => return Ok(None),
        };

        let issues = self.fetch_issues(creds, &project_id).await?;
        let buckets = categorize(issues);

        Ok(Some(SnykReport::new(
            project_id,
            buckets,
            Utc::now().naive_utc(),
        )))
    }

    /// Resolve the project to report on: the pinned id, else discovery.
    async fn resolve_project(&self, creds: &Credentials<'_>) -> Result<Option<String>, FetcherError> {
        if let Some(id) = &self.project_id {
            return Ok(Some(id.clone()));
        }

        let projects = self.list_projects(creds).await?;
        Ok(select_project(&projects))
    }

    #[instrument(skip(self, creds), fields(org = %creds.org_id))]
    async fn list_projects(&self, creds: &Credentials<'_>) -> Result<Vec<Project>, FetcherError> {
        let url = format!("{}/org/{}/projects", self.api_base, creds.org_id);
        let request = self.authorized(self.http.get(&url), creds);

        let response: ProjectsResponse = send_json(request, &url).await?;
        debug!("Listed {} projects", response.projects.len());
        Ok(response.projects)
    }

    #[instrument(skip(self, creds), fields(org = %creds.org_id))]
    async fn fetch_issues(
        &self,
        creds: &Credentials<'_>,
        project_id: &str,
    ) -> Result<Vec<SnykIssue>, FetcherError> {
        let url = format!(
            "{}/org/{}/project/{}/issues",
            self.api_base, creds.org_id, project_id
        );
        let body = json!({
            "filters": {
                "severities": ["critical", "high", "medium", "low"],
                "types": ["vuln"],
                "ignored": false
            }
        });
        let request = self.authorized(self.http.post(&url), creds).json(&body);

        let response: IssuesResponse = send_json(request, &url).await?;
        debug!("Fetched {} issues", response.issues.vulnerabilities.len());
        Ok(response.issues.vulnerabilities)
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> Result<T, FetcherError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetcherError::UpstreamStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response.json::<T>().await?)
}

/// Pick the project whose name mentions [`PROJECT_NAME_HINT`], else the first.
pub fn select_project(projects: &[Project]) -> Option<String> {
    projects
        .iter()
        .find(|p| p.name.to_lowercase().contains(PROJECT_NAME_HINT))
        .or_else(|| projects.first())
        .map(|p| p.id.clone())
}

/// Group raw issues by severity, dropping unknown severities.
pub fn categorize(issues: impl IntoIterator<Item = SnykIssue>) -> SeverityBuckets {
    issues
        .into_iter()
        .filter_map(SnykIssue::into_vulnerability)
        .collect()
}
