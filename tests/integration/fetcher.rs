//! Snyk fetcher against a mocked Snyk API.

use gating_poc::config::Config;
use gating_poc::fetcher::{create_fetcher_router, SnykClient, MOCK_PROJECT_ID};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::spawn;

const TOKEN: &str = "test-token";
const ORG: &str = "org-1";

fn config_for(server: &MockServer, project_id: Option<&str>) -> Config {
    Config {
        snyk_api_base: server.base_url(),
        snyk_token: Some(TOKEN.to_string()),
        snyk_org_id: Some(ORG.to_string()),
        snyk_project_id: project_id.map(str::to_string),
        http_timeout_ms: 2_000,
        ..Config::default()
    }
}

fn issues_body() -> Value {
    json!({
        "issues": {
            "vulnerabilities": [
                {
                    "id": "SNYK-1",
                    "title": "Remote Code Execution (RCE)",
                    "severity": "critical",
                    "cvssScore": 10.0,
                    "package": "org.apache.logging.log4j:log4j-core",
                    "version": "2.14.1",
                    "exploitMaturity": "mature",
                    "publicationTime": "2021-12-10T00:00:00Z"
                },
                {
                    "id": "SNYK-2",
                    "title": "Regular Expression Denial of Service",
                    "severity": "MEDIUM",
                    "cvssScore": 5.3,
                    "package": "org.yaml:snakeyaml",
                    "version": "1.26"
                },
                {
                    "id": "SNYK-3",
                    "title": "Information Exposure",
                    "severity": "low",
                    "package": "ch.qos.logback:logback-core",
                    "version": "1.2.3"
                },
                {
                    "id": "SNYK-4",
                    "title": "Unclassified",
                    "severity": "informational",
                    "package": "example:pkg",
                    "version": "0.1"
                }
            ],
            "licenses": []
        }
    })
}

fn expected_filters() -> Value {
    json!({
        "filters": {
            "severities": ["critical", "high", "medium", "low"],
            "types": ["vuln"],
            "ignored": false
        }
    })
}

#[tokio::test]
async fn pinned_project_is_categorized() {
    let server = MockServer::start_async().await;
    let issues = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/org/org-1/project/p-pinned/issues")
                .header("authorization", "token test-token")
                .json_body(expected_filters());
            then.status(200).json_body(issues_body());
        })
        .await;

    let client = SnykClient::new(&config_for(&server, Some("p-pinned"))).unwrap();
    let report = client.fetch_report().await.unwrap();

    issues.assert_async().await;
    assert_eq!(report.project_id, "p-pinned");
    assert_eq!(report.summary.critical, 1);
    assert_eq!(report.summary.high, 0);
    assert_eq!(report.summary.medium, 1);
    assert_eq!(report.summary.low, 1);
    assert_eq!(report.summary.total, 3);
    assert!(report.gating_decision.hard_gate);
    assert!(!report.gating_decision.soft_gate);
    assert!(report.gating_decision.warnings);
    assert_eq!(
        report.vulnerabilities.critical[0].package_name.as_deref(),
        Some("org.apache.logging.log4j:log4j-core")
    );
}

#[tokio::test]
async fn discovery_prefers_gating_poc_project() {
    let server = MockServer::start_async().await;
    let projects = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/org/org-1/projects")
                .header("authorization", "token test-token");
            then.status(200).json_body(json!({
                "projects": [
                    { "id": "p-other", "name": "payments-service" },
                    { "id": "p-gating", "name": "acme/Gating-PoC-App:pom.xml" }
                ]
            }));
        })
        .await;
    let issues = server
        .mock_async(|when, then| {
            when.method(POST).path("/org/org-1/project/p-gating/issues");
            then.status(200).json_body(json!({ "issues": { "vulnerabilities": [] } }));
        })
        .await;

    let client = SnykClient::new(&config_for(&server, None)).unwrap();
    let report = client.fetch_report().await.unwrap();

    projects.assert_async().await;
    issues.assert_async().await;
    assert_eq!(report.project_id, "p-gating");
    assert_eq!(report.summary.total, 0);
    assert!(!report.gating_decision.hard_gate);
    assert!(!report.gating_decision.soft_gate);
    assert!(!report.gating_decision.warnings);
}

#[tokio::test]
async fn empty_project_list_serves_mock_report() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/org/org-1/projects");
            then.status(200).json_body(json!({ "projects": [] }));
        })
        .await;

    let client = SnykClient::new(&config_for(&server, None)).unwrap();
    let report = client.fetch_report().await.unwrap();

    assert_eq!(report.project_id, MOCK_PROJECT_ID);
    assert_eq!(report.summary.total, 3);
}

#[tokio::test]
async fn upstream_failure_serves_mock_report() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/org/org-1/project/p-1/issues");
            then.status(503).body("maintenance");
        })
        .await;

    let client = SnykClient::new(&config_for(&server, Some("p-1"))).unwrap();
    let report = client.fetch_report().await.unwrap();

    assert_eq!(report.project_id, MOCK_PROJECT_ID);
    assert!(report.gating_decision.hard_gate);
}

#[tokio::test]
async fn malformed_upstream_body_serves_mock_report() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/org/org-1/project/p-1/issues");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let client = SnykClient::new(&config_for(&server, Some("p-1"))).unwrap();
    let report = client.fetch_report().await.unwrap();

    assert_eq!(report.project_id, MOCK_PROJECT_ID);
}

#[tokio::test]
async fn fetch_and_format_over_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/org/org-1/project/p-1/issues");
            then.status(200).json_body(issues_body());
        })
        .await;

    let client = SnykClient::new(&config_for(&server, Some("p-1"))).unwrap();
    let base = spawn(create_fetcher_router(client, None)).await;

    let response = reqwest::get(format!("{base}/fetch-and-format")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let resource = &body["resource"];
    assert_eq!(resource["type"], "deployment");
    assert_eq!(resource["id"], "p-1");
    assert_eq!(resource["attributes"]["criticalCount"], 1);
    assert_eq!(resource["attributes"]["highCount"], 0);
    assert_eq!(resource["attributes"]["mediumCount"], 1);
    assert_eq!(resource["attributes"]["summary"]["total"], 3);
    assert_eq!(
        body["gatingDecision"],
        json!({ "hardGate": true, "softGate": false, "warnings": true })
    );
}

#[tokio::test]
async fn snyk_over_http_reports_mock_on_outage() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/org/org-1/projects");
            then.status(500);
        })
        .await;

    let client = SnykClient::new(&config_for(&server, None)).unwrap();
    let base = spawn(create_fetcher_router(client, None)).await;

    let response = reqwest::get(format!("{base}/snyk")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["projectId"], MOCK_PROJECT_ID);
    assert_eq!(
        body["vulnerabilities"]["critical"][0]["cve"],
        "CVE-2021-44228"
    );
    assert_eq!(body["vulnerabilities"]["low"], json!([]));
}
