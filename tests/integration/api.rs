//! Mock service endpoints over a real socket.

use chrono::{Local, NaiveDateTime};
use gating_poc::api::create_router;
use pretty_assertions::assert_eq;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;

use crate::spawn;

#[tokio::test]
async fn health_reports_up_with_current_timestamp() {
    let base = spawn(create_router(None)).await;

    let response = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body.as_object().unwrap().len(), 4);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["service"], "gating-poc-app");
    assert_eq!(body["version"], "1.0.0");

    let ts: NaiveDateTime = body["timestamp"].as_str().unwrap().parse().unwrap();
    let drift = (Local::now().naive_local() - ts).num_seconds().abs();
    assert!(drift <= 5, "timestamp drifted {drift}s");
}

#[tokio::test]
async fn info_names_cves() {
    let base = spawn(create_router(None)).await;

    let body: Value = reqwest::get(format!("{base}/api/info"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["application"], "CI/CD Gating PoC");
    assert!(body["vulnerabilities"]["critical"]
        .as_str()
        .unwrap()
        .contains("CVE-2021-44228"));
    assert!(body["vulnerabilities"]["high"]
        .as_str()
        .unwrap()
        .contains("CVE-2015-6420"));
}

#[tokio::test]
async fn status_is_plain_text() {
    let base = spawn(create_router(None)).await;

    let response = reqwest::get(format!("{base}/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "Service is running");
}

#[tokio::test]
async fn repeated_calls_only_vary_in_timestamp() {
    let base = spawn(create_router(None)).await;
    let client = reqwest::Client::new();

    let mut infos = Vec::new();
    let mut healths = Vec::new();
    for _ in 0..3 {
        let info: Value = client
            .get(format!("{base}/api/info"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        infos.push(info);

        let mut health: Value = client
            .get(format!("{base}/api/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        health.as_object_mut().unwrap().remove("timestamp");
        healths.push(health);
    }

    assert!(infos.windows(2).all(|w| w[0] == w[1]));
    assert!(healths.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let base = spawn(create_router(None)).await;

    let response = reqwest::get(format!("{base}/api/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
