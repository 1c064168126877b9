//! Fixed report served when live Snyk data is unavailable.
//!
//! Describes the vulnerable dependencies the mock service declares.

use chrono::NaiveDateTime;

use super::types::{Severity, SeverityBuckets, SnykReport, Vulnerability};

/// Project id used by the mock report.
pub const MOCK_PROJECT_ID: &str = "mock-project-id";

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    title: &str,
    severity: Severity,
    cvss_score: f64,
    package_name: &str,
    version: &str,
    exploit_maturity: &str,
    publication_time: &str,
    cve: Option<&str>,
) -> Vulnerability {
    Vulnerability {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        severity,
        cvss_score: Some(cvss_score),
        package_name: Some(package_name.to_string()),
        version: Some(version.to_string()),
        exploit_maturity: Some(exploit_maturity.to_string()),
        publication_time: Some(publication_time.to_string()),
        cve: cve.map(str::to_string),
    }
}

/// Mock vulnerabilities grouped by severity.
pub fn mock_vulnerabilities() -> SeverityBuckets {
    SeverityBuckets {
        critical: vec![entry(
            "SNYK-JAVA-ORGAPACHELOGGINGLOG4J-2314720",
            "Remote Code Execution (RCE)",
            Severity::Critical,
            10.0,
            "org.apache.logging.log4j:log4j-core",
            "2.14.1",
            "mature",
            "2021-12-10T00:00:00Z",
            Some("CVE-2021-44228"),
        )],
        high: vec![entry(
            "SNYK-JAVA-COMMONSCOLLECTIONS-30078",
            "Deserialization of Untrusted Data",
            Severity::High,
            7.5,
            "commons-collections:commons-collections",
            "3.2.1",
            "proof-of-concept",
            "2015-11-18T00:00:00Z",
            Some("CVE-2015-6420"),
        )],
        medium: vec![entry(
            "SNYK-JAVA-COMFASTERXMLJACKSONCORE-72448",
            "Deserialization of Untrusted Data",
            Severity::Medium,
            5.9,
            "com.fasterxml.jackson.core:jackson-databind",
            "2.9.10.1",
            "no-known-exploit",
            "2019-10-01T00:00:00Z",
            None,
        )],
        low: Vec::new(),
    }
}

/// The mock report, stamped with `timestamp`.
pub fn mock_report(timestamp: NaiveDateTime) -> SnykReport {
    SnykReport::new(MOCK_PROJECT_ID, mock_vulnerabilities(), timestamp)
}
