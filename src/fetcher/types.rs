//! Vulnerability report types for the Snyk fetcher.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Issue severity as reported by Snyk.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// A single vulnerability entry in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    /// Snyk issue id.
    pub id: Option<String>,
    /// Issue title.
    pub title: Option<String>,
    /// Severity bucket.
    pub severity: Severity,
    /// CVSS score.
    pub cvss_score: Option<f64>,
    /// Affected package coordinates.
    pub package_name: Option<String>,
    /// Affected package version.
    pub version: Option<String>,
    /// Exploit maturity label.
    pub exploit_maturity: Option<String>,
    /// Publication time as reported upstream.
    pub publication_time: Option<String>,
    /// CVE identifier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,
}

/// Vulnerabilities grouped by severity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityBuckets {
    pub critical: Vec<Vulnerability>,
    pub high: Vec<Vulnerability>,
    pub medium: Vec<Vulnerability>,
    pub low: Vec<Vulnerability>,
}

impl SeverityBuckets {
    /// Add a vulnerability to the bucket matching its severity.
    pub fn push(&mut self, vuln: Vulnerability) {
        self.bucket_mut(vuln.severity).push(vuln);
    }

    /// Vulnerabilities of the given severity.
    pub fn get(&self, severity: Severity) -> &[Vulnerability] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<Vulnerability> {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
        }
    }

    /// Number of vulnerabilities of the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.get(severity).len()
    }

    /// Number of vulnerabilities across all severities.
    pub fn total(&self) -> usize {
        Severity::iter().map(|s| self.count(s)).sum()
    }
}

impl FromIterator<Vulnerability> for SeverityBuckets {
    fn from_iter<I: IntoIterator<Item = Vulnerability>>(iter: I) -> Self {
        let mut buckets = Self::default();
        for vuln in iter {
            buckets.push(vuln);
        }
        buckets
    }
}

/// Per-severity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl From<&SeverityBuckets> for Summary {
    fn from(buckets: &SeverityBuckets) -> Self {
        Self {
            critical: buckets.count(Severity::Critical),
            high: buckets.count(Severity::High),
            medium: buckets.count(Severity::Medium),
            low: buckets.count(Severity::Low),
            total: buckets.total(),
        }
    }
}

/// Inputs for the downstream deployment gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatingDecision {
    /// Critical vulnerabilities present: block.
    pub hard_gate: bool,
    /// High vulnerabilities present: block unless overridden.
    pub soft_gate: bool,
    /// Medium vulnerabilities present: warn.
    pub warnings: bool,
}

impl From<&Summary> for GatingDecision {
    fn from(summary: &Summary) -> Self {
        Self {
            hard_gate: summary.critical > 0,
            soft_gate: summary.high > 0,
            warnings: summary.medium > 0,
        }
    }
}

/// Categorized vulnerability report for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnykReport {
    /// UTC time the report was built.
    pub timestamp: NaiveDateTime,
    /// Snyk project id.
    pub project_id: String,
    pub vulnerabilities: SeverityBuckets,
    pub summary: Summary,
    pub gating_decision: GatingDecision,
}

impl SnykReport {
    /// Build a report, deriving summary and gating decision from the buckets.
    pub fn new(
        project_id: impl Into<String>,
        vulnerabilities: SeverityBuckets,
        timestamp: NaiveDateTime,
    ) -> Self {
        let summary = Summary::from(&vulnerabilities);
        let gating_decision = GatingDecision::from(&summary);
        Self {
            timestamp,
            project_id: project_id.into(),
            vulnerabilities,
            summary,
            gating_decision,
        }
    }
}

/// Report reshaped as a policy-engine resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitDocument {
    pub resource: PermitResource,
    pub gating_decision: GatingDecision,
}

/// Resource section of a [`PermitDocument`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermitResource {
    /// Resource type, always "deployment".
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Project id the attributes describe.
    pub id: String,
    pub attributes: PermitAttributes,
}

/// Resource attributes consumed by policy rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitAttributes {
    pub vulnerabilities: SeverityBuckets,
    pub summary: Summary,
    pub scan_timestamp: NaiveDateTime,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
}

impl From<SnykReport> for PermitDocument {
    fn from(report: SnykReport) -> Self {
        Self {
            resource: PermitResource {
                kind: "deployment",
                id: report.project_id,
                attributes: PermitAttributes {
                    critical_count: report.summary.critical,
                    high_count: report.summary.high,
                    medium_count: report.summary.medium,
                    vulnerabilities: report.vulnerabilities,
                    summary: report.summary,
                    scan_timestamp: report.timestamp,
                },
            },
            gating_decision: report.gating_decision,
        }
    }
}

// === Upstream wire types ===

/// `GET /org/{org}/projects` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectsResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Project entry in the projects listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// `POST /org/{org}/project/{id}/issues` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuesResponse {
    #[serde(default)]
    pub issues: IssueSet,
}

/// Issue groups in an issues response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueSet {
    #[serde(default)]
    pub vulnerabilities: Vec<SnykIssue>,
}

/// Raw vulnerability issue as returned by Snyk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnykIssue {
    pub id: Option<String>,
    pub title: Option<String>,
    pub severity: Option<String>,
    pub cvss_score: Option<f64>,
    pub package: Option<String>,
    pub version: Option<String>,
    pub exploit_maturity: Option<String>,
    pub publication_time: Option<String>,
}

impl SnykIssue {
    /// Convert into a report entry; `None` for missing or unknown severities.
    pub fn into_vulnerability(self) -> Option<Vulnerability> {
        let severity = self.severity.as_deref()?.parse::<Severity>().ok()?;
        Some(Vulnerability {
            id: self.id,
            title: self.title,
            severity,
            cvss_score: self.cvss_score,
            package_name: self.package,
            version: self.version,
            exploit_maturity: self.exploit_maturity,
            publication_time: self.publication_time,
            cve: None,
        })
    }
}
