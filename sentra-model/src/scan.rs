use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::finding::{BusinessFinding, ParseEnumError};
use crate::ids::ScanId;

/// Lifecycle state of a scan. `Pending` is the initial state; `Completed` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Pending => "PENDING",
            ScanStatus::Running => "RUNNING",
            ScanStatus::Completed => "COMPLETED",
            ScanStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }
}

impl std::str::FromStr for ScanStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ScanStatus::Pending),
            "RUNNING" => Ok(ScanStatus::Running),
            "COMPLETED" => Ok(ScanStatus::Completed),
            "FAILED" => Ok(ScanStatus::Failed),
            other => Err(ParseEnumError {
                kind: "scan status",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to assess a target.
///
/// Field presence tracks the state machine: `started_at` is set once the scan
/// leaves `Pending`, `completed_at` and either `error` or `findings_count`
/// once it reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub id: ScanId,
    pub target_domain: String,
    pub status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub findings_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Scan {
    /// A fresh `Pending` scan for the given (already validated) target.
    pub fn pending(target_domain: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ScanId::new(),
            target_domain: target_domain.into(),
            status: ScanStatus::Pending,
            started_at: None,
            completed_at: None,
            error: None,
            findings_count: None,
            created_at,
        }
    }
}

/// Finding counts per risk type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskTypeCounts {
    pub financial: usize,
    pub governance: usize,
    pub operational: usize,
}

/// Aggregated counts over a finding collection. Each finding lands in exactly
/// one priority bucket and exactly one risk-type bucket, so the priority sum
/// and the risk-type sum both equal the collection size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub immediate: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub by_risk_type: RiskTypeCounts,
}

impl ScanSummary {
    pub fn total(&self) -> usize {
        self.immediate + self.high + self.medium + self.low
    }
}

/// Everything the results query returns for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResults {
    pub scan: Scan,
    pub findings: Vec<BusinessFinding>,
    pub summary: ScanSummary,
}
