use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{FindingId, ScanId};

/// One unit of output from the external scanning tool, exactly as it appears
/// on a line of the tool's newline-delimited JSON stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFinding {
    #[serde(rename = "template-id", default)]
    pub template_id: String,
    #[serde(default)]
    pub info: FindingInfo,
    #[serde(rename = "type", default)]
    pub match_type: String,
    #[serde(default)]
    pub host: String,
    #[serde(rename = "matched-at", default)]
    pub matched_at: String,
    #[serde(rename = "extracted-results", skip_serializing_if = "Option::is_none")]
    pub extracted_results: Option<Vec<String>>,
    #[serde(rename = "curl-command", skip_serializing_if = "Option::is_none")]
    pub curl_command: Option<String>,
    #[serde(rename = "matcher-name", skip_serializing_if = "Option::is_none")]
    pub matcher_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// The `info` block the scanning tool attaches to each result line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Vec<String>>,
}

/// Error raised when a persisted enum string no longer maps to a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl std::fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized {} value: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Business risk classification of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskType {
    Financial,
    Governance,
    Operational,
}

impl RiskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::Financial => "FINANCIAL",
            RiskType::Governance => "GOVERNANCE",
            RiskType::Operational => "OPERATIONAL",
        }
    }
}

impl std::str::FromStr for RiskType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FINANCIAL" => Ok(RiskType::Financial),
            "GOVERNANCE" => Ok(RiskType::Governance),
            "OPERATIONAL" => Ok(RiskType::Operational),
            other => Err(ParseEnumError {
                kind: "risk type",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remediation urgency assigned by the translation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Immediate,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Immediate => "IMMEDIATE",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IMMEDIATE" => Ok(Priority::Immediate),
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            other => Err(ParseEnumError {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effort classification attached to a remediation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionComplexity {
    Low,
    Medium,
    High,
}

/// One remediation action recommended to the business owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub description: String,
    pub owner: String,
    pub timeframe: String,
    pub complexity: ActionComplexity,
}

/// Immutable copy of the technical fields a business finding was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSnapshot {
    pub template_id: String,
    pub name: String,
    pub severity: String,
    pub description: String,
    pub host: String,
    pub matched_at: String,
    pub tags: Vec<String>,
}

/// A raw finding translated into business risk language. Created exactly once
/// per raw finding and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFinding {
    pub id: FindingId,
    pub scan_id: ScanId,
    pub risk_type: RiskType,
    pub priority: Priority,
    pub business_description: String,
    pub business_impact: Vec<String>,
    pub actions: Vec<Action>,
    pub technical: TechnicalSnapshot,
    pub created_at: DateTime<Utc>,
}
