//! The translation engine: a pure, deterministic mapping from one raw
//! technical finding to one business finding. No I/O, no shared state;
//! identical input always yields identical risk type, priority, narrative,
//! impact, and actions (only the finding id differs between invocations).

mod facts;
mod rules;

use chrono::{DateTime, Utc};

use sentra_model::{
    Action, ActionComplexity, BusinessFinding, FindingId, Priority, RawFinding, RiskType, ScanId,
    TechnicalSnapshot,
};

use facts::FindingFacts;
use rules::{Narrative, Playbook};

#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationEngine;

impl TranslationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Translate every raw finding of one scan, preserving input order.
    pub fn translate_all(
        &self,
        scan_id: ScanId,
        findings: &[RawFinding],
        created_at: DateTime<Utc>,
    ) -> Vec<BusinessFinding> {
        findings
            .iter()
            .map(|finding| self.translate(scan_id, finding, created_at))
            .collect()
    }

    /// Translate one raw finding. Never fails: sparse findings classify via
    /// the fallback rules and missing optional fields default to empty.
    pub fn translate(
        &self,
        scan_id: ScanId,
        finding: &RawFinding,
        created_at: DateTime<Utc>,
    ) -> BusinessFinding {
        let facts = FindingFacts::from_finding(finding);

        let risk_type = rules::classify_risk(&facts);
        let priority = rules::classify_priority(&facts);
        let business_description = describe(rules::classify_narrative(&facts), &finding.info.name);
        let business_impact = impacts_for(risk_type, facts.severity_elevated());
        let actions = actions_for(rules::classify_playbook(&facts), priority);

        BusinessFinding {
            id: FindingId::new(),
            scan_id,
            risk_type,
            priority,
            business_description,
            business_impact,
            actions,
            technical: TechnicalSnapshot {
                template_id: finding.template_id.clone(),
                name: finding.info.name.clone(),
                severity: finding.info.severity.clone(),
                description: finding.info.description.clone().unwrap_or_default(),
                host: finding.host.clone(),
                matched_at: finding.matched_at.clone(),
                tags: finding.info.tags.clone().unwrap_or_default(),
            },
            created_at,
        }
    }
}

/// Render the business narrative for a finding. Exactly one narrative per
/// finding; the generic variants interpolate the technical name as-is.
fn describe(narrative: Narrative, name: &str) -> String {
    match narrative {
        Narrative::Rce => "Server compromise possible. Attackers could take full control of the \
                           system, leading to service disruption and data theft."
            .to_string(),
        Narrative::Sqli => "Database breach risk detected. Sensitive data including customer \
                            information could be accessed or stolen."
            .to_string(),
        Narrative::Xss => "User account takeover risk. Attackers could impersonate legitimate \
                           users and access their data."
            .to_string(),
        Narrative::GitExposure => "Source code exposure detected. This reveals your application \
                                   logic and could enable targeted attacks."
            .to_string(),
        Narrative::Tls => "Outdated encryption detected. Customer data transmission does not \
                           meet current security standards."
            .to_string(),
        Narrative::Disclosure => "Sensitive information is publicly accessible. This could be \
                                  exploited for targeted attacks."
            .to_string(),
        Narrative::SevereGeneric => format!(
            "Security issue detected: {name}. This presents a significant risk to your systems \
             and data."
        ),
        Narrative::RoutineGeneric => format!(
            "Security configuration issue: {name}. This should be addressed to maintain \
             security best practices."
        ),
    }
}

/// Fixed impact statements per risk type, with extra statements appended for
/// critical/high severity findings.
fn impacts_for(risk_type: RiskType, elevated: bool) -> Vec<String> {
    let mut impacts = Vec::new();
    match risk_type {
        RiskType::Financial => {
            impacts.push("Revenue processing at risk".to_string());
            if elevated {
                impacts
                    .push("Potential financial loss from fraud or service disruption".to_string());
            }
            impacts.push("Payment compliance requirements may be violated".to_string());
        }
        RiskType::Governance => {
            impacts.push("Compliance requirements may be violated".to_string());
            impacts.push("Customer data privacy at risk".to_string());
            if elevated {
                impacts.push("Regulatory penalties possible".to_string());
            }
        }
        RiskType::Operational => {
            impacts.push("Service availability could be affected".to_string());
            if elevated {
                impacts.push("System compromise possible".to_string());
                impacts.push("Business continuity at risk".to_string());
            }
        }
    }
    impacts
}

fn action(description: &str, owner: &str, timeframe: &str, complexity: ActionComplexity) -> Action {
    Action {
        description: description.to_string(),
        owner: owner.to_string(),
        timeframe: timeframe.to_string(),
        complexity,
    }
}

/// Remediation playbooks. The timeframe derives from priority except for git
/// exposure, which is always a 24-hour cleanup regardless of priority.
fn actions_for(playbook: Playbook, priority: Priority) -> Vec<Action> {
    let timeframe = rules::timeframe_for(priority);
    match playbook {
        Playbook::Rce => vec![
            action(
                "Apply security patch immediately",
                "IT Operations",
                timeframe,
                ActionComplexity::Medium,
            ),
            action(
                "Verify patch with security team",
                "Security Team",
                timeframe,
                ActionComplexity::Low,
            ),
        ],
        Playbook::Sqli => vec![
            action(
                "Update application code to use parameterized queries",
                "Development Team",
                timeframe,
                ActionComplexity::Medium,
            ),
            action(
                "Conduct security code review",
                "Security Team",
                timeframe,
                ActionComplexity::Low,
            ),
        ],
        Playbook::GitExposure => vec![action(
            "Remove .git directory from web server immediately",
            "IT Operations",
            "24 hours",
            ActionComplexity::Low,
        )],
        Playbook::Tls => vec![
            action(
                "Upgrade to TLS 1.2 or higher",
                "IT Operations",
                timeframe,
                ActionComplexity::Medium,
            ),
            action(
                "Document compliance remediation",
                "Compliance Team",
                timeframe,
                ActionComplexity::Low,
            ),
        ],
        Playbook::Generic => vec![action(
            "Review and remediate security finding",
            "Security Team",
            timeframe,
            ActionComplexity::Medium,
        )],
    }
}
