//! End-to-end behavior of the translation engine over realistic scanner
//! output shapes.

use chrono::Utc;

use sentra_core::TranslationEngine;
use sentra_model::{FindingInfo, Priority, RawFinding, RiskType, ScanId};

fn raw(name: &str, severity: &str, tags: &[&str]) -> RawFinding {
    RawFinding {
        template_id: "test-template".to_string(),
        info: FindingInfo {
            name: name.to_string(),
            author: "test".to_string(),
            severity: severity.to_string(),
            description: None,
            tags: if tags.is_empty() {
                None
            } else {
                Some(tags.iter().map(|t| t.to_string()).collect())
            },
            reference: None,
        },
        match_type: "http".to_string(),
        host: "https://example.com".to_string(),
        matched_at: "https://example.com/".to_string(),
        extracted_results: None,
        curl_command: None,
        matcher_name: None,
        timestamp: None,
    }
}

fn translate(finding: &RawFinding) -> sentra_model::BusinessFinding {
    TranslationEngine::new().translate(ScanId::new(), finding, Utc::now())
}

#[test]
fn critical_severity_is_always_immediate() {
    let finding = translate(&raw("Some Obscure Finding", "critical", &[]));
    assert_eq!(finding.priority, Priority::Immediate);
}

#[test]
fn sqli_tag_overrides_low_severity() {
    let finding = translate(&raw("Blind Injection Probe", "info", &["sqli"]));
    assert_eq!(finding.priority, Priority::Immediate);
    assert!(finding.business_description.starts_with("Database breach risk"));
    assert_eq!(finding.actions.len(), 2);
    assert_eq!(finding.actions[0].owner, "Development Team");
    assert_eq!(finding.actions[0].timeframe, "24 hours");
}

#[test]
fn severity_maps_to_priority_when_no_override_applies() {
    assert_eq!(
        translate(&raw("Thing", "high", &[])).priority,
        Priority::High
    );
    assert_eq!(
        translate(&raw("Thing", "medium", &[])).priority,
        Priority::Medium
    );
    assert_eq!(translate(&raw("Thing", "low", &[])).priority, Priority::Low);
    assert_eq!(
        translate(&raw("Thing", "info", &[])).priority,
        Priority::Low
    );
    assert_eq!(translate(&raw("Thing", "", &[])).priority, Priority::Low);
}

#[test]
fn financial_indicators_outrank_governance_indicators() {
    let finding = translate(&raw("Payment Endpoint Issue", "high", &["payment", "gdpr"]));
    assert_eq!(finding.risk_type, RiskType::Financial);
    assert_eq!(
        finding.business_impact,
        vec![
            "Revenue processing at risk",
            "Potential financial loss from fraud or service disruption",
            "Payment compliance requirements may be violated",
        ]
    );
}

#[test]
fn governance_impacts_gain_penalty_line_only_when_elevated() {
    let high = translate(&raw("Weak Encryption Cipher", "high", &[]));
    assert_eq!(high.risk_type, RiskType::Governance);
    assert!(high
        .business_impact
        .contains(&"Regulatory penalties possible".to_string()));

    let low = translate(&raw("Weak Encryption Cipher", "low", &[]));
    assert_eq!(
        low.business_impact,
        vec![
            "Compliance requirements may be violated",
            "Customer data privacy at risk",
        ]
    );
}

#[test]
fn git_exposure_gets_fixed_cleanup_action() {
    let finding = translate(&raw("Exposed .git Repository", "medium", &["exposure"]));
    assert_eq!(finding.risk_type, RiskType::Operational);
    assert_eq!(finding.priority, Priority::Medium);
    assert!(finding
        .business_description
        .starts_with("Source code exposure detected"));
    assert_eq!(finding.actions.len(), 1);
    assert_eq!(
        finding.actions[0].description,
        "Remove .git directory from web server immediately"
    );
    assert_eq!(finding.actions[0].owner, "IT Operations");
    // The cleanup window is fixed, not derived from the MEDIUM priority.
    assert_eq!(finding.actions[0].timeframe, "24 hours");
}

#[test]
fn tls_findings_route_to_compliance_playbook() {
    let finding = translate(&raw("Deprecated TLS 1.0 Support", "medium", &[]));
    assert_eq!(finding.risk_type, RiskType::Governance);
    assert!(finding
        .business_description
        .starts_with("Outdated encryption detected"));
    assert_eq!(finding.actions.len(), 2);
    assert_eq!(finding.actions[0].description, "Upgrade to TLS 1.2 or higher");
    assert_eq!(finding.actions[1].owner, "Compliance Team");
    assert_eq!(finding.actions[0].timeframe, "This month");
}

#[test]
fn xss_narrative_pairs_with_generic_playbook() {
    let finding = translate(&raw("Reflected Payload", "medium", &["xss"]));
    assert!(finding
        .business_description
        .starts_with("User account takeover risk"));
    assert_eq!(finding.actions.len(), 1);
    assert_eq!(
        finding.actions[0].description,
        "Review and remediate security finding"
    );
    assert_eq!(finding.actions[0].owner, "Security Team");
}

#[test]
fn unmatched_findings_fall_back_by_severity() {
    let severe = translate(&raw("Odd Behavior", "critical", &[]));
    assert!(severe
        .business_description
        .starts_with("Security issue detected: Odd Behavior."));

    let routine = translate(&raw("Odd Behavior", "info", &[]));
    assert!(routine
        .business_description
        .starts_with("Security configuration issue: Odd Behavior."));
}

#[test]
fn sparse_finding_translates_without_panicking() {
    let finding = translate(&RawFinding {
        template_id: String::new(),
        info: FindingInfo::default(),
        match_type: String::new(),
        host: String::new(),
        matched_at: String::new(),
        extracted_results: None,
        curl_command: None,
        matcher_name: None,
        timestamp: None,
    });
    assert_eq!(finding.risk_type, RiskType::Operational);
    assert_eq!(finding.priority, Priority::Low);
    assert_eq!(finding.actions[0].timeframe, "Next quarter");
    assert!(finding.technical.tags.is_empty());
}

#[test]
fn translation_is_deterministic_apart_from_finding_ids() {
    let engine = TranslationEngine::new();
    let scan_id = ScanId::new();
    let now = Utc::now();
    let input = raw("Exposed Admin Panel", "high", &["panel", "exposure"]);

    let a = engine.translate(scan_id, &input, now);
    let b = engine.translate(scan_id, &input, now);
    assert_ne!(a.id, b.id);
    assert_eq!(a.risk_type, b.risk_type);
    assert_eq!(a.priority, b.priority);
    assert_eq!(a.business_description, b.business_description);
    assert_eq!(a.business_impact, b.business_impact);
    assert_eq!(a.actions, b.actions);
    assert_eq!(a.technical, b.technical);
}

#[test]
fn translate_all_preserves_input_order() {
    let engine = TranslationEngine::new();
    let scan_id = ScanId::new();
    let inputs = vec![
        raw("Deprecated TLS 1.0 Support", "low", &[]),
        raw("SQL Injection", "critical", &["sqli"]),
        raw("Directory Listing", "info", &[]),
    ];

    let findings = engine.translate_all(scan_id, &inputs, Utc::now());
    assert_eq!(findings.len(), 3);
    assert_eq!(findings[0].technical.name, "Deprecated TLS 1.0 Support");
    assert_eq!(findings[1].technical.name, "SQL Injection");
    assert_eq!(findings[2].technical.name, "Directory Listing");
    assert!(findings.iter().all(|f| f.scan_id == scan_id));
}
