//! Ordered rule tables for the four sub-classifiers.
//!
//! Every chain is a `const` slice of `(predicate, outcome)` rules evaluated
//! front to back; the first match wins. Precedence is therefore data, not
//! nested control flow, and each predicate is testable in isolation.

use sentra_model::{Priority, RiskType};

use super::facts::FindingFacts;

pub(crate) struct Rule<T: Copy + 'static> {
    pub matches: fn(&FindingFacts) -> bool,
    pub outcome: T,
}

fn evaluate<T: Copy>(rules: &[Rule<T>], facts: &FindingFacts) -> Option<T> {
    rules
        .iter()
        .find(|rule| (rule.matches)(facts))
        .map(|rule| rule.outcome)
}

// --- Risk type -------------------------------------------------------------

fn financial_signals(facts: &FindingFacts) -> bool {
    facts.has_any_tag(&["payment", "ecommerce", "financial"])
        || facts.name_contains("payment")
        || facts.name_contains("card")
        || facts.name_contains("transaction")
}

fn governance_signals(facts: &FindingFacts) -> bool {
    facts.has_any_tag(&["compliance", "gdpr", "pci", "hipaa", "encryption"])
        || facts.name_contains("encryption")
        || facts.name_contains("tls")
        || facts.name_contains("ssl")
        || facts.name_contains("certificate")
        || facts.name_contains("privacy")
        || facts.name_contains("data leak")
}

/// Financial indicators outrank governance ones; everything else is
/// operational.
const RISK_RULES: &[Rule<RiskType>] = &[
    Rule {
        matches: financial_signals,
        outcome: RiskType::Financial,
    },
    Rule {
        matches: governance_signals,
        outcome: RiskType::Governance,
    },
];

pub(crate) fn classify_risk(facts: &FindingFacts) -> RiskType {
    evaluate(RISK_RULES, facts).unwrap_or(RiskType::Operational)
}

// --- Priority --------------------------------------------------------------

fn immediate_signals(facts: &FindingFacts) -> bool {
    facts.severity_is("critical")
        || facts.has_any_tag(&["rce", "sqli", "xxe", "ssti"])
        || (facts.name_contains("exposed") && facts.name_contains("credential"))
}

/// Tag/name overrides outrank the plain severity mapping: a low-severity
/// finding tagged `sqli` is still immediate.
const PRIORITY_OVERRIDES: &[Rule<Priority>] = &[Rule {
    matches: immediate_signals,
    outcome: Priority::Immediate,
}];

pub(crate) fn classify_priority(facts: &FindingFacts) -> Priority {
    if let Some(priority) = evaluate(PRIORITY_OVERRIDES, facts) {
        return priority;
    }
    if facts.severity_is("high") {
        Priority::High
    } else if facts.severity_is("medium") {
        Priority::Medium
    } else {
        // "low", "info", "unknown", and anything unrecognized.
        Priority::Low
    }
}

// --- Narratives ------------------------------------------------------------

/// Business narrative categories produced by the description cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Narrative {
    Rce,
    Sqli,
    Xss,
    GitExposure,
    Tls,
    Disclosure,
    SevereGeneric,
    RoutineGeneric,
}

pub(crate) fn rce_signals(facts: &FindingFacts) -> bool {
    facts.has_tag("rce") || facts.name_contains("remote code execution")
}

pub(crate) fn sqli_signals(facts: &FindingFacts) -> bool {
    facts.has_tag("sqli") || facts.name_contains("sql injection")
}

fn xss_signals(facts: &FindingFacts) -> bool {
    facts.has_tag("xss") || facts.name_contains("cross-site scripting")
}

pub(crate) fn git_exposure_signals(facts: &FindingFacts) -> bool {
    facts.name_contains("exposed") && facts.name_contains(".git")
}

pub(crate) fn tls_signals(facts: &FindingFacts) -> bool {
    facts.name_contains("tls") || facts.name_contains("ssl")
}

fn disclosure_signals(facts: &FindingFacts) -> bool {
    facts.name_contains("exposed") || facts.name_contains("disclosure")
}

const NARRATIVE_RULES: &[Rule<Narrative>] = &[
    Rule {
        matches: rce_signals,
        outcome: Narrative::Rce,
    },
    Rule {
        matches: sqli_signals,
        outcome: Narrative::Sqli,
    },
    Rule {
        matches: xss_signals,
        outcome: Narrative::Xss,
    },
    Rule {
        matches: git_exposure_signals,
        outcome: Narrative::GitExposure,
    },
    Rule {
        matches: tls_signals,
        outcome: Narrative::Tls,
    },
    Rule {
        matches: disclosure_signals,
        outcome: Narrative::Disclosure,
    },
];

pub(crate) fn classify_narrative(facts: &FindingFacts) -> Narrative {
    evaluate(NARRATIVE_RULES, facts).unwrap_or(if facts.severity_elevated() {
        Narrative::SevereGeneric
    } else {
        Narrative::RoutineGeneric
    })
}

// --- Action playbooks ------------------------------------------------------

/// Remediation playbook categories. A narrower cascade than the narratives:
/// xss and plain disclosure findings fall back to the generic playbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Playbook {
    Rce,
    Sqli,
    GitExposure,
    Tls,
    Generic,
}

const PLAYBOOK_RULES: &[Rule<Playbook>] = &[
    Rule {
        matches: rce_signals,
        outcome: Playbook::Rce,
    },
    Rule {
        matches: sqli_signals,
        outcome: Playbook::Sqli,
    },
    Rule {
        matches: git_exposure_signals,
        outcome: Playbook::GitExposure,
    },
    Rule {
        matches: tls_signals,
        outcome: Playbook::Tls,
    },
];

pub(crate) fn classify_playbook(facts: &FindingFacts) -> Playbook {
    evaluate(PLAYBOOK_RULES, facts).unwrap_or(Playbook::Generic)
}

// --- Timeframes ------------------------------------------------------------

/// Exhaustive priority → remediation timeframe mapping.
pub(crate) fn timeframe_for(priority: Priority) -> &'static str {
    match priority {
        Priority::Immediate => "24 hours",
        Priority::High => "This week",
        Priority::Medium => "This month",
        Priority::Low => "Next quarter",
    }
}
