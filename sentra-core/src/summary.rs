use sentra_model::{BusinessFinding, Priority, RiskType, ScanSummary};

/// Single pass over a finding collection: each finding increments exactly
/// one priority bucket and exactly one risk-type bucket, so both bucket sums
/// equal the collection size.
pub fn summarize(findings: &[BusinessFinding]) -> ScanSummary {
    let mut summary = ScanSummary::default();
    for finding in findings {
        match finding.priority {
            Priority::Immediate => summary.immediate += 1,
            Priority::High => summary.high += 1,
            Priority::Medium => summary.medium += 1,
            Priority::Low => summary.low += 1,
        }
        match finding.risk_type {
            RiskType::Financial => summary.by_risk_type.financial += 1,
            RiskType::Governance => summary.by_risk_type.governance += 1,
            RiskType::Operational => summary.by_risk_type.operational += 1,
        }
    }
    summary
}
