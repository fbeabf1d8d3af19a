//! Core data model definitions shared across Sentra crates.
#![allow(missing_docs)]

pub mod finding;
pub mod ids;
pub mod scan;

// Intentionally curated re-exports for downstream consumers.
pub use finding::{
    Action, ActionComplexity, BusinessFinding, FindingInfo, ParseEnumError, Priority, RawFinding,
    RiskType, TechnicalSnapshot,
};
pub use ids::{FindingId, ScanId};
pub use scan::{RiskTypeCounts, Scan, ScanResults, ScanStatus, ScanSummary};
