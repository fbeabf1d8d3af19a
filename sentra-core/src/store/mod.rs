//! Persistence port for scans and findings, plus its backends.
//!
//! The lifecycle manager is the sole writer of scan state; everything it
//! needs from storage is expressed here so tests can run against the
//! in-memory backend while deployments use Postgres.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sentra_model::{BusinessFinding, Scan, ScanId};

use crate::error::Result;

pub use memory::InMemoryScanStore;
pub use postgres::PostgresScanStore;

#[async_trait]
pub trait ScanStore: Send + Sync {
    async fn insert_scan(&self, scan: &Scan) -> Result<()>;

    async fn scan(&self, id: ScanId) -> Result<Option<Scan>>;

    /// Scans newest first.
    async fn list_scans(&self, limit: i64, offset: i64) -> Result<Vec<Scan>>;

    /// Conditional PENDING → RUNNING transition; the admission guard against
    /// duplicate queue delivery. Returns `false` when the scan was not
    /// pending (already running or terminal), in which case nothing changed.
    async fn mark_running(&self, id: ScanId, started_at: DateTime<Utc>) -> Result<bool>;

    async fn mark_completed(
        &self,
        id: ScanId,
        completed_at: DateTime<Utc>,
        findings_count: i64,
    ) -> Result<()>;

    async fn mark_failed(&self, id: ScanId, completed_at: DateTime<Utc>, error: &str)
    -> Result<()>;

    /// Persist a scan's findings in the order given; that order is what
    /// `findings_for_scan` reads back.
    async fn insert_findings(&self, findings: &[BusinessFinding]) -> Result<()>;

    async fn findings_for_scan(&self, id: ScanId) -> Result<Vec<BusinessFinding>>;
}
