use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use sentra_model::{BusinessFinding, Scan, ScanId, ScanStatus};

use crate::error::Result;

use super::ScanStore;

#[derive(Default)]
struct Inner {
    scans: HashMap<ScanId, Scan>,
    findings: HashMap<ScanId, Vec<BusinessFinding>>,
}

/// In-memory store implementing the same port as Postgres. Used by tests
/// and by ad-hoc local runs without a database.
#[derive(Default)]
pub struct InMemoryScanStore {
    inner: RwLock<Inner>,
}

impl InMemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for InMemoryScanStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryScanStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ScanStore for InMemoryScanStore {
    async fn insert_scan(&self, scan: &Scan) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.scans.insert(scan.id, scan.clone());
        Ok(())
    }

    async fn scan(&self, id: ScanId) -> Result<Option<Scan>> {
        let inner = self.inner.read().await;
        Ok(inner.scans.get(&id).cloned())
    }

    async fn list_scans(&self, limit: i64, offset: i64) -> Result<Vec<Scan>> {
        let inner = self.inner.read().await;
        let mut scans: Vec<Scan> = inner.scans.values().cloned().collect();
        scans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(scans
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn mark_running(&self, id: ScanId, started_at: DateTime<Utc>) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.scans.get_mut(&id) {
            Some(scan) if scan.status == ScanStatus::Pending => {
                scan.status = ScanStatus::Running;
                scan.started_at = Some(started_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_completed(
        &self,
        id: ScanId,
        completed_at: DateTime<Utc>,
        findings_count: i64,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(scan) = inner.scans.get_mut(&id) {
            scan.status = ScanStatus::Completed;
            scan.completed_at = Some(completed_at);
            scan.findings_count = Some(findings_count);
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: ScanId,
        completed_at: DateTime<Utc>,
        error: &str,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(scan) = inner.scans.get_mut(&id) {
            scan.status = ScanStatus::Failed;
            scan.completed_at = Some(completed_at);
            scan.error = Some(error.to_string());
        }
        Ok(())
    }

    async fn insert_findings(&self, findings: &[BusinessFinding]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for finding in findings {
            inner
                .findings
                .entry(finding.scan_id)
                .or_default()
                .push(finding.clone());
        }
        Ok(())
    }

    async fn findings_for_scan(&self, id: ScanId) -> Result<Vec<BusinessFinding>> {
        let inner = self.inner.read().await;
        Ok(inner.findings.get(&id).cloned().unwrap_or_default())
    }
}
