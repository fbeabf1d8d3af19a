use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use sentra_model::{Scan, ScanId, ScanResults};

use crate::adapter::ScannerAdapter;
use crate::clock::Clock;
use crate::config::ScannerConfig;
use crate::error::{Result, ScanError};
use crate::store::ScanStore;
use crate::summary::summarize;
use crate::translate::TranslationEngine;

// Accept bare domains (example.com) or http(s) URLs.
static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]\.)+[a-zA-Z]{2,}$").expect("valid pattern")
});
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://([a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]\.)+[a-zA-Z]{2,}")
        .expect("valid pattern")
});

/// Normalize and validate a submitted target before it can reach the
/// adapter. Rejecting anything that is not a domain or http(s) URL also
/// keeps shell metacharacters out of the scan pipeline entirely.
pub fn validate_target(raw: &str) -> Result<String> {
    let target = raw.trim();
    if DOMAIN_PATTERN.is_match(target) || URL_PATTERN.is_match(target) {
        Ok(target.to_string())
    } else {
        Err(ScanError::InvalidTarget(target.to_string()))
    }
}

/// Owns the scan state machine: PENDING → RUNNING → COMPLETED | FAILED.
///
/// Constructed with explicit dependencies (store, adapter, clock) so tests
/// swap in fakes. The lifecycle manager is the sole writer of scan state.
pub struct ScanLifecycle {
    store: Arc<dyn ScanStore>,
    adapter: Arc<dyn ScannerAdapter>,
    clock: Arc<dyn Clock>,
    engine: TranslationEngine,
    config: ScannerConfig,
}

impl std::fmt::Debug for ScanLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanLifecycle")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScanLifecycle {
    pub fn new(
        store: Arc<dyn ScanStore>,
        adapter: Arc<dyn ScannerAdapter>,
        clock: Arc<dyn Clock>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            store,
            adapter,
            clock,
            engine: TranslationEngine::new(),
            config,
        }
    }

    /// Validate the target and create the PENDING scan record. The caller
    /// enqueues the returned scan's id for asynchronous execution.
    pub async fn submit(&self, target: &str) -> Result<Scan> {
        let target = validate_target(target)?;
        let scan = Scan::pending(target, self.clock.now());
        self.store.insert_scan(&scan).await?;
        info!(scan_id = %scan.id, target = %scan.target_domain, "scan submitted");
        Ok(scan)
    }

    /// Drive one queued scan from RUNNING to a terminal state.
    ///
    /// Every execution attempt ends in COMPLETED or FAILED: all adapter,
    /// translation, and finding-persistence errors are captured here and
    /// written to the scan row as a FAILED transition rather than returned.
    /// The only errors surfaced to the caller are an unknown scan id and a
    /// failure to write the terminal state itself.
    pub async fn execute(&self, scan_id: ScanId) -> Result<()> {
        let scan = self
            .store
            .scan(scan_id)
            .await?
            .ok_or(ScanError::ScanNotFound(scan_id))?;

        // Admission guard: only a PENDING scan may start. A redelivered
        // queue message finds the scan RUNNING or terminal and is dropped,
        // so at-least-once delivery cannot double-execute.
        if !self.store.mark_running(scan_id, self.clock.now()).await? {
            warn!(%scan_id, status = %scan.status, "scan is not pending; skipping duplicate delivery");
            return Ok(());
        }

        info!(%scan_id, target = %scan.target_domain, "scan running");
        match self.run_to_findings(&scan).await {
            Ok(count) => {
                self.store
                    .mark_completed(scan_id, self.clock.now(), count)
                    .await?;
                info!(%scan_id, findings = count, "scan completed");
            }
            Err(err) => {
                let message = err.to_string();
                self.store
                    .mark_failed(scan_id, self.clock.now(), &message)
                    .await?;
                warn!(%scan_id, error = %message, "scan failed");
            }
        }
        Ok(())
    }

    /// The fallible phase of an execution attempt: run the external tool,
    /// translate its findings, persist them. Returns the findings count.
    async fn run_to_findings(&self, scan: &Scan) -> Result<i64> {
        let raw = self
            .adapter
            .run(&scan.target_domain, self.config.scan_timeout())
            .await?;
        let findings = self
            .engine
            .translate_all(scan.id, &raw, self.clock.now());
        self.store.insert_findings(&findings).await?;
        Ok(findings.len() as i64)
    }

    pub async fn scan(&self, scan_id: ScanId) -> Result<Scan> {
        self.store
            .scan(scan_id)
            .await?
            .ok_or(ScanError::ScanNotFound(scan_id))
    }

    pub async fn list_scans(&self, limit: i64, offset: i64) -> Result<Vec<Scan>> {
        self.store.list_scans(limit, offset).await
    }

    /// The scan, its findings in translation order, and the computed
    /// summary.
    pub async fn results(&self, scan_id: ScanId) -> Result<ScanResults> {
        let scan = self
            .store
            .scan(scan_id)
            .await?
            .ok_or(ScanError::ScanNotFound(scan_id))?;
        let findings = self.store.findings_for_scan(scan_id).await?;
        let summary = summarize(&findings);
        Ok(ScanResults {
            scan,
            findings,
            summary,
        })
    }
}
