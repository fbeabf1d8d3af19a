//! Scan state machine behavior against an in-memory store and a scripted
//! scanner adapter.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use sentra_core::{
    Clock, InMemoryScanStore, Result, ScanDispatcher, ScanError, ScanLifecycle, ScanQueue,
    ScanStore, ScannerAdapter, ScannerConfig,
};
use sentra_model::{FindingInfo, RawFinding, ScanId, ScanStatus};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Adapter returning scripted responses in order; counts invocations.
struct ScriptedAdapter {
    responses: Mutex<VecDeque<Result<Vec<RawFinding>>>>,
    calls: AtomicUsize,
}

impl ScriptedAdapter {
    fn new(responses: Vec<Result<Vec<RawFinding>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScannerAdapter for ScriptedAdapter {
    async fn run(&self, _target: &str, _timeout: Duration) -> Result<Vec<RawFinding>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().await;
        responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn check_available(&self) -> bool {
        true
    }
}

fn raw(name: &str, severity: &str) -> RawFinding {
    RawFinding {
        template_id: "test-template".to_string(),
        info: FindingInfo {
            name: name.to_string(),
            author: "test".to_string(),
            severity: severity.to_string(),
            description: None,
            tags: None,
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

fn lifecycle_with(
    adapter: Arc<ScriptedAdapter>,
) -> (Arc<ScanLifecycle>, Arc<InMemoryScanStore>) {
    let store = Arc::new(InMemoryScanStore::new());
    let lifecycle = Arc::new(ScanLifecycle::new(
        Arc::clone(&store) as Arc<dyn ScanStore>,
        adapter,
        Arc::new(FixedClock(test_time())),
        ScannerConfig::default(),
    ));
    (lifecycle, store)
}

#[tokio::test]
async fn clean_scan_completes_with_zero_findings() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![Ok(Vec::new())]));
    let (lifecycle, _store) = lifecycle_with(Arc::clone(&adapter));

    let scan = lifecycle.submit("example.com").await.expect("submit");
    assert_eq!(scan.status, ScanStatus::Pending);
    lifecycle.execute(scan.id).await.expect("execute");

    let results = lifecycle.results(scan.id).await.expect("results");
    assert_eq!(results.scan.status, ScanStatus::Completed);
    assert_eq!(results.scan.findings_count, Some(0));
    assert_eq!(results.scan.started_at, Some(test_time()));
    assert_eq!(results.scan.completed_at, Some(test_time()));
    assert!(results.scan.error.is_none());
    assert!(results.findings.is_empty());
    assert_eq!(results.summary.total(), 0);
}

#[tokio::test]
async fn findings_persist_in_translation_order() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![Ok(vec![
        raw("Deprecated TLS 1.0 Support", "medium"),
        raw("Exposed .git Repository", "medium"),
    ])]));
    let (lifecycle, _store) = lifecycle_with(adapter);

    let scan = lifecycle.submit("example.com").await.expect("submit");
    lifecycle.execute(scan.id).await.expect("execute");

    let results = lifecycle.results(scan.id).await.expect("results");
    assert_eq!(results.scan.findings_count, Some(2));
    assert_eq!(results.findings.len(), 2);
    assert_eq!(
        results.findings[0].technical.name,
        "Deprecated TLS 1.0 Support"
    );
    assert_eq!(results.findings[1].technical.name, "Exposed .git Repository");
    assert_eq!(results.summary.medium, 2);
}

#[tokio::test]
async fn timeout_fails_scan_with_timeout_message() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![Err(ScanError::Timeout)]));
    let (lifecycle, _store) = lifecycle_with(adapter);

    let scan = lifecycle.submit("example.com").await.expect("submit");
    lifecycle.execute(scan.id).await.expect("execute");

    let results = lifecycle.results(scan.id).await.expect("results");
    assert_eq!(results.scan.status, ScanStatus::Failed);
    assert_eq!(results.scan.error.as_deref(), Some("Scan timeout exceeded"));
    assert!(results.scan.findings_count.is_none());
    assert!(results.findings.is_empty());
}

#[tokio::test]
async fn adapter_failure_fails_scan_with_its_message() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![Err(ScanError::Execution(
        "scanner exited with exit status: 2".to_string(),
    ))]));
    let (lifecycle, _store) = lifecycle_with(adapter);

    let scan = lifecycle.submit("example.com").await.expect("submit");
    lifecycle.execute(scan.id).await.expect("execute");

    let fetched = lifecycle.scan(scan.id).await.expect("scan");
    assert_eq!(fetched.status, ScanStatus::Failed);
    assert_eq!(
        fetched.error.as_deref(),
        Some("scan failed: scanner exited with exit status: 2")
    );
}

#[tokio::test]
async fn invalid_target_is_rejected_at_submit() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![]));
    let (lifecycle, _store) = lifecycle_with(adapter);

    let err = lifecycle
        .submit("example.com; rm -rf /")
        .await
        .expect_err("must reject");
    assert!(matches!(err, ScanError::InvalidTarget(_)));

    let scans = lifecycle.list_scans(10, 0).await.expect("list");
    assert!(scans.is_empty());
}

#[tokio::test]
async fn executing_unknown_scan_reports_not_found() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![]));
    let (lifecycle, _store) = lifecycle_with(adapter);

    let err = lifecycle
        .execute(ScanId::new())
        .await
        .expect_err("must fail");
    assert!(matches!(err, ScanError::ScanNotFound(_)));
}

#[tokio::test]
async fn duplicate_delivery_runs_the_scan_once() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![Ok(vec![raw(
        "Directory Listing",
        "info",
    )])]));
    let (lifecycle, _store) = lifecycle_with(Arc::clone(&adapter));

    let scan = lifecycle.submit("example.com").await.expect("submit");
    lifecycle.execute(scan.id).await.expect("first delivery");
    lifecycle.execute(scan.id).await.expect("second delivery");

    assert_eq!(adapter.call_count(), 1);
    let results = lifecycle.results(scan.id).await.expect("results");
    assert_eq!(results.scan.findings_count, Some(1));
    assert_eq!(results.findings.len(), 1);
}

#[tokio::test]
async fn dispatcher_drives_queued_scans_to_completion() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![Ok(Vec::new()), Ok(Vec::new())]));
    let (lifecycle, _store) = lifecycle_with(adapter);
    let dispatcher = ScanDispatcher::start(Arc::clone(&lifecycle), 2);

    let first = lifecycle.submit("example.com").await.expect("submit");
    let second = lifecycle.submit("example.org").await.expect("submit");
    dispatcher.enqueue(first.id).expect("enqueue");
    dispatcher.enqueue(second.id).expect("enqueue");

    for id in [first.id, second.id] {
        let mut waited = Duration::ZERO;
        loop {
            let scan = lifecycle.scan(id).await.expect("scan");
            if scan.status.is_terminal() {
                assert_eq!(scan.status, ScanStatus::Completed);
                break;
            }
            assert!(waited < Duration::from_secs(5), "scan never finished");
            tokio::time::sleep(Duration::from_millis(10)).await;
            waited += Duration::from_millis(10);
        }
    }

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn dispatcher_rejects_enqueue_after_shutdown() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![]));
    let (lifecycle, _store) = lifecycle_with(adapter);
    let dispatcher = ScanDispatcher::start(lifecycle, 1);
    dispatcher.shutdown().await;

    // All workers have exited, dropping the shared receiver.
    let err = dispatcher.enqueue(ScanId::new()).expect_err("queue closed");
    assert!(matches!(err, ScanError::Queue(_)));
}

#[tokio::test]
async fn list_scans_returns_newest_first_with_pagination() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![]));
    let store = Arc::new(InMemoryScanStore::new());
    let clock = Arc::new(FixedClock(test_time()));
    let lifecycle = Arc::new(ScanLifecycle::new(
        Arc::clone(&store) as Arc<dyn ScanStore>,
        adapter,
        clock,
        ScannerConfig::default(),
    ));

    for n in 0..5 {
        lifecycle
            .submit(&format!("host{n}.example.com"))
            .await
            .expect("submit");
    }

    let page = lifecycle.list_scans(2, 0).await.expect("list");
    assert_eq!(page.len(), 2);
    let rest = lifecycle.list_scans(10, 2).await.expect("list");
    assert_eq!(rest.len(), 3);
}
