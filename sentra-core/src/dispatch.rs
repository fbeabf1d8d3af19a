use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use sentra_model::ScanId;

use crate::error::{Result, ScanError};
use crate::lifecycle::ScanLifecycle;

/// Producer side of the scan queue. Handlers enqueue; they never execute.
pub trait ScanQueue: Send + Sync {
    fn enqueue(&self, scan_id: ScanId) -> Result<()>;
}

/// Dispatches queued scans onto a bounded worker pool.
///
/// Submission and execution are decoupled through an mpsc channel. The pool
/// size caps how many scans run concurrently; anything beyond that waits in
/// the channel in FIFO order. Duplicate deliveries are harmless because the
/// lifecycle's admission guard drops them.
pub struct ScanDispatcher {
    sender: mpsc::UnboundedSender<ScanId>,
    cancel: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for ScanDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanDispatcher").finish_non_exhaustive()
    }
}

impl ScanDispatcher {
    /// Spawn `worker_count` workers (clamped to at least one) pulling from a
    /// shared queue.
    pub fn start(lifecycle: Arc<ScanLifecycle>, worker_count: usize) -> Arc<Self> {
        let (sender, receiver) = mpsc::unbounded_channel::<ScanId>();
        let receiver = Arc::new(Mutex::new(receiver));
        let cancel = CancellationToken::new();

        let worker_count = worker_count.max(1);
        let mut workers = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let lifecycle = Arc::clone(&lifecycle);
            let receiver = Arc::clone(&receiver);
            let cancel = cancel.clone();
            workers.push(tokio::spawn(async move {
                worker_loop(worker, lifecycle, receiver, cancel).await;
            }));
        }
        info!(workers = worker_count, "scan dispatcher started");

        Arc::new(Self {
            sender,
            cancel,
            workers: Mutex::new(workers),
        })
    }

    /// Stop accepting work and wait for in-flight scans to finish their
    /// current execution.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let mut workers = self.workers.lock().await;
        for handle in workers.drain(..) {
            if let Err(err) = handle.await {
                error!(error = %err, "scan worker panicked");
            }
        }
        info!("scan dispatcher stopped");
    }
}

impl ScanQueue for ScanDispatcher {
    fn enqueue(&self, scan_id: ScanId) -> Result<()> {
        self.sender
            .send(scan_id)
            .map_err(|_| ScanError::Queue("scan queue is closed".to_string()))?;
        debug!(%scan_id, "scan enqueued");
        Ok(())
    }
}

async fn worker_loop(
    worker: usize,
    lifecycle: Arc<ScanLifecycle>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<ScanId>>>,
    cancel: CancellationToken,
) {
    loop {
        // Hold the receiver lock only while waiting for the next message, so
        // idle workers contend for the queue rather than an executing one.
        let scan_id = {
            let mut receiver = receiver.lock().await;
            tokio::select! {
                () = cancel.cancelled() => break,
                message = receiver.recv() => match message {
                    Some(scan_id) => scan_id,
                    None => break,
                },
            }
        };

        debug!(worker, %scan_id, "worker picked up scan");
        if let Err(err) = lifecycle.execute(scan_id).await {
            error!(worker, %scan_id, error = %err, "scan execution error");
        }
    }
    debug!(worker, "scan worker exiting");
}
