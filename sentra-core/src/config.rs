use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Knobs for external tool invocation and scan execution.
///
/// All fields carry defaults so deployments only override what they need.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Binary the adapter invokes; resolved through `PATH` when not absolute.
    pub tool_path: String,
    /// Optional template directory forwarded to the tool via `-t`.
    #[serde(default)]
    pub templates_path: Option<PathBuf>,
    /// Hard wall-clock budget for one tool invocation (milliseconds).
    pub scan_timeout_ms: u64,
    /// Dispatcher worker-pool size. This is the concurrency bound: at most
    /// this many scans run at once.
    pub max_concurrent_scans: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            tool_path: "nuclei".to_string(),
            templates_path: None,
            scan_timeout_ms: 300_000,
            max_concurrent_scans: 5,
        }
    }
}

impl ScannerConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }
}
