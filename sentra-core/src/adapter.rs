use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use sentra_model::RawFinding;

use crate::config::ScannerConfig;
use crate::error::{Result, ScanError};

/// Port to the external scanning tool. The lifecycle manager only depends on
/// this trait, so tests substitute scripted fakes.
#[async_trait]
pub trait ScannerAdapter: Send + Sync {
    /// Run one scan against `target` within the given wall-clock budget and
    /// return the raw findings the tool produced.
    async fn run(&self, target: &str, timeout: Duration) -> Result<Vec<RawFinding>>;

    /// Probe whether the tool is installed and executable. Startup
    /// diagnostic only; it never gates scan submission.
    async fn check_available(&self) -> bool;
}

/// Adapter for the nuclei vulnerability scanner.
///
/// Each invocation owns a scoped temporary directory for the tool's output
/// stream; the directory is removed on every exit path when the guard drops.
#[derive(Debug, Clone)]
pub struct NucleiAdapter {
    tool_path: String,
    templates_path: Option<PathBuf>,
}

impl NucleiAdapter {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            tool_path: config.tool_path.clone(),
            templates_path: config.templates_path.clone(),
        }
    }

    /// Build the tool invocation with one argument per token. The target is
    /// only ever passed as a plain argument value, never through a shell.
    fn command(&self, target: &str, output: &Path) -> Command {
        let mut cmd = Command::new(&self.tool_path);
        cmd.arg("-target")
            .arg(target)
            .arg("-json")
            .arg("-output")
            .arg(output)
            .arg("-silent")
            .arg("-no-color");
        if let Some(templates) = &self.templates_path {
            cmd.arg("-t").arg(templates);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ScannerAdapter for NucleiAdapter {
    async fn run(&self, target: &str, timeout: Duration) -> Result<Vec<RawFinding>> {
        let workdir = tempfile::tempdir()?;
        let output_path = workdir.path().join("results.json");

        debug!(tool = %self.tool_path, target, "launching scanner");
        let mut child = self.command(target, &output_path).spawn().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ScanError::ToolNotAvailable(self.tool_path.clone())
            } else {
                ScanError::Io(err)
            }
        })?;

        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(waited) => waited?,
            Err(_) => {
                // Budget exhausted: terminate the subprocess before reporting.
                if let Err(err) = child.start_kill() {
                    warn!(error = %err, "failed to kill timed-out scanner process");
                }
                let _ = child.wait().await;
                return Err(ScanError::Timeout);
            }
        };

        if !status.success() {
            return Err(ScanError::Execution(format!(
                "scanner exited with {status}"
            )));
        }

        parse_output(&output_path).await
    }

    async fn check_available(&self) -> bool {
        match Command::new(&self.tool_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => {
                info!(tool = %self.tool_path, "scanner tool available");
                status.success()
            }
            Err(err) => {
                warn!(tool = %self.tool_path, error = %err, "scanner tool not found or not executable");
                false
            }
        }
    }
}

/// Parse the tool's newline-delimited JSON output. Each line is decoded
/// independently: a malformed line is logged and skipped, never fatal. An
/// absent file means the tool found nothing.
async fn parse_output(path: &Path) -> Result<Vec<RawFinding>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut findings = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawFinding>(line) {
            Ok(finding) => findings.push(finding),
            Err(err) => {
                warn!(error = %err, line, "skipping unparseable scanner output line");
            }
        }
    }
    Ok(findings)
}
