use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use sentra_core::ScannerConfig;

/// Server configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub scanner: ScannerConfig,
}

impl Config {
    /// Read configuration from environment variables, applying defaults for
    /// everything except `DATABASE_URL`.
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .context("SERVER_PORT must be a valid port number")?;
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let mut scanner = ScannerConfig::default();
        if let Ok(path) = env::var("SCANNER_PATH") {
            scanner.tool_path = path;
        }
        if let Ok(path) = env::var("SCANNER_TEMPLATES_PATH") {
            scanner.templates_path = Some(PathBuf::from(path));
        }
        if let Ok(timeout) = env::var("SCAN_TIMEOUT_MS") {
            scanner.scan_timeout_ms = timeout
                .parse()
                .context("SCAN_TIMEOUT_MS must be an integer number of milliseconds")?;
        }
        if let Ok(concurrency) = env::var("MAX_CONCURRENT_SCANS") {
            scanner.max_concurrent_scans = concurrency
                .parse()
                .context("MAX_CONCURRENT_SCANS must be a positive integer")?;
        }

        Ok(Self {
            host,
            port,
            database_url,
            scanner,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
