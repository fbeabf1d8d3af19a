use sentra_model::{ParseEnumError, ScanId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// The external tool exceeded the configured wall-clock budget. The
    /// display string is persisted verbatim in the scan's error column.
    #[error("Scan timeout exceeded")]
    Timeout,

    #[error("scan failed: {0}")]
    Execution(String),

    #[error("scanner tool not available: {0}")]
    ToolNotAvailable(String),

    #[error("scan not found: {0}")]
    ScanNotFound(ScanId),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("queue unavailable: {0}")]
    Queue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<ParseEnumError> for ScanError {
    fn from(err: ParseEnumError) -> Self {
        ScanError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
