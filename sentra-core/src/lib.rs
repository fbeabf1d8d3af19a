//! # Sentra Core
//!
//! Core library for the Sentra scan platform. It owns the scan lifecycle
//! state machine, the external scanner adapter, the rule-based translation
//! engine that turns technical findings into business risk findings, and the
//! persistence ports backing all of it.
//!
//! ## Architecture
//!
//! - [`adapter`]: subprocess integration with the external scanning tool
//! - [`translate`]: deterministic raw-finding → business-finding translation
//! - [`summary`]: priority / risk-type aggregation over finding collections
//! - [`lifecycle`]: the PENDING → RUNNING → COMPLETED|FAILED state machine
//! - [`dispatch`]: the queue and worker pool decoupling submission from
//!   execution
//! - [`store`]: the persistence port plus Postgres and in-memory backends
#![allow(missing_docs)]

pub mod adapter;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod store;
pub mod summary;
pub mod translate;

pub use adapter::{NucleiAdapter, ScannerAdapter};
pub use clock::{Clock, SystemClock};
pub use config::ScannerConfig;
pub use dispatch::{ScanDispatcher, ScanQueue};
pub use error::{Result, ScanError};
pub use lifecycle::ScanLifecycle;
pub use store::{InMemoryScanStore, PostgresScanStore, ScanStore};
pub use summary::summarize;
pub use translate::TranslationEngine;
