//! # Sentra Server
//!
//! HTTP front end for the Sentra scan platform. Exposes scan submission,
//! status, and translated results over a small JSON API, and hosts the
//! dispatcher that drives queued scans through the external scanner.
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::{router, AppState};
