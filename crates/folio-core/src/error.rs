//! Error types for folio
//!
//! Navigation itself never fails: boundaries, vetoes and empty sets are
//! defined no-ops. Errors only surface at the session and configuration edges.

use thiserror::Error;

/// Core folio errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FolioError {
    // Session errors
    #[error("Navigation session closed")]
    SessionClosed,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid swipe interval: {0}s")]
    InvalidInterval(f64),

    #[error("Configuration parse error: {0}")]
    Config(String),

    // Telemetry errors
    #[error("Telemetry setup failed: {0}")]
    Telemetry(String),
}

/// Result type for folio operations
pub type FolioResult<T> = Result<T, FolioError>;
