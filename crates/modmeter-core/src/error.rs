//! Shared error types across modmeter crates.

use std::time::Duration;

use thiserror::Error;

/// Stable short codes for error variants (log fields, assertions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or missing configuration value.
    Configuration,
    /// A reporting sink failed.
    Reporting,
    /// Collector already reached its terminal state.
    Stopped,
    /// No async runtime available.
    Runtime,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CONFIGURATION",
            ErrorKind::Reporting => "REPORTING",
            ErrorKind::Stopped => "STOPPED",
            ErrorKind::Runtime => "RUNTIME",
        }
    }
}

/// Failure of a reporting sink. Recovered by the collector; never reaches
/// request handlers.
#[derive(Debug, Error)]
pub enum ReportingError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),
    #[error("sink rejected write: {0}")]
    Rejected(String),
    #[error("report timed out after {0:?}")]
    Timeout(Duration),
    #[error("sink panicked: {0}")]
    Panicked(String),
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and collector.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("configuration: {0}")]
    Configuration(String),
    #[error("reporting failed: {0}")]
    Reporting(#[from] ReportingError),
    #[error("collector already stopped")]
    Stopped,
    #[error("runtime: {0}")]
    Runtime(String),
}

impl MetricsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetricsError::Configuration(_) => ErrorKind::Configuration,
            MetricsError::Reporting(_) => ErrorKind::Reporting,
            MetricsError::Stopped => ErrorKind::Stopped,
            MetricsError::Runtime(_) => ErrorKind::Runtime,
        }
    }
}
