//! Reporting sinks.
//!
//! A `Reporter` persists one snapshot per call. It never clears the counter
//! store; the collector decides what to do with the counts based on the
//! outcome. Calls arrive sequentially from the collector, never concurrently.

pub mod console;
pub mod stub;

use std::sync::Arc;

use async_trait::async_trait;

use modmeter_core::error::ReportingError;
use modmeter_core::store::Snapshot;

use crate::config::ReporterKind;

pub use console::ConsoleReporter;
pub use stub::{FileReporter, TimeseriesReporter};

#[async_trait]
pub trait Reporter: Send + Sync {
    /// Short sink name for logs.
    fn name(&self) -> &'static str;
    async fn report(&self, snapshot: &Snapshot) -> Result<(), ReportingError>;
}

/// Build the sink selected by configuration.
pub fn from_kind(kind: ReporterKind) -> Arc<dyn Reporter> {
    match kind {
        ReporterKind::Console => Arc::new(ConsoleReporter::new()),
        ReporterKind::File => Arc::new(FileReporter::new()),
        ReporterKind::Timeseries => Arc::new(TimeseriesReporter::new()),
    }
}
