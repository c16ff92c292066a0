//! Declared sinks without a persistence format yet.
//!
//! Both accept every snapshot and drop it. Counts routed here are lost; pick
//! `console` until a file layout or time-series protocol is defined.

use async_trait::async_trait;

use modmeter_core::error::ReportingError;
use modmeter_core::store::Snapshot;

use super::Reporter;

#[derive(Debug)]
pub struct FileReporter;

impl FileReporter {
    pub fn new() -> Self {
        tracing::warn!(reporter = "file", "sink not implemented; snapshots will be discarded");
        Self
    }
}

impl Default for FileReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reporter for FileReporter {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn report(&self, snapshot: &Snapshot) -> Result<(), ReportingError> {
        tracing::debug!(reporter = "file", metrics = snapshot.len(), "discarding snapshot");
        Ok(())
    }
}

#[derive(Debug)]
pub struct TimeseriesReporter;

impl TimeseriesReporter {
    pub fn new() -> Self {
        tracing::warn!(reporter = "timeseries", "sink not implemented; snapshots will be discarded");
        Self
    }
}

impl Default for TimeseriesReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reporter for TimeseriesReporter {
    fn name(&self) -> &'static str {
        "timeseries"
    }

    async fn report(&self, snapshot: &Snapshot) -> Result<(), ReportingError> {
        tracing::debug!(reporter = "timeseries", metrics = snapshot.len(), "discarding snapshot");
        Ok(())
    }
}
