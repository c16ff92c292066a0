use async_trait::async_trait;

use modmeter_core::error::ReportingError;
use modmeter_core::store::Snapshot;

use super::Reporter;

/// Logs each snapshot as a JSON object. Always succeeds.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn report(&self, snapshot: &Snapshot) -> Result<(), ReportingError> {
        let rendered = serde_json::to_string(snapshot).unwrap_or_else(|_| snapshot.to_string());
        tracing::info!(
            target: "modmeter::report",
            metrics = snapshot.len(),
            total = snapshot.total(),
            snapshot = %rendered,
            "metrics collected so far"
        );
        Ok(())
    }
}
