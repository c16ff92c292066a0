use std::time::Duration;

use modmeter_core::error::{MetricsError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    pub version: u32,

    pub metrics: MetricsSection,
}

impl CollectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::Configuration(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.metrics.validate()?;

        Ok(())
    }
}

/// Which sink receives snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    Console,
    File,
    Timeseries,
}

impl ReporterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReporterKind::Console => "console",
            ReporterKind::File => "file",
            ReporterKind::Timeseries => "timeseries",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    pub reporting_interval_seconds: u64,

    pub reporter: ReporterKind,

    #[serde(default = "default_report_timeout_ms")]
    pub report_timeout_ms: u64,

    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        ReportingInterval::from_secs(self.reporting_interval_seconds)?;
        if !(1..=600_000).contains(&self.report_timeout_ms) {
            return Err(MetricsError::Configuration(
                "metrics.report_timeout_ms must be between 1 and 600000".into(),
            ));
        }
        if !(1..=60_000).contains(&self.shutdown_timeout_ms) {
            return Err(MetricsError::Configuration(
                "metrics.shutdown_timeout_ms must be between 1 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Result<ReportingInterval> {
        ReportingInterval::from_secs(self.reporting_interval_seconds)
    }

    pub fn report_timeout(&self) -> Duration {
        Duration::from_millis(self.report_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

fn default_report_timeout_ms() -> u64 {
    10_000
}
fn default_shutdown_timeout_ms() -> u64 {
    2_000
}

const MAX_INTERVAL_SECS: u64 = 86_400;

/// Period between scheduled reports. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingInterval(Duration);

impl ReportingInterval {
    pub fn from_secs(secs: u64) -> Result<Self> {
        if !(1..=MAX_INTERVAL_SECS).contains(&secs) {
            return Err(MetricsError::Configuration(format!(
                "metrics.reporting_interval_seconds must be between 1 and {MAX_INTERVAL_SECS}"
            )));
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn zero_interval_rejected() {
        let err = ReportingInterval::from_secs(0).unwrap_err();
        assert_eq!(err.kind().as_str(), "CONFIGURATION");
        assert!(ReportingInterval::from_secs(MAX_INTERVAL_SECS + 1).is_err());
    }

    #[test]
    fn interval_keeps_seconds() {
        let i = ReportingInterval::from_secs(3).unwrap();
        assert_eq!(i.as_duration(), Duration::from_secs(3));
    }

    #[test]
    fn timeouts_range_checked() {
        let section = MetricsSection {
            reporting_interval_seconds: 3,
            reporter: ReporterKind::Console,
            report_timeout_ms: 0,
            shutdown_timeout_ms: 2_000,
        };
        assert!(section.validate().is_err());

        let section = MetricsSection {
            report_timeout_ms: 500,
            shutdown_timeout_ms: 120_000,
            ..section
        };
        assert!(section.validate().is_err());
    }
}
