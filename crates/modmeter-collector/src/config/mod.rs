//! Collector config loader (strict parsing).

pub mod schema;

use std::fs;

use modmeter_core::error::{MetricsError, Result};

pub use schema::{CollectorConfig, MetricsSection, ReporterKind, ReportingInterval};

pub fn load_from_file(path: &str) -> Result<CollectorConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricsError::Configuration(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<CollectorConfig> {
    let cfg: CollectorConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::Configuration(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
