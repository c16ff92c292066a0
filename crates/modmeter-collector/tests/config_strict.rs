#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use modmeter_collector::config::{self, ReporterKind};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
metrics:
  reporting_interval_seconds: 3
  reporter: console
  reportr_timeout_ms: 10 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "CONFIGURATION");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
metrics:
  reporting_interval_seconds: 3
  reporter: console
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.metrics.reporter, ReporterKind::Console);
    assert_eq!(cfg.metrics.interval().unwrap().as_duration(), Duration::from_secs(3));
    assert_eq!(cfg.metrics.report_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.metrics.shutdown_timeout(), Duration::from_secs(2));
}

#[test]
fn zero_interval_is_configuration_error() {
    let bad = r#"
version: 1
metrics:
  reporting_interval_seconds: 0
  reporter: console
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "CONFIGURATION");
}

#[test]
fn missing_interval_is_configuration_error() {
    let bad = r#"
version: 1
metrics:
  reporter: file
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn unknown_reporter_kind_rejected() {
    let bad = r#"
version: 1
metrics:
  reporting_interval_seconds: 5
  reporter: influx
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "CONFIGURATION");
}

#[test]
fn every_reporter_kind_parses() {
    for (raw, kind) in [
        ("console", ReporterKind::Console),
        ("file", ReporterKind::File),
        ("timeseries", ReporterKind::Timeseries),
    ] {
        let doc = format!(
            "version: 1\nmetrics:\n  reporting_interval_seconds: 1\n  reporter: {raw}\n"
        );
        let cfg = config::load_from_str(&doc).expect("must parse");
        assert_eq!(cfg.metrics.reporter, kind);
        assert_eq!(kind.as_str(), raw);
    }
}

#[test]
fn unsupported_version_rejected() {
    let bad = r#"
version: 2
metrics:
  reporting_interval_seconds: 3
  reporter: console
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn missing_file_is_configuration_error() {
    let err = config::load_from_file("/nonexistent/modmeter.yaml").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "CONFIGURATION");
}
