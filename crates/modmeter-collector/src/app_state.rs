//! Composition root.
//!
//! Builds exactly one counter store, one reporter, and one collector for the
//! process, and hands out clones. Request handlers get counters through
//! `instrumentation()` and never touch the store directly.

use std::sync::Arc;

use modmeter_core::error::Result;
use modmeter_core::instrument::{Counted, Instrumentation};
use modmeter_core::store::CounterStore;

use crate::collector::MetricsCollector;
use crate::config::CollectorConfig;
use crate::reporter::{self, Reporter};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: CollectorConfig,
    collector: MetricsCollector,
    instrumentation: Instrumentation,
}

impl AppState {
    /// Wire the metrics pipeline from validated config, with the reporter
    /// selected by `metrics.reporter`.
    pub fn new(cfg: CollectorConfig) -> Result<Self> {
        tracing::info!(
            reporter = cfg.metrics.reporter.as_str(),
            interval_secs = cfg.metrics.reporting_interval_seconds,
            "metrics pipeline configured"
        );
        let reporter = reporter::from_kind(cfg.metrics.reporter);
        Self::with_reporter(cfg, reporter)
    }

    /// Same as `new` but with an injected sink.
    pub fn with_reporter(cfg: CollectorConfig, reporter: Arc<dyn Reporter>) -> Result<Self> {
        cfg.validate()?;

        let store = Arc::new(CounterStore::new());
        let collector = MetricsCollector::from_config(Arc::clone(&store), reporter, &cfg.metrics)?;
        let instrumentation = Instrumentation::new(store);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                collector,
                instrumentation,
            }),
        })
    }

    pub fn cfg(&self) -> &CollectorConfig {
        &self.inner.cfg
    }

    pub fn collector(&self) -> MetricsCollector {
        self.inner.collector.clone()
    }

    pub fn instrumentation(&self) -> &Instrumentation {
        &self.inner.instrumentation
    }

    /// Shorthand for `instrumentation().counter(name)`.
    pub fn counter(&self, name: &str) -> Result<Counted> {
        self.inner.instrumentation.counter(name)
    }
}
