//! Metrics collector: owns the counter store and the reporting task.
//!
//! Lifecycle is `Created -> Running -> Stopped`. Clones share one inner state,
//! so every handle in the process sees the same counters and at most one
//! background task ever runs.
//!
//! Delivery is at-least-once. A report cycle takes the counts out of the store
//! atomically; if the sink fails or times out, the taken counts are merged back
//! on top of whatever was incremented meanwhile and go out with the next cycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::MutexGuard as GateGuard;

use modmeter_core::error::{MetricsError, ReportingError, Result};
use modmeter_core::store::CounterStore;

use crate::config::{MetricsSection, ReportingInterval};
use crate::reporter::Reporter;
use crate::scheduler::Scheduler;

const DEFAULT_REPORT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Created,
    Running,
    Stopped,
}

enum Lifecycle {
    Created,
    Running(Scheduler),
    Stopped,
}

impl Lifecycle {
    fn state(&self) -> State {
        match self {
            Lifecycle::Created => State::Created,
            Lifecycle::Running(_) => State::Running,
            Lifecycle::Stopped => State::Stopped,
        }
    }
}

#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<CounterStore>,
    reporter: Arc<dyn Reporter>,
    interval: ReportingInterval,
    report_timeout: Duration,
    shutdown_timeout: Duration,
    // Serializes report cycles so the sink never sees concurrent calls.
    report_gate: tokio::sync::Mutex<()>,
    lifecycle: Mutex<Lifecycle>,
}

impl MetricsCollector {
    /// Collector with default report and shutdown timeouts.
    ///
    /// Each value built here owns its own lifecycle and task. The process-wide
    /// single task comes from sharing one handle, normally through a cloned
    /// `AppState`.
    pub fn new(
        store: Arc<CounterStore>,
        reporter: Arc<dyn Reporter>,
        interval: ReportingInterval,
    ) -> Self {
        Self::with_timeouts(
            store,
            reporter,
            interval,
            DEFAULT_REPORT_TIMEOUT,
            DEFAULT_SHUTDOWN_TIMEOUT,
        )
    }

    pub fn from_config(
        store: Arc<CounterStore>,
        reporter: Arc<dyn Reporter>,
        cfg: &MetricsSection,
    ) -> Result<Self> {
        Ok(Self::with_timeouts(
            store,
            reporter,
            cfg.interval()?,
            cfg.report_timeout(),
            cfg.shutdown_timeout(),
        ))
    }

    pub fn with_timeouts(
        store: Arc<CounterStore>,
        reporter: Arc<dyn Reporter>,
        interval: ReportingInterval,
        report_timeout: Duration,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                reporter,
                interval,
                report_timeout,
                shutdown_timeout,
                report_gate: tokio::sync::Mutex::new(()),
                lifecycle: Mutex::new(Lifecycle::Created),
            }),
        }
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.inner
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> State {
        self.lifecycle().state()
    }

    /// Launch the reporting task. Only the first call on any clone spawns it;
    /// later calls while running are no-ops. A collector built separately with
    /// `new` is not a clone and runs its own task. Fails once stopped, or when
    /// called outside a tokio runtime.
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle();
        match *lifecycle {
            Lifecycle::Running(_) => {
                tracing::debug!("metrics collector already running");
                return Ok(());
            }
            Lifecycle::Stopped => return Err(MetricsError::Stopped),
            Lifecycle::Created => {}
        }

        tokio::runtime::Handle::try_current()
            .map_err(|e| MetricsError::Runtime(format!("start requires a tokio runtime: {e}")))?;

        let period = self.inner.interval.as_duration();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let scheduler = Scheduler::spawn(period, move || {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    // Failures are logged and the counts restored inside.
                    let _ = MetricsCollector { inner }.collect_and_report().await;
                }
            }
        });

        *lifecycle = Lifecycle::Running(scheduler);
        tracing::info!(
            interval = ?period,
            reporter = self.inner.reporter.name(),
            "starting metric collection and reporting"
        );
        Ok(())
    }

    /// Live counter store, for inspection. Never cleared by this call.
    pub fn collect(&self) -> Arc<CounterStore> {
        Arc::clone(&self.inner.store)
    }

    /// One report cycle: take the counts, hand them to the sink, and restore
    /// them if the sink fails or exceeds the report timeout.
    pub async fn collect_and_report(&self) -> std::result::Result<(), ReportingError> {
        let gate = self.inner.report_gate.lock().await;
        self.report_locked(gate).await
    }

    async fn report_locked(
        &self,
        _gate: GateGuard<'_, ()>,
    ) -> std::result::Result<(), ReportingError> {
        let inner = &self.inner;
        let snapshot = inner.store.snapshot_and_clear();
        let limit = inner.report_timeout;

        // The sink runs in its own task so a panic inside it surfaces as a
        // JoinError here instead of unwinding through the scheduler loop.
        let reporter = Arc::clone(&inner.reporter);
        let sent = snapshot.clone();
        let mut task = tokio::spawn(async move { reporter.report(&sent).await });

        let outcome = match tokio::time::timeout(limit, &mut task).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => Err(ReportingError::Panicked(e.to_string())),
            Err(_) => {
                task.abort();
                Err(ReportingError::Timeout(limit))
            }
        };

        match outcome {
            Ok(()) => {
                tracing::debug!(
                    reporter = inner.reporter.name(),
                    metrics = snapshot.len(),
                    "report cycle complete"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    reporter = inner.reporter.name(),
                    error = %e,
                    restored = snapshot.len(),
                    "report failed; counts kept for next cycle"
                );
                inner.store.merge(snapshot);
                Err(e)
            }
        }
    }

    /// Final flush and shutdown. Signals the task, runs one last report cycle,
    /// then joins the task. Each wait is bounded by the shutdown timeout, so a
    /// hung sink delays exit but never blocks it. A second call is a no-op.
    pub async fn stop(&self) -> Result<()> {
        let previous = std::mem::replace(&mut *self.lifecycle(), Lifecycle::Stopped);
        let scheduler = match previous {
            Lifecycle::Stopped => {
                tracing::debug!("metrics collector already stopped");
                return Ok(());
            }
            Lifecycle::Running(s) => Some(s),
            Lifecycle::Created => None,
        };

        if let Some(s) = &scheduler {
            s.cancel();
        }

        let grace = self.inner.shutdown_timeout;
        let flushed = match tokio::time::timeout(grace, self.inner.report_gate.lock()).await {
            Ok(gate) => self.report_locked(gate).await,
            Err(_) => {
                tracing::warn!(?grace, "report cycle still in flight; skipping final flush");
                Err(ReportingError::Timeout(grace))
            }
        };

        if let Some(s) = scheduler {
            s.join(grace).await;
        }

        let pending = self.inner.store.len();
        tracing::info!(pending, "metric collection stopped");
        flushed.map_err(MetricsError::from)
    }
}
