//! Single recurring background task.
//!
//! The ticker fires on wall-clock cadence independent of request traffic. The
//! first fire is one full period after spawn. Shutdown is cooperative: a watch
//! channel is checked on every loop turn, and `join` waits a bounded time for
//! the task to notice.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub struct Scheduler {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl Scheduler {
    /// Spawn the task on the current tokio runtime. `tick` runs to completion
    /// on each period; a cycle in flight is never interrupted by shutdown.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, mut rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => tick().await,
                }
            }
            tracing::debug!("scheduler task exiting");
        });

        Self { handle, shutdown }
    }

    /// Ask the task to stop after the current cycle.
    pub fn cancel(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Cancel and wait up to `grace` for the task to exit. Returns whether it
    /// exited in time; a late task is left detached, not aborted.
    pub async fn join(mut self, grace: Duration) -> bool {
        self.cancel();
        match time::timeout(grace, &mut self.handle).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "scheduler task failed");
                true
            }
            Err(_) => {
                tracing::warn!(?grace, "scheduler task did not stop in time");
                false
            }
        }
    }
}
