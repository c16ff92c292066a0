//! Invocation counting for arbitrary operations.
//!
//! Operations are wrapped once at registration time:
//!
//! ```ignore
//! let healthcheck = instr.counter("healthcheck")?.wrap(|()| 200);
//! let classify = instr.counter("classify")?.wrap_fallible(|(msg,): (String,)| classifier.classify(&msg));
//! ```
//!
//! The wrapped callable has the same argument and return types as the
//! original. Arguments are passed as a single value, so multi-argument
//! operations take a tuple and zero-argument ones take `()`.
//!
//! A call is counted only after it completes without a fault: a panic unwinds
//! past the increment, and for `Result` operations an `Err` is not counted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{MetricsError, Result};
use crate::store::CounterStore;

/// Boxed `Send` future returned by async wrappers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Hands out named counters backed by one shared `CounterStore`.
#[derive(Clone)]
pub struct Instrumentation {
    store: Arc<CounterStore>,
}

impl Instrumentation {
    pub fn new(store: Arc<CounterStore>) -> Self {
        Self { store }
    }

    /// Counter handle for `name`. Empty names are rejected.
    pub fn counter(&self, name: impl Into<String>) -> Result<Counted> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MetricsError::Configuration(
                "metric name must not be empty".into(),
            ));
        }
        Ok(Counted {
            name: Arc::from(name),
            store: Arc::clone(&self.store),
        })
    }

    pub fn store(&self) -> &Arc<CounterStore> {
        &self.store
    }
}

/// A named counter that can wrap operations.
#[derive(Clone)]
pub struct Counted {
    name: Arc<str>,
    store: Arc<CounterStore>,
}

impl Counted {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn hit(&self) {
        self.store.increment(&self.name);
    }

    /// Count every call that returns.
    pub fn wrap<A, R, F>(self, op: F) -> impl Fn(A) -> R
    where
        F: Fn(A) -> R,
    {
        move |args: A| {
            let out = op(args);
            self.hit();
            out
        }
    }

    /// Count calls that return `Ok`; `Err` passes through uncounted.
    pub fn wrap_fallible<A, T, E, F>(self, op: F) -> impl Fn(A) -> std::result::Result<T, E>
    where
        F: Fn(A) -> std::result::Result<T, E>,
    {
        move |args: A| {
            let out = op(args);
            if out.is_ok() {
                self.hit();
            }
            out
        }
    }

    /// Async variant of [`Counted::wrap_fallible`]. The increment happens when
    /// the returned future resolves to `Ok`.
    pub fn wrap_async<A, T, E, F, Fut>(
        self,
        op: F,
    ) -> impl Fn(A) -> BoxFuture<std::result::Result<T, E>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: 'static,
        E: 'static,
    {
        move |args: A| {
            let fut = op(args);
            let counter = self.clone();
            let wrapped: BoxFuture<std::result::Result<T, E>> = Box::pin(async move {
                let out = fut.await;
                if out.is_ok() {
                    counter.hit();
                }
                out
            });
            wrapped
        }
    }
}
