//! modmeter core: runtime-agnostic metrics primitives and the error surface.
//!
//! This crate holds the process-wide counter registry, the snapshot type handed
//! to reporting sinks, and the instrumentation wrapper that request handlers
//! use to count operations. It carries no async runtime so it can be embedded
//! in any host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Counting must never
//! be the reason a request handler crashes.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod instrument;
pub mod store;

pub use error::{ErrorKind, MetricsError, ReportingError, Result};
pub use instrument::{BoxFuture, Counted, Instrumentation};
pub use store::{CounterStore, Snapshot};
