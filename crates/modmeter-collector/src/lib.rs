//! modmeter collector library entry.
//!
//! This crate wires configuration, reporting sinks, the scheduler, and the
//! metrics collector into one pipeline. It is intended to be consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod collector;
pub mod config;
pub mod reporter;
pub mod scheduler;
