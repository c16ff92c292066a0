//! Top-level facade crate for modmeter.
//!
//! Re-exports the core primitives and the collector library so users can depend on a single crate.

pub mod core {
    pub use modmeter_core::*;
}

pub mod collector {
    pub use modmeter_collector::*;
}
