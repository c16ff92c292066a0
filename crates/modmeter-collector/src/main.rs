//! modmeter collector
//!
//! - Load strict YAML config (`MODMETER_CONFIG`, default `modmeter.yaml`)
//! - Start the periodic reporting task
//! - On Ctrl-C: final flush, then join the task

use tracing_subscriber::{fmt, EnvFilter};

use modmeter_collector::{app_state::AppState, config};
use modmeter_core::error::Result;

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, kind = e.kind().as_str(), "modmeter-collector failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("MODMETER_CONFIG").unwrap_or_else(|_| "modmeter.yaml".into());
    let cfg = config::load_from_file(&path)?;

    let state = AppState::new(cfg)?;
    let collector = state.collector();
    collector.start()?;

    tracing::info!(config = %path, "modmeter-collector running; Ctrl-C to stop");
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c listener failed; shutting down");
    }

    collector.stop().await
}
