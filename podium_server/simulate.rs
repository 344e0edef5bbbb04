use reqwest::Client;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod workload;
use workload::{SimulationConfig, Stats, run_worker};

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();

    let config = Arc::new(SimulationConfig::from_env());
    let stats = Arc::new(Stats::default());
    let client = Client::new();

    tracing::info!(
        "Starting simulation with {} workers against {}",
        config.workers,
        config.base_url
    );
    let workers: Vec<_> = (0..config.workers)
        .map(|_| {
            tokio::spawn(run_worker(
                client.clone(),
                config.clone(),
                stats.clone(),
                None,
            ))
        })
        .collect();

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Unable to listen for shutdown signal: {e}");
    }
    tracing::info!("Stopping simulation...");
    for worker in &workers {
        worker.abort();
    }
    stats.log_summary();
}
