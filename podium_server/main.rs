use std::sync::Arc;

use podium_app::{app::AppBus, config::Config};
use podium_store::InMemoryUnitOfWorkProvider;
use podium_types::{Result, errors::ApplicationError};
use podium_web::{AppState, WebRouter};

mod logs;
use logs::setup_logging;

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<(), ApplicationError> {
    setup_logging();
    let (config, app_bus) = setup_app();
    let state = AppState::new(app_bus);

    WebRouter::serve(state, &config, shutdown_signal()).await?;
    tracing::info!("Server stopped.");

    Ok(())
}

fn setup_app() -> (Arc<Config>, Arc<AppBus>) {
    let config = Arc::new(Config::from_env());
    tracing::info!(
        "Aggregating scores with the {} policy, default top size {}",
        config.aggregation,
        config.top_default
    );

    let uow_provider = Arc::new(InMemoryUnitOfWorkProvider::new(config.aggregation));
    let app_bus = Arc::new(AppBus::new(config.clone(), uow_provider));

    (config, app_bus)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Unable to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
