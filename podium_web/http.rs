use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::{future::Future, io::Error, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use podium_app::{app::AppBus, config::Config, service::LeaderboardService};
use podium_types::{Result, errors::ApplicationError};

use crate::handlers::{player_rank, submit_score, top_players};

#[derive(Clone)]
pub struct AppState {
    pub leaderboard: LeaderboardService,
}

impl AppState {
    pub fn new(app_bus: Arc<AppBus>) -> AppState {
        AppState {
            leaderboard: LeaderboardService::new(app_bus),
        }
    }
}

pub struct WebRouter {}

impl WebRouter {
    pub fn router(state: AppState, config: &Config) -> Router {
        let leaderboard = Router::new()
            .route("/top", get(top_players))
            .route("/rank/{user_id}", get(player_rank))
            .route("/submit", post(submit_score));

        Router::new()
            .nest("/api/leaderboard", leaderboard)
            .with_state(state)
            .layer(cors_layer(config))
            .layer(TraceLayer::new_for_http())
    }

    pub async fn serve<S>(state: AppState, config: &Config, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(infra_error)?;

        Self::serve_with_listener(listener, state, config, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve_with_listener<S>(
        listener: TcpListener,
        state: AppState,
        config: &Config,
        shutdown: S,
    ) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr().map_err(infra_error)?;
        let router = Self::router(state, config);

        tracing::info!("HTTP Server started, listening on http://{}", addr);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(infra_error)?;

        Ok(())
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

fn infra_error(e: Error) -> ApplicationError {
    let err = format!("{:#?}", e);
    ApplicationError::Infrastructure(err)
}
