pub mod handlers;
pub mod types;

use crate::{Result, config::Config, llm::EngineManager, query::QueryOrchestrator};
use axum::{Router, routing::get};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the application with the chat endpoint mounted at `endpoint`.
pub fn router(state: AppState, endpoint: &str) -> Router {
    Router::new()
        .route(endpoint, get(handlers::health).post(handlers::chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until the listener fails. `engine` must already be initialized.
pub async fn run(config: Config, engine: Arc<EngineManager>) -> Result<()> {
    let orchestrator = QueryOrchestrator::new(engine, config.server.data_root.clone());
    let app = router(AppState::new(orchestrator), &config.server.endpoint);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} (endpoint {}, data root {})",
        addr,
        config.server.endpoint,
        config.server.data_root.display()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
