pub mod error;
pub mod extract;
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::baseline::HistoricalMarts;
use crate::scenario::ScenarioStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ScenarioStore,
    pub marts: Arc<dyn HistoricalMarts>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/scenarios",
            get(handlers::list_scenarios).post(handlers::create_scenario),
        )
        .route("/api/scenarios/baseline", post(handlers::promote_baseline))
        .route(
            "/api/scenarios/:id",
            get(handlers::get_scenario)
                .patch(handlers::update_scenario)
                .put(handlers::update_scenario)
                .delete(handlers::delete_scenario),
        )
        .route("/api/growth-model/compute", post(handlers::compute))
        .route("/api/growth-model/baseline", get(handlers::baseline))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Growth model API listening");
    axum::serve(listener, app).await
}
