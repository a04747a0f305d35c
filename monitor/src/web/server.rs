use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server(state: AppState) -> Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Diagnostics API running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === CONNECTION HEALTH ROUTES ===
        .route("/api/status", get(handlers::get_status))
        .route("/api/health/check", post(handlers::check_health))
        .route("/api/connection/fix", post(handlers::fix_connection))
        .route("/api/probes", get(handlers::run_probes))
        .route("/api/failures/report", post(handlers::report_failure))
        // === BUNDLE ROUTES ===
        .route("/api/bundle/load", post(handlers::load_bundle))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
