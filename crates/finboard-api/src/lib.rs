//! JSON HTTP API server
//!
//! Routes are organized into modules:
//! - routes::months: Month list, aggregate, flow graph, score, net worth
//! - routes::categories: Category list and evolution

pub mod error;
pub mod routes;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use finboard_config::Config;
use finboard_core::{Ledger, LedgerSummary, ReloadResponse};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::categories::{api_categories, api_category_evolution};
    use routes::months::{api_month, api_month_flow, api_month_net_worth, api_month_score, api_months};

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/summary", get(api_summary))
        .route("/api/months", get(api_months))
        .route("/api/months/:month", get(api_month))
        .route("/api/months/:month/flow", get(api_month_flow))
        .route("/api/months/:month/score", get(api_month_score))
        .route("/api/months/:month/net-worth", get(api_month_net_worth))
        .route("/api/categories", get(api_categories))
        .route("/api/categories/:name/evolution", get(api_category_evolution))
        .route("/api/reload", post(api_reload))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Get ledger summary (JSON API)
async fn api_summary(state: State<AppState>) -> Json<LedgerSummary> {
    let ledger = state.ledger.read().await;
    Json(ledger.summary())
}

/// Reload ledger API endpoint
async fn api_reload(state: State<AppState>) -> Json<ReloadResponse> {
    let mut ledger = state.ledger.write().await;
    match ledger.reload().await {
        Ok(()) => Json(ReloadResponse {
            success: true,
            message: "Ledger reloaded".to_string(),
            summary: Some(ledger.summary()),
        }),
        Err(e) => {
            log::warn!("Reload failed: {}", e);
            Json(ReloadResponse {
                success: false,
                message: e.to_string(),
                summary: None,
            })
        }
    }
}

/// Start the API server
pub async fn start_server(config: Config, ledger: Arc<RwLock<Ledger>>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { ledger };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting finboard server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /api/summary (Ledger shape)");
    log::info!("  - /api/months (Month list and per-month reports)");
    log::info!("  - /api/categories (Category list and evolution)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
