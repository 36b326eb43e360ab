//! HTTP JSON API server
//!
//! Routes are organized into modules:
//! - routes::transactions: Transaction list, filter, CRUD
//! - routes::clients: Client list, CRUD
//! - routes::reports: Monthly report and dashboard KPIs
//! - routes::export: CSV downloads and the dashboard bundle

pub mod error;
pub mod routes;

use axum::{
    http::HeaderValue,
    routing::get,
    Json, Router,
};
use painel_config::Config;
use painel_core::StoreRef;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: StoreRef,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::clients::{api_client_create, api_client_delete, api_client_detail, api_client_update, api_clients};
    use routes::export::{api_export_clients, api_export_dashboard, api_export_transactions};
    use routes::reports::{api_dashboard, api_monthly_report};
    use routes::transactions::{
        api_transaction_create, api_transaction_delete, api_transaction_detail, api_transaction_update,
        api_transactions,
    };

    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/api/", get(api_root))
        .route("/api/health", get(health_check))
        .route("/api/transactions", get(api_transactions).post(api_transaction_create))
        .route(
            "/api/transactions/:id",
            get(api_transaction_detail)
                .put(api_transaction_update)
                .delete(api_transaction_delete),
        )
        .route("/api/clients", get(api_clients).post(api_client_create))
        .route(
            "/api/clients/:id",
            get(api_client_detail).put(api_client_update).delete(api_client_delete),
        )
        .route("/api/reports/monthly", get(api_monthly_report))
        .route("/api/reports/dashboard", get(api_dashboard))
        .route("/api/export/transactions", get(api_export_transactions))
        .route("/api/export/clients", get(api_export_clients))
        .route("/api/export/dashboard", get(api_export_dashboard))
        .layer(cors)
        .with_state(state)
}

/// "*" allows any origin; anything unparsable is skipped
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

/// API banner
async fn api_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Dashboard Financeiro - Ótica API" }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(config: Config, store: StoreRef) -> std::io::Result<()> {
    let addr = config.bind_address();
    let router = create_router(AppState { store, config });

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting painel server on http://{}", addr);
    log::info!("API available under http://{}/api/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
