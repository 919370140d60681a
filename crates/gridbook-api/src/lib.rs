//! HTTP API server for the transaction grid
//!
//! Routes are organized into modules:
//! - routes::transactions: Transaction list, batch create/update/delete, summary
//! - routes::accounts: Account option list for the select columns

pub mod error;
pub mod routes;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use gridbook_config::Config;
use gridbook_core::{OptionSource, TransactionRepository};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TransactionRepository>,
    pub accounts: Arc<dyn OptionSource>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::api_accounts;
    use routes::transactions::{
        api_transaction_summary, api_transactions, api_transactions_create,
        api_transactions_delete, api_transactions_update, page_transactions,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/accounts", get(api_accounts))
        .route("/api/transactions", get(api_transactions))
        .route("/api/transactions", post(api_transactions_create))
        .route("/api/transactions", put(api_transactions_update))
        .route("/api/transactions", delete(api_transactions_delete))
        .route("/api/transactions/summary", get(api_transaction_summary))
        // Page routes
        .route("/", get(page_transactions))
        .route("/transactions", get(page_transactions))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server
///
/// Binds to the configured address and serves the router until shutdown.
pub async fn start_server(
    config: Config,
    repo: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn OptionSource>,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        repo,
        accounts,
        config,
    };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Gridbook server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /transactions (Transaction grid)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
