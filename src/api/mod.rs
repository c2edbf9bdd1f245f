//! API — Axum web server for the accounts service.
//!
//! A thin adapter over the store and transfer engine: routing, JSON
//! marshaling, and field-level validation. CORS enabled for local
//! development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/v1/accounts", post(routes::create_account))
        .route("/v1/accounts/transfer", post(routes::transfer_money))
        .route("/v1/accounts/:id", get(routes::get_account))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Bind the listener and serve until a shutdown signal arrives.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Accounts API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received.");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
