//! Accounts API route handlers.
//!
//! All endpoints speak JSON. State is shared via `Arc<ServiceState>`.
//! Field-level validation (non-empty id, non-negative starting balance)
//! happens here, before the core is called.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::engine::TransferEngine;
use crate::store::AccountStore;
use crate::types::{Account, TellerError, TransferReceipt};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServiceState {
    pub store: Arc<AccountStore>,
    pub engine: TransferEngine,
    pub started_at: DateTime<Utc>,
}

impl ServiceState {
    pub fn new(store: Arc<AccountStore>, engine: TransferEngine) -> Self {
        Self {
            store,
            engine,
            started_at: Utc::now(),
        }
    }
}

pub type AppState = Arc<ServiceState>;

// ---------------------------------------------------------------------------
// Request/response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub id: String,
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub account_from_id: String,
    pub account_to_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub accounts: usize,
    pub uptime_secs: i64,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// POST /v1/accounts
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    info!(account_id = %req.id, "Creating account");

    if req.id.trim().is_empty() {
        return Err(bad_request("Account id must not be empty"));
    }
    if req.balance < Decimal::ZERO {
        return Err(bad_request(TellerError::NegativeInitialBalance.to_string()));
    }

    let account = Account::new(req.id, req.balance);
    state
        .store
        .create(account.clone())
        .await
        .map_err(|e| bad_request(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /v1/accounts/{id}
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>, ApiError> {
    info!(account_id = %id, "Retrieving account");

    match state.store.get(&id).await {
        Some(account) => Ok(Json(account)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: TellerError::AccountNotFound(id).to_string(),
            }),
        )),
    }
}

/// POST /v1/accounts/transfer
pub async fn transfer_money(
    State(state): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<TransferReceipt>, ApiError> {
    info!(
        from = %req.account_from_id,
        to = %req.account_to_id,
        amount = %req.amount,
        "Transferring"
    );

    let receipt = state
        .engine
        .transfer(&req.account_from_id, &req.account_to_id, req.amount)
        .await
        .map_err(|e| bad_request(e.to_string()))?;

    Ok(Json(receipt))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();
    Json(HealthResponse {
        status: "ok",
        accounts: state.store.len().await,
        uptime_secs: uptime,
    })
}
