//! Simple REST API server example for the point ledger.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `GET /points/{id}` - Get a user's balance
//! - `GET /points/{id}/histories` - Get a user's charge/use history
//! - `PATCH /points/{id}/charge` - Charge points
//! - `PATCH /points/{id}/use` - Use points
//!
//! ## Example Usage
//!
//! ```bash
//! # Charge
//! curl -X PATCH http://localhost:3000/points/1/charge \
//!   -H "Content-Type: application/json" \
//!   -d '{"amount": 100}'
//!
//! # Use
//! curl -X PATCH http://localhost:3000/points/1/use \
//!   -H "Content-Type: application/json" \
//!   -d '{"amount": 25}'
//!
//! # Balance
//! curl http://localhost:3000/points/1
//!
//! # History
//! curl http://localhost:3000/points/1/histories
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use point_ledger_rs::{HistoryEntry, Ledger, LedgerError, MemoryStore, UserBalance, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

// === Request/Response DTOs ===

/// Request body for charge/use operations.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: i64,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the ledger.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger<MemoryStore>>,
}

// === Error Handling ===

/// Wrapper for converting `LedgerError` into HTTP responses.
pub struct AppError(LedgerError);

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            LedgerError::InvalidUserId => (StatusCode::BAD_REQUEST, "INVALID_USER_ID"),
            LedgerError::InvalidAmount => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            LedgerError::BalanceLimitExceeded => {
                (StatusCode::UNPROCESSABLE_ENTITY, "BALANCE_LIMIT_EXCEEDED")
            }
            LedgerError::InsufficientBalance => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_BALANCE")
            }
            LedgerError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_FAULT"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// GET /points/{id} - Get a user's balance.
async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserBalance>, AppError> {
    let balance = state.ledger.balance(UserId(id))?;
    Ok(Json(balance))
}

/// GET /points/{id}/histories - Get a user's history.
async fn get_histories(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let entries = state.ledger.history(UserId(id))?;
    Ok(Json(entries))
}

/// PATCH /points/{id}/charge - Charge points.
async fn charge(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<UserBalance>, AppError> {
    let balance = state.ledger.charge(UserId(id), request.amount)?;
    Ok(Json(balance))
}

/// PATCH /points/{id}/use - Use points.
async fn use_points(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<UserBalance>, AppError> {
    let balance = state.ledger.use_points(UserId(id), request.amount)?;
    Ok(Json(balance))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/points/{id}", get(get_balance))
        .route("/points/{id}/histories", get(get_histories))
        .route("/points/{id}/charge", patch(charge))
        .route("/points/{id}/use", patch(use_points))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let state = AppState {
        ledger: Arc::new(Ledger::in_memory()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Point ledger API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  GET   /points/:id            - Get balance");
    println!("  GET   /points/:id/histories  - Get history");
    println!("  PATCH /points/:id/charge     - Charge points");
    println!("  PATCH /points/:id/use        - Use points");

    axum::serve(listener, app).await.unwrap();
}
