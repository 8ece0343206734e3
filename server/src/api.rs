//! # REST API
//!
//! Builds the axum router that exposes the ledger's HTTP interface. All
//! endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                          | Description                      |
//! |--------|-------------------------------|----------------------------------|
//! | GET    | `/health`                     | Liveness probe                   |
//! | GET    | `/status`                     | Server status summary            |
//! | POST   | `/v1/accounts`                | Create an account                |
//! | POST   | `/v1/deposits`                | Deposit into a wallet            |
//! | POST   | `/v1/transfers`               | Transfer between users           |
//! | GET    | `/v1/wallets/:id`             | Wallet by id                     |
//! | GET    | `/v1/users/:user_id/overview` | Wallet + recent activity         |
//!
//! ## Error Shape
//!
//! Every failure is a JSON body `{ "kind": "...", "error": "..." }` where
//! `kind` is machine-readable and stable, and `error` is the human message.
//! Status mapping: 400 for validation, 404 for absent resources, 409 for
//! duplicates, 422 for insufficient funds, 500 for storage failures.

use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use kudi_ledger::config::{MAX_EMAIL_LENGTH, MAX_REFERENCE_LENGTH};
use kudi_ledger::{
    CreateAccountInput, DepositInput, LedgerEngine, LedgerError, TransactionRecord, TransferInput,
    TransferReceipt, User, WalletOverview, WalletView,
};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — the engine shares its pool, metrics are refcounted.
#[derive(Clone)]
pub struct AppState {
    /// The server's reported version string.
    pub version: String,
    /// The ledger operation surface.
    pub engine: LedgerEngine,
    /// Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
///
/// The returned router is ready to be served on the configured RPC port.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/v1/accounts", post(create_account_handler))
        .route("/v1/deposits", post(deposit_handler))
        .route("/v1/transfers", post(transfer_handler))
        .route("/v1/wallets/:id", get(wallet_handler))
        .route("/v1/users/:user_id/overview", get(overview_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/accounts`.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Unique email for the new account.
    pub email: String,
    /// Optional display name.
    pub full_name: Option<String>,
}

/// Response payload for `POST /v1/accounts`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    /// The created user row.
    pub user: User,
    /// The provisioned NGN wallet.
    pub wallet: WalletView,
}

/// Request body for `POST /v1/deposits`.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// The wallet receiving the funds.
    pub wallet_id: String,
    /// Amount in major units.
    pub amount: f64,
    /// External idempotency reference. Generated when absent.
    pub reference: Option<String>,
}

/// Request body for `POST /v1/transfers`.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// The sending user id.
    pub sender_id: String,
    /// The recipient, addressed by email.
    pub recipient_email: String,
    /// Amount in major units.
    pub amount: f64,
}

/// Query parameters for `GET /v1/users/:user_id/overview`.
#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    /// How many recent transactions to include. Clamped server-side.
    pub limit: Option<u32>,
}

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server software version.
    pub version: String,
    /// Number of registered users.
    pub users: i64,
    /// Number of provisioned wallets.
    pub wallets: i64,
    /// Number of ledger entries.
    pub transactions: i64,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable error kind.
    pub kind: String,
    /// Human-readable message.
    pub error: String,
}

// ---------------------------------------------------------------------------
// Error Mapping
// ---------------------------------------------------------------------------

/// Maps a ledger error to its HTTP status and stable kind.
fn status_and_kind(err: &LedgerError) -> (StatusCode, &'static str) {
    match err {
        LedgerError::MissingEmail => (StatusCode::BAD_REQUEST, "missing_email"),
        LedgerError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "invalid_amount"),
        LedgerError::SelfTransferNotAllowed => (StatusCode::BAD_REQUEST, "self_transfer"),
        LedgerError::MissingWallet { .. } => (StatusCode::NOT_FOUND, "missing_wallet"),
        LedgerError::RecipientNotFound { .. } => (StatusCode::NOT_FOUND, "recipient_not_found"),
        LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        LedgerError::DuplicateAccount { .. } => (StatusCode::CONFLICT, "duplicate_account"),
        LedgerError::DuplicateReference { .. } => (StatusCode::CONFLICT, "duplicate_reference"),
        LedgerError::InsufficientFunds { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds")
        }
        LedgerError::CorruptRecord(_) | LedgerError::Storage(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "storage")
        }
    }
}

/// Renders a ledger error as the standard JSON error body.
fn error_response(err: LedgerError) -> Response {
    let (status, kind) = status_and_kind(&err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(%err, "ledger operation failed");
    } else {
        tracing::debug!(%err, kind, "ledger operation rejected");
    }
    (
        status,
        Json(ErrorBody {
            kind: kind.to_string(),
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// A plain 400 for request-shape problems caught before the engine.
fn invalid_input(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            kind: "invalid_input".to_string(),
            error: message.to_string(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the server is alive.
///
/// The liveness probe for orchestrators. Intentionally does not touch the
/// database — that belongs in `/status`.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — server status summary with live row counts.
async fn status_handler(State(state): State<AppState>) -> Response {
    let db = state.engine.db();
    let counts = async {
        Ok::<_, LedgerError>((
            db.user_count().await?,
            db.wallet_count().await?,
            db.transaction_count().await?,
        ))
    }
    .await;

    match counts {
        Ok((users, wallets, transactions)) => Json(StatusResponse {
            version: state.version.clone(),
            users,
            wallets,
            transactions,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
        .into_response(),
        Err(err) => error_response(err),
    }
}

/// `POST /v1/accounts` — creates a user and their NGN wallet.
async fn create_account_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Response {
    if req.email.len() > MAX_EMAIL_LENGTH {
        state.metrics.operations_rejected_total.inc();
        return invalid_input("email exceeds maximum length");
    }

    let started = Instant::now();
    let result = state
        .engine
        .create_account(CreateAccountInput {
            email: req.email,
            full_name: req.full_name,
        })
        .await;
    state
        .metrics
        .operation_latency_seconds
        .observe(started.elapsed().as_secs_f64());

    match result {
        Ok((user, wallet)) => {
            state.metrics.accounts_created_total.inc();
            (
                StatusCode::CREATED,
                Json(AccountResponse {
                    user,
                    wallet: WalletView::from(wallet),
                }),
            )
                .into_response()
        }
        Err(err) => {
            state.metrics.operations_rejected_total.inc();
            error_response(err)
        }
    }
}

/// `POST /v1/deposits` — credits a wallet and records the deposit.
async fn deposit_handler(
    State(state): State<AppState>,
    Json(req): Json<DepositRequest>,
) -> Response {
    if let Some(reference) = &req.reference {
        if reference.len() > MAX_REFERENCE_LENGTH {
            state.metrics.operations_rejected_total.inc();
            return invalid_input("reference exceeds maximum length");
        }
    }

    let started = Instant::now();
    let result = state
        .engine
        .deposit(DepositInput {
            wallet_id: req.wallet_id,
            amount: req.amount,
            reference: req.reference,
        })
        .await;
    state
        .metrics
        .operation_latency_seconds
        .observe(started.elapsed().as_secs_f64());

    match result {
        Ok(record) => {
            state.metrics.deposits_total.inc();
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(err) => {
            state.metrics.operations_rejected_total.inc();
            error_response(err)
        }
    }
}

/// `POST /v1/transfers` — moves funds between two users, atomically.
async fn transfer_handler(
    State(state): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Response {
    let started = Instant::now();
    let result = state
        .engine
        .transfer(TransferInput {
            sender_id: req.sender_id,
            recipient_email: req.recipient_email,
            amount: req.amount,
        })
        .await;
    state
        .metrics
        .operation_latency_seconds
        .observe(started.elapsed().as_secs_f64());

    match result {
        Ok(receipt) => {
            state.metrics.transfers_total.inc();
            (StatusCode::CREATED, Json(receipt)).into_response()
        }
        Err(err) => {
            state.metrics.operations_rejected_total.inc();
            error_response(err)
        }
    }
}

/// `GET /v1/wallets/:id` — a wallet by id.
async fn wallet_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.engine.get_wallet(&id).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => error_response(err),
    }
}

/// `GET /v1/users/:user_id/overview` — wallet plus recent activity.
async fn overview_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<OverviewParams>,
) -> Response {
    match state.engine.wallet_overview(&user_id, params.limit).await {
        Ok(overview) => Json(overview).into_response(),
        Err(err) => error_response(err),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
