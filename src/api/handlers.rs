//! HTTP API handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::bet::{Bet, BetManager, BetReceipt, BetStore};
use crate::config::Config;
use crate::error::{BetError, EngineError, LedgerError};
use crate::ledger::{AccountBalance, Ledger, LedgerTransaction, TxReason};
use crate::selection::types::{RawSelection, SelectionScore};
use crate::settlement::{SettledBet, SettlementProcessor};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The balance ledger.
    pub ledger: Arc<Ledger>,
    /// Bet lifecycle manager.
    pub bets: Arc<BetManager>,
    /// Settlement processor.
    pub settlement: Arc<SettlementProcessor>,
    /// Engine configuration.
    pub config: Arc<Config>,
    /// Prometheus exposition handle, if a recorder is installed.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire up the engine components from configuration.
    pub fn new(config: Config) -> Self {
        let ledger = Arc::new(Ledger::new(config.currency.clone()));
        let store = Arc::new(BetStore::new());
        let settlement = Arc::new(SettlementProcessor::new(ledger.clone(), store.clone()));
        let bets = Arc::new(BetManager::new(
            ledger.clone(),
            store,
            settlement.clone(),
            config.max_selections,
        ));

        Self {
            ledger,
            bets,
            settlement,
            config: Arc::new(config),
            metrics_handle: None,
        }
    }

    /// Attach a Prometheus exposition handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Engine error wrapped for HTTP responses.
pub struct ApiError(EngineError);

impl<E: Into<EngineError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            EngineError::Ledger(LedgerError::InsufficientFunds { .. }) => {
                (StatusCode::BAD_REQUEST, "insufficient_funds")
            }
            EngineError::Ledger(LedgerError::InvalidAmount { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_amount")
            }
            EngineError::Ledger(LedgerError::Unauthorized { .. }) => {
                (StatusCode::FORBIDDEN, "unauthorized")
            }
            EngineError::Bet(BetError::BetNotFound { .. }) => {
                (StatusCode::NOT_FOUND, "bet_not_found")
            }
            EngineError::Bet(BetError::EmptySelections) => {
                (StatusCode::BAD_REQUEST, "empty_selections")
            }
            EngineError::Bet(BetError::InvalidSelection { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_selection")
            }
            EngineError::Bet(BetError::TooManySelections { .. }) => {
                (StatusCode::BAD_REQUEST, "too_many_selections")
            }
            EngineError::Bet(BetError::InvalidStake { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_stake")
            }
            EngineError::Bet(_) => (StatusCode::BAD_REQUEST, "bet_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": code,
            "message": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Place-bet request body.
#[derive(Debug, Deserialize)]
pub struct PlaceBetRequest {
    /// Account placing the bet.
    pub user_id: String,
    /// Stake in minor units.
    pub stake_minor_units: i64,
    /// Candidate selections.
    pub selections: Vec<RawSelection>,
}

/// Score-update request body from the score feed.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    /// Final scores per event.
    pub selections: Vec<SelectionScore>,
}

/// Faucet request body.
#[derive(Debug, Default, Deserialize)]
pub struct FaucetRequest {
    /// Amount in minor units; falls back to the configured default.
    #[serde(default)]
    pub amount_minor_units: Option<i64>,
}

/// Admin credit request body.
#[derive(Debug, Deserialize)]
pub struct AdminCreditRequest {
    /// Role of the caller; must be `admin`.
    pub caller_role: String,
    /// Account to credit.
    pub target_user_id: String,
    /// Amount in minor units.
    pub amount_minor_units: i64,
    /// Optional note recorded in the transaction metadata.
    #[serde(default)]
    pub note: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Currency served by the ledger.
    pub currency: String,
    /// Number of accounts.
    pub accounts: usize,
    /// Bets still pending.
    pub open_bets: usize,
    /// Bets in the settlement archive.
    pub settled_bets: usize,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - the engine is ready as soon as it is wired up.
pub async fn ready() -> impl IntoResponse {
    Json(HealthResponse { status: "ready" })
}

/// Status handler - engine statistics.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        currency: state.config.currency.clone(),
        accounts: state.ledger.account_count(),
        open_bets: state.bets.open_bet_count(),
        settled_bets: state.settlement.settled_count(),
    })
}

/// Prometheus exposition handler.
pub async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Place a bet.
pub async fn place_bet(
    State(state): State<AppState>,
    Json(body): Json<PlaceBetRequest>,
) -> Result<Json<BetReceipt>, ApiError> {
    let receipt = state
        .bets
        .place_bet(&body.user_id, body.stake_minor_units, &body.selections)?;
    Ok(Json(receipt))
}

/// Apply final scores to a bet; settles it when the results are terminal.
pub async fn score_bet(
    State(state): State<AppState>,
    Path(bet_id): Path<String>,
    Json(body): Json<ScoreRequest>,
) -> Result<Json<Bet>, ApiError> {
    let bet = state.bets.apply_scores(&bet_id, &body.selections)?;
    Ok(Json(bet))
}

/// List a user's bets, newest first.
pub async fn list_bets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Bet>> {
    Json(state.bets.bets_for_user(&user_id))
}

/// A user's settled bets, newest first.
pub async fn bet_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<SettledBet>> {
    Json(state.settlement.history_for_user(&user_id))
}

/// Current balance, creating a zero-balance account on first access.
pub async fn wallet(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<AccountBalance> {
    Json(state.ledger.balance(&user_id))
}

/// A user's ledger transactions, newest first.
pub async fn wallet_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<LedgerTransaction>> {
    Json(state.ledger.transactions(&user_id))
}

/// Operational/test credit.
pub async fn faucet(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Option<Json<FaucetRequest>>,
) -> Result<Json<AccountBalance>, ApiError> {
    let amount = body
        .and_then(|Json(b)| b.amount_minor_units)
        .unwrap_or(state.config.faucet_amount_minor_units);

    let balance = state
        .ledger
        .credit(&user_id, amount, TxReason::Faucet, json!({ "source": "faucet" }))?;
    Ok(Json(balance))
}

/// Credit another user's account; restricted to the admin role.
pub async fn admin_credit(
    State(state): State<AppState>,
    Json(body): Json<AdminCreditRequest>,
) -> Result<Json<AccountBalance>, ApiError> {
    let balance = state.ledger.admin_credit(
        &body.caller_role,
        &body.target_user_id,
        body.amount_minor_units,
        json!({ "source": "admin_panel", "note": body.note }),
    )?;
    Ok(Json(balance))
}
