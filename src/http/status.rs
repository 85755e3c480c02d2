//! Environment, health and ledger listing endpoints.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::ledger::{AccountRecord, Chain, TransactionRecord};
use crate::wallet::EnvStatus;

#[derive(Debug, Deserialize)]
pub struct ChainQuery {
    pub chain: Chain,
}

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub accounts: Vec<AccountRecord>,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: BackendKind,
}

/// Never echoes the variable values.
pub async fn check_env_variables(State(state): State<AppState>) -> Json<EnvStatus> {
    Json(state.wallet.env_status())
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mode: state.wallet.mode(),
    })
}

pub async fn accounts(
    State(state): State<AppState>,
    query: Result<Query<ChainQuery>, QueryRejection>,
) -> Result<Json<AccountsResponse>, ApiError> {
    let Query(query) = query?;
    let accounts = state.wallet.accounts(query.chain).await?;
    Ok(Json(AccountsResponse { accounts }))
}

pub async fn transactions(
    State(state): State<AppState>,
    query: Result<Query<ChainQuery>, QueryRejection>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let Query(query) = query?;
    let transactions = state.wallet.transactions(query.chain).await?;
    Ok(Json(TransactionsResponse { transactions }))
}
