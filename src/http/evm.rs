//! EVM endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::error::{ApiError, ApiJson};
use crate::http::server::AppState;
use crate::ledger::AccountKind;
use crate::wallet::EvmFaucetOutcome;

#[derive(Debug, Deserialize)]
pub struct CheckBalanceRequest {
    pub address: String,
    pub network: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(rename = "type")]
    pub kind: AccountKind,
    #[serde(default)]
    pub owner_address: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct FaucetRequest {
    pub address: String,
    pub network: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SendTransactionRequest {
    pub address: String,
    pub network: String,
    pub to: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHashResponse {
    pub transaction_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct WaitForTransactionRequest {
    pub network: String,
    pub hash: String,
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub receipt: serde_json::Value,
}

pub async fn check_balance(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CheckBalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.wallet.evm_balance(&req.address, &req.network).await?;
    Ok(Json(BalanceResponse { balance }))
}

pub async fn create_account(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateAccountRequest>,
) -> Result<Json<AddressResponse>, ApiError> {
    let address = state
        .wallet
        .create_evm_account(req.kind, req.owner_address.as_deref(), req.network.as_deref())
        .await?;
    Ok(Json(AddressResponse { address }))
}

pub async fn request_faucet(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FaucetRequest>,
) -> Result<Json<EvmFaucetOutcome>, ApiError> {
    let outcome = state
        .wallet
        .request_evm_faucet(&req.address, &req.network, &req.token)
        .await?;
    Ok(Json(outcome))
}

pub async fn send_transaction(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendTransactionRequest>,
) -> Result<Json<TransactionHashResponse>, ApiError> {
    let transaction_hash = state
        .wallet
        .send_evm_transaction(&req.address, &req.network, &req.to, &req.value)
        .await?;
    Ok(Json(TransactionHashResponse { transaction_hash }))
}

pub async fn wait_for_transaction(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<WaitForTransactionRequest>,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let receipt = state
        .wallet
        .wait_for_evm_transaction(&req.network, &req.hash)
        .await?;
    Ok(Json(ReceiptResponse { receipt }))
}
