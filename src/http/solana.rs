//! Solana endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::error::{ApiError, ApiJson};
use crate::http::evm::{AddressResponse, BalanceResponse};
use crate::http::server::AppState;
use crate::wallet::SolanaFaucetOutcome;

#[derive(Debug, Deserialize)]
pub struct CheckBalanceRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct FaucetRequest {
    pub address: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SendTransactionRequest {
    pub address: String,
    pub to: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct SignatureResponse {
    pub signature: String,
}

#[derive(Debug, Deserialize)]
pub struct WaitForTransactionRequest {
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmedResponse {
    pub confirmed: bool,
}

pub async fn check_balance(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CheckBalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.wallet.solana_balance(&req.address).await?;
    Ok(Json(BalanceResponse { balance }))
}

/// Takes no parameters; any body is ignored.
pub async fn create_account(
    State(state): State<AppState>,
) -> Result<Json<AddressResponse>, ApiError> {
    let address = state.wallet.create_solana_account().await?;
    Ok(Json(AddressResponse { address }))
}

pub async fn request_faucet(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FaucetRequest>,
) -> Result<Json<SolanaFaucetOutcome>, ApiError> {
    let outcome = state
        .wallet
        .request_solana_faucet(&req.address, &req.token)
        .await?;
    Ok(Json(outcome))
}

pub async fn send_transaction(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendTransactionRequest>,
) -> Result<Json<SignatureResponse>, ApiError> {
    let signature = state
        .wallet
        .send_solana_transaction(&req.address, &req.to, &req.amount)
        .await?;
    Ok(Json(SignatureResponse { signature }))
}

pub async fn wait_for_transaction(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<WaitForTransactionRequest>,
) -> Result<Json<ConfirmedResponse>, ApiError> {
    state.wallet.wait_for_solana_transaction(&req.signature).await?;
    Ok(Json(ConfirmedResponse { confirmed: true }))
}
