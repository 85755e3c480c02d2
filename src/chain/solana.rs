//! Solana JSON-RPC client.
//!
//! Only the two read calls the service needs: `getBalance` and
//! `getSignatureStatuses`.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::chain::types::{ChainError, ChainResult};
use crate::config::SolanaConfig;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// `{ context, value }` wrapper used by most Solana RPC results.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    pub confirmation_status: Option<String>,
    pub err: Option<serde_json::Value>,
}

impl SignatureStatus {
    /// Reached at least `confirmed` commitment.
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self.confirmation_status.as_deref(),
            Some("confirmed") | Some("finalized")
        )
    }
}

/// HTTP-based Solana RPC client.
#[derive(Debug, Clone)]
pub struct SolanaClient {
    http_client: Client,
    rpc_url: String,
    commitment: String,
    timeout_secs: u64,
}

impl SolanaClient {
    pub fn new(config: &SolanaConfig, timeout: Duration) -> ChainResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(Self {
            http_client,
            rpc_url: config.rpc_url.clone(),
            commitment: config.commitment.clone(),
            timeout_secs: timeout.as_secs(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> ChainResult<T> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChainError::Timeout(self.timeout_secs)
                } else {
                    ChainError::Rpc(e.to_string())
                }
            })?;

        let rpc_response: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| ChainError::Rpc(format!("{}: malformed response: {}", method, e)))?;

        if let Some(error) = rpc_response.error {
            if error.message.contains("Invalid param") {
                return Err(ChainError::InvalidAddress(error.message));
            }
            return Err(ChainError::Rpc(format!("{}: {}", error.code, error.message)));
        }

        rpc_response
            .result
            .ok_or_else(|| ChainError::Rpc(format!("{}: empty response", method)))
    }

    /// Balance of `address` in lamports.
    pub async fn get_balance(&self, address: &str) -> ChainResult<u64> {
        let result: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address, { "commitment": self.commitment }]),
            )
            .await?;
        Ok(result.value)
    }

    /// Status of a transaction signature; `None` when the cluster has not
    /// seen it yet.
    pub async fn get_signature_status(&self, signature: &str) -> ChainResult<Option<SignatureStatus>> {
        let result: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature], { "searchTransactionHistory": true }]),
            )
            .await?;
        Ok(result.value.into_iter().next().flatten())
    }
}
