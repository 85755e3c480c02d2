//! REST client for the wallet-custody service.
//!
//! The custody service owns every key: it creates accounts, drips faucet
//! funds and signs/broadcasts transfers. This client only shapes requests
//! and maps failures.
//!
//! Requests carry the API key pair as a static bearer value plus the wallet
//! secret in `X-Wallet-Auth`. The hosted custody API expects short-lived
//! signed JWTs instead, so live mode against it needs a token-minting proxy
//! at `custody.api_base_url` that swaps these headers for signed tokens.

use alloy::primitives::U256;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::chain::EvmNetwork;
use crate::config::{Credentials, CustodyConfig};

/// Errors returned by the custody client.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// One or more `CDP_*` environment variables are not set.
    #[error("Custody credentials are not configured")]
    MissingCredentials,

    #[error("Custody request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Malformed custody response: {0}")]
    Malformed(String),
}

pub type CustodyResult<T> = Result<T, CustodyError>;

#[derive(Debug, Deserialize)]
struct AddressResponse {
    address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionHashResponse {
    transaction_hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureResponse {
    transaction_signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_message: Option<String>,
}

#[derive(Debug, Serialize)]
struct SmartAccountRequest<'a> {
    owner: &'a str,
}

#[derive(Debug, Serialize)]
struct EvmFaucetRequest<'a> {
    address: &'a str,
    network: EvmNetwork,
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct EvmSendRequest<'a> {
    network: EvmNetwork,
    to: &'a str,
    /// Decimal wei.
    value: String,
}

#[derive(Debug, Serialize)]
struct SolanaFaucetRequest<'a> {
    address: &'a str,
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct SolanaSendRequest<'a> {
    to: &'a str,
    lamports: u64,
}

/// Custody API client.
#[derive(Clone)]
pub struct CustodyClient {
    http_client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl CustodyClient {
    pub fn new(config: &CustodyConfig, credentials: Option<Credentials>) -> CustodyResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CustodyError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> CustodyResult<T> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(CustodyError::MissingCredentials)?;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Custody request");

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, credentials.bearer())
            .header("X-Wallet-Auth", &credentials.wallet_secret)
            .json(body)
            .send()
            .await
            .map_err(|e| CustodyError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CustodyError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| CustodyError::Malformed(e.to_string()))
    }

    pub async fn create_evm_account(&self) -> CustodyResult<String> {
        let res: AddressResponse = self.post("/v2/evm/accounts", &serde_json::json!({})).await?;
        Ok(res.address)
    }

    pub async fn create_evm_smart_account(&self, owner: &str) -> CustodyResult<String> {
        let res: AddressResponse = self
            .post("/v2/evm/smart-accounts", &SmartAccountRequest { owner })
            .await?;
        Ok(res.address)
    }

    pub async fn request_evm_faucet(
        &self,
        network: EvmNetwork,
        address: &str,
        token: &str,
    ) -> CustodyResult<String> {
        let res: TransactionHashResponse = self
            .post(
                "/v2/evm/faucet",
                &EvmFaucetRequest {
                    address,
                    network,
                    token,
                },
            )
            .await?;
        Ok(res.transaction_hash)
    }

    pub async fn send_evm_transaction(
        &self,
        network: EvmNetwork,
        from: &str,
        to: &str,
        value: U256,
    ) -> CustodyResult<String> {
        let path = format!("/v2/evm/accounts/{}/send/transaction", from);
        let res: TransactionHashResponse = self
            .post(
                &path,
                &EvmSendRequest {
                    network,
                    to,
                    value: value.to_string(),
                },
            )
            .await?;
        Ok(res.transaction_hash)
    }

    pub async fn create_solana_account(&self) -> CustodyResult<String> {
        let res: AddressResponse = self.post("/v2/solana/accounts", &serde_json::json!({})).await?;
        Ok(res.address)
    }

    pub async fn request_solana_faucet(&self, address: &str, token: &str) -> CustodyResult<String> {
        let res: SignatureResponse = self
            .post("/v2/solana/faucet", &SolanaFaucetRequest { address, token })
            .await?;
        Ok(res.transaction_signature)
    }

    pub async fn send_solana_transaction(&self, from: &str, to: &str, lamports: u64) -> CustodyResult<String> {
        let path = format!("/v2/solana/accounts/{}/send/transaction", from);
        let res: SignatureResponse = self
            .post(&path, &SolanaSendRequest { to, lamports })
            .await?;
        Ok(res.transaction_signature)
    }
}

/// Prefer the service's own error message, fall back to the raw body.
fn api_error(status: StatusCode, body: &str) -> CustodyError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Custody service returned {}", status)
            } else {
                body.trim().to_string()
            }
        });
    CustodyError::Api {
        status: status.as_u16(),
        message,
    }
}

impl std::fmt::Debug for CustodyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustodyClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_prefers_error_message() {
        let err = api_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"errorType":"faucet_limit_exceeded","errorMessage":"Faucet limit reached"}"#,
        );
        assert_eq!(err.to_string(), "Faucet limit reached");
        assert!(matches!(err, CustodyError::Api { status: 429, .. }));
    }

    #[test]
    fn test_api_error_falls_back_to_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "upstream down");

        let err = api_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.to_string(), "Custody service returned 502 Bad Gateway");
    }

    #[test]
    fn test_send_request_shape() {
        let body = serde_json::to_value(EvmSendRequest {
            network: EvmNetwork::BaseSepolia,
            to: "0xabc",
            value: U256::from(1_000u64).to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"network": "base-sepolia", "to": "0xabc", "value": "1000"})
        );
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let client = CustodyClient::new(&CustodyConfig::default(), None).unwrap();
        let err = client.create_evm_account().await.unwrap_err();
        assert!(matches!(err, CustodyError::MissingCredentials));
    }
}
