//! Wallet backend capability.
//!
//! # Data Flow
//! ```text
//! [backend] mode + CDP_* environment
//!     → build_backend()
//!         live:      custody client + EVM RPC + Solana RPC
//!         simulated: in-process balance book
//!     → Arc<dyn WalletBackend> shared by the service layer
//! ```
//!
//! Every method is a single call. Waiting for confirmations and balances
//! is the service layer's job.

pub mod live;
pub mod simulated;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::chain::{ChainError, EvmClient, EvmNetwork, SolanaClient};
use crate::config::{AppConfig, BackendMode, Credentials};
use crate::custody::{CustodyClient, CustodyError};

pub use live::LiveBackend;
pub use simulated::SimulatedBackend;

/// Errors surfaced by a wallet backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Custody(#[from] CustodyError),

    /// The simulated backend never issued this hash or signature.
    #[error("Unknown transaction: {0}")]
    UnknownTransaction(String),
}

impl BackendError {
    /// Whether the failure was caused by malformed caller input.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            BackendError::Chain(e) => e.is_invalid_input(),
            _ => false,
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Which variant is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Live,
    Simulated,
}

/// Account, faucet, transfer and balance operations for both chain
/// families.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn create_evm_account(&self) -> BackendResult<String>;

    async fn create_evm_smart_account(&self, owner: Address) -> BackendResult<String>;

    /// Native balance in wei.
    async fn evm_balance(&self, network: EvmNetwork, address: Address) -> BackendResult<U256>;

    /// Returns the faucet transaction hash.
    async fn request_evm_faucet(
        &self,
        network: EvmNetwork,
        address: Address,
        token: &str,
    ) -> BackendResult<String>;

    async fn send_evm_transaction(
        &self,
        network: EvmNetwork,
        from: Address,
        to: Address,
        value: U256,
    ) -> BackendResult<String>;

    /// Receipt as JSON once mined, `None` while pending. A reverted
    /// transaction is an error.
    async fn evm_receipt(
        &self,
        network: EvmNetwork,
        hash: TxHash,
    ) -> BackendResult<Option<serde_json::Value>>;

    async fn create_solana_account(&self) -> BackendResult<String>;

    /// Balance in lamports.
    async fn solana_balance(&self, address: &str) -> BackendResult<u64>;

    /// Returns the faucet transaction signature.
    async fn request_solana_faucet(&self, address: &str, token: &str) -> BackendResult<String>;

    async fn send_solana_transaction(&self, from: &str, to: &str, lamports: u64) -> BackendResult<String>;

    /// Whether the signature reached confirmed commitment. A failed
    /// transaction is an error.
    async fn solana_signature_confirmed(&self, signature: &str) -> BackendResult<bool>;
}

/// Resolve `auto` against the environment.
pub fn resolve_mode(mode: BackendMode, credentials_present: bool) -> BackendKind {
    match mode {
        BackendMode::Live => BackendKind::Live,
        BackendMode::Simulated => BackendKind::Simulated,
        BackendMode::Auto if credentials_present => BackendKind::Live,
        BackendMode::Auto => BackendKind::Simulated,
    }
}

/// Build the backend selected by configuration.
pub fn build_backend(config: &AppConfig) -> BackendResult<Arc<dyn WalletBackend>> {
    let credentials = Credentials::from_env();
    let kind = resolve_mode(config.backend.mode, credentials.is_some());

    tracing::info!(
        configured = ?config.backend.mode,
        selected = ?kind,
        credentials = credentials.is_some(),
        "Wallet backend selected"
    );

    match kind {
        BackendKind::Live => {
            if credentials.is_none() {
                tracing::warn!("Live backend without custody credentials; custody calls will fail");
            }
            let rpc_timeout = Duration::from_secs(config.timeouts.rpc_secs);
            let custody = CustodyClient::new(&config.custody, credentials)?;
            let evm = EvmClient::new(&config.evm, rpc_timeout)?;
            let solana = SolanaClient::new(&config.solana, rpc_timeout)?;

            let probe = evm.clone();
            tokio::spawn(async move { probe.verify_chain_ids().await });

            Ok(Arc::new(LiveBackend::new(custody, evm, solana)))
        }
        BackendKind::Simulated => Ok(Arc::new(SimulatedBackend::new(&config.simulated))),
    }
}
