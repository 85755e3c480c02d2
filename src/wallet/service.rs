//! Wallet operations behind the HTTP surface.

use alloy::primitives::U256;
use serde::Serialize;
use std::sync::Arc;

use crate::backend::{BackendError, BackendKind, WalletBackend};
use crate::chain::types::{
    format_lamports, format_wei, parse_ether_amount, parse_evm_address, parse_sol_amount,
    parse_solana_address, parse_tx_hash, SOLANA_NETWORK,
};
use crate::chain::EvmNetwork;
use crate::config::Credentials;
use crate::ledger::{
    AccountKind, AccountRecord, Chain, Ledger, TransactionRecord, TxDirection,
};
use crate::observability::metrics;
use crate::polling::Poller;
use crate::wallet::error::{WalletError, WalletResult};

/// Sender recorded for faucet drips.
pub const FAUCET_SENDER: &str = "Faucet";

pub const SMART_ACCOUNT_OWNER_REQUIRED: &str =
    "Creating a smart account requires a regular account as owner";

const EVM_FAUCET_TOKENS: &[&str] = &["eth"];
const SOLANA_FAUCET_TOKENS: &[&str] = &["sol"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvStatus {
    pub available: bool,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmFaucetOutcome {
    pub transaction_hash: String,
    pub confirmed: bool,
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolanaFaucetOutcome {
    pub confirmed: bool,
    pub balance: String,
    pub signature: String,
}

/// Ties a backend to the ledger and the poller.
pub struct WalletService {
    backend: Arc<dyn WalletBackend>,
    ledger: Arc<Ledger>,
    poller: Poller,
}

impl WalletService {
    pub fn new(backend: Arc<dyn WalletBackend>, ledger: Arc<Ledger>, poller: Poller) -> Self {
        Self {
            backend,
            ledger,
            poller,
        }
    }

    pub fn mode(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Presence of the custody credentials, re-read on every call.
    pub fn env_status(&self) -> EnvStatus {
        let available = Credentials::available();
        EnvStatus {
            available,
            message: if available {
                "Environment variables are configured"
            } else {
                "Environment variables are not configured"
            },
        }
    }

    // ----- EVM -----

    pub async fn evm_balance(&self, address: &str, network: &str) -> WalletResult<String> {
        let network: EvmNetwork = network.parse()?;
        let address = parse_evm_address(address)?;

        let wei = self
            .backend
            .evm_balance(network, address)
            .await
            .map_err(|e| backend_failure("evm_balance", e))?;
        let balance = format_wei(wei);
        self.ledger
            .set_balance(Chain::Evm, &address.to_string(), &balance)
            .await?;
        Ok(balance)
    }

    /// Create a regular account, or a smart account owned by `owner`.
    pub async fn create_evm_account(
        &self,
        kind: AccountKind,
        owner: Option<&str>,
        network: Option<&str>,
    ) -> WalletResult<String> {
        let network: EvmNetwork = match network {
            Some(n) => n.parse()?,
            None => EvmNetwork::BaseSepolia,
        };

        let address = match kind {
            AccountKind::Regular => self
                .backend
                .create_evm_account()
                .await
                .map_err(|e| backend_failure("create_evm_account", e))?,
            AccountKind::Smart => {
                let owner = owner
                    .filter(|o| !o.trim().is_empty())
                    .ok_or_else(|| WalletError::invalid(SMART_ACCOUNT_OWNER_REQUIRED))?;
                let owner = parse_evm_address(owner)?;
                self.backend
                    .create_evm_smart_account(owner)
                    .await
                    .map_err(|e| backend_failure("create_evm_smart_account", e))?
            }
        };

        let address = parse_evm_address(&address)
            .map(|a| a.to_string())
            .unwrap_or(address);
        tracing::info!(address = %address, kind = ?kind, network = %network, "EVM account created");
        self.ledger
            .add_account(
                Chain::Evm,
                AccountRecord::new(address.clone(), network.as_str(), Some(kind)),
            )
            .await?;
        Ok(address)
    }

    /// Request a faucet drip and wait until it is visible on chain.
    pub async fn request_evm_faucet(
        &self,
        address: &str,
        network: &str,
        token: &str,
    ) -> WalletResult<EvmFaucetOutcome> {
        let network: EvmNetwork = network.parse()?;
        let address = parse_evm_address(address)?;
        let token = faucet_token(token, EVM_FAUCET_TOKENS)?;

        let before = self
            .backend
            .evm_balance(network, address)
            .await
            .map_err(|e| backend_failure("evm_balance", e))?;

        let hash = self
            .backend
            .request_evm_faucet(network, address, &token)
            .await
            .map_err(|e| backend_failure("request_evm_faucet", e))?;
        let hash = normalize_hash(&hash);
        tracing::info!(address = %address, network = %network, hash = %hash, "EVM faucet requested");

        self.ledger
            .record_pending(
                Chain::Evm,
                TransactionRecord::pending(
                    hash.clone(),
                    FAUCET_SENDER,
                    address.to_string(),
                    "0",
                    token.to_uppercase(),
                    TxDirection::Receive,
                    network.as_str(),
                ),
            )
            .await?;

        self.wait_for_receipt(network, &hash).await?;

        let backend = &self.backend;
        let balance = self
            .poller
            .wait_for_balance(move || async move {
                backend.evm_balance(network, address).await.map(format_wei)
            })
            .await
            .map_err(|e| {
                tracing::warn!(address = %address, error = %e, "EVM faucet funds not observed");
                WalletError::from(e)
            })?;

        let after = parse_ether_amount(&balance).unwrap_or(U256::ZERO);
        let received = format_wei(after.saturating_sub(before));
        self.ledger
            .mark_success(Chain::Evm, &hash, Some(received))
            .await?;
        self.ledger
            .set_balance(Chain::Evm, &address.to_string(), &balance)
            .await?;

        Ok(EvmFaucetOutcome {
            transaction_hash: hash,
            confirmed: true,
            balance,
        })
    }

    /// Issue a transfer. Returns the hash while the transaction is still
    /// pending.
    pub async fn send_evm_transaction(
        &self,
        from: &str,
        network: &str,
        to: &str,
        value: &str,
    ) -> WalletResult<String> {
        let network: EvmNetwork = network.parse()?;
        let from = parse_evm_address(from)?;
        let to = parse_evm_address(to)?;
        let wei = parse_ether_amount(value)?;

        let hash = self
            .backend
            .send_evm_transaction(network, from, to, wei)
            .await
            .map_err(|e| backend_failure("send_evm_transaction", e))?;
        let hash = normalize_hash(&hash);
        tracing::info!(from = %from, to = %to, value = %value, network = %network, hash = %hash, "EVM transaction sent");

        self.ledger
            .record_pending(
                Chain::Evm,
                TransactionRecord::pending(
                    hash.clone(),
                    from.to_string(),
                    to.to_string(),
                    value.trim(),
                    Chain::Evm.native_symbol(),
                    TxDirection::Send,
                    network.as_str(),
                ),
            )
            .await?;
        self.ledger
            .debit(Chain::Evm, &from.to_string(), value.trim())
            .await?;

        Ok(hash)
    }

    /// Wait for the receipt of `hash` and mark the ledger entry successful.
    pub async fn wait_for_evm_transaction(
        &self,
        network: &str,
        hash: &str,
    ) -> WalletResult<serde_json::Value> {
        let network: EvmNetwork = network.parse()?;
        let hash = parse_tx_hash(hash)?.to_string();

        let receipt = self.wait_for_receipt(network, &hash).await?;
        self.ledger.mark_success(Chain::Evm, &hash, None).await?;
        Ok(receipt)
    }

    async fn wait_for_receipt(
        &self,
        network: EvmNetwork,
        hash: &str,
    ) -> WalletResult<serde_json::Value> {
        let tx_hash = parse_tx_hash(hash)?;
        let backend = &self.backend;
        self.poller
            .wait_until_some("evm_receipt", move || async move {
                backend.evm_receipt(network, tx_hash).await
            })
            .await
            .map_err(|e| {
                tracing::warn!(hash = %hash, network = %network, error = %e, "Receipt wait failed");
                WalletError::from(e)
            })
    }

    // ----- Solana -----

    pub async fn solana_balance(&self, address: &str) -> WalletResult<String> {
        let address = parse_solana_address(address)?;
        let lamports = self
            .backend
            .solana_balance(&address)
            .await
            .map_err(|e| backend_failure("solana_balance", e))?;
        let balance = format_lamports(lamports);
        self.ledger
            .set_balance(Chain::Solana, &address, &balance)
            .await?;
        Ok(balance)
    }

    pub async fn create_solana_account(&self) -> WalletResult<String> {
        let address = self
            .backend
            .create_solana_account()
            .await
            .map_err(|e| backend_failure("create_solana_account", e))?;
        tracing::info!(address = %address, "Solana account created");
        self.ledger
            .add_account(
                Chain::Solana,
                AccountRecord::new(address.clone(), SOLANA_NETWORK, None),
            )
            .await?;
        Ok(address)
    }

    pub async fn request_solana_faucet(
        &self,
        address: &str,
        token: &str,
    ) -> WalletResult<SolanaFaucetOutcome> {
        let address = parse_solana_address(address)?;
        let token = faucet_token(token, SOLANA_FAUCET_TOKENS)?;

        let before = self
            .backend
            .solana_balance(&address)
            .await
            .map_err(|e| backend_failure("solana_balance", e))?;

        let signature = self
            .backend
            .request_solana_faucet(&address, &token)
            .await
            .map_err(|e| backend_failure("request_solana_faucet", e))?;
        tracing::info!(address = %address, signature = %signature, "Solana faucet requested");

        self.ledger
            .record_pending(
                Chain::Solana,
                TransactionRecord::pending(
                    signature.clone(),
                    FAUCET_SENDER,
                    address.clone(),
                    "0",
                    token.to_uppercase(),
                    TxDirection::Receive,
                    SOLANA_NETWORK,
                ),
            )
            .await?;

        self.wait_for_signature(&signature).await?;

        let backend = &self.backend;
        let target = address.as_str();
        let balance = self
            .poller
            .wait_for_balance(move || async move {
                backend.solana_balance(target).await.map(format_lamports)
            })
            .await
            .map_err(|e| {
                tracing::warn!(address = %address, error = %e, "Solana faucet funds not observed");
                WalletError::from(e)
            })?;

        let after = parse_sol_amount(&balance).unwrap_or(0);
        let received = format_lamports(after.saturating_sub(before));
        self.ledger
            .mark_success(Chain::Solana, &signature, Some(received))
            .await?;
        self.ledger
            .set_balance(Chain::Solana, &address, &balance)
            .await?;

        Ok(SolanaFaucetOutcome {
            confirmed: true,
            balance,
            signature,
        })
    }

    pub async fn send_solana_transaction(
        &self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> WalletResult<String> {
        let from = parse_solana_address(from)?;
        let to = parse_solana_address(to)?;
        let lamports = parse_sol_amount(amount)?;

        let signature = self
            .backend
            .send_solana_transaction(&from, &to, lamports)
            .await
            .map_err(|e| backend_failure("send_solana_transaction", e))?;
        tracing::info!(from = %from, to = %to, amount = %amount, signature = %signature, "Solana transaction sent");

        self.ledger
            .record_pending(
                Chain::Solana,
                TransactionRecord::pending(
                    signature.clone(),
                    from.clone(),
                    to,
                    amount.trim(),
                    Chain::Solana.native_symbol(),
                    TxDirection::Send,
                    SOLANA_NETWORK,
                ),
            )
            .await?;
        self.ledger
            .debit(Chain::Solana, &from, amount.trim())
            .await?;

        Ok(signature)
    }

    /// Wait for `signature` to confirm and mark the ledger entry successful.
    pub async fn wait_for_solana_transaction(&self, signature: &str) -> WalletResult<()> {
        let signature = signature.trim();
        if signature.is_empty() {
            return Err(WalletError::invalid("signature is required"));
        }
        self.wait_for_signature(signature).await?;
        self.ledger
            .mark_success(Chain::Solana, signature, None)
            .await?;
        Ok(())
    }

    async fn wait_for_signature(&self, signature: &str) -> WalletResult<()> {
        let backend = &self.backend;
        self.poller
            .wait_until_some("solana_signature", move || async move {
                backend
                    .solana_signature_confirmed(signature)
                    .await
                    .map(|confirmed| confirmed.then_some(()))
            })
            .await
            .map_err(|e| {
                tracing::warn!(signature = %signature, error = %e, "Signature wait failed");
                WalletError::from(e)
            })
    }

    // ----- Ledger -----

    pub async fn accounts(&self, chain: Chain) -> WalletResult<Vec<AccountRecord>> {
        Ok(self.ledger.accounts(chain).await?)
    }

    pub async fn transactions(&self, chain: Chain) -> WalletResult<Vec<TransactionRecord>> {
        Ok(self.ledger.transactions(chain).await?)
    }
}

impl std::fmt::Debug for WalletService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletService")
            .field("mode", &self.backend.kind())
            .field("poller", &self.poller)
            .finish()
    }
}

/// Count and log a failed backend call.
fn backend_failure(op: &'static str, e: BackendError) -> WalletError {
    if e.is_invalid_input() {
        tracing::warn!(op, error = %e, "Backend rejected input");
    } else {
        metrics::record_backend_error(op);
        tracing::error!(op, error = %e, "Backend call failed");
    }
    e.into()
}

fn faucet_token(token: &str, allowed: &[&str]) -> WalletResult<String> {
    let token = token.trim().to_lowercase();
    if allowed.contains(&token.as_str()) {
        Ok(token)
    } else {
        Err(WalletError::invalid(format!(
            "Unsupported faucet token '{}', expected one of: {}",
            token,
            allowed.join(", ")
        )))
    }
}

/// Canonical lowercase form of an EVM hash, so ledger lookups match
/// regardless of the casing a backend returns.
fn normalize_hash(hash: &str) -> String {
    parse_tx_hash(hash)
        .map(|h| h.to_string())
        .unwrap_or_else(|_| hash.to_string())
}
