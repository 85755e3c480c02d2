//! EVM RPC client with per-network failover and timeouts.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoints of each supported test network
//! - Query balances and transaction receipts
//! - Fail over to the next endpoint on error or timeout

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::chain::types::{ChainError, ChainResult, EvmNetwork};
use crate::config::EvmConfig;

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// EVM RPC client wrapper with failover support.
#[derive(Clone)]
pub struct EvmClient {
    /// Providers per network (primary first, then failovers).
    providers: HashMap<EvmNetwork, Vec<DynProvider>>,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl EvmClient {
    /// Create a client for every network listed in `config`.
    ///
    /// Invalid failover URLs are skipped; an invalid primary URL fails.
    pub fn new(config: &EvmConfig, rpc_timeout: Duration) -> ChainResult<Self> {
        let mut providers = HashMap::new();
        providers.insert(
            EvmNetwork::BaseSepolia,
            Self::connect_all(EvmNetwork::BaseSepolia, &config.base_sepolia_rpc_urls)?,
        );
        providers.insert(
            EvmNetwork::EthereumSepolia,
            Self::connect_all(EvmNetwork::EthereumSepolia, &config.ethereum_sepolia_rpc_urls)?,
        );

        Ok(Self {
            providers,
            timeout_duration: rpc_timeout,
        })
    }

    fn connect_all(network: EvmNetwork, urls: &[String]) -> ChainResult<Vec<DynProvider>> {
        let mut list = Vec::new();
        for (i, url_str) in urls.iter().enumerate() {
            match url_str.parse::<url::Url>() {
                Ok(url) => {
                    list.push(Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider);
                }
                Err(e) if i == 0 => {
                    return Err(ChainError::Rpc(format!(
                        "Invalid RPC URL '{}' for {}: {}",
                        url_str, network, e
                    )));
                }
                Err(_) => {
                    tracing::warn!(network = %network, url = %url_str, "Ignoring invalid failover RPC URL");
                }
            }
        }
        if list.is_empty() {
            return Err(ChainError::Rpc(format!("No RPC URL configured for {}", network)));
        }
        Ok(list)
    }

    fn providers(&self, network: EvmNetwork) -> &[DynProvider] {
        self.providers.get(&network).map(Vec::as_slice).unwrap_or_default()
    }

    /// Check that every network's primary endpoint reports the expected
    /// chain id. Mismatches are logged, not fatal.
    pub async fn verify_chain_ids(&self) {
        for network in [EvmNetwork::BaseSepolia, EvmNetwork::EthereumSepolia] {
            match self.get_chain_id(network).await {
                Ok(id) if id == network.chain_id() => {
                    tracing::info!(network = %network, chain_id = id, "EVM RPC reachable");
                }
                Ok(id) => {
                    tracing::warn!(
                        network = %network,
                        expected = network.chain_id(),
                        actual = id,
                        "EVM RPC chain id mismatch"
                    );
                }
                Err(e) => {
                    tracing::warn!(network = %network, error = %e, "EVM RPC unreachable at startup");
                }
            }
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self, network: EvmNetwork) -> ChainResult<u64> {
        for (i, provider) in self.providers(network).iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(network = %network, provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(network = %network, provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(ChainError::Rpc(format!("All {} RPC providers failed", network)))
    }

    /// Get the balance of an address in wei.
    pub async fn get_balance(&self, network: EvmNetwork, address: Address) -> ChainResult<U256> {
        for (i, provider) in self.providers(network).iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_balance(address)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(network = %network, provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(network = %network, provider_idx = i, "RPC timeout"),
            }
        }
        Err(ChainError::Rpc(format!(
            "All {} providers failed to get balance",
            network
        )))
    }

    /// Get a transaction receipt by hash. `None` while still pending.
    pub async fn get_transaction_receipt(
        &self,
        network: EvmNetwork,
        tx_hash: TxHash,
    ) -> ChainResult<Option<TransactionReceipt>> {
        for (i, provider) in self.providers(network).iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_transaction_receipt(tx_hash)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(network = %network, provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(network = %network, provider_idx = i, "RPC timeout"),
            }
        }
        Err(ChainError::Rpc(format!(
            "All {} providers failed to get receipt",
            network
        )))
    }
}

impl std::fmt::Debug for EvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmClient")
            .field("networks", &self.providers.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
