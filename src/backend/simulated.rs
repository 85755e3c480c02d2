//! Simulated backend: fabricated accounts and transactions over an
//! in-memory balance book.
//!
//! Faucet drips land immediately, so receipts and signatures of issued
//! transactions are confirmed on first check.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use rand::Rng;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::{BackendError, BackendKind, BackendResult, WalletBackend};
use crate::chain::EvmNetwork;
use crate::config::SimulatedConfig;

/// Receipt data kept for every fabricated EVM transaction.
#[derive(Debug, Clone)]
struct SimulatedReceipt {
    network: EvmNetwork,
    from: Option<Address>,
    to: Address,
    value: U256,
    block_number: u64,
}

#[derive(Debug)]
pub struct SimulatedBackend {
    evm_faucet_wei: U256,
    solana_faucet_lamports: u64,
    evm_balances: DashMap<(EvmNetwork, Address), U256>,
    evm_receipts: DashMap<TxHash, SimulatedReceipt>,
    solana_balances: DashMap<String, u64>,
    solana_signatures: DashSet<String>,
    block_number: AtomicU64,
}

impl SimulatedBackend {
    pub fn new(config: &SimulatedConfig) -> Self {
        Self {
            evm_faucet_wei: U256::from(config.evm_faucet_wei),
            solana_faucet_lamports: config.solana_faucet_lamports,
            evm_balances: DashMap::new(),
            evm_receipts: DashMap::new(),
            solana_balances: DashMap::new(),
            solana_signatures: DashSet::new(),
            block_number: AtomicU64::new(1),
        }
    }

    fn random_evm_address() -> Address {
        Address::from(rand::thread_rng().gen::<[u8; 20]>())
    }

    fn random_tx_hash() -> TxHash {
        TxHash::from(rand::thread_rng().gen::<[u8; 32]>())
    }

    fn random_solana_address() -> String {
        bs58::encode(rand::thread_rng().gen::<[u8; 32]>()).into_string()
    }

    fn random_solana_signature() -> String {
        let mut bytes = [0u8; 64];
        rand::thread_rng().fill(&mut bytes[..]);
        bs58::encode(bytes).into_string()
    }

    fn record_evm_tx(&self, receipt: SimulatedReceipt) -> TxHash {
        let hash = Self::random_tx_hash();
        self.evm_receipts.insert(hash, receipt);
        hash
    }

    fn next_block(&self) -> u64 {
        self.block_number.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl WalletBackend for SimulatedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Simulated
    }

    async fn create_evm_account(&self) -> BackendResult<String> {
        Ok(Self::random_evm_address().to_string())
    }

    async fn create_evm_smart_account(&self, owner: Address) -> BackendResult<String> {
        let address = Self::random_evm_address();
        tracing::debug!(owner = %owner, address = %address, "Simulated smart account");
        Ok(address.to_string())
    }

    async fn evm_balance(&self, network: EvmNetwork, address: Address) -> BackendResult<U256> {
        Ok(self
            .evm_balances
            .get(&(network, address))
            .map(|b| *b)
            .unwrap_or(U256::ZERO))
    }

    async fn request_evm_faucet(
        &self,
        network: EvmNetwork,
        address: Address,
        _token: &str,
    ) -> BackendResult<String> {
        *self.evm_balances.entry((network, address)).or_insert(U256::ZERO) += self.evm_faucet_wei;
        let hash = self.record_evm_tx(SimulatedReceipt {
            network,
            from: None,
            to: address,
            value: self.evm_faucet_wei,
            block_number: self.next_block(),
        });
        Ok(hash.to_string())
    }

    async fn send_evm_transaction(
        &self,
        network: EvmNetwork,
        from: Address,
        to: Address,
        value: U256,
    ) -> BackendResult<String> {
        {
            let mut sender = self.evm_balances.entry((network, from)).or_insert(U256::ZERO);
            *sender = sender.saturating_sub(value);
        }
        *self.evm_balances.entry((network, to)).or_insert(U256::ZERO) += value;

        let hash = self.record_evm_tx(SimulatedReceipt {
            network,
            from: Some(from),
            to,
            value,
            block_number: self.next_block(),
        });
        Ok(hash.to_string())
    }

    async fn evm_receipt(
        &self,
        network: EvmNetwork,
        hash: TxHash,
    ) -> BackendResult<Option<serde_json::Value>> {
        let receipt = self
            .evm_receipts
            .get(&hash)
            .filter(|r| r.network == network)
            .map(|r| r.value().clone())
            .ok_or_else(|| BackendError::UnknownTransaction(hash.to_string()))?;

        Ok(Some(json!({
            "transactionHash": hash.to_string(),
            "status": "success",
            "blockNumber": receipt.block_number,
            "from": receipt.from.map(|a| a.to_string()),
            "to": receipt.to.to_string(),
            "value": receipt.value.to_string(),
            "network": receipt.network,
        })))
    }

    async fn create_solana_account(&self) -> BackendResult<String> {
        Ok(Self::random_solana_address())
    }

    async fn solana_balance(&self, address: &str) -> BackendResult<u64> {
        Ok(self.solana_balances.get(address).map(|b| *b).unwrap_or(0))
    }

    async fn request_solana_faucet(&self, address: &str, _token: &str) -> BackendResult<String> {
        *self.solana_balances.entry(address.to_string()).or_insert(0) += self.solana_faucet_lamports;
        let signature = Self::random_solana_signature();
        self.solana_signatures.insert(signature.clone());
        Ok(signature)
    }

    async fn send_solana_transaction(&self, from: &str, to: &str, lamports: u64) -> BackendResult<String> {
        {
            let mut sender = self.solana_balances.entry(from.to_string()).or_insert(0);
            *sender = sender.saturating_sub(lamports);
        }
        *self.solana_balances.entry(to.to_string()).or_insert(0) += lamports;

        let signature = Self::random_solana_signature();
        self.solana_signatures.insert(signature.clone());
        Ok(signature)
    }

    async fn solana_signature_confirmed(&self, signature: &str) -> BackendResult<bool> {
        if self.solana_signatures.contains(signature) {
            Ok(true)
        } else {
            Err(BackendError::UnknownTransaction(signature.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::{parse_evm_address, parse_solana_address};

    fn backend() -> SimulatedBackend {
        SimulatedBackend::new(&SimulatedConfig::default())
    }

    #[tokio::test]
    async fn test_accounts_are_well_formed() {
        let backend = backend();
        let evm = backend.create_evm_account().await.unwrap();
        assert!(parse_evm_address(&evm).is_ok());
        assert_eq!(evm.len(), 42);

        let sol = backend.create_solana_account().await.unwrap();
        assert!(parse_solana_address(&sol).is_ok());
    }

    #[tokio::test]
    async fn test_evm_faucet_credits_and_confirms() {
        let backend = backend();
        let address = parse_evm_address(&backend.create_evm_account().await.unwrap()).unwrap();
        let network = EvmNetwork::BaseSepolia;

        assert_eq!(backend.evm_balance(network, address).await.unwrap(), U256::ZERO);
        let hash = backend.request_evm_faucet(network, address, "eth").await.unwrap();
        assert_eq!(
            backend.evm_balance(network, address).await.unwrap(),
            U256::from(100_000_000_000_000u64)
        );
        // Other network is a separate book
        assert_eq!(
            backend.evm_balance(EvmNetwork::EthereumSepolia, address).await.unwrap(),
            U256::ZERO
        );

        let receipt = backend
            .evm_receipt(network, hash.parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(receipt["status"], "success");
        assert_eq!(receipt["transactionHash"], hash);
    }

    #[tokio::test]
    async fn test_evm_send_clamps_sender() {
        let backend = backend();
        let network = EvmNetwork::EthereumSepolia;
        let from = SimulatedBackend::random_evm_address();
        let to = SimulatedBackend::random_evm_address();
        backend.request_evm_faucet(network, from, "eth").await.unwrap();

        let value = U256::from(10).pow(U256::from(18));
        backend.send_evm_transaction(network, from, to, value).await.unwrap();
        assert_eq!(backend.evm_balance(network, from).await.unwrap(), U256::ZERO);
        assert_eq!(backend.evm_balance(network, to).await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_unknown_receipt() {
        let backend = backend();
        let err = backend
            .evm_receipt(EvmNetwork::BaseSepolia, TxHash::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::UnknownTransaction(_)));
    }

    #[tokio::test]
    async fn test_solana_flow() {
        let backend = backend();
        let alice = backend.create_solana_account().await.unwrap();
        let bob = backend.create_solana_account().await.unwrap();

        let sig = backend.request_solana_faucet(&alice, "sol").await.unwrap();
        assert!(backend.solana_signature_confirmed(&sig).await.unwrap());
        assert_eq!(backend.solana_balance(&alice).await.unwrap(), 1_250_000);

        let sig = backend.send_solana_transaction(&alice, &bob, 250_000).await.unwrap();
        assert!(backend.solana_signature_confirmed(&sig).await.unwrap());
        assert_eq!(backend.solana_balance(&alice).await.unwrap(), 1_000_000);
        assert_eq!(backend.solana_balance(&bob).await.unwrap(), 250_000);

        assert!(backend.solana_signature_confirmed("nope").await.is_err());
    }
}
