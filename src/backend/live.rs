//! Live backend: custody service for writes, public RPC for reads.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::backend::{BackendKind, BackendResult, WalletBackend};
use crate::chain::{ChainError, EvmClient, EvmNetwork, SolanaClient};
use crate::custody::CustodyClient;

#[derive(Debug, Clone)]
pub struct LiveBackend {
    custody: CustodyClient,
    evm: EvmClient,
    solana: SolanaClient,
}

impl LiveBackend {
    pub fn new(custody: CustodyClient, evm: EvmClient, solana: SolanaClient) -> Self {
        Self {
            custody,
            evm,
            solana,
        }
    }
}

#[async_trait]
impl WalletBackend for LiveBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Live
    }

    async fn create_evm_account(&self) -> BackendResult<String> {
        Ok(self.custody.create_evm_account().await?)
    }

    async fn create_evm_smart_account(&self, owner: Address) -> BackendResult<String> {
        Ok(self.custody.create_evm_smart_account(&owner.to_string()).await?)
    }

    async fn evm_balance(&self, network: EvmNetwork, address: Address) -> BackendResult<U256> {
        Ok(self.evm.get_balance(network, address).await?)
    }

    async fn request_evm_faucet(
        &self,
        network: EvmNetwork,
        address: Address,
        token: &str,
    ) -> BackendResult<String> {
        Ok(self
            .custody
            .request_evm_faucet(network, &address.to_string(), token)
            .await?)
    }

    async fn send_evm_transaction(
        &self,
        network: EvmNetwork,
        from: Address,
        to: Address,
        value: U256,
    ) -> BackendResult<String> {
        Ok(self
            .custody
            .send_evm_transaction(network, &from.to_string(), &to.to_string(), value)
            .await?)
    }

    async fn evm_receipt(
        &self,
        network: EvmNetwork,
        hash: TxHash,
    ) -> BackendResult<Option<serde_json::Value>> {
        let Some(receipt) = self.evm.get_transaction_receipt(network, hash).await? else {
            return Ok(None);
        };

        if !receipt.status() {
            return Err(ChainError::Reverted(hash.to_string()).into());
        }

        let value = serde_json::to_value(&receipt)
            .map_err(|e| ChainError::Rpc(format!("Unserializable receipt: {}", e)))?;
        Ok(Some(value))
    }

    async fn create_solana_account(&self) -> BackendResult<String> {
        Ok(self.custody.create_solana_account().await?)
    }

    async fn solana_balance(&self, address: &str) -> BackendResult<u64> {
        Ok(self.solana.get_balance(address).await?)
    }

    async fn request_solana_faucet(&self, address: &str, token: &str) -> BackendResult<String> {
        Ok(self.custody.request_solana_faucet(address, token).await?)
    }

    async fn send_solana_transaction(&self, from: &str, to: &str, lamports: u64) -> BackendResult<String> {
        Ok(self.custody.send_solana_transaction(from, to, lamports).await?)
    }

    async fn solana_signature_confirmed(&self, signature: &str) -> BackendResult<bool> {
        match self.solana.get_signature_status(signature).await? {
            None => Ok(false),
            Some(status) if status.err.is_some() => {
                Err(ChainError::Reverted(signature.to_string()).into())
            }
            Some(status) => Ok(status.is_confirmed()),
        }
    }
}
