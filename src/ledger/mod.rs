//! Server-side ledger of created accounts and issued transactions.
//!
//! Each chain keeps two JSON arrays in the key-value store. Transactions
//! are stored newest first. Every read-modify-write runs under one lock so
//! concurrent requests cannot drop each other's updates.

pub mod records;

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::store::{FileStore, KeyValueStore, MemoryStore, StoreResult};

pub use records::{AccountKind, AccountRecord, Chain, TransactionRecord, TxDirection, TxStatus};

pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// File-backed when `path` is configured, in-memory otherwise.
    pub async fn open(config: &StoreConfig) -> StoreResult<Self> {
        match &config.path {
            Some(path) => Ok(Self::new(Arc::new(FileStore::open(path).await?))),
            None => {
                tracing::info!("Ledger kept in memory; it is lost on restart");
                Ok(Self::in_memory())
            }
        }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(items)?;
        self.store.put(key, raw).await
    }

    pub async fn accounts(&self, chain: Chain) -> StoreResult<Vec<AccountRecord>> {
        self.load(chain.accounts_key()).await
    }

    pub async fn transactions(&self, chain: Chain) -> StoreResult<Vec<TransactionRecord>> {
        self.load(chain.transactions_key()).await
    }

    /// Append an account. An address already on file is left untouched.
    pub async fn add_account(&self, chain: Chain, account: AccountRecord) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut accounts: Vec<AccountRecord> = self.load(chain.accounts_key()).await?;
        if accounts.iter().any(|a| a.address == account.address) {
            return Ok(());
        }
        tracing::debug!(chain = ?chain, address = %account.address, "Ledger account added");
        accounts.push(account);
        self.save(chain.accounts_key(), &accounts).await
    }

    /// Returns false when the address is not on file.
    pub async fn set_balance(&self, chain: Chain, address: &str, balance: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut accounts: Vec<AccountRecord> = self.load(chain.accounts_key()).await?;
        let Some(account) = accounts.iter_mut().find(|a| a.address == address) else {
            return Ok(false);
        };
        account.balance = balance.to_string();
        self.save(chain.accounts_key(), &accounts).await?;
        Ok(true)
    }

    /// Subtract `amount` from the recorded balance, never going below zero.
    pub async fn debit(&self, chain: Chain, address: &str, amount: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut accounts: Vec<AccountRecord> = self.load(chain.accounts_key()).await?;
        let Some(account) = accounts.iter_mut().find(|a| a.address == address) else {
            return Ok(false);
        };
        account.balance = clamped_sub(&account.balance, amount, chain.decimals());
        self.save(chain.accounts_key(), &accounts).await?;
        Ok(true)
    }

    /// Insert a new transaction at the head of the list.
    pub async fn record_pending(&self, chain: Chain, tx: TransactionRecord) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut txs: Vec<TransactionRecord> = self.load(chain.transactions_key()).await?;
        tracing::debug!(chain = ?chain, hash = %tx.hash, "Ledger transaction pending");
        txs.insert(0, tx);
        self.save(chain.transactions_key(), &txs).await
    }

    /// Mark the transaction with `hash` as successful. Returns the updated
    /// record, or `None` when no such transaction is on file.
    pub async fn mark_success(
        &self,
        chain: Chain,
        hash: &str,
        amount: Option<String>,
    ) -> StoreResult<Option<TransactionRecord>> {
        let _guard = self.write_lock.lock().await;
        let mut txs: Vec<TransactionRecord> = self.load(chain.transactions_key()).await?;
        let Some(tx) = txs.iter_mut().find(|t| t.hash == hash) else {
            return Ok(None);
        };
        if tx.status == TxStatus::Success {
            return Ok(Some(tx.clone()));
        }
        tx.confirm(amount);
        let updated = tx.clone();
        self.save(chain.transactions_key(), &txs).await?;
        Ok(Some(updated))
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").finish_non_exhaustive()
    }
}

fn to_base_units(value: &str, decimals: u8) -> U256 {
    parse_units(value, decimals)
        .map(|v| {
            if v.is_negative() {
                U256::ZERO
            } else {
                v.get_absolute()
            }
        })
        .unwrap_or(U256::ZERO)
}

/// Unparseable inputs count as zero.
fn clamped_sub(balance: &str, amount: &str, decimals: u8) -> String {
    let remaining = to_base_units(balance, decimals).saturating_sub(to_base_units(amount, decimals));
    format_units(remaining, decimals).unwrap_or_else(|_| "0".to_string())
}
