//! Account and transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chain family a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Evm,
    Solana,
}

impl Chain {
    pub fn accounts_key(&self) -> &'static str {
        match self {
            Chain::Evm => "evm_accounts",
            Chain::Solana => "solana_accounts",
        }
    }

    pub fn transactions_key(&self) -> &'static str {
        match self {
            Chain::Evm => "evm_transactions",
            Chain::Solana => "solana_transactions",
        }
    }

    /// Decimals of the native token.
    pub fn decimals(&self) -> u8 {
        match self {
            Chain::Evm => 18,
            Chain::Solana => 9,
        }
    }

    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Evm => "ETH",
            Chain::Solana => "SOL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Regular,
    Smart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub address: String,
    /// Native balance as a decimal string.
    pub balance: String,
    pub network: String,
    /// Only set for EVM accounts.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AccountKind>,
}

impl AccountRecord {
    pub fn new(address: impl Into<String>, network: impl Into<String>, kind: Option<AccountKind>) -> Self {
        Self {
            address: address.into(),
            balance: "0.0".to_string(),
            network: network.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxDirection {
    Send,
    Receive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash (EVM) or signature (Solana).
    pub hash: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub token: String,
    pub timestamp: DateTime<Utc>,
    pub status: TxStatus,
    #[serde(rename = "type")]
    pub direction: TxDirection,
    pub network: String,
}

impl TransactionRecord {
    /// A freshly issued transaction.
    pub fn pending(
        hash: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: impl Into<String>,
        token: impl Into<String>,
        direction: TxDirection,
        network: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            from: from.into(),
            to: to.into(),
            amount: amount.into(),
            token: token.into(),
            timestamp: Utc::now(),
            status: TxStatus::Pending,
            direction,
            network: network.into(),
        }
    }

    /// Move to `success`, optionally correcting the amount. Nothing else
    /// changes, and a second call is a no-op.
    pub fn confirm(&mut self, amount: Option<String>) {
        if self.status == TxStatus::Success {
            return;
        }
        self.status = TxStatus::Success;
        if let Some(amount) = amount {
            self.amount = amount;
        }
    }
}
