//! Chain-specific types, unit conversions and error definitions.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimals of SOL (1 SOL = 10^9 lamports).
pub const SOL_DECIMALS: u8 = 9;

/// EVM test networks the service can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvmNetwork {
    BaseSepolia,
    EthereumSepolia,
}

impl EvmNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvmNetwork::BaseSepolia => "base-sepolia",
            EvmNetwork::EthereumSepolia => "ethereum-sepolia",
        }
    }

    /// EIP-155 chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            EvmNetwork::BaseSepolia => 84532,
            EvmNetwork::EthereumSepolia => 11155111,
        }
    }
}

impl fmt::Display for EvmNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvmNetwork {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base-sepolia" => Ok(EvmNetwork::BaseSepolia),
            "ethereum-sepolia" | "sepolia" => Ok(EvmNetwork::EthereumSepolia),
            other => Err(ChainError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Network identifier recorded for Solana accounts and transactions.
pub const SOLANA_NETWORK: &str = "solana-devnet";

/// Errors that can occur while talking to a chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// Transaction was reverted or failed on-chain.
    #[error("Transaction failed: {0}")]
    Reverted(String),
}

impl ChainError {
    /// Whether the caller sent something malformed, as opposed to the
    /// chain misbehaving.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ChainError::InvalidAddress(_)
                | ChainError::InvalidAmount(_)
                | ChainError::InvalidHash(_)
                | ChainError::UnknownNetwork(_)
        )
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

pub fn parse_evm_address(value: &str) -> ChainResult<Address> {
    value
        .trim()
        .parse()
        .map_err(|_| ChainError::InvalidAddress(value.to_string()))
}

pub fn parse_tx_hash(value: &str) -> ChainResult<TxHash> {
    value
        .trim()
        .parse()
        .map_err(|_| ChainError::InvalidHash(value.to_string()))
}

/// Validate a base58 Solana public key (32 bytes).
pub fn parse_solana_address(value: &str) -> ChainResult<String> {
    let value = value.trim();
    match bs58::decode(value).into_vec() {
        Ok(bytes) if bytes.len() == 32 => Ok(value.to_string()),
        _ => Err(ChainError::InvalidAddress(value.to_string())),
    }
}

/// Parse an ether-denominated decimal string into wei.
pub fn parse_ether_amount(value: &str) -> ChainResult<U256> {
    reject_negative(value)?;
    let wei = parse_units(value.trim(), "ether")
        .map_err(|e| ChainError::InvalidAmount(format!("{}: {}", value, e)))?
        .get_absolute();
    if wei.is_zero() {
        return Err(ChainError::InvalidAmount(format!("{}: must be positive", value)));
    }
    Ok(wei)
}

/// Parse a SOL-denominated decimal string into lamports.
pub fn parse_sol_amount(value: &str) -> ChainResult<u64> {
    reject_negative(value)?;
    let lamports = parse_units(value.trim(), SOL_DECIMALS)
        .map_err(|e| ChainError::InvalidAmount(format!("{}: {}", value, e)))?
        .get_absolute();
    let lamports: u64 = lamports
        .try_into()
        .map_err(|_| ChainError::InvalidAmount(format!("{}: too large", value)))?;
    if lamports == 0 {
        return Err(ChainError::InvalidAmount(format!("{}: must be positive", value)));
    }
    Ok(lamports)
}

fn reject_negative(value: &str) -> ChainResult<()> {
    if value.trim().starts_with('-') {
        return Err(ChainError::InvalidAmount(format!("{}: must be positive", value)));
    }
    Ok(())
}

/// Render wei as an ether decimal string.
pub fn format_wei(wei: U256) -> String {
    format_units(wei, "ether").unwrap_or_else(|_| wei.to_string())
}

/// Render lamports as a SOL decimal string.
pub fn format_lamports(lamports: u64) -> String {
    format_units(U256::from(lamports), SOL_DECIMALS).unwrap_or_else(|_| lamports.to_string())
}
