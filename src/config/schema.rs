//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the wallet playground.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Which wallet backend serves the API.
    pub backend: BackendConfig,

    /// Custody REST service settings (live backend only).
    pub custody: CustodyConfig,

    /// EVM RPC endpoints per test network.
    pub evm: EvmConfig,

    /// Solana RPC settings.
    pub solana: SolanaConfig,

    /// Balance, receipt and signature polling budget.
    pub polling: PollingConfig,

    /// Simulated backend settings.
    pub simulated: SimulatedConfig,

    /// Ledger persistence settings.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must leave room for a full faucet poll.
    pub request_secs: u64,

    /// Timeout of a single chain RPC call in seconds.
    pub rpc_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 120,
            rpc_secs: 10,
        }
    }
}

/// Backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Live when custody credentials are present, simulated otherwise.
    #[default]
    Auto,
    /// Always call the custody service and public RPC endpoints.
    Live,
    /// Always use the in-process fake.
    Simulated,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BackendConfig {
    pub mode: BackendMode,
}

/// Custody REST service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CustodyConfig {
    /// Base URL of the custody API.
    pub api_base_url: String,

    /// HTTP timeout for custody calls in seconds.
    pub timeout_secs: u64,
}

impl Default for CustodyConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.cdp.coinbase.com/platform".to_string(),
            timeout_secs: 30,
        }
    }
}

/// EVM RPC configuration. The first URL of each list is the primary,
/// the rest are failovers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EvmConfig {
    pub base_sepolia_rpc_urls: Vec<String>,
    pub ethereum_sepolia_rpc_urls: Vec<String>,
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self {
            base_sepolia_rpc_urls: vec!["https://sepolia.base.org".to_string()],
            ethereum_sepolia_rpc_urls: vec!["https://ethereum-sepolia-rpc.publicnode.com".to_string()],
        }
    }
}

/// Solana RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SolanaConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Commitment level used for balance queries.
    pub commitment: String,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: "confirmed".to_string(),
        }
    }
}

/// Polling budget shared by the balance, receipt and signature pollers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Maximum number of checks before giving up.
    pub max_attempts: u32,

    /// Delay between checks in milliseconds.
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval_ms: 1000,
        }
    }
}

/// Simulated backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatedConfig {
    /// Amount credited by one EVM faucet drip, in wei.
    pub evm_faucet_wei: u128,

    /// Amount credited by one Solana faucet drip, in lamports.
    pub solana_faucet_lamports: u64,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            evm_faucet_wei: 100_000_000_000_000, // 0.0001 ETH
            solana_faucet_lamports: 1_250_000,   // 0.00125 SOL
        }
    }
}

/// Ledger persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding the ledger. In-memory when unset.
    pub path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format: "pretty" or "compact".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backend.mode, BackendMode::Auto);
        assert_eq!(config.polling.max_attempts, 30);
        assert_eq!(config.polling.interval_ms, 1000);
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            mode = "simulated"

            [polling]
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.mode, BackendMode::Simulated);
        assert_eq!(config.polling.max_attempts, 5);
        // Untouched fields keep their defaults
        assert_eq!(config.polling.interval_ms, 1000);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }
}
