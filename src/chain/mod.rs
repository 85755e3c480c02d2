//! Public chain RPC access.
//!
//! # Data Flow
//! ```text
//! [evm] RPC URLs per network
//!     → evm.rs (alloy providers, failover, timeouts)
//! [solana] RPC URL
//!     → solana.rs (JSON-RPC over reqwest)
//! types.rs: networks, unit conversions, ChainError
//! ```
//!
//! Read-only: signing and broadcasting belong to the custody service.

pub mod evm;
pub mod solana;
pub mod types;

pub use evm::EvmClient;
pub use solana::{SignatureStatus, SolanaClient};
pub use types::{ChainError, ChainResult, EvmNetwork};
