//! Wallet service layer.
//!
//! # Data Flow
//! ```text
//! HTTP handler (validated DTO)
//!     → WalletService operation
//!         → WalletBackend call (create / faucet / send / balance)
//!         → Poller (receipt, signature, balance) for faucet and wait calls
//!         → Ledger update (account added, tx pending → success, balance)
//!     → outcome or WalletError
//! ```
//!
//! # Design Decisions
//! - Faucet requests only return once the drip is confirmed and visible
//! - Sends return immediately; the wait operations complete the ledger entry
//! - The ledger is only touched after the backend accepted the operation

pub mod error;
pub mod service;

pub use error::{WalletError, WalletResult};
pub use service::{EnvStatus, EvmFaucetOutcome, SolanaFaucetOutcome, WalletService};
