//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, tracing, timeout, body limit, metrics)
//!     → evm.rs / solana.rs / status.rs (decode JSON body or query)
//!     → WalletService operation
//!     → JSON response, or error.rs envelope {"error": "..."}
//! ```

pub mod error;
pub mod evm;
pub mod server;
pub mod solana;
pub mod status;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
