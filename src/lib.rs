//! Wallet playground backend library.

pub mod backend;
pub mod chain;
pub mod config;
pub mod custody;
pub mod http;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod polling;
pub mod store;
pub mod wallet;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use wallet::WalletService;
