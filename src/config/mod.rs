//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed to the backend, ledger and HTTP server at startup
//!
//! environment
//!     → credentials.rs (custody credentials, presence-checked)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Secrets never live in the config file, only in the environment

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::Credentials;
pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, BackendMode, CustodyConfig, EvmConfig, ObservabilityConfig, PollingConfig,
    SimulatedConfig, SolanaConfig, StoreConfig,
};
