//! Wallet playground server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http (axum router + tower layers)
//!                  │
//!                  ▼
//!               wallet::WalletService ──▶ ledger ──▶ store (memory | file)
//!                  │          │
//!                  │          └──▶ polling (receipts, signatures, balances)
//!                  ▼
//!               backend (dyn WalletBackend)
//!                  ├── live: custody REST + EVM RPC (alloy) + Solana RPC
//!                  └── simulated: in-process balance book
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use wallet_playground::backend::build_backend;
use wallet_playground::config::{load_config, AppConfig};
use wallet_playground::config::validation::validate_config;
use wallet_playground::ledger::Ledger;
use wallet_playground::observability::{logging, metrics};
use wallet_playground::polling::{PollSettings, Poller};
use wallet_playground::{HttpServer, Shutdown, WalletService};

#[derive(Parser, Debug)]
#[command(name = "wallet-playground", version, about = "EVM and Solana test-network wallet backend")]
struct Args {
    /// Path to a TOML config file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        if let Err(errors) = validate_config(&config) {
            let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(joined.join(", ").into());
        }
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wallet-playground starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_mode = ?config.backend.mode,
        request_timeout_secs = config.timeouts.request_secs,
        poll_max_attempts = config.polling.max_attempts,
        poll_interval_ms = config.polling.interval_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let backend = build_backend(&config)?;
    let ledger = Arc::new(Ledger::open(&config.store).await?);
    let poller = Poller::new(PollSettings::from_config(&config.polling)?);
    let wallet = Arc::new(WalletService::new(backend, ledger, poller));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(&config, wallet);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
