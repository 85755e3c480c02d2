use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "Command-line client for the wallet playground API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChainArg {
    Evm,
    Solana,
}

impl ChainArg {
    fn as_str(&self) -> &'static str {
        match self {
            ChainArg::Evm => "evm",
            ChainArg::Solana => "solana",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the server has custody credentials
    Env,
    /// Create an EVM account
    EvmCreate {
        /// Create a smart account instead of a regular one
        #[arg(long)]
        smart: bool,
        /// Owner of the smart account
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        network: Option<String>,
    },
    /// Native balance of an EVM account
    EvmBalance {
        address: String,
        #[arg(long, default_value = "base-sepolia")]
        network: String,
    },
    /// Request test ETH and wait until it arrives
    EvmFaucet {
        address: String,
        #[arg(long, default_value = "base-sepolia")]
        network: String,
        #[arg(long, default_value = "eth")]
        token: String,
    },
    /// Send ETH
    EvmSend {
        from: String,
        to: String,
        /// Amount in ETH
        value: String,
        #[arg(long, default_value = "base-sepolia")]
        network: String,
    },
    /// Wait for an EVM transaction receipt
    EvmWait {
        hash: String,
        #[arg(long, default_value = "base-sepolia")]
        network: String,
    },
    /// Create a Solana account
    SolCreate,
    /// Balance of a Solana account
    SolBalance { address: String },
    /// Request test SOL and wait until it arrives
    SolFaucet {
        address: String,
        #[arg(long, default_value = "sol")]
        token: String,
    },
    /// Send SOL
    SolSend {
        from: String,
        to: String,
        /// Amount in SOL
        amount: String,
    },
    /// Wait for a Solana signature to confirm
    SolWait { signature: String },
    /// List recorded accounts
    Accounts {
        #[arg(value_enum)]
        chain: ChainArg,
    },
    /// List recorded transactions, newest first
    Transactions {
        #[arg(value_enum)]
        chain: ChainArg,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let post = |path: &str, body: Value| client.post(format!("{}{}", base, path)).json(&body);
    let get = |path: &str| client.get(format!("{}{}", base, path));

    let request = match cli.command {
        Commands::Env => get("/check-env-variables"),
        Commands::EvmCreate { smart, owner, network } => post(
            "/evm/create-account",
            json!({
                "type": if smart { "smart" } else { "regular" },
                "ownerAddress": owner,
                "network": network,
            }),
        ),
        Commands::EvmBalance { address, network } => post(
            "/evm/check-balance",
            json!({ "address": address, "network": network }),
        ),
        Commands::EvmFaucet { address, network, token } => post(
            "/evm/request-faucet",
            json!({ "address": address, "network": network, "token": token }),
        ),
        Commands::EvmSend { from, to, value, network } => post(
            "/evm/send-transaction",
            json!({ "address": from, "network": network, "to": to, "value": value }),
        ),
        Commands::EvmWait { hash, network } => post(
            "/evm/wait-for-transaction",
            json!({ "network": network, "hash": hash }),
        ),
        Commands::SolCreate => post("/solana/create-account", json!({})),
        Commands::SolBalance { address } => {
            post("/solana/check-balance", json!({ "address": address }))
        }
        Commands::SolFaucet { address, token } => post(
            "/solana/request-faucet",
            json!({ "address": address, "token": token }),
        ),
        Commands::SolSend { from, to, amount } => post(
            "/solana/send-transaction",
            json!({ "address": from, "to": to, "amount": amount }),
        ),
        Commands::SolWait { signature } => post(
            "/solana/wait-for-transaction",
            json!({ "signature": signature }),
        ),
        Commands::Accounts { chain } => get(&format!("/accounts?chain={}", chain.as_str())),
        Commands::Transactions { chain } => get(&format!("/transactions?chain={}", chain.as_str())),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("{}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
