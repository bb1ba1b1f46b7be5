//! Launchpad client CLI.
//!
//! Operator harness around the client core: drives the burner wallet
//! lifecycle and the market data services from the command line. Also
//! the composition root: the store, wallet manager, and services are
//! constructed here and passed down explicitly.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use launchpad_client::chain::Transaction;
use launchpad_client::config::{load_config_or_default, ClientConfig};
use launchpad_client::observability::init_logging;
use launchpad_client::services::{MetadataService, PriceService};
use launchpad_client::wallet::{BurnerWalletManager, FileKeyValueStore};

#[derive(Parser)]
#[command(name = "launchpad-client")]
#[command(about = "Burner wallet and market data client for the token launchpad", long_about = None)]
struct Cli {
    /// Path to the TOML config file (defaults apply if absent).
    #[arg(short, long, default_value = "launchpad.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a burner wallet and print its backup key
    Create,
    /// Show the current wallet and time until expiry
    Status,
    /// Export the wallet's secret key for backup
    Export,
    /// Disconnect and purge the wallet
    Disconnect,
    /// Sign a message with the burner wallet
    Sign {
        /// Message to sign (UTF-8)
        message: String,
    },
    /// Current SOL price in USD
    SolPrice,
    /// Market stats for a token
    Stats {
        /// Token identifier on the market data API
        id: String,
    },
    /// Currently trending tokens
    Trending,
    /// Fetch a token metadata document by URI
    Metadata {
        /// http(s):// or ipfs:// URI
        uri: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config_or_default(&cli.config)?;
    init_logging(&config.observability);

    match cli.command {
        Commands::Create => {
            let manager = wallet_manager(&config);
            let backup = manager.create_wallet()?;
            println!("public key: {}", backup.public_key);
            println!("secret key: {}", bs58::encode(&backup.secret_key).into_string());
            println!(
                "expires in: {}",
                format_duration(manager.time_remaining())
            );
            println!();
            println!("Back up the secret key now; it is not shown again.");
        }
        Commands::Status => {
            let manager = wallet_manager(&config);
            match manager.public_key() {
                Some(public_key) => {
                    println!("public key: {}", public_key);
                    println!(
                        "expires in: {}",
                        format_duration(manager.time_remaining())
                    );
                }
                None => println!("no burner wallet"),
            }
        }
        Commands::Export => {
            let manager = wallet_manager(&config);
            let secret = manager.export_secret_key()?;
            println!("{}", bs58::encode(&secret).into_string());
        }
        Commands::Disconnect => {
            let manager = wallet_manager(&config);
            manager.disconnect();
            println!("wallet purged");
        }
        Commands::Sign { message } => {
            let manager = wallet_manager(&config);
            manager.connect()?;
            let signed = manager.sign_transaction(Transaction::new(message.into_bytes()))?;
            let (signer, signature) = &signed.signatures[0];
            println!("signer:    {}", signer);
            println!("signature: {}", signature);
        }
        Commands::SolPrice => {
            let prices = PriceService::new(&config.market_data)?;
            let price = prices.sol_price_usd().await?;
            println!("SOL: ${:.2}", price);
        }
        Commands::Stats { id } => {
            let prices = PriceService::new(&config.market_data)?;
            let stats = prices.token_stats(&id).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Trending => {
            let prices = PriceService::new(&config.market_data)?;
            for token in prices.trending().await? {
                match token.market_cap_rank {
                    Some(rank) => println!("#{:<4} {} ({})", rank, token.name, token.symbol),
                    None => println!("#---  {} ({})", token.name, token.symbol),
                }
            }
        }
        Commands::Metadata { uri } => {
            let metadata = MetadataService::new(&config.metadata)?;
            let doc = metadata.token_metadata(&uri).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

fn wallet_manager(config: &ClientConfig) -> Arc<BurnerWalletManager> {
    let store = Arc::new(FileKeyValueStore::open(&config.wallet.storage_path));
    BurnerWalletManager::new(store, config.wallet.clone())
}

fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}h {minutes:02}m {seconds:02}s")
}
