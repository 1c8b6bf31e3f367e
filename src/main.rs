//! Contract Submitter CLI
//!
//! Signs and submits contract calls against a JSON-RPC ledger node.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI args + config file + env (SUBMITTER_PRIVATE_KEY, SUBMITTER_RPC_URL)
//!       │
//!       ▼
//!   ┌──────────┐   ┌────────────────────────────────────────────────────┐
//!   │  config  │──▶│              TransactionOrchestrator               │
//!   └──────────┘   │  reader → gas → builder → signer → broadcast → poll │
//!                  └───────────────────────┬────────────────────────────┘
//!                                          │ NodeClient
//!                                          ▼
//!                                   ┌─────────────┐
//!                                   │   RpcNode   │──▶ ledger node(s)
//!                                   └─────────────┘
//! ```

use alloy::primitives::{Address, Bytes, TxHash, U256};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use contract_submitter::blockchain::{ContractCall, PrivateKey, RpcNode, TransactionOrchestrator};
use contract_submitter::config::{load_config, rpc_url_override, SubmitterConfig};
use contract_submitter::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "contract-submitter")]
#[command(about = "Sign, broadcast and confirm contract calls", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the address of SUBMITTER_PRIVATE_KEY
    Address,
    /// Show the balance and next nonce of SUBMITTER_PRIVATE_KEY's account
    Account,
    /// Execute a contract call and wait for its receipt
    Send {
        /// Destination contract address
        #[arg(long)]
        to: Address,
        /// ABI-encoded call data (hex)
        #[arg(long, default_value = "0x")]
        data: Bytes,
        /// Value to transfer in wei
        #[arg(long, default_value = "0")]
        value: U256,
    },
    /// Poll for the receipt of an already broadcast transaction
    Receipt {
        /// Transaction hash
        hash: TxHash,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init(&config.observability);

    if rpc_url_override().is_some() {
        tracing::info!(rpc_url = %config.node.rpc_url, "RPC URL overridden from environment");
    }

    if config.observability.metrics_enabled {
        // Validated at load time.
        let addr: std::net::SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    tracing::info!(
        rpc_url = %config.node.rpc_url,
        chain_id = config.transaction.chain_id,
        gas_price_wei = config.transaction.gas_price_wei,
        max_poll_attempts = config.transaction.max_poll_attempts,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Address => {
            println!("{}", PrivateKey::from_env()?.address()?);
        }
        Commands::Account => {
            let address = PrivateKey::from_env()?.address()?;
            let orchestrator = connect(&config).await?;
            let balance = orchestrator.reader().balance(address).await?;
            let nonce = orchestrator.reader().nonce(address).await?;
            let summary = serde_json::json!({
                "address": address,
                "balance": balance.to_string(),
                "nonce": nonce,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Send { to, data, value } => {
            let key = PrivateKey::from_env()?;
            let orchestrator = connect(&config).await?;
            let call = ContractCall::new(to, data).with_value(value);
            match orchestrator.execute(key, call).await {
                Ok(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
                Err(e) => {
                    if let Some(hash) = e.tx_hash() {
                        eprintln!("Transaction hash: {}", hash);
                    }
                    return Err(e.into());
                }
            }
        }
        Commands::Receipt { hash } => {
            let orchestrator = connect(&config).await?;
            let receipt = orchestrator.await_receipt(hash).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
    }

    Ok(())
}

async fn connect(config: &SubmitterConfig) -> Result<TransactionOrchestrator, Box<dyn std::error::Error>> {
    let node = RpcNode::new(config.node.clone(), config.transaction.chain_id).await?;
    Ok(TransactionOrchestrator::new(Arc::new(node), config))
}
