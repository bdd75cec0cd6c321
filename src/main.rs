//! Command-line surface for the agent wallet.
//!
//! Every command resolves a chain by name, runs one logical operation, and
//! reports either human-readable lines or (with `--json`) a single JSON
//! object carrying `success` plus result fields or an `error` message.
//! Exit code 0 on success, 1 on any reported error.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_wallet::chains::{ChainDescriptor, ChainRegistry, ChainStore, FeeMarket};
use agent_wallet::fees::FeeEstimator;
use agent_wallet::rpc::RpcClient;
use agent_wallet::swap::{QuoteRequest, SwapClient};
use agent_wallet::tx::{format_amount, native_balances, TransferIntent, TransferSender};
use agent_wallet::wallet::Keystore;

#[derive(Parser)]
#[command(name = "agent-wallet")]
#[command(about = "Self-custodied EVM wallet for autonomous agents", long_about = None)]
struct Cli {
    /// Emit a single JSON object instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the agent's account address
    Address,
    /// Show the native balance on one chain, or on all registered chains
    Balance {
        #[arg(long, conflicts_with = "all")]
        chain: Option<String>,
        #[arg(long)]
        all: bool,
    },
    /// Send native funds or an ERC-20 token
    Send {
        #[arg(long)]
        chain: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
        /// Token contract address; omit for the native asset
        #[arg(long)]
        token: Option<String>,
        /// Legacy gas price override in wei (zero for gasless chains)
        #[arg(long)]
        gas_price: Option<u128>,
        /// Skip the interactive confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Manage the chain registry
    Chains {
        #[command(subcommand)]
        command: ChainsCommand,
    },
    /// Fetch a swap quote from the configured aggregator
    Quote {
        #[arg(long)]
        chain: String,
        #[arg(long)]
        sell_token: String,
        #[arg(long)]
        buy_token: String,
        /// Sell amount in the token's base units
        #[arg(long)]
        sell_amount: String,
    },
}

#[derive(Subcommand)]
enum ChainsCommand {
    /// List all known chains
    List,
    /// Add or update a user-defined chain
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        chain_id: u64,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
        /// RPC endpoint URL; repeat the flag for failover endpoints, in order
        #[arg(long = "rpc", required = true)]
        rpc_urls: Vec<String>,
        #[arg(long)]
        explorer: Option<String>,
        /// The chain uses the single-price legacy fee market
        #[arg(long)]
        legacy: bool,
    },
    /// Remove a user-defined chain
    Remove { name: String },
}

type CliResult = Result<Value, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_wallet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli.command, json).await {
        Ok(value) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if json {
                println!("{}", json!({ "success": false, "error": err.to_string() }));
            } else {
                eprintln!("Error: {}", err);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, json: bool) -> CliResult {
    match command {
        Commands::Address => address(json),
        Commands::Balance { chain, all } => balance(chain, all, json).await,
        Commands::Send {
            chain,
            to,
            amount,
            token,
            gas_price,
            yes,
        } => send(chain, to, amount, token, gas_price, yes, json).await,
        Commands::Chains { command } => chains(command, json),
        Commands::Quote {
            chain,
            sell_token,
            buy_token,
            sell_amount,
        } => quote(chain, sell_token, buy_token, sell_amount, json).await,
    }
}

fn load_registry() -> Result<ChainRegistry, Box<dyn std::error::Error>> {
    Ok(ChainRegistry::load(ChainStore::default_location()?)?)
}

fn address(json: bool) -> CliResult {
    let wallet = Keystore::default_location()?.load_or_generate()?;
    let address = wallet.address();
    if !json {
        println!("{}", address);
    }
    Ok(json!({ "success": true, "address": address.to_string() }))
}

async fn balance(chain: Option<String>, all: bool, json: bool) -> CliResult {
    let registry = load_registry()?;
    let wallet = Keystore::default_location()?.load_or_generate()?;
    let address = wallet.address();

    if let Some(name) = chain {
        let descriptor = registry.resolve(&name)?.clone();
        let balance = RpcClient::new(&descriptor)?.balance(address).await?;
        let formatted = format_amount(balance, descriptor.decimals);
        if !json {
            println!("{} {}", formatted, descriptor.symbol);
        }
        return Ok(json!({
            "success": true,
            "address": address.to_string(),
            "chain": descriptor.name,
            "balance": formatted,
            "symbol": descriptor.symbol,
        }));
    }

    if !all {
        return Err("specify --chain <name> or --all".into());
    }

    let chains: Vec<ChainDescriptor> = registry.list().into_iter().cloned().collect();
    let balances = native_balances(chains, address).await;
    if !json {
        for entry in &balances {
            match (&entry.balance, &entry.error) {
                (Some(balance), _) => {
                    println!("{:<12} {} {}", entry.chain, balance, entry.symbol)
                }
                (None, Some(error)) => println!("{:<12} unavailable ({})", entry.chain, error),
                (None, None) => {}
            }
        }
    }
    Ok(json!({
        "success": true,
        "address": address.to_string(),
        "balances": balances,
    }))
}

#[allow(clippy::too_many_arguments)]
async fn send(
    chain: String,
    to: String,
    amount: String,
    token: Option<String>,
    gas_price: Option<u128>,
    yes: bool,
    json: bool,
) -> CliResult {
    let registry = load_registry()?;
    let descriptor = registry.resolve(&chain)?.clone();
    let wallet = Keystore::default_location()?.load_or_generate()?;

    let asset = token.as_deref().map_or_else(
        || descriptor.symbol.clone(),
        |token| format!("token {}", token),
    );
    if !yes {
        let prompt = format!(
            "Send {} {} to {} on {}?",
            amount, asset, to, descriptor.name
        );
        if !confirm(&prompt) {
            return Err("aborted by user".into());
        }
    }

    let intent = TransferIntent { to, amount, token };
    let rpc = RpcClient::new(&descriptor)?;
    let sender = TransferSender::new(descriptor.clone(), rpc, FeeEstimator::default(), wallet);
    let result = sender.send(&intent, gas_price).await?;

    let max_fee = format_amount(result.max_fee_wei, descriptor.decimals);
    let total = format_amount(result.total_native_wei, descriptor.decimals);
    if !json {
        println!("Transaction accepted: {}", result.tx_hash);
        if let Some(url) = &result.explorer_url {
            println!("Explorer: {}", url);
        }
        println!("Sent: {} {}", intent.amount, asset);
        if intent.token.is_none() {
            println!(
                "Worst-case total deduction: {} {} (amount + fee)",
                total, descriptor.symbol
            );
        } else {
            println!(
                "Worst-case fee, paid in {}: {}",
                descriptor.symbol, max_fee
            );
        }
    }

    Ok(json!({
        "success": true,
        "chain": descriptor.name,
        "result": result,
        "max_fee": max_fee,
        "total_native": total,
    }))
}

fn chains(command: ChainsCommand, json: bool) -> CliResult {
    let mut registry = load_registry()?;
    match command {
        ChainsCommand::List => {
            let chains: Vec<&ChainDescriptor> = registry.list();
            if !json {
                for chain in &chains {
                    println!(
                        "{:<12} id={:<10} {:<6} {:?} ({} endpoint{})",
                        chain.name,
                        chain.chain_id,
                        chain.symbol,
                        chain.fee_market,
                        chain.rpc_urls.len(),
                        if chain.rpc_urls.len() == 1 { "" } else { "s" },
                    );
                }
            }
            Ok(json!({ "success": true, "chains": chains }))
        }
        ChainsCommand::Add {
            name,
            chain_id,
            symbol,
            decimals,
            rpc_urls,
            explorer,
            legacy,
        } => {
            let descriptor = ChainDescriptor {
                name: name.clone(),
                chain_id,
                symbol,
                decimals,
                rpc_urls,
                explorer_url: explorer,
                fee_market: if legacy {
                    FeeMarket::Legacy
                } else {
                    FeeMarket::Eip1559
                },
            };
            registry.add(descriptor)?;
            if !json {
                println!("Added chain '{}'", name);
            }
            Ok(json!({ "success": true, "added": name }))
        }
        ChainsCommand::Remove { name } => {
            registry.remove(&name)?;
            if !json {
                println!("Removed chain '{}'", name);
            }
            Ok(json!({ "success": true, "removed": name }))
        }
    }
}

async fn quote(
    chain: String,
    sell_token: String,
    buy_token: String,
    sell_amount: String,
    json: bool,
) -> CliResult {
    let registry = load_registry()?;
    let descriptor = registry.resolve(&chain)?;
    let client = SwapClient::from_env()?;

    let request = QuoteRequest {
        chain_id: descriptor.chain_id,
        sell_token,
        buy_token,
        sell_amount,
    };
    let quote = client.quote(&request).await?;

    if !json {
        println!("Buy amount: {}", quote.buy_amount);
        if let Some(price) = &quote.price {
            println!("Price: {}", price);
        }
        if quote.to.is_some() {
            println!("Route payload available");
        }
    }
    Ok(json!({ "success": true, "chain": descriptor.name, "quote": quote }))
}

fn confirm(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}
