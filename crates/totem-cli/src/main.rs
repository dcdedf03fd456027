//! Totem Client Binary
//!
//! Command-line interface for inspecting totems and care-action eligibility.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ethers::types::{Address, U256};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use totem_chain::fetch::fetch_snapshot;
use totem_chain::{fetch_account, fetch_owned_totems, ConfigStore, EvmLedger, LedgerConfig};
use totem_core::{validate_display_name, ActionKind, GameConfiguration};

mod report;

use report::{render_account, render_configuration, render_status, render_windows, StatusReport, TotemReport};

#[derive(Parser)]
#[command(name = "totem")]
#[command(about = "Totem game client: totems, accounts and care-action eligibility")]
struct Args {
    /// JSON-RPC URL of the chain
    #[arg(long, global = true, env = "TOTEM_RPC_URL", default_value = "http://localhost:8545")]
    rpc_url: String,

    /// Game contract address
    #[arg(long, global = true, env = "TOTEM_GAME_ADDRESS")]
    game_address: Option<String>,

    /// Totem NFT contract address
    #[arg(long, global = true, env = "TOTEM_NFT_ADDRESS")]
    nft_address: Option<String>,

    /// Game token contract address
    #[arg(long, global = true, env = "TOTEM_TOKEN_ADDRESS")]
    token_address: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show game parameters and per-action rules
    Config,
    /// Show the daily time windows
    Windows {
        /// Evaluate at this Unix timestamp instead of now
        #[arg(long)]
        at: Option<u64>,
    },
    /// Show every totem of a wallet with its action status
    Status {
        /// Wallet address
        #[arg(long)]
        owner: Address,

        /// Evaluate at this Unix timestamp instead of now
        #[arg(long)]
        at: Option<u64>,
    },
    /// Show signup status and balances of a wallet
    Account {
        /// Wallet address
        #[arg(long)]
        owner: Address,
    },
    /// Exit successfully only if the action is currently eligible
    Check {
        /// Totem token id (decimal)
        #[arg(long, value_parser = parse_token_id)]
        token_id: U256,

        /// feed, train or treat
        #[arg(long)]
        action: ActionKind,

        /// Evaluate at this Unix timestamp instead of now
        #[arg(long)]
        at: Option<u64>,
    },
    /// Validate a display name without contacting the chain
    ValidateName {
        name: String,
    },
}

impl Args {
    fn ledger_config(&self) -> Result<LedgerConfig> {
        let require = |value: &Option<String>, flag: &str| {
            value
                .clone()
                .with_context(|| format!("--{} (or its environment variable) is required", flag))
        };

        Ok(LedgerConfig {
            rpc_url: self.rpc_url.clone(),
            game_address: require(&self.game_address, "game-address")?,
            nft_address: require(&self.nft_address, "nft-address")?,
            token_address: require(&self.token_address, "token-address")?,
        })
    }

    fn connect(&self) -> Result<EvmLedger> {
        let config = self.ledger_config()?;
        EvmLedger::new(&config).context("Failed to create ledger client")
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match &args.command {
        Commands::Config => {
            let ledger = args.connect()?;
            let config = ConfigStore::load(&ledger)
                .await
                .context("Failed to load game configuration")?;
            output(args.json, &config, render_configuration(&config)?)?;
        }
        Commands::Windows { at } => {
            let ledger = args.connect()?;
            let config = ConfigStore::load(&ledger)
                .await
                .context("Failed to load game configuration")?;
            let now = at.unwrap_or_else(current_time);
            output(args.json, &config.windows, render_windows(&config.windows, now)?)?;
        }
        Commands::Status { owner, at } => {
            let ledger = args.connect()?;
            let now = at.unwrap_or_else(current_time);

            let (config, totems) = tokio::join!(ConfigStore::load(&ledger), fetch_owned_totems(&ledger, *owner));
            let config = loaded_or_fail_closed(config);
            let totems = totems.context("Failed to fetch totems")?;
            info!("Fetched {} totems for {:?}", totems.len(), owner);

            let report = StatusReport::new(totems.values(), config.as_ref(), now);
            output(args.json, &report, render_status(&report)?)?;
        }
        Commands::Account { owner } => {
            let ledger = args.connect()?;
            let account = fetch_account(&ledger, *owner)
                .await
                .context("Failed to fetch account")?;
            output(args.json, &account, render_account(&account)?)?;
        }
        Commands::Check { token_id, action, at } => {
            let ledger = args.connect()?;
            let now = at.unwrap_or_else(current_time);
            let token_id = *token_id;

            let (config, snapshot) = tokio::join!(ConfigStore::load(&ledger), fetch_snapshot(&ledger, token_id));
            let config = loaded_or_fail_closed(config);
            let snapshot = snapshot.with_context(|| format!("Totem {} could not be loaded", token_id))?;

            let report = TotemReport::new(&snapshot, config.as_ref(), now);
            let eligible = report
                .actions
                .get(action)
                .map(|a| a.eligible)
                .unwrap_or(false);
            let status = report
                .actions
                .get(action)
                .map(|a| a.status.clone())
                .unwrap_or_default();

            output(args.json, &report, format!("{} totem #{}: {}\n", action, token_id, status))?;
            if !eligible {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::ValidateName { name } => match validate_display_name(name) {
            Ok(()) => println!("\"{}\" is a valid display name", name),
            Err(e) => {
                println!("\"{}\" is not a valid display name: {}", name, e);
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

/// A failed configuration load leaves every action ineligible
fn loaded_or_fail_closed(result: Result<GameConfiguration, totem_chain::ConfigLoadError>) -> Option<GameConfiguration> {
    match result {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Continuing without game configuration: {}", e);
            None
        }
    }
}

fn output<T: Serialize>(json: bool, value: &T, text: String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn parse_token_id(value: &str) -> Result<U256, String> {
    U256::from_dec_str(value).map_err(|e| format!("invalid token id {:?}: {:?}", value, e))
}

fn current_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
