//! Pool Contribution Audit Command Line Interface
//!
//! Reconstructs per-participant contributions to a pooled balance from an
//! issuance event log and pool balance checkpoints, both supplied as JSON
//! fixture files. No live ledger connectivity: decoding logs from a node is
//! an external concern; this tool starts from the decoded fixtures.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use poolaudit_allocation::{group_events, run_audit, AuditParams, EventSource};
use poolaudit_types::Address;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod fixtures;

use crate::config::AuditConfig;

#[derive(Parser)]
#[command(name = "poolaudit")]
#[command(about = "Pool contribution audit", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (flags and POOLAUDIT_* env vars override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full audit and print the contribution report as JSON
    Run(RunCommand),
    /// List per-block issuance activity without computing allocations
    Blocks(BlocksCommand),
}

#[derive(Args)]
struct RunCommand {
    /// Pool account whose growth is being apportioned
    #[arg(long)]
    pool: Option<String>,
    /// First block of the inclusive scan range
    #[arg(long)]
    from_block: Option<u64>,
    /// Last block of the inclusive scan range
    #[arg(long)]
    to_block: Option<u64>,
    /// Events fixture (JSON array of issuance events)
    #[arg(long)]
    events: Option<PathBuf>,
    /// Balances fixture (JSON map of per-account balance checkpoints)
    #[arg(long)]
    balances: Option<PathBuf>,
}

#[derive(Args)]
struct BlocksCommand {
    /// Events fixture (JSON array of issuance events)
    #[arg(long)]
    events: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AuditConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(cmd) => run(config.with_overrides(
            cmd.pool,
            cmd.from_block,
            cmd.to_block,
            cmd.events,
            cmd.balances,
        )),
        Commands::Blocks(cmd) => {
            blocks(config.with_overrides(None, None, None, cmd.events, None))
        }
    }
}

fn run(config: AuditConfig) -> Result<()> {
    let pool = Address::parse(config.pool()?).context("invalid pool address")?;
    let (from_block, to_block) = config.block_range()?;

    let events = fixtures::load_event_source(config.events_path()?)?;
    let balances = fixtures::load_balance_source(config.balances_path()?)?;

    let report = run_audit(
        &events,
        &balances,
        &AuditParams {
            pool,
            from_block,
            to_block,
        },
    )?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn blocks(config: AuditConfig) -> Result<()> {
    let events = fixtures::load_event_source(config.events_path()?)?;
    let groups = group_events(events.fetch_issuance_events(0, u64::MAX)?);

    for (block_number, group) in &groups {
        println!(
            "block {:>10}  recipients {:>4}  tokens issued {}",
            block_number,
            group.issuances.len(),
            group.token_total()
        );
    }
    println!("{} blocks with issuance activity", groups.len());
    Ok(())
}
