//! bribe-keeper CLI - selects and prepares scheduled bribe executions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keeper_chain::{MemoryPlanSource, PlanSource};
use keeper_core::{parse_address, ContractVersion, KeeperConfig, Reason, SelectionMode, UserArgs};
use keeper_execution::{Keeper, PlanSelector, SelectionPolicy};
use keeper_resolvers::{Resolution, ResolverRegistry};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bribe-keeper")]
#[command(about = "Selects the next due bribe plan and builds its execBribe call", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file
    #[arg(long, global = true, env = "BRIBE_KEEPER_CONFIG")]
    config: Option<PathBuf>,

    /// Scheduler contract address
    #[arg(long, global = true, env = "BRIBE_KEEPER_CONTRACT")]
    contract: Option<String>,

    /// Injected user args, e.g. '{"contractAddress":"0x.."}'
    #[arg(long, global = true)]
    user_args: Option<String>,

    /// JSON-RPC endpoint
    #[arg(long, global = true, env = "BRIBE_KEEPER_RPC_URL")]
    rpc_url: Option<String>,

    /// Selection policy (earliest_due, shuffled)
    #[arg(long, global = true, env = "BRIBE_KEEPER_SELECTION")]
    selection: Option<SelectionMode>,

    /// Contract generation (v1, v2)
    #[arg(long, global = true, env = "BRIBE_KEEPER_CONTRACT_VERSION")]
    contract_version: Option<ContractVersion>,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, global = true, env = "BRIBE_KEEPER_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Read plans and chain time from a snapshot file instead of a node
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run once and print the decision
    Run,
    /// List plans with their keys and state
    Plans,
    /// Resolve one gauge to its proposal
    Resolve {
        /// Bribe market address
        #[arg(long)]
        source: String,
        /// Gauge address
        #[arg(long)]
        gauge: String,
    },
}

impl Cli {
    fn load_config(&self) -> Result<KeeperConfig> {
        let mut config = match &self.config {
            Some(path) => KeeperConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => KeeperConfig::default(),
        };

        if let Some(raw) = &self.user_args {
            let value: serde_json::Value = serde_json::from_str(raw).context("parsing --user-args")?;
            let args = UserArgs::from_json(value)?;
            config.contract_address = args.contract_address.or(config.contract_address);
        }
        if let Some(contract) = &self.contract {
            config.contract_address = Some(contract.clone());
        }
        if let Some(url) = &self.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(selection) = self.selection {
            config.selection = selection;
        }
        if let Some(version) = self.contract_version {
            config.contract_version = version;
        }
        if let Some(secs) = self.timeout_secs {
            config.http_timeout_secs = secs;
        }

        Ok(config)
    }
}

fn init_logging() {
    // stdout carries the JSON result only.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    if let Commands::Resolve { source, gauge } = &cli.command {
        config.validate_endpoints()?;
        return resolve(&ResolverRegistry::with_defaults(&config)?, source, gauge).await;
    }

    match &cli.snapshot {
        Some(path) => {
            config.validate_endpoints()?;
            let source = MemoryPlanSource::from_file(path)
                .with_context(|| format!("loading snapshot {}", path.display()))?;
            let keeper = Keeper::new(source, ResolverRegistry::with_defaults(&config)?).with_selector(
                PlanSelector::new(SelectionPolicy::from_mode(config.selection)),
            );
            execute(&keeper, &cli.command).await
        }
        None => {
            let keeper = Keeper::from_config(&config)?;
            execute(&keeper, &cli.command).await
        }
    }
}

async fn execute<S: PlanSource>(keeper: &Keeper<S>, command: &Commands) -> Result<()> {
    match command {
        Commands::Run => {
            let decision = keeper.run().await?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Plans => {
            let (now, statuses) = keeper.inspect().await?;
            info!("{} plans at chain time {}", statuses.len(), now);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "timestamp": now, "plans": statuses }))?
            );
        }
        Commands::Resolve { source, gauge } => resolve(keeper.registry(), source, gauge).await?,
    }
    Ok(())
}

async fn resolve(registry: &ResolverRegistry, source: &str, gauge: &str) -> Result<()> {
    let source = parse_address(source)?;
    let gauge = parse_address(gauge)?;

    let output = match registry.resolve(source, gauge).await? {
        Resolution::Proposal(proposal) => json!({ "proposal": proposal }),
        Resolution::NoProposal => json!({ "proposal": null }),
        Resolution::UnsupportedSource => {
            json!({ "proposal": null, "message": Reason::SourceNotSupported.message() })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
