//! registrard, the registrar daemon.
//!
//! Wires the queue store, wallet, chain and name-service clients into the
//! orchestrator and serves the control endpoint until shutdown.

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use registrar_chain::{ChainClient, FundingOracle, OracleThresholds};
use registrar_core::Orchestrator;
use registrar_namesvc::NameSvcClient;
use registrar_rpc::{ControlServer, ControlState, ShutdownController};
use registrar_store_lmdb::LmdbQueueStore;
use registrar_utils::{init_logging, LogFormat};
use registrar_wallet::Wallet;

use crate::config::RegistrarConfig;

#[derive(Parser)]
#[command(name = "registrard", about = "Subsidized name-operation registrar daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chain node RPC endpoint.
    #[arg(long, env = "REGISTRAR_CHAIN_URL")]
    chain_url: Option<String>,

    /// Name service endpoint.
    #[arg(long, env = "REGISTRAR_NAMESVC_URL")]
    namesvc_url: Option<String>,

    /// Data directory for the queue store.
    #[arg(long, env = "REGISTRAR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Encrypted keystore holding payment keys.
    #[arg(long, env = "REGISTRAR_KEYSTORE")]
    keystore: Option<PathBuf>,

    /// Control endpoint port.
    #[arg(long, env = "REGISTRAR_CONTROL_PORT")]
    control_port: Option<u16>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "REGISTRAR_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the registrar.
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => Some(
            RegistrarConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
        ),
        None => None,
    };

    let base = file_config.unwrap_or_default();
    let config = RegistrarConfig {
        chain_url: cli.chain_url.unwrap_or(base.chain_url),
        namesvc_url: cli.namesvc_url.unwrap_or(base.namesvc_url),
        data_dir: cli.data_dir.unwrap_or(base.data_dir),
        keystore_path: cli.keystore.or(base.keystore_path),
        control_port: cli.control_port.unwrap_or(base.control_port),
        log_level: cli.log_level,
        ..base
    };

    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);

    match cli.command {
        Command::Run => run(config).await,
    }
}

async fn run(config: RegistrarConfig) -> anyhow::Result<()> {
    info!(
        chain = %config.chain_url,
        namesvc = %config.namesvc_url,
        control_port = config.control_port,
        "starting registrar",
    );

    let queues = Arc::new(
        LmdbQueueStore::open(&config.data_dir.join("queues"))
            .context("opening queue store")?,
    );

    let wallet = match &config.keystore_path {
        Some(path) => {
            let password = std::env::var("REGISTRAR_KEYSTORE_PASSWORD")
                .context("REGISTRAR_KEYSTORE_PASSWORD must be set when a keystore is configured")?;
            Wallet::load(path, &password).context("loading keystore")?
        }
        None => {
            warn!("no keystore configured; only requests carrying a payment key will succeed");
            Wallet::new()
        }
    };

    let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
    let remote_timeout = Duration::from_secs(config.remote_timeout_secs);

    let chain = ChainClient::new(&config.chain_url, connect_timeout, remote_timeout)
        .map_err(|e| anyhow::anyhow!("chain client: {e}"))?;
    let oracle = FundingOracle::new(
        chain.clone(),
        OracleThresholds {
            funding_threshold: config.funding_threshold,
            max_recipient_names: config.max_recipient_names,
        },
    );
    let namesvc = NameSvcClient::new(&config.namesvc_url, connect_timeout, remote_timeout)
        .map_err(|e| anyhow::anyhow!("name service client: {e}"))?;

    let orchestrator = Orchestrator::new(
        Arc::new(chain.clone()),
        Arc::new(chain),
        Arc::new(oracle),
        Arc::new(namesvc),
        Arc::new(wallet),
        queues.clone(),
    );

    let shutdown = ShutdownController::new();
    let state = Arc::new(ControlState::new(orchestrator, queues, shutdown.clone()));
    let server = ControlServer::new(config.control_port, state.clone());

    let signal_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.wait_for_signal().await })
    };

    // Serves until the controller fires, whether from an OS signal or the
    // /shutdown route.
    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("control server: {e}"))?;
    signal_task.abort();

    let stats = state.orchestrator.stats();
    info!(
        accepted = stats.get("accepted"),
        rejected = stats.get("rejected"),
        "registrar exited cleanly",
    );
    Ok(())
}
