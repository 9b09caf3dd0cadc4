//! Token Launchpad API service
//!
//! Serves the metadata upload relay and the token transaction-build
//! endpoint consumed by wallet-holding clients.

use anyhow::Result;
use clap::Parser;
use launchpad_api::{api, config::ServiceConfig, storage};
use launchpad_sdk::RpcNetworkReader;
use solana_sdk::commitment_config::CommitmentConfig;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "launchpad-api")]
#[command(about = "Token Launchpad API service")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "launchpad.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = if std::path::Path::new(&cli.config).exists() {
        ServiceConfig::from_file(&cli.config)?
    } else {
        warn!("Config file not found, using defaults: {}", cli.config);
        ServiceConfig::default()
    };

    // Override log level if provided
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    // Initialize logging
    init_logging(&config)?;

    info!("Starting Token Launchpad API");
    info!("RPC endpoint: {}", config.solana.rpc_url);
    info!("Storage endpoint: {}/{}", config.storage.base_url, config.storage.cloud_name);

    config.check()?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let uploader = Arc::new(storage::CloudinaryStorage::new(&config.storage)?);
    let commitment = CommitmentConfig::from_str(&config.solana.commitment)
        .unwrap_or_else(|_| CommitmentConfig::confirmed());
    let network = Arc::new(RpcNetworkReader::new(
        &config.solana.rpc_url,
        commitment,
        Duration::from_secs(config.solana.rpc_timeout_secs),
    ));
    let state = api::ApiState::new(uploader, network, config.solana.explorer_cluster.clone());

    info!("Starting API server on {}", config.api.bind_address);
    let api_server = api::start_server(state, &config.api).await?;

    info!("Launchpad API started successfully. Press Ctrl+C to shutdown.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = api_server => {
            info!("API server finished");
        }
    }

    info!("Shutting down Token Launchpad API");
    Ok(())
}

fn init_logging(config: &ServiceConfig) -> Result<()> {
    let log_level = &config.monitoring.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("launchpad_api={log_level},launchpad_sdk={log_level},tower_http=info")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}
