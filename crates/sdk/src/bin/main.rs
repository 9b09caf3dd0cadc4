// CLI tool for the Token Launchpad
//
// This binary drives the full token creation workflow from the command
// line with a local keypair wallet, relaying the metadata upload through
// a running launchpad-api instance.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::read_keypair_file;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use launchpad_sdk::{
    HttpUploader, LocalWallet, Orchestrator, RpcNetworkReader, TokenRequest,
};

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Launch Token-2022 tokens with embedded metadata", long_about = None)]
#[command(version)]
struct Cli {
    /// RPC URL to connect to
    #[arg(long, default_value = "https://api.devnet.solana.com")]
    rpc_url: String,

    /// Path to wallet keypair file
    #[arg(long, default_value = "~/.config/solana/id.json")]
    wallet: String,

    /// Cluster name used in explorer links
    #[arg(long, default_value = "devnet")]
    cluster: String,

    /// Per-call RPC timeout in seconds
    #[arg(long, default_value_t = 30)]
    rpc_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload metadata and mint a new token
    CreateToken(CreateTokenCmd),
}

#[derive(Args)]
struct CreateTokenCmd {
    #[arg(long)]
    name: String,

    #[arg(long)]
    symbol: String,

    #[arg(long, default_value_t = 6)]
    decimals: u8,

    /// Initial supply in whole tokens
    #[arg(long)]
    supply: u64,

    #[arg(long)]
    description: String,

    /// Path to the token image (png or jpeg)
    #[arg(long)]
    image: PathBuf,

    /// Upload endpoint of a running launchpad-api instance
    #[arg(long, default_value = "http://127.0.0.1:8080/api/upload")]
    upload_url: String,

    /// Keep the mint authority after creation
    #[arg(long)]
    enable_mint_authority: bool,

    /// Mint authority override (defaults to the wallet)
    #[arg(long)]
    mint_authority: Option<String>,

    /// Keep a freeze authority on the mint
    #[arg(long)]
    enable_freeze_authority: bool,

    /// Freeze authority override (defaults to the wallet)
    #[arg(long)]
    freeze_authority: Option<String>,

    /// Keep the metadata update authority after creation
    #[arg(long)]
    enable_update_authority: bool,

    /// Update authority override (defaults to the wallet)
    #[arg(long)]
    update_authority: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CreateToken(cmd) => {
            create_token(cmd, &cli.rpc_url, &cli.wallet, &cli.cluster, cli.rpc_timeout).await
        }
    }
}

async fn create_token(
    cmd: CreateTokenCmd,
    rpc_url: &str,
    wallet_path: &str,
    cluster: &str,
    rpc_timeout_secs: u64,
) -> Result<()> {
    let keypair = read_keypair_file(expand_home(wallet_path))
        .map_err(|e| anyhow!("failed to read keypair {wallet_path}: {e}"))?;
    let image = std::fs::read(&cmd.image)
        .with_context(|| format!("failed to read image {}", cmd.image.display()))?;

    let request = TokenRequest {
        name: cmd.name,
        symbol: cmd.symbol,
        decimals: cmd.decimals,
        supply: cmd.supply,
        description: cmd.description,
        image,
        enable_mint_authority: cmd.enable_mint_authority,
        enable_freeze_authority: cmd.enable_freeze_authority,
        enable_update_authority: cmd.enable_update_authority,
        mint_authority: cmd.mint_authority,
        freeze_authority: cmd.freeze_authority,
        update_authority: cmd.update_authority,
    };

    let rpc_timeout = Duration::from_secs(rpc_timeout_secs);
    let rpc = Arc::new(RpcClient::new_with_commitment(
        rpc_url.to_string(),
        CommitmentConfig::confirmed(),
    ));
    let wallet = LocalWallet::new(keypair, rpc.clone());
    let network = RpcNetworkReader::from_client(rpc, rpc_timeout);
    let uploader = HttpUploader::new(cmd.upload_url, rpc_timeout)?;
    let orchestrator = Orchestrator::new(cluster);

    let mut state_rx = orchestrator.state();
    let progress = tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = *state_rx.borrow();
            println!("  {state}...");
        }
    });

    let result = orchestrator
        .submit(&request, &uploader, &wallet, &network)
        .await;
    progress.abort();

    let result = result?;
    println!("Token created");
    println!("  mint:          {}", result.mint);
    println!("  token account: {}", result.associated_token_account);
    for signature in &result.signatures {
        println!("  signature:     {signature}");
    }
    println!("  explorer:      {}", result.explorer_url);
    Ok(())
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
