//! SDK configuration

use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    /// Upper bound on each RPC call; the reference workflow had none and
    /// a hanging call stalled the whole submission.
    pub rpc_timeout: Duration,
    /// Cluster query parameter for explorer links (e.g. "devnet")
    pub explorer_cluster: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: CommitmentConfig::confirmed(),
            rpc_timeout: Duration::from_secs(30),
            explorer_cluster: "devnet".to_string(),
        }
    }
}

/// Public explorer link for a created token.
pub fn explorer_url(address: &Pubkey, cluster: &str) -> String {
    format!("https://explorer.solana.com/address/{address}?cluster={cluster}")
}
