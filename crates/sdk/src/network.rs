//! Read-only network boundary
//!
//! The planner needs four external reads: rent-exemption minimum for a
//! computed account size, the payer's balance, a fresh blockhash, and
//! whether the associated token account already exists. Everything else
//! the builder does is deterministic.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::{LaunchpadError, LaunchpadResult};

#[async_trait]
pub trait NetworkReader: Send + Sync {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> LaunchpadResult<u64>;
    async fn balance(&self, address: &Pubkey) -> LaunchpadResult<u64>;
    async fn latest_blockhash(&self) -> LaunchpadResult<Hash>;
    async fn account_exists(&self, address: &Pubkey) -> LaunchpadResult<bool>;
}

/// `NetworkReader` over a Solana JSON-RPC endpoint, with a per-call
/// timeout so a hanging node cannot stall a submission indefinitely.
pub struct RpcNetworkReader {
    rpc: Arc<RpcClient>,
    request_timeout: Duration,
}

impl RpcNetworkReader {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig, request_timeout: Duration) -> Self {
        let rpc = Arc::new(RpcClient::new_with_commitment(
            rpc_url.to_string(),
            commitment,
        ));
        Self {
            rpc,
            request_timeout,
        }
    }

    pub fn from_client(rpc: Arc<RpcClient>, request_timeout: Duration) -> Self {
        Self {
            rpc,
            request_timeout,
        }
    }

    fn timed_out(&self) -> LaunchpadError {
        LaunchpadError::Rpc(format!(
            "RPC call timed out after {}s",
            self.request_timeout.as_secs()
        ))
    }
}

#[async_trait]
impl NetworkReader for RpcNetworkReader {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> LaunchpadResult<u64> {
        timeout(
            self.request_timeout,
            self.rpc.get_minimum_balance_for_rent_exemption(data_len),
        )
        .await
        .map_err(|_| self.timed_out())?
        .map_err(Into::into)
    }

    async fn balance(&self, address: &Pubkey) -> LaunchpadResult<u64> {
        timeout(self.request_timeout, self.rpc.get_balance(address))
            .await
            .map_err(|_| self.timed_out())?
            .map_err(Into::into)
    }

    async fn latest_blockhash(&self) -> LaunchpadResult<Hash> {
        timeout(self.request_timeout, self.rpc.get_latest_blockhash())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(Into::into)
    }

    async fn account_exists(&self, address: &Pubkey) -> LaunchpadResult<bool> {
        let response = timeout(
            self.request_timeout,
            self.rpc
                .get_account_with_commitment(address, self.rpc.commitment()),
        )
        .await
        .map_err(|_| self.timed_out())?
        .map_err(LaunchpadError::from)?;
        Ok(response.value.is_some())
    }
}
