//! Wallet capability boundary
//!
//! The core never holds the payer's key directly; it hands each
//! mint-co-signed transaction to a `WalletAdapter` for the holder's
//! signature and submission. An absent public key means "not connected"
//! and must block submission.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::sync::Arc;

use crate::error::{LaunchpadError, LaunchpadResult};

#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Currently connected address, or `None` when no wallet is connected.
    fn public_key(&self) -> Option<Pubkey>;

    /// Sign with the holder's key and send. Returns once the RPC accepts
    /// the transaction; confirmation is not awaited. A holder refusing to
    /// sign surfaces as `SigningDeclined`.
    async fn send_transaction(&self, transaction: Transaction) -> LaunchpadResult<Signature>;
}

/// Wallet backed by a local keypair, the CLI counterpart of a browser
/// wallet extension.
pub struct LocalWallet {
    keypair: Keypair,
    rpc: Arc<RpcClient>,
}

impl LocalWallet {
    pub fn new(keypair: Keypair, rpc: Arc<RpcClient>) -> Self {
        Self { keypair, rpc }
    }
}

#[async_trait]
impl WalletAdapter for LocalWallet {
    fn public_key(&self) -> Option<Pubkey> {
        Some(self.keypair.pubkey())
    }

    async fn send_transaction(&self, mut transaction: Transaction) -> LaunchpadResult<Signature> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| LaunchpadError::SigningDeclined(e.to_string()))?;
        self.rpc
            .send_transaction(&transaction)
            .await
            .map_err(|e| LaunchpadError::SubmissionFailed(e.to_string()))
    }
}
