//! Submission orchestration
//!
//! Drives one token creation through its lifecycle: upload metadata,
//! build the plan, sign and send each transaction group. Strictly
//! sequential; each step is awaited before the next begins. State is
//! published through a watch channel so a UI can stay responsive while
//! the wallet holder deliberates.
//!
//! Each group is sent after the previous group's send call returns, not
//! after on-chain confirmation. Correctness rests on instruction ordering
//! within a group; there is no atomicity across groups, and nothing is
//! rolled back on failure. Transactions already sent stay on chain.

use solana_sdk::transaction::Transaction;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::builder::build_token_plan;
use crate::config::explorer_url;
use crate::error::{LaunchpadError, LaunchpadResult};
use crate::metadata::MetadataUploader;
use crate::network::NetworkReader;
use crate::types::{SubmissionState, TokenCreationResult, TokenRequest};
use crate::wallet::WalletAdapter;

pub struct Orchestrator {
    state_tx: watch::Sender<SubmissionState>,
    explorer_cluster: String,
    /// Held for the duration of one submission; a second concurrent
    /// submission is rejected until the current one reaches a terminal
    /// state.
    in_flight: Mutex<()>,
}

impl Orchestrator {
    pub fn new(explorer_cluster: impl Into<String>) -> Self {
        let (state_tx, _) = watch::channel(SubmissionState::Idle);
        Self {
            state_tx,
            explorer_cluster: explorer_cluster.into(),
            in_flight: Mutex::new(()),
        }
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<SubmissionState> {
        self.state_tx.subscribe()
    }

    fn advance(&self, next: SubmissionState) -> LaunchpadResult<()> {
        let current = *self.state_tx.borrow();
        if !current.can_transition_to(next) {
            return Err(LaunchpadError::SubmissionFailed(format!(
                "illegal state transition: {current} -> {next}"
            )));
        }
        self.state_tx.send_replace(next);
        Ok(())
    }

    /// Run one full submission and return the created token's identity.
    ///
    /// On any failure the state moves to Failed and the originating error
    /// is returned unchanged; partial completion (metadata uploaded but
    /// no mint created, or an earlier group landed and a later one lost)
    /// is an accepted outcome.
    pub async fn submit(
        &self,
        request: &TokenRequest,
        uploader: &dyn MetadataUploader,
        wallet: &dyn WalletAdapter,
        network: &dyn NetworkReader,
    ) -> LaunchpadResult<TokenCreationResult> {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            LaunchpadError::SubmissionFailed("a submission is already in progress".to_string())
        })?;
        // Fresh lifecycle for this submission
        self.state_tx.send_replace(SubmissionState::Idle);

        match self.run(request, uploader, wallet, network).await {
            Ok(result) => {
                self.state_tx.send_replace(SubmissionState::Succeeded);
                info!(mint = %result.mint, "token created");
                Ok(result)
            }
            Err(err) => {
                let reached = *self.state_tx.borrow();
                warn!(state = %reached, error = %err, "submission failed");
                self.state_tx.send_replace(SubmissionState::Failed);
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        request: &TokenRequest,
        uploader: &dyn MetadataUploader,
        wallet: &dyn WalletAdapter,
        network: &dyn NetworkReader,
    ) -> LaunchpadResult<TokenCreationResult> {
        let payer = wallet.public_key().ok_or_else(|| {
            LaunchpadError::Validation("connect a wallet before submitting".to_string())
        })?;
        request.validate()?;

        self.advance(SubmissionState::UploadingMetadata)?;
        let metadata_url = uploader
            .upload(
                &request.image,
                &request.name,
                &request.symbol,
                &request.description,
            )
            .await?;
        debug!(%metadata_url, "metadata uploaded");

        self.advance(SubmissionState::BuildingTransaction)?;
        let plan = build_token_plan(request, &metadata_url, payer, network).await?;
        let mint = plan.mint_address();

        self.advance(SubmissionState::AwaitingSignature)?;
        let mut signatures = Vec::with_capacity(plan.groups.len());
        for (index, group) in plan.groups.iter().enumerate() {
            // Block references expire, so each group gets a fresh one
            // immediately before signing.
            let blockhash = network.latest_blockhash().await?;
            let mut transaction =
                Transaction::new_with_payer(&group.instructions, Some(&plan.payer));
            transaction
                .try_partial_sign(&[&plan.mint], blockhash)
                .map_err(|e| LaunchpadError::SigningDeclined(e.to_string()))?;

            let signature = wallet.send_transaction(transaction).await?;
            debug!(group = index, %signature, "transaction group sent");
            signatures.push(signature);
        }
        self.advance(SubmissionState::Confirming)?;

        Ok(TokenCreationResult {
            mint,
            associated_token_account: plan.associated_token_account,
            signatures,
            explorer_url: explorer_url(&mint, &self.explorer_cluster),
        })
    }
}
