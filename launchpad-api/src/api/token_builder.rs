//! Transaction building for token creation
//!
//! Builds the full instruction plan for a new token, co-signs each
//! transaction with the mint's one-time key, and returns base64
//! transactions ready for the external wallet's signature.

use super::{responses::ErrorResponse, ApiState};
use axum::{extract::State, http::StatusCode, response::Json};
use base64::Engine;
use launchpad_sdk::{build_token_plan, explorer_url, LaunchpadError, TokenRequest};
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, transaction::Transaction};
use std::str::FromStr;
use tracing::{error, info};

/// Request to build a token creation transaction
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTokenRequest {
    /// User's wallet address (fee payer)
    pub wallet: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: u64,
    pub description: String,
    /// URL of the previously uploaded metadata document
    pub metadata_url: String,
    #[serde(default)]
    pub enable_mint_authority: bool,
    #[serde(default)]
    pub enable_freeze_authority: bool,
    #[serde(default)]
    pub enable_update_authority: bool,
    #[serde(default)]
    pub mint_authority: Option<String>,
    #[serde(default)]
    pub freeze_authority: Option<String>,
    #[serde(default)]
    pub update_authority: Option<String>,
}

/// Response with built transactions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTokenResponse {
    /// Base64 encoded transactions, co-signed by the mint key and
    /// awaiting the wallet's signature; submit them in order
    pub transactions: Vec<String>,
    pub mint: String,
    pub associated_token_account: String,
    /// Instructions included, in execution order
    pub instructions_summary: Vec<String>,
    /// Accounts that must sign
    pub signers: Vec<String>,
    pub explorer_url: String,
}

/// Build a token creation transaction
pub async fn build_token_transaction(
    State(state): State<ApiState>,
    Json(params): Json<BuildTokenRequest>,
) -> Result<Json<BuildTokenResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(wallet = %params.wallet, name = %params.name, "build token transaction request");

    let wallet =
        Pubkey::from_str(&params.wallet).map_err(|_| bad_request("Invalid wallet address"))?;

    let request = TokenRequest {
        name: params.name,
        symbol: params.symbol,
        decimals: params.decimals,
        supply: params.supply,
        description: params.description,
        image: Vec::new(),
        enable_mint_authority: params.enable_mint_authority,
        enable_freeze_authority: params.enable_freeze_authority,
        enable_update_authority: params.enable_update_authority,
        mint_authority: params.mint_authority,
        freeze_authority: params.freeze_authority,
        update_authority: params.update_authority,
    };

    let plan = build_token_plan(&request, &params.metadata_url, wallet, state.network.as_ref())
        .await
        .map_err(|e| match e {
            LaunchpadError::Validation(message) => bad_request(message),
            e @ LaunchpadError::InsufficientFunds { .. } => bad_request(e.to_string()),
            other => {
                error!("failed to build token plan: {other}");
                internal("Failed to build transaction")
            }
        })?;

    let mint = plan.mint_address();
    let mut transactions = Vec::with_capacity(plan.groups.len());
    let mut instructions_summary = Vec::with_capacity(plan.instruction_count());
    for group in &plan.groups {
        // Block references expire: fetched here, immediately before the
        // response is handed to the wallet for signature.
        let blockhash = state.network.latest_blockhash().await.map_err(|e| {
            error!("failed to fetch blockhash: {e}");
            internal("Failed to get recent blockhash")
        })?;
        let mut transaction = Transaction::new_with_payer(&group.instructions, Some(&plan.payer));
        transaction
            .try_partial_sign(&[&plan.mint], blockhash)
            .map_err(|e| {
                error!("failed to co-sign with mint key: {e}");
                internal("Failed to build transaction")
            })?;
        let serialized = bincode::serialize(&transaction).map_err(|e| {
            error!("failed to serialize transaction: {e}");
            internal("Failed to serialize transaction")
        })?;
        transactions.push(base64::engine::general_purpose::STANDARD.encode(serialized));
        instructions_summary.extend(group.summary.iter().cloned());
    }

    Ok(Json(BuildTokenResponse {
        transactions,
        mint: mint.to_string(),
        associated_token_account: plan.associated_token_account.to_string(),
        instructions_summary,
        signers: vec![wallet.to_string(), mint.to_string()],
        explorer_url: explorer_url(&mint, &state.explorer_cluster),
    }))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn internal(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
}
