//! Core data model for the token creation workflow

use serde::{Deserialize, Serialize};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::fmt;
use std::str::FromStr;

use crate::error::{LaunchpadError, LaunchpadResult};

/// Token-2022 amounts are u64 base units; more than 18 decimals cannot
/// represent a single whole token.
pub const MAX_DECIMALS: u8 = 18;

/// User-entered parameters for a token creation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: u64,
    pub description: String,
    /// Raw image bytes; consumed by the uploader, never serialized
    #[serde(skip)]
    pub image: Vec<u8>,
    /// Keep the ability to mint further supply after creation
    #[serde(default)]
    pub enable_mint_authority: bool,
    /// Keep the ability to freeze token accounts
    #[serde(default)]
    pub enable_freeze_authority: bool,
    /// Keep the ability to update the metadata record
    #[serde(default)]
    pub enable_update_authority: bool,
    /// Optional authority overrides; empty or absent falls back to the payer
    #[serde(default)]
    pub mint_authority: Option<String>,
    #[serde(default)]
    pub freeze_authority: Option<String>,
    #[serde(default)]
    pub update_authority: Option<String>,
}

impl TokenRequest {
    /// Form-level validation: runs before any network call.
    pub fn validate(&self) -> LaunchpadResult<()> {
        if self.name.trim().is_empty() {
            return Err(LaunchpadError::Validation("name is required".to_string()));
        }
        if self.symbol.trim().is_empty() {
            return Err(LaunchpadError::Validation("symbol is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(LaunchpadError::Validation(
                "description is required".to_string(),
            ));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(LaunchpadError::Validation(format!(
                "decimals cannot exceed {MAX_DECIMALS}"
            )));
        }
        // Override text is validated regardless of the toggles: invalid
        // input is surfaced, never silently ignored.
        for (field, value) in [
            ("mint", &self.mint_authority),
            ("freeze", &self.freeze_authority),
            ("update", &self.update_authority),
        ] {
            if let Some(text) = value.as_deref() {
                let text = text.trim();
                if !text.is_empty() && Pubkey::from_str(text).is_err() {
                    return Err(LaunchpadError::Validation(format!(
                        "invalid {field} authority address: {text}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Off-chain metadata document, uploaded as JSON next to the image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataDocument {
    pub name: String,
    pub symbol: String,
    /// URL of the uploaded image object
    pub image: String,
    pub description: String,
}

/// Lifecycle of one submission; transitions only move forward, except
/// that Failed is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    UploadingMetadata,
    BuildingTransaction,
    AwaitingSignature,
    Confirming,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionState::Succeeded | SubmissionState::Failed)
    }

    pub fn can_transition_to(self, next: SubmissionState) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == SubmissionState::Failed {
            return true;
        }
        next > self
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionState::Idle => "idle",
            SubmissionState::UploadingMetadata => "uploading metadata",
            SubmissionState::BuildingTransaction => "building transaction",
            SubmissionState::AwaitingSignature => "awaiting signature",
            SubmissionState::Confirming => "confirming",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Instructions that must land atomically, with a human-readable summary
/// entry per instruction.
#[derive(Debug)]
pub struct InstructionGroup {
    pub instructions: Vec<Instruction>,
    pub summary: Vec<String>,
}

/// Ordered instruction groups for one token creation, plus the one-time
/// mint keypair that co-signs each group before the payer does.
///
/// The reference workflow fits into a single group; up to three groups,
/// submitted sequentially, are tolerated. There is no atomicity across
/// groups: a later group can fail with earlier groups already on chain.
#[derive(Debug)]
pub struct TransactionPlan {
    pub payer: Pubkey,
    pub mint: Keypair,
    pub associated_token_account: Pubkey,
    /// Whether the associated token account already existed at plan time
    pub ata_exists: bool,
    pub groups: Vec<InstructionGroup>,
}

impl TransactionPlan {
    /// The permanent on-chain identifier of the new token.
    pub fn mint_address(&self) -> Pubkey {
        self.mint.pubkey()
    }

    pub fn instruction_count(&self) -> usize {
        self.groups.iter().map(|g| g.instructions.len()).sum()
    }
}

/// Terminal output of a successful submission
#[derive(Debug, Clone)]
pub struct TokenCreationResult {
    pub mint: Pubkey,
    pub associated_token_account: Pubkey,
    pub signatures: Vec<Signature>,
    pub explorer_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> TokenRequest {
        TokenRequest {
            name: "Coin".to_string(),
            symbol: "CN".to_string(),
            decimals: 6,
            supply: 1000,
            description: "A test token".to_string(),
            image: vec![1, 2, 3],
            ..Default::default()
        }
    }

    #[test]
    fn validate_accepts_well_formed_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let mut request = valid_request();
        request.name = "  ".to_string();
        assert!(matches!(
            request.validate(),
            Err(LaunchpadError::Validation(_))
        ));

        let mut request = valid_request();
        request.symbol = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.description = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_decimals() {
        let mut request = valid_request();
        request.decimals = 19;
        assert!(matches!(
            request.validate(),
            Err(LaunchpadError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_malformed_override_even_when_disabled() {
        let mut request = valid_request();
        request.mint_authority = Some("not-a-pubkey".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn validate_tolerates_empty_override_text() {
        let mut request = valid_request();
        request.freeze_authority = Some("   ".to_string());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn submission_state_moves_forward_only() {
        use SubmissionState::*;
        assert!(Idle.can_transition_to(UploadingMetadata));
        assert!(UploadingMetadata.can_transition_to(BuildingTransaction));
        assert!(Confirming.can_transition_to(Succeeded));
        assert!(!BuildingTransaction.can_transition_to(UploadingMetadata));
        assert!(!Succeeded.can_transition_to(Failed));
    }

    #[test]
    fn failed_is_reachable_from_any_non_terminal_state() {
        use SubmissionState::*;
        for state in [Idle, UploadingMetadata, BuildingTransaction, AwaitingSignature, Confirming]
        {
            assert!(state.can_transition_to(Failed));
        }
        assert!(!Failed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Idle));
    }
}
