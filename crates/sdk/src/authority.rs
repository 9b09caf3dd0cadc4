//! Authority resolution for the mint, freeze and metadata-update toggles
//!
//! Pure function from {enable flag, override text} to a resolved authority.
//! The form toggles map to on-chain semantics as follows: a disabled
//! authority resolves to none, an enabled one uses the override address
//! when present and well formed, and falls back to the payer otherwise.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::error::{LaunchpadError, LaunchpadResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAuthority {
    /// Capability disabled (or revoked, for authorities that must be set
    /// at initialization time and removed afterward)
    None,
    /// Defaults to the invoking wallet
    Payer,
    Other(Pubkey),
}

impl ResolvedAuthority {
    pub fn as_pubkey(&self, payer: &Pubkey) -> Option<Pubkey> {
        match self {
            ResolvedAuthority::None => None,
            ResolvedAuthority::Payer => Some(*payer),
            ResolvedAuthority::Other(key) => Some(*key),
        }
    }
}

pub fn resolve_authority(
    enabled: bool,
    override_text: Option<&str>,
    field: &str,
) -> LaunchpadResult<ResolvedAuthority> {
    if !enabled {
        return Ok(ResolvedAuthority::None);
    }
    match override_text.map(str::trim) {
        None | Some("") => Ok(ResolvedAuthority::Payer),
        Some(text) => Pubkey::from_str(text)
            .map(ResolvedAuthority::Other)
            .map_err(|_| {
                LaunchpadError::Validation(format!("invalid {field} authority address: {text}"))
            }),
    }
}
