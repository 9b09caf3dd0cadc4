//! Transaction assembly for token creation
//!
//! Deterministic given its inputs, apart from generating the one-time
//! mint keypair and two allowed read-only queries: the rent-exemption
//! minimum for the computed account size, and whether the associated
//! token account already exists. Blockhashes and signatures are applied
//! at submission time, not here, since blockhashes expire.

use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction};
use spl_pod::optional_keys::OptionalNonZeroPubkey;
use spl_token_2022::{
    extension::{metadata_pointer, ExtensionType},
    instruction::{initialize_mint, mint_to, set_authority, AuthorityType},
    state::Mint,
};
use spl_token_metadata_interface::instruction as metadata_instruction;
use tracing::info;

use crate::authority::{resolve_authority, ResolvedAuthority};
use crate::error::{LaunchpadError, LaunchpadResult};
use crate::metadata::packed_metadata_len;
use crate::network::NetworkReader;
use crate::types::{InstructionGroup, TokenRequest, TransactionPlan};

/// Widen `supply` whole tokens into u64 base units. The multiplication
/// runs in u128 so large supplies cannot silently wrap.
pub fn base_unit_supply(supply: u64, decimals: u8) -> LaunchpadResult<u64> {
    let multiplier = 10u128
        .checked_pow(decimals as u32)
        .ok_or_else(|| LaunchpadError::Validation("decimals out of range".to_string()))?;
    let units = (supply as u128)
        .checked_mul(multiplier)
        .ok_or_else(|| supply_overflow(supply, decimals))?;
    u64::try_from(units).map_err(|_| supply_overflow(supply, decimals))
}

fn supply_overflow(supply: u64, decimals: u8) -> LaunchpadError {
    LaunchpadError::Validation(format!(
        "supply {supply} with {decimals} decimals exceeds the 64-bit token amount range"
    ))
}

/// Build the ordered instruction plan for one token creation.
///
/// Ordering invariants: account creation and mint initialization come
/// before anything referencing the mint; the associated-token-account
/// creation is included only when that account is absent; authority
/// adjustments are the last instructions touching the mint, since they
/// remove the ability to alter it further.
pub async fn build_token_plan(
    request: &TokenRequest,
    metadata_url: &str,
    payer: Pubkey,
    network: &dyn NetworkReader,
) -> LaunchpadResult<TransactionPlan> {
    request.validate()?;

    let mint_authority = resolve_authority(
        request.enable_mint_authority,
        request.mint_authority.as_deref(),
        "mint",
    )?;
    let freeze_authority = resolve_authority(
        request.enable_freeze_authority,
        request.freeze_authority.as_deref(),
        "freeze",
    )?;
    let update_authority = resolve_authority(
        request.enable_update_authority,
        request.update_authority.as_deref(),
        "update",
    )?;

    let mint_keypair = Keypair::new();
    let mint = mint_keypair.pubkey();
    let token_program = spl_token_2022::id();

    // The metadata record's update authority field is always populated at
    // initialization time; when the toggle is off it is revoked through a
    // trailing instruction instead.
    let initial_update_authority = update_authority.as_pubkey(&payer).unwrap_or(payer);

    // Account size: mint with the metadata-pointer extension, plus the
    // packed metadata record appended after initialization.
    let mint_len = ExtensionType::try_calculate_account_len::<Mint>(&[
        ExtensionType::MetadataPointer,
    ])?;
    let metadata_len = packed_metadata_len(
        &mint,
        &request.name,
        &request.symbol,
        metadata_url,
        Some(initial_update_authority),
    )?;

    let required = network
        .minimum_balance_for_rent_exemption(mint_len + metadata_len)
        .await?;
    let available = network.balance(&payer).await?;
    if available < required {
        return Err(LaunchpadError::InsufficientFunds {
            required,
            available,
        });
    }

    let base_units = base_unit_supply(request.supply, request.decimals)?;

    let mut instructions = Vec::with_capacity(8);
    let mut summary = Vec::with_capacity(8);

    instructions.push(system_instruction::create_account(
        &payer,
        &mint,
        required,
        mint_len as u64,
        &token_program,
    ));
    summary.push(format!(
        "Create mint account {mint} ({} bytes, {required} lamports)",
        mint_len
    ));

    // The pointer must be initialized before the mint itself.
    instructions.push(metadata_pointer::instruction::initialize(
        &token_program,
        &mint,
        Some(payer),
        Some(mint),
    )?);
    summary.push("Point mint metadata at the mint account itself".to_string());

    instructions.push(initialize_mint(
        &token_program,
        &mint,
        &payer,
        freeze_authority.as_pubkey(&payer).as_ref(),
        request.decimals,
    )?);
    summary.push(format!("Initialize mint with {} decimals", request.decimals));

    instructions.push(metadata_instruction::initialize(
        &token_program,
        &mint,
        &initial_update_authority,
        &mint,
        &payer,
        request.name.clone(),
        request.symbol.clone(),
        metadata_url.to_string(),
    ));
    summary.push(format!(
        "Initialize metadata \"{}\" ({})",
        request.name, request.symbol
    ));

    let associated_token_account =
        spl_associated_token_account::get_associated_token_address_with_program_id(
            &payer,
            &mint,
            &token_program,
        );
    let ata_exists = network.account_exists(&associated_token_account).await?;
    if !ata_exists {
        instructions.push(
            spl_associated_token_account::instruction::create_associated_token_account(
                &payer,
                &payer,
                &mint,
                &token_program,
            ),
        );
        summary.push(format!(
            "Create associated token account {associated_token_account}"
        ));
    }

    // Minting zero is a valid no-op on chain; the instruction is emitted
    // unconditionally.
    instructions.push(mint_to(
        &token_program,
        &mint,
        &associated_token_account,
        &payer,
        &[],
        base_units,
    )?);
    summary.push(format!(
        "Mint {base_units} base units to {associated_token_account}"
    ));

    // Authority adjustments last: they remove the ability to alter the
    // mint further.
    match mint_authority {
        ResolvedAuthority::None => {
            instructions.push(set_authority(
                &token_program,
                &mint,
                None,
                AuthorityType::MintTokens,
                &payer,
                &[],
            )?);
            summary.push("Revoke mint authority".to_string());
        }
        ResolvedAuthority::Other(new_authority) if new_authority != payer => {
            instructions.push(set_authority(
                &token_program,
                &mint,
                Some(&new_authority),
                AuthorityType::MintTokens,
                &payer,
                &[],
            )?);
            summary.push(format!("Transfer mint authority to {new_authority}"));
        }
        // The payer already holds the mint authority from initialization.
        _ => {}
    }

    if update_authority == ResolvedAuthority::None {
        instructions.push(metadata_instruction::update_authority(
            &token_program,
            &mint,
            &payer,
            OptionalNonZeroPubkey::default(),
        ));
        summary.push("Revoke metadata update authority".to_string());
    }

    info!(
        mint = %mint,
        instructions = instructions.len(),
        ata_exists,
        "built token creation plan"
    );

    Ok(TransactionPlan {
        payer,
        mint: mint_keypair,
        associated_token_account,
        ata_exists,
        groups: vec![InstructionGroup {
            instructions,
            summary,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use solana_sdk::hash::Hash;
    use spl_token_2022::instruction::TokenInstruction;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeNetwork {
        rent: u64,
        balance: u64,
        ata_exists: bool,
        calls: AtomicUsize,
    }

    impl FakeNetwork {
        fn new(rent: u64, balance: u64, ata_exists: bool) -> Self {
            Self {
                rent,
                balance,
                ata_exists,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NetworkReader for FakeNetwork {
        async fn minimum_balance_for_rent_exemption(
            &self,
            _data_len: usize,
        ) -> LaunchpadResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rent)
        }

        async fn balance(&self, _address: &Pubkey) -> LaunchpadResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.balance)
        }

        async fn latest_blockhash(&self) -> LaunchpadResult<Hash> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Hash::new_unique())
        }

        async fn account_exists(&self, _address: &Pubkey) -> LaunchpadResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.ata_exists)
        }
    }

    fn request() -> TokenRequest {
        TokenRequest {
            name: "Coin".to_string(),
            symbol: "CN".to_string(),
            decimals: 6,
            supply: 1000,
            description: "A test token".to_string(),
            image: vec![0x89, b'P', b'N', b'G'],
            ..Default::default()
        }
    }

    fn mint_to_amount(plan: &TransactionPlan) -> u64 {
        let token_program = spl_token_2022::id();
        plan.groups[0]
            .instructions
            .iter()
            .filter(|ix| ix.program_id == token_program)
            .find_map(|ix| match TokenInstruction::unpack(&ix.data) {
                Ok(TokenInstruction::MintTo { amount }) => Some(amount),
                _ => None,
            })
            .expect("plan contains a mint-to instruction")
    }

    #[test]
    fn base_unit_supply_widens_safely() {
        assert_eq!(base_unit_supply(1000, 6).unwrap(), 1_000_000_000);
        assert_eq!(base_unit_supply(7, 0).unwrap(), 7);
        assert_eq!(base_unit_supply(0, 9).unwrap(), 0);
        assert!(base_unit_supply(u64::MAX, 1).is_err());
        assert!(base_unit_supply(19, 18).is_err());
    }

    #[tokio::test]
    async fn reference_scenario_emits_eight_ordered_instructions() {
        // name="Coin", symbol="CN", decimals=6, supply=1000, all
        // authority toggles off: 4 initialization instructions, ATA
        // creation, mint-to of 1000 * 10^6, mint-authority revoke,
        // update-authority revoke.
        let network = FakeNetwork::new(2_000_000, 10_000_000, false);
        let payer = Pubkey::new_unique();
        let plan = build_token_plan(&request(), "https://store/meta.json", payer, &network)
            .await
            .unwrap();

        assert_eq!(plan.groups.len(), 1);
        let instructions = &plan.groups[0].instructions;
        assert_eq!(instructions.len(), 8);

        // Account creation and mint initialization strictly precede any
        // instruction referencing the associated account.
        assert_eq!(instructions[0].program_id, solana_sdk::system_program::id());
        assert_eq!(instructions[1].program_id, spl_token_2022::id());
        assert_eq!(instructions[2].program_id, spl_token_2022::id());
        assert_eq!(instructions[3].program_id, spl_token_2022::id());
        assert_eq!(
            instructions[4].program_id,
            spl_associated_token_account::id()
        );

        assert_eq!(mint_to_amount(&plan), 1_000_000_000);
        assert_eq!(plan.groups[0].summary.len(), 8);
        assert!(!plan.ata_exists);
    }

    #[tokio::test]
    async fn disabled_mint_authority_is_revoked_last_among_token_instructions() {
        let network = FakeNetwork::new(1, 10, false);
        let plan = build_token_plan(
            &request(),
            "https://store/meta.json",
            Pubkey::new_unique(),
            &network,
        )
        .await
        .unwrap();

        let instructions = &plan.groups[0].instructions;
        let revoke_index = instructions
            .iter()
            .position(|ix| {
                matches!(
                    TokenInstruction::unpack(&ix.data),
                    Ok(TokenInstruction::SetAuthority { new_authority, .. })
                        if new_authority.is_none()
                )
            })
            .expect("mint authority revoke present");
        let mint_to_index = instructions
            .iter()
            .position(|ix| {
                matches!(
                    TokenInstruction::unpack(&ix.data),
                    Ok(TokenInstruction::MintTo { .. })
                )
            })
            .unwrap();
        assert!(revoke_index > mint_to_index);
    }

    #[tokio::test]
    async fn enabled_mint_authority_kept_by_payer_emits_no_set_authority() {
        let network = FakeNetwork::new(1, 10, false);
        let mut req = request();
        req.enable_mint_authority = true;
        req.enable_update_authority = true;
        let plan = build_token_plan(
            &req,
            "https://store/meta.json",
            Pubkey::new_unique(),
            &network,
        )
        .await
        .unwrap();
        // 4 init + ATA creation + mint-to; no authority adjustments
        assert_eq!(plan.groups[0].instructions.len(), 6);
    }

    #[tokio::test]
    async fn mint_authority_override_becomes_a_transfer() {
        let network = FakeNetwork::new(1, 10, false);
        let new_authority = Pubkey::new_unique();
        let mut req = request();
        req.enable_mint_authority = true;
        req.mint_authority = Some(new_authority.to_string());
        let plan = build_token_plan(
            &req,
            "https://store/meta.json",
            Pubkey::new_unique(),
            &network,
        )
        .await
        .unwrap();

        let transferred = plan.groups[0].instructions.iter().any(|ix| {
            matches!(
                TokenInstruction::unpack(&ix.data),
                Ok(TokenInstruction::SetAuthority { new_authority: set_to, .. })
                    if set_to == solana_sdk::program_option::COption::Some(new_authority)
            )
        });
        assert!(transferred);
    }

    #[tokio::test]
    async fn invalid_override_fails_before_any_network_call() {
        let network = FakeNetwork::new(1, 10, false);
        let mut req = request();
        req.enable_freeze_authority = true;
        req.freeze_authority = Some("definitely-not-base58!".to_string());
        let err = build_token_plan(
            &req,
            "https://store/meta.json",
            Pubkey::new_unique(),
            &network,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LaunchpadError::Validation(_)));
        assert_eq!(network.call_count(), 0);
    }

    #[tokio::test]
    async fn insufficient_balance_fails_fast() {
        let network = FakeNetwork::new(5_000_000, 4_999_999, false);
        let err = build_token_plan(
            &request(),
            "https://store/meta.json",
            Pubkey::new_unique(),
            &network,
        )
        .await
        .unwrap_err();
        match err {
            LaunchpadError::InsufficientFunds {
                required,
                available,
            } => {
                assert_eq!(required, 5_000_000);
                assert_eq!(available, 4_999_999);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Rent and balance were read, but the existence check never ran.
        assert_eq!(network.call_count(), 2);
    }

    #[tokio::test]
    async fn existing_ata_skips_creation_and_plan_shape_is_stable() {
        let network = FakeNetwork::new(1, 10, true);
        let payer = Pubkey::new_unique();
        let first = build_token_plan(&request(), "https://store/meta.json", payer, &network)
            .await
            .unwrap();
        let second = build_token_plan(&request(), "https://store/meta.json", payer, &network)
            .await
            .unwrap();

        assert!(first.ata_exists);
        assert!(!first.groups[0]
            .instructions
            .iter()
            .any(|ix| ix.program_id == spl_associated_token_account::id()));
        // Same external state, same plan shape
        assert_eq!(
            first.groups[0].instructions.len(),
            second.groups[0].instructions.len()
        );
    }

    #[tokio::test]
    async fn zero_supply_still_emits_mint_to() {
        let network = FakeNetwork::new(1, 10, false);
        let mut req = request();
        req.supply = 0;
        let plan = build_token_plan(
            &req,
            "https://store/meta.json",
            Pubkey::new_unique(),
            &network,
        )
        .await
        .unwrap();
        assert_eq!(mint_to_amount(&plan), 0);
    }
}
