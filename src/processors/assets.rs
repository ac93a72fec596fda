//! Asset Registration Processors
//!
//! Token assets must be registered before markets can pay fees in them.
//! Registration creates the asset's ledger PDA and the vault token account
//! (the associated token account of the state PDA).

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_program,
};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token::state::Mint;

use crate::{
    constants::ASSET_LEDGER_SEED_PREFIX,
    error::FeeRouterError,
    events::FeeRouterEvent,
    processors::current_timestamp,
    state::{AssetLedger, FeeRouterState, Role},
    utils::{
        access_control::require_role,
        custody::token_vault_address,
        serialization::{create_pda_account, serialize_to_account},
        validation::{account_at, validate_address, validate_program_account, validate_writable},
    },
};

/// Processes RegisterAsset.
///
/// # Arguments
/// * `program_id` - The program ID
/// * `accounts` - See [`crate::FeeRouterInstruction::RegisterAsset`]
/// * `asset` - Token mint to register
/// * `threshold` - Initial auto-forward threshold (0 disables)
///
/// # Errors
/// * `AlreadyInitialized` - the asset (or the native asset) already has a ledger
/// * `InvalidAccount` - the mint or vault account does not match `asset`
pub fn process_register_asset(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    asset: Pubkey,
    threshold: u64,
) -> ProgramResult {
    msg!("🪙 Processing asset registration for {}", asset);

    let operator = account_at(accounts, 0)?;
    let operator_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let ledger_account = account_at(accounts, 3)?;
    let vault = account_at(accounts, 4)?;
    let mint = account_at(accounts, 5)?;
    let system_program_account = account_at(accounts, 6)?;
    let token_program = account_at(accounts, 7)?;
    let ata_program = account_at(accounts, 8)?;

    require_role(operator, operator_role, program_id, Role::Operator)?;
    validate_address(&asset, "Asset")?;
    validate_writable(state_account, "Fee router state")?;
    validate_writable(ledger_account, "Asset ledger")?;
    validate_writable(vault, "Vault")?;
    validate_program_account(system_program_account, &system_program::id(), "System program")?;
    validate_program_account(token_program, &spl_token::id(), "SPL Token program")?;
    validate_program_account(ata_program, &spl_associated_token_account::id(), "Associated Token program")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    if AssetLedger::load_optional(ledger_account, program_id, &asset)?.is_some() {
        msg!("❌ Asset {} is already registered", asset);
        return Err(FeeRouterError::AlreadyInitialized.into());
    }

    if *mint.key != asset || mint.owner != &spl_token::id() {
        msg!("❌ Mint account {} does not match asset {}", mint.key, asset);
        return Err(FeeRouterError::InvalidAccount.into());
    }
    Mint::unpack(&mint.data.borrow()).map_err(|_| {
        msg!("❌ {} is not an initialized mint", mint.key);
        ProgramError::from(FeeRouterError::InvalidAccount)
    })?;

    let expected_vault = token_vault_address(state_account.key, &asset);
    if *vault.key != expected_vault {
        msg!("❌ Invalid vault. Expected: {}, Got: {}", expected_vault, vault.key);
        return Err(FeeRouterError::InvalidAccount.into());
    }

    let (_, ledger_bump) = AssetLedger::find_address(&asset, program_id);
    create_pda_account(
        operator,
        ledger_account,
        system_program_account,
        program_id,
        AssetLedger::LEN,
        &[ASSET_LEDGER_SEED_PREFIX, asset.as_ref(), &[ledger_bump]],
    )?;

    invoke(
        &create_associated_token_account_idempotent(
            operator.key,
            state_account.key,
            &asset,
            token_program.key,
        ),
        &[
            operator.clone(),
            vault.clone(),
            state_account.clone(),
            mint.clone(),
            system_program_account.clone(),
            token_program.clone(),
            ata_program.clone(),
        ],
    )?;

    let ledger = AssetLedger::new(asset, threshold, ledger_bump);
    serialize_to_account(&ledger, ledger_account)?;

    state.record_asset_registered()?;
    serialize_to_account(&state, state_account)?;

    FeeRouterEvent::AssetRegistered {
        asset,
        threshold,
        timestamp: current_timestamp()?,
    }
    .emit()?;

    msg!("✅ Asset registered: {} (vault {}, threshold {})", asset, vault.key, threshold);
    Ok(())
}

/// Processes SetDistributionThreshold. A threshold of 0 disables auto-forward.
pub fn process_set_distribution_threshold(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    asset: Pubkey,
    threshold: u64,
) -> ProgramResult {
    msg!("🎚️ Processing threshold update for {}", asset);

    let operator = account_at(accounts, 0)?;
    let operator_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let ledger_account = account_at(accounts, 3)?;

    require_role(operator, operator_role, program_id, Role::Operator)?;
    validate_writable(ledger_account, "Asset ledger")?;

    let state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    let mut ledger = AssetLedger::load_from_account(ledger_account, program_id, &asset)?;
    let old_threshold = ledger.set_threshold(threshold);
    serialize_to_account(&ledger, ledger_account)?;

    FeeRouterEvent::ThresholdUpdated {
        asset,
        old_threshold,
        new_threshold: threshold,
        timestamp: current_timestamp()?,
    }
    .emit()?;

    msg!("✅ Threshold for {}: {} -> {}", asset, old_threshold, threshold);
    Ok(())
}
