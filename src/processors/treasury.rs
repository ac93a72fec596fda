//! Treasury Forwarding Processors
//!
//! Moves pending fees from custody to the treasury, either on demand or when
//! a collection crosses the asset's distribution threshold, and manages the
//! treasury address itself.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    error::FeeRouterError,
    events::FeeRouterEvent,
    processors::current_timestamp,
    state::{AssetLedger, FeeRouterState, Role},
    utils::{
        access_control::require_role,
        custody::{send_from_custody, validate_destination, validate_vault},
        reentrancy_protection::{acquire_reentrancy_lock, release_reentrancy_lock},
        serialization::serialize_to_account,
        validation::{account_at, validate_address, validate_batch_size, validate_program_account, validate_writable},
    },
};

/// Accounts shared by every forward instruction before the per-asset groups
const FORWARD_PREFIX_ACCOUNTS: usize = 4;
/// Ledger, vault, treasury destination
const FORWARD_GROUP_ACCOUNTS: usize = 3;

/// Zeroes the ledger's pending balance and hands it to the treasury.
///
/// The ledger is updated before custody is released; any failure aborts the
/// whole instruction so the zeroing never outlives a failed transfer.
/// Callers must hold the reentrancy lock and persist `ledger` afterwards.
pub(crate) fn forward_pending<'a>(
    ledger: &mut AssetLedger,
    vault: &AccountInfo<'a>,
    treasury_destination: &AccountInfo<'a>,
    state_account: &AccountInfo<'a>,
    state: &FeeRouterState,
    token_program: &AccountInfo<'a>,
    timestamp: i64,
) -> Result<u64, ProgramError> {
    let amount = ledger.take_pending(timestamp)?;
    let asset = ledger.asset;

    send_from_custody(
        &asset,
        vault,
        treasury_destination,
        state_account,
        state,
        token_program,
        amount,
    )?;

    FeeRouterEvent::FeesForwarded {
        asset,
        amount,
        treasury: state.treasury,
        timestamp,
    }
    .emit()?;

    Ok(amount)
}

/// Processes ForwardToTreasury.
///
/// Fails with `NothingToForward` when the asset has no pending fees.
/// Forwarding stays available while paused.
pub fn process_forward_to_treasury(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    asset: Pubkey,
) -> ProgramResult {
    msg!("🏦 Processing forward to treasury for {}", asset);
    forward_assets(program_id, accounts, &[asset], false)
}

/// Processes BatchForwardToTreasury, skipping assets with nothing pending.
pub fn process_batch_forward_to_treasury(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    assets: Vec<Pubkey>,
) -> ProgramResult {
    msg!("🏦 Processing batch forward to treasury for {} assets", assets.len());
    validate_batch_size(assets.len(), "Batch forward")?;
    forward_assets(program_id, accounts, &assets, true)
}

fn forward_assets(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    assets: &[Pubkey],
    skip_empty: bool,
) -> ProgramResult {
    let required = FORWARD_PREFIX_ACCOUNTS + FORWARD_GROUP_ACCOUNTS * assets.len();
    if accounts.len() < required {
        msg!("❌ Expected {} accounts, got {}", required, accounts.len());
        return Err(ProgramError::NotEnoughAccountKeys);
    }

    let operator = account_at(accounts, 0)?;
    let operator_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let token_program = account_at(accounts, 3)?;

    require_role(operator, operator_role, program_id, Role::Operator)?;
    validate_writable(state_account, "Fee router state")?;
    validate_program_account(token_program, &spl_token::id(), "SPL Token program")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    for (index, asset) in assets.iter().enumerate() {
        let group = &accounts[FORWARD_PREFIX_ACCOUNTS + index * FORWARD_GROUP_ACCOUNTS..];
        let ledger = AssetLedger::load_from_account(&group[0], program_id, asset)?;
        if !skip_empty && ledger.pending_fees == 0 {
            msg!("❌ No pending fees for {}", asset);
            return Err(FeeRouterError::NothingToForward.into());
        }
        if ledger.pending_fees == 0 {
            continue;
        }
        validate_writable(&group[0], "Asset ledger")?;
        validate_writable(&group[1], "Vault")?;
        validate_writable(&group[2], "Treasury destination")?;
        validate_vault(asset, &group[1], state_account, &state, program_id)?;
        validate_destination(asset, &group[2], &state.treasury)?;
    }

    let timestamp = current_timestamp()?;
    acquire_reentrancy_lock(&mut state, state_account)?;

    let mut forwarded_assets = 0usize;
    for (index, asset) in assets.iter().enumerate() {
        let group = &accounts[FORWARD_PREFIX_ACCOUNTS + index * FORWARD_GROUP_ACCOUNTS..];
        let ledger_account = &group[0];

        // Reloaded per asset so a repeated asset sees the earlier forward
        let mut ledger = AssetLedger::load_from_account(ledger_account, program_id, asset)?;
        if ledger.pending_fees == 0 {
            msg!("⏭️ Skipping {}: nothing pending", asset);
            continue;
        }

        let amount = forward_pending(
            &mut ledger,
            &group[1],
            &group[2],
            state_account,
            &state,
            token_program,
            timestamp,
        )?;
        serialize_to_account(&ledger, ledger_account)?;
        forwarded_assets += 1;
        msg!("✅ Forwarded {} of {} to treasury {}", amount, asset, state.treasury);
    }

    release_reentrancy_lock(&mut state, state_account)?;

    msg!("📊 Forward complete: {} of {} assets forwarded", forwarded_assets, assets.len());
    Ok(())
}

/// Processes SetTreasury.
///
/// Pending fees are not moved; they go to the new treasury on the next forward.
pub fn process_set_treasury(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    new_treasury: Pubkey,
) -> ProgramResult {
    msg!("🏦 Processing treasury update");

    let admin = account_at(accounts, 0)?;
    let admin_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;

    require_role(admin, admin_role, program_id, Role::Admin)?;
    validate_address(&new_treasury, "Treasury")?;
    validate_writable(state_account, "Fee router state")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    let old_treasury = state.set_treasury(new_treasury)?;
    serialize_to_account(&state, state_account)?;

    FeeRouterEvent::TreasuryUpdated {
        old_treasury,
        new_treasury,
        timestamp: current_timestamp()?,
    }
    .emit()?;

    msg!("✅ Treasury updated: {} -> {}", old_treasury, new_treasury);
    Ok(())
}
