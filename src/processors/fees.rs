//! Fee Collection Processors
//!
//! Authorized markets pay fees into custody here. Each credited pair is
//! checked against the asset's distribution threshold and forwarded to the
//! treasury in the same instruction once the threshold is reached.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{
    error::FeeRouterError,
    events::FeeRouterEvent,
    processors::{current_timestamp, treasury::forward_pending},
    state::{AssetLedger, FeeRouterState, Role},
    utils::{
        access_control::require_role,
        custody::{is_native, pull_into_custody, validate_destination, validate_vault},
        reentrancy_protection::{acquire_reentrancy_lock, release_reentrancy_lock},
        serialization::serialize_to_account,
        validation::{
            account_at, validate_batch_size, validate_non_zero_amount, validate_program_account,
            validate_writable,
        },
    },
};

/// Market, market role, state, system program, token program
const COLLECT_PREFIX_ACCOUNTS: usize = 5;
/// Ledger, vault, source, treasury destination
const COLLECT_GROUP_ACCOUNTS: usize = 4;

/// Processes CollectFee.
///
/// # Arguments
/// * `program_id` - The program ID
/// * `accounts` - See [`crate::FeeRouterInstruction::CollectFee`]
/// * `asset` - Asset key ([`crate::NATIVE_ASSET`] for SOL)
/// * `amount` - Exact amount pulled from the market
pub fn process_collect_fee(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    asset: Pubkey,
    amount: u64,
) -> ProgramResult {
    msg!("💰 Processing fee collection: {} of {}", amount, asset);
    collect_fees(program_id, accounts, &[asset], &[amount])
}

/// Processes BatchCollectFees. Every pair is validated before any value moves.
pub fn process_batch_collect_fees(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    assets: Vec<Pubkey>,
    amounts: Vec<u64>,
) -> ProgramResult {
    msg!("💰 Processing batch fee collection: {} entries", assets.len());
    if assets.len() != amounts.len() {
        msg!("❌ {} assets but {} amounts", assets.len(), amounts.len());
        return Err(FeeRouterError::LengthMismatch.into());
    }
    validate_batch_size(assets.len(), "Batch collection")?;
    collect_fees(program_id, accounts, &assets, &amounts)
}

fn collect_fees(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    assets: &[Pubkey],
    amounts: &[u64],
) -> ProgramResult {
    let required = COLLECT_PREFIX_ACCOUNTS + COLLECT_GROUP_ACCOUNTS * assets.len();
    if accounts.len() < required {
        msg!("❌ Expected {} accounts, got {}", required, accounts.len());
        return Err(ProgramError::NotEnoughAccountKeys);
    }

    let market = account_at(accounts, 0)?;
    let market_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let system_program_account = account_at(accounts, 3)?;
    let token_program = account_at(accounts, 4)?;

    require_role(market, market_role, program_id, Role::Market)?;
    validate_writable(state_account, "Fee router state")?;
    validate_program_account(system_program_account, &system_program::id(), "System program")?;
    validate_program_account(token_program, &spl_token::id(), "SPL Token program")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_not_paused()?;
    state.ensure_unlocked()?;

    // Validate every pair before any value moves
    for (index, (asset, amount)) in assets.iter().zip(amounts.iter()).enumerate() {
        let group = &accounts[COLLECT_PREFIX_ACCOUNTS + index * COLLECT_GROUP_ACCOUNTS..];
        validate_non_zero_amount(*amount, "Fee")?;
        AssetLedger::load_from_account(&group[0], program_id, asset)?;
        validate_writable(&group[0], "Asset ledger")?;
        validate_writable(&group[1], "Vault")?;
        validate_writable(&group[2], "Source")?;
        validate_vault(asset, &group[1], state_account, &state, program_id)?;
    }

    let timestamp = current_timestamp()?;
    acquire_reentrancy_lock(&mut state, state_account)?;

    for (index, (asset, amount)) in assets.iter().zip(amounts.iter()).enumerate() {
        let group = &accounts[COLLECT_PREFIX_ACCOUNTS + index * COLLECT_GROUP_ACCOUNTS..];
        let ledger_account = &group[0];
        let vault = &group[1];
        let source = &group[2];
        let treasury_destination = &group[3];

        let transfer_program = if is_native(asset) {
            system_program_account
        } else {
            token_program
        };
        pull_into_custody(asset, market, source, vault, transfer_program, *amount)?;

        let mut ledger = AssetLedger::load_from_account(ledger_account, program_id, asset)?;
        ledger.credit(*amount)?;

        FeeRouterEvent::FeeCollected {
            market: *market.key,
            asset: *asset,
            amount: *amount,
            timestamp,
        }
        .emit()?;

        if ledger.should_auto_forward() {
            msg!(
                "🔁 Threshold {} reached for {} (pending {}), forwarding",
                ledger.distribution_threshold,
                asset,
                ledger.pending_fees
            );
            // The treasury destination only matters once a forward happens
            validate_writable(treasury_destination, "Treasury destination")?;
            validate_destination(asset, treasury_destination, &state.treasury)?;
            forward_pending(
                &mut ledger,
                vault,
                treasury_destination,
                state_account,
                &state,
                token_program,
                timestamp,
            )?;
        }

        serialize_to_account(&ledger, ledger_account)?;
    }

    release_reentrancy_lock(&mut state, state_account)?;

    msg!("✅ Collected {} fee entries from market {}", assets.len(), market.key);
    Ok(())
}
