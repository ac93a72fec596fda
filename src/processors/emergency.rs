//! Emergency Withdrawal Processor
//!
//! While paused an admin may move raw custody of any asset to a recovery
//! address. The ledger's pending balance is lowered to what is left in
//! custody so it never claims more than the vault holds; lifetime totals stay
//! untouched.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
};

use crate::{
    error::FeeRouterError,
    events::FeeRouterEvent,
    processors::current_timestamp,
    state::{AssetLedger, FeeRouterState, Role},
    utils::{
        access_control::require_role,
        custody::{custody_balance, send_from_custody, validate_destination, validate_vault},
        reentrancy_protection::{acquire_reentrancy_lock, release_reentrancy_lock},
        serialization::serialize_to_account,
        validation::{
            account_at, validate_address, validate_non_zero_amount, validate_program_account,
            validate_writable,
        },
    },
};

/// Processes EmergencyWithdraw.
///
/// # Errors
/// * `NotPaused` - the router is running
/// * `InvalidAddress` - `recipient` is the default key
/// * `InvalidAmount` - `amount` is zero
/// * `InsufficientBalance` - custody holds less than `amount`
pub fn process_emergency_withdraw(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    asset: Pubkey,
    amount: u64,
    recipient: Pubkey,
) -> ProgramResult {
    msg!("🚨 Processing emergency withdrawal: {} of {} to {}", amount, asset, recipient);

    let admin = account_at(accounts, 0)?;
    let admin_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let token_program = account_at(accounts, 3)?;
    let ledger_account = account_at(accounts, 4)?;
    let vault = account_at(accounts, 5)?;
    let destination = account_at(accounts, 6)?;

    require_role(admin, admin_role, program_id, Role::Admin)?;
    validate_writable(state_account, "Fee router state")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_paused()?;
    state.ensure_unlocked()?;

    validate_address(&recipient, "Recipient")?;
    validate_non_zero_amount(amount, "Emergency withdrawal")?;
    validate_program_account(token_program, &spl_token::id(), "SPL Token program")?;
    validate_writable(vault, "Vault")?;
    validate_writable(destination, "Recipient destination")?;
    validate_vault(&asset, vault, state_account, &state, program_id)?;
    validate_destination(&asset, destination, &recipient)?;

    let available = custody_balance(&asset, vault)?;
    if available < amount {
        msg!("❌ Custody holds {} of {}, requested {}", available, asset, amount);
        return Err(FeeRouterError::InsufficientBalance.into());
    }

    let ledger = AssetLedger::load_optional(ledger_account, program_id, &asset)?;
    if ledger.is_some() {
        validate_writable(ledger_account, "Asset ledger")?;
    }

    let timestamp = current_timestamp()?;
    acquire_reentrancy_lock(&mut state, state_account)?;

    send_from_custody(&asset, vault, destination, state_account, &state, token_program, amount)?;

    if let Some(mut ledger) = ledger {
        let remaining = custody_balance(&asset, vault)?;
        if let Some(removed) = ledger.clamp_pending_to_custody(remaining) {
            msg!("⚠️ Pending fees of {} reduced by {} to match custody", asset, removed);
            serialize_to_account(&ledger, ledger_account)?;
        }
    }

    release_reentrancy_lock(&mut state, state_account)?;

    FeeRouterEvent::EmergencyWithdrawal {
        asset,
        amount,
        recipient,
        timestamp,
    }
    .emit()?;

    msg!("✅ Emergency withdrawal complete: {} of {} to {}", amount, asset, recipient);
    Ok(())
}
