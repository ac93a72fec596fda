//! Read-only View Processors
//!
//! Views need no signer and never write account data. Results are published
//! with `set_return_data` as borsh bytes and echoed to the log so they can be
//! read from simulations as well as from CPI callers.

use borsh::BorshSerialize;
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::set_return_data,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::FEE_ROUTER_STATE_SEED_PREFIX,
    error::FeeRouterError,
    state::{AssetLedger, FeeRouterState},
    types::LedgerInfo,
    utils::{
        custody::{custody_balance, find_native_vault_address, is_native, token_vault_address},
        validation::account_at,
    },
};

fn publish<T: BorshSerialize>(value: &T) -> ProgramResult {
    set_return_data(&value.try_to_vec()?);
    Ok(())
}

/// Ledger for `asset`, or `None` when the asset was never registered.
fn load_ledger(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    asset: &Pubkey,
) -> Result<Option<AssetLedger>, ProgramError> {
    let ledger_account = account_at(accounts, 0)?;
    AssetLedger::load_optional(ledger_account, program_id, asset)
}

/// **VIEW INSTRUCTION**: pending (unforwarded) fees of `asset`.
pub fn process_get_pending_fees(program_id: &Pubkey, accounts: &[AccountInfo], asset: Pubkey) -> ProgramResult {
    let pending = load_ledger(program_id, accounts, &asset)?.map_or(0, |ledger| ledger.pending_fees);
    msg!("📊 Pending fees for {}: {}", asset, pending);
    publish(&pending)
}

/// **VIEW INSTRUCTION**: lifetime fees collected for `asset`.
pub fn process_get_total_fees_collected(program_id: &Pubkey, accounts: &[AccountInfo], asset: Pubkey) -> ProgramResult {
    let total = load_ledger(program_id, accounts, &asset)?.map_or(0, |ledger| ledger.total_fees_collected);
    msg!("📊 Total fees collected for {}: {}", asset, total);
    publish(&total)
}

/// **VIEW INSTRUCTION**: whether `asset` has reached its distribution threshold.
pub fn process_should_auto_forward(program_id: &Pubkey, accounts: &[AccountInfo], asset: Pubkey) -> ProgramResult {
    let ready = load_ledger(program_id, accounts, &asset)?.map_or(false, |ledger| ledger.should_auto_forward());
    msg!("📊 Auto-forward ready for {}: {}", asset, ready);
    publish(&ready)
}

/// **VIEW INSTRUCTION**: raw custodied balance of `asset`.
///
/// A token vault that has not been created yet reports 0.
pub fn process_get_balance(program_id: &Pubkey, accounts: &[AccountInfo], asset: Pubkey) -> ProgramResult {
    let vault = account_at(accounts, 0)?;

    let expected = if is_native(&asset) {
        find_native_vault_address(program_id).0
    } else {
        let (state_pda, _) = Pubkey::find_program_address(&[FEE_ROUTER_STATE_SEED_PREFIX], program_id);
        token_vault_address(&state_pda, &asset)
    };
    if *vault.key != expected {
        msg!("❌ Invalid vault for {}. Expected: {}, Got: {}", asset, expected, vault.key);
        return Err(FeeRouterError::InvalidAccount.into());
    }

    let balance = if vault.data_is_empty() && !is_native(&asset) {
        0
    } else {
        custody_balance(&asset, vault)?
    };
    msg!("📊 Custody balance for {}: {}", asset, balance);
    publish(&balance)
}

/// **VIEW INSTRUCTION**: router-wide configuration and counters.
pub fn process_get_ledger_info(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let state_account = account_at(accounts, 0)?;
    let state = FeeRouterState::load_from_account(state_account, program_id)?;

    let info = LedgerInfo {
        treasury: state.treasury,
        is_paused: state.is_paused,
        admin_count: state.admin_count,
        authorized_market_count: state.authorized_market_count,
        registered_asset_count: state.registered_asset_count,
        layout_version: state.layout_version,
    };
    msg!(
        "📊 Ledger info: treasury {}, paused {}, admins {}, markets {}, assets {}",
        info.treasury,
        info.is_paused,
        info.admin_count,
        info.authorized_market_count,
        info.registered_asset_count
    );
    publish(&info)
}
