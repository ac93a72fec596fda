//! Program Upgrade Processor
//!
//! The program's upgrade authority is handed to the `upgrade_authority` PDA
//! after deployment. Holders of the Upgrader capability replace the code
//! through this instruction, which signs the loader's `Upgrade` for the PDA.
//! Stored accounts are kept as they are and read by the new code.

use solana_program::{
    account_info::AccountInfo,
    bpf_loader_upgradeable,
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    pubkey::Pubkey,
};

use crate::{
    constants::UPGRADE_AUTHORITY_SEED_PREFIX,
    error::FeeRouterError,
    state::{FeeRouterState, Role},
    utils::{
        access_control::require_role,
        program_authority::{find_upgrade_authority_address, get_program_data_address, read_upgrade_authority},
        validation::{account_at, validate_program_account},
    },
};

/// Processes UpgradeProgram.
///
/// # Arguments
/// * `program_id` - The program being upgraded
/// * `accounts` - See [`crate::FeeRouterInstruction::UpgradeProgram`]
pub fn process_upgrade_program(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    msg!("⬆️ Processing program upgrade");

    let upgrader = account_at(accounts, 0)?;
    let upgrader_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let program_data = account_at(accounts, 3)?;
    let program_account = account_at(accounts, 4)?;
    let buffer = account_at(accounts, 5)?;
    let spill = account_at(accounts, 6)?;
    let upgrade_authority = account_at(accounts, 7)?;
    let rent_sysvar = account_at(accounts, 8)?;
    let clock_sysvar = account_at(accounts, 9)?;
    let loader = account_at(accounts, 10)?;

    require_role(upgrader, upgrader_role, program_id, Role::Upgrader)?;

    // Fails with IncompatibleLayout if stored state cannot be read
    let state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    validate_program_account(loader, &bpf_loader_upgradeable::id(), "BPF upgradeable loader")?;
    if program_account.key != program_id {
        msg!("❌ Program account {} is not this program", program_account.key);
        return Err(FeeRouterError::InvalidAccount.into());
    }
    let expected_program_data = get_program_data_address(program_id);
    if *program_data.key != expected_program_data {
        msg!("❌ Invalid program data account. Expected: {}", expected_program_data);
        return Err(FeeRouterError::InvalidAccount.into());
    }

    let (expected_authority, authority_bump) = find_upgrade_authority_address(program_id);
    if *upgrade_authority.key != expected_authority {
        msg!("❌ Invalid upgrade authority PDA. Expected: {}", expected_authority);
        return Err(FeeRouterError::InvalidAccount.into());
    }
    if read_upgrade_authority(program_data)? != Some(expected_authority) {
        msg!("❌ Program upgrade authority has not been handed to {}", expected_authority);
        return Err(FeeRouterError::UpgradeAuthorityNotDelegated.into());
    }

    invoke_signed(
        &bpf_loader_upgradeable::upgrade(program_id, buffer.key, upgrade_authority.key, spill.key),
        &[
            program_data.clone(),
            program_account.clone(),
            buffer.clone(),
            spill.clone(),
            rent_sysvar.clone(),
            clock_sysvar.clone(),
            upgrade_authority.clone(),
            loader.clone(),
        ],
        &[&[UPGRADE_AUTHORITY_SEED_PREFIX, &[authority_bump]]],
    )?;

    msg!("✅ Program {} upgraded from buffer {} by {}", program_id, buffer.key, upgrader.key);
    Ok(())
}
