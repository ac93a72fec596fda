//! Program upgrade authority helpers
//!
//! Initialization is restricted to the program's upgrade authority so that a
//! freshly deployed router cannot be initialized by someone else first.
//! Code upgrades are signed by a program-owned authority PDA that only
//! `UpgradeProgram` can use.

use solana_program::{
    account_info::AccountInfo,
    bpf_loader_upgradeable::{self, UpgradeableLoaderState},
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::constants::UPGRADE_AUTHORITY_SEED_PREFIX;

/// Get the program data address for a given program ID
pub fn get_program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}

/// Address of the PDA expected to hold the program's upgrade authority
pub fn find_upgrade_authority_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[UPGRADE_AUTHORITY_SEED_PREFIX], program_id)
}

/// Reads the upgrade authority recorded in a program data account.
///
/// Returns `Ok(None)` when the authority has been revoked.
pub fn read_upgrade_authority(program_data_account: &AccountInfo) -> Result<Option<Pubkey>, ProgramError> {
    let program_data = program_data_account.try_borrow_data()?;
    let program_data_state = bincode::deserialize::<UpgradeableLoaderState>(&program_data)
        .map_err(|_| ProgramError::InvalidAccountData)?;

    match program_data_state {
        UpgradeableLoaderState::ProgramData {
            slot: _,
            upgrade_authority_address,
        } => Ok(upgrade_authority_address),
        _ => {
            msg!("❌ Invalid program data state");
            Err(ProgramError::InvalidAccountData)
        }
    }
}

/// Validate that the provided signer is the program upgrade authority
///
/// The program data account must be the one derived for `program_id`. If
/// nothing at that address is owned by the upgradeable loader, the program
/// was not deployed as upgradeable (a builtin under test, or a final
/// deployment) and any signer is accepted.
pub fn validate_program_upgrade_authority(
    program_id: &Pubkey,
    program_data_account: &AccountInfo,
    authority_account: &AccountInfo,
) -> Result<(), ProgramError> {
    if !authority_account.is_signer {
        msg!("❌ Program authority must be a signer");
        return Err(ProgramError::MissingRequiredSignature);
    }

    let expected_program_data_address = get_program_data_address(program_id);
    if *program_data_account.key != expected_program_data_address {
        msg!("❌ Invalid program data account provided");
        msg!("   Expected: {}", expected_program_data_address);
        msg!("   Provided: {}", program_data_account.key);
        return Err(ProgramError::InvalidAccountData);
    }

    if *program_data_account.owner != bpf_loader_upgradeable::id() {
        msg!("⚠️  Program is not deployed through the upgradeable loader");
        msg!("✅ Program authority accepted: {}", authority_account.key);
        return Ok(());
    }

    match read_upgrade_authority(program_data_account)? {
        Some(authority_pubkey) if authority_pubkey == *authority_account.key => {
            msg!("✅ Program upgrade authority validated: {}", authority_pubkey);
            Ok(())
        }
        Some(authority_pubkey) => {
            msg!("❌ UNAUTHORIZED: Provided authority does not match program upgrade authority");
            msg!("   Expected: {}", authority_pubkey);
            msg!("   Provided: {}", authority_account.key);
            Err(ProgramError::InvalidAccountData)
        }
        None => {
            msg!("❌ Program has no upgrade authority (authority was revoked)");
            Err(ProgramError::InvalidAccountData)
        }
    }
}
