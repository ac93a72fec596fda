//! Serialization Utilities
//!
//! Buffer serialization into account data and creation of program-owned PDA
//! accounts.

use borsh::BorshSerialize;
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};

/// Serializes `data` into `account`.
///
/// The value is serialized to a temporary buffer first so that a failed or
/// oversized serialization never leaves partially written account data.
pub fn serialize_to_account<T: BorshSerialize>(data: &T, account: &AccountInfo) -> ProgramResult {
    let serialized_data = data.try_to_vec().map_err(|e| {
        msg!("❌ Serialization failed for {}: {:?}", account.key, e);
        ProgramError::InvalidAccountData
    })?;

    let account_data_len = account.data_len();
    if serialized_data.len() > account_data_len {
        msg!(
            "❌ Serialized data too large for {}. Need: {}, Have: {}",
            account.key,
            serialized_data.len(),
            account_data_len
        );
        return Err(ProgramError::AccountDataTooSmall);
    }

    let mut account_data = account.try_borrow_mut_data()?;
    account_data[..serialized_data.len()].copy_from_slice(&serialized_data);
    Ok(())
}

/// Creates a rent-exempt PDA account of `space` bytes owned by `program_id`.
///
/// An account that already holds lamports (for example after someone sent
/// SOL to the address) is topped up, allocated and assigned instead, since
/// `create_account` refuses funded addresses.
pub fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    new_account: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    program_id: &Pubkey,
    space: usize,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    let rent = Rent::get()?;
    let required_lamports = rent.minimum_balance(space);

    if new_account.lamports() == 0 {
        invoke_signed(
            &system_instruction::create_account(
                payer.key,
                new_account.key,
                required_lamports,
                space as u64,
                program_id,
            ),
            &[payer.clone(), new_account.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
        return Ok(());
    }

    let top_up = required_lamports.saturating_sub(new_account.lamports());
    if top_up > 0 {
        invoke_signed(
            &system_instruction::transfer(payer.key, new_account.key, top_up),
            &[payer.clone(), new_account.clone(), system_program.clone()],
            &[],
        )?;
    }
    invoke_signed(
        &system_instruction::allocate(new_account.key, space as u64),
        &[new_account.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(new_account.key, program_id),
        &[new_account.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    Ok(())
}
