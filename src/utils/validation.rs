//! Input Validation Utilities
//!
//! This module contains utilities for validating user inputs, account flags and
//! program ids. These functions provide common validation logic used
//! throughout the program.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{constants::MAX_BATCH_SIZE, error::FeeRouterError};

/// Validates that an account is a signer.
///
/// # Arguments
/// * `account` - The account to validate
/// * `context` - Context string for error messages
pub fn validate_signer(account: &AccountInfo, context: &str) -> ProgramResult {
    if !account.is_signer {
        msg!("{} must be a signer", context);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

/// Validates that an account is writable.
///
/// # Arguments
/// * `account` - The account to validate
/// * `context` - Context string for error messages
pub fn validate_writable(account: &AccountInfo, context: &str) -> ProgramResult {
    if !account.is_writable {
        msg!("{} must be writable", context);
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

/// Validates that an amount is non-zero.
pub fn validate_non_zero_amount(amount: u64, context: &str) -> ProgramResult {
    if amount == 0 {
        msg!("{} amount cannot be zero", context);
        return Err(FeeRouterError::InvalidAmount.into());
    }
    Ok(())
}

/// Validates that an address is not the default (null) key.
pub fn validate_address(address: &Pubkey, context: &str) -> ProgramResult {
    if *address == Pubkey::default() {
        msg!("❌ {} cannot be the default address", context);
        return Err(FeeRouterError::InvalidAddress.into());
    }
    Ok(())
}

/// Validates that an account is the expected program.
pub fn validate_program_account(account: &AccountInfo, expected: &Pubkey, context: &str) -> ProgramResult {
    if account.key != expected {
        msg!("❌ Invalid {} account. Expected: {}, Got: {}", context, expected, account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Validates that a batch is not larger than `MAX_BATCH_SIZE`. An empty batch is a no-op.
pub fn validate_batch_size(len: usize, context: &str) -> ProgramResult {
    if len > MAX_BATCH_SIZE {
        msg!("❌ {} batch must contain at most {} entries, got {}", context, MAX_BATCH_SIZE, len);
        return Err(ProgramError::InvalidInstructionData);
    }
    Ok(())
}

/// Returns the account at `index`, failing with `NotEnoughAccountKeys`.
pub fn account_at<'a, 'b>(accounts: &'a [AccountInfo<'b>], index: usize) -> Result<&'a AccountInfo<'b>, ProgramError> {
    accounts.get(index).ok_or(ProgramError::NotEnoughAccountKeys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_zero_amount() {
        assert!(validate_non_zero_amount(1, "Fee").is_ok());
        assert_eq!(
            validate_non_zero_amount(0, "Fee"),
            Err(FeeRouterError::InvalidAmount.into())
        );
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address(&Pubkey::new_unique(), "Treasury").is_ok());
        assert_eq!(
            validate_address(&Pubkey::default(), "Treasury"),
            Err(FeeRouterError::InvalidAddress.into())
        );
    }

    #[test]
    fn test_validate_batch_size() {
        assert!(validate_batch_size(1, "Collect").is_ok());
        assert!(validate_batch_size(MAX_BATCH_SIZE, "Collect").is_ok());
        assert!(validate_batch_size(0, "Collect").is_ok());
        assert!(validate_batch_size(MAX_BATCH_SIZE + 1, "Collect").is_err());
    }
}
