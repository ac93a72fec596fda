//! Capability checks
//!
//! Every gated instruction passes the caller plus the caller's role PDA.
//! The check happens before any other state is touched.

use solana_program::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    error::FeeRouterError,
    state::{Role, RoleAccount},
    utils::validation::validate_signer,
};

/// Requires `caller` to have signed and to hold `role`.
///
/// # Arguments
/// * `caller` - The account claiming the capability
/// * `role_account` - The caller's role PDA
/// * `program_id` - Program id for PDA validation
/// * `role` - Capability required by the instruction
///
/// # Returns
/// * The caller's loaded role account, or `Unauthorized`
pub fn require_role(
    caller: &AccountInfo,
    role_account: &AccountInfo,
    program_id: &Pubkey,
    role: Role,
) -> Result<RoleAccount, ProgramError> {
    validate_signer(caller, role.as_str())?;

    let (expected, _) = RoleAccount::find_address(caller.key, program_id);
    if *role_account.key != expected {
        msg!("❌ UNAUTHORIZED: {} is not the role account of {}", role_account.key, caller.key);
        return Err(FeeRouterError::Unauthorized.into());
    }

    let loaded = RoleAccount::load_optional(role_account, program_id, caller.key)?;
    match loaded {
        Some(account) if account.has_role(role) => {
            msg!("✅ {} authority validated: {}", role.as_str(), caller.key);
            Ok(account)
        }
        _ => {
            msg!("❌ UNAUTHORIZED: {} does not hold the {} role", caller.key, role.as_str());
            Err(FeeRouterError::Unauthorized.into())
        }
    }
}
