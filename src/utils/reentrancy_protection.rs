//! Reentrancy Protection Utilities
//!
//! Two layers guard every instruction that moves value:
//!
//! - **Lock**: `reentrancy_locked` in `FeeRouterState` is taken and persisted
//!   before the external call and cleared after it. A nested invocation that
//!   loads the state sees the flag and fails with `Reentrant`.
//! - **Snapshots**: balances are captured before a CPI and compared after it,
//!   so an external program that moved more or less than requested is caught.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
};
use spl_token::state::{Account as TokenAccount, AccountState};

use crate::{
    error::FeeRouterError,
    state::FeeRouterState,
    utils::serialization::serialize_to_account,
};

/// Takes the reentrancy lock and persists it before any external call.
pub fn acquire_reentrancy_lock(state: &mut FeeRouterState, state_account: &AccountInfo) -> ProgramResult {
    state.acquire_lock().map_err(|e| {
        msg!("🚨 REENTRANCY: lock already held");
        ProgramError::from(e)
    })?;
    serialize_to_account(state, state_account)
}

/// Clears the reentrancy lock and persists the state.
pub fn release_reentrancy_lock(state: &mut FeeRouterState, state_account: &AccountInfo) -> ProgramResult {
    state.release_lock();
    serialize_to_account(state, state_account)
}

/// Snapshot of token account state before a CPI operation
#[derive(Debug, Clone)]
pub struct TokenAccountSnapshot {
    pub account_key: Pubkey,
    pub balance: u64,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub frozen: bool,
}

impl TokenAccountSnapshot {
    /// Create a snapshot of a token account's current state
    pub fn capture(account: &AccountInfo, account_name: &str) -> Result<Self, ProgramError> {
        if account.owner != &spl_token::id() {
            msg!("❌ REENTRANCY PROTECTION: {} is not owned by SPL Token program", account_name);
            return Err(FeeRouterError::InvalidAccount.into());
        }

        let token_account = TokenAccount::unpack(&account.data.borrow()).map_err(|_| {
            msg!("❌ REENTRANCY PROTECTION: Failed to unpack {} as token account", account_name);
            ProgramError::from(FeeRouterError::InvalidAccount)
        })?;

        Ok(Self {
            account_key: *account.key,
            balance: token_account.amount,
            mint: token_account.mint,
            owner: token_account.owner,
            frozen: token_account.state == AccountState::Frozen,
        })
    }

    /// Validate that the token account changed by exactly `expected_balance_change`
    /// and that nothing else about it changed.
    pub fn validate_changes(
        &self,
        account: &AccountInfo,
        expected_balance_change: i128,
        operation_name: &str,
    ) -> Result<(), ProgramError> {
        let current = TokenAccount::unpack(&account.data.borrow()).map_err(|_| {
            msg!("❌ REENTRANCY PROTECTION: Failed to re-read account after {}", operation_name);
            ProgramError::from(FeeRouterError::InvalidAccount)
        })?;

        if current.mint != self.mint || current.owner != self.owner {
            msg!("❌ REENTRANCY ATTACK DETECTED: Mint or owner changed during {}", operation_name);
            return Err(FeeRouterError::InvalidAccount.into());
        }

        let actual_balance_change = current.amount as i128 - self.balance as i128;
        if actual_balance_change != expected_balance_change {
            msg!("❌ Unexpected balance change during {}", operation_name);
            msg!("   Expected balance change: {}", expected_balance_change);
            msg!("   Actual balance change: {}", actual_balance_change);
            return Err(FeeRouterError::AmountMismatch.into());
        }

        let current_frozen = current.state == AccountState::Frozen;
        if current_frozen != self.frozen {
            msg!("❌ REENTRANCY ATTACK DETECTED: Freeze state changed during {}", operation_name);
            return Err(FeeRouterError::InvalidAccount.into());
        }

        Ok(())
    }
}

/// Snapshot of an account's lamports before a CPI operation
#[derive(Debug, Clone, Copy)]
pub struct LamportSnapshot {
    pub lamports: u64,
}

impl LamportSnapshot {
    pub fn capture(account: &AccountInfo) -> Self {
        Self { lamports: account.lamports() }
    }

    pub fn validate_changes(
        &self,
        account: &AccountInfo,
        expected_change: i128,
        operation_name: &str,
    ) -> Result<(), ProgramError> {
        let actual_change = account.lamports() as i128 - self.lamports as i128;
        if actual_change != expected_change {
            msg!("❌ Unexpected lamport change during {}", operation_name);
            msg!("   Expected: {}, Actual: {}", expected_change, actual_change);
            return Err(FeeRouterError::AmountMismatch.into());
        }
        Ok(())
    }
}
