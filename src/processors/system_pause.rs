//! Pause Control Processors
//!
//! Pausing halts fee intake and opens emergency withdrawal. Forwarding to the
//! treasury keeps working while paused.

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, msg, pubkey::Pubkey};

use crate::{
    events::FeeRouterEvent,
    processors::current_timestamp,
    state::{FeeRouterState, Role},
    utils::{
        access_control::require_role,
        serialization::serialize_to_account,
        validation::{account_at, validate_writable},
    },
};

/// Processes Pause. Fails with `Paused` when already paused.
pub fn process_pause(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    msg!("🛑 Processing pause");
    set_paused(program_id, accounts, true)
}

/// Processes Unpause. Fails with `NotPaused` when not paused.
pub fn process_unpause(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    msg!("▶️ Processing unpause");
    set_paused(program_id, accounts, false)
}

fn set_paused(program_id: &Pubkey, accounts: &[AccountInfo], paused: bool) -> ProgramResult {
    let pauser = account_at(accounts, 0)?;
    let pauser_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;

    require_role(pauser, pauser_role, program_id, Role::Pauser)?;
    validate_writable(state_account, "Fee router state")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    let timestamp = current_timestamp()?;
    if paused {
        state.pause(timestamp)?;
    } else {
        state.unpause()?;
    }
    serialize_to_account(&state, state_account)?;

    FeeRouterEvent::PauseChanged {
        paused,
        authority: *pauser.key,
        timestamp,
    }
    .emit()?;

    if paused {
        msg!("🛑 FEE ROUTER PAUSED by {} at {}", pauser.key, timestamp);
    } else {
        msg!("✅ FEE ROUTER UNPAUSED by {}", pauser.key);
    }
    Ok(())
}
