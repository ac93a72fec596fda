//! Program Initialization Processor
//!
//! This module handles the one-time initialization that creates the fee
//! router state, the native SOL vault, the native asset ledger and the
//! admin's role account.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
    system_program,
};

use crate::{
    constants::*,
    error::FeeRouterError,
    events::FeeRouterEvent,
    processors::current_timestamp,
    state::{AssetLedger, FeeRouterState, Role, RoleAccount},
    utils::{
        custody::find_native_vault_address,
        program_authority::validate_program_upgrade_authority,
        serialization::{create_pda_account, serialize_to_account},
        validation::{account_at, validate_address, validate_program_account, validate_writable},
    },
};

/// Processes the Initialize instruction.
///
/// # Arguments
/// * `program_id` - The program ID for PDA derivation
/// * `accounts` - See [`crate::FeeRouterInstruction::Initialize`]
/// * `treasury` - Initial forwarding destination
/// * `admin` - Principal receiving Admin, Operator, Pauser and Upgrader
///
/// # Critical Notes
/// - Only the program upgrade authority can initialize (when deployed upgradeable)
/// - All PDAs are validated against derived addresses
/// - A second call fails with `AlreadyInitialized`
pub fn process_initialize(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    treasury: Pubkey,
    admin: Pubkey,
) -> ProgramResult {
    msg!("🚀 INITIALIZING FEE ROUTER");

    let payer = account_at(accounts, 0)?;
    let state_account = account_at(accounts, 1)?;
    let native_vault = account_at(accounts, 2)?;
    let native_ledger_account = account_at(accounts, 3)?;
    let admin_role_account = account_at(accounts, 4)?;
    let system_program_account = account_at(accounts, 5)?;
    let program_data_account = account_at(accounts, 6)?;

    validate_address(&treasury, "Treasury")?;
    validate_address(&admin, "Admin")?;
    validate_writable(payer, "Payer")?;
    validate_program_account(system_program_account, &system_program::id(), "System program")?;
    validate_program_upgrade_authority(program_id, program_data_account, payer)?;

    let (expected_state, state_bump) =
        Pubkey::find_program_address(&[FEE_ROUTER_STATE_SEED_PREFIX], program_id);
    if *state_account.key != expected_state {
        msg!("❌ SECURITY VIOLATION: Fee router state PDA does not match expected derived PDA");
        msg!("   Expected: {}", expected_state);
        msg!("   Provided: {}", state_account.key);
        return Err(FeeRouterError::InvalidAccount.into());
    }

    if state_account.owner == program_id && !state_account.data_is_empty() {
        msg!("❌ Fee router already initialized");
        return Err(FeeRouterError::AlreadyInitialized.into());
    }

    let (expected_vault, native_vault_bump) = find_native_vault_address(program_id);
    let (expected_ledger, ledger_bump) = AssetLedger::find_address(&NATIVE_ASSET, program_id);
    let (expected_admin_role, admin_role_bump) = RoleAccount::find_address(&admin, program_id);
    if *native_vault.key != expected_vault
        || *native_ledger_account.key != expected_ledger
        || *admin_role_account.key != expected_admin_role
    {
        msg!("❌ SECURITY VIOLATION: Vault, ledger or admin role PDA mismatch");
        return Err(FeeRouterError::InvalidAccount.into());
    }

    msg!("✅ All PDAs validated against derived addresses");

    let timestamp = current_timestamp()?;

    create_pda_account(
        payer,
        state_account,
        system_program_account,
        program_id,
        FeeRouterState::LEN,
        &[FEE_ROUTER_STATE_SEED_PREFIX, &[state_bump]],
    )?;
    create_pda_account(
        payer,
        native_vault,
        system_program_account,
        program_id,
        0,
        &[NATIVE_VAULT_SEED_PREFIX, &[native_vault_bump]],
    )?;
    create_pda_account(
        payer,
        native_ledger_account,
        system_program_account,
        program_id,
        AssetLedger::LEN,
        &[ASSET_LEDGER_SEED_PREFIX, NATIVE_ASSET.as_ref(), &[ledger_bump]],
    )?;
    create_pda_account(
        payer,
        admin_role_account,
        system_program_account,
        program_id,
        RoleAccount::LEN,
        &[ROLE_SEED_PREFIX, admin.as_ref(), &[admin_role_bump]],
    )?;

    let mut state = FeeRouterState::new(treasury, state_bump, native_vault_bump);

    let mut admin_roles = RoleAccount::new(admin, admin_role_bump, timestamp);
    for role in Role::ADMIN_DEFAULTS {
        admin_roles.grant(role, timestamp);
    }
    state.record_admin_added()?;

    let native_ledger = AssetLedger::new(NATIVE_ASSET, DEFAULT_NATIVE_THRESHOLD, ledger_bump);
    state.record_asset_registered()?;

    serialize_to_account(&state, state_account)?;
    serialize_to_account(&admin_roles, admin_role_account)?;
    serialize_to_account(&native_ledger, native_ledger_account)?;

    FeeRouterEvent::TreasuryUpdated {
        old_treasury: Pubkey::default(),
        new_treasury: treasury,
        timestamp,
    }
    .emit()?;
    for role in Role::ADMIN_DEFAULTS {
        FeeRouterEvent::RoleGranted {
            principal: admin,
            role,
            sender: *payer.key,
            timestamp,
        }
        .emit()?;
    }
    FeeRouterEvent::AssetRegistered {
        asset: NATIVE_ASSET,
        threshold: DEFAULT_NATIVE_THRESHOLD,
        timestamp,
    }
    .emit()?;

    msg!("✅ FEE ROUTER INITIALIZED:");
    msg!("   • State PDA: {}", state_account.key);
    msg!("   • Native vault: {}", native_vault.key);
    msg!("   • Treasury: {}", treasury);
    msg!("   • Admin: {}", admin);
    msg!("   • Native threshold: {} lamports", DEFAULT_NATIVE_THRESHOLD);

    Ok(())
}
