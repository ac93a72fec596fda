//! Market and Role Management Processors
//!
//! Capabilities live in one role PDA per principal. Market authorization is
//! the `Market` capability, so the market instructions and the generic role
//! instructions share the same accounting of authorized markets and admins.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{
    constants::ROLE_SEED_PREFIX,
    error::FeeRouterError,
    events::FeeRouterEvent,
    processors::current_timestamp,
    state::{FeeRouterState, Role, RoleAccount},
    utils::{
        access_control::require_role,
        serialization::{create_pda_account, serialize_to_account},
        validation::{
            account_at, validate_address, validate_batch_size, validate_program_account,
            validate_signer, validate_writable,
        },
    },
};

/// Admin, admin role, state, system program
const MANAGEMENT_PREFIX_ACCOUNTS: usize = 4;

/// Loads the role PDA of `principal`, creating it when `create` is set and it
/// does not exist yet.
fn load_or_create_role_account<'a>(
    payer: &AccountInfo<'a>,
    role_account: &AccountInfo<'a>,
    system_program_account: &AccountInfo<'a>,
    program_id: &Pubkey,
    principal: &Pubkey,
    create: bool,
    timestamp: i64,
) -> Result<Option<RoleAccount>, ProgramError> {
    if let Some(existing) = RoleAccount::load_optional(role_account, program_id, principal)? {
        return Ok(Some(existing));
    }
    if !create {
        return Ok(None);
    }

    let (_, bump) = RoleAccount::find_address(principal, program_id);
    create_pda_account(
        payer,
        role_account,
        system_program_account,
        program_id,
        RoleAccount::LEN,
        &[ROLE_SEED_PREFIX, principal.as_ref(), &[bump]],
    )?;
    msg!("📝 Created role account for {}", principal);
    Ok(Some(RoleAccount::new(*principal, bump, timestamp)))
}

/// Sets the `Market` capability of `market` and keeps the market count in sync.
///
/// Re-applying the current value succeeds without changing anything but still
/// emits `MarketAuthorized`.
#[allow(clippy::too_many_arguments)]
fn apply_market_authorization<'a>(
    program_id: &Pubkey,
    payer: &AccountInfo<'a>,
    role_account: &AccountInfo<'a>,
    system_program_account: &AccountInfo<'a>,
    state: &mut FeeRouterState,
    market: &Pubkey,
    authorized: bool,
    timestamp: i64,
) -> ProgramResult {
    validate_writable(role_account, "Market role account")?;

    let loaded = load_or_create_role_account(
        payer,
        role_account,
        system_program_account,
        program_id,
        market,
        authorized,
        timestamp,
    )?;

    if let Some(mut roles) = loaded {
        let changed = if authorized {
            roles.grant(Role::Market, timestamp)
        } else {
            roles.revoke(Role::Market, timestamp)
        };
        if changed {
            state.record_market_authorization(authorized)?;
            serialize_to_account(&roles, role_account)?;
        }
    }

    FeeRouterEvent::MarketAuthorized {
        market: *market,
        authorized,
        timestamp,
    }
    .emit()?;

    msg!("✅ Market {} authorized: {}", market, authorized);
    Ok(())
}

/// Removes `role` from an existing role account and records the change.
fn apply_revocation(
    state: &mut FeeRouterState,
    roles: &mut RoleAccount,
    role_account: &AccountInfo,
    role: Role,
    sender: &Pubkey,
    timestamp: i64,
) -> Result<bool, ProgramError> {
    if !roles.revoke(role, timestamp) {
        return Ok(false);
    }
    match role {
        Role::Admin => state.record_admin_removed()?,
        Role::Market => state.record_market_authorization(false)?,
        _ => {}
    }
    serialize_to_account(roles, role_account)?;

    FeeRouterEvent::RoleRevoked {
        principal: roles.principal,
        role,
        sender: *sender,
        timestamp,
    }
    .emit()?;
    Ok(true)
}

/// Processes SetMarketAuthorization.
pub fn process_set_market_authorization(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    market: Pubkey,
    authorized: bool,
) -> ProgramResult {
    msg!("🏪 Processing market authorization: {} -> {}", market, authorized);

    let admin = account_at(accounts, 0)?;
    let admin_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let system_program_account = account_at(accounts, 3)?;
    let market_role = account_at(accounts, 4)?;

    require_role(admin, admin_role, program_id, Role::Admin)?;
    validate_address(&market, "Market")?;
    validate_writable(state_account, "Fee router state")?;
    validate_program_account(system_program_account, &system_program::id(), "System program")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    apply_market_authorization(
        program_id,
        admin,
        market_role,
        system_program_account,
        &mut state,
        &market,
        authorized,
        current_timestamp()?,
    )?;

    serialize_to_account(&state, state_account)
}

/// Processes BatchSetMarketAuthorization.
///
/// Default keys are skipped and take no role account slot.
pub fn process_batch_set_market_authorization(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    markets: Vec<Pubkey>,
    authorized: bool,
) -> ProgramResult {
    msg!("🏪 Processing batch market authorization: {} markets -> {}", markets.len(), authorized);
    validate_batch_size(markets.len(), "Batch market authorization")?;

    let admin = account_at(accounts, 0)?;
    let admin_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let system_program_account = account_at(accounts, 3)?;

    require_role(admin, admin_role, program_id, Role::Admin)?;
    validate_writable(state_account, "Fee router state")?;
    validate_program_account(system_program_account, &system_program::id(), "System program")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    let timestamp = current_timestamp()?;
    let mut next_account = MANAGEMENT_PREFIX_ACCOUNTS;
    let mut applied = 0usize;

    for market in markets.iter() {
        if *market == Pubkey::default() {
            msg!("⏭️ Skipping default market key");
            continue;
        }
        let market_role = account_at(accounts, next_account)?;
        next_account += 1;

        apply_market_authorization(
            program_id,
            admin,
            market_role,
            system_program_account,
            &mut state,
            market,
            authorized,
            timestamp,
        )?;
        applied += 1;
    }

    serialize_to_account(&state, state_account)?;

    msg!("📊 Batch authorization complete: {} applied, {} skipped", applied, markets.len() - applied);
    Ok(())
}

/// Processes GrantRole.
///
/// Granting `Market` is the same as authorizing the market. Granting a role
/// that is already held is a no-op without an event.
pub fn process_grant_role(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    principal: Pubkey,
    role: Role,
) -> ProgramResult {
    msg!("🔑 Processing role grant: {} -> {}", role.as_str(), principal);

    let admin = account_at(accounts, 0)?;
    let admin_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let system_program_account = account_at(accounts, 3)?;
    let principal_role = account_at(accounts, 4)?;

    require_role(admin, admin_role, program_id, Role::Admin)?;
    validate_address(&principal, "Principal")?;
    validate_writable(state_account, "Fee router state")?;
    validate_writable(principal_role, "Principal role account")?;
    validate_program_account(system_program_account, &system_program::id(), "System program")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;
    let timestamp = current_timestamp()?;

    if role == Role::Market {
        apply_market_authorization(
            program_id,
            admin,
            principal_role,
            system_program_account,
            &mut state,
            &principal,
            true,
            timestamp,
        )?;
        return serialize_to_account(&state, state_account);
    }

    let mut roles = load_or_create_role_account(
        admin,
        principal_role,
        system_program_account,
        program_id,
        &principal,
        true,
        timestamp,
    )?
    .ok_or(FeeRouterError::InvalidAccount)?;

    if !roles.grant(role, timestamp) {
        msg!("ℹ️ {} already holds {}", principal, role.as_str());
        return Ok(());
    }
    if role == Role::Admin {
        state.record_admin_added()?;
    }
    serialize_to_account(&roles, principal_role)?;
    serialize_to_account(&state, state_account)?;

    FeeRouterEvent::RoleGranted {
        principal,
        role,
        sender: *admin.key,
        timestamp,
    }
    .emit()?;

    msg!("✅ Granted {} to {}", role.as_str(), principal);
    Ok(())
}

/// Processes RevokeRole. Removing the last Admin fails with `LastAdmin`.
pub fn process_revoke_role(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    principal: Pubkey,
    role: Role,
) -> ProgramResult {
    msg!("🔒 Processing role revocation: {} from {}", role.as_str(), principal);

    let admin = account_at(accounts, 0)?;
    let admin_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;
    let system_program_account = account_at(accounts, 3)?;
    let principal_role = account_at(accounts, 4)?;

    require_role(admin, admin_role, program_id, Role::Admin)?;
    validate_address(&principal, "Principal")?;
    validate_writable(state_account, "Fee router state")?;
    validate_writable(principal_role, "Principal role account")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;
    let timestamp = current_timestamp()?;

    if role == Role::Market {
        apply_market_authorization(
            program_id,
            admin,
            principal_role,
            system_program_account,
            &mut state,
            &principal,
            false,
            timestamp,
        )?;
        return serialize_to_account(&state, state_account);
    }

    let Some(mut roles) = RoleAccount::load_optional(principal_role, program_id, &principal)? else {
        msg!("ℹ️ {} holds no roles", principal);
        return Ok(());
    };

    if apply_revocation(&mut state, &mut roles, principal_role, role, admin.key, timestamp)? {
        serialize_to_account(&state, state_account)?;
        msg!("✅ Revoked {} from {}", role.as_str(), principal);
    } else {
        msg!("ℹ️ {} does not hold {}", principal, role.as_str());
    }
    Ok(())
}

/// Processes RenounceRole: the signer drops one of its own capabilities.
///
/// Renouncing a role the signer does not hold fails with `InvalidRole`.
pub fn process_renounce_role(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    role: Role,
) -> ProgramResult {
    msg!("🔓 Processing role renouncement: {}", role.as_str());

    let principal = account_at(accounts, 0)?;
    let principal_role = account_at(accounts, 1)?;
    let state_account = account_at(accounts, 2)?;

    validate_signer(principal, "Principal")?;
    validate_writable(principal_role, "Principal role account")?;
    validate_writable(state_account, "Fee router state")?;

    let mut state = FeeRouterState::load_from_account(state_account, program_id)?;
    state.ensure_unlocked()?;

    let mut roles = RoleAccount::load_optional(principal_role, program_id, principal.key)?
        .ok_or(FeeRouterError::InvalidRole)?;

    if !apply_revocation(
        &mut state,
        &mut roles,
        principal_role,
        role,
        principal.key,
        current_timestamp()?,
    )? {
        msg!("❌ {} does not hold {}", principal.key, role.as_str());
        return Err(FeeRouterError::InvalidRole.into());
    }
    serialize_to_account(&state, state_account)?;

    msg!("✅ {} renounced {}", principal.key, role.as_str());
    Ok(())
}
