//! Custody and value transfer utilities
//!
//! Custody for native SOL is the native vault PDA's lamports above its
//! rent-exempt minimum. Custody for a token is the balance of the vault token
//! account, the associated token account of the fee router state PDA.
//!
//! Inbound transfers are pulled from the market inside the instruction.
//! Outbound transfers either debit the program-owned native vault directly or
//! are signed by the state PDA.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};
use spl_associated_token_account::get_associated_token_address;
use spl_token::state::{Account as TokenAccount, AccountState};

use crate::{
    constants::{FEE_ROUTER_STATE_SEED_PREFIX, NATIVE_ASSET, NATIVE_VAULT_SEED_PREFIX},
    error::FeeRouterError,
    state::FeeRouterState,
    utils::reentrancy_protection::{LamportSnapshot, TokenAccountSnapshot},
};

pub fn is_native(asset: &Pubkey) -> bool {
    *asset == NATIVE_ASSET
}

pub fn find_native_vault_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[NATIVE_VAULT_SEED_PREFIX], program_id)
}

/// Vault token account address for `mint`
pub fn token_vault_address(state_pda: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(state_pda, mint)
}

/// Checks that `vault` is the custody account of `asset`.
pub fn validate_vault(
    asset: &Pubkey,
    vault: &AccountInfo,
    state_account: &AccountInfo,
    state: &FeeRouterState,
    program_id: &Pubkey,
) -> ProgramResult {
    if is_native(asset) {
        let expected = Pubkey::create_program_address(
            &[NATIVE_VAULT_SEED_PREFIX, &[state.native_vault_bump]],
            program_id,
        )
        .map_err(|_| ProgramError::InvalidSeeds)?;
        if *vault.key != expected || vault.owner != program_id {
            msg!("❌ Invalid native vault. Expected: {}, Got: {}", expected, vault.key);
            return Err(FeeRouterError::InvalidAccount.into());
        }
        return Ok(());
    }

    let expected = token_vault_address(state_account.key, asset);
    if *vault.key != expected {
        msg!("❌ Invalid token vault for {}. Expected: {}, Got: {}", asset, expected, vault.key);
        return Err(FeeRouterError::InvalidAccount.into());
    }
    let snapshot = TokenAccountSnapshot::capture(vault, "Token vault")?;
    if snapshot.mint != *asset || snapshot.owner != *state_account.key {
        msg!("❌ Token vault {} has wrong mint or owner", vault.key);
        return Err(FeeRouterError::InvalidAccount.into());
    }
    Ok(())
}

/// Actual custodied balance of `asset` held in `vault`.
pub fn custody_balance(asset: &Pubkey, vault: &AccountInfo) -> Result<u64, ProgramError> {
    if is_native(asset) {
        let rent = Rent::get()?;
        let reserve = rent.minimum_balance(vault.data_len());
        return Ok(vault.lamports().saturating_sub(reserve));
    }
    Ok(TokenAccountSnapshot::capture(vault, "Token vault")?.balance)
}

/// Checks that `destination` may receive `asset` on behalf of `expected_owner`.
///
/// For SOL the destination must be `expected_owner` itself; for tokens it must
/// be a token account of the asset mint owned by `expected_owner`.
pub fn validate_destination(
    asset: &Pubkey,
    destination: &AccountInfo,
    expected_owner: &Pubkey,
) -> ProgramResult {
    if is_native(asset) {
        if destination.key != expected_owner {
            msg!("❌ Destination {} is not {}", destination.key, expected_owner);
            return Err(FeeRouterError::InvalidAccount.into());
        }
        return Ok(());
    }

    let snapshot = TokenAccountSnapshot::capture(destination, "Destination")?;
    if snapshot.mint != *asset || snapshot.owner != *expected_owner {
        msg!("❌ Destination token account {} does not belong to {}", destination.key, expected_owner);
        return Err(FeeRouterError::InvalidAccount.into());
    }
    Ok(())
}

/// Moves exactly `amount` of `asset` from the market into custody.
///
/// # Arguments
/// * `market` - Signing market (the lamport source for SOL)
/// * `source` - The market itself for SOL, else the market's token account
/// * `vault` - Custody account for the asset
/// * `transfer_program` - System program for SOL, SPL Token program otherwise
pub fn pull_into_custody<'a>(
    asset: &Pubkey,
    market: &AccountInfo<'a>,
    source: &AccountInfo<'a>,
    vault: &AccountInfo<'a>,
    transfer_program: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    if is_native(asset) {
        if source.key != market.key {
            msg!("❌ Native fees must be paid by the market itself");
            return Err(FeeRouterError::InvalidAccount.into());
        }
        if market.lamports() < amount {
            msg!("❌ Market balance {} cannot cover fee {}", market.lamports(), amount);
            return Err(FeeRouterError::InsufficientBalance.into());
        }

        let vault_before = LamportSnapshot::capture(vault);
        invoke(
            &system_instruction::transfer(market.key, vault.key, amount),
            &[market.clone(), vault.clone(), transfer_program.clone()],
        )?;
        return vault_before.validate_changes(vault, amount as i128, "Native fee collection");
    }

    let source_before = TokenAccountSnapshot::capture(source, "Market token account")?;
    if source_before.mint != *asset {
        msg!("❌ Market token account mint {} does not match asset {}", source_before.mint, asset);
        return Err(FeeRouterError::InvalidAccount.into());
    }
    if source_before.balance < amount {
        msg!("❌ Market token balance {} cannot cover fee {}", source_before.balance, amount);
        return Err(FeeRouterError::InsufficientBalance.into());
    }
    let vault_before = TokenAccountSnapshot::capture(vault, "Token vault")?;

    invoke(
        &spl_token::instruction::transfer(
            transfer_program.key,
            source.key,
            vault.key,
            market.key,
            &[],
            amount,
        )?,
        &[source.clone(), vault.clone(), market.clone(), transfer_program.clone()],
    )?;

    source_before.validate_changes(source, -(amount as i128), "Token fee collection source")?;
    vault_before.validate_changes(vault, amount as i128, "Token fee collection vault")
}

/// Moves `amount` of `asset` out of custody into `destination`.
///
/// The destination must already have been checked with
/// [`validate_destination`]. A destination that cannot receive the funds
/// fails with `TransferFailed` before any balance moves.
pub fn send_from_custody<'a>(
    asset: &Pubkey,
    vault: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    state_account: &AccountInfo<'a>,
    state: &FeeRouterState,
    token_program: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    let available = custody_balance(asset, vault)?;
    if available < amount {
        msg!("❌ Custody {} cannot cover transfer of {}", available, amount);
        return Err(FeeRouterError::InsufficientBalance.into());
    }

    if is_native(asset) {
        if destination.executable {
            msg!("❌ Destination {} is executable and cannot receive SOL", destination.key);
            return Err(FeeRouterError::TransferFailed.into());
        }
        let rent = Rent::get()?;
        let resulting = destination
            .lamports()
            .checked_add(amount)
            .ok_or(FeeRouterError::ArithmeticOverflow)?;
        if resulting < rent.minimum_balance(destination.data_len()) {
            msg!("❌ Destination {} would remain below rent exemption", destination.key);
            return Err(FeeRouterError::TransferFailed.into());
        }

        **vault.try_borrow_mut_lamports()? -= amount;
        **destination.try_borrow_mut_lamports()? += amount;
        msg!("💸 Moved {} lamports to {}", amount, destination.key);
        return Ok(());
    }

    let destination_account = TokenAccount::unpack(&destination.data.borrow())
        .map_err(|_| ProgramError::from(FeeRouterError::TransferFailed))?;
    if destination_account.state != AccountState::Initialized {
        msg!("❌ Destination token account {} cannot receive (frozen)", destination.key);
        return Err(FeeRouterError::TransferFailed.into());
    }
    if *token_program.key != spl_token::id() {
        return Err(ProgramError::IncorrectProgramId);
    }

    let vault_before = TokenAccountSnapshot::capture(vault, "Token vault")?;
    let destination_before = TokenAccountSnapshot::capture(destination, "Destination")?;

    invoke_signed(
        &spl_token::instruction::transfer(
            token_program.key,
            vault.key,
            destination.key,
            state_account.key,
            &[],
            amount,
        )?,
        &[
            vault.clone(),
            destination.clone(),
            state_account.clone(),
            token_program.clone(),
        ],
        &[&[FEE_ROUTER_STATE_SEED_PREFIX, &[state.state_bump]]],
    )
    .map_err(|e| {
        msg!("❌ Token transfer rejected: {:?}", e);
        ProgramError::from(FeeRouterError::TransferFailed)
    })?;

    vault_before.validate_changes(vault, -(amount as i128), "Custody release vault")?;
    destination_before.validate_changes(destination, amount as i128, "Custody release destination")?;
    msg!("💸 Moved {} tokens of {} to {}", amount, asset, destination.key);
    Ok(())
}
