//! # Fee Router
//!
//! On-chain ledger that receives protocol fees from authorized markets in SOL
//! or SPL tokens, accounts for them per asset, and forwards them to a treasury
//! either on demand or automatically once an asset's distribution threshold is
//! reached. Mutation is gated by per-principal capabilities (Admin, Operator,
//! Pauser, Upgrader, Market); fee intake can be paused, and while paused an
//! admin can sweep custody to a recovery address.
//!
//! ## Layout
//! - [`constants`] - PDA seeds, the native asset key and defaults
//! - [`error`] - [`FeeRouterError`] and its program error conversions
//! - [`events`] - structured events emitted through `sol_log_data`
//! - [`state`] - router state, per-asset ledgers and role accounts
//! - [`types`] - the instruction enum and view result types
//! - [`processors`] - one processor per instruction
//! - [`utils`] - validation, custody, capability and serialization helpers
//! - [`client_sdk`] - address derivation and instruction builders

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::{PrintProgramError, ProgramError},
    pubkey::Pubkey,
};

pub mod client_sdk;
pub mod constants;
pub mod error;
pub mod events;
pub mod processors;
pub mod state;
pub mod types;
pub mod utils;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use state::*;
pub use types::*;

use processors::*;

solana_program::declare_id!("BQZc8g7wsER3KByKorULNEzM982wkggeJ8kWXRbY4pWu");

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

/// Program entrypoint: decodes the instruction and dispatches it.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = FeeRouterInstruction::try_from_slice(instruction_data).map_err(|e| {
        msg!("❌ Failed to decode instruction: {:?}", e);
        ProgramError::InvalidInstructionData
    })?;

    let result = match instruction {
        FeeRouterInstruction::Initialize { treasury, admin } => {
            process_initialize(program_id, accounts, treasury, admin)
        }
        FeeRouterInstruction::RegisterAsset { asset, threshold } => {
            process_register_asset(program_id, accounts, asset, threshold)
        }
        FeeRouterInstruction::CollectFee { asset, amount } => {
            process_collect_fee(program_id, accounts, asset, amount)
        }
        FeeRouterInstruction::BatchCollectFees { assets, amounts } => {
            process_batch_collect_fees(program_id, accounts, assets, amounts)
        }
        FeeRouterInstruction::ForwardToTreasury { asset } => {
            process_forward_to_treasury(program_id, accounts, asset)
        }
        FeeRouterInstruction::BatchForwardToTreasury { assets } => {
            process_batch_forward_to_treasury(program_id, accounts, assets)
        }
        FeeRouterInstruction::SetMarketAuthorization { market, authorized } => {
            process_set_market_authorization(program_id, accounts, market, authorized)
        }
        FeeRouterInstruction::BatchSetMarketAuthorization { markets, authorized } => {
            process_batch_set_market_authorization(program_id, accounts, markets, authorized)
        }
        FeeRouterInstruction::SetTreasury { new_treasury } => {
            process_set_treasury(program_id, accounts, new_treasury)
        }
        FeeRouterInstruction::SetDistributionThreshold { asset, threshold } => {
            process_set_distribution_threshold(program_id, accounts, asset, threshold)
        }
        FeeRouterInstruction::Pause => process_pause(program_id, accounts),
        FeeRouterInstruction::Unpause => process_unpause(program_id, accounts),
        FeeRouterInstruction::EmergencyWithdraw { asset, amount, recipient } => {
            process_emergency_withdraw(program_id, accounts, asset, amount, recipient)
        }
        FeeRouterInstruction::GrantRole { principal, role } => {
            process_grant_role(program_id, accounts, principal, role)
        }
        FeeRouterInstruction::RevokeRole { principal, role } => {
            process_revoke_role(program_id, accounts, principal, role)
        }
        FeeRouterInstruction::RenounceRole { role } => {
            process_renounce_role(program_id, accounts, role)
        }
        FeeRouterInstruction::UpgradeProgram => process_upgrade_program(program_id, accounts),

        // **VIEW INSTRUCTIONS**
        FeeRouterInstruction::GetPendingFees { asset } => {
            process_get_pending_fees(program_id, accounts, asset)
        }
        FeeRouterInstruction::GetTotalFeesCollected { asset } => {
            process_get_total_fees_collected(program_id, accounts, asset)
        }
        FeeRouterInstruction::ShouldAutoForward { asset } => {
            process_should_auto_forward(program_id, accounts, asset)
        }
        FeeRouterInstruction::GetBalance { asset } => {
            process_get_balance(program_id, accounts, asset)
        }
        FeeRouterInstruction::GetLedgerInfo => process_get_ledger_info(program_id, accounts),
    };

    if let Err(error) = &result {
        error.print::<FeeRouterError>();
    }
    result
}
