//! Fee router events
//!
//! Events are the durable audit log of the router. Each one is written to the
//! transaction log twice: as `sol_log_data` program data
//! (`[EVENT_LOG_PREFIX, borsh(FeeRouterEvent)]`) for indexers, and as a
//! readable `msg!` line.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{constants::EVENT_LOG_PREFIX, state::Role};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum FeeRouterEvent {
    FeeCollected {
        market: Pubkey,
        asset: Pubkey,
        amount: u64,
        timestamp: i64,
    },
    FeesForwarded {
        asset: Pubkey,
        amount: u64,
        treasury: Pubkey,
        timestamp: i64,
    },
    MarketAuthorized {
        market: Pubkey,
        authorized: bool,
        timestamp: i64,
    },
    TreasuryUpdated {
        old_treasury: Pubkey,
        new_treasury: Pubkey,
        timestamp: i64,
    },
    ThresholdUpdated {
        asset: Pubkey,
        old_threshold: u64,
        new_threshold: u64,
        timestamp: i64,
    },
    PauseChanged {
        paused: bool,
        authority: Pubkey,
        timestamp: i64,
    },
    EmergencyWithdrawal {
        asset: Pubkey,
        amount: u64,
        recipient: Pubkey,
        timestamp: i64,
    },
    RoleGranted {
        principal: Pubkey,
        role: Role,
        sender: Pubkey,
        timestamp: i64,
    },
    RoleRevoked {
        principal: Pubkey,
        role: Role,
        sender: Pubkey,
        timestamp: i64,
    },
    AssetRegistered {
        asset: Pubkey,
        threshold: u64,
        timestamp: i64,
    },
}

impl FeeRouterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FeeRouterEvent::FeeCollected { .. } => "FeeCollected",
            FeeRouterEvent::FeesForwarded { .. } => "FeesForwarded",
            FeeRouterEvent::MarketAuthorized { .. } => "MarketAuthorized",
            FeeRouterEvent::TreasuryUpdated { .. } => "TreasuryUpdated",
            FeeRouterEvent::ThresholdUpdated { .. } => "ThresholdUpdated",
            FeeRouterEvent::PauseChanged { .. } => "PauseChanged",
            FeeRouterEvent::EmergencyWithdrawal { .. } => "EmergencyWithdrawal",
            FeeRouterEvent::RoleGranted { .. } => "RoleGranted",
            FeeRouterEvent::RoleRevoked { .. } => "RoleRevoked",
            FeeRouterEvent::AssetRegistered { .. } => "AssetRegistered",
        }
    }

    /// Writes the event to the transaction log.
    pub fn emit(&self) -> Result<(), ProgramError> {
        let data = self.try_to_vec()?;
        sol_log_data(&[EVENT_LOG_PREFIX, data.as_slice()]);
        msg!("📣 EVENT {}: {:?}", self.name(), self);
        Ok(())
    }

    /// Decodes the program-data payload of an emitted event.
    ///
    /// `fields` are the `sol_log_data` fields in emission order.
    pub fn decode_log_fields(fields: &[&[u8]]) -> Option<Self> {
        match fields {
            [prefix, payload] if *prefix == EVENT_LOG_PREFIX => {
                Self::try_from_slice(payload).ok()
            }
            _ => None,
        }
    }
}
