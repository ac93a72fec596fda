//! Per-asset fee ledger
//!
//! One `AssetLedger` PDA exists per registered asset and carries that asset's
//! pending balance, lifetime total and auto-forward threshold.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{constants::ASSET_LEDGER_SEED_PREFIX, error::FeeRouterError};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssetLedger {
    pub is_initialized: bool,

    /// Asset key (native sentinel or token mint)
    pub asset: Pubkey,

    /// Collected but not yet forwarded. Never exceeds custody.
    pub pending_fees: u64,

    /// Lifetime sum of successful collections. Never decremented.
    pub total_fees_collected: u64,

    /// Auto-forward trigger level, 0 disables auto-forward
    pub distribution_threshold: u64,

    /// Lifetime sum forwarded to the treasury
    pub total_forwarded: u64,

    pub forward_count: u64,

    pub last_forward_timestamp: i64,

    pub bump: u8,

    pub reserved: [u8; 32],
}

impl AssetLedger {
    pub const LEN: usize = 1 + 32 + 8 + 8 + 8 + 8 + 8 + 8 + 1 + 32; // 114 bytes

    pub fn new(asset: Pubkey, distribution_threshold: u64, bump: u8) -> Self {
        Self {
            is_initialized: true,
            asset,
            pending_fees: 0,
            total_fees_collected: 0,
            distribution_threshold,
            total_forwarded: 0,
            forward_count: 0,
            last_forward_timestamp: 0,
            bump,
            reserved: [0u8; 32],
        }
    }

    /// Loads the ledger for `asset`, failing with `AssetNotRegistered` when
    /// the PDA has not been created yet.
    pub fn load_from_account(
        account: &AccountInfo,
        program_id: &Pubkey,
        asset: &Pubkey,
    ) -> Result<Self, ProgramError> {
        Self::load_optional(account, program_id, asset)?.ok_or_else(|| {
            msg!("❌ Asset {} is not registered", asset);
            FeeRouterError::AssetNotRegistered.into()
        })
    }

    /// Loads the ledger for `asset` if it exists.
    ///
    /// An empty, system-owned account at the right address yields `None`;
    /// anything else at the wrong address or with the wrong asset is rejected.
    pub fn load_optional(
        account: &AccountInfo,
        program_id: &Pubkey,
        asset: &Pubkey,
    ) -> Result<Option<Self>, ProgramError> {
        if account.owner != program_id || account.data_is_empty() {
            let (expected, _) = Self::find_address(asset, program_id);
            if *account.key != expected {
                msg!("❌ Invalid asset ledger PDA for {}", asset);
                return Err(FeeRouterError::InvalidAccount.into());
            }
            return Ok(None);
        }

        let ledger = {
            let data = account.data.borrow();
            Self::deserialize(&mut &data[..]).map_err(|e| {
                msg!("❌ AssetLedger deserialization failed: {:?}", e);
                ProgramError::InvalidAccountData
            })?
        };

        if !ledger.is_initialized {
            return Ok(None);
        }
        if ledger.asset != *asset {
            msg!("❌ Asset ledger mismatch. Expected: {}, Stored: {}", asset, ledger.asset);
            return Err(FeeRouterError::InvalidAccount.into());
        }

        let expected = Pubkey::create_program_address(
            &[ASSET_LEDGER_SEED_PREFIX, asset.as_ref(), &[ledger.bump]],
            program_id,
        )
        .map_err(|_| ProgramError::InvalidSeeds)?;
        if *account.key != expected {
            msg!("🚨 SECURITY: Invalid asset ledger PDA for {}", asset);
            return Err(FeeRouterError::InvalidAccount.into());
        }

        Ok(Some(ledger))
    }

    pub fn find_address(asset: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[ASSET_LEDGER_SEED_PREFIX, asset.as_ref()], program_id)
    }

    /// Credits a successful collection to both the pending balance and the
    /// lifetime total. Nothing changes if either addition would overflow.
    pub fn credit(&mut self, amount: u64) -> Result<(), FeeRouterError> {
        if amount == 0 {
            return Err(FeeRouterError::InvalidAmount);
        }
        let pending = self
            .pending_fees
            .checked_add(amount)
            .ok_or(FeeRouterError::ArithmeticOverflow)?;
        let total = self
            .total_fees_collected
            .checked_add(amount)
            .ok_or(FeeRouterError::ArithmeticOverflow)?;
        self.pending_fees = pending;
        self.total_fees_collected = total;
        Ok(())
    }

    /// True iff a threshold is set and the pending balance has reached it.
    pub fn should_auto_forward(&self) -> bool {
        self.distribution_threshold > 0 && self.pending_fees >= self.distribution_threshold
    }

    /// Zeroes the pending balance and returns the amount to hand to the treasury.
    pub fn take_pending(&mut self, timestamp: i64) -> Result<u64, FeeRouterError> {
        let amount = self.pending_fees;
        if amount == 0 {
            return Err(FeeRouterError::NothingToForward);
        }
        self.pending_fees = 0;
        self.total_forwarded = self.total_forwarded.saturating_add(amount);
        self.forward_count = self.forward_count.saturating_add(1);
        self.last_forward_timestamp = timestamp;
        Ok(amount)
    }

    /// Replaces the threshold and returns the previous one.
    pub fn set_threshold(&mut self, threshold: u64) -> u64 {
        std::mem::replace(&mut self.distribution_threshold, threshold)
    }

    /// Lowers the pending balance to `custody` if it exceeds it.
    ///
    /// Returns the amount removed from pending, if any.
    pub fn clamp_pending_to_custody(&mut self, custody: u64) -> Option<u64> {
        if self.pending_fees > custody {
            let removed = self.pending_fees - custody;
            self.pending_fees = custody;
            Some(removed)
        } else {
            None
        }
    }
}
