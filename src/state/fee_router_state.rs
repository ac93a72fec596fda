//! Global fee router state
//!
//! A single `FeeRouterState` PDA holds everything that is not keyed by an
//! asset or a principal: the treasury destination, the intake pause gate, the
//! reentrancy lock and a few counters. Per-asset balances live in
//! [`crate::state::AssetLedger`] and capabilities in [`crate::state::RoleAccount`].

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::{CURRENT_LAYOUT_VERSION, FEE_ROUTER_STATE_SEED_PREFIX},
    error::FeeRouterError,
};

/// Global state of the fee router.
///
/// **Layout stability**: fields are only ever appended by consuming bytes of
/// `reserved`. Existing fields keep their offset and meaning across program
/// upgrades; `layout_version` records which layout wrote the account.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeeRouterState {
    /// Storage schema version (see `CURRENT_LAYOUT_VERSION`)
    pub layout_version: u8,

    /// Set once by `Initialize`
    pub is_initialized: bool,

    /// Destination for forwarded fees. Never the default key.
    pub treasury: Pubkey,

    /// Global intake gate - when true, fee collection is rejected
    pub is_paused: bool,

    /// Unix timestamp of the last pause (0 when not paused)
    pub pause_timestamp: i64,

    /// Held for the duration of any instruction that moves value out of custody
    pub reentrancy_locked: bool,

    /// Number of principals holding the Admin capability
    pub admin_count: u32,

    /// Number of principals holding the Market capability
    pub authorized_market_count: u32,

    /// Number of assets with an initialized ledger
    pub registered_asset_count: u32,

    /// Bump seed of this PDA
    pub state_bump: u8,

    /// Bump seed of the native SOL vault PDA
    pub native_vault_bump: u8,

    /// Zeroed space for future fields
    pub reserved: [u8; 64],
}

impl FeeRouterState {
    /// Serialized size:
    /// - layout_version: 1
    /// - is_initialized: 1
    /// - treasury: 32
    /// - is_paused: 1
    /// - pause_timestamp: 8
    /// - reentrancy_locked: 1
    /// - admin_count, authorized_market_count, registered_asset_count: 3 * 4
    /// - state_bump, native_vault_bump: 2
    /// - reserved: 64
    pub const LEN: usize = 1 + 1 + 32 + 1 + 8 + 1 + 12 + 2 + 64; // 122 bytes

    pub fn new(treasury: Pubkey, state_bump: u8, native_vault_bump: u8) -> Self {
        Self {
            layout_version: CURRENT_LAYOUT_VERSION,
            is_initialized: true,
            treasury,
            is_paused: false,
            pause_timestamp: 0,
            reentrancy_locked: false,
            admin_count: 0,
            authorized_market_count: 0,
            registered_asset_count: 0,
            state_bump,
            native_vault_bump,
            reserved: [0u8; 64],
        }
    }

    /// Checks that a stored layout version can be read by this program version.
    ///
    /// Only the current layout exists today; anything else (including layouts
    /// written by a newer program) is rejected rather than misread.
    pub fn check_layout_compatibility(stored_version: u8) -> Result<(), FeeRouterError> {
        if stored_version != CURRENT_LAYOUT_VERSION {
            return Err(FeeRouterError::IncompatibleLayout);
        }
        Ok(())
    }

    /// Loads the state from its PDA, validating owner, address and layout.
    pub fn load_from_account(
        account: &AccountInfo,
        program_id: &Pubkey,
    ) -> Result<Self, ProgramError> {
        if account.owner != program_id || account.data_is_empty() {
            msg!("❌ Fee router state {} is not initialized", account.key);
            return Err(FeeRouterError::NotInitialized.into());
        }

        let state = {
            let data = account.data.borrow();
            Self::deserialize(&mut &data[..]).map_err(|e| {
                msg!("❌ FeeRouterState deserialization failed: {:?}", e);
                ProgramError::InvalidAccountData
            })?
        };

        if !state.is_initialized {
            return Err(FeeRouterError::NotInitialized.into());
        }
        Self::check_layout_compatibility(state.layout_version)?;

        let expected = Pubkey::create_program_address(
            &[FEE_ROUTER_STATE_SEED_PREFIX, &[state.state_bump]],
            program_id,
        )
        .map_err(|_| ProgramError::InvalidSeeds)?;
        if *account.key != expected {
            msg!("🚨 SECURITY: Invalid fee router state PDA");
            msg!("Expected: {}, Provided: {}", expected, account.key);
            return Err(FeeRouterError::InvalidAccount.into());
        }

        Ok(state)
    }

    /// Fails with `Paused` while fee intake is halted.
    pub fn ensure_not_paused(&self) -> Result<(), FeeRouterError> {
        if self.is_paused {
            return Err(FeeRouterError::Paused);
        }
        Ok(())
    }

    /// Fails with `NotPaused` unless fee intake is halted.
    pub fn ensure_paused(&self) -> Result<(), FeeRouterError> {
        if !self.is_paused {
            return Err(FeeRouterError::NotPaused);
        }
        Ok(())
    }

    pub fn pause(&mut self, timestamp: i64) -> Result<(), FeeRouterError> {
        self.ensure_not_paused()?;
        self.is_paused = true;
        self.pause_timestamp = timestamp;
        Ok(())
    }

    pub fn unpause(&mut self) -> Result<(), FeeRouterError> {
        self.ensure_paused()?;
        self.is_paused = false;
        self.pause_timestamp = 0;
        Ok(())
    }

    /// Takes the reentrancy lock.
    pub fn acquire_lock(&mut self) -> Result<(), FeeRouterError> {
        if self.reentrancy_locked {
            return Err(FeeRouterError::Reentrant);
        }
        self.reentrancy_locked = true;
        Ok(())
    }

    pub fn release_lock(&mut self) {
        self.reentrancy_locked = false;
    }

    /// Fails with `Reentrant` if another value-moving instruction holds the lock.
    pub fn ensure_unlocked(&self) -> Result<(), FeeRouterError> {
        if self.reentrancy_locked {
            return Err(FeeRouterError::Reentrant);
        }
        Ok(())
    }

    /// Replaces the treasury and returns the previous one.
    pub fn set_treasury(&mut self, new_treasury: Pubkey) -> Result<Pubkey, FeeRouterError> {
        if new_treasury == Pubkey::default() {
            return Err(FeeRouterError::InvalidAddress);
        }
        Ok(std::mem::replace(&mut self.treasury, new_treasury))
    }

    pub fn record_admin_added(&mut self) -> Result<(), FeeRouterError> {
        self.admin_count = self
            .admin_count
            .checked_add(1)
            .ok_or(FeeRouterError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Records the loss of an admin; the last admin can never be removed.
    pub fn record_admin_removed(&mut self) -> Result<(), FeeRouterError> {
        if self.admin_count <= 1 {
            return Err(FeeRouterError::LastAdmin);
        }
        self.admin_count -= 1;
        Ok(())
    }

    pub fn record_market_authorization(&mut self, authorized: bool) -> Result<(), FeeRouterError> {
        self.authorized_market_count = if authorized {
            self.authorized_market_count
                .checked_add(1)
                .ok_or(FeeRouterError::ArithmeticOverflow)?
        } else {
            self.authorized_market_count
                .checked_sub(1)
                .ok_or(FeeRouterError::ArithmeticOverflow)?
        };
        Ok(())
    }

    pub fn record_asset_registered(&mut self) -> Result<(), FeeRouterError> {
        self.registered_asset_count = self
            .registered_asset_count
            .checked_add(1)
            .ok_or(FeeRouterError::ArithmeticOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> FeeRouterState {
        FeeRouterState::new(Pubkey::new_unique(), 254, 253)
    }

    #[test]
    fn test_len_matches_serialized_size() {
        let state = sample_state();
        assert_eq!(state.try_to_vec().unwrap().len(), FeeRouterState::LEN);
    }

    #[test]
    fn test_pause_and_unpause_gating() {
        let mut state = sample_state();
        assert!(state.ensure_not_paused().is_ok());
        assert_eq!(state.ensure_paused(), Err(FeeRouterError::NotPaused));

        state.pause(1_700_000_000).unwrap();
        assert!(state.is_paused);
        assert_eq!(state.pause_timestamp, 1_700_000_000);
        assert_eq!(state.ensure_not_paused(), Err(FeeRouterError::Paused));
        assert_eq!(state.pause(1_700_000_001), Err(FeeRouterError::Paused));

        state.unpause().unwrap();
        assert!(!state.is_paused);
        assert_eq!(state.pause_timestamp, 0);
        assert_eq!(state.unpause(), Err(FeeRouterError::NotPaused));
    }

    #[test]
    fn test_reentrancy_lock_rejects_nested_acquire() {
        let mut state = sample_state();
        state.acquire_lock().unwrap();
        assert_eq!(state.acquire_lock(), Err(FeeRouterError::Reentrant));
        assert_eq!(state.ensure_unlocked(), Err(FeeRouterError::Reentrant));

        state.release_lock();
        assert!(state.ensure_unlocked().is_ok());
        assert!(state.acquire_lock().is_ok());
    }

    #[test]
    fn test_set_treasury_rejects_default_key() {
        let mut state = sample_state();
        let original = state.treasury;
        assert_eq!(state.set_treasury(Pubkey::default()), Err(FeeRouterError::InvalidAddress));
        assert_eq!(state.treasury, original);

        let replacement = Pubkey::new_unique();
        assert_eq!(state.set_treasury(replacement), Ok(original));
        assert_eq!(state.treasury, replacement);
    }

    #[test]
    fn test_last_admin_cannot_be_removed() {
        let mut state = sample_state();
        state.record_admin_added().unwrap();
        assert_eq!(state.record_admin_removed(), Err(FeeRouterError::LastAdmin));

        state.record_admin_added().unwrap();
        state.record_admin_removed().unwrap();
        assert_eq!(state.admin_count, 1);
    }

    #[test]
    fn test_layout_compatibility() {
        assert!(FeeRouterState::check_layout_compatibility(CURRENT_LAYOUT_VERSION).is_ok());
        assert_eq!(
            FeeRouterState::check_layout_compatibility(CURRENT_LAYOUT_VERSION + 1),
            Err(FeeRouterError::IncompatibleLayout)
        );
    }
}
