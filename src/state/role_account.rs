//! Capability (role) storage
//!
//! Each principal that has ever been granted a capability owns a `RoleAccount`
//! PDA holding a bitmask of [`Role`] values. Market authorization is the
//! `Market` bit of that mask, so "authorized market" and "holds the Market
//! capability" are the same stored fact.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{constants::ROLE_SEED_PREFIX, error::FeeRouterError};

/// Capabilities a principal may hold. One principal may hold several.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Manages markets, roles, treasury; performs emergency withdrawals
    Admin,
    /// Forwards fees, sets thresholds, registers assets
    Operator,
    /// Pauses and unpauses fee intake
    Pauser,
    /// Replaces the program code
    Upgrader,
    /// Credits fees into the router
    Market,
}

impl Role {
    /// Roles granted to the admin named at initialization.
    pub const ADMIN_DEFAULTS: [Role; 4] = [Role::Admin, Role::Operator, Role::Pauser, Role::Upgrader];

    pub fn bit(&self) -> u8 {
        match self {
            Role::Admin => 1 << 0,
            Role::Operator => 1 << 1,
            Role::Pauser => 1 << 2,
            Role::Upgrader => 1 << 3,
            Role::Market => 1 << 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Operator => "OPERATOR",
            Role::Pauser => "PAUSER",
            Role::Upgrader => "UPGRADER",
            Role::Market => "MARKET",
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoleAccount {
    pub is_initialized: bool,
    pub principal: Pubkey,
    /// Bitmask of `Role::bit()` values
    pub roles: u8,
    pub bump: u8,
    pub last_updated: i64,
}

impl RoleAccount {
    pub const LEN: usize = 1 + 32 + 1 + 1 + 8; // 43 bytes

    pub fn new(principal: Pubkey, bump: u8, timestamp: i64) -> Self {
        Self {
            is_initialized: true,
            principal,
            roles: 0,
            bump,
            last_updated: timestamp,
        }
    }

    pub fn find_address(principal: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[ROLE_SEED_PREFIX, principal.as_ref()], program_id)
    }

    /// Loads the role account of `principal` if it exists.
    ///
    /// The account must sit at the principal's PDA; an empty account there
    /// means the principal holds no capabilities.
    pub fn load_optional(
        account: &AccountInfo,
        program_id: &Pubkey,
        principal: &Pubkey,
    ) -> Result<Option<Self>, ProgramError> {
        let (expected, _) = Self::find_address(principal, program_id);
        if *account.key != expected {
            msg!("❌ Invalid role account for {}", principal);
            msg!("   Expected: {}, Provided: {}", expected, account.key);
            return Err(FeeRouterError::InvalidAccount.into());
        }

        if account.owner != program_id || account.data_is_empty() {
            return Ok(None);
        }

        let role_account = {
            let data = account.data.borrow();
            Self::deserialize(&mut &data[..]).map_err(|e| {
                msg!("❌ RoleAccount deserialization failed: {:?}", e);
                ProgramError::InvalidAccountData
            })?
        };

        if !role_account.is_initialized || role_account.principal != *principal {
            return Ok(None);
        }
        Ok(Some(role_account))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles & role.bit() != 0
    }

    /// Adds `role`; returns false when it was already held.
    pub fn grant(&mut self, role: Role, timestamp: i64) -> bool {
        if self.has_role(role) {
            return false;
        }
        self.roles |= role.bit();
        self.last_updated = timestamp;
        true
    }

    /// Removes `role`; returns false when it was not held.
    pub fn revoke(&mut self, role: Role, timestamp: i64) -> bool {
        if !self.has_role(role) {
            return false;
        }
        self.roles &= !role.bit();
        self.last_updated = timestamp;
        true
    }
}
