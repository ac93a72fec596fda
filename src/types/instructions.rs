//! Fee Router Instructions
//!
//! This module contains all the instruction definitions for the Fee Router Program.
//! Account lists are documented per variant and mirrored by the builders in
//! [`crate::client_sdk`].

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::state::Role;

/// All supported instructions for the Fee Router Program.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum FeeRouterInstruction {
    /// Creates the router state, the native vault, the native asset ledger and
    /// the admin's role account (holding Admin, Operator, Pauser, Upgrader).
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Program upgrade authority (payer)
    /// 1. `[writable]` Fee router state PDA
    /// 2. `[writable]` Native vault PDA
    /// 3. `[writable]` Native asset ledger PDA
    /// 4. `[writable]` Admin role PDA
    /// 5. `[]` System program
    /// 6. `[]` Program data account
    Initialize { treasury: Pubkey, admin: Pubkey },

    /// Creates the ledger for a token asset and its vault token account.
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Operator (payer)
    /// 1. `[]` Operator role PDA
    /// 2. `[writable]` Fee router state PDA
    /// 3. `[writable]` Asset ledger PDA
    /// 4. `[writable]` Vault token account (ATA of the state PDA)
    /// 5. `[]` Token mint
    /// 6. `[]` System program
    /// 7. `[]` SPL Token program
    /// 8. `[]` Associated Token Account program
    RegisterAsset { asset: Pubkey, threshold: u64 },

    /// Pulls `amount` of `asset` from the market into custody and credits it.
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Market
    /// 1. `[]` Market role PDA
    /// 2. `[writable]` Fee router state PDA
    /// 3. `[]` System program
    /// 4. `[]` SPL Token program
    /// 5. `[writable]` Asset ledger PDA
    /// 6. `[writable]` Vault (native vault PDA or vault token account)
    /// 7. `[writable]` Source (the market itself for SOL, else its token account)
    /// 8. `[writable]` Treasury destination (treasury wallet for SOL, else a
    ///    token account owned by the treasury); only checked when the
    ///    collection triggers an auto-forward
    CollectFee { asset: Pubkey, amount: u64 },

    /// Pairwise `CollectFee`; all-or-nothing.
    ///
    /// Accounts: 0-4 as `CollectFee`, then accounts 5-8 of `CollectFee`
    /// repeated once per asset, in order.
    BatchCollectFees { assets: Vec<Pubkey>, amounts: Vec<u64> },

    /// Moves the full pending balance of `asset` to the treasury.
    ///
    /// Accounts:
    /// 0. `[signer]` Operator
    /// 1. `[]` Operator role PDA
    /// 2. `[writable]` Fee router state PDA
    /// 3. `[]` SPL Token program
    /// 4. `[writable]` Asset ledger PDA
    /// 5. `[writable]` Vault
    /// 6. `[writable]` Treasury destination
    ForwardToTreasury { asset: Pubkey },

    /// `ForwardToTreasury` for every asset, skipping zero pending balances.
    /// The vault and destination of a skipped asset are not checked.
    ///
    /// Accounts: 0-3 as `ForwardToTreasury`, then accounts 4-6 repeated once
    /// per asset, in order.
    BatchForwardToTreasury { assets: Vec<Pubkey> },

    /// Adds or removes a market from the authorized set.
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Admin (payer)
    /// 1. `[]` Admin role PDA
    /// 2. `[writable]` Fee router state PDA
    /// 3. `[]` System program
    /// 4. `[writable]` Market role PDA
    SetMarketAuthorization { market: Pubkey, authorized: bool },

    /// Applies one authorization value to every market; default keys are skipped.
    ///
    /// Accounts: 0-3 as `SetMarketAuthorization`, then one market role PDA per
    /// non-default market, in order.
    BatchSetMarketAuthorization { markets: Vec<Pubkey>, authorized: bool },

    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[]` Admin role PDA
    /// 2. `[writable]` Fee router state PDA
    SetTreasury { new_treasury: Pubkey },

    /// Sets the auto-forward threshold for `asset`; 0 disables auto-forward.
    ///
    /// Accounts:
    /// 0. `[signer]` Operator
    /// 1. `[]` Operator role PDA
    /// 2. `[]` Fee router state PDA
    /// 3. `[writable]` Asset ledger PDA
    SetDistributionThreshold { asset: Pubkey, threshold: u64 },

    /// Accounts:
    /// 0. `[signer]` Pauser
    /// 1. `[]` Pauser role PDA
    /// 2. `[writable]` Fee router state PDA
    Pause,

    /// Accounts: same as `Pause`
    Unpause,

    /// Raw custody sweep, only while paused.
    ///
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[]` Admin role PDA
    /// 2. `[writable]` Fee router state PDA
    /// 3. `[]` SPL Token program
    /// 4. `[writable]` Asset ledger PDA (may be uninitialized)
    /// 5. `[writable]` Vault
    /// 6. `[writable]` Recipient destination (the recipient for SOL, else a
    ///    token account owned by the recipient)
    EmergencyWithdraw { asset: Pubkey, amount: u64, recipient: Pubkey },

    /// Accounts:
    /// 0. `[signer, writable]` Admin (payer)
    /// 1. `[]` Admin role PDA
    /// 2. `[writable]` Fee router state PDA
    /// 3. `[]` System program
    /// 4. `[writable]` Principal role PDA
    GrantRole { principal: Pubkey, role: Role },

    /// Accounts: same as `GrantRole`
    RevokeRole { principal: Pubkey, role: Role },

    /// Removes a role from the signer itself.
    ///
    /// Accounts:
    /// 0. `[signer]` Principal
    /// 1. `[writable]` Principal role PDA
    /// 2. `[writable]` Fee router state PDA
    RenounceRole { role: Role },

    /// Replaces the program code from a buffer.
    ///
    /// Accounts:
    /// 0. `[signer]` Upgrader
    /// 1. `[]` Upgrader role PDA
    /// 2. `[]` Fee router state PDA
    /// 3. `[writable]` Program data account
    /// 4. `[writable]` Program account
    /// 5. `[writable]` Buffer account
    /// 6. `[writable]` Spill account
    /// 7. `[]` Upgrade authority PDA
    /// 8. `[]` Rent sysvar
    /// 9. `[]` Clock sysvar
    /// 10. `[]` BPF upgradeable loader
    UpgradeProgram,

    /// **VIEW INSTRUCTION**: returns `u64` pending fees.
    ///
    /// Accounts:
    /// 0. `[]` Asset ledger PDA
    GetPendingFees { asset: Pubkey },

    /// **VIEW INSTRUCTION**: returns `u64` lifetime total.
    ///
    /// Accounts: same as `GetPendingFees`
    GetTotalFeesCollected { asset: Pubkey },

    /// **VIEW INSTRUCTION**: returns `bool`.
    ///
    /// Accounts: same as `GetPendingFees`
    ShouldAutoForward { asset: Pubkey },

    /// **VIEW INSTRUCTION**: returns `u64` custodied balance.
    ///
    /// Accounts:
    /// 0. `[]` Vault
    GetBalance { asset: Pubkey },

    /// **VIEW INSTRUCTION**: returns [`LedgerInfo`].
    ///
    /// Accounts:
    /// 0. `[]` Fee router state PDA
    GetLedgerInfo,
}

/// Snapshot of the router state published by `GetLedgerInfo`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct LedgerInfo {
    pub treasury: Pubkey,
    pub is_paused: bool,
    pub admin_count: u32,
    pub authorized_market_count: u32,
    pub registered_asset_count: u32,
    pub layout_version: u8,
}
