/*
MIT License

Copyright (c) 2024 Davinci

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! # Fee Router - Client SDK
//!
//! This module provides a high-level client SDK for interacting with the Fee Router program.
//! It derives every program address and builds each instruction with the account
//! ordering the processors expect.
//!
//! ## Features
//! - Address derivation for PDAs (Program Derived Addresses) and vaults
//! - Instruction building for all fee router operations
//! - Batch builders that lay out per-entry account groups
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fee_router::client_sdk::FeeRouterClient;
//! use fee_router::NATIVE_ASSET;
//! use solana_program::pubkey::Pubkey;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FeeRouterClient::new(fee_router::id());
//! let market = Pubkey::new_unique();
//! let treasury = Pubkey::new_unique();
//!
//! // Pay 0.05 SOL of fees from a market
//! let instruction = client.collect_fee(&market, &NATIVE_ASSET, 50_000_000, &market, &treasury)?;
//! # let _ = instruction;
//! # Ok(())
//! # }
//! ```

use borsh::BorshSerialize;
use solana_program::{
    bpf_loader_upgradeable,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};
use spl_associated_token_account::get_associated_token_address;

use crate::{
    constants::{FEE_ROUTER_STATE_SEED_PREFIX, MAX_BATCH_SIZE},
    state::{AssetLedger, Role, RoleAccount},
    types::FeeRouterInstruction,
    utils::{
        custody::{find_native_vault_address, is_native},
        program_authority::{find_upgrade_authority_address, get_program_data_address},
    },
};

/// Errors that can occur when building instructions
#[derive(Debug)]
pub enum FeeRouterClientError {
    /// Batch is larger than `MAX_BATCH_SIZE`
    InvalidBatchSize(usize),
    /// Error during instruction serialization
    SerializationError,
}

impl From<std::io::Error> for FeeRouterClientError {
    fn from(_error: std::io::Error) -> Self {
        Self::SerializationError
    }
}

impl std::fmt::Display for FeeRouterClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeRouterClientError::InvalidBatchSize(len) => {
                write!(f, "Invalid batch size {}: at most {} entries", len, MAX_BATCH_SIZE)
            }
            FeeRouterClientError::SerializationError => write!(f, "Failed to serialize instruction data"),
        }
    }
}

impl std::error::Error for FeeRouterClientError {}

/// One fee payment inside a batch collection.
#[derive(Debug, Clone)]
pub struct CollectEntry {
    pub asset: Pubkey,
    pub amount: u64,
    /// The market itself for SOL, else the market's token account
    pub source: Pubkey,
    /// The treasury for SOL, else a treasury-owned token account
    pub treasury_destination: Pubkey,
}

/// One asset inside a batch forward.
#[derive(Debug, Clone)]
pub struct ForwardEntry {
    pub asset: Pubkey,
    pub treasury_destination: Pubkey,
}

/// Well-known addresses of a fee router deployment
#[derive(Debug, Clone)]
pub struct FeeRouterAddresses {
    pub state: Pubkey,
    pub state_bump: u8,
    pub native_vault: Pubkey,
    pub native_vault_bump: u8,
    pub upgrade_authority: Pubkey,
    pub program_data: Pubkey,
}

/// High-level client for building fee router instructions
pub struct FeeRouterClient {
    /// The program ID of the deployed fee router program
    program_id: Pubkey,
}

impl FeeRouterClient {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Derives the router-wide addresses.
    pub fn derive_addresses(&self) -> FeeRouterAddresses {
        let (state, state_bump) =
            Pubkey::find_program_address(&[FEE_ROUTER_STATE_SEED_PREFIX], &self.program_id);
        let (native_vault, native_vault_bump) = find_native_vault_address(&self.program_id);
        FeeRouterAddresses {
            state,
            state_bump,
            native_vault,
            native_vault_bump,
            upgrade_authority: find_upgrade_authority_address(&self.program_id).0,
            program_data: get_program_data_address(&self.program_id),
        }
    }

    pub fn state_address(&self) -> Pubkey {
        self.derive_addresses().state
    }

    pub fn asset_ledger_address(&self, asset: &Pubkey) -> Pubkey {
        AssetLedger::find_address(asset, &self.program_id).0
    }

    pub fn role_address(&self, principal: &Pubkey) -> Pubkey {
        RoleAccount::find_address(principal, &self.program_id).0
    }

    /// Custody account for `asset`: the native vault PDA for SOL, else the
    /// state PDA's associated token account.
    pub fn vault_address(&self, asset: &Pubkey) -> Pubkey {
        if is_native(asset) {
            find_native_vault_address(&self.program_id).0
        } else {
            get_associated_token_address(&self.state_address(), asset)
        }
    }

    /// Default destination for `asset` owned by `owner`: `owner` itself for
    /// SOL, else its associated token account.
    pub fn destination_for(owner: &Pubkey, asset: &Pubkey) -> Pubkey {
        if is_native(asset) {
            *owner
        } else {
            get_associated_token_address(owner, asset)
        }
    }

    fn build(
        &self,
        instruction: FeeRouterInstruction,
        accounts: Vec<AccountMeta>,
    ) -> Result<Instruction, FeeRouterClientError> {
        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data: instruction.try_to_vec()?,
        })
    }

    fn check_batch(len: usize) -> Result<(), FeeRouterClientError> {
        if len > MAX_BATCH_SIZE {
            return Err(FeeRouterClientError::InvalidBatchSize(len));
        }
        Ok(())
    }

    /// Creates the Initialize instruction. `payer` must be the program's
    /// upgrade authority.
    pub fn initialize(
        &self,
        payer: &Pubkey,
        treasury: &Pubkey,
        admin: &Pubkey,
    ) -> Result<Instruction, FeeRouterClientError> {
        let addresses = self.derive_addresses();
        self.build(
            FeeRouterInstruction::Initialize {
                treasury: *treasury,
                admin: *admin,
            },
            vec![
                AccountMeta::new(*payer, true),
                AccountMeta::new(addresses.state, false),
                AccountMeta::new(addresses.native_vault, false),
                AccountMeta::new(self.asset_ledger_address(&crate::NATIVE_ASSET), false),
                AccountMeta::new(self.role_address(admin), false),
                AccountMeta::new_readonly(system_program::id(), false),
                AccountMeta::new_readonly(addresses.program_data, false),
            ],
        )
    }

    pub fn register_asset(
        &self,
        operator: &Pubkey,
        mint: &Pubkey,
        threshold: u64,
    ) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::RegisterAsset {
                asset: *mint,
                threshold,
            },
            vec![
                AccountMeta::new(*operator, true),
                AccountMeta::new_readonly(self.role_address(operator), false),
                AccountMeta::new(self.state_address(), false),
                AccountMeta::new(self.asset_ledger_address(mint), false),
                AccountMeta::new(self.vault_address(mint), false),
                AccountMeta::new_readonly(*mint, false),
                AccountMeta::new_readonly(system_program::id(), false),
                AccountMeta::new_readonly(spl_token::id(), false),
                AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            ],
        )
    }

    fn collect_prefix(&self, market: &Pubkey) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*market, true),
            AccountMeta::new_readonly(self.role_address(market), false),
            AccountMeta::new(self.state_address(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ]
    }

    fn collect_group(&self, market: &Pubkey, entry: &CollectEntry) -> Vec<AccountMeta> {
        let source = if entry.source == *market {
            // Already present as the signing market
            AccountMeta::new(entry.source, true)
        } else {
            AccountMeta::new(entry.source, false)
        };
        vec![
            AccountMeta::new(self.asset_ledger_address(&entry.asset), false),
            AccountMeta::new(self.vault_address(&entry.asset), false),
            source,
            AccountMeta::new(entry.treasury_destination, false),
        ]
    }

    /// Creates a CollectFee instruction.
    ///
    /// # Arguments
    /// * `market` - Authorized market paying the fee (signer)
    /// * `asset` - [`crate::NATIVE_ASSET`] or a registered mint
    /// * `amount` - Fee amount in base units
    /// * `source` - `market` for SOL, else the market's token account
    /// * `treasury_destination` - Treasury for SOL, else a treasury token account
    pub fn collect_fee(
        &self,
        market: &Pubkey,
        asset: &Pubkey,
        amount: u64,
        source: &Pubkey,
        treasury_destination: &Pubkey,
    ) -> Result<Instruction, FeeRouterClientError> {
        let entry = CollectEntry {
            asset: *asset,
            amount,
            source: *source,
            treasury_destination: *treasury_destination,
        };
        let mut accounts = self.collect_prefix(market);
        accounts.extend(self.collect_group(market, &entry));
        self.build(
            FeeRouterInstruction::CollectFee {
                asset: *asset,
                amount,
            },
            accounts,
        )
    }

    pub fn batch_collect_fees(
        &self,
        market: &Pubkey,
        entries: &[CollectEntry],
    ) -> Result<Instruction, FeeRouterClientError> {
        Self::check_batch(entries.len())?;
        let mut accounts = self.collect_prefix(market);
        for entry in entries {
            accounts.extend(self.collect_group(market, entry));
        }
        self.build(
            FeeRouterInstruction::BatchCollectFees {
                assets: entries.iter().map(|e| e.asset).collect(),
                amounts: entries.iter().map(|e| e.amount).collect(),
            },
            accounts,
        )
    }

    fn forward_prefix(&self, operator: &Pubkey) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(*operator, true),
            AccountMeta::new_readonly(self.role_address(operator), false),
            AccountMeta::new(self.state_address(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ]
    }

    fn forward_group(&self, entry: &ForwardEntry) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.asset_ledger_address(&entry.asset), false),
            AccountMeta::new(self.vault_address(&entry.asset), false),
            AccountMeta::new(entry.treasury_destination, false),
        ]
    }

    pub fn forward_to_treasury(
        &self,
        operator: &Pubkey,
        asset: &Pubkey,
        treasury_destination: &Pubkey,
    ) -> Result<Instruction, FeeRouterClientError> {
        let mut accounts = self.forward_prefix(operator);
        accounts.extend(self.forward_group(&ForwardEntry {
            asset: *asset,
            treasury_destination: *treasury_destination,
        }));
        self.build(FeeRouterInstruction::ForwardToTreasury { asset: *asset }, accounts)
    }

    pub fn batch_forward_to_treasury(
        &self,
        operator: &Pubkey,
        entries: &[ForwardEntry],
    ) -> Result<Instruction, FeeRouterClientError> {
        Self::check_batch(entries.len())?;
        let mut accounts = self.forward_prefix(operator);
        for entry in entries {
            accounts.extend(self.forward_group(entry));
        }
        self.build(
            FeeRouterInstruction::BatchForwardToTreasury {
                assets: entries.iter().map(|e| e.asset).collect(),
            },
            accounts,
        )
    }

    fn management_prefix(&self, admin: &Pubkey) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(self.role_address(admin), false),
            AccountMeta::new(self.state_address(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ]
    }

    pub fn set_market_authorization(
        &self,
        admin: &Pubkey,
        market: &Pubkey,
        authorized: bool,
    ) -> Result<Instruction, FeeRouterClientError> {
        let mut accounts = self.management_prefix(admin);
        accounts.push(AccountMeta::new(self.role_address(market), false));
        self.build(
            FeeRouterInstruction::SetMarketAuthorization {
                market: *market,
                authorized,
            },
            accounts,
        )
    }

    /// Default keys in `markets` are passed through and skipped on chain;
    /// they take no role account slot.
    pub fn batch_set_market_authorization(
        &self,
        admin: &Pubkey,
        markets: &[Pubkey],
        authorized: bool,
    ) -> Result<Instruction, FeeRouterClientError> {
        Self::check_batch(markets.len())?;
        let mut accounts = self.management_prefix(admin);
        for market in markets.iter().filter(|m| **m != Pubkey::default()) {
            accounts.push(AccountMeta::new(self.role_address(market), false));
        }
        self.build(
            FeeRouterInstruction::BatchSetMarketAuthorization {
                markets: markets.to_vec(),
                authorized,
            },
            accounts,
        )
    }

    pub fn set_treasury(
        &self,
        admin: &Pubkey,
        new_treasury: &Pubkey,
    ) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::SetTreasury {
                new_treasury: *new_treasury,
            },
            vec![
                AccountMeta::new_readonly(*admin, true),
                AccountMeta::new_readonly(self.role_address(admin), false),
                AccountMeta::new(self.state_address(), false),
            ],
        )
    }

    pub fn set_distribution_threshold(
        &self,
        operator: &Pubkey,
        asset: &Pubkey,
        threshold: u64,
    ) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::SetDistributionThreshold {
                asset: *asset,
                threshold,
            },
            vec![
                AccountMeta::new_readonly(*operator, true),
                AccountMeta::new_readonly(self.role_address(operator), false),
                AccountMeta::new_readonly(self.state_address(), false),
                AccountMeta::new(self.asset_ledger_address(asset), false),
            ],
        )
    }

    fn pause_accounts(&self, pauser: &Pubkey) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(*pauser, true),
            AccountMeta::new_readonly(self.role_address(pauser), false),
            AccountMeta::new(self.state_address(), false),
        ]
    }

    pub fn pause(&self, pauser: &Pubkey) -> Result<Instruction, FeeRouterClientError> {
        self.build(FeeRouterInstruction::Pause, self.pause_accounts(pauser))
    }

    pub fn unpause(&self, pauser: &Pubkey) -> Result<Instruction, FeeRouterClientError> {
        self.build(FeeRouterInstruction::Unpause, self.pause_accounts(pauser))
    }

    /// Creates an EmergencyWithdraw instruction.
    ///
    /// `recipient_destination` is `recipient` for SOL, else a token account
    /// owned by `recipient`.
    pub fn emergency_withdraw(
        &self,
        admin: &Pubkey,
        asset: &Pubkey,
        amount: u64,
        recipient: &Pubkey,
        recipient_destination: &Pubkey,
    ) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::EmergencyWithdraw {
                asset: *asset,
                amount,
                recipient: *recipient,
            },
            vec![
                AccountMeta::new_readonly(*admin, true),
                AccountMeta::new_readonly(self.role_address(admin), false),
                AccountMeta::new(self.state_address(), false),
                AccountMeta::new_readonly(spl_token::id(), false),
                AccountMeta::new(self.asset_ledger_address(asset), false),
                AccountMeta::new(self.vault_address(asset), false),
                AccountMeta::new(*recipient_destination, false),
            ],
        )
    }

    pub fn grant_role(
        &self,
        admin: &Pubkey,
        principal: &Pubkey,
        role: Role,
    ) -> Result<Instruction, FeeRouterClientError> {
        let mut accounts = self.management_prefix(admin);
        accounts.push(AccountMeta::new(self.role_address(principal), false));
        self.build(
            FeeRouterInstruction::GrantRole {
                principal: *principal,
                role,
            },
            accounts,
        )
    }

    pub fn revoke_role(
        &self,
        admin: &Pubkey,
        principal: &Pubkey,
        role: Role,
    ) -> Result<Instruction, FeeRouterClientError> {
        let mut accounts = self.management_prefix(admin);
        accounts.push(AccountMeta::new(self.role_address(principal), false));
        self.build(
            FeeRouterInstruction::RevokeRole {
                principal: *principal,
                role,
            },
            accounts,
        )
    }

    pub fn renounce_role(
        &self,
        principal: &Pubkey,
        role: Role,
    ) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::RenounceRole { role },
            vec![
                AccountMeta::new_readonly(*principal, true),
                AccountMeta::new(self.role_address(principal), false),
                AccountMeta::new(self.state_address(), false),
            ],
        )
    }

    /// Creates an UpgradeProgram instruction replacing the code with `buffer`.
    pub fn upgrade_program(
        &self,
        upgrader: &Pubkey,
        buffer: &Pubkey,
        spill: &Pubkey,
    ) -> Result<Instruction, FeeRouterClientError> {
        let addresses = self.derive_addresses();
        self.build(
            FeeRouterInstruction::UpgradeProgram,
            vec![
                AccountMeta::new_readonly(*upgrader, true),
                AccountMeta::new_readonly(self.role_address(upgrader), false),
                AccountMeta::new_readonly(addresses.state, false),
                AccountMeta::new(addresses.program_data, false),
                AccountMeta::new(self.program_id, false),
                AccountMeta::new(*buffer, false),
                AccountMeta::new(*spill, false),
                AccountMeta::new_readonly(addresses.upgrade_authority, false),
                AccountMeta::new_readonly(sysvar::rent::id(), false),
                AccountMeta::new_readonly(sysvar::clock::id(), false),
                AccountMeta::new_readonly(bpf_loader_upgradeable::id(), false),
            ],
        )
    }

    // **VIEW INSTRUCTIONS**

    pub fn get_pending_fees(&self, asset: &Pubkey) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::GetPendingFees { asset: *asset },
            vec![AccountMeta::new_readonly(self.asset_ledger_address(asset), false)],
        )
    }

    pub fn get_total_fees_collected(&self, asset: &Pubkey) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::GetTotalFeesCollected { asset: *asset },
            vec![AccountMeta::new_readonly(self.asset_ledger_address(asset), false)],
        )
    }

    pub fn should_auto_forward(&self, asset: &Pubkey) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::ShouldAutoForward { asset: *asset },
            vec![AccountMeta::new_readonly(self.asset_ledger_address(asset), false)],
        )
    }

    pub fn get_balance(&self, asset: &Pubkey) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::GetBalance { asset: *asset },
            vec![AccountMeta::new_readonly(self.vault_address(asset), false)],
        )
    }

    pub fn get_ledger_info(&self) -> Result<Instruction, FeeRouterClientError> {
        self.build(
            FeeRouterInstruction::GetLedgerInfo,
            vec![AccountMeta::new_readonly(self.state_address(), false)],
        )
    }
}
