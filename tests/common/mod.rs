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

//! # Common Test Utilities
//! 
//! This module provides shared utilities and helpers for integration tests
//! across all test modules. It includes:
//! 
//! - Test environment setup and router initialization
//! - Token creation and minting helpers
//! - Market, role and account inspection helpers
//! - View simulation and error decoding utilities

pub mod router_helpers;
pub mod setup;
pub mod tokens;

// Re-export commonly used types and functions
#[allow(unused_imports)]
pub use router_helpers::*;
#[allow(unused_imports)]
pub use setup::*;
#[allow(unused_imports)]
pub use tokens::*;

// Re-export external dependencies commonly used in tests
// Allow unused imports since these are provided for optional use across test modules
#[allow(unused_imports)]
pub use borsh::{BorshDeserialize, BorshSerialize};
#[allow(unused_imports)]
pub use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
#[allow(unused_imports)]
pub use solana_sdk::{
    program_pack::Pack,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
#[allow(unused_imports)]
pub use spl_token::state::{Account as TokenAccount, Mint as MintAccount};
#[allow(unused_imports)]
pub use solana_program_test::*;

// Re-export program-specific imports
#[allow(unused_imports)]
pub use fee_router::{
    client_sdk::{CollectEntry, FeeRouterClient, ForwardEntry},
    process_instruction, AssetLedger, FeeRouterError, FeeRouterState, LedgerInfo, Role,
    RoleAccount, DEFAULT_NATIVE_THRESHOLD, ID as PROGRAM_ID, NATIVE_ASSET,
};

/// Test result type alias for convenience
pub type TestResult = Result<(), BanksClientError>;

/// Common test constants
pub mod constants {
    /// Test token decimal places
    #[allow(dead_code)]
    pub const TOKEN_DECIMALS: u8 = 6;

    /// One whole test token in base units
    #[allow(dead_code)]
    pub const ONE_TOKEN: u64 = 1_000_000;

    /// Default SOL airdrop amount for test users
    #[allow(dead_code)]
    pub const DEFAULT_SOL_AIRDROP: u64 = 5_000_000_000; // 5 SOL

    /// 0.05 SOL, half of the default native threshold
    #[allow(dead_code)]
    pub const HALF_NATIVE_THRESHOLD: u64 = 50_000_000;
}
