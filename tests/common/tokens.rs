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

//! # Token Creation and Management Utilities
//! 
//! This module provides utilities for creating and managing SPL tokens
//! in integration tests. The environment payer is the mint authority of
//! every test mint.

use solana_program_test::BanksClientError;
use solana_sdk::{program_pack::Pack, pubkey::Pubkey, signature::Keypair, signer::Signer};
use spl_token::{instruction as token_instruction, state::Account as TokenAccount, state::Mint};

use crate::common::{constants, TestEnvironment, TestResult};

/// Helper function to create a token mint
/// 
/// # Arguments
/// * `env` - Test environment; its payer becomes the mint authority
/// * `mint` - Keypair for the new mint account
/// * `decimals` - Number of decimal places (defaults to 6 if None)
#[allow(dead_code)]
pub async fn create_mint(env: &mut TestEnvironment, mint: &Keypair, decimals: Option<u8>) -> TestResult {
    let decimals = decimals.unwrap_or(constants::TOKEN_DECIMALS);
    let rent = env.banks_client.get_rent().await?;
    let lamports = rent.minimum_balance(Mint::LEN);

    let create_account_ix = solana_sdk::system_instruction::create_account(
        &env.payer.pubkey(),
        &mint.pubkey(),
        lamports,
        Mint::LEN as u64,
        &spl_token::id(),
    );

    let initialize_mint_ix = token_instruction::initialize_mint(
        &spl_token::id(),
        &mint.pubkey(),
        &env.payer.pubkey(),
        Some(&env.payer.pubkey()),
        decimals,
    )
    .unwrap();

    env.send(&[create_account_ix, initialize_mint_ix], &[mint]).await
}

/// Create the associated token account of `owner` for `mint`
/// 
/// # Returns
/// The associated token account address
#[allow(dead_code)]
pub async fn create_associated_account(
    env: &mut TestEnvironment,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Pubkey, BanksClientError> {
    let create_ix = spl_associated_token_account::instruction::create_associated_token_account(
        &env.payer.pubkey(),
        owner,
        mint,
        &spl_token::id(),
    );
    env.send(&[create_ix], &[]).await?;
    Ok(spl_associated_token_account::get_associated_token_address(owner, mint))
}

/// Mint tokens to a specified token account
#[allow(dead_code)]
pub async fn mint_tokens(
    env: &mut TestEnvironment,
    mint: &Pubkey,
    account: &Pubkey,
    amount: u64,
) -> TestResult {
    let mint_to_ix = token_instruction::mint_to(
        &spl_token::id(),
        mint,
        account,
        &env.payer.pubkey(),
        &[],
        amount,
    )
    .unwrap();
    env.send(&[mint_to_ix], &[]).await
}

/// Freeze a token account (the payer is the freeze authority of test mints)
#[allow(dead_code)]
pub async fn freeze_token_account(env: &mut TestEnvironment, mint: &Pubkey, account: &Pubkey) -> TestResult {
    let freeze_ix = token_instruction::freeze_account(
        &spl_token::id(),
        account,
        mint,
        &env.payer.pubkey(),
        &[],
    )
    .unwrap();
    env.send(&[freeze_ix], &[]).await
}

/// Get the balance of a token account, 0 if it does not exist
#[allow(dead_code)]
pub async fn get_token_balance(env: &mut TestEnvironment, account: &Pubkey) -> u64 {
    match env.banks_client.get_account(*account).await.unwrap() {
        Some(account) => TokenAccount::unpack(&account.data).unwrap().amount,
        None => 0,
    }
}
