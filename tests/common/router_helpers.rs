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

//! # Fee Router Test Helpers
//! 
//! Helpers for authorizing markets, registering token assets, reading
//! program accounts, simulating view instructions and decoding program
//! errors from failed transactions.

use borsh::BorshDeserialize;
use num_traits::FromPrimitive;
use solana_program::instruction::InstructionError;
use solana_program_test::BanksClientError;
use solana_sdk::{
    instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer,
    transaction::{Transaction, TransactionError},
};

use crate::common::{
    create_associated_account, create_funded_user, create_mint, mint_tokens, AssetLedger,
    FeeRouterError, FeeRouterState, RoleAccount, RouterTestContext, TestEnvironment,
};

/// A registered token asset with a treasury token account ready to receive
pub struct TokenAsset {
    pub mint: Pubkey,
    pub treasury_account: Pubkey,
}

/// Fund a new market and authorize it through the admin
#[allow(dead_code)]
pub async fn authorize_market(ctx: &mut RouterTestContext) -> Result<Keypair, BanksClientError> {
    let market = create_funded_user(&mut ctx.env, None).await?;
    let authorize_ix = ctx
        .client
        .set_market_authorization(&ctx.admin.pubkey(), &market.pubkey(), true)
        .unwrap();
    ctx.env.send(&[authorize_ix], &[&ctx.admin]).await?;
    Ok(market)
}

/// Create a mint, register it with `threshold` and open the treasury's
/// token account for it
#[allow(dead_code)]
pub async fn register_token_asset(
    ctx: &mut RouterTestContext,
    threshold: u64,
) -> Result<TokenAsset, BanksClientError> {
    let mint = register_bare_token_asset(ctx, threshold).await?;

    let treasury = ctx.treasury;
    let treasury_account = create_associated_account(&mut ctx.env, &treasury, &mint).await?;

    Ok(TokenAsset {
        mint,
        treasury_account,
    })
}

/// Register a fresh mint without creating any treasury token account
#[allow(dead_code)]
pub async fn register_bare_token_asset(
    ctx: &mut RouterTestContext,
    threshold: u64,
) -> Result<Pubkey, BanksClientError> {
    let mint = Keypair::new();
    create_mint(&mut ctx.env, &mint, None).await?;

    let register_ix = ctx
        .client
        .register_asset(&ctx.admin.pubkey(), &mint.pubkey(), threshold)
        .unwrap();
    ctx.env.send(&[register_ix], &[&ctx.admin]).await?;
    Ok(mint.pubkey())
}

/// Give `market` a token account for `mint` holding `amount`
#[allow(dead_code)]
pub async fn fund_market_tokens(
    env: &mut TestEnvironment,
    market: &Pubkey,
    mint: &Pubkey,
    amount: u64,
) -> Result<Pubkey, BanksClientError> {
    let account = create_associated_account(env, market, mint).await?;
    mint_tokens(env, mint, &account, amount).await?;
    Ok(account)
}

#[allow(dead_code)]
pub async fn get_router_state(ctx: &mut RouterTestContext) -> FeeRouterState {
    let state_address = ctx.client.state_address();
    let account = ctx
        .env
        .banks_client
        .get_account(state_address)
        .await
        .unwrap()
        .expect("router state account");
    FeeRouterState::deserialize(&mut &account.data[..]).unwrap()
}

#[allow(dead_code)]
pub async fn get_asset_ledger(ctx: &mut RouterTestContext, asset: &Pubkey) -> Option<AssetLedger> {
    let address = ctx.client.asset_ledger_address(asset);
    let account = ctx.env.banks_client.get_account(address).await.unwrap()?;
    Some(AssetLedger::deserialize(&mut &account.data[..]).unwrap())
}

#[allow(dead_code)]
pub async fn get_role_account(ctx: &mut RouterTestContext, principal: &Pubkey) -> Option<RoleAccount> {
    let address = ctx.client.role_address(principal);
    let account = ctx.env.banks_client.get_account(address).await.unwrap()?;
    Some(RoleAccount::deserialize(&mut &account.data[..]).unwrap())
}

#[allow(dead_code)]
pub async fn get_lamports(env: &mut TestEnvironment, address: &Pubkey) -> u64 {
    env.banks_client.get_balance(*address).await.unwrap()
}

/// Simulate a view instruction and decode its return data
#[allow(dead_code)]
pub async fn simulate_view<T: BorshDeserialize>(env: &mut TestEnvironment, instruction: Instruction) -> T {
    let blockhash = env.banks_client.get_latest_blockhash().await.unwrap();
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&env.payer.pubkey()),
        &[&env.payer],
        blockhash,
    );

    let simulation = env.banks_client.simulate_transaction(transaction).await.unwrap();
    simulation
        .result
        .expect("simulation produced no result")
        .expect("view instruction failed");
    let return_data = simulation
        .simulation_details
        .and_then(|details| details.return_data)
        .expect("view published no return data");
    T::try_from_slice(&return_data.data).unwrap()
}

/// Decode the fee router error carried by a failed transaction
#[allow(dead_code)]
pub fn router_error(result: &Result<(), BanksClientError>) -> Option<FeeRouterError> {
    let transaction_error = match result {
        Err(BanksClientError::TransactionError(err)) => err,
        Err(BanksClientError::SimulationError { err, .. }) => err,
        _ => return None,
    };
    match transaction_error {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => FeeRouterError::from_u32(*code),
        _ => None,
    }
}

/// Assert that `result` failed with `expected`
#[allow(dead_code)]
pub fn assert_router_error(result: Result<(), BanksClientError>, expected: FeeRouterError) {
    assert!(result.is_err(), "expected {:?}, but the transaction succeeded", expected);
    assert_eq!(
        router_error(&result),
        Some(expected),
        "unexpected failure: {:?}",
        result
    );
}
