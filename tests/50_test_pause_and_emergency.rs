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

//! # Pause and Emergency Withdrawal Tests
//! 
//! Test Coverage:
//! - Pause/unpause cycles and redundant toggles
//! - Emergency withdrawal gating, validation and pending clamping
//! - Rejection of every mutation while the reentrancy lock is held

mod common;

use common::*;
use common::constants::ONE_TOKEN;
use fee_router::{FEE_ROUTER_STATE_SEED_PREFIX, NATIVE_VAULT_SEED_PREFIX};
use solana_sdk::{account::Account, rent::Rent};

#[tokio::test]
async fn test_pause_unpause_cycle() -> TestResult {
    let mut ctx = setup_initialized_router().await?;
    let pauser = ctx.admin.pubkey();

    let pause_ix = ctx.client.pause(&pauser).unwrap();
    ctx.env.send(&[pause_ix.clone()], &[&ctx.admin]).await?;
    let state = get_router_state(&mut ctx).await;
    assert!(state.is_paused);
    assert!(state.pause_timestamp > 0);

    assert_router_error(ctx.env.send(&[pause_ix], &[&ctx.admin]).await, FeeRouterError::Paused);

    let unpause_ix = ctx.client.unpause(&pauser).unwrap();
    ctx.env.send(&[unpause_ix.clone()], &[&ctx.admin]).await?;
    assert!(!get_router_state(&mut ctx).await.is_paused);

    assert_router_error(ctx.env.send(&[unpause_ix], &[&ctx.admin]).await, FeeRouterError::NotPaused);
    Ok(())
}

#[tokio::test]
async fn test_pause_requires_pauser() -> TestResult {
    let mut ctx = setup_initialized_router().await?;
    let market = authorize_market(&mut ctx).await?;

    let pause_ix = ctx.client.pause(&market.pubkey()).unwrap();
    assert_router_error(ctx.env.send(&[pause_ix], &[&market]).await, FeeRouterError::Unauthorized);
    Ok(())
}

#[tokio::test]
async fn test_emergency_withdraw_only_while_paused() -> TestResult {
    let mut ctx = setup_initialized_router().await?;
    let market = authorize_market(&mut ctx).await?;
    let recipient = Keypair::new().pubkey();

    let collect_ix = ctx
        .client
        .collect_fee(&market.pubkey(), &NATIVE_ASSET, 40_000_000, &market.pubkey(), &ctx.treasury)
        .unwrap();
    ctx.env.send(&[collect_ix], &[&market]).await?;

    let withdraw_ix = ctx
        .client
        .emergency_withdraw(&ctx.admin.pubkey(), &NATIVE_ASSET, 10_000_000, &recipient, &recipient)
        .unwrap();
    assert_router_error(
        ctx.env.send(&[withdraw_ix.clone()], &[&ctx.admin]).await,
        FeeRouterError::NotPaused,
    );

    let pause_ix = ctx.client.pause(&ctx.admin.pubkey()).unwrap();
    ctx.env.send(&[pause_ix], &[&ctx.admin]).await?;

    ctx.env.send(&[withdraw_ix], &[&ctx.admin]).await?;
    assert_eq!(get_lamports(&mut ctx.env, &recipient).await, 10_000_000);

    // 30_000_000 remain in custody, so pending is untouched
    let ledger = get_asset_ledger(&mut ctx, &NATIVE_ASSET).await.unwrap();
    assert_eq!(ledger.pending_fees, 30_000_000);
    assert_eq!(ledger.total_fees_collected, 40_000_000);
    Ok(())
}

#[tokio::test]
async fn test_emergency_withdraw_clamps_pending_to_remaining_custody() -> TestResult {
    let mut ctx = setup_initialized_router().await?;
    let market = authorize_market(&mut ctx).await?;
    let asset = register_token_asset(&mut ctx, 0).await?;
    let market_tokens = fund_market_tokens(&mut ctx.env, &market.pubkey(), &asset.mint, 100 * ONE_TOKEN).await?;

    let collect_ix = ctx
        .client
        .collect_fee(&market.pubkey(), &asset.mint, 100 * ONE_TOKEN, &market_tokens, &asset.treasury_account)
        .unwrap();
    ctx.env.send(&[collect_ix], &[&market]).await?;

    let pause_ix = ctx.client.pause(&ctx.admin.pubkey()).unwrap();
    ctx.env.send(&[pause_ix], &[&ctx.admin]).await?;

    let recipient = Keypair::new().pubkey();
    let recipient_tokens = create_associated_account(&mut ctx.env, &recipient, &asset.mint).await?;
    let withdraw_ix = ctx
        .client
        .emergency_withdraw(&ctx.admin.pubkey(), &asset.mint, 60 * ONE_TOKEN, &recipient, &recipient_tokens)
        .unwrap();
    ctx.env.send(&[withdraw_ix], &[&ctx.admin]).await?;

    assert_eq!(get_token_balance(&mut ctx.env, &recipient_tokens).await, 60 * ONE_TOKEN);
    let ledger = get_asset_ledger(&mut ctx, &asset.mint).await.unwrap();
    assert_eq!(ledger.pending_fees, 40 * ONE_TOKEN);
    assert_eq!(ledger.total_fees_collected, 100 * ONE_TOKEN);
    Ok(())
}

#[tokio::test]
async fn test_emergency_withdraw_validation() -> TestResult {
    let mut ctx = setup_initialized_router().await?;
    let market = authorize_market(&mut ctx).await?;
    let admin = ctx.admin.pubkey();
    let recipient = Keypair::new().pubkey();

    let collect_ix = ctx
        .client
        .collect_fee(&market.pubkey(), &NATIVE_ASSET, 20_000_000, &market.pubkey(), &ctx.treasury)
        .unwrap();
    ctx.env.send(&[collect_ix], &[&market]).await?;

    let pause_ix = ctx.client.pause(&admin).unwrap();
    ctx.env.send(&[pause_ix], &[&ctx.admin]).await?;

    let no_recipient_ix = ctx
        .client
        .emergency_withdraw(&admin, &NATIVE_ASSET, 1_000_000, &Pubkey::default(), &Pubkey::default())
        .unwrap();
    assert_router_error(ctx.env.send(&[no_recipient_ix], &[&ctx.admin]).await, FeeRouterError::InvalidAddress);

    let zero_ix = ctx
        .client
        .emergency_withdraw(&admin, &NATIVE_ASSET, 0, &recipient, &recipient)
        .unwrap();
    assert_router_error(ctx.env.send(&[zero_ix], &[&ctx.admin]).await, FeeRouterError::InvalidAmount);

    let too_much_ix = ctx
        .client
        .emergency_withdraw(&admin, &NATIVE_ASSET, 20_000_001, &recipient, &recipient)
        .unwrap();
    assert_router_error(ctx.env.send(&[too_much_ix], &[&ctx.admin]).await, FeeRouterError::InsufficientBalance);

    let outsider = create_funded_user(&mut ctx.env, None).await?;
    let outsider_ix = ctx
        .client
        .emergency_withdraw(&outsider.pubkey(), &NATIVE_ASSET, 1_000_000, &recipient, &recipient)
        .unwrap();
    assert_router_error(ctx.env.send(&[outsider_ix], &[&outsider]).await, FeeRouterError::Unauthorized);

    assert_eq!(get_asset_ledger(&mut ctx, &NATIVE_ASSET).await.unwrap().pending_fees, 20_000_000);
    Ok(())
}

#[tokio::test]
async fn test_held_reentrancy_lock_rejects_mutations() -> TestResult {
    let pauser = Keypair::new();
    let client = FeeRouterClient::new(PROGRAM_ID);
    let rent = Rent::default();

    let (state_address, state_bump) =
        Pubkey::find_program_address(&[FEE_ROUTER_STATE_SEED_PREFIX], &PROGRAM_ID);
    let (_, native_vault_bump) = Pubkey::find_program_address(&[NATIVE_VAULT_SEED_PREFIX], &PROGRAM_ID);
    let mut state = FeeRouterState::new(Keypair::new().pubkey(), state_bump, native_vault_bump);
    state.admin_count = 1;
    state.reentrancy_locked = true;
    let state_data = state.try_to_vec().unwrap();

    let (role_address, role_bump) = RoleAccount::find_address(&pauser.pubkey(), &PROGRAM_ID);
    let mut roles = RoleAccount::new(pauser.pubkey(), role_bump, 0);
    roles.grant(Role::Pauser, 0);
    roles.grant(Role::Admin, 0);
    let role_data = roles.try_to_vec().unwrap();

    let mut program_test = create_program_test();
    program_test.add_account(
        state_address,
        Account {
            lamports: rent.minimum_balance(state_data.len()),
            data: state_data,
            owner: PROGRAM_ID,
            executable: false,
            rent_epoch: 0,
        },
    );
    program_test.add_account(
        role_address,
        Account {
            lamports: rent.minimum_balance(role_data.len()),
            data: role_data,
            owner: PROGRAM_ID,
            executable: false,
            rent_epoch: 0,
        },
    );
    let (banks_client, payer, recent_blockhash) = program_test.start().await;
    let mut env = TestEnvironment {
        banks_client,
        payer,
        recent_blockhash,
    };

    let pause_ix = client.pause(&pauser.pubkey()).unwrap();
    assert_router_error(env.send(&[pause_ix], &[&pauser]).await, FeeRouterError::Reentrant);

    let treasury_ix = client.set_treasury(&pauser.pubkey(), &Keypair::new().pubkey()).unwrap();
    assert_router_error(env.send(&[treasury_ix], &[&pauser]).await, FeeRouterError::Reentrant);
    Ok(())
}
