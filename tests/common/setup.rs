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

//! # Test Environment Setup Utilities
//! 
//! This module provides utilities for setting up test environments,
//! including program test creation, funded users and a fully initialized
//! fee router with a dedicated admin and treasury.

use solana_program_test::{processor, BanksClient, BanksClientError, ProgramTest, ProgramTestBanksClientExt};
use solana_sdk::{
    instruction::Instruction, signature::Keypair, signer::Signer, transaction::Transaction,
};
use std::env;

use crate::common::{constants, FeeRouterClient, Pubkey, PROGRAM_ID};
use fee_router::process_instruction;

/// Test environment context
/// 
/// Contains all the basic components needed for a test environment
pub struct TestEnvironment {
    pub banks_client: BanksClient,
    pub payer: Keypair,
    pub recent_blockhash: solana_sdk::hash::Hash,
}

/// Initialized router context
/// 
/// The admin holds Admin, Operator, Pauser and Upgrader from initialization.
pub struct RouterTestContext {
    pub env: TestEnvironment,
    pub client: FeeRouterClient,
    pub admin: Keypair,
    pub treasury: Pubkey,
}

/// Create a basic program test environment
/// 
/// # Returns
/// Configured ProgramTest instance
pub fn create_program_test() -> ProgramTest {
    let mut program_test = ProgramTest::new(
        "fee_router",
        PROGRAM_ID,
        processor!(process_instruction),
    );

    // Batches of several assets with auto-forward need more than the default
    program_test.set_compute_max_units(400_000);
    program_test
}

/// Start a basic test environment
/// 
/// # Returns
/// TestEnvironment with banks client, payer, and recent blockhash
pub async fn start_test_environment() -> TestEnvironment {
    // Set minimal logging
    env::set_var("RUST_LOG", "error,solana_runtime::message_processor::stable_log=error");
    let _ = env_logger::try_init();

    let program_test = create_program_test();
    let (banks_client, payer, recent_blockhash) = program_test.start().await;

    TestEnvironment {
        banks_client,
        payer,
        recent_blockhash,
    }
}

impl TestEnvironment {
    /// Sends `instructions` paid by the environment payer and signed by
    /// `signers`, on a fresh blockhash so repeated identical calls are not
    /// rejected as duplicates.
    pub async fn send(
        &mut self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<(), BanksClientError> {
        self.recent_blockhash = self
            .banks_client
            .get_new_latest_blockhash(&self.recent_blockhash)
            .await?;

        let mut all_signers: Vec<&Keypair> = vec![&self.payer];
        all_signers.extend(signers.iter().copied().filter(|s| s.pubkey() != self.payer.pubkey()));

        let mut transaction = Transaction::new_with_payer(instructions, Some(&self.payer.pubkey()));
        transaction.sign(&all_signers[..], self.recent_blockhash);
        self.banks_client.process_transaction(transaction).await
    }
}

/// Create and fund a test user account
/// 
/// # Arguments
/// * `env` - Test environment whose payer funds the user
/// * `sol_amount` - Amount of SOL to fund (uses default if None)
/// 
/// # Returns
/// Funded user keypair
#[allow(dead_code)]
pub async fn create_funded_user(
    env: &mut TestEnvironment,
    sol_amount: Option<u64>,
) -> Result<Keypair, BanksClientError> {
    let user = Keypair::new();
    let amount = sol_amount.unwrap_or(constants::DEFAULT_SOL_AIRDROP);

    let transfer_ix = solana_sdk::system_instruction::transfer(
        &env.payer.pubkey(),
        &user.pubkey(),
        amount,
    );
    env.send(&[transfer_ix], &[]).await?;

    Ok(user)
}

/// Start an environment and initialize the router
/// 
/// The treasury is a fresh system account; it is created implicitly by the
/// first SOL forward.
#[allow(dead_code)]
pub async fn setup_initialized_router() -> Result<RouterTestContext, BanksClientError> {
    let mut env = start_test_environment().await;
    let client = FeeRouterClient::new(PROGRAM_ID);
    let admin = create_funded_user(&mut env, None).await?;
    let treasury = Keypair::new().pubkey();

    let initialize_ix = client
        .initialize(&env.payer.pubkey(), &treasury, &admin.pubkey())
        .expect("build initialize");
    env.send(&[initialize_ix], &[]).await?;

    Ok(RouterTestContext {
        env,
        client,
        admin,
        treasury,
    })
}
