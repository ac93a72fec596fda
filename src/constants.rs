//! Constants for the Fee Router Program
//!
//! This module contains the PDA seed prefixes, the native asset sentinel,
//! default distribution thresholds and storage layout versioning used
//! throughout the program.

use solana_program::{pubkey, pubkey::Pubkey};

/// Accounting key used for native SOL.
///
/// Same key as the SPL wrapped-SOL mint. Any other asset key is interpreted
/// as an SPL token mint.
pub const NATIVE_ASSET: Pubkey = pubkey!("So11111111111111111111111111111111111111112");

/// PDA seed prefix for the global fee router state account
pub const FEE_ROUTER_STATE_SEED_PREFIX: &[u8] = b"fee_router_state";

/// PDA seed prefix for the program-owned account holding native SOL custody
pub const NATIVE_VAULT_SEED_PREFIX: &[u8] = b"native_vault";

/// PDA seed prefix for per-asset ledger accounts (followed by the asset key)
pub const ASSET_LEDGER_SEED_PREFIX: &[u8] = b"asset_ledger";

/// PDA seed prefix for per-principal role accounts (followed by the principal key)
pub const ROLE_SEED_PREFIX: &[u8] = b"role";

/// PDA seed prefix for the program upgrade authority
pub const UPGRADE_AUTHORITY_SEED_PREFIX: &[u8] = b"upgrade_authority";

/// Default auto-forward threshold for native SOL, set during initialization
#[cfg(feature = "mainnet")]
pub const DEFAULT_NATIVE_THRESHOLD: u64 = 1_000_000_000; // 1 SOL

/// Default auto-forward threshold for native SOL, set during initialization
#[cfg(not(feature = "mainnet"))]
pub const DEFAULT_NATIVE_THRESHOLD: u64 = 100_000_000; // 0.1 SOL

/// Current storage layout version written into every FeeRouterState.
///
/// Bump only together with a migration path; existing fields must keep
/// their position and meaning.
pub const CURRENT_LAYOUT_VERSION: u8 = 1;

/// Upper bound on entries in a single batch instruction
pub const MAX_BATCH_SIZE: usize = 16;

/// Discriminator prefixed to every event emitted through `sol_log_data`
pub const EVENT_LOG_PREFIX: &[u8] = b"fee_router:event";
