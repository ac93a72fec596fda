//! State Module
//!
//! This module contains all account state types stored by the program.

pub mod asset_ledger;
pub mod fee_router_state;
pub mod role_account;

// Re-export all state types for easy access
pub use asset_ledger::*;
pub use fee_router_state::*;
pub use role_account::*;
