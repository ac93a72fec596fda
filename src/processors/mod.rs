//! Processors Module
//!
//! This module contains all processor functions organized by functionality.

pub mod access_control;
pub mod assets;
pub mod emergency;
pub mod fees;
pub mod process_initialize;
pub mod system_pause;
pub mod treasury;
pub mod upgrade;
pub mod views;

use solana_program::{clock::Clock, program_error::ProgramError, sysvar::Sysvar};

// Re-export initialization
pub use process_initialize::*;

// Re-export asset registration and threshold management
pub use assets::*;

// Re-export fee collection
pub use fees::*;

// Re-export forwarding and treasury management
pub use treasury::*;

// Re-export market and role management
pub use access_control::*;

// Re-export pause control
pub use system_pause::*;

// Re-export emergency withdrawal
pub use emergency::*;

// Re-export read-only views
pub use views::*;

// Re-export upgrade authorization
pub use upgrade::*;

/// Unix timestamp of the current slot
pub(crate) fn current_timestamp() -> Result<i64, ProgramError> {
    Ok(Clock::get()?.unix_timestamp)
}
