//! Utility Functions
//!
//! This module contains shared utility functions used throughout the program.
//! These utilities are organized by functionality and provide common operations
//! for validation, capability checks, custody, serialization and upgrade
//! authority handling.

pub mod access_control;
pub mod custody;
pub mod program_authority;
pub mod reentrancy_protection;
pub mod serialization;
pub mod validation;

// Re-export commonly used items for convenience
pub use access_control::*;
pub use custody::*;
pub use program_authority::*;
pub use reentrancy_protection::*;
pub use serialization::*;
pub use validation::*;
