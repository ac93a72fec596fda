//! Types Module
//!
//! This module contains the instruction and view types of the Fee Router Program.

pub mod instructions;

// Re-export all types for easy access
pub use instructions::*;
