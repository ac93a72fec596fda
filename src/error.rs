use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Error types for the Fee Router Program.
///
/// Each variant maps to a stable custom error code (starting at 1001) so that
/// markets, operators and admin tooling can tell failures apart without
/// parsing log output.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum FeeRouterError {
    /// A treasury, admin, market or recipient address is the default (null) key
    #[error("Invalid address: the default public key is not allowed")]
    InvalidAddress = 1001,

    /// Amount is zero
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount = 1002,

    /// Value moved into custody differs from the declared amount
    #[error("Amount mismatch: custody did not change by the declared amount")]
    AmountMismatch = 1003,

    /// Custody (or the market's source balance) cannot cover the amount
    #[error("Insufficient balance for the requested amount")]
    InsufficientBalance = 1004,

    /// Caller does not hold the capability required by the instruction
    #[error("Unauthorized")]
    Unauthorized = 1005,

    /// Fee intake is paused
    #[error("Fee router is paused")]
    Paused = 1006,

    /// Operation requires the fee router to be paused
    #[error("Fee router is not paused")]
    NotPaused = 1007,

    /// Initialization or registration was attempted twice
    #[error("Account is already initialized")]
    AlreadyInitialized = 1008,

    /// Batch argument arrays have different lengths
    #[error("Batch length mismatch")]
    LengthMismatch = 1009,

    /// Pending balance for the asset is zero
    #[error("Nothing to forward")]
    NothingToForward = 1010,

    /// Destination cannot receive the transfer or the transfer was rejected
    #[error("Transfer failed")]
    TransferFailed = 1011,

    /// A value-moving instruction is already in progress
    #[error("Reentrant call rejected")]
    Reentrant = 1012,

    /// Fee router state has not been initialized
    #[error("Fee router is not initialized")]
    NotInitialized = 1013,

    /// No ledger exists for the asset
    #[error("Asset is not registered")]
    AssetNotRegistered = 1014,

    /// An account does not match its expected address, owner or mint
    #[error("Invalid account provided")]
    InvalidAccount = 1015,

    /// Checked arithmetic failed
    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 1016,

    /// Stored account layout is not readable by this program version
    #[error("Incompatible storage layout version")]
    IncompatibleLayout = 1017,

    /// Revoking the role would leave the router without an admin
    #[error("Cannot remove the last admin")]
    LastAdmin = 1018,

    /// Role value is unknown or cannot be used with this instruction
    #[error("Invalid role")]
    InvalidRole = 1019,

    /// The program's upgrade authority is not the router's upgrade authority PDA
    #[error("Upgrade authority has not been delegated to the fee router")]
    UpgradeAuthorityNotDelegated = 1020,
}

impl FeeRouterError {
    /// Returns the stable error code of this variant.
    pub fn error_code(&self) -> u32 {
        *self as u32
    }
}

impl From<FeeRouterError> for ProgramError {
    fn from(e: FeeRouterError) -> Self {
        ProgramError::Custom(e.error_code())
    }
}

impl<T> DecodeError<T> for FeeRouterError {
    fn type_of() -> &'static str {
        "FeeRouterError"
    }
}

impl PrintProgramError for FeeRouterError {
    fn print<E>(&self)
    where
        E: 'static + std::error::Error + DecodeError<E> + PrintProgramError + num_traits::FromPrimitive,
    {
        msg!("❌ {} (code {})", self, self.error_code());
    }
}
