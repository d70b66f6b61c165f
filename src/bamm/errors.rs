//! Error types for the BAMM

use odra::prelude::*;
use crate::errors::MathError;

/// Errors that can occur in a BAMM instance
#[odra::odra_error]
pub enum BammError {
    // Validation
    /// Amount must be non-zero
    ZeroAmount = 300,
    /// Token is not one of the pair's tokens
    UnknownToken = 301,
    /// Configuration value out of range
    InvalidConfiguration = 302,
    /// Action deadline has passed
    DeadlineExpired = 303,
    /// Rented tokens below the requested minimum
    SlippageExceeded = 304,
    /// Token transfer reported failure
    TransferFailed = 305,
    /// Not enough LP held to serve the request
    InsufficientLiquidity = 306,
    /// Instance has not been initialized
    NotInitialized = 307,

    // Balances
    /// Balance too low to transfer, burn or repay
    InsufficientBalance = 310,

    // Utilization
    /// Rent would push utilization over the maximum ("MAX_UTILITY_RATE")
    MaxUtilityRate = 320,

    // Solvency
    /// Vault debt exceeds its collateral value ("Not solvent")
    NotSolvent = 330,
    /// Withdrawal exceeds the vault balance ("Negative positions not allowed")
    NegativePosition = 331,

    // Liquidation guard
    /// Vault is solvent and cannot be liquidated ("User solvent")
    UserSolvent = 340,
    /// Spot price diverges from the oracle price ("ammPriceCheck")
    AmmPriceCheck = 341,

    // Authorization
    /// Caller is not the owner
    Unauthorized = 350,
    /// Caller is not the nominated owner
    NotNominated = 351,

    /// Reentrant call
    Locked = 360,

    // Math
    Overflow = 370,
    Underflow = 371,
    DivisionByZero = 372,
}

impl From<MathError> for BammError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => BammError::Overflow,
            MathError::Underflow => BammError::Underflow,
            MathError::DivisionByZero => BammError::DivisionByZero,
        }
    }
}
