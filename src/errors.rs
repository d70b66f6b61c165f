//! Error definitions shared by the pool collaborators and the token layer
use odra::prelude::*;

/// Errors raised by the pair, router and oracle contracts
#[odra::odra_error]
pub enum DexError {
    /// Insufficient liquidity in the pool
    InsufficientLiquidity = 1,

    /// Insufficient input amount for swap
    InsufficientInputAmount = 2,

    /// Insufficient output amount for swap
    InsufficientOutputAmount = 3,

    /// Token is not part of the pair
    InvalidPair = 4,

    /// Identical addresses provided
    IdenticalAddresses = 8,

    /// Transfer failed
    TransferFailed = 10,

    /// Deadline expired
    DeadlineExpired = 11,

    /// Overflow error
    Overflow = 13,

    /// Underflow error
    Underflow = 14,

    /// Division by zero
    DivisionByZero = 15,

    /// K value invariant violated
    KInvariantViolated = 18,

    /// Insufficient liquidity minted
    InsufficientLiquidityMinted = 19,

    /// Insufficient liquidity burned
    InsufficientLiquidityBurned = 20,

    /// Locked - reentrancy guard
    Locked = 21,

    /// Invalid fee
    InvalidFee = 22,

    /// Invalid configuration
    InvalidConfiguration = 23,

    /// Oracle window has not elapsed yet
    OracleNotReady = 24,

    /// Oracle average is older than the allowed staleness
    StalePrice = 25,
}

/// Custom errors for the CEP-18 token modules
#[odra::odra_error]
pub enum TokenError {
    /// Insufficient allowance for transfer
    InsufficientAllowance = 100,

    /// Insufficient balance for operation
    InsufficientBalance = 101,
}

/// Arithmetic failures of the checked helpers in [`crate::math`]
#[odra::odra_error]
pub enum MathError {
    /// Result does not fit into 256 bits
    Overflow = 200,
    /// Subtraction below zero
    Underflow = 201,
    /// Division by zero
    DivisionByZero = 202,
}

impl From<MathError> for DexError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => DexError::Overflow,
            MathError::Underflow => DexError::Underflow,
            MathError::DivisionByZero => DexError::DivisionByZero,
        }
    }
}
