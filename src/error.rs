//! Unified error types for the datatoken pool library.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type. Every error is raised before any ledger write happens, so an
//! `Err` always means the pool state is exactly what it was before the call.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure a pool operation can report.
///
/// Variants carrying a `&'static str` describe the offending input so that
/// callers can surface a message without allocating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// A denormalized weight is zero or outside the configured bounds.
    #[error("invalid weight: {0}")]
    InvalidWeight(&'static str),

    /// A fee rate is negative or above its ceiling.
    #[error("fee rate out of range: {0}")]
    FeeRateOutOfRange(&'static str),

    /// An amount is zero where a positive value is required, or below a
    /// protocol minimum.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// A token is not bound to the pool, or both sides name the same token.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// A configuration value is inconsistent with the rest of the config.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A caller-supplied bound (min out, max in, max price) was violated.
    #[error("slippage exceeded: {0}")]
    SlippageExceeded(&'static str),

    /// A trade exceeds the maximum in/out fraction of the pool balance.
    #[error("excessive trade size: {0}")]
    ExcessiveTradeSize(&'static str),

    /// Not enough reserve, shares or pool balance to honour the request.
    #[error("insufficient reserve: {0}")]
    InsufficientReserve(&'static str),

    /// The vesting period is shorter than the protocol minimum.
    #[error("vesting period of {blocks} blocks is below the minimum of {minimum}")]
    VestingPeriodTooShort {
        /// Requested vesting period in blocks.
        blocks: u64,
        /// Protocol minimum in blocks.
        minimum: u64,
    },

    /// The pool is finalized; setup operations are no longer allowed.
    #[error("pool is finalized")]
    Finalized,

    /// The pool is not finalized yet; trading is not open.
    #[error("pool is not finalized")]
    NotFinalized,

    /// The caller lacks the role the operation requires.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Arithmetic overflow in an intermediate value.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow in an intermediate value.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Truncation moved a price in the wrong direction.
    #[error("math approximation: {0}")]
    MathApproximation(&'static str),
}

impl AmmError {
    /// Returns `true` for input-validation failures (weights, fees, amounts,
    /// tokens and configuration).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidWeight(_)
                | Self::FeeRateOutOfRange(_)
                | Self::InvalidAmount(_)
                | Self::InvalidToken(_)
                | Self::InvalidConfiguration(_)
        )
    }
}
