//! Swap operation specification.

use core::fmt;

use super::Amount;
use crate::error::AmmError;

/// Specifies what drives a swap together with the caller's slippage bound.
///
/// # Invariants
///
/// The driving amount is always non-zero.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::{Amount, SwapSpec};
///
/// let spec = SwapSpec::exact_in(Amount::new(1_000), Amount::new(900));
/// assert!(spec.is_ok());
/// assert!(SwapSpec::exact_in(Amount::ZERO, Amount::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapSpec {
    /// Pay exactly `amount_in`, receive at least `min_amount_out`.
    ExactIn {
        /// Gross input amount.
        amount_in: Amount,
        /// Smallest acceptable output.
        min_amount_out: Amount,
    },
    /// Receive exactly `amount_out`, pay at most `max_amount_in`.
    ExactOut {
        /// Desired output amount.
        amount_out: Amount,
        /// Largest acceptable gross input.
        max_amount_in: Amount,
    },
}

impl SwapSpec {
    /// Creates an exact-input specification.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if `amount_in` is zero.
    pub const fn exact_in(amount_in: Amount, min_amount_out: Amount) -> crate::error::Result<Self> {
        if amount_in.is_zero() {
            return Err(AmmError::InvalidAmount("swap amount must be non-zero"));
        }
        Ok(Self::ExactIn {
            amount_in,
            min_amount_out,
        })
    }

    /// Creates an exact-output specification.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if `amount_out` is zero.
    pub const fn exact_out(amount_out: Amount, max_amount_in: Amount) -> crate::error::Result<Self> {
        if amount_out.is_zero() {
            return Err(AmmError::InvalidAmount("swap amount must be non-zero"));
        }
        Ok(Self::ExactOut {
            amount_out,
            max_amount_in,
        })
    }

    /// Returns `true` for an exact-input specification.
    #[must_use]
    pub const fn is_exact_in(&self) -> bool {
        matches!(self, Self::ExactIn { .. })
    }

    /// Returns the driving amount (input for exact-in, output for exact-out).
    pub const fn amount(&self) -> Amount {
        match self {
            Self::ExactIn { amount_in, .. } => *amount_in,
            Self::ExactOut { amount_out, .. } => *amount_out,
        }
    }
}

impl fmt::Display for SwapSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn {
                amount_in,
                min_amount_out,
            } => write!(f, "ExactIn({amount_in}, min_out={min_amount_out})"),
            Self::ExactOut {
                amount_out,
                max_amount_in,
            } => write!(f, "ExactOut({amount_out}, max_in={max_amount_in})"),
        }
    }
}
