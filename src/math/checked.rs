//! Checked arithmetic trait for domain wrapper types.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of panicking on overflow or underflow.
//!
//! # Implementations
//!
//! - [`Amount`] — token quantities
//! - [`PoolShares`] — pool share quantities
//!
//! # Examples
//!
//! ```
//! use datatoken_pool::domain::Amount;
//! use datatoken_pool::math::CheckedArithmetic;
//!
//! let a = Amount::new(100);
//! let b = Amount::new(200);
//! assert_eq!(a.safe_add(&b), Ok(Amount::new(300)));
//! assert!(a.safe_sub(&b).is_err());
//! ```

use super::fixed::{mul_div, narrow, wide};
use crate::domain::{Amount, PoolShares};
use crate::error::AmmError;

/// Fallible arithmetic for domain wrapper types.
///
/// # Contract
///
/// - **No panics** — all error conditions produce `Err`.
/// - **No saturation** — errors propagate instead.
/// - Every division floors.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds `u128`.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// `floor(self * numerator / denominator)` with a 256-bit intermediate.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DivisionByZero`] if `denominator` is zero.
    /// - [`AmmError::Overflow`] if the result exceeds `u128`.
    fn safe_mul_div(&self, numerator: u128, denominator: u128) -> Result<Self, AmmError>;
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    fn safe_mul_div(&self, numerator: u128, denominator: u128) -> Result<Self, AmmError> {
        let v = mul_div(wide(self.get()), wide(numerator), wide(denominator))?;
        Ok(Amount::new(narrow(v, "amount scaling overflow")?))
    }
}

// ---------------------------------------------------------------------------
// PoolShares
// ---------------------------------------------------------------------------

impl CheckedArithmetic for PoolShares {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("pool share addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("pool share subtraction underflow"))
    }

    fn safe_mul_div(&self, numerator: u128, denominator: u128) -> Result<Self, AmmError> {
        let v = mul_div(wide(self.get()), wide(numerator), wide(denominator))?;
        Ok(PoolShares::new(narrow(v, "pool share scaling overflow")?))
    }
}
