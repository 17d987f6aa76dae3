//! Fee rates built on [`Ratio`].

use core::fmt;

use super::{Amount, Ratio};
use crate::error::AmmError;

/// A fee rate as a fraction of the gross trade input.
///
/// Negative rates are unrepresentable once constructed; signed inputs go
/// through [`try_from_signed`](Self::try_from_signed). Ceilings are a
/// protocol concern and are checked by the configuration layer.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::{Amount, FeeRate};
///
/// let fee = FeeRate::from_bps(10); // 0.1%
/// assert_eq!(fee.apply(Amount::new(10_000)), Ok(Amount::new(10)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FeeRate(Ratio);

impl FeeRate {
    /// No fee.
    pub const ZERO: Self = Self(Ratio::ZERO);

    /// Wraps a [`Ratio`].
    #[must_use]
    pub const fn new(ratio: Ratio) -> Self {
        Self(ratio)
    }

    /// Creates a fee rate from basis points.
    #[must_use]
    pub const fn from_bps(bps: u32) -> Self {
        Self(Ratio::from_bps(bps))
    }

    /// Creates a fee rate from a raw `1e18`-scaled value.
    #[must_use]
    pub const fn from_wad(value: u128) -> Self {
        Self(Ratio::from_wad(value))
    }

    /// Creates a fee rate from a signed `1e18`-scaled value.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeRateOutOfRange`] if `value` is negative.
    pub const fn try_from_signed(value: i128) -> crate::error::Result<Self> {
        if value < 0 {
            return Err(AmmError::FeeRateOutOfRange("fee rate must not be negative"));
        }
        Ok(Self(Ratio::from_wad(value.unsigned_abs())))
    }

    /// Returns the underlying [`Ratio`].
    #[must_use]
    pub const fn ratio(&self) -> Ratio {
        self.0
    }

    /// Returns the raw `1e18`-scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0.get()
    }

    /// Returns `true` for a zero fee.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `floor(amount * rate)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the fee does not fit in an
    /// [`Amount`].
    pub fn apply(&self, amount: Amount) -> crate::error::Result<Amount> {
        self.0.apply(amount)
    }

    /// Sum of two rates.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] on overflow.
    pub const fn checked_add(&self, other: &Self) -> crate::error::Result<Self> {
        match self.0.checked_add(&other.0) {
            Some(r) => Ok(Self(r)),
            None => Err(AmmError::Overflow("fee rate sum overflow")),
        }
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeRate({})", self.0)
    }
}
