//! Fixed-point fraction scaled by `1e18`.

use core::fmt;

use ethnum::U256;

use super::Amount;
use crate::error::AmmError;

/// Fixed-point scale shared by ratios, fee rates, weights and prices.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// A non-negative fraction expressed in `1e18` units (`WAD` = 1.0).
///
/// Ratios above one are representable; callers that need a proper
/// fraction check [`is_proper`](Self::is_proper).
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::{Amount, Ratio};
///
/// let half = Ratio::from_bps(5_000);
/// assert_eq!(half.apply(Amount::new(1_001)), Ok(Amount::new(500)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ratio(u128);

impl Ratio {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One (100%).
    pub const ONE: Self = Self(WAD);

    /// One half.
    pub const HALF: Self = Self(WAD / 2);

    /// Creates a ratio from its raw `1e18`-scaled value.
    #[must_use]
    pub const fn from_wad(value: u128) -> Self {
        Self(value)
    }

    /// Creates a ratio from basis points (10 000 bp = 1.0).
    #[must_use]
    pub const fn from_bps(bps: u32) -> Self {
        Self(bps as u128 * (WAD / 10_000))
    }

    /// Returns the raw `1e18`-scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the ratio is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the ratio is strictly below one.
    #[must_use]
    pub const fn is_proper(&self) -> bool {
        self.0 < WAD
    }

    /// `1 - self`, or `None` if the ratio exceeds one.
    #[must_use]
    pub const fn complement(&self) -> Option<Self> {
        match WAD.checked_sub(self.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// `floor(amount * self)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result does not fit in an
    /// [`Amount`].
    pub fn apply(&self, amount: Amount) -> crate::error::Result<Amount> {
        let product = U256::from(amount.get()) * U256::from(self.0) / U256::from(WAD);
        u128::try_from(product)
            .map(Amount::new)
            .map_err(|_| AmmError::Overflow("ratio application exceeds u128"))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WAD;
        let frac = self.0 % WAD;
        write!(f, "{whole}.{frac:018}")
    }
}
