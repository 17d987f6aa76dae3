//! Pool-share units.

use core::fmt;

/// Pool shares (LP tokens) in 1e18-scaled base units.
///
/// Distinct from [`Amount`](super::Amount) because shares measure a
/// claim on both pool balances rather than a quantity of one token.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::PoolShares;
///
/// let a = PoolShares::new(1_000);
/// let b = PoolShares::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(PoolShares::new(3_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PoolShares(u128);

impl PoolShares {
    /// No shares.
    pub const ZERO: Self = Self(0);

    /// Creates a new `PoolShares` from raw base units.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw base-unit value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if there are no shares.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for PoolShares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
