//! Token amount in 1e18-scaled base units.

use core::fmt;

/// Number of base units in one whole token.
pub const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

/// A token amount in base units (`1e18` base units = one whole token).
///
/// `Amount` is the unit for pool balances, trade sizes, fees and reserves.
/// All `u128` values are valid amounts.
///
/// Arithmetic methods are checked: they return `None` on overflow or
/// underflow instead of panicking.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::Amount;
///
/// let a = Amount::from_whole(100).unwrap_or_default();
/// let b = Amount::from_whole(50).unwrap_or_default();
/// assert_eq!(a.checked_sub(&b), Amount::from_whole(50));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// One base unit, the smallest non-zero amount.
    pub const UNIT: Self = Self(1);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from raw base units.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Creates an amount of `whole` tokens. Returns `None` on overflow.
    #[must_use]
    pub const fn from_whole(whole: u128) -> Option<Self> {
        match whole.checked_mul(ONE_TOKEN) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the raw base-unit value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
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

    /// Absolute difference between two amounts.
    pub const fn abs_diff(&self, other: &Self) -> Self {
        Self(self.0.abs_diff(other.0))
    }

    /// Returns the smaller of two amounts.
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
