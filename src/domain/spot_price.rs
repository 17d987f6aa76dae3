//! Spot price in `1e18` units.

use core::fmt;

use super::ratio::WAD;

/// The marginal price of one unit of the output token, expressed in units
/// of the input token and scaled by `1e18`.
///
/// Also used for the side-staking rate (base tokens per datatoken).
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::SpotPrice;
///
/// let p = SpotPrice::ONE;
/// assert_eq!(p.get(), 1_000_000_000_000_000_000);
/// assert!(SpotPrice::new(1).abs_diff(&p) < p.get());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpotPrice(u128);

impl SpotPrice {
    /// A price of exactly one.
    pub const ONE: Self = Self(WAD);

    /// Largest representable price; used as "no price bound".
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a price from its raw `1e18`-scaled value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw `1e18`-scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` for a zero price.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Absolute difference in raw units.
    #[must_use]
    pub const fn abs_diff(&self, other: &Self) -> u128 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for SpotPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / WAD, self.0 % WAD)
    }
}
