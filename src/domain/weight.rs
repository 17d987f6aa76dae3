//! Denormalized token weight.

use core::fmt;

use super::ratio::WAD;
use super::TokenRole;
use crate::error::AmmError;

/// A denormalized token weight in `1e18` units.
///
/// Only the ratio between the two bound weights matters for pricing;
/// the absolute values are bounded by protocol limits (1 to 50 whole units).
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::Weight;
///
/// let w = Weight::from_whole(9);
/// assert_eq!(w.get(), 9_000_000_000_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Weight(u128);

impl Weight {
    /// Zero weight (an unbound token).
    pub const ZERO: Self = Self(0);

    /// Creates a weight from its raw `1e18`-scaled value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Creates a weight of `whole` units. Saturates at `u128::MAX`.
    #[must_use]
    pub const fn from_whole(whole: u128) -> Self {
        Self(whole.saturating_mul(WAD))
    }

    /// Returns the raw `1e18`-scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the weight is zero.
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
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The denormalized weights of the two bound tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolWeights {
    /// Datatoken weight.
    pub datatoken: Weight,
    /// Base token weight.
    pub base_token: Weight,
}

impl PoolWeights {
    /// Creates a weight pair.
    #[must_use]
    pub const fn new(datatoken: Weight, base_token: Weight) -> Self {
        Self {
            datatoken,
            base_token,
        }
    }

    /// Returns the weight under `role`.
    #[must_use]
    pub const fn get(&self, role: TokenRole) -> Weight {
        match role {
            TokenRole::Datatoken => self.datatoken,
            TokenRole::BaseToken => self.base_token,
        }
    }

    /// Sum of both weights.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] on overflow.
    pub const fn total(&self) -> crate::error::Result<Weight> {
        match self.datatoken.checked_add(&self.base_token) {
            Some(w) => Ok(w),
            None => Err(AmmError::Overflow("total weight overflow")),
        }
    }
}
