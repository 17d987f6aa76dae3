//! Top-level pool blueprint.

use super::{FeeSchedule, ProtocolLimits, SideStakingConfig};
use crate::domain::{BoundTokens, PoolWeights};

/// Everything needed to create a side-staked datatoken pool.
///
/// # Validation
///
/// - The protocol limits are self-consistent.
/// - Each weight lies within the weight bounds; their sum does not exceed
///   the total-weight bound.
/// - Every fee rate lies within its ceiling.
/// - The side-staking parameters are valid (see
///   [`SideStakingConfig::validate`]).
///
/// # Examples
///
/// ```
/// use datatoken_pool::config::{FeeSchedule, PoolConfig, ProtocolLimits, SideStakingConfig};
/// use datatoken_pool::domain::{Address, Amount, BoundTokens, PoolWeights, SpotPrice, Weight};
///
/// let Ok(tokens) = BoundTokens::new(Address::repeat_byte(1), Address::repeat_byte(2)) else {
///     return;
/// };
/// let staking = SideStakingConfig {
///     controller: Address::repeat_byte(3),
///     publisher: Address::repeat_byte(4),
///     datatoken_cap: Amount::from_whole(1_000).unwrap_or_default(),
///     rate: SpotPrice::ONE,
///     base_token_amount: Amount::from_whole(10).unwrap_or_default(),
///     vesting_amount: Amount::ZERO,
///     vesting_blocks: 2_426_000,
/// };
/// let config = PoolConfig::new(
///     tokens,
///     PoolWeights::new(Weight::from_whole(9), Weight::from_whole(1)),
///     FeeSchedule::default(),
///     staking,
/// );
/// assert!(config.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    tokens: BoundTokens,
    weights: PoolWeights,
    fees: FeeSchedule,
    side_staking: SideStakingConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    limits: ProtocolLimits,
}

impl PoolConfig {
    /// Creates a validated configuration with the default protocol limits.
    ///
    /// # Errors
    ///
    /// Any error from [`validate`](Self::validate).
    pub fn new(
        tokens: BoundTokens,
        weights: PoolWeights,
        fees: FeeSchedule,
        side_staking: SideStakingConfig,
    ) -> crate::error::Result<Self> {
        Self::with_limits(tokens, weights, fees, side_staking, ProtocolLimits::default())
    }

    /// Creates a validated configuration with custom protocol limits.
    ///
    /// # Errors
    ///
    /// Any error from [`validate`](Self::validate).
    pub fn with_limits(
        tokens: BoundTokens,
        weights: PoolWeights,
        fees: FeeSchedule,
        side_staking: SideStakingConfig,
        limits: ProtocolLimits,
    ) -> crate::error::Result<Self> {
        let config = Self {
            tokens,
            weights,
            fees,
            side_staking,
            limits,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`](crate::error::AmmError::InvalidWeight)
    ///   for out-of-range weights.
    /// - [`AmmError::FeeRateOutOfRange`](crate::error::AmmError::FeeRateOutOfRange)
    ///   for out-of-range fees.
    /// - [`AmmError::InvalidToken`](crate::error::AmmError::InvalidToken)
    ///   if the publish-market fee names a token outside the pair.
    /// - Any error from [`ProtocolLimits::validate`] or
    ///   [`SideStakingConfig::validate`].
    pub fn validate(&self) -> crate::error::Result<()> {
        self.limits.validate()?;
        self.limits.check_weight(self.weights.datatoken)?;
        self.limits.check_weight(self.weights.base_token)?;
        self.limits.check_total_weight(self.weights.total()?)?;
        self.fees.validate(&self.limits)?;
        self.fees.publish_market_fee.check_token(&self.tokens)?;
        self.side_staking.validate(&self.limits)
    }

    /// The bound datatoken and base token.
    #[must_use]
    pub const fn tokens(&self) -> BoundTokens {
        self.tokens
    }

    /// The token weights.
    #[must_use]
    pub const fn weights(&self) -> PoolWeights {
        self.weights
    }

    /// The fee schedule.
    #[must_use]
    pub const fn fees(&self) -> FeeSchedule {
        self.fees
    }

    /// The controller parameters.
    #[must_use]
    pub const fn side_staking(&self) -> SideStakingConfig {
        self.side_staking
    }

    /// The protocol limits.
    #[must_use]
    pub const fn limits(&self) -> ProtocolLimits {
        self.limits
    }
}
