//! Protocol-wide bounds.

use crate::domain::{Amount, FeeRate, PoolShares, Ratio, Weight, ONE_TOKEN};
use crate::error::AmmError;
use crate::math::WeightedMath;

/// Protocol constants every pool is checked against.
///
/// `Default` yields the production values. Deserialization fills omitted
/// fields from the defaults, so a config file only lists overrides.
///
/// | Limit | Default |
/// |-------|---------|
/// | fee ceilings (swap, OPC, market) | 10% each |
/// | token weight | 1 to 50 |
/// | total weight | 50 |
/// | minimum balance | `1e6` base units |
/// | max in / out ratio | 1/2 of the balance |
/// | initial pool supply | 100 shares |
/// | minimum vesting period | 2 426 000 blocks |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProtocolLimits {
    /// Lowest accepted swap fee.
    pub min_swap_fee: FeeRate,
    /// Highest accepted swap fee.
    pub max_swap_fee: FeeRate,
    /// Highest accepted OPC fee.
    pub max_opc_fee: FeeRate,
    /// Highest accepted publish- or consume-market fee.
    pub max_market_fee: FeeRate,
    /// Smallest token weight.
    pub min_weight: Weight,
    /// Largest token weight.
    pub max_weight: Weight,
    /// Largest sum of both weights.
    pub max_total_weight: Weight,
    /// Smallest balance a bound token may hold.
    pub min_balance: Amount,
    /// Largest single input as a fraction of the input balance.
    pub max_in_ratio: Ratio,
    /// Largest single output as a fraction of the output balance.
    pub max_out_ratio: Ratio,
    /// Shares minted when a pool is finalized.
    pub init_pool_supply: PoolShares,
    /// Shortest vesting period, in blocks.
    pub min_vesting_blocks: u64,
}

impl Default for ProtocolLimits {
    fn default() -> Self {
        Self {
            min_swap_fee: FeeRate::ZERO,
            max_swap_fee: FeeRate::from_bps(1_000),
            max_opc_fee: FeeRate::from_bps(1_000),
            max_market_fee: FeeRate::from_bps(1_000),
            min_weight: Weight::from_whole(1),
            max_weight: Weight::from_whole(50),
            max_total_weight: Weight::from_whole(50),
            min_balance: Amount::new(1_000_000),
            max_in_ratio: Ratio::HALF,
            max_out_ratio: Ratio::HALF,
            init_pool_supply: PoolShares::new(100 * ONE_TOKEN),
            min_vesting_blocks: 2_426_000,
        }
    }
}

impl ProtocolLimits {
    /// Checks the limits are self-consistent.
    ///
    /// # Errors
    ///
    /// - [`AmmError::FeeRateOutOfRange`] if a fee ceiling reaches 100% or
    ///   the swap fee floor exceeds its ceiling.
    /// - [`AmmError::InvalidWeight`] if the weight bounds are empty.
    /// - [`AmmError::InvalidConfiguration`] for trade ratios outside
    ///   `(0, 1]` or a zero initial supply.
    pub fn validate(&self) -> crate::error::Result<()> {
        for ceiling in [self.max_swap_fee, self.max_opc_fee, self.max_market_fee] {
            if !ceiling.ratio().is_proper() {
                return Err(AmmError::FeeRateOutOfRange(
                    "fee ceilings must be below 100%",
                ));
            }
        }
        if self.min_swap_fee > self.max_swap_fee {
            return Err(AmmError::FeeRateOutOfRange(
                "minimum swap fee exceeds maximum",
            ));
        }
        if self.min_weight.is_zero() || self.min_weight > self.max_weight {
            return Err(AmmError::InvalidWeight("weight bounds are empty"));
        }
        for ratio in [self.max_in_ratio, self.max_out_ratio] {
            if ratio.is_zero() || ratio > Ratio::ONE {
                return Err(AmmError::InvalidConfiguration(
                    "trade ratios must lie in (0, 1]",
                ));
            }
        }
        if self.init_pool_supply.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "initial pool supply must be positive",
            ));
        }
        Ok(())
    }

    /// The curve calculator configured with these trade-size limits.
    #[must_use]
    pub const fn math(&self) -> WeightedMath {
        WeightedMath::new(self.max_in_ratio, self.max_out_ratio)
    }

    /// Checks a swap fee against the floor and ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeRateOutOfRange`] if out of bounds.
    pub fn check_swap_fee(&self, fee: FeeRate) -> crate::error::Result<()> {
        if fee < self.min_swap_fee || fee > self.max_swap_fee {
            return Err(AmmError::FeeRateOutOfRange("swap fee out of range"));
        }
        Ok(())
    }

    /// Checks an OPC fee against its ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeRateOutOfRange`] if above the ceiling.
    pub fn check_opc_fee(&self, fee: FeeRate) -> crate::error::Result<()> {
        if fee > self.max_opc_fee {
            return Err(AmmError::FeeRateOutOfRange("opc fee out of range"));
        }
        Ok(())
    }

    /// Checks a publish- or consume-market fee against its ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeRateOutOfRange`] if above the ceiling.
    pub fn check_market_fee(&self, fee: FeeRate) -> crate::error::Result<()> {
        if fee > self.max_market_fee {
            return Err(AmmError::FeeRateOutOfRange("market fee out of range"));
        }
        Ok(())
    }

    /// Checks one token weight.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidWeight`] if out of bounds.
    pub fn check_weight(&self, weight: Weight) -> crate::error::Result<()> {
        if weight < self.min_weight || weight > self.max_weight {
            return Err(AmmError::InvalidWeight("weight out of range"));
        }
        Ok(())
    }

    /// Checks the sum of both weights.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidWeight`] if the sum exceeds the maximum.
    pub fn check_total_weight(&self, total: Weight) -> crate::error::Result<()> {
        if total > self.max_total_weight {
            return Err(AmmError::InvalidWeight("total weight exceeds maximum"));
        }
        Ok(())
    }

    /// Checks a bound token balance.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if below the minimum.
    pub fn check_balance(&self, balance: Amount) -> crate::error::Result<()> {
        if balance < self.min_balance {
            return Err(AmmError::InvalidAmount("balance below minimum"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let Ok(()) = ProtocolLimits::default().validate() else {
            panic!("expected Ok");
        };
    }

    #[test]
    fn fee_checks() {
        let l = ProtocolLimits::default();
        assert!(l.check_swap_fee(FeeRate::from_bps(1_000)).is_ok());
        assert!(matches!(
            l.check_swap_fee(FeeRate::from_bps(1_001)),
            Err(AmmError::FeeRateOutOfRange(_))
        ));
        assert!(l.check_opc_fee(FeeRate::from_bps(1_001)).is_err());
        assert!(l.check_market_fee(FeeRate::ZERO).is_ok());
    }

    #[test]
    fn weight_checks() {
        let l = ProtocolLimits::default();
        assert!(l.check_weight(Weight::from_whole(1)).is_ok());
        assert!(l.check_weight(Weight::new(ONE_TOKEN - 1)).is_err());
        assert!(l.check_weight(Weight::from_whole(51)).is_err());
        assert!(l.check_total_weight(Weight::from_whole(50)).is_ok());
        assert!(l.check_total_weight(Weight::from_whole(51)).is_err());
    }

    #[test]
    fn balance_check() {
        let l = ProtocolLimits::default();
        assert!(l.check_balance(Amount::new(1_000_000)).is_ok());
        assert!(matches!(
            l.check_balance(Amount::new(999_999)),
            Err(AmmError::InvalidAmount(_))
        ));
    }

    #[test]
    fn inconsistent_limits_rejected() {
        let l = ProtocolLimits {
            max_in_ratio: Ratio::ZERO,
            ..ProtocolLimits::default()
        };
        assert!(matches!(l.validate(), Err(AmmError::InvalidConfiguration(_))));

        let l = ProtocolLimits {
            max_swap_fee: FeeRate::from_bps(10_000),
            ..ProtocolLimits::default()
        };
        assert!(matches!(l.validate(), Err(AmmError::FeeRateOutOfRange(_))));
    }

    #[test]
    fn math_uses_ratios() {
        let m = ProtocolLimits::default().math();
        assert_eq!(m.max_in_ratio(), Ratio::HALF);
        assert_eq!(m.max_out_ratio(), Ratio::HALF);
    }
}
