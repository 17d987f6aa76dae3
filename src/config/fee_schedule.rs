//! Pool fee configuration.

use super::ProtocolLimits;
use crate::domain::{Address, FeeRate, MarketFee};
use crate::fees::FeeRates;

/// The pool-level fee tiers.
///
/// The consume-market fee is not part of the schedule: each swap supplies
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeSchedule {
    /// LP fee on every swap and on the implicitly traded part of
    /// single-sided liquidity operations.
    pub swap_fee: FeeRate,
    /// Protocol community fee on every swap.
    pub opc_fee: FeeRate,
    /// Account allowed to receive OPC fees.
    pub opc_collector: Address,
    /// Publishing marketplace fee on every swap.
    pub publish_market_fee: MarketFee,
}

impl FeeSchedule {
    /// Checks every rate against its ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeRateOutOfRange`](crate::error::AmmError::FeeRateOutOfRange)
    /// for any rate out of bounds.
    pub fn validate(&self, limits: &ProtocolLimits) -> crate::error::Result<()> {
        limits.check_swap_fee(self.swap_fee)?;
        limits.check_opc_fee(self.opc_fee)?;
        limits.check_market_fee(self.publish_market_fee.rate)
    }

    /// The four rates applied to a swap routed by a marketplace charging
    /// `consume_market`.
    #[must_use]
    pub const fn rates(&self, consume_market: FeeRate) -> FeeRates {
        FeeRates {
            lp: self.swap_fee,
            opc: self.opc_fee,
            publish_market: self.publish_market_fee.rate,
            consume_market,
        }
    }
}
