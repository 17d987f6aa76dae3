//! Splitting a gross input amount across the fee tiers.

use crate::domain::{Amount, FeeBreakdown, FeeRate};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// The four fee rates applied to one trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeRates {
    /// Swap fee kept by liquidity providers.
    pub lp: FeeRate,
    /// Protocol community fee.
    pub opc: FeeRate,
    /// Publishing marketplace fee.
    pub publish_market: FeeRate,
    /// Consuming marketplace fee.
    pub consume_market: FeeRate,
}

impl FeeRates {
    /// Sum of all four rates; the rate the curve quotes against.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeRateOutOfRange`] if the sum reaches 100%.
    pub fn total(&self) -> crate::error::Result<FeeRate> {
        let total = self
            .lp
            .checked_add(&self.opc)?
            .checked_add(&self.publish_market)?
            .checked_add(&self.consume_market)?;
        if !total.ratio().is_proper() {
            return Err(AmmError::FeeRateOutOfRange(
                "combined fee rate must be below 100%",
            ));
        }
        Ok(total)
    }
}

/// Splits `amount_in` across the four tiers.
///
/// Each fee is `floor(amount_in * rate)`, deducted in the fixed order LP,
/// OPC, publish market, consume market. `amount_added_to_pool` is the input
/// minus the three external fees; the LP fee is not subtracted because it
/// stays in the tradable balance.
///
/// # Errors
///
/// - [`AmmError::FeeRateOutOfRange`] if the combined rate reaches 100%.
/// - [`AmmError::Underflow`] if the fees exceed the input.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::{Amount, FeeRate};
/// use datatoken_pool::fees::{compute_fees, FeeRates};
///
/// let rates = FeeRates {
///     lp: FeeRate::from_bps(10),
///     opc: FeeRate::from_bps(10),
///     publish_market: FeeRate::ZERO,
///     consume_market: FeeRate::ZERO,
/// };
/// let Ok(fees) = compute_fees(Amount::new(10_000), &rates) else { return };
/// assert_eq!(fees.amount_added_to_pool, Amount::new(9_990));
/// assert_eq!(fees.amount_traded(), Amount::new(9_980));
/// ```
pub fn compute_fees(amount_in: Amount, rates: &FeeRates) -> crate::error::Result<FeeBreakdown> {
    rates.total()?;

    let lp = rates.lp.apply(amount_in)?;
    let opc = rates.opc.apply(amount_in)?;
    let publish_market = rates.publish_market.apply(amount_in)?;
    let consume_market = rates.consume_market.apply(amount_in)?;

    let amount_added_to_pool = amount_in
        .safe_sub(&opc)?
        .safe_sub(&publish_market)?
        .safe_sub(&consume_market)?;

    Ok(FeeBreakdown {
        lp,
        opc,
        publish_market,
        consume_market,
        amount_added_to_pool,
    })
}
