//! Weighted constant-value curve for a two-token pool.
//!
//! The pool holds the weighted product `B_dt^w_dt · B_bt^w_bt` constant
//! across swaps (minus fees). The formulas below price swaps against that
//! invariant and price single-sided joins and exits against the pool-share
//! supply.
//!
//! # Formulas
//!
//! ```text
//! spot_price          = (B_in / w_in) / (B_out / w_out) / (1 - f)
//! out_given_in        = B_out · (1 - (B_in / (B_in + a·(1-f)))^(w_in/w_out))
//! in_given_out        = B_in · ((B_out / (B_out - o))^(w_out/w_in) - 1) / (1 - f)
//! pool_out_given_in   = S · ((1 + a·(1 - zaz) / B)^(w/W) - 1)
//! single_in_given_out = B · ((1 + s/S)^(W/w) - 1) / (1 - zaz)
//! single_out_given_in = B · (1 - (1 - s/S)^(W/w)) · (1 - zaz)
//! pool_in_given_out   = S · (1 - (1 - o / (B·(1 - zaz)))^(w/W))
//! zaz                 = (1 - w/W) · f
//! ```
//!
//! `zaz` charges the swap fee only on the share of a single-sided deposit
//! or withdrawal that is implicitly traded for the other token.
//!
//! All intermediates are [`U256`]; each result is floored once.

use ethnum::U256;

use super::fixed::{mul, mul_div, narrow, pow, sub, wide, RAY, WAD};
use crate::domain::{Amount, FeeRate, PoolShares, Ratio, SpotPrice, Weight};
use crate::error::AmmError;

/// Stateless weighted-curve calculator carrying the trade-size limits.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::{Amount, FeeRate, SpotPrice, Weight};
/// use datatoken_pool::math::WeightedMath;
///
/// let math = WeightedMath::default();
/// let b = Amount::from_whole(1_000).unwrap_or_default();
/// let w = Weight::from_whole(5);
/// let price = math.spot_price(b, w, b, w, FeeRate::ZERO);
/// assert_eq!(price, Ok(SpotPrice::ONE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedMath {
    max_in_ratio: Ratio,
    max_out_ratio: Ratio,
}

impl Default for WeightedMath {
    fn default() -> Self {
        Self::new(Ratio::HALF, Ratio::HALF)
    }
}

impl WeightedMath {
    /// Creates a calculator with the given maximum in/out trade fractions.
    #[must_use]
    pub const fn new(max_in_ratio: Ratio, max_out_ratio: Ratio) -> Self {
        Self {
            max_in_ratio,
            max_out_ratio,
        }
    }

    /// Largest input accepted, as a fraction of the input balance.
    #[must_use]
    pub const fn max_in_ratio(&self) -> Ratio {
        self.max_in_ratio
    }

    /// Largest output accepted, as a fraction of the output balance.
    #[must_use]
    pub const fn max_out_ratio(&self) -> Ratio {
        self.max_out_ratio
    }

    /// Marginal price of the output token in units of the input token,
    /// including the swap fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`] if either weight is zero.
    /// - [`AmmError::FeeRateOutOfRange`] if `swap_fee >= 1`.
    /// - [`AmmError::DivisionByZero`] if `balance_out` is zero.
    /// - [`AmmError::Overflow`] if the price exceeds `u128`.
    pub fn spot_price(
        &self,
        balance_in: Amount,
        weight_in: Weight,
        balance_out: Amount,
        weight_out: Weight,
        swap_fee: FeeRate,
    ) -> crate::error::Result<SpotPrice> {
        check_weights(weight_in, weight_out)?;
        let one_minus_fee = fee_complement(swap_fee)?;

        let numer = mul(
            mul(wide(balance_in.get()), wide(weight_out.get()), "spot numerator")?,
            WAD,
            "spot numerator",
        )?;
        let denom = mul(wide(balance_out.get()), wide(weight_in.get()), "spot denominator")?;
        if denom == U256::ZERO {
            return Err(AmmError::DivisionByZero);
        }
        let ratio = numer / denom;
        let price = mul_div(ratio, WAD, one_minus_fee)?;
        Ok(SpotPrice::new(narrow(price, "spot price exceeds u128")?))
    }

    /// Output amount for an exact input amount.
    ///
    /// Always strictly below `balance_out`; zero for a zero input.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`] if either weight is zero.
    /// - [`AmmError::FeeRateOutOfRange`] if `swap_fee >= 1`.
    /// - [`AmmError::ExcessiveTradeSize`] if `amount_in` exceeds the
    ///   maximum in-ratio of `balance_in`, or the output exceeds the
    ///   maximum out-ratio of `balance_out`.
    /// - [`AmmError::InsufficientReserve`] if the pool cannot pay out.
    pub fn out_given_in(
        &self,
        balance_in: Amount,
        weight_in: Weight,
        balance_out: Amount,
        weight_out: Weight,
        amount_in: Amount,
        swap_fee: FeeRate,
    ) -> crate::error::Result<Amount> {
        check_weights(weight_in, weight_out)?;
        let one_minus_fee = fee_complement(swap_fee)?;
        if amount_in > self.max_in_ratio.apply(balance_in)? {
            return Err(AmmError::ExcessiveTradeSize(
                "amount in exceeds maximum in-ratio",
            ));
        }
        if amount_in.is_zero() {
            return Ok(Amount::ZERO);
        }

        let held = mul(wide(balance_in.get()), WAD, "balance in overflow")?;
        let added = mul(wide(amount_in.get()), one_minus_fee, "amount in overflow")?;
        let base = mul_div(held, RAY, held + added)?;
        let exponent = mul_div(wide(weight_in.get()), RAY, wide(weight_out.get()))?;
        let p = pow(base, exponent)?.min(RAY);

        let out = mul_div(wide(balance_out.get()), RAY - p, RAY)?;
        let out = Amount::new(narrow(out, "amount out exceeds u128")?);
        if out > self.max_out_ratio.apply(balance_out)? {
            return Err(AmmError::ExcessiveTradeSize(
                "amount out exceeds maximum out-ratio",
            ));
        }
        if out >= balance_out {
            return Err(AmmError::InsufficientReserve("output drains the pool"));
        }
        Ok(out)
    }

    /// Gross input amount required for an exact output amount.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`] if either weight is zero.
    /// - [`AmmError::FeeRateOutOfRange`] if `swap_fee >= 1`.
    /// - [`AmmError::ExcessiveTradeSize`] if `amount_out` exceeds the
    ///   maximum out-ratio of `balance_out`.
    /// - [`AmmError::InsufficientReserve`] if `amount_out >= balance_out`.
    /// - [`AmmError::Overflow`] if the input does not fit in `u128`.
    pub fn in_given_out(
        &self,
        balance_in: Amount,
        weight_in: Weight,
        balance_out: Amount,
        weight_out: Weight,
        amount_out: Amount,
        swap_fee: FeeRate,
    ) -> crate::error::Result<Amount> {
        check_weights(weight_in, weight_out)?;
        let one_minus_fee = fee_complement(swap_fee)?;
        if amount_out > self.max_out_ratio.apply(balance_out)? {
            return Err(AmmError::ExcessiveTradeSize(
                "amount out exceeds maximum out-ratio",
            ));
        }
        if amount_out >= balance_out {
            return Err(AmmError::InsufficientReserve("output drains the pool"));
        }
        if amount_out.is_zero() {
            return Ok(Amount::ZERO);
        }

        let remaining = wide(balance_out.get() - amount_out.get());
        let base = mul_div(wide(balance_out.get()), RAY, remaining)?;
        let exponent = mul_div(wide(weight_out.get()), RAY, wide(weight_in.get()))?;
        let p = pow(base, exponent)?.max(RAY);

        let grown = mul(wide(balance_in.get()), p - RAY, "amount in overflow")?;
        let amount = mul_div(grown, WAD, mul(one_minus_fee, RAY, "fee scale")?)?;
        Ok(Amount::new(narrow(amount, "amount in exceeds u128")?))
    }

    /// Pool shares minted for a single-sided deposit of `amount_in`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`] if `weight_in` is zero or exceeds
    ///   `total_weight`.
    /// - [`AmmError::FeeRateOutOfRange`] if `swap_fee >= 1`.
    /// - [`AmmError::ExcessiveTradeSize`] if `amount_in` exceeds the
    ///   maximum in-ratio of `balance_in`.
    /// - [`AmmError::DivisionByZero`] if `balance_in` is zero.
    pub fn pool_out_given_single_in(
        &self,
        balance_in: Amount,
        weight_in: Weight,
        pool_supply: PoolShares,
        total_weight: Weight,
        amount_in: Amount,
        swap_fee: FeeRate,
    ) -> crate::error::Result<PoolShares> {
        let zaz = single_sided_fee(weight_in, total_weight, swap_fee)?;
        if amount_in > self.max_in_ratio.apply(balance_in)? {
            return Err(AmmError::ExcessiveTradeSize(
                "amount in exceeds maximum in-ratio",
            ));
        }
        if amount_in.is_zero() {
            return Ok(PoolShares::ZERO);
        }

        let held = mul(wide(balance_in.get()), WAD, "balance in overflow")?;
        let added = mul(wide(amount_in.get()), WAD - zaz, "amount in overflow")?;
        let ratio = mul_div(held + added, RAY, held)?;
        let exponent = mul_div(wide(weight_in.get()), RAY, wide(total_weight.get()))?;
        let p = pow(ratio, exponent)?.max(RAY);

        let shares = mul_div(wide(pool_supply.get()), p - RAY, RAY)?;
        Ok(PoolShares::new(narrow(shares, "pool out exceeds u128")?))
    }

    /// Single-sided deposit required to mint exactly `pool_amount_out`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`] if `weight_in` is zero or exceeds
    ///   `total_weight`.
    /// - [`AmmError::FeeRateOutOfRange`] if `swap_fee >= 1`.
    /// - [`AmmError::DivisionByZero`] if `pool_supply` is zero.
    /// - [`AmmError::ExcessiveTradeSize`] if the required deposit exceeds
    ///   the maximum in-ratio of `balance_in`.
    pub fn single_in_given_pool_out(
        &self,
        balance_in: Amount,
        weight_in: Weight,
        pool_supply: PoolShares,
        total_weight: Weight,
        pool_amount_out: PoolShares,
        swap_fee: FeeRate,
    ) -> crate::error::Result<Amount> {
        let zaz = single_sided_fee(weight_in, total_weight, swap_fee)?;
        if pool_amount_out.is_zero() {
            return Ok(Amount::ZERO);
        }

        if pool_supply.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        // the deposit is at least B·s/S, so s/S above the in-ratio can never fit
        let supply = wide(pool_supply.get());
        let share_cap = mul_div(supply, wide(self.max_in_ratio.get()), WAD)?;
        if wide(pool_amount_out.get()) > share_cap {
            return Err(AmmError::ExcessiveTradeSize(
                "pool amount out exceeds maximum in-ratio",
            ));
        }
        let ratio = mul_div(supply + wide(pool_amount_out.get()), RAY, supply)?;
        let exponent = mul_div(wide(total_weight.get()), RAY, wide(weight_in.get()))?;
        let p = pow(ratio, exponent)?.max(RAY);

        let grown = mul(wide(balance_in.get()), p - RAY, "amount in overflow")?;
        let amount = mul_div(grown, WAD, mul(RAY, WAD - zaz, "fee scale")?)?;
        let amount = Amount::new(narrow(amount, "amount in exceeds u128")?);
        if amount > self.max_in_ratio.apply(balance_in)? {
            return Err(AmmError::ExcessiveTradeSize(
                "amount in exceeds maximum in-ratio",
            ));
        }
        Ok(amount)
    }

    /// Token amount paid out for burning exactly `pool_amount_in`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`] if `weight_out` is zero or exceeds
    ///   `total_weight`.
    /// - [`AmmError::FeeRateOutOfRange`] if `swap_fee >= 1`.
    /// - [`AmmError::InsufficientReserve`] if `pool_amount_in` is not below
    ///   `pool_supply`.
    /// - [`AmmError::ExcessiveTradeSize`] if the payout exceeds the maximum
    ///   out-ratio of `balance_out`.
    pub fn single_out_given_pool_in(
        &self,
        balance_out: Amount,
        weight_out: Weight,
        pool_supply: PoolShares,
        total_weight: Weight,
        pool_amount_in: PoolShares,
        swap_fee: FeeRate,
    ) -> crate::error::Result<Amount> {
        let zaz = single_sided_fee(weight_out, total_weight, swap_fee)?;
        if pool_amount_in >= pool_supply {
            return Err(AmmError::InsufficientReserve(
                "cannot burn the entire pool supply",
            ));
        }
        if pool_amount_in.is_zero() {
            return Ok(Amount::ZERO);
        }

        let supply = wide(pool_supply.get());
        let ratio = mul_div(supply - wide(pool_amount_in.get()), RAY, supply)?;
        let exponent = mul_div(wide(total_weight.get()), RAY, wide(weight_out.get()))?;
        let p = pow(ratio, exponent)?.min(RAY);

        let released = mul(wide(balance_out.get()), RAY - p, "amount out overflow")?;
        let amount = mul_div(released, WAD - zaz, mul(RAY, WAD, "fee scale")?)?;
        let amount = Amount::new(narrow(amount, "amount out exceeds u128")?);
        if amount > self.max_out_ratio.apply(balance_out)? {
            return Err(AmmError::ExcessiveTradeSize(
                "amount out exceeds maximum out-ratio",
            ));
        }
        Ok(amount)
    }

    /// Pool shares burned to withdraw exactly `amount_out` of one token.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidWeight`] if `weight_out` is zero or exceeds
    ///   `total_weight`.
    /// - [`AmmError::FeeRateOutOfRange`] if `swap_fee >= 1`.
    /// - [`AmmError::ExcessiveTradeSize`] if `amount_out` exceeds the
    ///   maximum out-ratio of `balance_out`.
    /// - [`AmmError::InsufficientReserve`] if the fee-adjusted withdrawal
    ///   would empty the balance.
    pub fn pool_in_given_single_out(
        &self,
        balance_out: Amount,
        weight_out: Weight,
        pool_supply: PoolShares,
        total_weight: Weight,
        amount_out: Amount,
        swap_fee: FeeRate,
    ) -> crate::error::Result<PoolShares> {
        let zaz = single_sided_fee(weight_out, total_weight, swap_fee)?;
        if amount_out > self.max_out_ratio.apply(balance_out)? {
            return Err(AmmError::ExcessiveTradeSize(
                "amount out exceeds maximum out-ratio",
            ));
        }
        if amount_out.is_zero() {
            return Ok(PoolShares::ZERO);
        }

        let held = mul(wide(balance_out.get()), WAD - zaz, "balance out overflow")?;
        let taken = mul(wide(amount_out.get()), WAD, "amount out overflow")?;
        if taken >= held {
            return Err(AmmError::InsufficientReserve("output drains the pool"));
        }
        let ratio = mul_div(held - taken, RAY, held)?;
        let exponent = mul_div(wide(weight_out.get()), RAY, wide(total_weight.get()))?;
        let p = pow(ratio, exponent)?.min(RAY);

        let shares = mul_div(wide(pool_supply.get()), RAY - p, RAY)?;
        Ok(PoolShares::new(narrow(shares, "pool in exceeds u128")?))
    }
}

/// The effective fee on a single-sided deposit or withdrawal of a token
/// with `weight` out of `total_weight`: `(1 - weight/total_weight) · fee`,
/// `1e18`-scaled.
///
/// # Errors
///
/// - [`AmmError::InvalidWeight`] if `weight` is zero or exceeds
///   `total_weight`.
/// - [`AmmError::FeeRateOutOfRange`] if `swap_fee >= 1`.
pub fn single_sided_fee(
    weight: Weight,
    total_weight: Weight,
    swap_fee: FeeRate,
) -> crate::error::Result<U256> {
    if weight.is_zero() {
        return Err(AmmError::InvalidWeight("weight must be greater than zero"));
    }
    if weight > total_weight {
        return Err(AmmError::InvalidWeight(
            "token weight exceeds total weight",
        ));
    }
    fee_complement(swap_fee)?;
    let normalized = mul_div(wide(weight.get()), WAD, wide(total_weight.get()))?;
    mul_div(sub(WAD, normalized, "normalized weight above one")?, wide(swap_fee.get()), WAD)
}

fn check_weights(weight_in: Weight, weight_out: Weight) -> crate::error::Result<()> {
    if weight_in.is_zero() || weight_out.is_zero() {
        return Err(AmmError::InvalidWeight("weight must be greater than zero"));
    }
    Ok(())
}

fn fee_complement(swap_fee: FeeRate) -> crate::error::Result<U256> {
    if !swap_fee.ratio().is_proper() {
        return Err(AmmError::FeeRateOutOfRange("swap fee must be below 100%"));
    }
    Ok(WAD - wide(swap_fee.get()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn whole(n: u128) -> Amount {
        let Some(a) = Amount::from_whole(n) else {
            panic!("amount overflow");
        };
        a
    }

    fn math() -> WeightedMath {
        WeightedMath::default()
    }

    // -- spot_price ---------------------------------------------------------

    #[test]
    fn spot_price_balanced_pool_is_one() {
        let w = Weight::from_whole(5);
        let Ok(p) = math().spot_price(whole(1_000), w, whole(1_000), w, FeeRate::ZERO) else {
            panic!("expected Ok");
        };
        assert_eq!(p, SpotPrice::ONE);
    }

    #[test]
    fn spot_price_respects_weights() {
        // 100 BT at weight 1 against 900 DT at weight 9 prices DT at 1 BT.
        let Ok(p) = math().spot_price(
            whole(100),
            Weight::from_whole(1),
            whole(900),
            Weight::from_whole(9),
            FeeRate::ZERO,
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(p, SpotPrice::ONE);
    }

    #[test]
    fn spot_price_includes_fee() {
        let w = Weight::from_whole(1);
        let Ok(p) = math().spot_price(whole(10), w, whole(10), w, FeeRate::from_bps(5_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(p, SpotPrice::new(2 * WAD_U128));
    }

    #[test]
    fn spot_price_monotonic_in_balances() {
        let w = Weight::from_whole(1);
        let m = math();
        let Ok(base) = m.spot_price(whole(100), w, whole(100), w, FeeRate::ZERO) else {
            panic!("expected Ok");
        };
        let Ok(more_in) = m.spot_price(whole(101), w, whole(100), w, FeeRate::ZERO) else {
            panic!("expected Ok");
        };
        let Ok(more_out) = m.spot_price(whole(100), w, whole(101), w, FeeRate::ZERO) else {
            panic!("expected Ok");
        };
        assert!(more_in > base);
        assert!(more_out < base);
    }

    #[test]
    fn zero_weight_rejected() {
        let r = math().spot_price(
            whole(1),
            Weight::ZERO,
            whole(1),
            Weight::from_whole(1),
            FeeRate::ZERO,
        );
        assert!(matches!(r, Err(AmmError::InvalidWeight(_))));
    }

    #[test]
    fn full_fee_rejected() {
        let w = Weight::from_whole(1);
        let r = math().spot_price(whole(1), w, whole(1), w, FeeRate::from_bps(10_000));
        assert!(matches!(r, Err(AmmError::FeeRateOutOfRange(_))));
    }

    // -- out_given_in -------------------------------------------------------

    #[test]
    fn out_given_in_equal_weights_matches_constant_product() {
        let w = Weight::from_whole(1);
        let Ok(out) =
            math().out_given_in(whole(1_000), w, whole(1_000), w, whole(100), FeeRate::ZERO)
        else {
            panic!("expected Ok");
        };
        // 1000 - 1000*1000/1100, floored
        assert_eq!(out, Amount::new(90_909_090_909_090_909_090));
    }

    #[test]
    fn out_given_in_zero_input() {
        let w = Weight::from_whole(1);
        assert_eq!(
            math().out_given_in(whole(10), w, whole(10), w, Amount::ZERO, FeeRate::ZERO),
            Ok(Amount::ZERO)
        );
    }

    #[test]
    fn out_given_in_fee_reduces_output() {
        let w = Weight::from_whole(1);
        let m = math();
        let Ok(free) = m.out_given_in(whole(1_000), w, whole(1_000), w, whole(10), FeeRate::ZERO)
        else {
            panic!("expected Ok");
        };
        let Ok(charged) =
            m.out_given_in(whole(1_000), w, whole(1_000), w, whole(10), FeeRate::from_bps(100))
        else {
            panic!("expected Ok");
        };
        assert!(charged < free);
    }

    #[test]
    fn out_given_in_rejects_oversized_trade() {
        let w = Weight::from_whole(1);
        let r = math().out_given_in(
            whole(100),
            w,
            whole(100),
            w,
            Amount::new(whole(50).get() + 1),
            FeeRate::ZERO,
        );
        assert!(matches!(r, Err(AmmError::ExcessiveTradeSize(_))));
    }

    // -- in_given_out -------------------------------------------------------

    #[test]
    fn in_given_out_inverts_out_given_in() {
        let (wi, wo) = (Weight::from_whole(1), Weight::from_whole(9));
        let fee = FeeRate::from_bps(10);
        let m = math();
        let a = whole(7);
        // DT is cheap here, so one unit of output is worth under one unit of input.
        let Ok(out) = m.out_given_in(whole(100), wi, whole(9_000), wo, a, fee) else {
            panic!("expected Ok");
        };
        let Ok(back) = m.in_given_out(whole(100), wi, whole(9_000), wo, out, fee) else {
            panic!("expected Ok");
        };
        assert!(a.abs_diff(&back) <= Amount::UNIT, "{a} vs {back}");
    }

    #[test]
    fn out_given_in_rejects_output_above_out_ratio() {
        // selling into the heavy side: 10 of 100 at w9 releases ~518 of 900 at w1
        let r = math().out_given_in(
            whole(100),
            Weight::from_whole(9),
            whole(900),
            Weight::from_whole(1),
            whole(10),
            FeeRate::ZERO,
        );
        assert_eq!(
            r,
            Err(AmmError::ExcessiveTradeSize(
                "amount out exceeds maximum out-ratio"
            ))
        );
    }

    #[test]
    fn in_given_out_rejects_oversized_trade() {
        let w = Weight::from_whole(1);
        let r = math().in_given_out(whole(100), w, whole(100), w, whole(60), FeeRate::ZERO);
        assert!(matches!(r, Err(AmmError::ExcessiveTradeSize(_))));
    }

    #[test]
    fn in_given_out_full_withdrawal_rejected() {
        let w = Weight::from_whole(1);
        let m = WeightedMath::new(Ratio::ONE, Ratio::ONE);
        let r = m.in_given_out(whole(100), w, whole(100), w, whole(100), FeeRate::ZERO);
        assert!(matches!(r, Err(AmmError::InsufficientReserve(_))));
    }

    // -- single-sided -------------------------------------------------------

    #[test]
    fn single_sided_fee_scales_with_other_weight() {
        let Ok(zaz) =
            single_sided_fee(Weight::from_whole(1), Weight::from_whole(10), FeeRate::from_bps(100))
        else {
            panic!("expected Ok");
        };
        // (1 - 0.1) * 1% = 0.9%
        assert_eq!(zaz, wide(9_000_000_000_000_000));
    }

    #[test]
    fn single_sided_fee_rejects_weight_above_total() {
        let r = single_sided_fee(Weight::from_whole(2), Weight::from_whole(1), FeeRate::ZERO);
        assert!(matches!(r, Err(AmmError::InvalidWeight(_))));
    }

    #[test]
    fn pool_out_and_single_in_agree() {
        let m = math();
        let fee = FeeRate::from_bps(10);
        let (w, total) = (Weight::from_whole(1), Weight::from_whole(10));
        let supply = PoolShares::new(100 * WAD_U128);
        let Ok(shares) = m.pool_out_given_single_in(whole(100), w, supply, total, whole(5), fee)
        else {
            panic!("expected Ok");
        };
        let Ok(needed) = m.single_in_given_pool_out(whole(100), w, supply, total, shares, fee)
        else {
            panic!("expected Ok");
        };
        assert!(whole(5).abs_diff(&needed).get() <= 20, "{needed}");
    }

    #[test]
    fn single_out_and_pool_in_agree() {
        let m = math();
        let fee = FeeRate::from_bps(10);
        let (w, total) = (Weight::from_whole(9), Weight::from_whole(10));
        let supply = PoolShares::new(100 * WAD_U128);
        let burn = PoolShares::new(2 * WAD_U128);
        let Ok(out) = m.single_out_given_pool_in(whole(900), w, supply, total, burn, fee) else {
            panic!("expected Ok");
        };
        let Ok(shares) = m.pool_in_given_single_out(whole(900), w, supply, total, out, fee) else {
            panic!("expected Ok");
        };
        assert!(burn.get().abs_diff(shares.get()) <= 10, "{shares}");
    }

    #[test]
    fn single_out_rejects_whole_supply() {
        let supply = PoolShares::new(10);
        let r = math().single_out_given_pool_in(
            whole(1),
            Weight::from_whole(1),
            supply,
            Weight::from_whole(2),
            supply,
            FeeRate::ZERO,
        );
        assert!(matches!(r, Err(AmmError::InsufficientReserve(_))));
    }

    #[test]
    fn single_in_given_pool_out_guards_result() {
        let supply = PoolShares::new(100 * WAD_U128);
        let r = math().single_in_given_pool_out(
            whole(100),
            Weight::from_whole(1),
            supply,
            Weight::from_whole(2),
            supply,
            FeeRate::ZERO,
        );
        assert!(matches!(r, Err(AmmError::ExcessiveTradeSize(_))));
    }

    #[test]
    fn single_in_given_pool_out_rejects_oversized_request_before_pricing() {
        let supply = PoolShares::new(100 * WAD_U128);
        let r = math().single_in_given_pool_out(
            whole(100),
            Weight::from_whole(1),
            supply,
            Weight::from_whole(50),
            PoolShares::new(10 * supply.get()),
            FeeRate::ZERO,
        );
        assert_eq!(
            r,
            Err(AmmError::ExcessiveTradeSize(
                "pool amount out exceeds maximum in-ratio"
            ))
        );
    }

    #[test]
    fn single_in_given_pool_out_zero_supply() {
        let r = math().single_in_given_pool_out(
            whole(100),
            Weight::from_whole(1),
            PoolShares::ZERO,
            Weight::from_whole(2),
            PoolShares::new(1),
            FeeRate::ZERO,
        );
        assert_eq!(r, Err(AmmError::DivisionByZero));
    }

    const WAD_U128: u128 = crate::domain::WAD;

    // -- properties ---------------------------------------------------------

    mod properties {
        use proptest::prelude::*;

        use super::{math, whole};
        use crate::domain::{Amount, FeeRate, Weight};
        use crate::error::AmmError;

        /// Balances where one output unit is worth at most a fraction of one
        /// input unit: `B_out = B_in · m · w_out` with `m >= 4`.
        fn cheap_output_pool() -> impl Strategy<Value = (u128, u128, u128, u128, u32, u128)> {
            (
                1u128..=1_000,
                1u128..=50,
                1u128..=50,
                4u128..=20,
                0u32..=1_000,
                1u128..=500,
            )
                .prop_map(|(b_in, w_in, w_out, m, fee_bps, per_mille)| {
                    (b_in, w_in, b_in * m * w_out, w_out, fee_bps, per_mille)
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn prop_out_given_in_round_trips(
                (b_in, w_in, b_out, w_out, fee_bps, per_mille) in cheap_output_pool()
            ) {
                let m = math();
                let (bal_in, bal_out) = (whole(b_in), whole(b_out));
                let (wi, wo) = (Weight::from_whole(w_in), Weight::from_whole(w_out));
                let fee = FeeRate::from_bps(fee_bps);
                let amount = Amount::new(bal_in.get() / 1_000 * per_mille);
                prop_assume!(!amount.is_zero());

                // only the out-ratio can reject an in-ratio-sized trade
                let out = match m.out_given_in(bal_in, wi, bal_out, wo, amount, fee) {
                    Ok(out) => out,
                    Err(AmmError::ExcessiveTradeSize(_)) => return Ok(()),
                    Err(e) => return Err(TestCaseError::fail(format!("unexpected {e}"))),
                };
                prop_assert!(out < bal_out);
                prop_assume!(!out.is_zero());

                // marginal price after the trade stays at or below one half
                let Some(after_in) = bal_in.checked_add(&amount) else {
                    return Ok(());
                };
                let Some(after_out) = bal_out.checked_sub(&out) else {
                    return Ok(());
                };
                let Ok(price) = m.spot_price(after_in, wi, after_out, wo, fee) else {
                    return Ok(());
                };
                prop_assume!(price.get() <= super::WAD_U128 / 2);

                let Ok(back) = m.in_given_out(bal_in, wi, bal_out, wo, out, fee) else {
                    return Err(TestCaseError::fail("output of an exact-in trade must invert"));
                };
                prop_assert!(
                    amount.abs_diff(&back) <= Amount::UNIT,
                    "{} vs {}", amount, back
                );
            }
        }
    }
}
