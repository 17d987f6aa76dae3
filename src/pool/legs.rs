//! Single-sided join and exit legs on a [`ChangeSet`].
//!
//! Users and the side-staking controller plan their single-sided moves
//! through the same [`LegPlanner`], each leg pricing against the state
//! planned so far.

use ethnum::U256;

use super::ChangeSet;
use crate::domain::{Address, Amount, FeeRate, PoolShares, PoolWeights, TokenRole};
use crate::math::fixed::{mul_div, narrow, wide, WAD};
use crate::math::{single_sided_fee, WeightedMath};

/// Prices and records single-sided legs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LegPlanner {
    math: WeightedMath,
    swap_fee: FeeRate,
}

impl LegPlanner {
    pub(crate) const fn new(math: WeightedMath, swap_fee: FeeRate) -> Self {
        Self { math, swap_fee }
    }

    /// Deposits exactly `amount` of `role`, minting shares to `to`.
    pub(crate) fn join_exact_in(
        &self,
        cs: &mut ChangeSet,
        role: TokenRole,
        amount: Amount,
        to: Address,
    ) -> crate::error::Result<PoolShares> {
        let after = cs.after();
        let shares = self.math.pool_out_given_single_in(
            after.balances.get(role),
            after.weights.get(role),
            after.total_shares,
            after.weights.total()?,
            amount,
            self.swap_fee,
        )?;
        cs.credit(role, amount)?;
        cs.mint(to, shares)?;
        Ok(shares)
    }

    /// Mints exactly `shares` to `to`, depositing whatever `role` amount
    /// that costs.
    pub(crate) fn join_exact_shares(
        &self,
        cs: &mut ChangeSet,
        role: TokenRole,
        shares: PoolShares,
        to: Address,
    ) -> crate::error::Result<Amount> {
        let after = cs.after();
        let amount = self.math.single_in_given_pool_out(
            after.balances.get(role),
            after.weights.get(role),
            after.total_shares,
            after.weights.total()?,
            shares,
            self.swap_fee,
        )?;
        cs.credit(role, amount)?;
        cs.mint(to, shares)?;
        Ok(amount)
    }

    /// Burns exactly `shares` from `from` (holding `held`), withdrawing
    /// whatever `role` amount they are worth.
    pub(crate) fn exit_exact_shares(
        &self,
        cs: &mut ChangeSet,
        role: TokenRole,
        shares: PoolShares,
        from: Address,
        held: PoolShares,
    ) -> crate::error::Result<Amount> {
        let after = cs.after();
        let amount = self.math.single_out_given_pool_in(
            after.balances.get(role),
            after.weights.get(role),
            after.total_shares,
            after.weights.total()?,
            shares,
            self.swap_fee,
        )?;
        cs.burn(from, shares, held)?;
        cs.debit(role, amount)?;
        Ok(amount)
    }

    /// Withdraws exactly `amount` of `role`, burning whatever shares that
    /// costs from `from` (holding `held`).
    pub(crate) fn exit_exact_out(
        &self,
        cs: &mut ChangeSet,
        role: TokenRole,
        amount: Amount,
        from: Address,
        held: PoolShares,
    ) -> crate::error::Result<PoolShares> {
        let after = cs.after();
        let shares = self.math.pool_in_given_single_out(
            after.balances.get(role),
            after.weights.get(role),
            after.total_shares,
            after.weights.total()?,
            amount,
            self.swap_fee,
        )?;
        cs.burn(from, shares, held)?;
        cs.debit(role, amount)?;
        Ok(shares)
    }

    /// Fee retained by the pool on a single-sided deposit of `gross`.
    pub(crate) fn join_fee(
        &self,
        weights: &PoolWeights,
        role: TokenRole,
        gross: Amount,
    ) -> crate::error::Result<Amount> {
        let zaz = single_sided_fee(weights.get(role), weights.total()?, self.swap_fee)?;
        let fee = mul_div(wide(gross.get()), zaz, WAD)?;
        Ok(Amount::new(narrow(fee, "join fee exceeds u128")?))
    }

    /// Fee retained by the pool on a single-sided withdrawal that paid out
    /// `net`.
    pub(crate) fn exit_fee(
        &self,
        weights: &PoolWeights,
        role: TokenRole,
        net: Amount,
    ) -> crate::error::Result<Amount> {
        let zaz = single_sided_fee(weights.get(role), weights.total()?, self.swap_fee)?;
        let keep = WAD - zaz;
        if keep == U256::ZERO {
            return Ok(Amount::ZERO);
        }
        let fee = mul_div(wide(net.get()), zaz, keep)?;
        Ok(Amount::new(narrow(fee, "exit fee exceeds u128")?))
    }
}
