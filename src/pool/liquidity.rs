//! Joins and exits.
//!
//! Single-sided calls price against the weighted curve and charge the swap
//! fee on the implicitly traded share. Proportional calls move both tokens
//! at `floor(balance * shares / supply)` and leave the price unchanged. On
//! a side-staked pool the controller's counter-action is planned into the
//! same commit.

use tracing::debug;

use super::{ChangeSet, Pool};
use crate::domain::{
    Address, Amount, FeeBreakdown, FeeKind, Operation, PoolShares, Settlement, ShareDelta,
    SpotPrice, TokenAmounts, TokenRole,
};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;
use crate::traits::Ledger;

impl<L: Ledger> Pool<L> {
    // -- single-sided --------------------------------------------------------

    /// Deposits exactly `amount_in` of `token_in` and mints at least
    /// `min_pool_amount_out` shares to `caller`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotFinalized`] before finalization.
    /// - [`AmmError::InvalidToken`] if `token_in` is not bound.
    /// - [`AmmError::InvalidAmount`] if nothing would be deposited or minted.
    /// - [`AmmError::ExcessiveTradeSize`] beyond the in-ratio limit.
    /// - [`AmmError::SlippageExceeded`] if fewer shares would be minted.
    /// - [`AmmError::InsufficientReserve`] if the controller cannot match
    ///   the deposit.
    pub fn join_swap_extern_amount_in(
        &mut self,
        caller: &Address,
        token_in: &Address,
        amount_in: Amount,
        min_pool_amount_out: PoolShares,
    ) -> crate::error::Result<Settlement> {
        self.require_finalized()?;
        let role = self.tokens.role_of(token_in)?;
        if amount_in.is_zero() {
            return Err(AmmError::InvalidAmount("deposit must be non-zero"));
        }

        let mut cs = self.begin();
        let shares = self
            .planner()
            .join_exact_in(&mut cs, role, amount_in, *caller)?;
        if shares.is_zero() {
            return Err(AmmError::InvalidAmount("deposit too small to mint shares"));
        }
        if shares < min_pool_amount_out {
            return Err(AmmError::SlippageExceeded("pool amount out below minimum"));
        }
        let fees = self.join_fees(&mut cs, role, amount_in)?;

        self.complete(
            cs,
            role,
            single(
                Operation::JoinSingle,
                TokenAmounts::only(role, amount_in),
                TokenAmounts::ZERO,
                fees,
                ShareDelta::Minted(shares),
            ),
        )
    }

    /// Mints exactly `pool_amount_out` shares to `caller`, paying at most
    /// `max_amount_in` of `token_in`.
    ///
    /// # Errors
    ///
    /// As [`Pool::join_swap_extern_amount_in`], with
    /// [`AmmError::SlippageExceeded`] if the deposit would exceed
    /// `max_amount_in`.
    pub fn join_swap_pool_amount_out(
        &mut self,
        caller: &Address,
        token_in: &Address,
        pool_amount_out: PoolShares,
        max_amount_in: Amount,
    ) -> crate::error::Result<Settlement> {
        self.require_finalized()?;
        let role = self.tokens.role_of(token_in)?;
        if pool_amount_out.is_zero() {
            return Err(AmmError::InvalidAmount("pool amount out must be non-zero"));
        }

        let mut cs = self.begin();
        let amount_in = self
            .planner()
            .join_exact_shares(&mut cs, role, pool_amount_out, *caller)?;
        if amount_in.is_zero() {
            return Err(AmmError::InvalidAmount("deposit rounds to zero"));
        }
        if amount_in > max_amount_in {
            return Err(AmmError::SlippageExceeded("amount in above maximum"));
        }
        let fees = self.join_fees(&mut cs, role, amount_in)?;

        self.complete(
            cs,
            role,
            single(
                Operation::JoinSingle,
                TokenAmounts::only(role, amount_in),
                TokenAmounts::ZERO,
                fees,
                ShareDelta::Minted(pool_amount_out),
            ),
        )
    }

    /// Burns exactly `pool_amount_in` of `caller`'s shares for at least
    /// `min_amount_out` of `token_out`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotFinalized`] before finalization.
    /// - [`AmmError::InvalidToken`] if `token_out` is not bound.
    /// - [`AmmError::InvalidAmount`] if nothing would be burned or paid.
    /// - [`AmmError::InsufficientReserve`] if `caller` holds fewer shares,
    ///   or the controller cannot match the withdrawal.
    /// - [`AmmError::ExcessiveTradeSize`] beyond the out-ratio limit.
    /// - [`AmmError::SlippageExceeded`] if less would be paid out.
    pub fn exit_swap_pool_amount_in(
        &mut self,
        caller: &Address,
        token_out: &Address,
        pool_amount_in: PoolShares,
        min_amount_out: Amount,
    ) -> crate::error::Result<Settlement> {
        self.require_finalized()?;
        let role = self.tokens.role_of(token_out)?;
        if pool_amount_in.is_zero() {
            return Err(AmmError::InvalidAmount("pool amount in must be non-zero"));
        }

        let held = self.ledger.shares_of(caller);
        let mut cs = self.begin();
        let amount_out =
            self.planner()
                .exit_exact_shares(&mut cs, role, pool_amount_in, *caller, held)?;
        if amount_out.is_zero() {
            return Err(AmmError::InvalidAmount("withdrawal rounds to zero"));
        }
        if amount_out < min_amount_out {
            return Err(AmmError::SlippageExceeded("amount out below minimum"));
        }
        let fees = self.exit_fees(&mut cs, role, amount_out)?;

        self.complete(
            cs,
            role,
            single(
                Operation::ExitSingle,
                TokenAmounts::ZERO,
                TokenAmounts::only(role, amount_out),
                fees,
                ShareDelta::Burned(pool_amount_in),
            ),
        )
    }

    /// Withdraws exactly `amount_out` of `token_out`, burning at most
    /// `max_pool_amount_in` of `caller`'s shares.
    ///
    /// # Errors
    ///
    /// As [`Pool::exit_swap_pool_amount_in`], with
    /// [`AmmError::SlippageExceeded`] if more than `max_pool_amount_in`
    /// shares would be burned.
    pub fn exit_swap_extern_amount_out(
        &mut self,
        caller: &Address,
        token_out: &Address,
        amount_out: Amount,
        max_pool_amount_in: PoolShares,
    ) -> crate::error::Result<Settlement> {
        self.require_finalized()?;
        let role = self.tokens.role_of(token_out)?;
        if amount_out.is_zero() {
            return Err(AmmError::InvalidAmount("withdrawal must be non-zero"));
        }

        let held = self.ledger.shares_of(caller);
        let mut cs = self.begin();
        let pool_amount_in =
            self.planner()
                .exit_exact_out(&mut cs, role, amount_out, *caller, held)?;
        if pool_amount_in.is_zero() {
            return Err(AmmError::InvalidAmount("withdrawal too small to burn shares"));
        }
        if pool_amount_in > max_pool_amount_in {
            return Err(AmmError::SlippageExceeded("pool amount in above maximum"));
        }
        let fees = self.exit_fees(&mut cs, role, amount_out)?;

        self.complete(
            cs,
            role,
            single(
                Operation::ExitSingle,
                TokenAmounts::ZERO,
                TokenAmounts::only(role, amount_out),
                fees,
                ShareDelta::Burned(pool_amount_in),
            ),
        )
    }

    // -- proportional --------------------------------------------------------

    /// Mints exactly `pool_amount_out` shares to `caller` for a proportional
    /// deposit of both tokens, each at most `max_amounts_in`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotFinalized`] before finalization.
    /// - [`AmmError::InvalidAmount`] if either deposit rounds to zero.
    /// - [`AmmError::SlippageExceeded`] if a deposit exceeds its bound.
    pub fn join_pool(
        &mut self,
        caller: &Address,
        pool_amount_out: PoolShares,
        max_amounts_in: TokenAmounts,
    ) -> crate::error::Result<Settlement> {
        self.require_finalized()?;
        if pool_amount_out.is_zero() {
            return Err(AmmError::InvalidAmount("pool amount out must be non-zero"));
        }

        let mut cs = self.begin();
        let amounts = proportional(&cs, pool_amount_out)?;
        for role in TokenRole::ALL {
            let amount = amounts.get(role);
            if amount.is_zero() {
                return Err(AmmError::InvalidAmount("join amount rounds to zero"));
            }
            if amount > max_amounts_in.get(role) {
                return Err(AmmError::SlippageExceeded("amount in above maximum"));
            }
            cs.credit(role, amount)?;
        }
        cs.mint(*caller, pool_amount_out)?;

        self.complete(
            cs,
            TokenRole::BaseToken,
            single(
                Operation::JoinPool,
                amounts,
                TokenAmounts::ZERO,
                FeeBreakdown::none(amounts.base_token),
                ShareDelta::Minted(pool_amount_out),
            ),
        )
    }

    /// Burns exactly `pool_amount_in` of `caller`'s shares for a
    /// proportional withdrawal of both tokens, each at least
    /// `min_amounts_out`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotFinalized`] before finalization.
    /// - [`AmmError::InvalidAmount`] if `pool_amount_in` is zero.
    /// - [`AmmError::InsufficientReserve`] if `caller` holds fewer shares or
    ///   the burn would empty the pool.
    /// - [`AmmError::SlippageExceeded`] if a payout falls below its bound.
    pub fn exit_pool(
        &mut self,
        caller: &Address,
        pool_amount_in: PoolShares,
        min_amounts_out: TokenAmounts,
    ) -> crate::error::Result<Settlement> {
        self.require_finalized()?;
        if pool_amount_in.is_zero() {
            return Err(AmmError::InvalidAmount("pool amount in must be non-zero"));
        }

        let held = self.ledger.shares_of(caller);
        let mut cs = self.begin();
        if pool_amount_in >= cs.before().total_shares {
            return Err(AmmError::InsufficientReserve(
                "cannot burn the entire pool supply",
            ));
        }
        let amounts = proportional(&cs, pool_amount_in)?;
        cs.burn(*caller, pool_amount_in, held)?;
        for role in TokenRole::ALL {
            let amount = amounts.get(role);
            if amount < min_amounts_out.get(role) {
                return Err(AmmError::SlippageExceeded("amount out below minimum"));
            }
            cs.debit(role, amount)?;
        }

        self.complete(
            cs,
            TokenRole::BaseToken,
            single(
                Operation::ExitPool,
                TokenAmounts::ZERO,
                amounts,
                FeeBreakdown::none(Amount::ZERO),
                ShareDelta::Burned(pool_amount_in),
            ),
        )
    }

    // -- quotes --------------------------------------------------------------

    /// Shares minted for depositing `amount_in` of `token_in`.
    ///
    /// # Errors
    ///
    /// Pricing errors of [`Pool::join_swap_extern_amount_in`].
    pub fn quote_join_swap_extern_amount_in(
        &self,
        token_in: &Address,
        amount_in: Amount,
    ) -> crate::error::Result<PoolShares> {
        let role = self.tokens.role_of(token_in)?;
        let mut cs = self.dry_run();
        self.planner()
            .join_exact_in(&mut cs, role, amount_in, Address::ZERO)
    }

    /// Deposit of `token_in` required to mint `pool_amount_out` shares.
    ///
    /// # Errors
    ///
    /// Pricing errors of [`Pool::join_swap_pool_amount_out`].
    pub fn quote_join_swap_pool_amount_out(
        &self,
        token_in: &Address,
        pool_amount_out: PoolShares,
    ) -> crate::error::Result<Amount> {
        let role = self.tokens.role_of(token_in)?;
        let mut cs = self.dry_run();
        self.planner()
            .join_exact_shares(&mut cs, role, pool_amount_out, Address::ZERO)
    }

    /// Payout in `token_out` for burning `pool_amount_in` shares.
    ///
    /// # Errors
    ///
    /// Pricing errors of [`Pool::exit_swap_pool_amount_in`].
    pub fn quote_exit_swap_pool_amount_in(
        &self,
        token_out: &Address,
        pool_amount_in: PoolShares,
    ) -> crate::error::Result<Amount> {
        let role = self.tokens.role_of(token_out)?;
        let mut cs = self.dry_run();
        let supply = cs.before().total_shares;
        self.planner()
            .exit_exact_shares(&mut cs, role, pool_amount_in, Address::ZERO, supply)
    }

    /// Shares burned to withdraw `amount_out` of `token_out`.
    ///
    /// # Errors
    ///
    /// Pricing errors of [`Pool::exit_swap_extern_amount_out`].
    pub fn quote_exit_swap_extern_amount_out(
        &self,
        token_out: &Address,
        amount_out: Amount,
    ) -> crate::error::Result<PoolShares> {
        let role = self.tokens.role_of(token_out)?;
        let mut cs = self.dry_run();
        let supply = cs.before().total_shares;
        self.planner()
            .exit_exact_out(&mut cs, role, amount_out, Address::ZERO, supply)
    }

    /// Token amounts a proportional join or exit of `shares` moves.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if no shares exist.
    pub fn quote_proportional(&self, shares: PoolShares) -> crate::error::Result<TokenAmounts> {
        proportional(&self.dry_run(), shares)
    }

    // -- internals -----------------------------------------------------------

    fn dry_run(&self) -> ChangeSet {
        ChangeSet::begin(self.snapshot(), self.fee_book, None)
    }

    fn join_fees(
        &self,
        cs: &mut ChangeSet,
        role: TokenRole,
        amount_in: Amount,
    ) -> crate::error::Result<FeeBreakdown> {
        let lp = self
            .planner()
            .join_fee(&cs.before().weights, role, amount_in)?;
        cs.charge_fee(FeeKind::Lp, role, lp)?;
        Ok(FeeBreakdown {
            lp,
            ..FeeBreakdown::none(amount_in)
        })
    }

    fn exit_fees(
        &self,
        cs: &mut ChangeSet,
        role: TokenRole,
        amount_out: Amount,
    ) -> crate::error::Result<FeeBreakdown> {
        let lp = self
            .planner()
            .exit_fee(&cs.before().weights, role, amount_out)?;
        cs.charge_fee(FeeKind::Lp, role, lp)?;
        Ok(FeeBreakdown {
            lp,
            ..FeeBreakdown::none(Amount::ZERO)
        })
    }

    /// Plans the counter-action, prices the result and commits.
    fn complete(
        &mut self,
        mut cs: ChangeSet,
        moved: TokenRole,
        mut settlement: Settlement,
    ) -> crate::error::Result<Settlement> {
        settlement.counter_action = self.rebalance(&mut cs, moved)?;
        settlement.spot_price_after = self.datatoken_price(cs.after())?;
        self.commit(cs);
        debug!(
            operation = %settlement.operation,
            shares = ?settlement.pool_shares_delta,
            counter_action = settlement.counter_action.is_some(),
            spot_price_after = %settlement.spot_price_after,
            "liquidity change committed"
        );
        Ok(settlement)
    }
}

fn proportional(cs: &ChangeSet, shares: PoolShares) -> crate::error::Result<TokenAmounts> {
    let state = cs.before();
    let supply = state.total_shares.get();
    Ok(TokenAmounts::new(
        state.balances.datatoken.safe_mul_div(shares.get(), supply)?,
        state.balances.base_token.safe_mul_div(shares.get(), supply)?,
    ))
}

const fn single(
    operation: Operation,
    amount_in: TokenAmounts,
    amount_out: TokenAmounts,
    fees: FeeBreakdown,
    pool_shares_delta: ShareDelta,
) -> Settlement {
    Settlement {
        operation,
        amount_in,
        amount_out,
        fees,
        spot_price_after: SpotPrice::ONE,
        pool_shares_delta,
        counter_action: None,
        consume_market_payout: None,
    }
}
