//! Manager-only setup of an unfinalized pool.
//!
//! A pool built through [`Pool::setup`] starts with no tokens bound. The
//! manager binds both tokens with their initial balances and weights, may
//! adjust them and the swap fee, and finally calls [`Pool::finalize`],
//! which mints the initial share supply and opens trading. Every call
//! here fails with [`AmmError::Finalized`] afterwards.

use tracing::{debug, info, warn};

use super::Pool;
use crate::config::{FeeSchedule, ProtocolLimits};
use crate::domain::{Address, Amount, BoundTokens, CallerContext, FeeRate, Payout, Role, Weight};
use crate::error::AmmError;
use crate::traits::Ledger;

impl<L: Ledger> Pool<L> {
    /// Creates an unfinalized pool over an empty ledger.
    ///
    /// # Errors
    ///
    /// - Any [`ProtocolLimits::validate`] or [`FeeSchedule::validate`]
    ///   failure.
    /// - [`AmmError::InvalidToken`] if the publish-market fee names a
    ///   token outside `tokens`.
    /// - [`AmmError::InvalidConfiguration`] if the ledger already holds
    ///   balances, weights or shares for these tokens.
    pub fn setup(
        ledger: L,
        tokens: BoundTokens,
        fees: FeeSchedule,
        limits: ProtocolLimits,
    ) -> crate::error::Result<Self> {
        limits.validate()?;
        fees.validate(&limits)?;
        fees.publish_market_fee.check_token(&tokens)?;
        let pool = Self::assemble(ledger, tokens, fees, limits, None, false);
        let state = pool.snapshot();
        if !state.balances.is_zero()
            || !state.weights.total()?.is_zero()
            || !state.total_shares.is_zero()
        {
            return Err(AmmError::InvalidConfiguration(
                "ledger already holds pool state",
            ));
        }
        Ok(pool)
    }

    /// Binds `token` with an initial `balance` and `weight`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Finalized`] once finalized.
    /// - [`AmmError::Unauthorized`] without the manager role.
    /// - [`AmmError::InvalidToken`] if `token` is foreign or already bound.
    /// - [`AmmError::InvalidWeight`] / [`AmmError::InvalidAmount`] outside
    ///   the protocol limits.
    pub fn bind(
        &mut self,
        caller: &CallerContext,
        token: Address,
        balance: Amount,
        weight: Weight,
    ) -> crate::error::Result<()> {
        self.authorize(caller, "bind")?;
        self.tokens.role_of(&token)?;
        if !self.ledger.weight(&token).is_zero() {
            return Err(AmmError::InvalidToken("token already bound"));
        }
        self.check_binding(&token, balance, weight)?;
        self.ledger.set_weight(&token, weight);
        self.ledger.set_balance(&token, balance);
        debug!(%token, %balance, %weight, "token bound");
        Ok(())
    }

    /// Changes the balance and weight of a bound token.
    ///
    /// Returns the payout to the manager when the balance shrinks.
    ///
    /// # Errors
    ///
    /// As [`Pool::bind`], with [`AmmError::InvalidToken`] if `token` is not
    /// bound yet.
    pub fn rebind(
        &mut self,
        caller: &CallerContext,
        token: Address,
        balance: Amount,
        weight: Weight,
    ) -> crate::error::Result<Option<Payout>> {
        self.authorize(caller, "rebind")?;
        self.require_bound(&token)?;
        self.check_binding(&token, balance, weight)?;

        let old = self.ledger.balance(&token);
        let payout = old.checked_sub(&balance).filter(|a| !a.is_zero()).map(|amount| Payout {
            token,
            recipient: caller.address,
            amount,
        });
        self.ledger.set_weight(&token, weight);
        self.ledger.set_balance(&token, balance);
        debug!(%token, %balance, %weight, "token rebound");
        Ok(payout)
    }

    /// Unbinds `token`, returning its whole balance to the manager.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Finalized`] once finalized.
    /// - [`AmmError::Unauthorized`] without the manager role.
    /// - [`AmmError::InvalidToken`] if `token` is not bound.
    pub fn unbind(&mut self, caller: &CallerContext, token: Address) -> crate::error::Result<Payout> {
        self.authorize(caller, "unbind")?;
        self.require_bound(&token)?;
        let amount = self.ledger.balance(&token);
        self.ledger.set_weight(&token, Weight::ZERO);
        self.ledger.set_balance(&token, Amount::ZERO);
        debug!(%token, %amount, "token unbound");
        Ok(Payout {
            token,
            recipient: caller.address,
            amount,
        })
    }

    /// Replaces the swap (LP) fee rate.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Finalized`] once finalized.
    /// - [`AmmError::Unauthorized`] without the manager role.
    /// - [`AmmError::FeeRateOutOfRange`] outside the swap fee bounds.
    pub fn set_swap_fee(&mut self, caller: &CallerContext, fee: FeeRate) -> crate::error::Result<()> {
        self.authorize(caller, "set_swap_fee")?;
        let fees = FeeSchedule {
            swap_fee: fee,
            ..self.fees
        };
        fees.validate(&self.limits)?;
        fees.rates(FeeRate::ZERO).total()?;
        self.fees = fees;
        debug!(swap_fee = %fee, "swap fee updated");
        Ok(())
    }

    /// Opens trading and mints the initial share supply to the manager.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Finalized`] if already finalized.
    /// - [`AmmError::Unauthorized`] without the manager role.
    /// - [`AmmError::InvalidToken`] unless both tokens are bound.
    pub fn finalize(&mut self, caller: &CallerContext) -> crate::error::Result<()> {
        self.authorize(caller, "finalize")?;
        let weights = self.weights();
        if weights.datatoken.is_zero() || weights.base_token.is_zero() {
            return Err(AmmError::InvalidToken("both tokens must be bound"));
        }
        let supply = self.limits.init_pool_supply;
        self.ledger.mint_shares(supply, &caller.address);
        self.finalized = true;
        info!(manager = %caller.address, %supply, "pool finalized");
        Ok(())
    }

    fn authorize(&self, caller: &CallerContext, call: &'static str) -> crate::error::Result<()> {
        if self.finalized {
            return Err(AmmError::Finalized);
        }
        caller.permissions.require(Role::Manager).map_err(|e| {
            warn!(caller = %caller.address, call, "rejected privileged call");
            e
        })
    }

    fn require_bound(&self, token: &Address) -> crate::error::Result<()> {
        self.tokens.role_of(token)?;
        if self.ledger.weight(token).is_zero() {
            return Err(AmmError::InvalidToken("token is not bound"));
        }
        Ok(())
    }

    fn check_binding(
        &self,
        token: &Address,
        balance: Amount,
        weight: Weight,
    ) -> crate::error::Result<()> {
        self.limits.check_weight(weight)?;
        let role = self.tokens.role_of(token)?;
        let other = self.ledger.weight(&self.tokens.address(role.other()));
        let total = weight
            .checked_add(&other)
            .ok_or(AmmError::Overflow("total weight overflow"))?;
        self.limits.check_total_weight(total)?;
        self.limits.check_balance(balance)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::domain::{PermissionSet, PoolShares, ONE_TOKEN};
    use crate::ledger::InMemoryLedger;

    fn manager() -> CallerContext {
        CallerContext::new(USER, PermissionSet::NONE.with(Role::Manager))
    }

    fn fresh() -> Pool<InMemoryLedger> {
        let Ok(pool) = Pool::setup(InMemoryLedger::new(), tokens(), fees(), limits()) else {
            panic!("expected Ok");
        };
        pool
    }

    // -- setup ---------------------------------------------------------------

    #[test]
    fn setup_requires_empty_ledger() {
        let mut ledger = InMemoryLedger::new();
        ledger.set_balance(&DT, whole(1));
        assert!(matches!(
            Pool::setup(ledger, tokens(), fees(), limits()),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn setup_validates_fees() {
        let bad = FeeSchedule {
            swap_fee: FeeRate::from_bps(2_000),
            ..fees()
        };
        assert!(matches!(
            Pool::setup(InMemoryLedger::new(), tokens(), bad, limits()),
            Err(AmmError::FeeRateOutOfRange(_))
        ));
    }

    // -- bind / rebind / unbind ----------------------------------------------

    #[test]
    fn bind_records_balance_and_weight() {
        let mut pool = fresh();
        let Ok(()) = pool.bind(&manager(), DT, whole(900), Weight::from_whole(9)) else {
            panic!("expected Ok");
        };
        assert_eq!(pool.balance(&DT), Ok(whole(900)));
        assert_eq!(pool.weights().datatoken, Weight::from_whole(9));
        assert!(matches!(
            pool.bind(&manager(), DT, whole(900), Weight::from_whole(9)),
            Err(AmmError::InvalidToken(_))
        ));
    }

    #[test]
    fn bind_checks_limits() {
        let mut pool = fresh();
        assert!(matches!(
            pool.bind(&manager(), DT, whole(1), Weight::from_whole(51)),
            Err(AmmError::InvalidWeight(_))
        ));
        assert!(matches!(
            pool.bind(&manager(), DT, Amount::new(10), Weight::from_whole(1)),
            Err(AmmError::InvalidAmount(_))
        ));
        let Ok(()) = pool.bind(&manager(), DT, whole(1), Weight::from_whole(30)) else {
            panic!("expected Ok");
        };
        assert!(matches!(
            pool.bind(&manager(), BT, whole(1), Weight::from_whole(30)),
            Err(AmmError::InvalidWeight(_))
        ));
    }

    #[test]
    fn bind_rejects_foreign_token() {
        let mut pool = fresh();
        assert!(matches!(
            pool.bind(&manager(), Address::repeat_byte(1), whole(1), Weight::from_whole(1)),
            Err(AmmError::InvalidToken(_))
        ));
    }

    #[test]
    fn bind_requires_manager() {
        let mut pool = fresh();
        let outsider = CallerContext::anonymous(USER);
        assert_eq!(
            pool.bind(&outsider, DT, whole(1), Weight::from_whole(1)),
            Err(AmmError::Unauthorized("manager role required"))
        );
        assert!(pool.balances().is_zero());
    }

    #[test]
    fn rebind_pays_out_reduction() {
        let mut pool = fresh();
        let Ok(()) = pool.bind(&manager(), DT, whole(900), Weight::from_whole(9)) else {
            panic!("expected Ok");
        };
        let Ok(payout) = pool.rebind(&manager(), DT, whole(800), Weight::from_whole(8)) else {
            panic!("expected Ok");
        };
        assert_eq!(
            payout,
            Some(Payout {
                token: DT,
                recipient: USER,
                amount: whole(100)
            })
        );
        assert_eq!(pool.rebind(&manager(), DT, whole(850), Weight::from_whole(8)), Ok(None));
        assert!(matches!(
            pool.rebind(&manager(), BT, whole(1), Weight::from_whole(1)),
            Err(AmmError::InvalidToken(_))
        ));
    }

    #[test]
    fn unbind_returns_everything() {
        let mut pool = fresh();
        let Ok(()) = pool.bind(&manager(), BT, whole(100), Weight::from_whole(1)) else {
            panic!("expected Ok");
        };
        let Ok(payout) = pool.unbind(&manager(), BT) else {
            panic!("expected Ok");
        };
        assert_eq!(payout.amount, whole(100));
        assert!(pool.weights().base_token.is_zero());
        assert!(pool.unbind(&manager(), BT).is_err());
    }

    // -- swap fee ------------------------------------------------------------

    #[test]
    fn set_swap_fee_within_bounds() {
        let mut pool = fresh();
        let Ok(()) = pool.set_swap_fee(&manager(), FeeRate::from_bps(30)) else {
            panic!("expected Ok");
        };
        assert_eq!(pool.fees().swap_fee, FeeRate::from_bps(30));
        assert!(matches!(
            pool.set_swap_fee(&manager(), FeeRate::from_bps(1_001)),
            Err(AmmError::FeeRateOutOfRange(_))
        ));
    }

    // -- finalize ------------------------------------------------------------

    #[test]
    fn finalize_needs_both_tokens() {
        let mut pool = fresh();
        let Ok(()) = pool.bind(&manager(), DT, whole(900), Weight::from_whole(9)) else {
            panic!("expected Ok");
        };
        assert!(matches!(
            pool.finalize(&manager()),
            Err(AmmError::InvalidToken(_))
        ));
        assert!(!pool.is_finalized());
    }

    #[test]
    fn finalize_mints_initial_supply() {
        let pool = manual();
        assert!(pool.is_finalized());
        assert_eq!(pool.shares_of(&USER), PoolShares::new(100 * ONE_TOKEN));
    }

    #[test]
    fn finalized_pool_rejects_setup_calls() {
        let mut pool = manual();
        let before = pool.snapshot();
        let fee = pool.fees().swap_fee;
        let admin = CallerContext::new(USER, PermissionSet::ALL);
        assert_eq!(
            pool.bind(&admin, DT, whole(1), Weight::from_whole(1)),
            Err(AmmError::Finalized)
        );
        assert_eq!(
            pool.rebind(&admin, DT, whole(1), Weight::from_whole(1)),
            Err(AmmError::Finalized)
        );
        assert_eq!(pool.unbind(&admin, DT), Err(AmmError::Finalized));
        assert_eq!(
            pool.set_swap_fee(&admin, FeeRate::from_bps(20)),
            Err(AmmError::Finalized)
        );
        assert_eq!(pool.finalize(&admin), Err(AmmError::Finalized));
        assert_eq!(pool.snapshot(), before);
        assert_eq!(pool.fees().swap_fee, fee);
    }

    #[test]
    fn finalized_check_precedes_permissions() {
        let mut pool = side_staked(1_400);
        assert_eq!(
            pool.set_swap_fee(&CallerContext::anonymous(USER), FeeRate::ZERO),
            Err(AmmError::Finalized)
        );
    }
}
