//! The side-staked datatoken pool.
//!
//! [`Pool`] owns a [`Ledger`] and drives every operation through the same
//! plan/commit cycle:
//!
//! 1. take a [`Snapshot`] and open a [`ChangeSet`](changeset) on it,
//! 2. plan the user's legs and the controller's counter-action,
//! 3. validate slippage bounds and price movement against the plan,
//! 4. commit with infallible ledger writes.
//!
//! | Module | Operations |
//! |--------|------------|
//! | `swap` | [`Pool::swap`], [`Pool::quote_swap`] |
//! | `liquidity` | single-sided and proportional joins and exits, plus quotes |
//! | `admin` | [`Pool::setup`], bind/rebind/unbind, [`Pool::set_swap_fee`], [`Pool::finalize`] |
//! | `collect` | [`Pool::collect_fees`], [`Pool::claim_vesting`] |

mod admin;
mod changeset;
mod collect;
mod legs;
mod liquidity;
mod snapshot;
mod swap;

#[cfg(test)]
mod proptest_properties;

pub(crate) use changeset::ChangeSet;
pub(crate) use legs::LegPlanner;
pub use snapshot::Snapshot;
pub use swap::{SwapQuote, SwapRequest};

use crate::config::{FeeSchedule, ProtocolLimits};
use crate::domain::{
    Address, Amount, BoundTokens, CounterAction, FeeRate, PoolShares, PoolWeights, Ratio,
    SpotPrice, TokenAmounts, TokenRole, Weight, WAD,
};
use crate::error::AmmError;
use crate::fees::FeeBook;
use crate::math::{CheckedArithmetic, WeightedMath};
use crate::side_staking::SideStakingController;
use crate::traits::Ledger;

/// A two-token weighted pool, optionally managed by a side-staking
/// controller.
#[derive(Debug, Clone)]
pub struct Pool<L: Ledger> {
    ledger: L,
    tokens: BoundTokens,
    fees: FeeSchedule,
    limits: ProtocolLimits,
    math: WeightedMath,
    finalized: bool,
    fee_book: FeeBook,
    controller: Option<SideStakingController>,
}

impl<L: Ledger> Pool<L> {
    pub(crate) fn assemble(
        ledger: L,
        tokens: BoundTokens,
        fees: FeeSchedule,
        limits: ProtocolLimits,
        controller: Option<SideStakingController>,
        finalized: bool,
    ) -> Self {
        Self {
            ledger,
            tokens,
            fees,
            math: limits.math(),
            limits,
            finalized,
            fee_book: FeeBook::new(),
            controller,
        }
    }

    // -- reads ---------------------------------------------------------------

    /// Returns `true` once trading is open.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The datatoken and base token of this pool.
    #[must_use]
    pub const fn tokens(&self) -> &BoundTokens {
        &self.tokens
    }

    /// Current fee schedule.
    #[must_use]
    pub const fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Protocol limits this pool enforces.
    #[must_use]
    pub const fn limits(&self) -> &ProtocolLimits {
        &self.limits
    }

    /// Accrued and lifetime fees per tier.
    #[must_use]
    pub const fn fee_book(&self) -> &FeeBook {
        &self.fee_book
    }

    /// The side-staking controller, if this pool has one.
    #[must_use]
    pub const fn controller(&self) -> Option<&SideStakingController> {
        self.controller.as_ref()
    }

    /// The backing ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the backing ledger, for advancing the host clock.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Balances, weights and share supply right now.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::read(&self.ledger, &self.tokens)
    }

    /// Pool balances of both tokens.
    #[must_use]
    pub fn balances(&self) -> TokenAmounts {
        self.snapshot().balances
    }

    /// Pool balance of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token` is not bound.
    pub fn balance(&self, token: &Address) -> crate::error::Result<Amount> {
        self.tokens.role_of(token)?;
        Ok(self.ledger.balance(token))
    }

    /// Denormalized weights of both tokens.
    #[must_use]
    pub fn weights(&self) -> PoolWeights {
        self.snapshot().weights
    }

    /// Sum of both denormalized weights.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the sum overflows.
    pub fn total_weight(&self) -> crate::error::Result<Weight> {
        self.weights().total()
    }

    /// `weight(token) / total_weight`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `token` is not bound.
    /// - [`AmmError::InvalidWeight`] if no weight is bound yet.
    pub fn normalized_weight(&self, token: &Address) -> crate::error::Result<Ratio> {
        let role = self.tokens.role_of(token)?;
        let weights = self.weights();
        let total = weights.total()?;
        if total.is_zero() {
            return Err(AmmError::InvalidWeight("no weight bound"));
        }
        let scaled = Amount::new(weights.get(role).get()).safe_mul_div(WAD, total.get())?;
        Ok(Ratio::from_wad(scaled.get()))
    }

    /// Outstanding pool-share supply.
    #[must_use]
    pub fn total_shares(&self) -> PoolShares {
        self.ledger.total_shares()
    }

    /// Pool shares held by `holder`.
    #[must_use]
    pub fn shares_of(&self, holder: &Address) -> PoolShares {
        self.ledger.shares_of(holder)
    }

    /// Combined swap, OPC and publish-market fee rate.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeRateOutOfRange`] if the sum reaches 100%.
    pub fn pool_fee_rate(&self) -> crate::error::Result<FeeRate> {
        self.fees.rates(FeeRate::ZERO).total()
    }

    /// Price of `token_out` in units of `token_in`, including the pool's
    /// fees (no consume-market fee).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if the tokens are not the two bound
    ///   tokens.
    /// - [`AmmError::InvalidWeight`] if a token has no weight yet.
    pub fn spot_price(
        &self,
        token_in: &Address,
        token_out: &Address,
    ) -> crate::error::Result<SpotPrice> {
        self.spot_price_with(token_in, token_out, self.pool_fee_rate()?)
    }

    /// Price of `token_out` in units of `token_in`, without fees.
    ///
    /// # Errors
    ///
    /// Same as [`Pool::spot_price`].
    pub fn spot_price_sans_fee(
        &self,
        token_in: &Address,
        token_out: &Address,
    ) -> crate::error::Result<SpotPrice> {
        self.spot_price_with(token_in, token_out, FeeRate::ZERO)
    }

    fn spot_price_with(
        &self,
        token_in: &Address,
        token_out: &Address,
        fee: FeeRate,
    ) -> crate::error::Result<SpotPrice> {
        let (role_in, role_out) = self.tokens.trade_roles(token_in, token_out)?;
        price_of(&self.math, &self.snapshot(), role_in, role_out, fee)
    }

    // -- plan / commit -------------------------------------------------------

    fn require_finalized(&self) -> crate::error::Result<()> {
        if self.finalized {
            Ok(())
        } else {
            Err(AmmError::NotFinalized)
        }
    }

    fn begin(&self) -> ChangeSet {
        ChangeSet::begin(self.snapshot(), self.fee_book, self.controller.clone())
    }

    const fn planner(&self) -> LegPlanner {
        LegPlanner::new(self.math, self.fees.swap_fee)
    }

    /// Plans the controller's response to a user leg that moved `moved`.
    fn rebalance(
        &self,
        cs: &mut ChangeSet,
        moved: TokenRole,
    ) -> crate::error::Result<Option<CounterAction>> {
        let Some(mut controller) = cs.controller.take() else {
            return Ok(None);
        };
        let held = self.ledger.shares_of(&controller.address());
        let action = controller.counter_act(cs, &self.planner(), moved, &self.tokens, held);
        cs.controller = Some(controller);
        action
    }

    /// Applies a fully validated change set.
    fn commit(&mut self, cs: ChangeSet) {
        let parts = cs.into_parts();
        for role in TokenRole::ALL {
            self.ledger
                .set_balance(&self.tokens.address(role), parts.after.balances.get(role));
        }
        for (holder, shares) in &parts.burns {
            self.ledger.burn_shares(*shares, holder);
        }
        for (holder, shares) in &parts.mints {
            self.ledger.mint_shares(*shares, holder);
        }
        self.fee_book = parts.fee_book;
        self.controller = parts.controller;
    }

    /// Base-token price of the datatoken in a planned state.
    fn datatoken_price(&self, state: &Snapshot) -> crate::error::Result<SpotPrice> {
        price_of(
            &self.math,
            state,
            TokenRole::BaseToken,
            TokenRole::Datatoken,
            self.fees.swap_fee,
        )
    }
}

fn price_of(
    math: &WeightedMath,
    state: &Snapshot,
    role_in: TokenRole,
    role_out: TokenRole,
    fee: FeeRate,
) -> crate::error::Result<SpotPrice> {
    math.spot_price(
        state.balances.get(role_in),
        state.weights.get(role_in),
        state.balances.get(role_out),
        state.weights.get(role_out),
        fee,
    )
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared pool builders for unit tests.

    use super::Pool;
    use crate::config::{FeeSchedule, PoolConfig, ProtocolLimits, SideStakingConfig};
    use crate::domain::{
        Address, Amount, BoundTokens, CallerContext, FeeRate, MarketFee, PermissionSet,
        PoolWeights, SpotPrice, Weight, ONE_TOKEN,
    };
    use crate::factory::PoolFactory;
    use crate::ledger::InMemoryLedger;

    pub(crate) const DT: Address = Address::repeat_byte(0xd7);
    pub(crate) const BT: Address = Address::repeat_byte(0xb7);
    pub(crate) const CONTROLLER: Address = Address::repeat_byte(0xcc);
    pub(crate) const PUBLISHER: Address = Address::repeat_byte(0xee);
    pub(crate) const OPC: Address = Address::repeat_byte(0x0c);
    pub(crate) const MARKET: Address = Address::repeat_byte(0x3a);
    pub(crate) const USER: Address = Address::repeat_byte(0x11);

    pub(crate) const fn whole(n: u128) -> Amount {
        Amount::new(n * ONE_TOKEN)
    }

    pub(crate) fn tokens() -> BoundTokens {
        match BoundTokens::new(DT, BT) {
            Ok(t) => t,
            Err(e) => unreachable!("{e}"),
        }
    }

    pub(crate) fn fees() -> FeeSchedule {
        FeeSchedule {
            swap_fee: FeeRate::from_bps(10),
            opc_fee: FeeRate::from_bps(10),
            opc_collector: OPC,
            publish_market_fee: MarketFee::new(MARKET, BT, FeeRate::from_bps(10)),
        }
    }

    pub(crate) fn limits() -> ProtocolLimits {
        ProtocolLimits {
            min_vesting_blocks: 100,
            ..ProtocolLimits::default()
        }
    }

    pub(crate) fn config(cap: u128) -> PoolConfig {
        let side_staking = SideStakingConfig {
            controller: CONTROLLER,
            publisher: PUBLISHER,
            datatoken_cap: whole(cap),
            rate: SpotPrice::ONE,
            base_token_amount: whole(100),
            vesting_amount: whole(10),
            vesting_blocks: 100,
        };
        match PoolConfig::with_limits(
            tokens(),
            PoolWeights::new(Weight::from_whole(9), Weight::from_whole(1)),
            fees(),
            side_staking,
            limits(),
        ) {
            Ok(c) => c,
            Err(e) => unreachable!("{e}"),
        }
    }

    pub(crate) fn deployer() -> CallerContext {
        CallerContext::new(PUBLISHER, PermissionSet::NONE.with(crate::domain::Role::DeployErc20))
    }

    /// 900 DT / 100 BT at weights 9:1, controller reserve `cap - 900`.
    pub(crate) fn side_staked(cap: u128) -> Pool<InMemoryLedger> {
        match PoolFactory::create(&config(cap), InMemoryLedger::at_block(1_000), &deployer()) {
            Ok(p) => p,
            Err(e) => unreachable!("{e}"),
        }
    }

    /// A finalized pool with no controller, built through the setup path.
    pub(crate) fn manual() -> Pool<InMemoryLedger> {
        let manager = CallerContext::new(USER, PermissionSet::ALL);
        let build = || -> crate::error::Result<Pool<InMemoryLedger>> {
            let mut pool = Pool::setup(InMemoryLedger::new(), tokens(), fees(), limits())?;
            pool.bind(&manager, DT, whole(900), Weight::from_whole(9))?;
            pool.bind(&manager, BT, whole(100), Weight::from_whole(1))?;
            pool.finalize(&manager)?;
            Ok(pool)
        };
        match build() {
            Ok(p) => p,
            Err(e) => unreachable!("{e}"),
        }
    }
}
