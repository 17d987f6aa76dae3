//! The side-staking liquidity controller.

use tracing::debug;

use super::VestingSchedule;
use crate::domain::{
    Address, Amount, BoundTokens, CounterAction, CounterKind, PoolShares, TokenAmounts, TokenRole,
};
use crate::error::AmmError;
use crate::math::fixed::{mul, wide};
use crate::math::CheckedArithmetic;
use crate::pool::{ChangeSet, LegPlanner};

/// Automated liquidity provider holding the datatoken reserve.
///
/// The controller owns pool shares like any other holder. After each user
/// join or exit it moves the other bound token so that
/// `balance_dt / weight_dt : balance_bt / weight_bt` returns to its value
/// before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideStakingController {
    address: Address,
    publisher: Address,
    reserve: TokenAmounts,
    vesting: VestingSchedule,
}

impl SideStakingController {
    /// Creates a controller with the given reserve and vesting lock.
    #[must_use]
    pub const fn new(
        address: Address,
        publisher: Address,
        reserve: TokenAmounts,
        vesting: VestingSchedule,
    ) -> Self {
        Self {
            address,
            publisher,
            reserve,
            vesting,
        }
    }

    /// Account holding the controller's pool shares.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Recipient of vested datatokens.
    #[must_use]
    pub const fn publisher(&self) -> Address {
        self.publisher
    }

    /// Tokens held outside the pool.
    #[must_use]
    pub const fn reserve(&self) -> TokenAmounts {
        self.reserve
    }

    /// Vesting state.
    #[must_use]
    pub const fn vesting(&self) -> &VestingSchedule {
        &self.vesting
    }

    /// Reserve available for counter-joins; excludes the unvested
    /// datatoken allotment.
    #[must_use]
    pub fn stakeable(&self, role: TokenRole) -> Amount {
        match role {
            TokenRole::Datatoken => self
                .reserve
                .datatoken
                .checked_sub(&self.vesting.remaining())
                .unwrap_or(Amount::ZERO),
            TokenRole::BaseToken => self.reserve.base_token,
        }
    }

    /// Plans the counter-action for a user leg that moved `moved`.
    ///
    /// `held` is the controller's current share balance. Returns `None`
    /// when the drift is within rounding tolerance.
    pub(crate) fn counter_act(
        &mut self,
        cs: &mut ChangeSet,
        planner: &LegPlanner,
        moved: TokenRole,
        tokens: &BoundTokens,
        held: PoolShares,
    ) -> crate::error::Result<Option<CounterAction>> {
        let other = moved.other();
        let before_ref = cs.before().balances.get(moved);
        let before_other = cs.before().balances.get(other);
        let after_ref = cs.after().balances.get(moved);
        let after_other = cs.after().balances.get(other);
        if before_ref.is_zero() {
            return Ok(None);
        }

        let target = before_other.safe_mul_div(after_ref.get(), before_ref.get())?;
        let drift = target.abs_diff(&after_other);
        // one unit of the reference token plus one of the adjusted token
        let weighted_drift = mul(wide(drift.get()), wide(before_ref.get()), "drift overflow")?;
        if weighted_drift <= wide(before_other.get()) + wide(before_ref.get()) {
            return Ok(None);
        }

        let action = if target > after_other {
            if drift > self.stakeable(other) {
                return Err(AmmError::InsufficientReserve(
                    "controller reserve too low to rebalance",
                ));
            }
            let shares = planner
                .join_exact_in(cs, other, drift, self.address)
                .map_err(|_| AmmError::InsufficientReserve("controller counter-join failed"))?;
            self.reserve.debit(other, drift)?;
            CounterAction {
                kind: CounterKind::Join,
                token: tokens.address(other),
                amount: drift,
                shares,
            }
        } else {
            let shares = planner
                .exit_exact_out(cs, other, drift, self.address, held)
                .map_err(|_| AmmError::InsufficientReserve("controller counter-exit failed"))?;
            self.reserve.credit(other, drift)?;
            CounterAction {
                kind: CounterKind::Exit,
                token: tokens.address(other),
                amount: drift,
                shares,
            }
        };
        debug!(
            kind = ?action.kind,
            token = %action.token,
            amount = %action.amount,
            shares = %action.shares,
            "planned controller counter-action"
        );
        Ok(Some(action))
    }

    /// Releases whatever is vested at `height` from the reserve.
    ///
    /// Returns the released amount, or `None` if nothing is claimable.
    pub(crate) fn claim_vesting(&mut self, height: u64) -> crate::error::Result<Option<Amount>> {
        let available = self.vesting.available_vested_amount(height)?;
        if available.is_zero() {
            return Ok(None);
        }
        self.reserve
            .debit(TokenRole::Datatoken, available)
            .map_err(|_| AmmError::InsufficientReserve("reserve below vested amount"))?;
        self.vesting.claim(available)?;
        Ok(Some(available))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{FeeRate, PoolWeights, Weight, ONE_TOKEN};
    use crate::fees::FeeBook;
    use crate::math::WeightedMath;
    use crate::pool::Snapshot;

    fn whole(n: u128) -> Amount {
        Amount::new(n * ONE_TOKEN)
    }

    fn tokens() -> BoundTokens {
        let Ok(t) = BoundTokens::new(Address::repeat_byte(0xd7), Address::repeat_byte(0xb7)) else {
            panic!("expected Ok");
        };
        t
    }

    fn controller(dt_reserve: u128, vesting: u128) -> SideStakingController {
        SideStakingController::new(
            Address::repeat_byte(0xcc),
            Address::repeat_byte(0xee),
            TokenAmounts::new(whole(dt_reserve), Amount::ZERO),
            VestingSchedule::new(whole(vesting), 0, 100),
        )
    }

    fn changeset() -> ChangeSet {
        ChangeSet::begin(
            Snapshot {
                balances: TokenAmounts::new(whole(900), whole(100)),
                weights: PoolWeights::new(Weight::from_whole(9), Weight::from_whole(1)),
                total_shares: PoolShares::new(100 * ONE_TOKEN),
            },
            FeeBook::new(),
            None,
        )
    }

    fn planner() -> LegPlanner {
        LegPlanner::new(WeightedMath::default(), FeeRate::from_bps(10))
    }

    // -- stakeable -----------------------------------------------------------

    #[test]
    fn stakeable_excludes_unvested() {
        let c = controller(500, 10);
        assert_eq!(c.stakeable(TokenRole::Datatoken), whole(490));
        assert!(c.stakeable(TokenRole::BaseToken).is_zero());
    }

    // -- counter_act ---------------------------------------------------------

    #[test]
    fn counter_join_restores_ratio() {
        let mut c = controller(500, 10);
        let mut cs = changeset();
        let Ok(()) = cs.credit(TokenRole::BaseToken, whole(50)) else {
            panic!("expected Ok");
        };
        let Ok(Some(action)) = c.counter_act(
            &mut cs,
            &planner(),
            TokenRole::BaseToken,
            &tokens(),
            PoolShares::new(90 * ONE_TOKEN),
        ) else {
            panic!("expected a counter-action");
        };
        assert_eq!(action.kind, CounterKind::Join);
        assert_eq!(action.amount, whole(450));
        assert_eq!(cs.after().balances.datatoken, whole(1_350));
        assert_eq!(c.reserve().datatoken, whole(50));
    }

    #[test]
    fn counter_join_beyond_stakeable_fails() {
        let mut c = controller(400, 10);
        let mut cs = changeset();
        let Ok(()) = cs.credit(TokenRole::BaseToken, whole(50)) else {
            panic!("expected Ok");
        };
        let result = c.counter_act(
            &mut cs,
            &planner(),
            TokenRole::BaseToken,
            &tokens(),
            PoolShares::ZERO,
        );
        assert!(matches!(result, Err(AmmError::InsufficientReserve(_))));
    }

    #[test]
    fn counter_exit_moves_tokens_to_reserve() {
        let mut c = controller(500, 10);
        let mut cs = changeset();
        let Ok(()) = cs.debit(TokenRole::BaseToken, whole(10)) else {
            panic!("expected Ok");
        };
        let Ok(Some(action)) = c.counter_act(
            &mut cs,
            &planner(),
            TokenRole::BaseToken,
            &tokens(),
            PoolShares::new(90 * ONE_TOKEN),
        ) else {
            panic!("expected a counter-action");
        };
        assert_eq!(action.kind, CounterKind::Exit);
        assert_eq!(action.amount, whole(90));
        assert_eq!(c.reserve().datatoken, whole(590));
    }

    #[test]
    fn counter_exit_without_shares_fails() {
        let mut c = controller(500, 10);
        let mut cs = changeset();
        let Ok(()) = cs.debit(TokenRole::BaseToken, whole(10)) else {
            panic!("expected Ok");
        };
        let result = c.counter_act(
            &mut cs,
            &planner(),
            TokenRole::BaseToken,
            &tokens(),
            PoolShares::ZERO,
        );
        assert!(matches!(result, Err(AmmError::InsufficientReserve(_))));
    }

    #[test]
    fn rounding_drift_is_ignored() {
        let mut c = controller(500, 10);
        let mut cs = changeset();
        let Ok(()) = cs.credit(TokenRole::Datatoken, Amount::new(8)) else {
            panic!("expected Ok");
        };
        let result = c.counter_act(
            &mut cs,
            &planner(),
            TokenRole::BaseToken,
            &tokens(),
            PoolShares::ZERO,
        );
        assert_eq!(result, Ok(None));
    }

    // -- claim_vesting -------------------------------------------------------

    #[test]
    fn claim_debits_reserve() {
        let mut c = controller(500, 10);
        assert_eq!(c.claim_vesting(50), Ok(Some(whole(5))));
        assert_eq!(c.reserve().datatoken, whole(495));
        assert_eq!(c.claim_vesting(50), Ok(None));
        assert_eq!(c.stakeable(TokenRole::Datatoken), whole(490));
    }
}
