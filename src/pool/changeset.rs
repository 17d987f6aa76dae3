//! Planned pool mutations.
//!
//! Every public operation builds a [`ChangeSet`] from a [`Snapshot`],
//! applies its intents to the planned copy (including the controller's
//! counter-action), and only then commits. All fallible arithmetic
//! happens while planning; committing is a sequence of infallible ledger
//! writes, so an `Err` from any step leaves the pool untouched.

use super::Snapshot;
use crate::domain::{Address, Amount, FeeKind, PoolShares, TokenRole};
use crate::error::AmmError;
use crate::fees::FeeBook;
use crate::math::CheckedArithmetic;
use crate::side_staking::SideStakingController;

/// A validated but not yet applied set of state changes.
#[derive(Debug, Clone)]
pub(crate) struct ChangeSet {
    before: Snapshot,
    after: Snapshot,
    mints: Vec<(Address, PoolShares)>,
    burns: Vec<(Address, PoolShares)>,
    pub(crate) fee_book: FeeBook,
    pub(crate) controller: Option<SideStakingController>,
}

impl ChangeSet {
    /// Starts planning from `before`, with copies of the fee book and
    /// controller to mutate.
    pub(crate) fn begin(
        before: Snapshot,
        fee_book: FeeBook,
        controller: Option<SideStakingController>,
    ) -> Self {
        Self {
            before,
            after: before,
            mints: Vec::new(),
            burns: Vec::new(),
            fee_book,
            controller,
        }
    }

    /// State before the operation.
    pub(crate) const fn before(&self) -> &Snapshot {
        &self.before
    }

    /// Planned state after the intents recorded so far.
    pub(crate) const fn after(&self) -> &Snapshot {
        &self.after
    }

    /// Adds `amount` to the planned balance of `role`.
    pub(crate) fn credit(&mut self, role: TokenRole, amount: Amount) -> crate::error::Result<()> {
        self.after.balances.credit(role, amount)
    }

    /// Removes `amount` from the planned balance of `role`.
    pub(crate) fn debit(&mut self, role: TokenRole, amount: Amount) -> crate::error::Result<()> {
        self.after
            .balances
            .debit(role, amount)
            .map_err(|_| AmmError::InsufficientReserve("pool balance too low"))
    }

    /// Plans minting `shares` to `to`.
    pub(crate) fn mint(&mut self, to: Address, shares: PoolShares) -> crate::error::Result<()> {
        self.after.total_shares = self.after.total_shares.safe_add(&shares)?;
        self.mints.push((to, shares));
        Ok(())
    }

    /// Plans burning `shares` from `from`, who currently holds `held`.
    pub(crate) fn burn(
        &mut self,
        from: Address,
        shares: PoolShares,
        held: PoolShares,
    ) -> crate::error::Result<()> {
        let pending = self
            .burns
            .iter()
            .filter(|(holder, _)| *holder == from)
            .try_fold(PoolShares::ZERO, |acc, (_, s)| acc.safe_add(s))?;
        let available = held
            .checked_sub(&pending)
            .ok_or(AmmError::InsufficientReserve("share balance too low"))?;
        if shares > available {
            return Err(AmmError::InsufficientReserve("share balance too low"));
        }
        self.after.total_shares = self
            .after
            .total_shares
            .checked_sub(&shares)
            .ok_or(AmmError::InsufficientReserve("burn exceeds share supply"))?;
        self.burns.push((from, shares));
        Ok(())
    }

    /// Plans recording a fee; consume-market fees are paid out in the same
    /// commit.
    pub(crate) fn charge_fee(
        &mut self,
        kind: FeeKind,
        role: TokenRole,
        amount: Amount,
    ) -> crate::error::Result<()> {
        self.fee_book.accrue(kind, role, amount)?;
        if kind == FeeKind::ConsumeMarket {
            self.fee_book.withdraw(kind, role, amount)?;
        }
        Ok(())
    }

    /// Consumes the change set into its parts for committing.
    pub(crate) fn into_parts(self) -> CommitParts {
        CommitParts {
            after: self.after,
            mints: self.mints,
            burns: self.burns,
            fee_book: self.fee_book,
            controller: self.controller,
        }
    }
}

/// The pieces of a [`ChangeSet`] the pool writes on commit.
pub(crate) struct CommitParts {
    pub(crate) after: Snapshot,
    pub(crate) mints: Vec<(Address, PoolShares)>,
    pub(crate) burns: Vec<(Address, PoolShares)>,
    pub(crate) fee_book: FeeBook,
    pub(crate) controller: Option<SideStakingController>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{PoolWeights, TokenAmounts};

    fn snapshot() -> Snapshot {
        Snapshot {
            balances: TokenAmounts::new(Amount::new(900), Amount::new(100)),
            weights: PoolWeights::default(),
            total_shares: PoolShares::new(100),
        }
    }

    fn holder() -> Address {
        Address::repeat_byte(7)
    }

    #[test]
    fn credit_and_debit_touch_only_after() {
        let mut cs = ChangeSet::begin(snapshot(), FeeBook::new(), None);
        let Ok(()) = cs.credit(TokenRole::BaseToken, Amount::new(10)) else {
            panic!("expected Ok");
        };
        let Ok(()) = cs.debit(TokenRole::Datatoken, Amount::new(5)) else {
            panic!("expected Ok");
        };
        assert_eq!(cs.after().balances, TokenAmounts::new(Amount::new(895), Amount::new(110)));
        assert_eq!(cs.before().balances, snapshot().balances);
    }

    #[test]
    fn debit_below_zero_is_insufficient_reserve() {
        let mut cs = ChangeSet::begin(snapshot(), FeeBook::new(), None);
        assert!(matches!(
            cs.debit(TokenRole::BaseToken, Amount::new(101)),
            Err(AmmError::InsufficientReserve(_))
        ));
    }

    #[test]
    fn burns_accumulate_against_holdings() {
        let mut cs = ChangeSet::begin(snapshot(), FeeBook::new(), None);
        let held = PoolShares::new(10);
        let Ok(()) = cs.burn(holder(), PoolShares::new(6), held) else {
            panic!("expected Ok");
        };
        assert!(matches!(
            cs.burn(holder(), PoolShares::new(5), held),
            Err(AmmError::InsufficientReserve(_))
        ));
        assert_eq!(cs.after().total_shares, PoolShares::new(94));
    }

    #[test]
    fn mint_grows_supply() {
        let mut cs = ChangeSet::begin(snapshot(), FeeBook::new(), None);
        let Ok(()) = cs.mint(holder(), PoolShares::new(3)) else {
            panic!("expected Ok");
        };
        let parts = cs.into_parts();
        assert_eq!(parts.after.total_shares, PoolShares::new(103));
        assert_eq!(parts.mints, vec![(holder(), PoolShares::new(3))]);
    }

    #[test]
    fn consume_fee_is_paid_in_same_commit() {
        let mut cs = ChangeSet::begin(snapshot(), FeeBook::new(), None);
        let Ok(()) = cs.charge_fee(FeeKind::ConsumeMarket, TokenRole::BaseToken, Amount::new(4))
        else {
            panic!("expected Ok");
        };
        let Ok(()) = cs.charge_fee(FeeKind::Opc, TokenRole::BaseToken, Amount::new(2)) else {
            panic!("expected Ok");
        };
        assert!(cs.fee_book.accrued(FeeKind::ConsumeMarket).is_zero());
        assert_eq!(
            cs.fee_book.lifetime(FeeKind::ConsumeMarket).base_token,
            Amount::new(4)
        );
        assert_eq!(cs.fee_book.accrued(FeeKind::Opc).base_token, Amount::new(2));
    }
}
