//! In-memory ledger.

use std::collections::HashMap;

use crate::domain::{Address, Amount, PoolShares, Weight};
use crate::traits::Ledger;

/// A [`Ledger`] backed by hash maps, with a manually driven block clock.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::{Address, Amount};
/// use datatoken_pool::ledger::InMemoryLedger;
/// use datatoken_pool::traits::Ledger;
///
/// let mut ledger = InMemoryLedger::at_block(100);
/// let token = Address::repeat_byte(1);
/// ledger.set_balance(&token, Amount::new(5));
/// ledger.advance_blocks(10);
/// assert_eq!(ledger.balance(&token), Amount::new(5));
/// assert_eq!(ledger.block_height(), 110);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: HashMap<Address, Amount>,
    weights: HashMap<Address, Weight>,
    shares: HashMap<Address, PoolShares>,
    total_shares: PoolShares,
    block_height: u64,
}

impl InMemoryLedger {
    /// An empty ledger at block zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty ledger at `height`.
    #[must_use]
    pub fn at_block(height: u64) -> Self {
        Self {
            block_height: height,
            ..Self::default()
        }
    }

    /// Moves the clock forward by `blocks`.
    pub fn advance_blocks(&mut self, blocks: u64) {
        self.block_height = self.block_height.saturating_add(blocks);
    }

    /// Sets the clock to `height`.
    pub fn set_block_height(&mut self, height: u64) {
        self.block_height = height;
    }

    /// Number of accounts holding a non-zero share balance.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.shares.values().filter(|s| !s.is_zero()).count()
    }
}

impl Ledger for InMemoryLedger {
    fn balance(&self, token: &Address) -> Amount {
        self.balances.get(token).copied().unwrap_or_default()
    }

    fn weight(&self, token: &Address) -> Weight {
        self.weights.get(token).copied().unwrap_or_default()
    }

    fn total_shares(&self) -> PoolShares {
        self.total_shares
    }

    fn shares_of(&self, holder: &Address) -> PoolShares {
        self.shares.get(holder).copied().unwrap_or_default()
    }

    fn block_height(&self) -> u64 {
        self.block_height
    }

    fn set_balance(&mut self, token: &Address, value: Amount) {
        self.balances.insert(*token, value);
    }

    fn set_weight(&mut self, token: &Address, weight: Weight) {
        if weight.is_zero() {
            self.weights.remove(token);
        } else {
            self.weights.insert(*token, weight);
        }
    }

    fn mint_shares(&mut self, amount: PoolShares, to: &Address) {
        let held = self.shares.entry(*to).or_default();
        *held = PoolShares::new(held.get().saturating_add(amount.get()));
        self.total_shares = PoolShares::new(self.total_shares.get().saturating_add(amount.get()));
    }

    fn burn_shares(&mut self, amount: PoolShares, from: &Address) {
        let held = self.shares.entry(*from).or_default();
        *held = PoolShares::new(held.get().saturating_sub(amount.get()));
        self.total_shares = PoolShares::new(self.total_shares.get().saturating_sub(amount.get()));
    }
}
