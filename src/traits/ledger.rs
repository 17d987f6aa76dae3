//! Host ledger abstraction.
//!
//! A [`Ledger`] owns the pool's persistent state: the two token balances,
//! their weights, the pool-share supply and per-holder share balances, and
//! the current block height. Pools read it to quote and plan, and write it
//! only from a fully validated change set.
//!
//! # Write Contract
//!
//! Writes are infallible. The pool validates every intent (balances,
//! holdings, overflow) before the first write of a commit, so an
//! implementation never sees a burn larger than the holder's balance or a
//! balance that does not fit in a `u128`.

use crate::domain::{Address, Amount, PoolShares, Weight};

/// Storage and clock consumed by a pool.
///
/// # Implementors
///
/// - [`InMemoryLedger`](crate::ledger::InMemoryLedger) — `HashMap`-backed
///   reference implementation for tests and simulation.
pub trait Ledger {
    /// Pool balance of `token`; zero if the token is unknown.
    fn balance(&self, token: &Address) -> Amount;

    /// Denormalized weight of `token`; zero if the token is unbound.
    fn weight(&self, token: &Address) -> Weight;

    /// Outstanding pool-share supply.
    fn total_shares(&self) -> PoolShares;

    /// Pool shares held by `holder`.
    fn shares_of(&self, holder: &Address) -> PoolShares;

    /// Current block height.
    fn block_height(&self) -> u64;

    /// Overwrites the pool balance of `token`.
    fn set_balance(&mut self, token: &Address, value: Amount);

    /// Overwrites the weight of `token`.
    fn set_weight(&mut self, token: &Address, weight: Weight);

    /// Mints `amount` new shares to `to`.
    fn mint_shares(&mut self, amount: PoolShares, to: &Address);

    /// Burns `amount` shares held by `from`.
    fn burn_shares(&mut self, amount: PoolShares, from: &Address);
}
