//! Point-in-time view of pool state.

use crate::domain::{BoundTokens, PoolShares, PoolWeights, TokenAmounts};
use crate::traits::Ledger;

/// Balances, weights and share supply at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Pool balances of both tokens.
    pub balances: TokenAmounts,
    /// Denormalized weights of both tokens.
    pub weights: PoolWeights,
    /// Outstanding share supply.
    pub total_shares: PoolShares,
}

impl Snapshot {
    /// Reads the current state of `tokens` from `ledger`.
    pub fn read<L: Ledger>(ledger: &L, tokens: &BoundTokens) -> Self {
        let dt = tokens.datatoken();
        let bt = tokens.base_token();
        Self {
            balances: TokenAmounts::new(ledger.balance(&dt), ledger.balance(&bt)),
            weights: PoolWeights::new(ledger.weight(&dt), ledger.weight(&bt)),
            total_shares: ledger.total_shares(),
        }
    }
}
