//! Fundamental domain value types used throughout the pool library.
//!
//! This module contains the value types that model the datatoken pool:
//! amounts, shares, weights, fee rates, prices, bound tokens, caller
//! permissions and the settlement records every mutating call returns.
//! All numeric types are `1e18`-scaled `u128` newtypes.

mod address;
mod amount;
mod fee_kind;
mod fee_rate;
mod permissions;
mod pool_shares;
mod ratio;
mod settlement;
mod spot_price;
mod swap_spec;
mod token;
mod weight;

pub use address::Address;
pub use amount::{Amount, ONE_TOKEN};
pub use fee_kind::{FeeKind, MarketFee};
pub use fee_rate::FeeRate;
pub use permissions::{CallerContext, PermissionSet, Role};
pub use pool_shares::PoolShares;
pub use ratio::{Ratio, WAD};
pub use settlement::{
    CounterAction, CounterKind, FeeBreakdown, Operation, Payout, Settlement, ShareDelta,
};
pub use spot_price::SpotPrice;
pub use swap_spec::SwapSpec;
pub use token::{BoundTokens, TokenAmounts, TokenRole};
pub use weight::{PoolWeights, Weight};
