//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use datatoken_pool::prelude::*;
//! ```

pub use crate::config::{FeeSchedule, PoolConfig, ProtocolLimits, SideStakingConfig};
pub use crate::domain::{
    Address, Amount, BoundTokens, CallerContext, FeeKind, FeeRate, MarketFee, PermissionSet,
    PoolShares, PoolWeights, Role, Settlement, SpotPrice, SwapSpec, TokenAmounts, TokenRole,
    Weight,
};
pub use crate::error::{AmmError, Result};
pub use crate::factory::PoolFactory;
pub use crate::ledger::InMemoryLedger;
pub use crate::pool::{Pool, SwapRequest};
pub use crate::traits::Ledger;
