//! Declarative pool configuration.
//!
//! [`PoolConfig`] is the blueprint the [factory](crate::factory) builds a
//! side-staked pool from. It bundles the bound tokens and weights, the
//! [`FeeSchedule`], the [`SideStakingConfig`] and the [`ProtocolLimits`]
//! every value is checked against.

mod fee_schedule;
mod limits;
mod pool;
mod side_staking;

pub use fee_schedule::FeeSchedule;
pub use limits::ProtocolLimits;
pub use pool::PoolConfig;
pub use side_staking::SideStakingConfig;
