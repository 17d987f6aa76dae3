//! Side-staking: the automated liquidity controller and its vesting lock.
//!
//! A side-staked pool is created with a [`SideStakingController`] that
//! holds the datatoken reserve. Whenever a user joins or exits, the
//! controller performs the opposite single-sided leg with the other token
//! in the same commit, so the quoted price does not move. Part of the
//! reserve is locked in a [`VestingSchedule`] that releases linearly to
//! the publisher.

mod controller;
mod vesting;

pub use controller::SideStakingController;
pub use vesting::VestingSchedule;
