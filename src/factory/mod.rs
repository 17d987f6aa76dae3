//! Pool instantiation via the factory pattern.
//!
//! [`PoolFactory`] builds a finalized side-staked pool from a
//! [`PoolConfig`](crate::config::PoolConfig) and an empty
//! [`Ledger`](crate::traits::Ledger). Pools without a controller are built
//! through [`Pool::setup`](crate::pool::Pool::setup) instead.

mod pool_factory;

pub use pool_factory::PoolFactory;
