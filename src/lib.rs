//! # Datatoken Pool
//!
//! Two-token weighted liquidity pool for data assets, with an automated
//! side-staking controller that keeps the datatoken price stable while
//! users add and remove liquidity.
//!
//! This crate provides domain types, the weighted-curve math, fee
//! accounting, the pool engine and a factory for side-staked pools:
//!
//! - **Swaps** between the datatoken and its base token, exact-in or
//!   exact-out, with a four-tier fee split (LP, OPC, publish market,
//!   consume market).
//! - **Single-sided and proportional joins and exits**, each answered by
//!   the controller's counter-action inside the same atomic commit.
//! - **Linear vesting** of a datatoken allotment to the publisher.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | yes | `Serialize`/`Deserialize` for configs, domain types and settlements |
//!
//! # Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! datatoken-pool = "0.1"
//! ```
//!
//! ## Create a side-staked pool and buy datatokens
//!
//! ```rust
//! use datatoken_pool::prelude::*;
//!
//! # fn main() -> datatoken_pool::Result<()> {
//! let dt = Address::repeat_byte(0xd7);
//! let bt = Address::repeat_byte(0xb7);
//! let publisher = Address::repeat_byte(0xee);
//!
//! // 1. Describe the pool: 9:1 weights, 1 BT per DT, 10 000 DT cap
//! let staking = SideStakingConfig {
//!     controller: Address::repeat_byte(0xcc),
//!     publisher,
//!     datatoken_cap: Amount::from_whole(10_000).unwrap_or_default(),
//!     rate: SpotPrice::ONE,
//!     base_token_amount: Amount::from_whole(100).unwrap_or_default(),
//!     vesting_amount: Amount::from_whole(500).unwrap_or_default(),
//!     vesting_blocks: 2_426_000,
//! };
//! let config = PoolConfig::new(
//!     BoundTokens::new(dt, bt)?,
//!     PoolWeights::new(Weight::from_whole(9), Weight::from_whole(1)),
//!     FeeSchedule {
//!         swap_fee: FeeRate::from_bps(10),
//!         ..FeeSchedule::default()
//!     },
//!     staking,
//! )?;
//!
//! // 2. Create it through the factory
//! let caller = CallerContext::new(publisher, PermissionSet::NONE.with(Role::DeployErc20));
//! let mut pool = PoolFactory::create(&config, InMemoryLedger::new(), &caller)?;
//!
//! // 3. Buy datatokens with 10 BT
//! let spec = SwapSpec::exact_in(Amount::from_whole(10).unwrap_or_default(), Amount::ZERO)?;
//! let settlement = pool.swap(&SwapRequest::new(bt, dt, spec))?;
//!
//! assert!(settlement.amount_out.datatoken > Amount::ZERO);
//! assert!(settlement.fees.lp > Amount::ZERO);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer   │  uses PoolConfig + PoolFactory
//! └──────┬───────┘
//!        │ create(&config, ledger, caller)
//!        ▼
//! ┌──────────────┐
//! │   Factory    │  validates config, prices the initial deposit
//! └──────┬───────┘
//!        │ Pool<L: Ledger>
//!        ▼
//! ┌──────────────┐
//! │     Pool     │  plan (ChangeSet) → controller counter-action → commit
//! └──────┬───────┘
//!        │ WeightedMath + FeeRates
//!        ▼
//! ┌──────────────┐
//! │ Math / Fees  │  U256 fixed point, fee split, fee book
//! └──────┬───────┘
//!        │ Ledger trait
//!        ▼
//! ┌──────────────┐
//! │    Ledger    │  balances, weights, shares, block height
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Weight`](domain::Weight), [`FeeRate`](domain::FeeRate), [`Settlement`](domain::Settlement), etc. |
//! | [`traits`] | The [`Ledger`](traits::Ledger) host abstraction |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) reference ledger |
//! | [`config`] | Declarative blueprints: [`PoolConfig`](config::PoolConfig), [`ProtocolLimits`](config::ProtocolLimits), … |
//! | [`math`]   | 256-bit fixed point and the [`WeightedMath`](math::WeightedMath) curve |
//! | [`fees`]   | Fee split and the four-slot [`FeeBook`](fees::FeeBook) |
//! | [`pool`]   | The [`Pool`](pool::Pool) engine: swaps, joins, exits, setup, collection |
//! | [`side_staking`] | [`SideStakingController`](side_staking::SideStakingController) and vesting |
//! | [`factory`] | [`PoolFactory`](factory::PoolFactory) for config-driven pool construction |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types |

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod fees;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod side_staking;
pub mod traits;

pub use error::{AmmError, Result};
