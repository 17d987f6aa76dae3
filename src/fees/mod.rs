//! Four-tier fee accounting.
//!
//! Every gross input is split across the LP, OPC, publish-market and
//! consume-market tiers by [`compute_fees`]. The LP share stays in the pool
//! balance; the other three are tracked per token in a [`FeeBook`] until
//! they are paid out.

mod book;
mod split;

pub use book::{FeeBook, FeeSlot};
pub use split::{compute_fees, FeeRates};
