//! Core trait abstractions.
//!
//! [`Ledger`] is the seam between pool logic and the host that stores
//! balances, weights and pool shares.

mod ledger;

pub use ledger::Ledger;
