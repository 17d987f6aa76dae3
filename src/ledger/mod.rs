//! [`Ledger`](crate::traits::Ledger) implementations.

mod memory;

pub use memory::InMemoryLedger;
