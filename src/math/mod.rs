//! Arithmetic for the weighted pool.
//!
//! - [`fixed`] — 256-bit fixed-point `ln`, `exp` and `pow`
//! - [`WeightedMath`] — spot price, swap quotes and single-sided share math
//! - [`CheckedArithmetic`] — overflow-safe operations on domain newtypes

mod checked;
pub mod fixed;
mod weighted;

pub use checked::CheckedArithmetic;
pub use weighted::{single_sided_fee, WeightedMath};
