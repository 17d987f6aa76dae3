//! Linear block-based vesting.

use crate::domain::Amount;
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Datatoken allotment released linearly to the publisher between
/// `start_block` and `end_block`.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::Amount;
/// use datatoken_pool::side_staking::VestingSchedule;
///
/// let schedule = VestingSchedule::new(Amount::new(18), 1_000, 100);
/// assert_eq!(schedule.available_vested_amount(1_050), Ok(Amount::new(9)));
/// assert_eq!(schedule.available_vested_amount(5_000), Ok(Amount::new(18)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VestingSchedule {
    total_amount: Amount,
    vested_so_far: Amount,
    start_block: u64,
    end_block: u64,
}

impl VestingSchedule {
    /// Creates a schedule releasing `total_amount` over `blocks` blocks from
    /// `start_block`.
    #[must_use]
    pub const fn new(total_amount: Amount, start_block: u64, blocks: u64) -> Self {
        Self {
            total_amount,
            vested_so_far: Amount::ZERO,
            start_block,
            end_block: start_block.saturating_add(blocks),
        }
    }

    /// Total allotment.
    #[must_use]
    pub const fn total_amount(&self) -> Amount {
        self.total_amount
    }

    /// Amount already claimed.
    #[must_use]
    pub const fn vested_so_far(&self) -> Amount {
        self.vested_so_far
    }

    /// First block of the schedule.
    #[must_use]
    pub const fn start_block(&self) -> u64 {
        self.start_block
    }

    /// Block at which everything is vested.
    #[must_use]
    pub const fn end_block(&self) -> u64 {
        self.end_block
    }

    /// Allotment not yet claimed. Stays locked in the controller reserve.
    #[must_use]
    pub fn remaining(&self) -> Amount {
        self.total_amount
            .checked_sub(&self.vested_so_far)
            .unwrap_or(Amount::ZERO)
    }

    /// Returns `true` once the whole allotment has been claimed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.vested_so_far >= self.total_amount
    }

    /// Cumulative amount vested at `height`, claimed or not.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the pro-rata product overflows.
    pub fn vested_at(&self, height: u64) -> crate::error::Result<Amount> {
        if height >= self.end_block {
            return Ok(self.total_amount);
        }
        let elapsed = height.saturating_sub(self.start_block);
        let duration = self.end_block - self.start_block;
        self.total_amount
            .safe_mul_div(u128::from(elapsed), u128::from(duration))
    }

    /// Amount claimable at `height`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the pro-rata product overflows.
    pub fn available_vested_amount(&self, height: u64) -> crate::error::Result<Amount> {
        let vested = self.vested_at(height)?;
        Ok(vested.checked_sub(&self.vested_so_far).unwrap_or(Amount::ZERO))
    }

    /// Records a claim of `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if the claim would exceed the
    /// total allotment.
    pub fn claim(&mut self, amount: Amount) -> crate::error::Result<()> {
        let claimed = self.vested_so_far.safe_add(&amount)?;
        if claimed > self.total_amount {
            return Err(AmmError::InvalidAmount("claim exceeds vesting allotment"));
        }
        self.vested_so_far = claimed;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const START: u64 = 1_000;

    fn schedule() -> VestingSchedule {
        VestingSchedule::new(Amount::new(18), START, 100)
    }

    #[test]
    fn nothing_before_start() {
        assert_eq!(schedule().available_vested_amount(START - 1), Ok(Amount::ZERO));
        assert_eq!(schedule().available_vested_amount(START), Ok(Amount::ZERO));
    }

    #[test]
    fn half_way() {
        assert_eq!(schedule().available_vested_amount(START + 50), Ok(Amount::new(9)));
    }

    #[test]
    fn fully_vested_at_end_and_after() {
        assert_eq!(schedule().available_vested_amount(START + 100), Ok(Amount::new(18)));
        assert_eq!(schedule().available_vested_amount(u64::MAX), Ok(Amount::new(18)));
    }

    #[test]
    fn floors_partial_blocks() {
        // 18 * 7 / 100 = 1.26
        assert_eq!(schedule().available_vested_amount(START + 7), Ok(Amount::new(1)));
    }

    #[test]
    fn claims_reduce_availability() {
        let mut s = schedule();
        let Ok(first) = s.available_vested_amount(START + 50) else {
            panic!("expected Ok");
        };
        let Ok(()) = s.claim(first) else {
            panic!("expected Ok");
        };
        assert_eq!(s.available_vested_amount(START + 50), Ok(Amount::ZERO));
        assert_eq!(s.available_vested_amount(START + 100), Ok(Amount::new(9)));
        assert_eq!(s.remaining(), Amount::new(9));
        assert!(!s.is_complete());
    }

    #[test]
    fn over_claim_rejected() {
        let mut s = schedule();
        assert!(matches!(
            s.claim(Amount::new(19)),
            Err(AmmError::InvalidAmount(_))
        ));
        assert_eq!(s.vested_so_far(), Amount::ZERO);
    }

    #[test]
    fn zero_duration_vests_immediately() {
        let s = VestingSchedule::new(Amount::new(5), START, 0);
        assert_eq!(s.available_vested_amount(START), Ok(Amount::new(5)));
    }

    #[test]
    fn end_block_saturates() {
        let s = VestingSchedule::new(Amount::new(5), u64::MAX - 1, 10);
        assert_eq!(s.end_block(), u64::MAX);
    }
}
