//! Per-tier fee balances.

use crate::domain::{Amount, FeeKind, TokenAmounts, TokenRole};
use crate::error::AmmError;

/// Accrued and lifetime fee amounts for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeSlot {
    accrued: TokenAmounts,
    lifetime: TokenAmounts,
}

impl FeeSlot {
    /// Fees accrued and not yet paid out.
    pub const fn accrued(&self) -> TokenAmounts {
        self.accrued
    }

    /// Every fee ever charged in this tier.
    pub const fn lifetime(&self) -> TokenAmounts {
        self.lifetime
    }
}

/// Fixed four-slot arena of fee balances keyed by [`FeeKind`].
///
/// LP fees are absorbed into the pool balances, so their slot only tracks
/// lifetime totals. For every slot `accrued <= lifetime` holds per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeBook {
    slots: [FeeSlot; 4],
}

const fn index(kind: FeeKind) -> usize {
    match kind {
        FeeKind::Lp => 0,
        FeeKind::Opc => 1,
        FeeKind::PublishMarket => 2,
        FeeKind::ConsumeMarket => 3,
    }
}

impl FeeBook {
    /// An empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `kind`.
    pub const fn slot(&self, kind: FeeKind) -> &FeeSlot {
        &self.slots[index(kind)]
    }

    /// Fees of `kind` awaiting payout.
    pub const fn accrued(&self, kind: FeeKind) -> TokenAmounts {
        self.slots[index(kind)].accrued
    }

    /// Every fee of `kind` ever charged.
    pub const fn lifetime(&self, kind: FeeKind) -> TokenAmounts {
        self.slots[index(kind)].lifetime
    }

    /// Records a fee of `amount` in `role`'s token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if a counter overflows.
    pub fn accrue(
        &mut self,
        kind: FeeKind,
        role: TokenRole,
        amount: Amount,
    ) -> crate::error::Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let slot = &mut self.slots[index(kind)];
        slot.lifetime.credit(role, amount)?;
        if kind != FeeKind::Lp {
            slot.accrued.credit(role, amount)?;
        }
        Ok(())
    }

    /// Pays out `amount` of `role`'s token from the `kind` slot.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientReserve`] if less than `amount` is
    /// accrued.
    pub fn withdraw(
        &mut self,
        kind: FeeKind,
        role: TokenRole,
        amount: Amount,
    ) -> crate::error::Result<()> {
        self.slots[index(kind)]
            .accrued
            .debit(role, amount)
            .map_err(|_| AmmError::InsufficientReserve("fee withdrawal exceeds accrued fees"))
    }

    /// Zeroes the `kind` slot's accrued balances and returns them.
    pub fn take(&mut self, kind: FeeKind) -> TokenAmounts {
        core::mem::take(&mut self.slots[index(kind)].accrued)
    }
}
