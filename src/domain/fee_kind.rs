//! Fee beneficiaries and market fee descriptors.

use core::fmt;

use super::{Address, BoundTokens, FeeRate};
use crate::error::AmmError;

/// The four independent fee beneficiaries of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeeKind {
    /// Liquidity-provider fee; stays in the pool balances.
    Lp,
    /// Protocol community fee, paid to the OPC collector.
    Opc,
    /// Fee for the marketplace that published the asset.
    PublishMarket,
    /// Fee for the marketplace that routed the trade.
    ConsumeMarket,
}

impl FeeKind {
    /// All kinds, in deduction order.
    pub const ALL: [Self; 4] = [Self::Lp, Self::Opc, Self::PublishMarket, Self::ConsumeMarket];
}

impl fmt::Display for FeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lp => write!(f, "lp"),
            Self::Opc => write!(f, "opc"),
            Self::PublishMarket => write!(f, "publish-market"),
            Self::ConsumeMarket => write!(f, "consume-market"),
        }
    }
}

/// A marketplace fee: who collects it, in which token it is quoted, and
/// the rate.
///
/// The rate applies to whichever token enters the pool. A fee with a
/// non-zero rate must name one of the pool's bound tokens as `token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketFee {
    /// Account receiving the fee.
    pub collector: Address,
    /// Token the fee is denominated in.
    pub token: Address,
    /// Fee rate on the gross input.
    pub rate: FeeRate,
}

impl MarketFee {
    /// A zero-rate fee paying nobody.
    pub const NONE: Self = Self {
        collector: Address::ZERO,
        token: Address::ZERO,
        rate: FeeRate::ZERO,
    };

    /// Creates a market fee descriptor.
    #[must_use]
    pub const fn new(collector: Address, token: Address, rate: FeeRate) -> Self {
        Self {
            collector,
            token,
            rate,
        }
    }

    /// Checks that a charged fee is denominated in a bound token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if the rate is non-zero and
    /// `token` is neither the datatoken nor the base token.
    pub fn check_token(&self, tokens: &BoundTokens) -> crate::error::Result<()> {
        if !self.rate.is_zero() && !tokens.contains(&self.token) {
            return Err(AmmError::InvalidToken("market fee token is not bound"));
        }
        Ok(())
    }
}
