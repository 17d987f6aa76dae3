//! Records emitted by every mutating pool call.

use core::fmt;

use super::{Address, Amount, PoolShares, SpotPrice, TokenAmounts};

/// The fee split of one gross input amount.
///
/// `amount_added_to_pool` is the gross input minus the three external fees;
/// the LP fee stays inside it and therefore inside the pool balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeBreakdown {
    /// Liquidity-provider fee (retained in the pool).
    pub lp: Amount,
    /// Protocol community fee.
    pub opc: Amount,
    /// Publishing marketplace fee.
    pub publish_market: Amount,
    /// Consuming marketplace fee.
    pub consume_market: Amount,
    /// Amount credited to the pool balance.
    pub amount_added_to_pool: Amount,
}

impl FeeBreakdown {
    /// No fees; the whole input is credited.
    pub const fn none(amount_in: Amount) -> Self {
        Self {
            lp: Amount::ZERO,
            opc: Amount::ZERO,
            publish_market: Amount::ZERO,
            consume_market: Amount::ZERO,
            amount_added_to_pool: amount_in,
        }
    }

    /// The part of the input that is priced by the curve, net of all four
    /// fees.
    pub const fn amount_traded(&self) -> Amount {
        Amount::new(self.amount_added_to_pool.get().saturating_sub(self.lp.get()))
    }

    /// Sum of the three fees that leave the pool balance.
    pub const fn external_total(&self) -> Amount {
        Amount::new(
            self.opc
                .get()
                .saturating_add(self.publish_market.get())
                .saturating_add(self.consume_market.get()),
        )
    }
}

/// Which kind of call produced a [`Settlement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Token-for-token swap.
    Swap,
    /// Single-sided deposit.
    JoinSingle,
    /// Proportional deposit of both tokens.
    JoinPool,
    /// Single-sided withdrawal.
    ExitSingle,
    /// Proportional withdrawal of both tokens.
    ExitPool,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Swap => "swap",
            Self::JoinSingle => "join-single",
            Self::JoinPool => "join-pool",
            Self::ExitSingle => "exit-single",
            Self::ExitPool => "exit-pool",
        };
        f.write_str(name)
    }
}

/// Change to the caller's pool-share balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShareDelta {
    /// No shares moved (swaps).
    #[default]
    Unchanged,
    /// Shares minted to the caller.
    Minted(PoolShares),
    /// Shares burned from the caller.
    Burned(PoolShares),
}

/// Direction of a controller counter-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CounterKind {
    /// Reserve tokens deposited into the pool.
    Join,
    /// Pool tokens withdrawn into the reserve.
    Exit,
}

/// The side-staking controller's single-sided rebalancing leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterAction {
    /// Join or exit.
    pub kind: CounterKind,
    /// Token moved between the reserve and the pool.
    pub token: Address,
    /// Token amount moved.
    pub amount: Amount,
    /// Shares minted to (join) or burned from (exit) the controller.
    pub shares: PoolShares,
}

/// A transfer out of the pool's custody to an external account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payout {
    /// Token transferred.
    pub token: Address,
    /// Receiving account.
    pub recipient: Address,
    /// Amount transferred.
    pub amount: Amount,
}

/// Everything a swap, join or exit did, in one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settlement {
    /// Operation that produced this record.
    pub operation: Operation,
    /// Gross amounts paid by the caller.
    pub amount_in: TokenAmounts,
    /// Amounts received by the caller.
    pub amount_out: TokenAmounts,
    /// Fee split of the input leg.
    pub fees: FeeBreakdown,
    /// Spot price after commit. Its meaning depends on `operation`:
    ///
    /// - `Swap`: price of the output token in units of the input token,
    ///   with all four fee rates (swap, OPC, publish and consume) applied.
    /// - Joins and exits: base tokens per datatoken with only the swap fee
    ///   applied, whichever token moved.
    pub spot_price_after: SpotPrice,
    /// Change to the caller's share balance.
    pub pool_shares_delta: ShareDelta,
    /// Controller rebalancing performed in the same commit, if any.
    pub counter_action: Option<CounterAction>,
    /// Consume-market fee paid out in the same commit, if non-zero.
    pub consume_market_payout: Option<Payout>,
}
