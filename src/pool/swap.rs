//! Token-for-token swaps.

use tracing::debug;

use super::{price_of, ChangeSet, Pool};
use crate::domain::{
    Address, Amount, FeeBreakdown, FeeKind, MarketFee, Operation, Payout, Settlement, ShareDelta,
    SpotPrice, SwapSpec, TokenAmounts, TokenRole,
};
use crate::error::AmmError;
use crate::fees::{compute_fees, FeeRates};
use crate::traits::Ledger;

/// A swap between the two bound tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapRequest {
    /// Token paid in.
    pub token_in: Address,
    /// Token received.
    pub token_out: Address,
    /// Exact side and slippage bound.
    pub spec: SwapSpec,
    /// Highest acceptable spot price before and after the swap.
    pub max_price: SpotPrice,
    /// Fee owed to the market the swap was routed through.
    pub consume_market_fee: MarketFee,
}

impl SwapRequest {
    /// A request with no price cap and no consume-market fee.
    #[must_use]
    pub const fn new(token_in: Address, token_out: Address, spec: SwapSpec) -> Self {
        Self {
            token_in,
            token_out,
            spec,
            max_price: SpotPrice::MAX,
            consume_market_fee: MarketFee::NONE,
        }
    }

    /// Sets the price cap.
    #[must_use]
    pub const fn with_max_price(mut self, max_price: SpotPrice) -> Self {
        self.max_price = max_price;
        self
    }

    /// Sets the consume-market fee.
    #[must_use]
    pub const fn with_consume_market_fee(mut self, fee: MarketFee) -> Self {
        self.consume_market_fee = fee;
        self
    }
}

/// Priced swap without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapQuote {
    /// Gross amount the caller pays.
    pub amount_in: Amount,
    /// Amount the caller receives.
    pub amount_out: Amount,
    /// Fee split of `amount_in`.
    pub fees: FeeBreakdown,
    /// Spot price of the direction before the swap, all fees included.
    pub spot_price_before: SpotPrice,
}

struct Priced {
    roles: (TokenRole, TokenRole),
    rates: FeeRates,
    quote: SwapQuote,
}

impl<L: Ledger> Pool<L> {
    /// Prices `request` against the current state.
    ///
    /// # Errors
    ///
    /// Every error [`Pool::swap`] reports before committing.
    pub fn quote_swap(&self, request: &SwapRequest) -> crate::error::Result<SwapQuote> {
        self.price_swap(request).map(|p| p.quote)
    }

    /// Executes `request`.
    ///
    /// The input leg, net of the OPC, publish-market and consume-market
    /// fees, is added to the pool; the LP fee stays in the pool balance.
    /// The consume-market fee is paid out in the same commit.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotFinalized`] before finalization.
    /// - [`AmmError::InvalidToken`] if the tokens are not the two bound
    ///   tokens, or a charged consume-market fee names a foreign token.
    /// - [`AmmError::FeeRateOutOfRange`] for a consume-market fee above the
    ///   ceiling.
    /// - [`AmmError::ExcessiveTradeSize`] beyond the in/out ratio limits.
    /// - [`AmmError::SlippageExceeded`] if the amount bound or `max_price`
    ///   is violated.
    /// - [`AmmError::MathApproximation`] if truncation lowered the price.
    pub fn swap(&mut self, request: &SwapRequest) -> crate::error::Result<Settlement> {
        let Priced {
            roles: (role_in, role_out),
            rates,
            quote,
        } = self.price_swap(request)?;

        let mut cs = self.begin();
        cs.credit(role_in, quote.fees.amount_added_to_pool)?;
        cs.debit(role_out, quote.amount_out)?;
        charge(&mut cs, role_in, &quote.fees)?;

        let total = rates.total()?;
        let spot_after = price_of(&self.math, cs.after(), role_in, role_out, total)?;
        if spot_after < quote.spot_price_before {
            return Err(AmmError::MathApproximation("spot price decreased"));
        }
        if spot_after > request.max_price {
            return Err(AmmError::SlippageExceeded("spot price after exceeds limit"));
        }

        let consume_market_payout = (!quote.fees.consume_market.is_zero()).then(|| Payout {
            token: request.token_in,
            recipient: request.consume_market_fee.collector,
            amount: quote.fees.consume_market,
        });

        self.commit(cs);
        debug!(
            token_in = %request.token_in,
            token_out = %request.token_out,
            amount_in = %quote.amount_in,
            amount_out = %quote.amount_out,
            spot_price_after = %spot_after,
            "swap committed"
        );

        Ok(Settlement {
            operation: Operation::Swap,
            amount_in: TokenAmounts::only(role_in, quote.amount_in),
            amount_out: TokenAmounts::only(role_out, quote.amount_out),
            fees: quote.fees,
            spot_price_after: spot_after,
            pool_shares_delta: ShareDelta::Unchanged,
            counter_action: None,
            consume_market_payout,
        })
    }

    fn price_swap(&self, request: &SwapRequest) -> crate::error::Result<Priced> {
        self.require_finalized()?;
        let (role_in, role_out) = self
            .tokens
            .trade_roles(&request.token_in, &request.token_out)?;

        let consume = request.consume_market_fee;
        self.limits.check_market_fee(consume.rate)?;
        consume.check_token(&self.tokens)?;
        if !consume.rate.is_zero() && consume.collector.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "consume-market fee needs a collector",
            ));
        }

        let rates = self.fees.rates(consume.rate);
        let total = rates.total()?;
        let state = self.snapshot();
        let spot_before = price_of(&self.math, &state, role_in, role_out, total)?;
        if spot_before > request.max_price {
            return Err(AmmError::SlippageExceeded("spot price before exceeds limit"));
        }

        let b_in = state.balances.get(role_in);
        let w_in = state.weights.get(role_in);
        let b_out = state.balances.get(role_out);
        let w_out = state.weights.get(role_out);
        let (amount_in, amount_out) = match request.spec {
            SwapSpec::ExactIn {
                amount_in,
                min_amount_out,
            } => {
                let out = self
                    .math
                    .out_given_in(b_in, w_in, b_out, w_out, amount_in, total)?;
                if out < min_amount_out {
                    return Err(AmmError::SlippageExceeded("amount out below minimum"));
                }
                (amount_in, out)
            }
            SwapSpec::ExactOut {
                amount_out,
                max_amount_in,
            } => {
                let paid = self
                    .math
                    .in_given_out(b_in, w_in, b_out, w_out, amount_out, total)?;
                if paid > max_amount_in {
                    return Err(AmmError::SlippageExceeded("amount in above maximum"));
                }
                (paid, amount_out)
            }
        };
        if amount_in.is_zero() || amount_out.is_zero() {
            return Err(AmmError::InvalidAmount("swap rounds to zero"));
        }

        Ok(Priced {
            roles: (role_in, role_out),
            rates,
            quote: SwapQuote {
                amount_in,
                amount_out,
                fees: compute_fees(amount_in, &rates)?,
                spot_price_before: spot_before,
            },
        })
    }
}

fn charge(cs: &mut ChangeSet, role: TokenRole, fees: &FeeBreakdown) -> crate::error::Result<()> {
    cs.charge_fee(FeeKind::Lp, role, fees.lp)?;
    cs.charge_fee(FeeKind::Opc, role, fees.opc)?;
    cs.charge_fee(FeeKind::PublishMarket, role, fees.publish_market)?;
    cs.charge_fee(FeeKind::ConsumeMarket, role, fees.consume_market)
}
