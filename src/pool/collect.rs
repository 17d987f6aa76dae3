//! Fee collection and vesting claims.
//!
//! Both calls are permissionless: the recipient is fixed by configuration,
//! so anyone may trigger the payout.

use tracing::info;

use super::Pool;
use crate::domain::{FeeKind, Payout, TokenRole};
use crate::error::AmmError;
use crate::traits::Ledger;

impl<L: Ledger> Pool<L> {
    /// Pays out and zeroes the accrued OPC or publish-market fees.
    ///
    /// Returns one payout per token with a non-zero balance.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] for the LP tier (its fees
    /// stay in the pool balances) and the consume-market tier (paid out per
    /// swap).
    pub fn collect_fees(&mut self, kind: FeeKind) -> crate::error::Result<Vec<Payout>> {
        let recipient = match kind {
            FeeKind::Opc => self.fees.opc_collector,
            FeeKind::PublishMarket => self.fees.publish_market_fee.collector,
            FeeKind::Lp => {
                return Err(AmmError::InvalidConfiguration(
                    "lp fees stay in the pool balances",
                ))
            }
            FeeKind::ConsumeMarket => {
                return Err(AmmError::InvalidConfiguration(
                    "consume-market fees are paid out per swap",
                ))
            }
        };

        let accrued = self.fee_book.take(kind);
        let payouts: Vec<Payout> = TokenRole::ALL
            .into_iter()
            .filter(|role| !accrued.get(*role).is_zero())
            .map(|role| Payout {
                token: self.tokens.address(role),
                recipient,
                amount: accrued.get(role),
            })
            .collect();
        for payout in &payouts {
            info!(%kind, token = %payout.token, %recipient, amount = %payout.amount, "fees collected");
        }
        Ok(payouts)
    }

    /// Releases the datatokens vested so far to the publisher.
    ///
    /// Returns `None` when nothing is claimable or the pool has no
    /// controller.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the pro-rata computation overflows.
    pub fn claim_vesting(&mut self) -> crate::error::Result<Option<Payout>> {
        let height = self.ledger.block_height();
        let Some(controller) = self.controller.as_mut() else {
            return Ok(None);
        };
        let Some(amount) = controller.claim_vesting(height)? else {
            return Ok(None);
        };
        let payout = Payout {
            token: self.tokens.datatoken(),
            recipient: controller.publisher(),
            amount,
        };
        info!(
            recipient = %payout.recipient,
            %amount,
            block = height,
            "vesting claimed"
        );
        Ok(Some(payout))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::domain::{Amount, SwapSpec};
    use crate::pool::SwapRequest;

    fn trade(pool: &mut Pool<crate::ledger::InMemoryLedger>) {
        let Ok(spec) = SwapSpec::exact_in(whole(10), Amount::ZERO) else {
            panic!("expected Ok");
        };
        let Ok(_) = pool.swap(&SwapRequest::new(BT, DT, spec)) else {
            panic!("expected Ok");
        };
    }

    #[test]
    fn opc_fees_collected_once() {
        let mut pool = side_staked(1_400);
        trade(&mut pool);
        let accrued = pool.fee_book().accrued(FeeKind::Opc);
        let Ok(payouts) = pool.collect_fees(FeeKind::Opc) else {
            panic!("expected Ok");
        };
        assert_eq!(
            payouts,
            vec![Payout {
                token: BT,
                recipient: OPC,
                amount: accrued.base_token
            }]
        );
        assert_eq!(pool.collect_fees(FeeKind::Opc), Ok(Vec::new()));
        assert_eq!(
            pool.fee_book().lifetime(FeeKind::Opc).base_token,
            accrued.base_token
        );
    }

    #[test]
    fn publish_fees_go_to_publish_market() {
        let mut pool = side_staked(1_400);
        trade(&mut pool);
        let Ok(payouts) = pool.collect_fees(FeeKind::PublishMarket) else {
            panic!("expected Ok");
        };
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts[0].recipient, MARKET);
    }

    #[test]
    fn lp_and_consume_tiers_not_collectable() {
        let mut pool = side_staked(1_400);
        assert!(pool.collect_fees(FeeKind::Lp).is_err());
        assert!(pool.collect_fees(FeeKind::ConsumeMarket).is_err());
    }

    #[test]
    fn vesting_claim_pays_publisher() {
        let mut pool = side_staked(1_400);
        assert_eq!(pool.claim_vesting(), Ok(None));
        pool.ledger_mut().advance_blocks(50);
        let Ok(Some(payout)) = pool.claim_vesting() else {
            panic!("expected a payout");
        };
        assert_eq!(payout.recipient, PUBLISHER);
        assert_eq!(payout.token, DT);
        assert_eq!(payout.amount, whole(5));
        assert_eq!(pool.claim_vesting(), Ok(None));
    }

    #[test]
    fn manual_pool_has_nothing_to_vest() {
        let mut pool = manual();
        assert_eq!(pool.claim_vesting(), Ok(None));
    }
}
