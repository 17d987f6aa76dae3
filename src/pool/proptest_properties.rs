//! Property-based tests using `proptest` for pool invariants.
//!
//! 1. **Bounded output**: a swap never drains the output balance.
//! 2. **Fee conservation**: the fee split plus the traded amount equals
//!    the gross input exactly.
//! 3. **Price direction**: buying a token raises its price.
//! 4. **Swap reversibility**: a round trip never returns more than it took.
//! 5. **Join/exit symmetry**: on a pool without a controller, a
//!    single-sided join followed by an exit of the minted shares loses at
//!    most twice the fee taken. With a controller both legs are rebalanced,
//!    so the round trip also pays the price impact of each leg; it never
//!    profits and leaves the price where it started.
//! 6. **Controller neutrality**: a base-token join on a side-staked pool
//!    leaves the datatoken price unchanged.

use proptest::prelude::*;

use super::fixtures::{manual, side_staked, whole, BT, DT, USER};
use super::SwapRequest;
use crate::domain::{Address, Amount, PoolShares, ShareDelta, SwapSpec, ONE_TOKEN};

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Base-token inputs in (0, 50] tokens: up to the max in-ratio of a
/// 100-token balance.
fn base_token_in() -> impl Strategy<Value = Amount> {
    (1u128..=50 * 1_000).prop_map(|milli| Amount::new(milli * ONE_TOKEN / 1_000))
}

fn exact_in(token_in: Address, token_out: Address, amount: Amount) -> Option<SwapRequest> {
    SwapSpec::exact_in(amount, Amount::ZERO)
        .ok()
        .map(|spec| SwapRequest::new(token_in, token_out, spec))
}

// ---------------------------------------------------------------------------
// Swaps
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_output_below_balance(amount in base_token_in()) {
        let mut pool = manual();
        let Some(request) = exact_in(BT, DT, amount) else {
            return Ok(());
        };
        let Ok(s) = pool.swap(&request) else {
            return Ok(());
        };
        prop_assert!(s.amount_out.datatoken < whole(900));
        prop_assert!(!pool.balances().datatoken.is_zero());
    }

    #[test]
    fn prop_fee_conservation(amount in base_token_in()) {
        let mut pool = manual();
        let Some(request) = exact_in(BT, DT, amount) else {
            return Ok(());
        };
        let Ok(s) = pool.swap(&request) else {
            return Ok(());
        };
        let f = s.fees;
        prop_assert_eq!(
            f.lp.get() + f.opc.get() + f.publish_market.get() + f.consume_market.get()
                + f.amount_traded().get(),
            amount.get()
        );
        prop_assert_eq!(
            f.amount_added_to_pool.get(),
            amount.get() - f.opc.get() - f.publish_market.get() - f.consume_market.get()
        );
    }

    #[test]
    fn prop_price_moves_with_trade(amount in base_token_in()) {
        let mut pool = manual();
        let Ok(before) = pool.spot_price(&BT, &DT) else {
            return Ok(());
        };
        let Some(request) = exact_in(BT, DT, amount) else {
            return Ok(());
        };
        let Ok(s) = pool.swap(&request) else {
            return Ok(());
        };
        prop_assert!(s.spot_price_after >= before);
    }

    #[test]
    fn prop_swap_reversibility(amount in base_token_in()) {
        let mut pool = manual();
        let Some(there) = exact_in(BT, DT, amount) else {
            return Ok(());
        };
        let Ok(first) = pool.swap(&there) else {
            return Ok(());
        };
        let received = first.amount_out.datatoken;
        let Some(back) = exact_in(DT, BT, received) else {
            return Ok(());
        };
        let Ok(second) = pool.swap(&back) else {
            return Ok(());
        };
        prop_assert!(
            second.amount_out.base_token <= amount,
            "round trip should lose value: final={} > original={}",
            second.amount_out.base_token, amount
        );
    }
}

// ---------------------------------------------------------------------------
// Liquidity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_join_exit_symmetry(amount in base_token_in()) {
        let mut pool = manual();
        let held = pool.shares_of(&USER);
        let Ok(joined) = pool.join_swap_extern_amount_in(&USER, &BT, amount, PoolShares::ZERO) else {
            return Ok(());
        };
        let ShareDelta::Minted(minted) = joined.pool_shares_delta else {
            return Err(TestCaseError::fail("join must mint"));
        };
        prop_assert!(pool.total_shares() > PoolShares::new(100 * ONE_TOKEN));

        let Ok(exited) = pool.exit_swap_pool_amount_in(&USER, &BT, minted, Amount::ZERO) else {
            return Ok(());
        };
        prop_assert_eq!(pool.shares_of(&USER), held);

        let out = exited.amount_out.base_token.get();
        let fee = joined.fees.lp.get() + exited.fees.lp.get();
        prop_assert!(out <= amount.get());
        prop_assert!(
            amount.get() - out <= 2 * fee,
            "lost {} with fees {}", amount.get() - out, fee
        );
    }

    #[test]
    fn prop_side_staked_join_exit_round_trip(amount in base_token_in()) {
        let mut pool = side_staked(100_000);
        let Ok(before) = pool.spot_price_sans_fee(&BT, &DT) else {
            return Ok(());
        };
        let Ok(joined) = pool.join_swap_extern_amount_in(&USER, &BT, amount, PoolShares::ZERO) else {
            return Ok(());
        };
        let ShareDelta::Minted(minted) = joined.pool_shares_delta else {
            return Err(TestCaseError::fail("join must mint"));
        };
        let Ok(exited) = pool.exit_swap_pool_amount_in(&USER, &BT, minted, Amount::ZERO) else {
            return Ok(());
        };
        prop_assert!(pool.shares_of(&USER).is_zero());
        prop_assert!(exited.amount_out.base_token < amount);

        let Ok(after) = pool.spot_price_sans_fee(&BT, &DT) else {
            return Ok(());
        };
        prop_assert!(
            before.abs_diff(&after) <= 10_000_000_000,
            "price moved from {} to {}", before, after
        );
    }

    #[test]
    fn prop_controller_keeps_price(amount in base_token_in()) {
        let mut pool = side_staked(100_000);
        let Ok(before) = pool.spot_price_sans_fee(&BT, &DT) else {
            return Ok(());
        };
        let Ok(s) = pool.join_swap_extern_amount_in(&USER, &BT, amount, PoolShares::ZERO) else {
            return Ok(());
        };
        prop_assert!(s.counter_action.is_some());
        let Ok(after) = pool.spot_price_sans_fee(&BT, &DT) else {
            return Ok(());
        };
        prop_assert!(
            before.abs_diff(&after) <= 10_000_000_000,
            "price moved from {} to {}", before, after
        );
    }
}
