//! Side-staked datatoken pool walkthrough.
//!
//! Creates a 90/10 datatoken pool through the factory, buys datatokens,
//! joins with base tokens (the controller stakes datatokens to hold the
//! price), collects protocol fees and claims vested datatokens.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=debug cargo run --example side_staked_pool
//! ```

use datatoken_pool::domain::{FeeRate, MarketFee, ONE_TOKEN};
use datatoken_pool::prelude::*;
use tracing_subscriber::EnvFilter;

fn whole(n: u128) -> Amount {
    Amount::new(n * ONE_TOKEN)
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Side-staked datatoken pool ===\n");

    // ── 1. Accounts ─────────────────────────────────────────────────────
    let datatoken = Address::repeat_byte(0xd7);
    let base_token = Address::repeat_byte(0xb7);
    let controller = Address::repeat_byte(0xcc);
    let publisher = Address::repeat_byte(0xee);
    let opc = Address::repeat_byte(0x0c);
    let market = Address::repeat_byte(0x3a);
    let trader = Address::repeat_byte(0xa1);

    // ── 2. Configure: 9:1 weights, rate 1, 100 base tokens seeded ───────
    let fees = FeeSchedule {
        swap_fee: FeeRate::from_bps(10),
        opc_fee: FeeRate::from_bps(10),
        opc_collector: opc,
        publish_market_fee: MarketFee::new(market, base_token, FeeRate::from_bps(10)),
    };
    let staking = SideStakingConfig {
        controller,
        publisher,
        datatoken_cap: whole(10_000),
        rate: SpotPrice::ONE,
        base_token_amount: whole(100),
        vesting_amount: whole(1_000),
        vesting_blocks: 2_426_000,
    };
    let config = PoolConfig::new(
        BoundTokens::new(datatoken, base_token)?,
        PoolWeights::new(Weight::from_whole(9), Weight::from_whole(1)),
        fees,
        staking,
    )?;

    // ── 3. Create ───────────────────────────────────────────────────────
    let deployer = CallerContext::new(publisher, PermissionSet::NONE.with(Role::DeployErc20));
    let mut pool = PoolFactory::create(&config, InMemoryLedger::at_block(1_000), &deployer)?;
    println!("Balances:    {} DT / {} BT", pool.balances().datatoken, pool.balances().base_token);
    println!("Shares:      {}", pool.total_shares());
    println!("Spot price:  {} BT per DT", pool.spot_price(&base_token, &datatoken)?);

    // ── 4. Buy datatokens ───────────────────────────────────────────────
    let request = SwapRequest::new(base_token, datatoken, SwapSpec::exact_in(whole(5), Amount::ZERO)?);
    let quote = pool.quote_swap(&request)?;
    let bought = pool.swap(&request)?;
    println!("\n--- Swap: 5 BT for DT ---");
    println!("  Quoted out:  {}", quote.amount_out);
    println!("  Amount out:  {}", bought.amount_out.datatoken);
    println!("  LP fee:      {}", bought.fees.lp);
    println!("  Price after: {}", bought.spot_price_after);

    // ── 5. Single-sided base token join ─────────────────────────────────
    let joined = pool.join_swap_extern_amount_in(&trader, &base_token, whole(20), PoolShares::ZERO)?;
    println!("\n--- Join: 20 BT ---");
    println!("  Shares:      {:?}", joined.pool_shares_delta);
    if let Some(action) = joined.counter_action {
        println!("  Controller:  {:?} {} DT", action.kind, action.amount);
    }

    // ── 6. Collect protocol fees ────────────────────────────────────────
    for payout in pool.collect_fees(FeeKind::Opc)? {
        println!("\nOPC payout:  {} to {}", payout.amount, payout.recipient);
    }

    // ── 7. Claim vesting halfway through ────────────────────────────────
    pool.ledger_mut().advance_blocks(1_213_000);
    if let Some(payout) = pool.claim_vesting()? {
        println!("Vested:      {} DT to {}", payout.amount, payout.recipient);
    }

    println!("\n=== Done ===");
    Ok(())
}
