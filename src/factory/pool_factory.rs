//! Side-staked pool creation.

use tracing::{info, warn};

use crate::config::PoolConfig;
use crate::domain::{Amount, CallerContext, PoolShares, Role, TokenAmounts, TokenRole};
use crate::error::AmmError;
use crate::math::fixed::{mul, mul_div, narrow, wide, WAD};
use crate::math::CheckedArithmetic;
use crate::pool::Pool;
use crate::side_staking::{SideStakingController, VestingSchedule};
use crate::traits::Ledger;

/// Stateless factory for side-staked datatoken pools.
///
/// [`create`](Self::create) turns a validated [`PoolConfig`] and an empty
/// ledger into a finalized pool in one step. Every check runs before the
/// first ledger write.
///
/// # Example
///
/// ```rust
/// use datatoken_pool::config::{FeeSchedule, PoolConfig, SideStakingConfig};
/// use datatoken_pool::domain::{
///     Address, Amount, BoundTokens, CallerContext, PermissionSet, PoolWeights, Role,
///     SpotPrice, Weight,
/// };
/// use datatoken_pool::factory::PoolFactory;
/// use datatoken_pool::ledger::InMemoryLedger;
///
/// # fn main() -> datatoken_pool::error::Result<()> {
/// let tokens = BoundTokens::new(Address::repeat_byte(1), Address::repeat_byte(2))?;
/// let staking = SideStakingConfig {
///     controller: Address::repeat_byte(3),
///     publisher: Address::repeat_byte(4),
///     datatoken_cap: Amount::from_whole(10_000).unwrap_or_default(),
///     rate: SpotPrice::ONE,
///     base_token_amount: Amount::from_whole(100).unwrap_or_default(),
///     vesting_amount: Amount::ZERO,
///     vesting_blocks: 2_426_000,
/// };
/// let config = PoolConfig::new(
///     tokens,
///     PoolWeights::new(Weight::from_whole(9), Weight::from_whole(1)),
///     FeeSchedule::default(),
///     staking,
/// )?;
/// let publisher = CallerContext::new(
///     Address::repeat_byte(4),
///     PermissionSet::NONE.with(Role::DeployErc20),
/// );
///
/// let pool = PoolFactory::create(&config, InMemoryLedger::new(), &publisher)?;
/// assert!(pool.is_finalized());
/// assert_eq!(pool.spot_price_sans_fee(&tokens.base_token(), &tokens.datatoken()), Ok(SpotPrice::ONE));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolFactory;

impl PoolFactory {
    /// Creates and finalizes a side-staked pool.
    ///
    /// # Flow
    ///
    /// 1. Require the caller's deploy-erc20 role.
    /// 2. Validate `config`.
    /// 3. Price the initial datatoken deposit so that one datatoken costs
    ///    `rate` base tokens at the configured weights.
    /// 4. Hand the rest of the datatoken cap to the controller as reserve,
    ///    with the vesting allotment locked from the current block.
    /// 5. Split the initial share supply by weight: the controller gets the
    ///    datatoken share, the publisher the base token share.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Unauthorized`] without the deploy-erc20 role.
    /// - Any error from [`PoolConfig::validate`].
    /// - [`AmmError::InvalidConfiguration`] if the ledger already holds
    ///   pool state.
    /// - [`AmmError::InsufficientReserve`] if the cap cannot cover the
    ///   initial deposit plus the vesting allotment.
    /// - [`AmmError::InvalidAmount`] if the initial deposit is below the
    ///   minimum balance.
    pub fn create<L: Ledger>(
        config: &PoolConfig,
        mut ledger: L,
        caller: &CallerContext,
    ) -> crate::error::Result<Pool<L>> {
        caller
            .permissions
            .require(Role::DeployErc20)
            .map_err(|e| {
                warn!(caller = %caller.address, "rejected pool creation");
                e
            })?;
        config.validate()?;

        let tokens = config.tokens();
        let weights = config.weights();
        let staking = config.side_staking();
        let limits = config.limits();

        let untouched = TokenRole::ALL.iter().all(|role| {
            let token = tokens.address(*role);
            ledger.balance(&token).is_zero() && ledger.weight(&token).is_zero()
        });
        if !untouched || !ledger.total_shares().is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "ledger already holds pool state",
            ));
        }

        let initial_dt = initial_datatoken(config)?;
        limits.check_balance(initial_dt)?;
        let available = staking.datatoken_cap.safe_sub(&staking.vesting_amount)?;
        if initial_dt > available {
            return Err(AmmError::InsufficientReserve(
                "datatoken cap too low for initial liquidity",
            ));
        }
        let reserve_dt = staking.datatoken_cap.safe_sub(&initial_dt)?;

        let supply = limits.init_pool_supply;
        let total_weight = weights.total()?;
        let controller_shares = supply.safe_mul_div(weights.datatoken.get(), total_weight.get())?;
        let publisher_shares = supply.safe_sub(&controller_shares)?;

        let vesting = VestingSchedule::new(
            staking.vesting_amount,
            ledger.block_height(),
            staking.vesting_blocks,
        );
        let controller = SideStakingController::new(
            staking.controller,
            staking.publisher,
            TokenAmounts::new(reserve_dt, Amount::ZERO),
            vesting,
        );

        ledger.set_weight(&tokens.datatoken(), weights.datatoken);
        ledger.set_weight(&tokens.base_token(), weights.base_token);
        ledger.set_balance(&tokens.datatoken(), initial_dt);
        ledger.set_balance(&tokens.base_token(), staking.base_token_amount);
        mint_nonzero(&mut ledger, controller_shares, &staking.controller);
        mint_nonzero(&mut ledger, publisher_shares, &staking.publisher);

        info!(
            datatoken = %tokens.datatoken(),
            base_token = %tokens.base_token(),
            initial_datatoken = %initial_dt,
            base_token_amount = %staking.base_token_amount,
            reserve = %reserve_dt,
            vesting_end = vesting.end_block(),
            "side-staked pool created"
        );
        Ok(Pool::assemble(
            ledger,
            tokens,
            config.fees(),
            limits,
            Some(controller),
            true,
        ))
    }
}

/// `base_token_amount · w_dt / (w_bt · rate)`.
fn initial_datatoken(config: &PoolConfig) -> crate::error::Result<Amount> {
    let weights = config.weights();
    let staking = config.side_staking();
    let numer = mul(
        wide(staking.base_token_amount.get()),
        wide(weights.datatoken.get()),
        "initial datatoken numerator",
    )?;
    let denom = mul(
        wide(weights.base_token.get()),
        wide(staking.rate.get()),
        "initial datatoken denominator",
    )?;
    let amount = mul_div(numer, WAD, denom)?;
    Ok(Amount::new(narrow(amount, "initial datatoken exceeds u128")?))
}

fn mint_nonzero<L: Ledger>(ledger: &mut L, shares: PoolShares, to: &crate::domain::Address) {
    if !shares.is_zero() {
        ledger.mint_shares(shares, to);
    }
}
