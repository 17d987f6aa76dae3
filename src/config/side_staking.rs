//! Side-staking controller configuration.

use super::ProtocolLimits;
use crate::domain::{Address, Amount, SpotPrice};
use crate::error::AmmError;

/// Parameters for the automated liquidity controller of a new pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideStakingConfig {
    /// Account the controller holds shares and reserves under.
    pub controller: Address,
    /// Publisher: supplies the initial base tokens and receives vesting.
    pub publisher: Address,
    /// Datatoken cap; the whole cap is handed to the controller.
    pub datatoken_cap: Amount,
    /// Initial price of one datatoken in base tokens.
    pub rate: SpotPrice,
    /// Base tokens the publisher deposits at creation.
    pub base_token_amount: Amount,
    /// Datatokens released linearly to the publisher.
    pub vesting_amount: Amount,
    /// Length of the vesting period in blocks.
    pub vesting_blocks: u64,
}

impl SideStakingConfig {
    /// Checks the controller parameters.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if the controller address is
    ///   zero or equals the publisher.
    /// - [`AmmError::InvalidAmount`] for a zero rate or cap, a base token
    ///   amount below the minimum balance, or a vesting amount above a
    ///   tenth of the cap.
    /// - [`AmmError::VestingPeriodTooShort`] if `vesting_blocks` is below
    ///   the protocol minimum.
    pub fn validate(&self, limits: &ProtocolLimits) -> crate::error::Result<()> {
        if self.controller.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "controller address must be set",
            ));
        }
        if self.controller == self.publisher {
            return Err(AmmError::InvalidConfiguration(
                "controller and publisher must differ",
            ));
        }
        if self.rate.is_zero() {
            return Err(AmmError::InvalidAmount("rate must be positive"));
        }
        if self.datatoken_cap.is_zero() {
            return Err(AmmError::InvalidAmount("datatoken cap must be positive"));
        }
        limits.check_balance(self.base_token_amount)?;
        if self.vesting_amount.get() > self.datatoken_cap.get() / 10 {
            return Err(AmmError::InvalidAmount(
                "vesting amount exceeds a tenth of the datatoken cap",
            ));
        }
        if self.vesting_blocks < limits.min_vesting_blocks {
            return Err(AmmError::VestingPeriodTooShort {
                blocks: self.vesting_blocks,
                minimum: limits.min_vesting_blocks,
            });
        }
        Ok(())
    }
}
