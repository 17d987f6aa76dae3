//! The two tokens a pool binds, and per-token amounts.

use core::fmt;

use super::{Address, Amount};
use crate::error::AmmError;

/// Which side of the pool a token sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenRole {
    /// The dataset-access token.
    Datatoken,
    /// The base currency token.
    BaseToken,
}

impl TokenRole {
    /// Both roles, datatoken first.
    pub const ALL: [Self; 2] = [Self::Datatoken, Self::BaseToken];

    /// Returns the opposite role.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Datatoken => Self::BaseToken,
            Self::BaseToken => Self::Datatoken,
        }
    }
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datatoken => write!(f, "datatoken"),
            Self::BaseToken => write!(f, "base token"),
        }
    }
}

/// The datatoken and base token bound to a pool.
///
/// The two addresses are always distinct.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::{Address, BoundTokens, TokenRole};
///
/// let dt = Address::repeat_byte(1);
/// let bt = Address::repeat_byte(2);
/// let tokens = BoundTokens::new(dt, bt).unwrap_or_else(|_| unreachable!());
/// assert_eq!(tokens.role_of(&bt), Ok(TokenRole::BaseToken));
/// assert!(BoundTokens::new(dt, dt).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundTokens {
    datatoken: Address,
    base_token: Address,
}

impl BoundTokens {
    /// Binds a datatoken and a base token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if both addresses are equal.
    pub fn new(datatoken: Address, base_token: Address) -> crate::error::Result<Self> {
        if datatoken == base_token {
            return Err(AmmError::InvalidToken(
                "datatoken and base token must be distinct",
            ));
        }
        Ok(Self {
            datatoken,
            base_token,
        })
    }

    /// Returns the datatoken address.
    #[must_use]
    pub const fn datatoken(&self) -> Address {
        self.datatoken
    }

    /// Returns the base token address.
    #[must_use]
    pub const fn base_token(&self) -> Address {
        self.base_token
    }

    /// Returns the address bound under `role`.
    #[must_use]
    pub const fn address(&self, role: TokenRole) -> Address {
        match role {
            TokenRole::Datatoken => self.datatoken,
            TokenRole::BaseToken => self.base_token,
        }
    }

    /// Returns `true` if `token` is one of the two bound tokens.
    #[must_use]
    pub fn contains(&self, token: &Address) -> bool {
        *token == self.datatoken || *token == self.base_token
    }

    /// Resolves an address to its role.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token` is not bound.
    pub fn role_of(&self, token: &Address) -> crate::error::Result<TokenRole> {
        if *token == self.datatoken {
            Ok(TokenRole::Datatoken)
        } else if *token == self.base_token {
            Ok(TokenRole::BaseToken)
        } else {
            Err(AmmError::InvalidToken("token is not bound to the pool"))
        }
    }

    /// Resolves an ordered `(token_in, token_out)` pair to roles.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if either token is unbound or
    /// both name the same token.
    pub fn trade_roles(
        &self,
        token_in: &Address,
        token_out: &Address,
    ) -> crate::error::Result<(TokenRole, TokenRole)> {
        let role_in = self.role_of(token_in)?;
        let role_out = self.role_of(token_out)?;
        if role_in == role_out {
            return Err(AmmError::InvalidToken("cannot trade a token for itself"));
        }
        Ok((role_in, role_out))
    }
}

/// One amount per bound token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenAmounts {
    /// Datatoken amount.
    pub datatoken: Amount,
    /// Base token amount.
    pub base_token: Amount,
}

impl TokenAmounts {
    /// Both amounts zero.
    pub const ZERO: Self = Self {
        datatoken: Amount::ZERO,
        base_token: Amount::ZERO,
    };

    /// Creates a pair of amounts.
    pub const fn new(datatoken: Amount, base_token: Amount) -> Self {
        Self {
            datatoken,
            base_token,
        }
    }

    /// A value with `amount` under `role` and zero on the other side.
    pub const fn only(role: TokenRole, amount: Amount) -> Self {
        match role {
            TokenRole::Datatoken => Self::new(amount, Amount::ZERO),
            TokenRole::BaseToken => Self::new(Amount::ZERO, amount),
        }
    }

    /// Returns the amount under `role`.
    pub const fn get(&self, role: TokenRole) -> Amount {
        match role {
            TokenRole::Datatoken => self.datatoken,
            TokenRole::BaseToken => self.base_token,
        }
    }

    /// Mutable access to the amount under `role`.
    pub fn get_mut(&mut self, role: TokenRole) -> &mut Amount {
        match role {
            TokenRole::Datatoken => &mut self.datatoken,
            TokenRole::BaseToken => &mut self.base_token,
        }
    }

    /// Returns `true` if both amounts are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.datatoken.is_zero() && self.base_token.is_zero()
    }

    /// Adds `amount` under `role`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] on overflow.
    pub fn credit(&mut self, role: TokenRole, amount: Amount) -> crate::error::Result<()> {
        let slot = self.get_mut(role);
        *slot = slot
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("token amount overflow"))?;
        Ok(())
    }

    /// Subtracts `amount` under `role`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the amount under `role` is
    /// smaller than `amount`.
    pub fn debit(&mut self, role: TokenRole, amount: Amount) -> crate::error::Result<()> {
        let slot = self.get_mut(role);
        *slot = slot
            .checked_sub(&amount)
            .ok_or(AmmError::Underflow("token amount underflow"))?;
        Ok(())
    }
}
