//! Caller roles and context.

use core::fmt;

use super::Address;
use crate::error::AmmError;

/// A privileged role a caller may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// May mutate setup state of an unfinalized pool.
    Manager,
    /// May create datatoken pools.
    DeployErc20,
    /// May update asset metadata.
    UpdateMetadata,
    /// May write to the asset's key/value store.
    Store,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manager => write!(f, "manager"),
            Self::DeployErc20 => write!(f, "deploy-erc20"),
            Self::UpdateMetadata => write!(f, "update-metadata"),
            Self::Store => write!(f, "store"),
        }
    }
}

/// The set of roles a caller holds.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::{PermissionSet, Role};
///
/// let perms = PermissionSet::NONE.with(Role::DeployErc20);
/// assert!(perms.require(Role::DeployErc20).is_ok());
/// assert!(perms.require(Role::Manager).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermissionSet {
    /// Holds [`Role::Manager`].
    pub manager: bool,
    /// Holds [`Role::DeployErc20`].
    pub deploy_erc20: bool,
    /// Holds [`Role::UpdateMetadata`].
    pub update_metadata: bool,
    /// Holds [`Role::Store`].
    pub store: bool,
}

impl PermissionSet {
    /// No roles.
    pub const NONE: Self = Self {
        manager: false,
        deploy_erc20: false,
        update_metadata: false,
        store: false,
    };

    /// Every role.
    pub const ALL: Self = Self {
        manager: true,
        deploy_erc20: true,
        update_metadata: true,
        store: true,
    };

    /// Returns a copy with `role` granted.
    #[must_use]
    pub const fn with(mut self, role: Role) -> Self {
        match role {
            Role::Manager => self.manager = true,
            Role::DeployErc20 => self.deploy_erc20 = true,
            Role::UpdateMetadata => self.update_metadata = true,
            Role::Store => self.store = true,
        }
        self
    }

    /// Returns `true` if `role` is held.
    #[must_use]
    pub const fn has(&self, role: Role) -> bool {
        match role {
            Role::Manager => self.manager,
            Role::DeployErc20 => self.deploy_erc20,
            Role::UpdateMetadata => self.update_metadata,
            Role::Store => self.store,
        }
    }

    /// Fails unless `role` is held.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Unauthorized`] naming the missing role.
    pub const fn require(&self, role: Role) -> crate::error::Result<()> {
        if self.has(role) {
            return Ok(());
        }
        Err(AmmError::Unauthorized(match role {
            Role::Manager => "manager role required",
            Role::DeployErc20 => "deploy-erc20 role required",
            Role::UpdateMetadata => "update-metadata role required",
            Role::Store => "store role required",
        }))
    }
}

/// Who is calling, and with which roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallerContext {
    /// Caller account.
    pub address: Address,
    /// Roles held by the caller.
    pub permissions: PermissionSet,
}

impl CallerContext {
    /// A caller holding no roles.
    #[must_use]
    pub const fn anonymous(address: Address) -> Self {
        Self {
            address,
            permissions: PermissionSet::NONE,
        }
    }

    /// A caller with the given roles.
    #[must_use]
    pub const fn new(address: Address, permissions: PermissionSet) -> Self {
        Self {
            address,
            permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_holds_nothing() {
        for role in [Role::Manager, Role::DeployErc20, Role::UpdateMetadata, Role::Store] {
            assert!(!PermissionSet::NONE.has(role));
            assert!(PermissionSet::ALL.has(role));
        }
    }

    #[test]
    fn with_grants_single_role() {
        let p = PermissionSet::NONE.with(Role::Store);
        assert!(p.store);
        assert!(!p.manager);
    }

    #[test]
    fn require_reports_missing_role() {
        assert_eq!(
            PermissionSet::NONE.require(Role::Manager),
            Err(AmmError::Unauthorized("manager role required"))
        );
    }

    #[test]
    fn anonymous_caller() {
        let c = CallerContext::anonymous(Address::repeat_byte(7));
        assert_eq!(c.permissions, PermissionSet::NONE);
    }
}
