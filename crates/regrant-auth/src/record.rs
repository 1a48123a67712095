//! Permissions record and access templates.
//!
//! A [`Permissions`] record ties an owner and a group to an [`Access`]
//! triple. It starts empty and is shaped by templates:
//!
//! | Template | owner | group | all |
//! |----------|-------|-------|-----|
//! | [`anyone`](Permissions::anyone) | allow | allow | allow |
//! | [`owner_and_group`](Permissions::owner_and_group) | allow | allow | deny |
//! | [`only_owner`](Permissions::only_owner) | allow | deny | deny |
//! | [`nobody`](Permissions::nobody) | deny, then allow read | deny | deny |
//!
//! Templates accumulate: each call only touches the bits of its own
//! permission. A template validates its permission before it touches
//! any mask, so a failed call changes nothing.
//!
//! The owner can never lose read access through [`nobody`](Permissions::nobody),
//! [`set`](Permissions::set) or [`apply_default`](Permissions::apply_default).

use crate::{Access, AccessMask, IntoPermission, Permission, PermissionError};
use regrant_types::{GroupId, UserId};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Explicit owner/group/all permissions for [`Permissions::set`].
///
/// The type parameter lets callers pass raw values that are validated by
/// `set` itself. Configuration files use the default `Permission` form.
///
/// # Example
///
/// ```
/// use regrant_auth::{Permission, SetConfig};
///
/// let typed = SetConfig::new(Permission::Write, Permission::Read, Permission::Nothing);
/// let raw = SetConfig::new(13u8, 2u8, 0u8);
/// assert_eq!(typed.owner.bits(), raw.owner);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SetConfig<P = Permission> {
    /// Owner permission.
    pub owner: P,
    /// Group permission.
    pub group: P,
    /// All (everyone else) permission.
    pub all: P,
}

impl<P> SetConfig<P> {
    /// Creates a config from three permissions.
    #[must_use]
    pub fn new(owner: P, group: P, all: P) -> Self {
        Self { owner, group, all }
    }
}

impl<P: IntoPermission> SetConfig<P> {
    /// Validates all three permissions.
    ///
    /// # Errors
    ///
    /// Returns the first [`PermissionError::InvalidPermission`] found,
    /// checking owner, group, then all.
    pub fn validate(self) -> Result<SetConfig, PermissionError> {
        Ok(SetConfig {
            owner: self.owner.into_permission()?,
            group: self.group.into_permission()?,
            all: self.all.into_permission()?,
        })
    }
}

/// Owner, group and access masks for one resource.
///
/// # Example
///
/// ```
/// use regrant_auth::{Permission, Permissions};
///
/// let mut perms = Permissions::new("alice", "staff");
/// perms.anyone(Permission::Read)?;
/// perms.owner_and_group(Permission::Write)?;
///
/// assert_eq!(perms.access().owner().bits(), 15); // read | write
/// assert_eq!(perms.access().group().bits(), 15);
/// assert_eq!(perms.access().all().bits(), 2);    // read
/// # Ok::<(), regrant_auth::PermissionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// Owning user.
    pub owner: UserId,
    /// Owning group.
    pub group: GroupId,
    access: Access,
}

impl Permissions {
    /// Creates a record with all masks empty.
    #[must_use]
    pub fn new(owner: impl Into<UserId>, group: impl Into<GroupId>) -> Self {
        Self {
            owner: owner.into(),
            group: group.into(),
            access: Access::default(),
        }
    }

    /// Creates a record initialised with the baseline policy.
    ///
    /// See [`apply_default`](Self::apply_default).
    #[must_use]
    pub fn with_default(owner: impl Into<UserId>, group: impl Into<GroupId>) -> Self {
        let mut perms = Self::new(owner, group);
        perms.apply_default();
        perms
    }

    /// Returns the access triple.
    #[must_use]
    pub fn access(&self) -> &Access {
        &self.access
    }

    /// Grants `perm` to owner, group and all.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if `perm` is not
    /// canonical; no mask is changed.
    pub fn anyone(&mut self, perm: impl IntoPermission) -> Result<(), PermissionError> {
        let perm = perm.into_permission()?;
        self.access.owner.grant(perm);
        self.access.group.grant(perm);
        self.access.all.grant(perm);
        trace!(template = "anyone", %perm, access = %self.access, "template applied");
        Ok(())
    }

    /// Grants `perm` to owner and group and revokes it from all.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if `perm` is not
    /// canonical; no mask is changed.
    pub fn owner_and_group(&mut self, perm: impl IntoPermission) -> Result<(), PermissionError> {
        let perm = perm.into_permission()?;
        self.access.owner.grant(perm);
        self.access.group.grant(perm);
        self.access.all.revoke(perm);
        trace!(template = "owner_and_group", %perm, access = %self.access, "template applied");
        Ok(())
    }

    /// Grants `perm` to owner and revokes it from group and all.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if `perm` is not
    /// canonical; no mask is changed.
    pub fn only_owner(&mut self, perm: impl IntoPermission) -> Result<(), PermissionError> {
        let perm = perm.into_permission()?;
        self.access.owner.grant(perm);
        self.access.group.revoke(perm);
        self.access.all.revoke(perm);
        trace!(template = "only_owner", %perm, access = %self.access, "template applied");
        Ok(())
    }

    /// Revokes `perm` from every class, keeping read for the owner.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if `perm` is not
    /// canonical; no mask is changed.
    pub fn nobody(&mut self, perm: impl IntoPermission) -> Result<(), PermissionError> {
        let perm = perm.into_permission()?;
        self.access.owner.revoke(perm);
        self.access.owner.grant(Permission::Read);
        self.access.group.revoke(perm);
        self.access.all.revoke(perm);
        trace!(template = "nobody", %perm, access = %self.access, "template applied");
        Ok(())
    }

    /// Applies the baseline policy on top of the current masks.
    ///
    /// Equivalent to `anyone(Read)` followed by
    /// `owner_and_group(Write | Execute)`. On an empty record this leaves
    /// owner = group = `crud|execute` and all = `read`.
    pub fn apply_default(&mut self) {
        self.access.owner.grant(Permission::Read);
        self.access.group.grant(Permission::Read);
        self.access.all.grant(Permission::Read);

        self.access.owner.grant(Permission::WriteExecute);
        self.access.group.grant(Permission::WriteExecute);
        self.access.all.revoke(Permission::WriteExecute);
        trace!(template = "default", access = %self.access, "template applied");
    }

    /// Overwrites all three masks, then grants read to the owner.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if any of the three
    /// permissions is not canonical; no mask is changed.
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::{Permission, Permissions, SetConfig};
    ///
    /// let mut perms = Permissions::with_default("alice", "staff");
    /// perms.set(SetConfig::new(Permission::Write, Permission::Read, Permission::Nothing))?;
    ///
    /// assert_eq!(perms.access().owner().bits(), 15); // write + forced read
    /// assert_eq!(perms.access().group().bits(), 2);
    /// assert!(perms.access().all().is_empty());
    ///
    /// assert!(perms.set(SetConfig::new(13u8, 2u8, 3u8)).is_err());
    /// # Ok::<(), regrant_auth::PermissionError>(())
    /// ```
    pub fn set<P: IntoPermission>(&mut self, config: SetConfig<P>) -> Result<(), PermissionError> {
        let config = config.validate()?;
        self.access.owner = AccessMask::from(config.owner);
        self.access.owner.grant(Permission::Read);
        self.access.group = AccessMask::from(config.group);
        self.access.all = AccessMask::from(config.all);
        trace!(access = %self.access, "access set");
        Ok(())
    }
}
