//! Access masks.
//!
//! An [`AccessMask`] is the set of actions granted to one access class.
//! It changes only through [`allow`](AccessMask::allow) and
//! [`deny`](AccessMask::deny), both of which validate their argument, so
//! the mask is always a union of canonical permissions. The union itself
//! need not be canonical: allowing `Create` and then `Read` leaves
//! `create | read` in the mask.
//!
//! # Semantics
//!
//! ```text
//! test(mask, p)  = mask != 0 && mask & p == p
//! allow(mask, p) = mask | p
//! deny(mask, p)  = mask ^ (mask & p)      (no-op when nothing overlaps)
//! ```

use crate::{Action, IntoPermission, Permission, PermissionError};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Actions granted to one access class.
///
/// # Example
///
/// ```
/// use regrant_auth::{AccessMask, Permission};
///
/// let mut mask = AccessMask::new();
/// mask.allow(Permission::Crud)?;
/// assert!(mask.test(Permission::Read));
///
/// mask.deny(Permission::Write)?;
/// assert_eq!(mask, AccessMask::from(Permission::Read));
///
/// // Denying something that is not granted is not an error.
/// mask.deny(Permission::Execute)?;
/// assert_eq!(mask.bits(), 2);
/// # Ok::<(), regrant_auth::PermissionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AccessMask(Action);

impl AccessMask {
    /// The empty mask.
    pub const EMPTY: Self = Self(Action::empty());

    /// Creates an empty mask.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Initializes a mask from a raw stored value.
    ///
    /// Only the range is checked: any combination of the five action bits
    /// is accepted, because a mask built by successive `allow` calls can
    /// hold non-canonical unions.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InitRange`] if `value` has bits outside
    /// the five action flags.
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::{AccessMask, PermissionError};
    ///
    /// assert_eq!(AccessMask::from_raw(3)?.bits(), 3);
    /// assert_eq!(AccessMask::from_raw(32), Err(PermissionError::InitRange { value: 32 }));
    /// # Ok::<(), PermissionError>(())
    /// ```
    pub fn from_raw(value: u32) -> Result<Self, PermissionError> {
        u8::try_from(value)
            .ok()
            .and_then(Action::from_bits)
            .map(Self)
            .ok_or(PermissionError::InitRange { value })
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0.bits()
    }

    /// Returns the granted actions.
    #[must_use]
    pub const fn actions(self) -> Action {
        self.0
    }

    /// Returns `true` if nothing is granted.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every requested action is granted.
    ///
    /// The argument is not validated. An empty mask denies everything,
    /// including an empty request.
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::{AccessMask, Permission};
    ///
    /// let mask = AccessMask::from(Permission::Crud);
    /// assert!(mask.test(Permission::Write));
    /// assert!(!mask.test(Permission::ReadExecute)); // partial overlap
    /// assert!(!AccessMask::EMPTY.test(Permission::Nothing));
    /// ```
    #[must_use]
    pub fn test(self, perm: impl Into<Action>) -> bool {
        let perm = perm.into();
        !self.0.is_empty() && self.0.contains(perm)
    }

    /// Grants `perm`.
    ///
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if `perm` is not
    /// canonical. The mask is unchanged.
    pub fn allow(&mut self, perm: impl IntoPermission) -> Result<(), PermissionError> {
        let perm = perm.into_permission()?;
        self.grant(perm);
        Ok(())
    }

    /// Revokes `perm`.
    ///
    /// Clears exactly the requested bits that are currently set. Denying
    /// a permission that is not granted succeeds and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if `perm` is not
    /// canonical. The mask is unchanged.
    pub fn deny(&mut self, perm: impl IntoPermission) -> Result<(), PermissionError> {
        let perm = perm.into_permission()?;
        self.revoke(perm);
        Ok(())
    }

    pub(crate) fn grant(&mut self, perm: Permission) {
        let before = self.0;
        self.0 |= perm.actions();
        trace!(%perm, before = before.bits(), after = self.0.bits(), "mask allow");
    }

    pub(crate) fn revoke(&mut self, perm: Permission) {
        let overlap = self.0 & perm.actions();
        if self.0.is_empty() || overlap.is_empty() {
            return;
        }
        let before = self.0;
        self.0 ^= overlap;
        trace!(%perm, before = before.bits(), after = self.0.bits(), "mask deny");
    }
}

impl From<Permission> for AccessMask {
    fn from(perm: Permission) -> Self {
        Self(perm.actions())
    }
}

impl TryFrom<u32> for AccessMask {
    type Error = PermissionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}

impl From<AccessMask> for u32 {
    fn from(mask: AccessMask) -> Self {
        u32::from(mask.bits())
    }
}

impl std::fmt::Display for AccessMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
