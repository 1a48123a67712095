//! Authorization resolver.
//!
//! Maps an identity to an [`AccessClass`] for one record and tests the
//! requested permission against that class's mask. First match wins:
//!
//! ```text
//! identity.id == record.owner         → owner mask
//! identity is member of record.group  → group mask
//! otherwise                           → all mask
//! ```
//!
//! Ownership beats group membership. There is no fallthrough: an owner
//! denied by the owner mask is denied, even if the group or all mask
//! would have granted the request.

use crate::{AccessClass, IntoPermission, PermissionError, Permissions};
use regrant_types::Subject;
use tracing::debug;

impl Permissions {
    /// Returns the access class `subject` falls into for this record.
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::{AccessClass, Permissions};
    /// use regrant_types::Identity;
    ///
    /// let perms = Permissions::new("alice", "staff");
    ///
    /// let alice = Identity::new("alice").with_group("staff");
    /// let bob = Identity::new("bob").with_group("staff");
    /// let carol = Identity::new("carol");
    ///
    /// assert_eq!(perms.access_class(&alice), AccessClass::Owner);
    /// assert_eq!(perms.access_class(&bob), AccessClass::Group);
    /// assert_eq!(perms.access_class(&carol), AccessClass::All);
    /// ```
    #[must_use]
    pub fn access_class<S: Subject + ?Sized>(&self, subject: &S) -> AccessClass {
        if *subject.subject_id() == self.owner {
            AccessClass::Owner
        } else if subject.is_member_of(&self.group) {
            AccessClass::Group
        } else {
            AccessClass::All
        }
    }

    /// Decides whether `subject` may perform `perm` on this resource.
    ///
    /// Returns `Ok(false)` for a legitimate denial. Partial overlap between
    /// the request and the mask is a denial.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::IdentityNotInitialized`] if `subject` is `None`
    /// - [`PermissionError::InvalidPermission`] if `perm` is not canonical
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::{Permission, PermissionError, Permissions};
    /// use regrant_types::Identity;
    ///
    /// let perms = Permissions::with_default("alice", "staff");
    /// let carol = Identity::new("carol");
    ///
    /// assert_eq!(perms.is_granted(Some(&carol), Permission::Read), Ok(true));
    /// assert_eq!(perms.is_granted(Some(&carol), Permission::Write), Ok(false));
    /// assert_eq!(
    ///     perms.is_granted(None::<&Identity>, Permission::Read),
    ///     Err(PermissionError::IdentityNotInitialized)
    /// );
    /// ```
    pub fn is_granted<S: Subject + ?Sized>(
        &self,
        subject: Option<&S>,
        perm: impl IntoPermission,
    ) -> Result<bool, PermissionError> {
        let subject = subject.ok_or(PermissionError::IdentityNotInitialized)?;
        let perm = perm.into_permission()?;

        let class = self.access_class(subject);
        let mask = self.access().mask(class);
        let granted = mask.test(perm);

        debug!(
            subject = %subject.subject_id(),
            owner = %self.owner,
            group = %self.group,
            %class,
            %perm,
            mask = mask.bits(),
            granted,
            "permission resolved"
        );
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Permission, PermissionError, Permissions, SetConfig};
    use regrant_types::Identity;

    fn staff_record(owner: Permission, group: Permission, all: Permission) -> Permissions {
        let mut p = Permissions::new("alice", "staff");
        p.set(SetConfig::new(owner, group, all)).expect("set");
        p
    }

    #[test]
    fn owner_branch_grants_read() {
        let p = staff_record(Permission::Crud, Permission::Read, Permission::Nothing);
        let alice = Identity::new("alice").with_group("staff");
        assert_eq!(p.is_granted(Some(&alice), Permission::Read), Ok(true));
    }

    #[test]
    fn group_branch_denies_write() {
        let p = staff_record(Permission::Crud, Permission::Read, Permission::Nothing);
        let bob = Identity::new("bob").with_group("staff");
        assert_eq!(p.is_granted(Some(&bob), Permission::Write), Ok(false));
        assert_eq!(p.is_granted(Some(&bob), Permission::Read), Ok(true));
    }

    #[test]
    fn all_branch_for_strangers() {
        let p = staff_record(Permission::Crud, Permission::Nothing, Permission::Read);
        let carol = Identity::new("carol");
        assert_eq!(p.is_granted(Some(&carol), Permission::Read), Ok(true));
        assert_eq!(p.is_granted(Some(&carol), Permission::Create), Ok(false));
    }

    #[test]
    fn ownership_beats_group_membership() {
        // Group may execute, owner may not.
        let p = staff_record(Permission::Read, Permission::ReadExecute, Permission::Nothing);
        let alice = Identity::new("alice").with_group("staff");
        assert_eq!(p.is_granted(Some(&alice), Permission::Execute), Ok(false));
    }

    #[test]
    fn no_fallthrough_to_all() {
        let p = staff_record(Permission::Read, Permission::Nothing, Permission::CrudExecute);
        let bob = Identity::new("bob").with_group("staff");
        assert_eq!(p.is_granted(Some(&bob), Permission::Read), Ok(false));
    }

    #[test]
    fn partial_overlap_is_denied() {
        let p = staff_record(Permission::Crud, Permission::Read, Permission::Nothing);
        let alice = Identity::new("alice");
        assert_eq!(p.is_granted(Some(&alice), Permission::CrudExecute), Ok(false));
    }

    #[test]
    fn empty_mask_denies_nothing_request() {
        let p = staff_record(Permission::Read, Permission::Nothing, Permission::Nothing);
        let carol = Identity::new("carol");
        assert_eq!(p.is_granted(Some(&carol), Permission::Nothing), Ok(false));
    }

    #[test]
    fn missing_identity_is_an_error() {
        let p = Permissions::with_default("alice", "staff");
        assert_eq!(
            p.is_granted(None::<&Identity>, Permission::Read),
            Err(PermissionError::IdentityNotInitialized)
        );
    }

    #[test]
    fn missing_identity_checked_before_permission() {
        let p = Permissions::with_default("alice", "staff");
        assert_eq!(
            p.is_granted(None::<&Identity>, 20u8),
            Err(PermissionError::IdentityNotInitialized)
        );
    }

    #[test]
    fn non_canonical_request_is_an_error() {
        let p = Permissions::with_default("alice", "staff");
        let before = p.clone();
        let alice = Identity::new("alice");
        assert_eq!(
            p.is_granted(Some(&alice), Permission::Update | Permission::Execute),
            Err(PermissionError::InvalidPermission { bits: 20 })
        );
        assert_eq!(p, before);
    }

    #[test]
    fn works_through_trait_object() {
        use regrant_types::Subject;

        let p = Permissions::with_default("alice", "staff");
        let bob = Identity::new("bob").with_group("staff");
        let subject: &dyn Subject = &bob;
        assert_eq!(p.is_granted(Some(subject), Permission::Delete), Ok(true));
    }
}
