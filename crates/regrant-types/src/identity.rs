//! Identity snapshot types.
//!
//! An [`Identity`] is the read-only view of a user that the resolver
//! needs: who they are and which groups they belong to. Where the
//! identity came from (a user store, a token, a test fixture) is not
//! this crate's concern.
//!
//! The [`Subject`] trait is the seam: anything that can answer "what is
//! your id" and "are you a member of this group" can be authorized.

use crate::{GroupId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Something that can be resolved to an access class.
///
/// # Example
///
/// ```
/// use regrant_types::{GroupId, Identity, Subject, UserId};
///
/// let alice = Identity::new("alice").with_group("staff");
///
/// assert_eq!(alice.subject_id(), &UserId::new("alice"));
/// assert!(alice.is_member_of(&GroupId::new("staff")));
/// assert!(!alice.is_member_of(&GroupId::new("admin")));
/// ```
pub trait Subject {
    /// Returns the stable primary identifier.
    fn subject_id(&self) -> &UserId;

    /// Returns `true` if the subject belongs to `group`.
    fn is_member_of(&self, group: &GroupId) -> bool;
}

/// A user identifier plus its group memberships.
///
/// Groups are kept in a sorted set, so duplicates collapse and the
/// serialized form is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Primary identifier.
    pub id: UserId,
    /// Group memberships.
    #[serde(default)]
    pub groups: BTreeSet<GroupId>,
}

impl Identity {
    /// Creates an identity with no group memberships.
    #[must_use]
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            groups: BTreeSet::new(),
        }
    }

    /// Adds a group membership.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<GroupId>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Adds several group memberships.
    #[must_use]
    pub fn with_groups<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupId>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }
}

impl Subject for Identity {
    fn subject_id(&self) -> &UserId {
        &self.id
    }

    fn is_member_of(&self, group: &GroupId) -> bool {
        self.groups.contains(group)
    }
}

impl<S: Subject + ?Sized> Subject for &S {
    fn subject_id(&self) -> &UserId {
        (**self).subject_id()
    }

    fn is_member_of(&self, group: &GroupId) -> bool {
        (**self).is_member_of(group)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.groups.is_empty() {
            let groups: Vec<&str> = self.groups.iter().map(GroupId::as_str).collect();
            write!(f, " [{}]", groups.join(", "))?;
        }
        Ok(())
    }
}
