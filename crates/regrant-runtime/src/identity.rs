//! Identity lookup.
//!
//! The authorizer only knows user ids. An [`IdentityProvider`] turns an
//! id into the [`Identity`] snapshot the resolver needs.

use parking_lot::RwLock;
use regrant_types::{Identity, UserId};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves user ids to identities.
pub trait IdentityProvider: Send + Sync {
    /// Returns the identity for `id`, or `None` if it is unknown.
    fn identity(&self, id: &UserId) -> Option<Identity>;
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    fn identity(&self, id: &UserId) -> Option<Identity> {
        (**self).identity(id)
    }
}

/// A static identity table.
///
/// Useful where identities come from outside (a token, a directory
/// service) and are registered up front.
///
/// # Example
///
/// ```
/// use regrant_runtime::{Directory, IdentityProvider};
/// use regrant_types::{Identity, UserId};
///
/// let directory = Directory::new();
/// directory.insert(Identity::new("bob").with_group("staff"));
///
/// assert!(directory.identity(&UserId::new("bob")).is_some());
/// assert!(directory.identity(&UserId::new("eve")).is_none());
/// ```
#[derive(Debug, Default)]
pub struct Directory {
    identities: RwLock<HashMap<UserId, Identity>>,
}

impl Directory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces an identity.
    pub fn insert(&self, identity: Identity) -> Option<Identity> {
        self.identities.write().insert(identity.id.clone(), identity)
    }

    /// Removes an identity.
    pub fn remove(&self, id: &UserId) -> Option<Identity> {
        self.identities.write().remove(id)
    }
}

impl FromIterator<Identity> for Directory {
    fn from_iter<T: IntoIterator<Item = Identity>>(iter: T) -> Self {
        let directory = Self::new();
        for identity in iter {
            directory.insert(identity);
        }
        directory
    }
}

impl IdentityProvider for Directory {
    fn identity(&self, id: &UserId) -> Option<Identity> {
        self.identities.read().get(id).cloned()
    }
}
