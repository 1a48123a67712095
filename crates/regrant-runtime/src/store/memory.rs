//! In-memory permission store.

use super::{apply_update, PermissionStore, StoreError};
use parking_lot::RwLock;
use regrant_auth::{PermissionError, Permissions};
use std::collections::HashMap;

/// Thread-safe, in-memory record store.
///
/// Lookups take the read lock and run concurrently; mutations take the
/// write lock.
///
/// # Example
///
/// ```
/// use regrant_auth::{Permission, Permissions};
/// use regrant_runtime::store::{MemoryStore, PermissionStore};
///
/// let store = MemoryStore::new();
/// store.create("doc", Permissions::with_default("alice", "staff"))?;
///
/// store.update("doc", |p| p.only_owner(Permission::Delete))?;
/// assert_eq!(store.get("doc").map(|p| p.access().group().bits()), Some(23));
/// # Ok::<(), regrant_runtime::store::StoreError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Permissions>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl PermissionStore for MemoryStore {
    fn get(&self, resource: &str) -> Option<Permissions> {
        self.records.read().get(resource).cloned()
    }

    fn put(&self, resource: &str, perms: Permissions) -> Result<Option<Permissions>, StoreError> {
        Ok(self.records.write().insert(resource.to_string(), perms))
    }

    fn create(&self, resource: &str, perms: Permissions) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records.contains_key(resource) {
            return Err(StoreError::already_exists(resource));
        }
        records.insert(resource.to_string(), perms);
        Ok(())
    }

    fn remove(&self, resource: &str) -> Result<Option<Permissions>, StoreError> {
        Ok(self.records.write().remove(resource))
    }

    fn update<F>(&self, resource: &str, f: F) -> Result<Permissions, StoreError>
    where
        F: FnOnce(&mut Permissions) -> Result<(), PermissionError>,
    {
        let mut records = self.records.write();
        apply_update(resource, records.get_mut(resource), f)
    }

    fn resources(&self) -> Vec<String> {
        let mut names: Vec<_> = self.records.read().keys().cloned().collect();
        names.sort();
        names
    }
}
