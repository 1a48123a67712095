//! JSON file-backed permission store.
//!
//! The whole map is kept in memory and rewritten on every successful
//! mutation. Writes go to a sibling temp file that is then renamed over
//! the target, so a crash mid-write leaves the previous file intact.
//!
//! # File Format
//!
//! ```json
//! {
//!   "articles/42": {
//!     "owner": "alice",
//!     "group": "editors",
//!     "access": { "owner": 31, "group": 31, "all": 2 }
//!   }
//! }
//! ```

use super::{apply_update, PermissionStore, StoreError};
use crate::config::StoreConfig;
use parking_lot::RwLock;
use regrant_auth::{PermissionError, Permissions};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type Records = BTreeMap<String, Permissions>;

/// Record store persisted as pretty-printed JSON.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: RwLock<Records>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file exists but cannot be read
    /// - [`StoreError::Parse`] if it is not a record map, including masks
    ///   outside the raw range
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
            let records: Records =
                serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), records = records.len(), "Loaded permission store");
            records
        } else {
            Records::new()
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Opens the store named by `[store] path`.
    ///
    /// Returns `Ok(None)` when no path is configured, leaving the caller
    /// to fall back to a [`MemoryStore`](super::MemoryStore).
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn from_config(config: &StoreConfig) -> Result<Option<Self>, StoreError> {
        config
            .path
            .as_ref()
            .map(|path| Self::open(path.clone()))
            .transpose()
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &Records) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(records).map_err(StoreError::Serialize)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        info!(path = %self.path.display(), records = records.len(), "Persisted permission store");
        Ok(())
    }

    /// Persists `records`, restoring `resource` to `previous` on failure.
    fn commit(
        &self,
        records: &mut Records,
        resource: &str,
        previous: Option<Permissions>,
    ) -> Result<(), StoreError> {
        if let Err(e) = self.persist(records) {
            match previous {
                Some(p) => records.insert(resource.to_string(), p),
                None => records.remove(resource),
            };
            return Err(e);
        }
        Ok(())
    }
}

impl PermissionStore for FileStore {
    fn get(&self, resource: &str) -> Option<Permissions> {
        self.records.read().get(resource).cloned()
    }

    fn put(&self, resource: &str, perms: Permissions) -> Result<Option<Permissions>, StoreError> {
        let mut records = self.records.write();
        let previous = records.insert(resource.to_string(), perms);
        self.commit(&mut records, resource, previous.clone())?;
        Ok(previous)
    }

    fn create(&self, resource: &str, perms: Permissions) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records.contains_key(resource) {
            return Err(StoreError::already_exists(resource));
        }
        records.insert(resource.to_string(), perms);
        self.commit(&mut records, resource, None)
    }

    fn remove(&self, resource: &str) -> Result<Option<Permissions>, StoreError> {
        let mut records = self.records.write();
        let Some(previous) = records.remove(resource) else {
            return Ok(None);
        };
        self.commit(&mut records, resource, Some(previous.clone()))?;
        Ok(Some(previous))
    }

    fn update<F>(&self, resource: &str, f: F) -> Result<Permissions, StoreError>
    where
        F: FnOnce(&mut Permissions) -> Result<(), PermissionError>,
    {
        let mut records = self.records.write();
        let previous = records.get(resource).cloned();
        let updated = apply_update(resource, records.get_mut(resource), f)?;
        self.commit(&mut records, resource, previous)?;
        Ok(updated)
    }

    fn resources(&self) -> Vec<String> {
        self.records.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrant_auth::Permission;
    use regrant_types::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path().join("perms.json")).unwrap();
        assert!(store.resources().is_empty());
        assert!(!store.path().exists(), "open must not create the file");
    }

    #[test]
    fn from_config_opens_configured_path() {
        let temp = TempDir::new().unwrap();
        assert!(FileStore::from_config(&StoreConfig::default())
            .unwrap()
            .is_none());

        let config = StoreConfig {
            path: Some(temp.path().join("perms.json")),
        };
        let store = FileStore::from_config(&config).unwrap().unwrap();
        assert_eq!(store.path(), temp.path().join("perms.json"));
    }

    #[test]
    fn mutations_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state").join("perms.json");

        {
            let store = FileStore::open(&path).unwrap();
            store
                .create("doc", Permissions::with_default("alice", "staff"))
                .unwrap();
            store
                .update("doc", |p| p.only_owner(Permission::Delete))
                .unwrap();
            store
                .put("other", Permissions::new("bob", "ops"))
                .unwrap();
            store.remove("other").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.resources(), vec!["doc"]);
        let doc = store.get("doc").unwrap();
        assert_eq!(doc.access().owner().bits(), 31);
        assert_eq!(doc.access().group().bits(), 23);
        assert_eq!(doc.access().all().bits(), 2);
    }

    #[test]
    fn file_uses_numeric_masks() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("perms.json");
        let store = FileStore::open(&path).unwrap();
        store
            .put("doc", Permissions::with_default("alice", "staff"))
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "doc": {
                    "owner": "alice",
                    "group": "staff",
                    "access": { "owner": 31, "group": 31, "all": 2 }
                }
            })
        );
    }

    #[test]
    fn out_of_range_mask_fails_to_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("perms.json");
        std::fs::write(
            &path,
            r#"{"doc":{"owner":"a","group":"g","access":{"owner":32,"group":0,"all":0}}}"#,
        )
        .unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert_eq!(err.code(), "STORE_PARSE");
        assert!(err.to_string().contains("perms.json"));
    }

    #[test]
    fn non_canonical_mask_loads() {
        // Masks may hold unions such as create|read; only the range is checked.
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("perms.json");
        std::fs::write(
            &path,
            r#"{"doc":{"owner":"a","group":"g","access":{"owner":3,"group":0,"all":0}}}"#,
        )
        .unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("doc").unwrap().access().owner().bits(), 3);
    }

    #[test]
    fn failed_update_does_not_touch_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("perms.json");
        let store = FileStore::open(&path).unwrap();
        store
            .create("doc", Permissions::with_default("alice", "staff"))
            .unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(store.update("doc", |p| p.anyone(20u8)).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
