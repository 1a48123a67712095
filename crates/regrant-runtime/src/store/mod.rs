//! Permission record persistence.
//!
//! A [`PermissionStore`] maps resource names to [`Permissions`] records.
//!
//! ```text
//! PermissionStore (trait)
//!     ├── MemoryStore   RwLock<HashMap>, process lifetime
//!     └── FileStore     RwLock<BTreeMap> + pretty JSON file
//! ```
//!
//! Records are not internally synchronized. [`PermissionStore::update`]
//! runs a whole read-modify-write sequence under the store's write lock,
//! which is the mutual exclusion template sequences need when a record
//! is shared. A failing closure leaves the stored record untouched.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use regrant_auth::{PermissionError, Permissions};
use regrant_types::ErrorCode;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record for the resource.
    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    /// A record already exists for the resource.
    #[error("resource already exists: {resource}")]
    AlreadyExists { resource: String },

    /// The update closure rejected the change.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Reading or writing the backing file failed.
    #[error("store I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a valid record map.
    #[error("failed to parse store file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be encoded.
    #[error("failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource: resource.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "STORE_NOT_FOUND",
            Self::AlreadyExists { .. } => "STORE_ALREADY_EXISTS",
            Self::Permission(_) => "STORE_PERMISSION",
            Self::Io { .. } => "STORE_IO",
            Self::Parse { .. } => "STORE_PARSE",
            Self::Serialize(_) => "STORE_SERIALIZE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Storage for permission records, keyed by resource name.
///
/// Implementations must be safe to share between threads. Every mutating
/// method either fully applies or leaves the store unchanged.
pub trait PermissionStore: Send + Sync + std::fmt::Debug {
    /// Returns a copy of the record for `resource`.
    fn get(&self, resource: &str) -> Option<Permissions>;

    /// Inserts or replaces a record, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    fn put(&self, resource: &str, perms: Permissions) -> Result<Option<Permissions>, StoreError>;

    /// Inserts a record only if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if `resource` is taken.
    fn create(&self, resource: &str, perms: Permissions) -> Result<(), StoreError>;

    /// Removes a record, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the change cannot be persisted.
    fn remove(&self, resource: &str) -> Result<Option<Permissions>, StoreError>;

    /// Runs `f` on the record under the write lock and stores the result.
    ///
    /// `f` works on a draft; if it fails, nothing is stored.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if there is no record
    /// - [`StoreError::Permission`] if `f` fails
    /// - [`StoreError::Io`] if the change cannot be persisted
    fn update<F>(&self, resource: &str, f: F) -> Result<Permissions, StoreError>
    where
        F: FnOnce(&mut Permissions) -> Result<(), PermissionError>;

    /// Returns all resource names, sorted.
    fn resources(&self) -> Vec<String>;
}

impl<T: PermissionStore> PermissionStore for Arc<T> {
    fn get(&self, resource: &str) -> Option<Permissions> {
        (**self).get(resource)
    }

    fn put(&self, resource: &str, perms: Permissions) -> Result<Option<Permissions>, StoreError> {
        (**self).put(resource, perms)
    }

    fn create(&self, resource: &str, perms: Permissions) -> Result<(), StoreError> {
        (**self).create(resource, perms)
    }

    fn remove(&self, resource: &str) -> Result<Option<Permissions>, StoreError> {
        (**self).remove(resource)
    }

    fn update<F>(&self, resource: &str, f: F) -> Result<Permissions, StoreError>
    where
        F: FnOnce(&mut Permissions) -> Result<(), PermissionError>,
    {
        (**self).update(resource, f)
    }

    fn resources(&self) -> Vec<String> {
        (**self).resources()
    }
}

/// Applies `f` to a copy of `record` and commits it only on success.
pub(crate) fn apply_update<F>(
    resource: &str,
    record: Option<&mut Permissions>,
    f: F,
) -> Result<Permissions, StoreError>
where
    F: FnOnce(&mut Permissions) -> Result<(), PermissionError>,
{
    let record = record.ok_or_else(|| StoreError::not_found(resource))?;
    let mut draft = record.clone();
    f(&mut draft)?;
    *record = draft.clone();
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrant_auth::Permission;
    use regrant_types::assert_error_code;

    #[test]
    fn apply_update_commits_on_success() {
        let mut record = Permissions::new("alice", "staff");
        let out = apply_update("doc", Some(&mut record), |p| p.anyone(Permission::Read))
            .expect("update");
        assert_eq!(out, record);
        assert_eq!(record.access().all().bits(), 2);
    }

    #[test]
    fn apply_update_discards_on_failure() {
        let mut record = Permissions::with_default("alice", "staff");
        let before = record.clone();
        let err = apply_update("doc", Some(&mut record), |p| {
            p.only_owner(Permission::Delete)?;
            p.anyone(20u8)
        })
        .expect_err("second step fails");

        assert!(matches!(
            err,
            StoreError::Permission(PermissionError::InvalidPermission { bits: 20 })
        ));
        assert_eq!(record, before, "first step must not leak");
    }

    #[test]
    fn apply_update_missing_record() {
        let err = apply_update("doc", None, |_| Ok(())).expect_err("missing");
        assert!(matches!(err, StoreError::NotFound { ref resource } if resource == "doc"));
        assert_error_code(&err, "STORE_");
    }
}
