//! Owner/group/all permissions with semantic actions.
//!
//! A Unix-style permission model where each of the three access classes
//! holds a mask of CRUD + execute actions instead of rwx bits.
//!
//! # Model
//!
//! ```text
//! Permissions { owner, group, access: Access { owner, group, all } }
//!                                              └── AccessMask (Action bits)
//!
//! is_granted(record, identity, perm):
//!     class = owner | group | all      (first match wins)
//!     granted = mask(class) ⊇ perm     (exact containment)
//! ```
//!
//! | Type | Role |
//! |------|------|
//! | [`Action`] | Raw bit flags (unvalidated) |
//! | [`Permission`] | One of the eleven canonical combinations |
//! | [`AccessMask`] | Granted actions for one class |
//! | [`Access`] | Owner/group/all masks |
//! | [`Permissions`] | Owner, group, access; templates and resolver |
//! | [`Rule`] | Named permission bundle |
//!
//! # Validation
//!
//! Every entry point that takes a permission accepts `impl`
//! [`IntoPermission`] and rejects non-canonical values with
//! [`PermissionError::InvalidPermission`] before touching any state.
//! Raw mask loading is range-checked only ([`PermissionError::InitRange`]).
//!
//! # Concurrency
//!
//! Nothing here locks. A record shared between threads needs an
//! external lock around template sequences; `is_granted` takes `&self`.
//!
//! # Example
//!
//! ```
//! use regrant_auth::{Permission, Permissions};
//! use regrant_types::Identity;
//!
//! let mut doc = Permissions::with_default("alice", "editors");
//! doc.only_owner(Permission::Delete)?;
//!
//! let bob = Identity::new("bob").with_group("editors");
//! assert!(doc.is_granted(Some(&bob), Permission::Update)?);
//! assert!(!doc.is_granted(Some(&bob), Permission::Delete)?);
//! # Ok::<(), regrant_auth::PermissionError>(())
//! ```

pub mod access;
pub mod action;
pub mod error;
pub mod mask;
pub mod permission;
pub mod record;
mod resolver;
pub mod rule;

pub use access::{Access, AccessClass};
pub use action::Action;
pub use error::PermissionError;
pub use mask::AccessMask;
pub use permission::{IntoPermission, Permission};
pub use record::{Permissions, SetConfig};
pub use rule::Rule;

// Re-export identity types for convenience
pub use regrant_types::{GroupId, Identity, Subject, UserId};
