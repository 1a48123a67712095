//! Core types for regrant.
//!
//! This crate holds the identity side of the permission model and
//! nothing else: identifiers, the identity snapshot handed to the
//! resolver, and the shared error-code interface.
//!
//! # Crate Architecture
//!
//! ```text
//! regrant-types    (UserId, GroupId, Identity, Subject, ErrorCode)  ◄── HERE
//!     ↑
//! regrant-auth     (Permission, AccessMask, Access, Permissions, resolver)
//!     ↑
//! regrant-runtime  (config, stores, users, Authorizer)
//! ```
//!
//! # Example
//!
//! ```
//! use regrant_types::{GroupId, Identity, Subject};
//!
//! let bob = Identity::new("bob").with_groups(["staff", "ops"]);
//! assert!(bob.is_member_of(&GroupId::new("ops")));
//! ```

pub mod error;
pub mod id;
pub mod identity;

pub use error::{assert_error_code, ErrorCode};
pub use id::{GroupId, UserId};
pub use identity::{Identity, Subject};
