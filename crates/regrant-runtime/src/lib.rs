//! Runtime layer for regrant.
//!
//! Everything around the permission model that needs state, I/O or
//! configuration:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | Layered TOML configuration (`~/.regrant`, project, `REGRANT_*`) |
//! | [`logging`] | `tracing-subscriber` setup |
//! | [`store`] | [`PermissionStore`] with memory and JSON file backends |
//! | [`users`] | Accounts, password hashing and expiry |
//! | [`identity`] | [`IdentityProvider`] and the static [`Directory`] |
//! | [`rules`] | [`RuleBook`] of named permissions |
//! | [`authorizer`] | [`Authorizer`] facade and grant guards |
//!
//! # Example
//!
//! ```
//! use regrant_auth::Permission;
//! use regrant_runtime::users::UserStore;
//! use regrant_runtime::{Authorizer, MemoryStore};
//! use regrant_types::UserId;
//! use std::sync::Arc;
//!
//! let users = Arc::new(UserStore::new());
//! users.new_user("alice", "pw")?;
//! users.new_user("bob", "pw")?;
//! users.add_to_group("bob", "alice")?;
//!
//! let auth = Authorizer::new(Arc::clone(&users), MemoryStore::new());
//! auth.register("notes", "alice", "alice")?;
//!
//! assert!(auth.check(&UserId::new("bob"), "notes", Permission::Write)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod authorizer;
pub mod config;
pub mod identity;
pub mod logging;
pub mod rules;
pub mod store;
pub mod users;

pub use authorizer::{AuthorizeError, Authorizer};
pub use config::{ConfigError, ConfigLoader, RegrantConfig};
pub use identity::{Directory, IdentityProvider};
pub use rules::RuleBook;
pub use store::{FileStore, MemoryStore, PermissionStore, StoreError};
pub use users::{User, UserError, UserStore};
