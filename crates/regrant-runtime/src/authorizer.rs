//! Authorizer facade.
//!
//! Ties an [`IdentityProvider`], a [`PermissionStore`] and a [`RuleBook`]
//! together so callers can ask "may `uid` do `perm` on `resource`":
//!
//! ```text
//! check(uid, resource, perm)
//!     │
//!     ├─ store.get(resource)          ──None──► UnknownResource
//!     ├─ identities.identity(uid)     ──None──► resolver gets no identity
//!     └─ record.is_granted(identity, perm)
//! ```
//!
//! An unknown user is not silently denied: the resolver reports
//! [`PermissionError::IdentityNotInitialized`].

use crate::config::RegrantConfig;
use crate::identity::IdentityProvider;
use crate::rules::RuleBook;
use crate::store::{PermissionStore, StoreError};
use regrant_auth::{IntoPermission, Permission, PermissionError, Permissions, SetConfig};
use regrant_types::{ErrorCode, GroupId, Subject, UserId};
use thiserror::Error;
use tracing::debug;

/// Authorizer error type.
#[derive(Debug, Error)]
pub enum AuthorizeError {
    /// No record for the resource.
    #[error("unknown resource: {resource}")]
    UnknownResource { resource: String },

    /// No rule with this name.
    #[error("unknown rule: {name}")]
    UnknownRule { name: String },

    /// Validation or resolution failed.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for AuthorizeError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownResource { .. } => "AUTHORIZE_UNKNOWN_RESOURCE",
            Self::UnknownRule { .. } => "AUTHORIZE_UNKNOWN_RULE",
            Self::Permission(e) => e.code(),
            Self::Store(e) => e.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::UnknownResource { .. } | Self::UnknownRule { .. } => false,
            Self::Permission(e) => e.is_recoverable(),
            Self::Store(e) => e.is_recoverable(),
        }
    }
}

/// Permission checks against stored records.
///
/// # Example
///
/// ```
/// use regrant_auth::Permission;
/// use regrant_runtime::{Authorizer, Directory, MemoryStore};
/// use regrant_types::{Identity, UserId};
///
/// let directory = Directory::new();
/// directory.insert(Identity::new("alice"));
/// directory.insert(Identity::new("bob").with_group("editors"));
///
/// let auth = Authorizer::new(directory, MemoryStore::new());
/// auth.register("articles/1", "alice", "editors")?;
///
/// let bob = UserId::new("bob");
/// assert!(auth.check(&bob, "articles/1", Permission::Update)?);
///
/// auth.update("articles/1", |p| p.only_owner(Permission::Delete))?;
/// assert!(!auth.check(&bob, "articles/1", Permission::Delete)?);
/// # Ok::<(), regrant_runtime::AuthorizeError>(())
/// ```
#[derive(Debug)]
pub struct Authorizer<I, S> {
    identities: I,
    store: S,
    rules: RuleBook,
    defaults: Option<SetConfig>,
}

impl<I: IdentityProvider, S: PermissionStore> Authorizer<I, S> {
    /// Creates an authorizer with no rules and the baseline policy.
    pub fn new(identities: I, store: S) -> Self {
        Self {
            identities,
            store,
            rules: RuleBook::new(),
            defaults: None,
        }
    }

    /// Creates an authorizer with rules and defaults from configuration.
    pub fn from_config(identities: I, store: S, config: &RegrantConfig) -> Self {
        Self {
            identities,
            store,
            rules: config.rules.iter().cloned().collect(),
            defaults: config.policy.defaults,
        }
    }

    /// Replaces the rule book.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleBook) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the explicit triple applied to newly registered resources.
    #[must_use]
    pub fn with_defaults(mut self, defaults: SetConfig) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Returns the identity provider.
    pub fn identities(&self) -> &I {
        &self.identities
    }

    /// Returns the record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the rule book.
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Builds a record with the configured default policy.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] only if the configured defaults fail
    /// validation.
    pub fn new_record(
        &self,
        owner: impl Into<UserId>,
        group: impl Into<GroupId>,
    ) -> Result<Permissions, PermissionError> {
        let mut perms = Permissions::new(owner, group);
        match self.defaults {
            Some(defaults) => perms.set(defaults)?,
            None => perms.apply_default(),
        }
        Ok(perms)
    }

    /// Creates and stores a record for a new resource.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] (wrapped) if the resource is
    /// already registered.
    pub fn register(
        &self,
        resource: &str,
        owner: impl Into<UserId>,
        group: impl Into<GroupId>,
    ) -> Result<Permissions, AuthorizeError> {
        let perms = self.new_record(owner, group)?;
        self.store.create(resource, perms.clone())?;
        debug!(resource, owner = %perms.owner, group = %perms.group, access = %perms.access(), "Resource registered");
        Ok(perms)
    }

    /// Applies a template sequence to a stored record atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizeError::UnknownResource`] if there is no record,
    /// or the closure's error; the record is unchanged on error.
    pub fn update<F>(&self, resource: &str, f: F) -> Result<Permissions, AuthorizeError>
    where
        F: FnOnce(&mut Permissions) -> Result<(), PermissionError>,
    {
        self.store.update(resource, f).map_err(|e| match e {
            StoreError::NotFound { resource } => AuthorizeError::UnknownResource { resource },
            StoreError::Permission(e) => AuthorizeError::Permission(e),
            other => AuthorizeError::Store(other),
        })
    }

    fn record(&self, resource: &str) -> Result<Permissions, AuthorizeError> {
        self.store
            .get(resource)
            .ok_or_else(|| AuthorizeError::UnknownResource {
                resource: resource.to_string(),
            })
    }

    /// Checks `perm` for the user `uid` on `resource`.
    ///
    /// # Errors
    ///
    /// - [`AuthorizeError::UnknownResource`] if there is no record
    /// - [`PermissionError::IdentityNotInitialized`] if `uid` is unknown
    /// - [`PermissionError::InvalidPermission`] if `perm` is not canonical
    pub fn check(
        &self,
        uid: &UserId,
        resource: &str,
        perm: impl IntoPermission,
    ) -> Result<bool, AuthorizeError> {
        let record = self.record(resource)?;
        let identity = self.identities.identity(uid);
        Ok(record.is_granted(identity.as_ref(), perm)?)
    }

    /// Checks `perm` for an already resolved subject.
    ///
    /// # Errors
    ///
    /// Same as [`check`](Self::check), with `None` standing for an
    /// unknown subject.
    pub fn check_subject<T: Subject + ?Sized>(
        &self,
        subject: Option<&T>,
        resource: &str,
        perm: impl IntoPermission,
    ) -> Result<bool, AuthorizeError> {
        let record = self.record(resource)?;
        Ok(record.is_granted(subject, perm)?)
    }

    /// Checks the permission named by `rule` for `uid` on `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizeError::UnknownRule`] if the rule is not defined,
    /// otherwise the same errors as [`check`](Self::check).
    pub fn check_rule(
        &self,
        uid: &UserId,
        resource: &str,
        rule: &str,
    ) -> Result<bool, AuthorizeError> {
        let perm = self
            .rules
            .permission(rule)
            .ok_or_else(|| AuthorizeError::UnknownRule {
                name: rule.to_string(),
            })?;
        self.check(uid, resource, perm)
    }

    /// Returns a reusable check bound to `resource` and `perm`.
    ///
    /// The record is looked up on every call, so later template changes
    /// are observed.
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::Permission;
    /// use regrant_runtime::{Authorizer, Directory, MemoryStore};
    /// use regrant_types::{Identity, Subject};
    ///
    /// let auth = Authorizer::new(Directory::new(), MemoryStore::new());
    /// auth.register("reports", "alice", "staff")?;
    ///
    /// let can_run = auth.guard("reports", Permission::Execute);
    /// let carol = Identity::new("carol");
    /// assert!(!can_run(Some(&carol as &dyn Subject))?);
    /// assert!(can_run(None).is_err());
    /// # Ok::<(), regrant_runtime::AuthorizeError>(())
    /// ```
    pub fn guard(
        &self,
        resource: impl Into<String>,
        perm: Permission,
    ) -> impl Fn(Option<&dyn Subject>) -> Result<bool, AuthorizeError> + '_ {
        let resource = resource.into();
        move |subject: Option<&dyn Subject>| self.check_subject(subject, &resource, perm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Directory, MemoryStore};
    use regrant_types::Identity;

    fn authorizer() -> Authorizer<Directory, MemoryStore> {
        let directory: Directory = [
            Identity::new("alice").with_group("staff"),
            Identity::new("bob").with_group("staff"),
            Identity::new("carol"),
        ]
        .into_iter()
        .collect();
        Authorizer::new(directory, MemoryStore::new())
    }

    fn uid(s: &str) -> UserId {
        UserId::new(s)
    }

    #[test]
    fn register_applies_baseline_policy() {
        let auth = authorizer();
        let perms = auth.register("doc", "alice", "staff").expect("register");
        assert_eq!(perms, Permissions::with_default("alice", "staff"));
        assert_eq!(auth.store().get("doc"), Some(perms));
    }

    #[test]
    fn register_applies_configured_defaults() {
        let auth = authorizer().with_defaults(SetConfig::new(
            Permission::Write,
            Permission::Read,
            Permission::Nothing,
        ));
        let perms = auth.register("doc", "alice", "staff").expect("register");
        assert_eq!(perms.access().owner().bits(), 15);
        assert_eq!(perms.access().group().bits(), 2);
        assert!(perms.access().all().is_empty());
    }

    #[test]
    fn register_twice_fails() {
        let auth = authorizer();
        auth.register("doc", "alice", "staff").expect("register");
        let err = auth
            .register("doc", "bob", "staff")
            .expect_err("duplicate");
        assert!(matches!(
            err,
            AuthorizeError::Store(StoreError::AlreadyExists { .. })
        ));
        assert_eq!(err.code(), "STORE_ALREADY_EXISTS");
    }

    #[test]
    fn check_resolves_classes() {
        let auth = authorizer();
        auth.register("doc", "alice", "staff").expect("register");

        assert!(auth.check(&uid("alice"), "doc", Permission::Delete).expect("check"));
        assert!(auth.check(&uid("bob"), "doc", Permission::Write).expect("check"));
        assert!(auth.check(&uid("carol"), "doc", Permission::Read).expect("check"));
        assert!(!auth.check(&uid("carol"), "doc", Permission::Update).expect("check"));
    }

    #[test]
    fn unknown_resource() {
        let auth = authorizer();
        let err = auth
            .check(&uid("alice"), "missing", Permission::Read)
            .expect_err("unknown");
        assert!(matches!(err, AuthorizeError::UnknownResource { ref resource } if resource == "missing"));
        assert_eq!(err.code(), "AUTHORIZE_UNKNOWN_RESOURCE");
    }

    #[test]
    fn unknown_user_is_not_initialized() {
        let auth = authorizer();
        auth.register("doc", "alice", "staff").expect("register");
        let err = auth
            .check(&uid("mallory"), "doc", Permission::Read)
            .expect_err("no identity");
        assert!(matches!(
            err,
            AuthorizeError::Permission(PermissionError::IdentityNotInitialized)
        ));
        assert_eq!(err.code(), "AUTH_IDENTITY_NOT_INITIALIZED");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn non_canonical_check_is_an_error() {
        let auth = authorizer();
        auth.register("doc", "alice", "staff").expect("register");
        let err = auth
            .check(&uid("alice"), "doc", 20u8)
            .expect_err("invalid");
        assert!(matches!(
            err,
            AuthorizeError::Permission(PermissionError::InvalidPermission { bits: 20 })
        ));
    }

    #[test]
    fn update_maps_errors() {
        let auth = authorizer();
        assert!(matches!(
            auth.update("missing", |_| Ok(())),
            Err(AuthorizeError::UnknownResource { .. })
        ));

        auth.register("doc", "alice", "staff").expect("register");
        assert!(matches!(
            auth.update("doc", |p| p.anyone(3u8)),
            Err(AuthorizeError::Permission(PermissionError::InvalidPermission { bits: 3 }))
        ));
    }

    #[test]
    fn rules_name_permissions() {
        let mut rules = RuleBook::new();
        rules.define("doc.edit", Permission::Write).expect("define");
        let auth = authorizer().with_rules(rules);
        auth.register("doc", "alice", "staff").expect("register");

        assert!(auth.check_rule(&uid("bob"), "doc", "doc.edit").expect("rule"));
        assert!(!auth.check_rule(&uid("carol"), "doc", "doc.edit").expect("rule"));
        assert!(matches!(
            auth.check_rule(&uid("bob"), "doc", "doc.nuke"),
            Err(AuthorizeError::UnknownRule { .. })
        ));
    }

    #[test]
    fn from_config_loads_rules_and_defaults() {
        let mut config = RegrantConfig::default();
        config.policy.defaults = Some(SetConfig::new(
            Permission::Crud,
            Permission::Nothing,
            Permission::Nothing,
        ));
        config
            .rules
            .push(regrant_auth::Rule::new("view", Permission::Read).expect("rule"));

        let auth = Authorizer::from_config(Directory::new(), MemoryStore::new(), &config);
        assert_eq!(auth.rules().permission("view"), Some(Permission::Read));
        let perms = auth.new_record("alice", "staff").expect("record");
        assert_eq!(perms.access().owner().bits(), 15);
        assert!(perms.access().group().is_empty());
    }

    #[test]
    fn guard_observes_later_changes() {
        let auth = authorizer();
        auth.register("doc", "alice", "staff").expect("register");
        let can_delete = auth.guard("doc", Permission::Delete);
        let identity = Identity::new("bob").with_group("staff");
        let bob: &dyn Subject = &identity;

        assert!(can_delete(Some(bob)).expect("guard"));
        auth.update("doc", |p| p.only_owner(Permission::Delete))
            .expect("update");
        assert!(!can_delete(Some(bob)).expect("guard"));
        assert!(matches!(
            can_delete(None),
            Err(AuthorizeError::Permission(PermissionError::IdentityNotInitialized))
        ));
    }
}
