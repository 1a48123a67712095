//! User accounts, password hashing and expiration.
//!
//! # Account Defaults
//!
//! A new user named `Alice` gets:
//!
//! | Field | Value |
//! |-------|-------|
//! | `uid` | `alice` |
//! | `gid` | `alice` |
//! | `groups` | `[alice]` |
//! | `status` | [`UserStatus::Inactive`] |
//! | `password_expires` | now + password TTL |
//!
//! Logins compare password digests in constant time. A
//! [`UserStatus::Reserved`] account is refused with [`UserError::Disabled`]
//! even when the password matches. An expired password
//! still authenticates the user but is reported as
//! [`UserError::PasswordExpired`], carrying the record so the caller can
//! drive a reset.

use crate::config::UsersConfig;
use crate::identity::IdentityProvider;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use regrant_types::{ErrorCode, GroupId, Identity, Subject, UserId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{debug, warn};

/// Account state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum UserStatus {
    /// Created but not yet activated. Informational; can still log in.
    #[default]
    Inactive = 0,
    /// Active account.
    Active = 1,
    /// Reserved name. Logins are refused with [`UserError::Disabled`].
    Reserved = 3,
}

impl UserStatus {
    /// Returns the numeric status code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name as given at creation.
    pub name: String,
    /// Primary identifier (lower-cased name).
    pub uid: UserId,
    /// Primary group.
    pub gid: GroupId,
    /// Primary role, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Group memberships.
    pub groups: Vec<GroupId>,
    /// Role memberships.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Creation time (UTC).
    pub created: DateTime<Utc>,
    /// Account state.
    pub status: UserStatus,
    /// Password expiry time (UTC).
    pub password_expires: DateTime<Utc>,
    #[serde(skip)]
    password_hash: Vec<u8>,
}

impl User {
    /// Returns `true` if the password has expired at `now`.
    #[must_use]
    pub fn password_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.password_expires
    }

    /// Adds a group membership.
    pub fn join(&mut self, group: impl Into<GroupId>) {
        let group = group.into();
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
    }

    /// Returns the identity snapshot for the resolver.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.uid.clone())
            .with_group(self.gid.clone())
            .with_groups(self.groups.iter().cloned())
    }
}

impl Subject for User {
    fn subject_id(&self) -> &UserId {
        &self.uid
    }

    fn is_member_of(&self, group: &GroupId) -> bool {
        self.gid == *group || self.groups.contains(group)
    }
}

/// Password digest function.
pub trait PasswordHasher: Send + Sync + std::fmt::Debug {
    /// Hashes `password` for the account `uid`.
    fn hash(&self, uid: &UserId, password: &str) -> Vec<u8>;
}

/// SHA-256 over `uid:password`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, uid: &UserId, password: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(uid.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(password.as_bytes());
        hasher.finalize().to_vec()
    }
}

/// User store error type.
#[derive(Debug, Error)]
pub enum UserError {
    /// A user with the same uid exists.
    #[error("user already exists: {uid}")]
    AlreadyExists { uid: UserId },

    /// The input cannot form a user.
    #[error("invalid user input: {message}")]
    InvalidInput { message: String },

    /// No such user.
    #[error("user not found: {name}")]
    NotFound { name: String },

    /// Password mismatch.
    #[error("incorrect username or password")]
    BadCredentials,

    /// The password is correct but the account may not log in.
    #[error("user '{uid}' cannot log in while {status:?}")]
    Disabled { uid: UserId, status: UserStatus },

    /// The password is correct but expired.
    #[error("password for '{}' expired at {}", .user.uid, .user.password_expires)]
    PasswordExpired { user: Box<User> },
}

impl UserError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl ErrorCode for UserError {
    fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "USER_ALREADY_EXISTS",
            Self::InvalidInput { .. } => "USER_INVALID_INPUT",
            Self::NotFound { .. } => "USER_NOT_FOUND",
            Self::BadCredentials => "USER_BAD_CREDENTIALS",
            Self::Disabled { .. } => "USER_DISABLED",
            Self::PasswordExpired { .. } => "USER_PASSWORD_EXPIRED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::BadCredentials | Self::PasswordExpired { .. })
    }
}

/// In-memory user accounts keyed by uid.
///
/// # Example
///
/// ```
/// use regrant_runtime::users::{UserError, UserStore};
///
/// let users = UserStore::new();
/// let alice = users.new_user("Alice", "s3cret")?;
/// assert_eq!(alice.uid.as_str(), "alice");
///
/// assert!(users.get_user("alice", "s3cret").is_ok());
/// assert!(matches!(
///     users.get_user("alice", "guess"),
///     Err(UserError::BadCredentials)
/// ));
/// # Ok::<(), UserError>(())
/// ```
#[derive(Debug)]
pub struct UserStore {
    users: RwLock<HashMap<UserId, User>>,
    hasher: Box<dyn PasswordHasher>,
    password_ttl: Duration,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::from_config(&UsersConfig::default())
    }
}

impl UserStore {
    /// Creates a store with SHA-256 hashing and the default password TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from configuration.
    #[must_use]
    pub fn from_config(config: &UsersConfig) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            hasher: Box::new(Sha256Hasher),
            password_ttl: config.password_ttl(),
        }
    }

    /// Replaces the password hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: impl PasswordHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Replaces the password TTL.
    #[must_use]
    pub fn with_password_ttl(mut self, ttl: Duration) -> Self {
        self.password_ttl = ttl;
        self
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, UserError> {
        now.checked_add_signed(self.password_ttl)
            .ok_or_else(|| UserError::invalid_input("password TTL overflows the expiry date"))
    }

    fn uid_for(name: &str) -> Result<UserId, UserError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserError::invalid_input("user name must not be empty"));
        }
        Ok(UserId::new(name.to_lowercase()))
    }

    /// Creates an inactive user.
    ///
    /// # Errors
    ///
    /// - [`UserError::InvalidInput`] for an empty name, or a password TTL
    ///   that pushes the expiry out of range
    /// - [`UserError::AlreadyExists`] if the lower-cased name is taken
    pub fn new_user(&self, name: &str, password: &str) -> Result<User, UserError> {
        let uid = Self::uid_for(name)?;
        let gid = GroupId::new(uid.as_str());
        let now = Utc::now();

        let user = User {
            name: name.trim().to_string(),
            uid: uid.clone(),
            gid: gid.clone(),
            role: None,
            groups: vec![gid],
            roles: Vec::new(),
            created: now,
            status: UserStatus::Inactive,
            password_expires: self.expiry_from(now)?,
            password_hash: self.hasher.hash(&uid, password),
        };

        let mut users = self.users.write();
        if users.contains_key(&uid) {
            return Err(UserError::AlreadyExists { uid });
        }
        users.insert(uid.clone(), user.clone());
        debug!(%uid, "User created");
        Ok(user)
    }

    /// Authenticates a user.
    ///
    /// # Errors
    ///
    /// - [`UserError::NotFound`] for an unknown name
    /// - [`UserError::BadCredentials`] on password mismatch
    /// - [`UserError::Disabled`] for a [`UserStatus::Reserved`] account
    /// - [`UserError::PasswordExpired`] if the password is correct but expired
    pub fn get_user(&self, name: &str, password: &str) -> Result<User, UserError> {
        self.get_user_at(name, password, Utc::now())
    }

    /// [`get_user`](Self::get_user) evaluated at a given instant.
    ///
    /// # Errors
    ///
    /// Same as [`get_user`](Self::get_user).
    pub fn get_user_at(
        &self,
        name: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, UserError> {
        let uid = Self::uid_for(name)?;
        let user = self
            .users
            .read()
            .get(&uid)
            .cloned()
            .ok_or_else(|| UserError::NotFound {
                name: name.to_string(),
            })?;

        let candidate = self.hasher.hash(&uid, password);
        let matches: bool = candidate
            .as_slice()
            .ct_eq(user.password_hash.as_slice())
            .into();
        if !matches {
            warn!(%uid, "Login failed: bad credentials");
            return Err(UserError::BadCredentials);
        }

        if user.status == UserStatus::Reserved {
            warn!(%uid, status = ?user.status, "Login refused for reserved account");
            return Err(UserError::Disabled {
                uid,
                status: user.status,
            });
        }

        if user.password_expired_at(now) {
            warn!(%uid, expired_at = %user.password_expires, "Login with expired password");
            return Err(UserError::PasswordExpired {
                user: Box::new(user),
            });
        }

        Ok(user)
    }

    /// Looks up a user without authenticating.
    #[must_use]
    pub fn user(&self, uid: &UserId) -> Option<User> {
        self.users.read().get(uid).cloned()
    }

    /// Sets a new password and restarts its expiry clock.
    ///
    /// # Errors
    ///
    /// - [`UserError::NotFound`] for an unknown name
    /// - [`UserError::InvalidInput`] if the password TTL pushes the expiry
    ///   out of range
    pub fn reset_password(&self, name: &str, password: &str) -> Result<User, UserError> {
        let uid = Self::uid_for(name)?;
        let expires = self.expiry_from(Utc::now())?;
        let mut users = self.users.write();
        let user = users.get_mut(&uid).ok_or_else(|| UserError::NotFound {
            name: name.to_string(),
        })?;
        user.password_hash = self.hasher.hash(&uid, password);
        user.password_expires = expires;
        debug!(%uid, "Password reset");
        Ok(user.clone())
    }

    /// Changes the account state.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] for an unknown name.
    pub fn set_status(&self, name: &str, status: UserStatus) -> Result<(), UserError> {
        let uid = Self::uid_for(name)?;
        let mut users = self.users.write();
        let user = users.get_mut(&uid).ok_or_else(|| UserError::NotFound {
            name: name.to_string(),
        })?;
        user.status = status;
        Ok(())
    }

    /// Adds `name` to `group`.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] for an unknown name.
    pub fn add_to_group(&self, name: &str, group: impl Into<GroupId>) -> Result<(), UserError> {
        let uid = Self::uid_for(name)?;
        let mut users = self.users.write();
        let user = users.get_mut(&uid).ok_or_else(|| UserError::NotFound {
            name: name.to_string(),
        })?;
        user.join(group);
        Ok(())
    }
}

impl IdentityProvider for UserStore {
    fn identity(&self, id: &UserId) -> Option<Identity> {
        self.users.read().get(id).map(User::identity)
    }
}
