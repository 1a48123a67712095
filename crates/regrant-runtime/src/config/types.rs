//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use regrant_auth::{Rule, SetConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use regrant_runtime::config::RegrantConfig;
///
/// let config = RegrantConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.logging.level, "info");
/// assert_eq!(config.users.password_ttl_days, 360);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegrantConfig {
    /// Enable debug mode (forces `debug` log level).
    pub debug: bool,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Policy applied to newly registered resources.
    pub policy: PolicyConfig,

    /// User store configuration.
    pub users: UsersConfig,

    /// Permission store configuration.
    pub store: StoreConfig,

    /// Named permission bundles.
    pub rules: Vec<Rule>,
}

impl RegrantConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed or a permission is not
    /// canonical.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Returns the effective log level.
    #[must_use]
    pub fn log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.logging.level
        }
    }

    /// Returns the logging section with [`log_level`](Self::log_level) applied.
    #[must_use]
    pub fn effective_logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level().to_string(),
            json: self.logging.json,
        }
    }

    /// Merges another config into this one.
    ///
    /// Fields of `other` that differ from their defaults override this
    /// config. Rules are merged by name, `other` winning.
    ///
    /// A layer cannot reset a field to its default: a project file with
    /// `debug = false` or `password_ttl_days = 360` leaves a global
    /// `debug = true` or `password_ttl_days = 30` in place. Use the
    /// matching `REGRANT_*` variable to force a default value back.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.logging.merge(&other.logging);
        self.policy.merge(&other.policy);
        self.users.merge(&other.users);
        self.store.merge(&other.store);

        for rule in &other.rules {
            match self.rules.iter_mut().find(|r| r.name == rule.name) {
                Some(existing) => *existing = rule.clone(),
                None => self.rules.push(rule.clone()),
            }
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive (e.g. `"info"`, `"regrant_auth=trace"`).
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.level != default.level {
            self.level = other.level.clone();
        }
        if other.json != default.json {
            self.json = other.json;
        }
    }
}

/// Policy configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Explicit owner/group/all triple for new resources.
    ///
    /// `None` applies the baseline policy
    /// ([`Permissions::apply_default`](regrant_auth::Permissions::apply_default)).
    pub defaults: Option<SetConfig>,
}

impl PolicyConfig {
    fn merge(&mut self, other: &Self) {
        if other.defaults.is_some() {
            self.defaults = other.defaults;
        }
    }
}

/// User store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UsersConfig {
    /// Days until a newly set password expires.
    pub password_ttl_days: u32,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            password_ttl_days: 360,
        }
    }
}

impl UsersConfig {
    /// Password lifetime as a duration.
    #[must_use]
    pub fn password_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.password_ttl_days))
    }

    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.password_ttl_days != default.password_ttl_days {
            self.password_ttl_days = other.password_ttl_days;
        }
    }
}

/// Permission store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file backing the permission store. `None` keeps records in memory.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    fn merge(&mut self, other: &Self) {
        if other.path.is_some() {
            self.path = other.path.clone();
        }
    }
}
