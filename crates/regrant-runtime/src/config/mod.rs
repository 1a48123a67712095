//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌────────────────────────────────────────────┐
//! │  1. Environment Variables (REGRANT_*)      │  Runtime override
//! ├────────────────────────────────────────────┤
//! │  2. Project Config (.regrant/config.toml)  │  Project-specific
//! ├────────────────────────────────────────────┤
//! │  3. Global Config (~/.regrant/config.toml) │  User defaults
//! ├────────────────────────────────────────────┤
//! │  4. Default Values (compile-time)          │  Fallback
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `REGRANT_DEBUG` | `debug` | bool |
//! | `REGRANT_LOG_LEVEL` | `logging.level` | String |
//! | `REGRANT_LOG_JSON` | `logging.json` | bool |
//! | `REGRANT_STORE_PATH` | `store.path` | PathBuf |
//! | `REGRANT_PASSWORD_TTL_DAYS` | `users.password_ttl_days` | u32 |
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//!
//! [logging]
//! level = "info"
//! json = false
//!
//! [policy]
//! defaults = { owner = "crud|execute", group = "read", all = "nothing" }
//!
//! [users]
//! password_ttl_days = 360
//!
//! [store]
//! path = "permissions.json"
//!
//! [[rules]]
//! name = "articles.edit"
//! permissions = "write"
//! ```
//!
//! Permissions accept a number or a `|`-separated list of action names;
//! the combination must be canonical or the file fails to load.

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{save_config, ConfigLoader};
pub use types::{LoggingConfig, PolicyConfig, RegrantConfig, StoreConfig, UsersConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".regrant")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".regrant";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
