//! Configuration errors.

use regrant_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or save a regrant configuration layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem access to a config layer failed.
    #[error("cannot {action} regrant config at '{path}': {source}")]
    Io {
        /// `"read"`, `"write"` or `"create directory for"`.
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config layer is malformed or names a non-canonical permission.
    #[error("regrant config '{path}' is invalid: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The in-memory config could not be encoded.
    #[error("regrant config cannot be encoded as TOML: {0}")]
    Encode(#[from] toml::ser::Error),

    /// A `REGRANT_*` override does not parse.
    #[error("{name}={value:?} is not a valid {expected}")]
    InvalidEnvVar {
        name: String,
        value: String,
        expected: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Invalid {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn env(name: &str, value: &str, expected: &'static str) -> Self {
        Self::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CONFIG_IO",
            Self::Invalid { .. } => "CONFIG_INVALID",
            Self::Encode(_) => "CONFIG_ENCODE",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Fixing the file or the variable and reloading succeeds.
        !matches!(self, Self::Encode(_))
    }
}
