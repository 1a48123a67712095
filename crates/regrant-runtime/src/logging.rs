//! Subscriber setup for binaries and tests embedding regrant.
//!
//! Library code only emits `tracing` events. An application that wants
//! them on stderr calls [`init`] once at startup:
//!
//! ```no_run
//! use regrant_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//! regrant_runtime::logging::init(&config.effective_logging())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Filter precedence: `RUST_LOG` > configured level.

use crate::config::LoggingConfig;
use regrant_types::ErrorCode;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Subscriber installation failure.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

impl ErrorCode for LoggingError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidFilter { .. } => "LOGGING_INVALID_FILTER",
            Self::AlreadyInitialized(_) => "LOGGING_ALREADY_INITIALIZED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::AlreadyInitialized(_))
    }
}

/// Builds the filter: `RUST_LOG` if set and valid, else `config.level`.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] if the configured level does
/// not parse.
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|source| LoggingError::InvalidFilter {
        directive: config.level.clone(),
        source,
    })
}

/// Installs the global subscriber.
///
/// # Errors
///
/// - [`LoggingError::InvalidFilter`] for a malformed level
/// - [`LoggingError::AlreadyInitialized`] when called twice
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = filter(config)?;

    let json_layer = config.json.then(|| fmt::layer().json().with_target(true));
    let plain_layer = (!config.json).then(|| fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(plain_layer)
        .try_init()?;

    Ok(())
}
