//! Permission errors.
//!
//! Every fallible operation in this crate returns [`PermissionError`].
//! A returned error always means the operation had no effect: templates
//! and `set` validate before they touch any mask.
//!
//! Callers must keep denial and error apart:
//!
//! ```text
//! Ok(false)  → the check ran and access is denied
//! Err(_)     → the check could not be evaluated
//! ```

use regrant_types::ErrorCode;
use thiserror::Error;

/// Errors raised by permission validation and resolution.
///
/// # Example
///
/// ```
/// use regrant_auth::PermissionError;
/// use regrant_types::ErrorCode;
///
/// let err = PermissionError::InvalidPermission { bits: 20 };
/// assert_eq!(err.code(), "AUTH_INVALID_PERMISSION");
/// assert!(err.to_string().contains("20"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// The value is not one of the canonical permission combinations.
    #[error("invalid permission {bits} ({bits:#07b}): not a canonical action combination")]
    InvalidPermission {
        /// The rejected bits.
        bits: u8,
    },

    /// The resolver was given no identity.
    #[error("identity not initialized")]
    IdentityNotInitialized,

    /// A raw mask value is outside the range of the five action bits.
    ///
    /// This is a weaker check than [`InvalidPermission`](Self::InvalidPermission):
    /// it only guards raw mask initialization (for example loading a
    /// stored record) and says nothing about canonical combinations.
    #[error("raw mask value {value} is outside the initialization range 0..=31")]
    InitRange {
        /// The rejected raw value.
        value: u32,
    },

    /// A permission name could not be parsed.
    #[error("unknown action name '{name}'")]
    UnknownAction {
        /// The unrecognised name.
        name: String,
    },
}

impl ErrorCode for PermissionError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidPermission { .. } => "AUTH_INVALID_PERMISSION",
            Self::IdentityNotInitialized => "AUTH_IDENTITY_NOT_INITIALIZED",
            Self::InitRange { .. } => "AUTH_INIT_RANGE",
            Self::UnknownAction { .. } => "AUTH_UNKNOWN_ACTION",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
