//! Unified error interface for regrant.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so callers
//! can branch on a stable machine-readable code instead of parsing
//! display strings.
//!
//! # Example
//!
//! ```
//! use regrant_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     Missing,
//!     Busy,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing => "LOOKUP_MISSING",
//!             Self::Busy => "LOOKUP_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! assert_eq!(LookupError::Busy.code(), "LOOKUP_BUSY");
//! assert!(!LookupError::Missing.is_recoverable());
//! ```

/// Machine-readable error code and recoverability.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE, e.g. `"AUTH_INVALID_PERMISSION"`
/// - Prefixed by the owning layer: `AUTH_`, `AUTHORIZE_`, `CONFIG_`,
///   `LOGGING_`, `STORE_`, `USER_`
/// - Stable once published
///
/// # Recoverability
///
/// Validation failures (a non-canonical permission, a missing identity)
/// are never recoverable: retrying with the same input gives the same
/// answer. I/O failures usually are.
pub trait ErrorCode {
    /// Returns the error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying or user action may resolve the error.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, prefixed and UPPER_SNAKE_CASE.
///
/// Intended for tests that walk every variant of an error enum.
///
/// # Panics
///
/// Panics with a descriptive message if validation fails.
///
/// # Example
///
/// ```
/// use regrant_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "STORE_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout, "STORE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
