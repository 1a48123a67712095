//! Named permission bundles.
//!
//! A [`Rule`] names a permission for a kind of operation
//! (`"articles.edit"` → `write`), so callers can ask for a rule instead
//! of spelling out bits at every call site. The core never interprets
//! the name; the rule book that stores rules lives in `regrant-runtime`.

use crate::{IntoPermission, Permission, PermissionError};
use serde::{Deserialize, Serialize};

/// A name plus one canonical permission.
///
/// # Example
///
/// ```
/// use regrant_auth::{Permission, Rule};
///
/// let rule = Rule::new("articles.edit", Permission::Write)?;
/// assert_eq!(rule.name, "articles.edit");
/// assert_eq!(rule.permissions, Permission::Write);
///
/// assert!(Rule::new("bad", 3u8).is_err());
/// # Ok::<(), regrant_auth::PermissionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// Rule name.
    pub name: String,
    /// Permission the rule stands for.
    pub permissions: Permission,
}

impl Rule {
    /// Creates a rule, validating the permission.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if `perm` is not canonical.
    pub fn new(name: impl Into<String>, perm: impl IntoPermission) -> Result<Self, PermissionError> {
        Ok(Self {
            name: name.into(),
            permissions: perm.into_permission()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_schema() {
        let rule = Rule::new("reports.run", Permission::ReadExecute).expect("rule");
        let json = serde_json::to_string(&rule).expect("serialize");
        assert_eq!(json, r#"{"name":"reports.run","permissions":18}"#);
    }

    #[test]
    fn deserialize_by_name() {
        let rule: Rule =
            serde_json::from_str(r#"{"name":"a","permissions":"write|execute"}"#).expect("rule");
        assert_eq!(rule.permissions, Permission::WriteExecute);
    }

    #[test]
    fn deserialize_rejects_non_canonical() {
        assert!(serde_json::from_str::<Rule>(r#"{"name":"a","permissions":12}"#).is_err());
    }
}
