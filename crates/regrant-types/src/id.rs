//! Identifier types for regrant.
//!
//! Identifiers are opaque strings. Equality is byte-for-byte; no case
//! folding or normalisation happens here. Callers that want
//! case-insensitive user names (the user store lower-cases them) must
//! normalise before constructing an id.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id! {
    /// Identifier of a user (the owner side of a permissions record).
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_types::UserId;
    ///
    /// let alice = UserId::new("alice");
    /// assert_eq!(alice.as_str(), "alice");
    /// assert_eq!(alice, "alice");
    /// assert_eq!(alice.to_string(), "alice");
    /// ```
    UserId
}

string_id! {
    /// Identifier of a group (the group side of a permissions record).
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_types::GroupId;
    ///
    /// let staff = GroupId::from("staff");
    /// assert_eq!(staff.as_str(), "staff");
    /// ```
    GroupId
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(UserId::new("alice"), UserId::from("alice"));
        assert_ne!(UserId::new("alice"), UserId::new("Alice"));
    }

    #[test]
    fn borrow_allows_str_lookup() {
        let mut set = HashSet::new();
        set.insert(GroupId::new("staff"));
        assert!(set.contains("staff"));
        assert!(!set.contains("admin"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UserId::new("bob");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"bob\"");

        let parsed: UserId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, id);
    }

    #[test]
    fn into_inner_returns_string() {
        let id = GroupId::new("ops");
        assert_eq!(id.into_inner(), "ops".to_string());
    }
}
