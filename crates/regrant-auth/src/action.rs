//! Raw action bits.
//!
//! [`Action`] is the unvalidated bit representation behind every
//! [`Permission`](crate::Permission) and [`AccessMask`](crate::AccessMask).
//! Any combination of the five bits is a valid `Action`; only eleven of
//! them are canonical permissions. Callers hold `Action` values when they
//! build a combination (`Permission::Read | Permission::Execute`) and hand
//! it to a validating operation.
//!
//! # Example
//!
//! ```
//! use regrant_auth::Action;
//!
//! let write = Action::WRITE;
//! assert!(write.contains(Action::CREATE | Action::UPDATE | Action::DELETE));
//! assert!(!write.contains(Action::READ));
//!
//! assert_eq!(Action::CRUD, Action::WRITE | Action::READ);
//! ```

use bitflags::bitflags;

bitflags! {
    /// Semantic action flags.
    ///
    /// | Flag | Bit | Meaning |
    /// |------|-----|---------|
    /// | [`CREATE`](Self::CREATE) | 1 | Create content |
    /// | [`READ`](Self::READ) | 2 | Read content |
    /// | [`UPDATE`](Self::UPDATE) | 4 | Change content |
    /// | [`DELETE`](Self::DELETE) | 8 | Delete content |
    /// | [`EXECUTE`](Self::EXECUTE) | 16 | Actions with no effect on the resource itself |
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Action: u8 {
        /// Create content.
        const CREATE  = 0b0000_0001;
        /// Read content.
        const READ    = 0b0000_0010;
        /// Change content.
        const UPDATE  = 0b0000_0100;
        /// Delete content.
        const DELETE  = 0b0000_1000;
        /// Execute actions with no effect on the resource.
        const EXECUTE = 0b0001_0000;
    }
}

impl Action {
    /// CREATE | UPDATE | DELETE.
    pub const WRITE: Self = Self::CREATE.union(Self::UPDATE).union(Self::DELETE);

    /// CREATE | READ | UPDATE | DELETE.
    pub const CRUD: Self = Self::WRITE.union(Self::READ);

    /// Returns the names of the set flags, lowest bit first.
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::Action;
    ///
    /// assert_eq!((Action::READ | Action::EXECUTE).names(), vec!["read", "execute"]);
    /// assert!(Action::empty().names().is_empty());
    /// ```
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names()
            .map(|(name, _)| match name {
                "CREATE" => "create",
                "READ" => "read",
                "UPDATE" => "update",
                "DELETE" => "delete",
                _ => "execute",
            })
            .collect()
    }

    /// Parses a single action name (case-insensitive).
    ///
    /// Accepts the five flag names, the `write` and `crud` combinations,
    /// `nothing`/`none` for the empty set and `exec` as an alias.
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::Action;
    ///
    /// assert_eq!(Action::parse("Read"), Some(Action::READ));
    /// assert_eq!(Action::parse("exec"), Some(Action::EXECUTE));
    /// assert_eq!(Action::parse("write"), Some(Action::WRITE));
    /// assert_eq!(Action::parse("nothing"), Some(Action::empty()));
    /// assert_eq!(Action::parse("admin"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "nothing" | "none" => Some(Self::empty()),
            "create" => Some(Self::CREATE),
            "read" => Some(Self::READ),
            "update" => Some(Self::UPDATE),
            "delete" => Some(Self::DELETE),
            "execute" | "exec" => Some(Self::EXECUTE),
            "write" => Some(Self::WRITE),
            "crud" => Some(Self::CRUD),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_values_are_stable() {
        assert_eq!(Action::CREATE.bits(), 1);
        assert_eq!(Action::READ.bits(), 2);
        assert_eq!(Action::UPDATE.bits(), 4);
        assert_eq!(Action::DELETE.bits(), 8);
        assert_eq!(Action::EXECUTE.bits(), 16);
        assert_eq!(Action::WRITE.bits(), 13);
        assert_eq!(Action::CRUD.bits(), 15);
        assert_eq!(Action::all().bits(), 31);
    }

    #[test]
    fn crud_is_write_plus_read() {
        assert_eq!(Action::CRUD - Action::WRITE, Action::READ);
    }

    #[test]
    fn display_formatting() {
        assert_eq!(Action::READ.to_string(), "read");
        assert_eq!(Action::WRITE.to_string(), "create | update | delete");
        assert_eq!(Action::empty().to_string(), "(none)");
    }

    #[test]
    fn parse_trims_and_ignores_case() {
        assert_eq!(Action::parse("  DELETE "), Some(Action::DELETE));
        assert_eq!(Action::parse("CRUD"), Some(Action::CRUD));
        assert_eq!(Action::parse(""), None);
    }
}
