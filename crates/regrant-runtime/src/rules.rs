//! Rule book: named permission bundles.

use regrant_auth::{IntoPermission, Permission, PermissionError, Rule};
use std::collections::BTreeMap;

/// Name → [`Rule`] lookup table.
///
/// # Example
///
/// ```
/// use regrant_auth::Permission;
/// use regrant_runtime::RuleBook;
///
/// let mut rules = RuleBook::new();
/// rules.define("articles.edit", Permission::Write)?;
/// assert_eq!(rules.permission("articles.edit"), Some(Permission::Write));
/// # Ok::<(), regrant_auth::PermissionError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBook {
    rules: BTreeMap<String, Rule>,
}

impl RuleBook {
    /// Creates an empty rule book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule, returning the one it replaced.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.name.clone(), rule)
    }

    /// Validates and inserts a rule.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if `perm` is not
    /// canonical; the book is unchanged.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        perm: impl IntoPermission,
    ) -> Result<Option<Rule>, PermissionError> {
        Ok(self.insert(Rule::new(name, perm)?))
    }

    /// Looks up a rule.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Looks up a rule's permission.
    #[must_use]
    pub fn permission(&self, name: &str) -> Option<Permission> {
        self.rules.get(name).map(|r| r.permissions)
    }

    /// Removes a rule.
    pub fn remove(&mut self, name: &str) -> Option<Rule> {
        self.rules.remove(name)
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }
}

impl FromIterator<Rule> for RuleBook {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        let mut book = Self::new();
        book.extend(iter);
        book
    }
}

impl Extend<Rule> for RuleBook {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        for rule in iter {
            self.insert(rule);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_validates() {
        let mut book = RuleBook::new();
        assert_eq!(
            book.define("bad", 12u8),
            Err(PermissionError::InvalidPermission { bits: 12 })
        );
        assert!(book.is_empty());
    }

    #[test]
    fn later_rule_replaces_earlier() {
        let mut book = RuleBook::new();
        book.define("edit", Permission::Update).expect("define");
        let replaced = book.define("edit", Permission::Write).expect("define");

        assert_eq!(replaced.map(|r| r.permissions), Some(Permission::Update));
        assert_eq!(book.len(), 1);
        assert_eq!(book.permission("edit"), Some(Permission::Write));
    }

    #[test]
    fn collect_from_config_rules() {
        let book: RuleBook = [
            Rule::new("view", Permission::Read).expect("rule"),
            Rule::new("run", Permission::ReadExecute).expect("rule"),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = book.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["run", "view"]);
        assert!(book.get("view").is_some());
        assert!(book.clone().remove("view").is_some());
        assert_eq!(book.permission("missing"), None);
    }
}
