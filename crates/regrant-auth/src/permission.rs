//! Canonical permissions.
//!
//! A [`Permission`] is one of exactly eleven legal action combinations.
//! Every mutating operation in this crate (mask allow/deny, templates,
//! `set`) and the resolver only ever act on a `Permission`, so an
//! illegal combination can never reach a mask.
//!
//! | Permission | Bits |
//! |------------|------|
//! | `Nothing` | 0 |
//! | `Create` | 1 |
//! | `Read` | 2 |
//! | `Update` | 4 |
//! | `Delete` | 8 |
//! | `Write` | 13 |
//! | `Crud` | 15 |
//! | `Execute` | 16 |
//! | `ReadExecute` | 18 |
//! | `WriteExecute` | 29 |
//! | `CrudExecute` | 31 |
//!
//! Raw input (numbers from storage, combinations built with `|`, names
//! from configuration) enters through [`IntoPermission`], which is the
//! single validation gate.

use crate::{Action, PermissionError};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::ops::BitOr;
use std::str::FromStr;

/// A canonical action combination.
///
/// # Example
///
/// ```
/// use regrant_auth::{Permission, PermissionError};
///
/// assert_eq!(Permission::try_from(18u8), Ok(Permission::ReadExecute));
/// assert_eq!(
///     Permission::try_from(Permission::Update | Permission::Execute),
///     Err(PermissionError::InvalidPermission { bits: 20 })
/// );
/// assert_eq!("read|execute".parse::<Permission>(), Ok(Permission::ReadExecute));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Permission {
    /// No action.
    #[default]
    Nothing = 0,
    /// Create only.
    Create = 1,
    /// Read only.
    Read = 2,
    /// Update only.
    Update = 4,
    /// Delete only.
    Delete = 8,
    /// Create, update and delete.
    Write = 13,
    /// Create, read, update and delete.
    Crud = 15,
    /// Execute only.
    Execute = 16,
    /// Read and execute.
    ReadExecute = 18,
    /// Write and execute.
    WriteExecute = 29,
    /// Everything.
    CrudExecute = 31,
}

impl Permission {
    /// Every canonical permission, in bit order.
    pub const ALL: [Self; 11] = [
        Self::Nothing,
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Delete,
        Self::Write,
        Self::Crud,
        Self::Execute,
        Self::ReadExecute,
        Self::WriteExecute,
        Self::CrudExecute,
    ];

    /// Returns the canonical permission with exactly these bits, if any.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Nothing),
            1 => Some(Self::Create),
            2 => Some(Self::Read),
            4 => Some(Self::Update),
            8 => Some(Self::Delete),
            13 => Some(Self::Write),
            15 => Some(Self::Crud),
            16 => Some(Self::Execute),
            18 => Some(Self::ReadExecute),
            29 => Some(Self::WriteExecute),
            31 => Some(Self::CrudExecute),
            _ => None,
        }
    }

    /// Returns `true` if `bits` is one of the eleven canonical values.
    ///
    /// # Example
    ///
    /// ```
    /// use regrant_auth::Permission;
    ///
    /// assert!(Permission::is_canonical(13));
    /// assert!(!Permission::is_canonical(3)); // create | read
    /// assert!(!Permission::is_canonical(32));
    /// ```
    #[must_use]
    pub const fn is_canonical(bits: u8) -> bool {
        Self::from_bits(bits).is_some()
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns the action flags.
    #[must_use]
    pub const fn actions(self) -> Action {
        Action::from_bits_retain(self.bits())
    }

    /// Returns `true` for [`Permission::Nothing`].
    #[must_use]
    pub const fn is_nothing(self) -> bool {
        matches!(self, Self::Nothing)
    }
}

impl From<Permission> for Action {
    fn from(perm: Permission) -> Self {
        perm.actions()
    }
}

impl From<Permission> for u8 {
    fn from(perm: Permission) -> Self {
        perm.bits()
    }
}

impl TryFrom<u8> for Permission {
    type Error = PermissionError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits).ok_or(PermissionError::InvalidPermission { bits })
    }
}

impl TryFrom<Action> for Permission {
    type Error = PermissionError;

    fn try_from(actions: Action) -> Result<Self, Self::Error> {
        Self::try_from(actions.bits())
    }
}

impl BitOr for Permission {
    type Output = Action;

    fn bitor(self, rhs: Self) -> Action {
        self.actions() | rhs.actions()
    }
}

impl BitOr<Permission> for Action {
    type Output = Action;

    fn bitor(self, rhs: Permission) -> Action {
        self | rhs.actions()
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Nothing => "nothing",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Write => "write",
            Self::Crud => "crud",
            Self::Execute => "execute",
            Self::ReadExecute => "read|execute",
            Self::WriteExecute => "write|execute",
            Self::CrudExecute => "crud|execute",
        };
        f.write_str(name)
    }
}

/// Parses a `|`-separated list of action names.
///
/// The union of the named actions must be canonical, so `"create|read"`
/// is rejected while `"create|update|delete"` yields [`Permission::Write`].
impl FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut actions = Action::empty();
        for part in s.split('|') {
            let action = Action::parse(part).ok_or_else(|| PermissionError::UnknownAction {
                name: part.trim().to_string(),
            })?;
            actions |= action;
        }
        Self::try_from(actions)
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bits(u8),
            Names(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Bits(bits) => Self::try_from(bits).map_err(de::Error::custom),
            Repr::Names(names) => names.parse().map_err(de::Error::custom),
        }
    }
}

/// Conversion into a validated [`Permission`].
///
/// This is the validation gate used by every operation that accepts a
/// permission. A `Permission` passes unchanged; raw bits and `Action`
/// combinations are checked against the canonical whitelist.
///
/// # Example
///
/// ```
/// use regrant_auth::{IntoPermission, Permission};
///
/// assert_eq!(Permission::Read.into_permission(), Ok(Permission::Read));
/// assert_eq!((Permission::Read | Permission::Execute).into_permission(), Ok(Permission::ReadExecute));
/// assert!(12u8.into_permission().is_err());
/// ```
pub trait IntoPermission {
    /// Validates and converts.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidPermission`] if the value is not
    /// one of the canonical combinations.
    fn into_permission(self) -> Result<Permission, PermissionError>;
}

impl IntoPermission for Permission {
    fn into_permission(self) -> Result<Permission, PermissionError> {
        Ok(self)
    }
}

impl IntoPermission for u8 {
    fn into_permission(self) -> Result<Permission, PermissionError> {
        Permission::try_from(self)
    }
}

impl IntoPermission for Action {
    fn into_permission(self) -> Result<Permission, PermissionError> {
        Permission::try_from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_eleven_canonical_values() {
        let canonical: Vec<u8> = (0..=u8::MAX).filter(|b| Permission::is_canonical(*b)).collect();
        assert_eq!(canonical, vec![0, 1, 2, 4, 8, 13, 15, 16, 18, 29, 31]);
        assert_eq!(
            Permission::ALL.iter().map(|p| p.bits()).collect::<Vec<_>>(),
            canonical
        );
    }

    #[test]
    fn derived_combinations_match_actions() {
        assert_eq!(Permission::Write.actions(), Action::WRITE);
        assert_eq!(Permission::Crud.actions(), Action::CRUD);
        assert_eq!(
            Permission::WriteExecute.actions(),
            Action::WRITE | Action::EXECUTE
        );
        assert_eq!(Permission::CrudExecute.actions(), Action::all());
    }

    #[test]
    fn bitor_builds_unvalidated_actions() {
        let combo = Permission::Read | Permission::Execute;
        assert_eq!(combo.into_permission(), Ok(Permission::ReadExecute));

        let combo = Permission::Write | Permission::Execute | Permission::Read;
        assert_eq!(combo.into_permission(), Ok(Permission::CrudExecute));

        let combo = Permission::Update | Permission::Execute;
        assert_eq!(
            combo.into_permission(),
            Err(PermissionError::InvalidPermission { bits: 20 })
        );
    }

    #[test]
    fn non_canonical_bits_rejected() {
        for bits in [3u8, 5, 6, 7, 12, 14, 17, 20, 30, 32, 255] {
            assert_eq!(
                bits.into_permission(),
                Err(PermissionError::InvalidPermission { bits }),
                "bits {bits} should be rejected"
            );
        }
    }

    #[test]
    fn display_and_parse_agree() {
        for perm in Permission::ALL {
            let parsed: Permission = perm.to_string().parse().expect("parse display");
            assert_eq!(parsed, perm);
        }
    }

    #[test]
    fn parse_accepts_flag_lists() {
        assert_eq!("create | update | delete".parse::<Permission>(), Ok(Permission::Write));
        assert_eq!("execute|READ".parse::<Permission>(), Ok(Permission::ReadExecute));
        assert_eq!("nothing".parse::<Permission>(), Ok(Permission::Nothing));
    }

    #[test]
    fn parse_rejects_unknown_and_non_canonical() {
        assert_eq!(
            "read|admin".parse::<Permission>(),
            Err(PermissionError::UnknownAction {
                name: "admin".to_string()
            })
        );
        assert_eq!(
            "create|read".parse::<Permission>(),
            Err(PermissionError::InvalidPermission { bits: 3 })
        );
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&Permission::WriteExecute).expect("serialize");
        assert_eq!(json, "29");
    }

    #[test]
    fn deserializes_from_number_or_names() {
        let from_num: Permission = serde_json::from_str("18").expect("number");
        assert_eq!(from_num, Permission::ReadExecute);

        let from_name: Permission = serde_json::from_str("\"crud|execute\"").expect("names");
        assert_eq!(from_name, Permission::CrudExecute);

        assert!(serde_json::from_str::<Permission>("3").is_err());
        assert!(serde_json::from_str::<Permission>("\"bogus\"").is_err());
    }
}
