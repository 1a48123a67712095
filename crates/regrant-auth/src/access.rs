//! Owner/group/all access triple.

use crate::AccessMask;
use serde::{Deserialize, Serialize};

/// The class an identity falls into for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessClass {
    /// The identity owns the resource.
    Owner,
    /// The identity is a member of the resource's group.
    Group,
    /// Everyone else.
    All,
}

impl AccessClass {
    /// Returns the class name ("owner", "group", "all").
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Group => "group",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for AccessClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three independent masks for one resource.
///
/// There is no inheritance between the classes: granting something to
/// `all` does not grant it to `owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Access {
    pub(crate) owner: AccessMask,
    pub(crate) group: AccessMask,
    pub(crate) all: AccessMask,
}

impl Access {
    /// Owner mask.
    #[must_use]
    pub fn owner(&self) -> AccessMask {
        self.owner
    }

    /// Group mask.
    #[must_use]
    pub fn group(&self) -> AccessMask {
        self.group
    }

    /// All (everyone else) mask.
    #[must_use]
    pub fn all(&self) -> AccessMask {
        self.all
    }

    /// Mask for the given class.
    #[must_use]
    pub fn mask(&self, class: AccessClass) -> AccessMask {
        match class {
            AccessClass::Owner => self.owner,
            AccessClass::Group => self.group,
            AccessClass::All => self.all,
        }
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "owner={} group={} all={}",
            self.owner.bits(),
            self.group.bits(),
            self.all.bits()
        )
    }
}
