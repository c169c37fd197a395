//! Visibility lattice, effective visibility and modality.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Declared visibility.
///
/// Visibilities are only partially ordered: `protected` and `internal` are
/// incomparable, so `partial_cmp` returns `None` for that pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    Private,
    /// `private` member of a class accessed only through `this`.
    PrivateToThis,
    /// Declared inside a function body.
    Local,
}

impl Visibility {
    pub const ALL: [Visibility; 6] = [
        Self::Public,
        Self::Protected,
        Self::Internal,
        Self::Private,
        Self::PrivateToThis,
        Self::Local,
    ];

    #[inline]
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private | Self::PrivateToThis)
    }

    /// Rank within the lattice; equal ranks of different kinds are incomparable.
    const fn rank(self) -> u8 {
        match self {
            Self::Public => 3,
            Self::Protected | Self::Internal => 2,
            Self::Private => 1,
            Self::PrivateToThis => 0,
            Self::Local => 0,
        }
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::Private => "private",
            Self::PrivateToThis => "private/*private to this*/",
            Self::Local => "local",
        }
    }
}

impl PartialOrd for Visibility {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        if matches!(self, Self::Local) || matches!(other, Self::Local) {
            return None;
        }
        match self.rank().cmp(&other.rank()) {
            Ordering::Equal => None,
            ordering => Some(ordering),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Visibility of a declaration once every container is taken into account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectiveVisibility {
    Public,
    /// Protected member of a public class.
    Protected,
    /// Protected member whose container is itself less than public.
    ProtectedBound,
    Internal,
    /// Intersection of `internal` and `protected`.
    InternalProtected,
    PrivateInClass,
    PrivateInFile,
    Local,
}

impl EffectiveVisibility {
    /// Visible to code outside the module.
    #[must_use]
    pub const fn public_api(self) -> bool {
        matches!(self, Self::Public | Self::Protected | Self::ProtectedBound)
    }

    #[must_use]
    pub const fn private_api(self) -> bool {
        matches!(self, Self::PrivateInClass | Self::PrivateInFile | Self::Local)
    }

    #[must_use]
    pub const fn to_visibility(self) -> Visibility {
        match self {
            Self::Public => Visibility::Public,
            Self::Protected | Self::ProtectedBound => Visibility::Protected,
            Self::Internal | Self::InternalProtected => Visibility::Internal,
            Self::PrivateInClass | Self::PrivateInFile => Visibility::Private,
            Self::Local => Visibility::Local,
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Public => 4,
            Self::Protected | Self::Internal => 3,
            Self::ProtectedBound => 2,
            Self::InternalProtected => 2,
            Self::PrivateInClass | Self::PrivateInFile => 1,
            Self::Local => 0,
        }
    }

    /// Greatest lower bound of two effective visibilities.
    #[must_use]
    pub fn lower_bound(self, other: Self) -> Self {
        if self == other {
            return self;
        }
        match (self, other) {
            (Self::Protected, Self::Internal) | (Self::Internal, Self::Protected) => {
                Self::InternalProtected
            }
            (Self::ProtectedBound, Self::Internal) | (Self::Internal, Self::ProtectedBound) => {
                Self::InternalProtected
            }
            _ if self.rank() <= other.rank() => self,
            _ => other,
        }
    }
}

impl fmt::Display for EffectiveVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::ProtectedBound => "protected (in non-public class)",
            Self::Internal => "internal",
            Self::InternalProtected => "internal & protected",
            Self::PrivateInClass => "private-in-class",
            Self::PrivateInFile => "private-in-file",
            Self::Local => "local",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Final,
    Open,
    Abstract,
    Sealed,
}

impl Modality {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Final => "final",
            Self::Open => "open",
            Self::Abstract => "abstract",
            Self::Sealed => "sealed",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
