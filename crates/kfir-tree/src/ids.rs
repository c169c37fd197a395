//! Arena handles.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Index of a declaration in the graph's declaration arena.
    DeclId,
    "decl#"
);
define_id!(
    /// Index of an interned type.
    TypeId,
    "type#"
);
define_id!(
    /// Index of an expression in the graph's expression arena.
    ExprId,
    "expr#"
);

/// Fully-qualified class identifier, e.g. `kotlin/collections/List`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub String);

impl ClassId {
    #[must_use]
    pub fn new(fq_name: impl Into<String>) -> Self {
        Self(fq_name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short name: the part after the last `/` or `.`.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.0.rsplit(['/', '.']).next().unwrap_or(&self.0)
    }

    /// Package part (everything before the last `/`).
    #[must_use]
    pub fn package(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(package, _)| package)
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
