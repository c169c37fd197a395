//! Source anchors for declarations, type references and expressions.
//!
//! Offsets are byte offsets into the owning file. The file itself is not
//! stored here: every anchor is interpreted relative to the file currently
//! being checked.

use serde::{Deserialize, Serialize};

/// Why a compiler-synthesized element exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FakeSourceKind {
    /// `copy`, `componentN`, `equals`, `hashCode`, `toString` of a data class.
    DataClassGeneratedMembers,
    /// A property declared by a `val`/`var` primary constructor parameter.
    PropertyFromParameter,
    /// Getter or setter without a body written by the user.
    DefaultAccessor,
    /// Accessor generated for a delegated property.
    DelegatedPropertyAccessor,
    /// A type reference inferred from an initializer or body.
    ImplicitType,
    /// An implicit primary constructor (`class A` without parentheses).
    ImplicitConstructor,
    /// Delegation to the super constructor inserted by the compiler.
    DelegatingConstructorCall,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Real,
    Fake(FakeSourceKind),
}

/// A `(start, length)` span in a source file plus its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceElement {
    pub start: u32,
    pub length: u32,
    pub kind: SourceKind,
}

impl SourceElement {
    #[must_use]
    pub const fn real(start: u32, length: u32) -> Self {
        Self {
            start,
            length,
            kind: SourceKind::Real,
        }
    }

    #[must_use]
    pub const fn fake(start: u32, length: u32, kind: FakeSourceKind) -> Self {
        Self {
            start,
            length,
            kind: SourceKind::Fake(kind),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_fake(&self) -> bool {
        matches!(self.kind, SourceKind::Fake(_))
    }

    #[must_use]
    pub const fn fake_kind(&self) -> Option<FakeSourceKind> {
        match self.kind {
            SourceKind::Fake(kind) => Some(kind),
            SourceKind::Real => None,
        }
    }

    /// The same span re-labelled as synthesized.
    #[must_use]
    pub const fn with_fake_kind(self, kind: FakeSourceKind) -> Self {
        Self {
            kind: SourceKind::Fake(kind),
            ..self
        }
    }

    #[must_use]
    pub const fn end(&self) -> u32 {
        self.start + self.length
    }
}
