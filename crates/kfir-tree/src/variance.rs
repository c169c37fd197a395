//! Declaration-site variance and use-site projections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared variance of a type parameter, or the variance required by a
/// position in a signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variance {
    Invariant,
    In,
    Out,
}

impl Variance {
    pub const ALL: [Variance; 3] = [Self::Invariant, Self::In, Self::Out];

    #[inline]
    #[must_use]
    pub const fn allows_in_position(self) -> bool {
        matches!(self, Self::Invariant | Self::In)
    }

    #[inline]
    #[must_use]
    pub const fn allows_out_position(self) -> bool {
        matches!(self, Self::Invariant | Self::Out)
    }

    /// Whether a parameter declared with `self` variance may be used in a
    /// position that requires `position`.
    #[must_use]
    pub const fn allows_position(self, position: Variance) -> bool {
        match position {
            Self::In => self.allows_in_position(),
            Self::Out => self.allows_out_position(),
            Self::Invariant => self.allows_in_position() && self.allows_out_position(),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Invariant => Self::Invariant,
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Invariant => "invariant",
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Use-site projection of a type argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    Invariant,
    In,
    Out,
    Star,
}

impl ProjectionKind {
    /// The variance carried by a non-star projection.
    #[must_use]
    pub const fn variance(self) -> Option<Variance> {
        match self {
            Self::Invariant => Some(Variance::Invariant),
            Self::In => Some(Variance::In),
            Self::Out => Some(Variance::Out),
            Self::Star => None,
        }
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Invariant => "",
            Self::In => "in",
            Self::Out => "out",
            Self::Star => "*",
        }
    }
}

/// Combined effect of a declared parameter variance and a use-site projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectiveProjection {
    Out,
    In,
    Invariant,
    /// Conflicting declared and projected variance (`Foo<in T>` used as `Foo<out X>`).
    Star,
}

impl EffectiveProjection {
    #[must_use]
    pub const fn compute(parameter: Variance, argument: Variance) -> Self {
        match (parameter, argument) {
            (Variance::In, Variance::Out) | (Variance::Out, Variance::In) => Self::Star,
            (Variance::Invariant, argument) => Self::from_variance(argument),
            (parameter, _) => Self::from_variance(parameter),
        }
    }

    const fn from_variance(variance: Variance) -> Self {
        match variance {
            Variance::Invariant => Self::Invariant,
            Variance::In => Self::In,
            Variance::Out => Self::Out,
        }
    }

    /// Variance required of the argument when the enclosing position requires `position`.
    #[must_use]
    pub const fn apply(self, position: Variance) -> Option<Variance> {
        match self {
            Self::Out => Some(position),
            Self::In => Some(position.opposite()),
            Self::Invariant => Some(Variance::Invariant),
            Self::Star => None,
        }
    }
}
