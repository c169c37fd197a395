//! Resolved types and the thread-safe type interner.
//!
//! Types are hash-consed: structurally equal types share a [`TypeId`]. The
//! interner uses interior mutability so checkers running on different files
//! can create substituted or expanded types through a shared `&Session`.

use crate::annotations::Annotation;
use crate::ids::{DeclId, TypeId};
use crate::variance::ProjectionKind;
use kfir_common::SourceElement;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::sync::{PoisonError, RwLock};

bitflags::bitflags! {
    /// Attributes carried by a type use.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TypeAttributes: u8 {
        /// `@UnsafeVariance` on the type use.
        const UNSAFE_VARIANCE = 1 << 0;
        /// Function type with a receiver (`A.() -> B`).
        const EXTENSION_FUNCTION = 1 << 1;
    }
}

/// A type argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeProjection {
    Star,
    Type { kind: ProjectionKind, ty: TypeId },
}

impl TypeProjection {
    #[must_use]
    pub const fn invariant(ty: TypeId) -> Self {
        Self::Type {
            kind: ProjectionKind::Invariant,
            ty,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ProjectionKind {
        match self {
            Self::Star => ProjectionKind::Star,
            Self::Type { kind, .. } => *kind,
        }
    }

    #[must_use]
    pub const fn ty(&self) -> Option<TypeId> {
        match self {
            Self::Star => None,
            Self::Type { ty, .. } => Some(*ty),
        }
    }
}

pub type TypeArguments = SmallVec<[TypeProjection; 2]>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeData {
    /// A class, interface, object or type alias applied to arguments.
    ///
    /// When `classifier` names a type alias the type is an unexpanded
    /// abbreviation; see `Session::fully_expand`.
    Class {
        classifier: DeclId,
        arguments: TypeArguments,
        nullable: bool,
        attributes: TypeAttributes,
    },
    TypeParameter {
        parameter: DeclId,
        nullable: bool,
        attributes: TypeAttributes,
    },
    /// Unresolved type; never produces secondary diagnostics.
    Error,
}

impl TypeData {
    #[must_use]
    pub fn class(classifier: DeclId, arguments: impl IntoIterator<Item = TypeProjection>) -> Self {
        Self::Class {
            classifier,
            arguments: arguments.into_iter().collect(),
            nullable: false,
            attributes: TypeAttributes::empty(),
        }
    }

    #[must_use]
    pub const fn type_parameter(parameter: DeclId) -> Self {
        Self::TypeParameter {
            parameter,
            nullable: false,
            attributes: TypeAttributes::empty(),
        }
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        match self {
            Self::Class { nullable, .. } | Self::TypeParameter { nullable, .. } => *nullable,
            Self::Error => false,
        }
    }

    #[must_use]
    pub const fn attributes(&self) -> TypeAttributes {
        match self {
            Self::Class { attributes, .. } | Self::TypeParameter { attributes, .. } => *attributes,
            Self::Error => TypeAttributes::empty(),
        }
    }

    #[must_use]
    pub fn arguments(&self) -> &[TypeProjection] {
        match self {
            Self::Class { arguments, .. } => arguments,
            _ => &[],
        }
    }

    #[must_use]
    pub fn with_nullability(mut self, value: bool) -> Self {
        match &mut self {
            Self::Class { nullable, .. } | Self::TypeParameter { nullable, .. } => *nullable = value,
            Self::Error => {}
        }
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, value: TypeAttributes) -> Self {
        match &mut self {
            Self::Class { attributes, .. } | Self::TypeParameter { attributes, .. } => {
                *attributes = value;
            }
            Self::Error => {}
        }
        self
    }
}

/// Hash-consing table for [`TypeData`].
pub struct TypeInterner {
    state: RwLock<InternerState>,
}

#[derive(Default)]
struct InternerState {
    types: Vec<TypeData>,
    map: FxHashMap<TypeData, TypeId>,
}

impl TypeInterner {
    /// The error type is always interned first.
    pub const ERROR: TypeId = TypeId(0);

    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            state: RwLock::new(InternerState::default()),
        };
        interner.intern(TypeData::Error);
        interner
    }

    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(&id) = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .get(&data)
        {
            return id;
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(&id) = state.map.get(&data) {
            return id;
        }
        let id = TypeId(state.types.len() as u32);
        state.types.push(data.clone());
        state.map.insert(data, id);
        id
    }

    /// Look up the structure of an interned type. Unknown ids read as the error type.
    #[must_use]
    pub fn lookup(&self, id: TypeId) -> TypeData {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .types
            .get(id.index())
            .cloned()
            .unwrap_or(TypeData::Error)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<TypeData> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).types.clone()
    }

    /// Rebuild an interner from a serialized table, preserving ids.
    #[must_use]
    pub fn from_types(types: Vec<TypeData>) -> Self {
        let interner = Self::new();
        {
            let mut state = interner.state.write().unwrap_or_else(PoisonError::into_inner);
            state.types.clear();
            state.map.clear();
            for data in types {
                let id = TypeId(state.types.len() as u32);
                state.map.entry(data.clone()).or_insert(id);
                state.types.push(data);
            }
            if state.types.first() != Some(&TypeData::Error) {
                state.types.insert(0, TypeData::Error);
                state.map = state
                    .types
                    .iter()
                    .enumerate()
                    .map(|(index, data)| (data.clone(), TypeId(index as u32)))
                    .collect();
            }
        }
        interner
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TypeInterner {
    fn clone(&self) -> Self {
        Self::from_types(self.snapshot())
    }
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner").field("len", &self.len()).finish()
    }
}

impl Serialize for TypeInterner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypeInterner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<TypeData>::deserialize(deserializer).map(Self::from_types)
    }
}

/// A type as written in source: the resolved type plus the syntax around it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub ty: TypeId,
    pub source: Option<SourceElement>,
    /// References for each written type argument, parallel to the type's arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl TypeRef {
    #[must_use]
    pub const fn new(ty: TypeId, source: Option<SourceElement>) -> Self {
        Self {
            ty,
            source,
            arguments: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// A reference the compiler inferred; anchored on a fake source if any.
    #[must_use]
    pub const fn implicit(ty: TypeId) -> Self {
        Self::new(ty, None)
    }

    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
        self.arguments = arguments;
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    #[must_use]
    pub fn is_implicit(&self) -> bool {
        self.source.is_none_or(|source| source.is_fake())
    }
}
