//! Declaration nodes.
//!
//! Declarations live in one arena per graph and refer to each other by
//! [`DeclId`]. Ownership follows the source tree (file > class > member),
//! `parent` is the non-owning back-reference.

use crate::annotations::Annotation;
use crate::ids::{ClassId, DeclId, ExprId};
use crate::types::TypeRef;
use crate::variance::Variance;
use crate::visibility::{Modality, Visibility};
use kfir_common::SourceElement;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags::bitflags! {
    /// Modifier keywords that carry no further data.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Modifiers: u32 {
        const OVERRIDE = 1 << 0;
        const INLINE = 1 << 1;
        const NOINLINE = 1 << 2;
        const CROSSINLINE = 1 << 3;
        const VARARG = 1 << 4;
        const LATEINIT = 1 << 5;
        const DATA = 1 << 6;
        const VALUE = 1 << 7;
        const INNER = 1 << 8;
        const COMPANION = 1 << 9;
        const EXPECT = 1 << 10;
        const EXTERNAL = 1 << 11;
        const SUSPEND = 1 << 12;
        const REIFIED = 1 << 13;
        /// `val` on a constructor parameter.
        const VAL = 1 << 14;
        /// `var` on a property or constructor parameter.
        const VAR = 1 << 15;
        const CONST = 1 << 16;
        const OPERATOR = 1 << 17;
        const FUN = 1 << 18;
        /// Legacy `inline class`.
        const INLINE_CLASS = 1 << 19;
    }
}

/// How far upstream resolution has progressed for a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResolvePhase {
    Raw,
    Supertypes,
    Types,
    Status,
    BodyResolve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    EnumClass,
    EnumEntry,
    AnnotationClass,
    Object,
    AnonymousObject,
}

impl ClassKind {
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Object | Self::EnumEntry)
    }

    #[must_use]
    pub const fn is_interface(self) -> bool {
        matches!(self, Self::Interface)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::EnumClass => "enum class",
            Self::EnumEntry => "enum entry",
            Self::AnnotationClass => "annotation class",
            Self::Object => "object",
            Self::AnonymousObject => "object",
        }
    }
}

/// Visibility, modality and modifier keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclStatus {
    pub visibility: Visibility,
    /// `None` for declarations that cannot have a modality (parameters, files).
    pub modality: Option<Modality>,
    pub modifiers: Modifiers,
}

impl Default for DeclStatus {
    fn default() -> Self {
        Self {
            visibility: Visibility::Public,
            modality: None,
            modifiers: Modifiers::empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileDecl {
    pub path: String,
    /// Package, `/`-separated (`com/example`); empty for the root package.
    pub package: String,
    pub module: String,
    pub declarations: Vec<DeclId>,
    /// Library and built-in files are resolved but never checked.
    #[serde(default)]
    pub is_library: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupertypeEntry {
    pub type_ref: TypeRef,
    /// `by expr` delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<ExprId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub class_id: ClassId,
    pub class_kind: ClassKind,
    /// Declared inside a function body or initializer.
    #[serde(default)]
    pub is_local: bool,
    pub type_parameters: Vec<DeclId>,
    pub supertypes: Vec<SupertypeEntry>,
    /// Members in declaration order, including constructors and nested classes.
    pub members: Vec<DeclId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub type_parameters: Vec<DeclId>,
    pub receiver: Option<TypeRef>,
    pub value_parameters: Vec<DeclId>,
    pub return_type: TypeRef,
    pub body: Option<ExprId>,
    /// `{ ... }` body as opposed to `= expr`.
    #[serde(default)]
    pub has_block_body: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub type_parameters: Vec<DeclId>,
    pub receiver: Option<TypeRef>,
    pub return_type: TypeRef,
    pub initializer: Option<ExprId>,
    pub delegate: Option<ExprId>,
    pub getter: Option<DeclId>,
    pub setter: Option<DeclId>,
    #[serde(default)]
    pub has_backing_field: bool,
    /// Parameter this property was declared by (`class A(val x: Int)`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_parameter: Option<DeclId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessorDecl {
    pub is_getter: bool,
    pub return_type: TypeRef,
    /// The setter's value parameter.
    pub value_parameter: Option<DeclId>,
    pub body: Option<ExprId>,
    #[serde(default)]
    pub has_block_body: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    pub type_parameters: Vec<DeclId>,
    pub expanded: TypeRef,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeParameterDecl {
    pub variance: Variance,
    /// Declared bounds; empty means the implicit `Any?`.
    pub bounds: Vec<TypeRef>,
    pub index: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueParameterDecl {
    pub type_ref: TypeRef,
    pub default_value: Option<ExprId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnonymousInitializerDecl {
    pub body: Option<ExprId>,
}

/// `: this(...)` or `: super(...)` on a constructor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelegationCall {
    pub is_this: bool,
    /// Resolved target constructor.
    pub target: Option<DeclId>,
    pub source: Option<SourceElement>,
    #[serde(default)]
    pub arguments: Vec<ExprId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub is_primary: bool,
    pub value_parameters: Vec<DeclId>,
    pub delegation: Option<DelegationCall>,
    pub body: Option<ExprId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    File(FileDecl),
    Class(ClassDecl),
    Function(FunctionDecl),
    Property(PropertyDecl),
    PropertyAccessor(AccessorDecl),
    TypeAlias(TypeAliasDecl),
    TypeParameter(TypeParameterDecl),
    ValueParameter(ValueParameterDecl),
    AnonymousInitializer(AnonymousInitializerDecl),
    Constructor(ConstructorDecl),
}

/// Payload-free discriminant of [`DeclKind`], used to index checker tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclKindTag {
    File,
    Class,
    Function,
    Property,
    PropertyAccessor,
    TypeAlias,
    TypeParameter,
    ValueParameter,
    AnonymousInitializer,
    Constructor,
}

impl DeclKindTag {
    pub const ALL: [DeclKindTag; 10] = [
        Self::File,
        Self::Class,
        Self::Function,
        Self::Property,
        Self::PropertyAccessor,
        Self::TypeAlias,
        Self::TypeParameter,
        Self::ValueParameter,
        Self::AnonymousInitializer,
        Self::Constructor,
    ];

    /// Kinds that have a type signature (`FirCallableDeclaration` analogue).
    pub const CALLABLES: [DeclKindTag; 5] = [
        Self::Function,
        Self::Property,
        Self::PropertyAccessor,
        Self::ValueParameter,
        Self::Constructor,
    ];
}

impl fmt::Display for DeclKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::File => "file",
            Self::Class => "class",
            Self::Function => "function",
            Self::Property => "property",
            Self::PropertyAccessor => "property accessor",
            Self::TypeAlias => "type alias",
            Self::TypeParameter => "type parameter",
            Self::ValueParameter => "value parameter",
            Self::AnonymousInitializer => "anonymous initializer",
            Self::Constructor => "constructor",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub source: Option<SourceElement>,
    pub parent: Option<DeclId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub status: DeclStatus,
    pub phase: ResolvePhase,
    pub kind: DeclKind,
}

impl Declaration {
    #[must_use]
    pub const fn tag(&self) -> DeclKindTag {
        match &self.kind {
            DeclKind::File(_) => DeclKindTag::File,
            DeclKind::Class(_) => DeclKindTag::Class,
            DeclKind::Function(_) => DeclKindTag::Function,
            DeclKind::Property(_) => DeclKindTag::Property,
            DeclKind::PropertyAccessor(_) => DeclKindTag::PropertyAccessor,
            DeclKind::TypeAlias(_) => DeclKindTag::TypeAlias,
            DeclKind::TypeParameter(_) => DeclKindTag::TypeParameter,
            DeclKind::ValueParameter(_) => DeclKindTag::ValueParameter,
            DeclKind::AnonymousInitializer(_) => DeclKindTag::AnonymousInitializer,
            DeclKind::Constructor(_) => DeclKindTag::Constructor,
        }
    }

    #[inline]
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.status.visibility
    }

    #[inline]
    #[must_use]
    pub const fn modality(&self) -> Option<Modality> {
        self.status.modality
    }

    #[inline]
    #[must_use]
    pub const fn has_modifier(&self, modifier: Modifiers) -> bool {
        self.status.modifiers.contains(modifier)
    }

    #[must_use]
    pub const fn is_override(&self) -> bool {
        self.has_modifier(Modifiers::OVERRIDE)
    }

    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.has_modifier(Modifiers::INLINE)
    }

    #[must_use]
    pub const fn is_var(&self) -> bool {
        self.has_modifier(Modifiers::VAR)
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self.status.modality, None | Some(Modality::Final))
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.status.modality == Some(Modality::Abstract)
    }

    /// Source kind is synthesized (or there is no source at all).
    #[must_use]
    pub fn has_fake_source(&self) -> bool {
        self.source.is_none_or(|source| source.is_fake())
    }

    #[must_use]
    pub const fn as_file(&self) -> Option<&FileDecl> {
        match &self.kind {
            DeclKind::File(file) => Some(file),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            DeclKind::Class(class) => Some(class),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(function) => Some(function),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_property(&self) -> Option<&PropertyDecl> {
        match &self.kind {
            DeclKind::Property(property) => Some(property),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_accessor(&self) -> Option<&AccessorDecl> {
        match &self.kind {
            DeclKind::PropertyAccessor(accessor) => Some(accessor),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_type_alias(&self) -> Option<&TypeAliasDecl> {
        match &self.kind {
            DeclKind::TypeAlias(alias) => Some(alias),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_type_parameter(&self) -> Option<&TypeParameterDecl> {
        match &self.kind {
            DeclKind::TypeParameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_value_parameter(&self) -> Option<&ValueParameterDecl> {
        match &self.kind {
            DeclKind::ValueParameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_constructor(&self) -> Option<&ConstructorDecl> {
        match &self.kind {
            DeclKind::Constructor(constructor) => Some(constructor),
            _ => None,
        }
    }

    #[must_use]
    pub fn type_parameters(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Class(class) => &class.type_parameters,
            DeclKind::Function(function) => &function.type_parameters,
            DeclKind::Property(property) => &property.type_parameters,
            DeclKind::TypeAlias(alias) => &alias.type_parameters,
            _ => &[],
        }
    }

    #[must_use]
    pub fn value_parameters(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Function(function) => &function.value_parameters,
            DeclKind::Constructor(constructor) => &constructor.value_parameters,
            DeclKind::PropertyAccessor(accessor) => accessor.value_parameter.as_slice(),
            _ => &[],
        }
    }

    /// Declared or inferred type of a callable.
    #[must_use]
    pub const fn return_type_ref(&self) -> Option<&TypeRef> {
        match &self.kind {
            DeclKind::Function(function) => Some(&function.return_type),
            DeclKind::Property(property) => Some(&property.return_type),
            DeclKind::PropertyAccessor(accessor) => Some(&accessor.return_type),
            DeclKind::ValueParameter(parameter) => Some(&parameter.type_ref),
            _ => None,
        }
    }

    #[must_use]
    pub const fn receiver_type_ref(&self) -> Option<&TypeRef> {
        match &self.kind {
            DeclKind::Function(function) => function.receiver.as_ref(),
            DeclKind::Property(property) => property.receiver.as_ref(),
            _ => None,
        }
    }

    /// Expression body of a function-like declaration.
    #[must_use]
    pub const fn body(&self) -> Option<ExprId> {
        match &self.kind {
            DeclKind::Function(function) => function.body,
            DeclKind::PropertyAccessor(accessor) => accessor.body,
            DeclKind::Constructor(constructor) => constructor.body,
            DeclKind::AnonymousInitializer(initializer) => initializer.body,
            _ => None,
        }
    }
}
