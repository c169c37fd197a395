//! Resolved annotation applications and their constant arguments.

use crate::ids::{DeclId, TypeId};
use kfir_common::SourceElement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A compile-time constant argument of an annotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstValue {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    /// Enum entry reference, e.g. `AnnotationTarget.CLASS`.
    Enum { class: String, entry: String },
    /// Class literal, e.g. `String::class`.
    Class(TypeId),
    Array(Vec<ConstValue>),
}

impl ConstValue {
    /// Flatten strings at any array depth.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        let mut out = Vec::new();
        self.collect_strings(&mut out);
        out.into_iter()
    }

    fn collect_strings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::String(value) => out.push(value),
            Self::Array(values) => values.iter().for_each(|value| value.collect_strings(out)),
            _ => {}
        }
    }

    /// Flatten enum entry names at any array depth.
    pub fn enum_entries(&self) -> impl Iterator<Item = &str> {
        let mut out = Vec::new();
        self.collect_enum_entries(&mut out);
        out.into_iter()
    }

    fn collect_enum_entries<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Enum { entry, .. } => out.push(entry),
            Self::Array(values) => values.iter().for_each(|value| value.collect_enum_entries(out)),
            _ => {}
        }
    }
}

/// Explicit use-site target (`@field:Ann`, `@get:Ann`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseSiteTarget {
    Field,
    File,
    Property,
    Get,
    Set,
    Receiver,
    Param,
    SetParam,
    Delegate,
}

impl UseSiteTarget {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::File => "file",
            Self::Property => "property",
            Self::Get => "get",
            Self::Set => "set",
            Self::Receiver => "receiver",
            Self::Param => "param",
            Self::SetParam => "setparam",
            Self::Delegate => "delegate",
        }
    }

    /// The declaration target an annotation with this use-site lands on.
    #[must_use]
    pub const fn annotation_target(self) -> AnnotationTarget {
        match self {
            Self::Field | Self::Delegate => AnnotationTarget::Field,
            Self::File => AnnotationTarget::File,
            Self::Property => AnnotationTarget::Property,
            Self::Get => AnnotationTarget::PropertyGetter,
            Self::Set => AnnotationTarget::PropertySetter,
            Self::Receiver | Self::Param | Self::SetParam => AnnotationTarget::ValueParameter,
        }
    }
}

impl fmt::Display for UseSiteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Element kinds an annotation class may declare in `@Target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationTarget {
    Class,
    AnnotationClass,
    TypeParameter,
    Property,
    Field,
    LocalVariable,
    ValueParameter,
    Constructor,
    Function,
    PropertyGetter,
    PropertySetter,
    Type,
    Expression,
    File,
    TypeAlias,
}

impl AnnotationTarget {
    /// Targets of an annotation class without `@Target`.
    pub const DEFAULT_TARGETS: [AnnotationTarget; 9] = [
        Self::Class,
        Self::Property,
        Self::Field,
        Self::LocalVariable,
        Self::ValueParameter,
        Self::Constructor,
        Self::Function,
        Self::PropertyGetter,
        Self::PropertySetter,
    ];

    /// Parse the name of an `AnnotationTarget` enum entry.
    #[must_use]
    pub fn from_entry(entry: &str) -> Option<Self> {
        Some(match entry {
            "CLASS" => Self::Class,
            "ANNOTATION_CLASS" => Self::AnnotationClass,
            "TYPE_PARAMETER" => Self::TypeParameter,
            "PROPERTY" => Self::Property,
            "FIELD" => Self::Field,
            "LOCAL_VARIABLE" => Self::LocalVariable,
            "VALUE_PARAMETER" => Self::ValueParameter,
            "CONSTRUCTOR" => Self::Constructor,
            "FUNCTION" => Self::Function,
            "PROPERTY_GETTER" => Self::PropertyGetter,
            "PROPERTY_SETTER" => Self::PropertySetter,
            "TYPE" => Self::Type,
            "EXPRESSION" => Self::Expression,
            "FILE" => Self::File,
            "TYPEALIAS" => Self::TypeAlias,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::AnnotationClass => "annotation class",
            Self::TypeParameter => "type parameter",
            Self::Property => "member property",
            Self::Field => "backing field",
            Self::LocalVariable => "local variable",
            Self::ValueParameter => "value parameter",
            Self::Constructor => "constructor",
            Self::Function => "function",
            Self::PropertyGetter => "getter",
            Self::PropertySetter => "setter",
            Self::Type => "type usage",
            Self::Expression => "expression",
            Self::File => "file",
            Self::TypeAlias => "typealias",
        }
    }
}

/// An annotation application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The annotation class.
    pub class: DeclId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_site_target: Option<UseSiteTarget>,
    /// Named arguments after mapping to the annotation constructor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<(String, ConstValue)>,
    pub source: Option<SourceElement>,
}

impl Annotation {
    #[must_use]
    pub const fn new(class: DeclId, source: Option<SourceElement>) -> Self {
        Self {
            class,
            use_site_target: None,
            arguments: Vec::new(),
            source,
        }
    }

    #[must_use]
    pub fn with_argument(mut self, name: &str, value: ConstValue) -> Self {
        self.arguments.push((name.to_string(), value));
        self
    }

    #[must_use]
    pub const fn with_use_site(mut self, target: UseSiteTarget) -> Self {
        self.use_site_target = Some(target);
        self
    }

    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&ConstValue> {
        self.arguments
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }
}
