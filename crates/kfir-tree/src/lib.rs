//! Resolved program graph for the kfir checkers.
//!
//! This crate models the output of name and type resolution:
//! - Declarations, expressions and interned types (`Declaration`, `Expression`, `TypeData`)
//! - The read-only query surface checkers use (`Session`)
//! - Type operations (substitution, alias expansion, subtyping)
//! - Override lookup through supertype member scopes
//! - `GraphBuilder` for constructing graphs in code

pub mod ids;
pub use ids::{ClassId, DeclId, ExprId, TypeId};

pub mod names;
pub use names::{class_ids, member_names};

pub mod visibility;
pub use visibility::{EffectiveVisibility, Modality, Visibility};

pub mod variance;
pub use variance::{EffectiveProjection, ProjectionKind, Variance};

pub mod types;
pub use types::{TypeArguments, TypeAttributes, TypeData, TypeInterner, TypeProjection, TypeRef};

pub mod annotations;
pub use annotations::{Annotation, AnnotationTarget, ConstValue, UseSiteTarget};

pub mod decl;
pub use decl::{
    AccessorDecl, AnonymousInitializerDecl, ClassDecl, ClassKind, ConstructorDecl, DeclKind,
    DeclKindTag, DeclStatus, Declaration, DelegationCall, FileDecl, FunctionDecl, Modifiers,
    PropertyDecl, ResolvePhase, SupertypeEntry, TypeAliasDecl, TypeParameterDecl,
    ValueParameterDecl,
};

pub mod expr;
pub use expr::{
    AccessKind, ArgumentMapping, ExprKind, ExprKindTag, ExprParent, Expression, Resolution, Symbol,
};

pub mod error;
pub use error::GraphError;

pub mod session;
pub use session::{Graph, Session};

pub mod type_ops;
pub use type_ops::{FunctionalKind, Substitution, TypeChecker};

pub mod scope;
pub use scope::{OverriddenMember, OverriddenMembers};

pub mod builder;
pub use builder::{DeclBuilder, GraphBuilder};
