//! Structural checkers.
//!
//! Each submodule exposes plain `check` functions with the
//! [`DeclarationCheck`](crate::registry::DeclarationCheck) (or expression /
//! type-reference) signature; [`CheckerRegistry::with_defaults`](crate::registry::CheckerRegistry::with_defaults)
//! wires them to declaration kinds.

pub mod accessor;
pub mod annotation;
pub mod annotation_class;
pub mod constructor_delegation;
pub mod inline;
pub mod inline_visitor;
pub mod misc;
pub mod override_checker;
pub mod projection;
pub mod sealed;
pub mod supertypes;
pub mod type_parameter_bounds;
pub mod unused_expression;
pub mod value_class;
pub mod variance;

use crate::context::CheckerContext;
use kfir_tree::{ClassKind, DeclId, Modality};

/// Whether `class` may declare abstract members.
pub(crate) fn can_have_abstract_members(context: &CheckerContext<'_>, class: DeclId) -> bool {
    let declaration = context.session().decl(class);
    let Some(class_decl) = declaration.as_class() else {
        return false;
    };
    class_decl.class_kind == ClassKind::Interface
        || matches!(
            declaration.modality(),
            Some(Modality::Abstract | Modality::Sealed)
        )
}

/// The owning class when `decl` is a direct member of one.
pub(crate) fn owning_class(context: &CheckerContext<'_>, decl: DeclId) -> Option<DeclId> {
    let session = context.session();
    session
        .decl(decl)
        .parent
        .filter(|&parent| session.decl(parent).as_class().is_some())
}
