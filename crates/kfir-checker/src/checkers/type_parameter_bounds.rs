//! Upper bounds of a single type parameter.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_tree::{
    ClassKind, DeclId, DeclKind, Modality, ProjectionKind, Session, TypeData, TypeId,
    TypeProjection, TypeRef, Variance, class_ids,
};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

pub fn check(
    parameter: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let declaration = session.decl(parameter);
    let Some(type_parameter) = declaration.as_type_parameter() else {
        return Ok(());
    };
    let Some(container) = declaration.parent else {
        return Ok(());
    };
    let container_decl = session.decl(container);
    let bounds = &type_parameter.bounds;

    match &container_decl.kind {
        DeclKind::Constructor(_) => return Ok(()),
        DeclKind::TypeAlias(_) => {
            for bound in bounds.iter().filter(|bound| !bound.is_implicit()) {
                reporter.report_on(
                    bound.source,
                    &errors::BOUND_ON_TYPE_ALIAS_PARAMETER_NOT_ALLOWED,
                    (),
                    context,
                );
            }
        }
        _ => {}
    }

    let in_override = matches!(container_decl.kind, DeclKind::Function(_) | DeclKind::Property(_))
        && container_decl.is_override();
    if !in_override {
        for bound in bounds {
            if !can_have_subtypes(session, bound.ty) {
                reporter.report_on(bound.source, &errors::FINAL_UPPER_BOUND, (bound.ty,), context);
            }
        }
    }

    if !session.has_annotation(container, class_ids::INLINE_ONLY) {
        check_bounded_by_type_parameter(declaration.source, bounds, context, reporter);
    }
    check_uniqueness(bounds, context, reporter);

    if bounds.len() >= 2 && has_conflicting_bounds(session, bounds) {
        reporter.report_on(
            declaration.source,
            &errors::CONFLICTING_UPPER_BOUNDS,
            (parameter,),
            context,
        );
    }
    Ok(())
}

/// `T : U` forbids any other bound.
fn check_bounded_by_type_parameter(
    source: Option<kfir_common::SourceElement>,
    bounds: &[TypeRef],
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let mut distinct: SmallVec<[TypeId; 4]> = SmallVec::new();
    for bound in bounds {
        if !distinct.contains(&bound.ty) {
            distinct.push(bound.ty);
        }
    }
    let (with_parameter, others): (SmallVec<[TypeId; 4]>, SmallVec<[TypeId; 4]>) = distinct
        .into_iter()
        .partition(|&ty| session.type_parameter_of(ty).is_some());
    if with_parameter.len() > 1 || (with_parameter.len() == 1 && !others.is_empty()) {
        reporter.report_on(
            source,
            &errors::BOUNDS_NOT_ALLOWED_IF_BOUNDED_BY_TYPE_PARAMETER,
            (),
            context,
        );
    }
}

#[derive(PartialEq, Eq, Hash)]
enum BoundKey {
    Class(DeclId),
    Type(TypeId),
}

fn check_uniqueness(
    bounds: &[TypeRef],
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let mut seen_keys = FxHashSet::default();
    let mut seen_classes = FxHashSet::default();
    for bound in bounds.iter().filter(|bound| !session.is_error(bound.ty)) {
        let class = session.class_of(bound.ty);
        let key = class.map_or(BoundKey::Type(bound.ty), BoundKey::Class);
        if !seen_keys.insert(key) {
            reporter.report_on(bound.source, &errors::REPEATED_BOUND, (), context);
            continue;
        }
        let Some(class) = class else {
            continue;
        };
        let is_class_like = session.decl(class).as_class().is_some_and(|class| {
            matches!(
                class.class_kind,
                ClassKind::Class | ClassKind::EnumClass | ClassKind::Object
            )
        });
        if is_class_like && seen_classes.insert(class) && seen_classes.len() > 1 {
            reporter.report_on(bound.source, &errors::ONLY_ONE_CLASS_BOUND_ALLOWED, (), context);
        }
    }
}

/// A bound that cannot have subtypes must be related to every other bound.
fn has_conflicting_bounds(session: &Session, bounds: &[TypeRef]) -> bool {
    bounds.iter().any(|bound| {
        !can_have_subtypes(session, bound.ty)
            && bounds.iter().any(|other| {
                other.ty != bound.ty
                    && !session.is_subtype(bound.ty, other.ty)
                    && !session.is_subtype(other.ty, bound.ty)
            })
    })
}

/// Whether some other type is a proper subtype of `ty`.
pub(crate) fn can_have_subtypes(session: &Session, ty: TypeId) -> bool {
    let TypeData::Class {
        classifier,
        arguments,
        ..
    } = session.type_data(session.fully_expand(ty))
    else {
        return true;
    };
    let declaration = session.decl(classifier);
    let Some(class) = declaration.as_class() else {
        return true;
    };
    if declaration.modality() != Some(Modality::Final) {
        return true;
    }
    class
        .type_parameters
        .iter()
        .zip(arguments.iter())
        .any(|(&formal, argument)| {
            let declared = session
                .decl(formal)
                .as_type_parameter()
                .map_or(Variance::Invariant, |formal| formal.variance);
            match *argument {
                TypeProjection::Star => true,
                TypeProjection::Type { kind, ty } => {
                    (kind != ProjectionKind::Invariant || declared != Variance::Invariant)
                        && can_have_subtypes(session, ty)
                }
            }
        })
}
