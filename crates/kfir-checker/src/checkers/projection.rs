//! Use-site projections against declaration-site variance.
//!
//! `Source<in T>` for `class Source<out T>` conflicts; `Source<out T>` is
//! redundant. A projection that only conflicts once a type alias is expanded
//! gets its own diagnostic.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_tree::{ProjectionKind, Session, TypeData, TypeId, TypeProjection, TypeRef, Variance};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Relation {
    Conflicting,
    Redundant,
    None,
}

pub fn check(
    type_ref: &TypeRef,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    check_type_ref(type_ref, context, reporter);
    Ok(())
}

fn check_type_ref(
    type_ref: &TypeRef,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let TypeData::Class {
        arguments: written, ..
    } = session.type_data(type_ref.ty)
    else {
        return;
    };
    let expanded = session.fully_expand(type_ref.ty);
    let TypeData::Class { classifier, .. } = session.type_data(expanded) else {
        return;
    };
    let Some(class) = session.decl(classifier).as_class() else {
        return;
    };
    let through_alias = expanded != type_ref.ty;
    let generated = type_ref.source.is_some_and(|source| source.is_fake());

    for (index, (&parameter, actual)) in class.type_parameters.iter().zip(&written).enumerate() {
        let Some(argument_ref) = type_ref.arguments.get(index) else {
            continue;
        };
        let declared = session
            .decl(parameter)
            .as_type_parameter()
            .map_or(Variance::Invariant, |parameter| parameter.variance);
        let conflicts_in_expansion =
            through_alias && conflicts_after_expansion(session, type_ref.ty, index);

        let relation = match (actual.kind(), declared) {
            _ if conflicts_in_expansion => Relation::Conflicting,
            (ProjectionKind::In, Variance::Out) | (ProjectionKind::Out, Variance::In) => {
                Relation::Conflicting
            }
            (ProjectionKind::In, Variance::In) | (ProjectionKind::Out, Variance::Out) => {
                Relation::Redundant
            }
            _ => Relation::None,
        };

        if !generated {
            let source = argument_ref.source;
            match relation {
                Relation::Conflicting if through_alias => reporter.report_on(
                    source,
                    &errors::CONFLICTING_PROJECTION_IN_TYPEALIAS_EXPANSION,
                    (expanded,),
                    context,
                ),
                Relation::Conflicting => {
                    reporter.report_on(source, &errors::CONFLICTING_PROJECTION, (expanded,), context);
                }
                Relation::Redundant => {
                    reporter.report_on(source, &errors::REDUNDANT_PROJECTION, (expanded,), context);
                }
                Relation::None => {}
            }
        }
        check_type_ref(argument_ref, context, reporter);
    }
}

/// Whether argument `index` of the alias expansion of `ty` combines an `in`
/// and an `out` projection once the alias arguments are substituted.
fn conflicts_after_expansion(session: &Session, ty: TypeId, index: usize) -> bool {
    let TypeData::Class {
        classifier,
        arguments,
        ..
    } = session.type_data(ty)
    else {
        return false;
    };
    let declaration = session.decl(classifier);
    let Some(alias) = declaration.as_type_alias() else {
        return false;
    };
    let TypeData::Class {
        arguments: expansion,
        ..
    } = session.type_data(alias.expanded.ty)
    else {
        return false;
    };
    let Some(&TypeProjection::Type { kind: inner, ty }) = expansion.get(index) else {
        return false;
    };
    let Some(parameter) = session.type_parameter_of(ty) else {
        return false;
    };
    let Some(position) = alias.type_parameters.iter().position(|&p| p == parameter) else {
        return false;
    };
    let Some(outer) = arguments.get(position).map(TypeProjection::kind) else {
        return false;
    };
    matches!(
        (inner, outer),
        (ProjectionKind::In, ProjectionKind::Out) | (ProjectionKind::Out, ProjectionKind::In)
    )
}
