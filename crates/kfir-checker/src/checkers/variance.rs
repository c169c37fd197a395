//! Declaration-site variance of a class's type parameters.
//!
//! Every occurrence of a class type parameter is checked against the
//! variance its position requires: OUT for supertypes, class bounds and
//! return types, IN for value parameters, receivers and member bounds,
//! INVARIANT for the type of a `var`. Positions inside type arguments are
//! derived through the effective projection of the argument.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_common::{RecursionGuard, RecursionProfile, RecursionResult, SourceElement};
use kfir_tree::{
    DeclId, DeclKindTag, EffectiveProjection, TypeAttributes, TypeData, TypeId, TypeProjection,
    TypeRef, Variance,
};

pub fn check(
    class: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let declaration = session.decl(class);
    let Some(class_decl) = declaration.as_class() else {
        return Ok(());
    };

    check_type_parameter_bounds(&class_decl.type_parameters, Variance::Out, context, reporter);

    for entry in &class_decl.supertypes {
        let context = context.with_suppressed_diagnostics(&entry.type_ref.annotations);
        check_type_ref(&entry.type_ref, Variance::Out, None, &context, reporter);
    }

    for &member in &class_decl.members {
        let member_decl = session.decl(member);
        if member_decl.visibility().is_private() || member_decl.as_class().is_some() {
            continue;
        }
        check_type_parameter_bounds(member_decl.type_parameters(), Variance::In, context, reporter);
        if matches!(
            member_decl.tag(),
            DeclKindTag::Function | DeclKindTag::Property | DeclKindTag::Constructor
        ) {
            let context = context.with_suppressed_diagnostics(&member_decl.annotations);
            check_callable(member, &context, reporter);
        }
    }
    Ok(())
}

fn check_callable(
    member: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let declaration = session.decl(member);
    let member_source = declaration.source;
    let member_is_real = member_source.is_some_and(|source| !source.is_fake());

    if declaration.tag() == DeclKindTag::Function && member_is_real {
        for &parameter in declaration.value_parameters() {
            let parameter_decl = session.decl(parameter);
            let Some(type_ref) = parameter_decl.return_type_ref() else {
                continue;
            };
            let context = context.with_suppressed_diagnostics(&parameter_decl.annotations);
            check_type_ref(type_ref, Variance::In, None, &context, reporter);
        }
    }

    if let Some(return_type) = declaration.return_type_ref() {
        let position = if declaration.tag() == DeclKindTag::Property && declaration.is_var() {
            Variance::Invariant
        } else {
            Variance::Out
        };
        let anchor = match return_type.source {
            Some(source) if source.is_fake() && member_is_real => member_source,
            None if member_is_real => member_source,
            _ => None,
        };
        let context = context.with_suppressed_diagnostics(&return_type.annotations);
        check_type_ref(return_type, position, anchor, &context, reporter);
    }

    if let Some(receiver) = declaration.receiver_type_ref() {
        let context = context.with_suppressed_diagnostics(&receiver.annotations);
        check_type_ref(receiver, Variance::In, None, &context, reporter);
    }
}

fn check_type_parameter_bounds(
    type_parameters: &[DeclId],
    position: Variance,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    for &parameter in type_parameters {
        let declaration = session.decl(parameter);
        let Some(type_parameter) = declaration.as_type_parameter() else {
            continue;
        };
        let context = context.with_suppressed_diagnostics(&declaration.annotations);
        for bound in &type_parameter.bounds {
            let context = context.with_suppressed_diagnostics(&bound.annotations);
            check_type_ref(bound, position, None, &context, reporter);
        }
    }
}

fn check_type_ref(
    type_ref: &TypeRef,
    position: Variance,
    anchor: Option<SourceElement>,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let source = anchor.or_else(|| real_source(type_ref));
    VarianceWalk {
        context,
        containing_type: type_ref.ty,
        guard: RecursionGuard::with_profile(RecursionProfile::VariancePositions),
    }
    .check(type_ref.ty, position, Some(type_ref), source, false, reporter);
}

/// Fake sources only anchor a diagnostic through a real ancestor.
fn real_source(type_ref: &TypeRef) -> Option<SourceElement> {
    type_ref.source.filter(|source| !source.is_fake())
}

struct VarianceWalk<'a, 's> {
    context: &'a CheckerContext<'s>,
    containing_type: TypeId,
    /// Bounds the descent into nested type arguments.
    guard: RecursionGuard<TypeId>,
}

impl VarianceWalk<'_, '_> {
    fn check(
        &mut self,
        ty: TypeId,
        position: Variance,
        type_ref: Option<&TypeRef>,
        source: Option<SourceElement>,
        in_abbreviation: bool,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        match self.guard.enter(ty) {
            RecursionResult::Entered => {
                self.check_entered(ty, position, type_ref, source, in_abbreviation, reporter);
                self.guard.leave(ty);
            }
            denied => {
                tracing::warn!(
                    ty = ?ty,
                    depth = self.guard.depth(),
                    ?denied,
                    "variance walk stopped"
                );
            }
        }
    }

    fn check_entered(
        &mut self,
        ty: TypeId,
        position: Variance,
        type_ref: Option<&TypeRef>,
        source: Option<SourceElement>,
        in_abbreviation: bool,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let session = self.context.session();
        match session.type_data(ty) {
            TypeData::TypeParameter {
                parameter,
                attributes,
                ..
            } => {
                let Some(declared) = session
                    .decl(parameter)
                    .as_type_parameter()
                    .map(|type_parameter| type_parameter.variance)
                else {
                    return;
                };
                if declared.allows_position(position)
                    || attributes.contains(TypeAttributes::UNSAFE_VARIANCE)
                {
                    return;
                }
                let factory = if in_abbreviation {
                    &errors::TYPE_VARIANCE_CONFLICT_IN_EXPANDED_TYPE
                } else {
                    &errors::TYPE_VARIANCE_CONFLICT_ERROR
                };
                reporter.report_on(
                    source,
                    factory,
                    (parameter, declared, position, self.containing_type),
                    self.context,
                );
            }
            TypeData::Class { .. } => {
                let expanded = session.fully_expand(ty);
                let TypeData::Class {
                    classifier,
                    arguments,
                    ..
                } = session.type_data(expanded)
                else {
                    return;
                };
                let Some(class) = session.decl(classifier).as_class() else {
                    return;
                };
                let abbreviated = expanded != ty;
                for (index, argument) in arguments.iter().enumerate() {
                    let Some(&formal) = class.type_parameters.get(index) else {
                        continue;
                    };
                    let Some(formal) = session.decl(formal).as_type_parameter() else {
                        continue;
                    };
                    let TypeProjection::Type { kind, ty: argument } = *argument else {
                        continue;
                    };
                    let Some(projected) = kind.variance() else {
                        continue;
                    };
                    // A conflicting projection is reported by the projection checker.
                    let Some(required) =
                        EffectiveProjection::compute(formal.variance, projected).apply(position)
                    else {
                        continue;
                    };
                    let argument_ref = if abbreviated {
                        None
                    } else {
                        type_ref.and_then(|type_ref| type_ref.arguments.get(index))
                    };
                    let argument_source = argument_ref.and_then(real_source).or(source);
                    self.check(
                        argument,
                        required,
                        argument_ref,
                        argument_source,
                        abbreviated,
                        reporter,
                    );
                }
            }
            TypeData::Error => {}
        }
    }
}
