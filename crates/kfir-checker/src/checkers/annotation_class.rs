//! Annotation class declarations: shape, parameter types, retention and
//! cycles through parameter types.

use super::annotation::allowed_targets;
use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_common::{RecursionGuard, RecursionProfile, RecursionResult, SourceElement};
use kfir_tree::{
    AnnotationTarget, ClassKind, ConstValue, DeclId, DeclKind, Modifiers, Session, TypeData,
    TypeId, TypeProjection, class_ids,
};
use rustc_hash::FxHashSet;

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
    if class_decl.class_kind != ClassKind::AnnotationClass {
        return Ok(());
    }

    if session.is_local(class) {
        reporter.report_on(
            declaration.source,
            &errors::LOCAL_ANNOTATION_CLASS_ERROR,
            (),
            context,
        );
    }

    // Producers may leave the implicit `Annotation` supertype out.
    let has_foreign_supertype = class_decl.supertypes.iter().any(|entry| {
        session
            .class_of(entry.type_ref.ty)
            .is_none_or(|supertype| !session.is_class(supertype, class_ids::ANNOTATION))
    });
    if has_foreign_supertype {
        reporter.report_on(
            declaration.source,
            &errors::SUPERTYPES_FOR_ANNOTATION_CLASS,
            (),
            context,
        );
    }

    for &member in &class_decl.members {
        let context = context.with_suppressed_diagnostics(&session.decl(member).annotations);
        check_member(member, &context, reporter);
    }

    if retention(session, class) != Retention::Source
        && allowed_targets(session, class).contains(&AnnotationTarget::Expression)
    {
        let anchor = [class_ids::RETENTION, class_ids::TARGET]
            .into_iter()
            .find_map(|class_id| session.find_annotation(&declaration.annotations, class_id))
            .map_or(declaration.source, |annotation| annotation.source);
        let factory =
            errors::RESTRICTED_RETENTION_FOR_EXPRESSION_ANNOTATION.choose(session.settings());
        reporter.report_on(anchor, factory, (), context);
    }

    check_cycles(class, context, reporter);
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Retention {
    Source,
    Binary,
    Runtime,
}

/// `@Retention` of an annotation class; `RUNTIME` when absent.
pub(crate) fn retention(session: &Session, annotation_class: DeclId) -> Retention {
    let declaration = session.decl(annotation_class);
    let entry = session
        .find_annotation(&declaration.annotations, class_ids::RETENTION)
        .and_then(|retention| retention.arguments.first())
        .and_then(|(_, value)| match value {
            ConstValue::Enum { entry, .. } => Some(entry.as_str()),
            _ => None,
        });
    match entry {
        Some("SOURCE") => Retention::Source,
        Some("BINARY") => Retention::Binary,
        _ => Retention::Runtime,
    }
}

fn check_member(
    member: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let declaration = session.decl(member);
    match &declaration.kind {
        DeclKind::Constructor(constructor) if constructor.is_primary => {
            for &parameter in &constructor.value_parameters {
                let context =
                    context.with_suppressed_diagnostics(&session.decl(parameter).annotations);
                check_parameter(parameter, &context, reporter);
            }
        }
        DeclKind::Class(_) => {}
        DeclKind::Property(property) if property.from_parameter.is_some() => {}
        DeclKind::Function(_) if declaration.has_fake_source() => {}
        _ => reporter.report_on(
            declaration.source,
            &errors::ANNOTATION_CLASS_MEMBER,
            (),
            context,
        ),
    }
}

fn check_parameter(
    parameter: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let declaration = session.decl(parameter);
    let Some(value_parameter) = declaration.as_value_parameter() else {
        return;
    };
    if declaration.has_fake_source() {
        return;
    }

    if declaration.has_modifier(Modifiers::VAR) {
        reporter.report_on(
            declaration.source,
            &errors::VAR_ANNOTATION_PARAMETER,
            (),
            context,
        );
    } else if !declaration.has_modifier(Modifiers::VAL) {
        reporter.report_on(
            declaration.source,
            &errors::MISSING_VAL_ON_ANNOTATION_PARAMETER,
            (),
            context,
        );
    }

    let type_ref = &value_parameter.type_ref;
    let ty = type_ref.ty;
    let anchor = type_ref.source.or(declaration.source);
    let context = context.with_suppressed_diagnostics(&type_ref.annotations);
    let TypeData::Class {
        classifier,
        arguments,
        nullable,
        ..
    } = session.type_data(session.fully_expand(ty))
    else {
        if !session.is_error(ty) {
            reporter.report_on(
                anchor,
                &errors::INVALID_TYPE_OF_ANNOTATION_MEMBER,
                (),
                &context,
            );
        }
        return;
    };
    if nullable {
        reporter.report_on(
            anchor,
            &errors::NULLABLE_TYPE_OF_ANNOTATION_MEMBER,
            (),
            &context,
        );
        return;
    }
    let class_id = session.class_id_of(classifier).unwrap_or_default();
    let allowed = class_ids::PRIMITIVES.contains(&class_id)
        || class_ids::UNSIGNED.contains(&class_id)
        || class_ids::is_primitive_array(class_id)
        || class_ids::is_unsigned_array(class_id)
        || class_id == class_ids::STRING
        || class_id == class_ids::KCLASS
        || (class_id == class_ids::ARRAY && is_allowed_array_element(session, &arguments))
        || is_enum_or_annotation(session, classifier);
    if !allowed {
        reporter.report_on(
            anchor,
            &errors::INVALID_TYPE_OF_ANNOTATION_MEMBER,
            (),
            &context,
        );
    }
}

fn is_enum_or_annotation(session: &Session, class: DeclId) -> bool {
    session.decl(class).as_class().is_some_and(|class| {
        matches!(
            class.class_kind,
            ClassKind::EnumClass | ClassKind::AnnotationClass
        )
    })
}

/// `Array<T>` is allowed for non-null `String`, `KClass`, enum and
/// annotation elements.
fn is_allowed_array_element(session: &Session, arguments: &[TypeProjection]) -> bool {
    let [TypeProjection::Type { ty, .. }] = arguments else {
        return false;
    };
    match session.type_data(session.fully_expand(*ty)) {
        TypeData::Class {
            classifier,
            nullable: false,
            ..
        } => {
            session.is_class(classifier, class_ids::STRING)
                || session.is_class(classifier, class_ids::KCLASS)
                || is_enum_or_annotation(session, classifier)
        }
        _ => false,
    }
}

fn check_cycles(
    class: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let Some(constructor) = primary_constructor(session, class) else {
        return;
    };
    let mut checker = CycleChecker::new(session, class);
    for &parameter in session.decl(constructor).value_parameters() {
        if checker.parameter_has_cycle(class, parameter) {
            tracing::debug!(
                class = %session.render_decl(class),
                parameter = %session.render_decl(parameter),
                "annotation parameter cycle"
            );
            let declaration = session.decl(parameter);
            let context = context.with_suppressed_diagnostics(&declaration.annotations);
            let source: Option<SourceElement> = declaration.source;
            reporter.report_on(source, &errors::CYCLE_IN_ANNOTATION_PARAMETER, (), &context);
        }
    }
}

fn primary_constructor(session: &Session, class: DeclId) -> Option<DeclId> {
    session
        .decl(class)
        .as_class()?
        .members
        .iter()
        .copied()
        .find(|&member| {
            session
                .decl(member)
                .as_constructor()
                .is_some_and(|constructor| constructor.is_primary)
        })
}

/// Walks annotation classes reachable through parameter types, starting
/// afresh for every checked class. The target starts out both visited and
/// cyclic, so reaching it again marks the referencing class.
struct CycleChecker<'s> {
    session: &'s Session,
    visited: FxHashSet<DeclId>,
    with_cycle: FxHashSet<DeclId>,
    /// Bounds the depth of the chain being followed.
    guard: RecursionGuard<DeclId>,
}

impl<'s> CycleChecker<'s> {
    fn new(session: &'s Session, target: DeclId) -> Self {
        let mut visited = FxHashSet::default();
        visited.insert(target);
        let mut with_cycle = FxHashSet::default();
        with_cycle.insert(target);
        Self {
            session,
            visited,
            with_cycle,
            guard: RecursionGuard::with_profile(RecursionProfile::DeclarationGraph),
        }
    }

    fn annotation_has_cycle(&mut self, annotation: DeclId) -> bool {
        let Some(constructor) = primary_constructor(self.session, annotation) else {
            return false;
        };
        let session = self.session;
        session
            .decl(constructor)
            .value_parameters()
            .iter()
            .any(|&parameter| self.parameter_has_cycle(annotation, parameter))
    }

    fn parameter_has_cycle(&mut self, owner: DeclId, parameter: DeclId) -> bool {
        let session = self.session;
        let declaration = session.decl(parameter);
        let Some(value_parameter) = declaration.as_value_parameter() else {
            return false;
        };
        if declaration.has_modifier(Modifiers::VARARG) {
            return false;
        }
        let ty = value_parameter.type_ref.ty;
        match session.type_data(ty) {
            TypeData::Class {
                classifier,
                arguments,
                ..
            } if !arguments.is_empty() => {
                if session.is_class(classifier, class_ids::ARRAY)
                    || session.is_class(classifier, class_ids::KCLASS)
                {
                    return false;
                }
                arguments.iter().any(|argument| match *argument {
                    TypeProjection::Type { ty, .. } => self.type_has_cycle(owner, ty),
                    TypeProjection::Star => false,
                })
            }
            _ => self.type_has_cycle(owner, ty),
        }
    }

    fn type_has_cycle(&mut self, owner: DeclId, ty: TypeId) -> bool {
        let session = self.session;
        let Some(referenced) = session
            .class_of(session.fully_expand(ty))
            .filter(|&class| {
                session
                    .decl(class)
                    .as_class()
                    .is_some_and(|class| class.class_kind == ClassKind::AnnotationClass)
            })
        else {
            return false;
        };
        if !self.visited.insert(referenced) {
            let cyclic = self.with_cycle.contains(&referenced);
            if cyclic {
                self.with_cycle.insert(owner);
            }
            return cyclic;
        }
        match self.guard.enter(referenced) {
            RecursionResult::Entered => {
                let cyclic = self.annotation_has_cycle(referenced);
                self.guard.leave(referenced);
                cyclic
            }
            denied => {
                tracing::warn!(
                    class = %session.render_decl(referenced),
                    ?denied,
                    "annotation parameter walk stopped"
                );
                false
            }
        }
    }
}
