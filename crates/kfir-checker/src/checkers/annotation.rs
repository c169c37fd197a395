//! Annotation applications on any declaration: target applicability,
//! use-site targets and repetition.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_common::{FakeSourceKind, LanguageFeature};
use kfir_tree::{
    Annotation, AnnotationTarget, ClassKind, DeclId, DeclKind, Declaration, Session, TypeRef,
    UseSiteTarget, class_ids,
};
use smallvec::SmallVec;

type Targets = SmallVec<[AnnotationTarget; 4]>;

/// Targets a declaration offers to annotations.
#[derive(Default)]
struct ActualTargets {
    /// Where an annotation without use-site target lands.
    defaults: Targets,
    /// Accepted in place of the defaults when those are not applicable.
    substitutes: Targets,
    /// Reachable only through an explicit use-site target.
    use_site_only: Targets,
}

impl ActualTargets {
    fn of(session: &Session, decl: DeclId) -> Self {
        use AnnotationTarget as T;
        let declaration = session.decl(decl);
        let mut targets = Self::default();
        match &declaration.kind {
            DeclKind::File(_) => targets.defaults.push(T::File),
            DeclKind::Class(class) => match class.class_kind {
                ClassKind::AnnotationClass => targets.defaults.extend([T::AnnotationClass, T::Class]),
                ClassKind::EnumEntry => targets.defaults.extend([T::Property, T::Field]),
                ClassKind::AnonymousObject => targets.defaults.push(T::Expression),
                _ => targets.defaults.push(T::Class),
            },
            DeclKind::Function(_) => targets.defaults.push(T::Function),
            DeclKind::Property(property) => {
                targets.defaults.push(T::Property);
                if property.has_backing_field {
                    targets.substitutes.push(T::Field);
                }
                targets.use_site_only.push(T::PropertyGetter);
                if declaration.is_var() {
                    targets
                        .use_site_only
                        .extend([T::PropertySetter, T::ValueParameter]);
                }
                if property.delegate.is_some() {
                    targets.use_site_only.push(T::Field);
                }
                if property.from_parameter.is_some() {
                    targets.use_site_only.push(T::ValueParameter);
                }
            }
            DeclKind::PropertyAccessor(accessor) => targets.defaults.push(if accessor.is_getter {
                T::PropertyGetter
            } else {
                T::PropertySetter
            }),
            DeclKind::ValueParameter(_) => targets.defaults.push(T::ValueParameter),
            DeclKind::Constructor(_) => targets.defaults.push(T::Constructor),
            DeclKind::TypeParameter(_) => targets.defaults.push(T::TypeParameter),
            DeclKind::TypeAlias(_) => targets.defaults.push(T::TypeAlias),
            DeclKind::AnonymousInitializer(_) => {}
        }
        targets
    }
}

/// Targets an annotation class accepts: its `@Target` entries, or the
/// default set when it has none.
pub(crate) fn allowed_targets(session: &Session, annotation_class: DeclId) -> SmallVec<[AnnotationTarget; 9]> {
    let declaration = session.decl(annotation_class);
    match session.find_annotation(&declaration.annotations, class_ids::TARGET) {
        Some(target) => target
            .arguments
            .iter()
            .flat_map(|(_, value)| value.enum_entries())
            .filter_map(AnnotationTarget::from_entry)
            .collect(),
        None => AnnotationTarget::DEFAULT_TARGETS.into_iter().collect(),
    }
}

pub(crate) fn is_repeatable(session: &Session, annotation_class: DeclId) -> bool {
    session.supports_feature(LanguageFeature::RepeatableAnnotations)
        && session.has_annotation(annotation_class, class_ids::REPEATABLE)
}

pub fn check(
    decl: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let declaration = session.decl(decl);

    if !declaration.annotations.is_empty() {
        let actual = ActualTargets::of(session, decl);
        for annotation in &declaration.annotations {
            let context = context.with_suppressed_diagnostics(std::slice::from_ref(annotation));
            check_target(decl, declaration, annotation, &actual, &context, reporter);
        }
        check_repeated(&declaration.annotations, context, reporter);
    }

    match &declaration.kind {
        DeclKind::Property(_) => check_repeated_in_property(decl, context, reporter),
        DeclKind::Function(_) if !declaration.has_fake_source() => {
            if let Some(return_type) = declaration.return_type_ref() {
                check_repeated_in_type(return_type, context, reporter);
            }
        }
        DeclKind::TypeAlias(alias) => check_repeated_in_type(&alias.expanded, context, reporter),
        _ => {}
    }
    Ok(())
}

fn check_target(
    decl: DeclId,
    declaration: &Declaration,
    annotation: &Annotation,
    actual: &ActualTargets,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let applicable = allowed_targets(session, annotation.class);
    let use_site = annotation.use_site_target;

    if let Some(target) = use_site {
        check_use_site_target(decl, declaration, annotation, target, context, reporter);
    }

    let matches = |targets: &Targets| {
        targets.iter().any(|target| {
            applicable.contains(target)
                && use_site.is_none_or(|use_site| use_site.annotation_target() == *target)
        })
    };
    let through_use_site = use_site.is_some_and(|use_site| {
        let mapped = use_site.annotation_target();
        actual
            .use_site_only
            .iter()
            .any(|target| *target == mapped && applicable.contains(target))
    });
    if matches(&actual.defaults) || matches(&actual.substitutes) || through_use_site {
        return;
    }

    let description = actual
        .defaults
        .first()
        .map_or("unidentified target", |target| target.description());
    match use_site {
        Some(use_site) => reporter.report_on(
            annotation.source,
            &errors::WRONG_ANNOTATION_TARGET_WITH_USE_SITE_TARGET,
            (description, use_site),
            context,
        ),
        None => {
            let from_parameter = declaration.as_property().is_some()
                && declaration
                    .source
                    .and_then(|source| source.fake_kind())
                    == Some(FakeSourceKind::PropertyFromParameter);
            if !from_parameter {
                reporter.report_on(
                    annotation.source,
                    &errors::WRONG_ANNOTATION_TARGET,
                    (description,),
                    context,
                );
            }
        }
    }
}

fn check_use_site_target(
    decl: DeclId,
    declaration: &Declaration,
    annotation: &Annotation,
    target: UseSiteTarget,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let source = annotation.source;
    match target {
        UseSiteTarget::Property | UseSiteTarget::Get | UseSiteTarget::Field => {}
        UseSiteTarget::Delegate => {
            if declaration
                .as_property()
                .is_some_and(|property| property.delegate.is_none())
            {
                reporter.report_on(
                    source,
                    &errors::INAPPLICABLE_TARGET_PROPERTY_HAS_NO_DELEGATE,
                    (),
                    context,
                );
            }
        }
        UseSiteTarget::Set | UseSiteTarget::SetParam => {
            if declaration.as_property().is_none() || session.is_local(decl) {
                reporter.report_on(
                    source,
                    &errors::INAPPLICABLE_TARGET_ON_PROPERTY,
                    (target,),
                    context,
                );
            } else if !declaration.is_var() {
                reporter.report_on(
                    source,
                    &errors::INAPPLICABLE_TARGET_PROPERTY_IMMUTABLE,
                    (target,),
                    context,
                );
            }
        }
        UseSiteTarget::Param => {
            if declaration.as_value_parameter().is_some() {
                let in_primary_constructor = declaration
                    .parent
                    .and_then(|container| session.decl(container).as_constructor())
                    .is_some_and(|constructor| constructor.is_primary);
                if !in_primary_constructor {
                    reporter.report_on(source, &errors::INAPPLICABLE_PARAM_TARGET, (), context);
                } else if !has_val_or_var(declaration) {
                    reporter.report_on(
                        source,
                        &errors::REDUNDANT_ANNOTATION_TARGET,
                        (target,),
                        context,
                    );
                }
            } else if declaration
                .as_property()
                .is_none_or(|property| property.from_parameter.is_none())
            {
                reporter.report_on(source, &errors::INAPPLICABLE_PARAM_TARGET, (), context);
            }
        }
        UseSiteTarget::File => {
            if declaration.as_file().is_none() {
                reporter.report_on(source, &errors::INAPPLICABLE_FILE_TARGET, (), context);
            }
        }
        UseSiteTarget::Receiver => reporter.report_on(
            source,
            &errors::WRONG_ANNOTATION_TARGET_WITH_USE_SITE_TARGET,
            ("declaration", target),
            context,
        ),
    }
}

fn has_val_or_var(declaration: &Declaration) -> bool {
    declaration.has_modifier(kfir_tree::Modifiers::VAL)
        || declaration.has_modifier(kfir_tree::Modifiers::VAR)
}

/// The same non-repeatable annotation twice with the same use-site target.
fn check_repeated(
    annotations: &[Annotation],
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    for (index, annotation) in annotations.iter().enumerate() {
        let repeated = annotations[..index].iter().any(|earlier| {
            earlier.class == annotation.class && earlier.use_site_target == annotation.use_site_target
        });
        if repeated && !is_repeatable(session, annotation.class) {
            reporter.report_on(annotation.source, &errors::REPEATED_ANNOTATION, (), context);
        }
    }
}

fn check_repeated_in_type(
    type_ref: &TypeRef,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let context = context.with_suppressed_diagnostics(&type_ref.annotations);
    check_repeated(&type_ref.annotations, &context, reporter);
    for argument in &type_ref.arguments {
        check_repeated_in_type(argument, &context, reporter);
    }
}

/// `@get:A val p` combined with `@A` on the getter itself, and likewise for
/// the setter and its parameter.
fn check_repeated_in_property(
    property: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let declaration = session.decl(property);
    let Some(property_decl) = declaration.as_property() else {
        return;
    };
    let annotations_of = |decl: Option<DeclId>| -> Vec<DeclId> {
        decl.map(|decl| {
            session
                .decl(decl)
                .annotations
                .iter()
                .map(|annotation| annotation.class)
                .collect()
        })
        .unwrap_or_default()
    };
    let setter_parameter = property_decl
        .setter
        .and_then(|setter| session.decl(setter).value_parameters().first().copied());
    let getter = annotations_of(property_decl.getter);
    let setter = annotations_of(property_decl.setter);
    let setter_param = annotations_of(setter_parameter);

    let factory = errors::REPEATED_USE_SITE_TARGET_ANNOTATION.choose(session.settings());
    for annotation in &declaration.annotations {
        let existing = match annotation.use_site_target {
            Some(UseSiteTarget::Get) => &getter,
            Some(UseSiteTarget::Set) => &setter,
            Some(UseSiteTarget::SetParam) => &setter_param,
            _ => continue,
        };
        let is_fake = annotation.source.is_some_and(|source| source.is_fake());
        if existing.contains(&annotation.class)
            && !is_repeatable(session, annotation.class)
            && !is_fake
        {
            let context = context.with_suppressed_diagnostics(std::slice::from_ref(annotation));
            reporter.report_on(annotation.source, factory, (), &context);
        }
    }
}
