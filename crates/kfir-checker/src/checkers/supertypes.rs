//! Well-formedness of a class's supertype list.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_tree::{ClassKind, DeclId, Modality, ProjectionKind, TypeData, class_ids};
use rustc_hash::FxHashSet;

/// Each of these is reported once per class.
#[derive(Default)]
struct Reported {
    nullable: bool,
    interface_with_superclass: bool,
    final_supertype: bool,
    singleton: bool,
}

pub fn check(
    class: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let Some(class_decl) = session.decl(class).as_class() else {
        return Ok(());
    };
    let mut reported = Reported {
        interface_with_superclass: !class_decl.class_kind.is_interface(),
        ..Reported::default()
    };
    let mut class_appeared = false;
    let mut seen = FxHashSet::default();

    for entry in &class_decl.supertypes {
        let type_ref = &entry.type_ref;
        let context = context.with_suppressed_diagnostics(&type_ref.annotations);
        let source = type_ref.source;
        let data = session.type_data(type_ref.ty);

        if !reported.nullable && data.is_nullable() {
            reporter.report_on(source, &errors::NULLABLE_SUPERTYPE, (), &context);
            reported.nullable = true;
        }

        let TypeData::Class {
            classifier,
            arguments,
            ..
        } = data
        else {
            continue;
        };

        // Classes only; aliases are looked through below.
        if let Some(supertype) = session.decl(classifier).as_class() {
            if !seen.insert(classifier) {
                reporter.report_on(source, &errors::SUPERTYPE_APPEARS_TWICE, (), &context);
            }
            if !supertype.class_kind.is_interface() {
                if class_appeared {
                    reporter.report_on(source, &errors::MANY_CLASSES_IN_SUPERTYPE_LIST, (), &context);
                } else {
                    class_appeared = true;
                }
                if !reported.interface_with_superclass {
                    reporter.report_on(source, &errors::INTERFACE_WITH_SUPERCLASS, (), &context);
                    reported.interface_with_superclass = true;
                }
            }
            let is_object = supertype.class_kind == ClassKind::Object;
            if !reported.final_supertype
                && !is_object
                && session.decl(classifier).modality() == Some(Modality::Final)
            {
                reporter.report_on(source, &errors::FINAL_SUPERTYPE, (), &context);
                reported.final_supertype = true;
            }
            if !reported.singleton && is_object {
                reporter.report_on(source, &errors::SINGLETON_IN_SUPERTYPE, (), &context);
                reported.singleton = true;
            }
        }

        for annotation in &type_ref.annotations {
            if annotation.use_site_target.is_some() {
                let context =
                    context.with_suppressed_diagnostics(std::slice::from_ref(annotation));
                reporter.report_on(
                    annotation.source,
                    &errors::ANNOTATION_ON_SUPERCLASS,
                    (),
                    &context,
                );
            }
        }

        if let Some(expanded) = session.class_of(type_ref.ty) {
            if session.is_class(expanded, class_ids::ENUM) {
                reporter.report_on(
                    source,
                    &errors::CLASS_CANNOT_BE_EXTENDED_DIRECTLY,
                    (expanded,),
                    &context,
                );
            }
        }

        for (index, argument) in arguments.iter().enumerate() {
            if argument.kind() == ProjectionKind::Invariant {
                continue;
            }
            let argument_source = type_ref
                .arguments
                .get(index)
                .and_then(|argument| argument.source)
                .or(source);
            reporter.report_on(
                argument_source,
                &errors::PROJECTION_IN_IMMEDIATE_ARGUMENT_TO_SUPERTYPE,
                (),
                &context,
            );
        }
    }
    Ok(())
}
