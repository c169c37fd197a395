//! Inheritors of sealed classes and interfaces must live next to them.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_tree::{DeclId, Modality, Session};

pub fn check(
    class: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let Some(class_decl) = session.decl(class).as_class() else {
        return Ok(());
    };
    let local = session.is_local(class);

    for entry in &class_decl.supertypes {
        let Some(supertype) = sealed_supertype(session, entry.type_ref.ty) else {
            continue;
        };
        let context = context.with_suppressed_diagnostics(&entry.type_ref.annotations);
        let source = entry.type_ref.source;

        if local {
            let Some(supertype_decl) = session.decl(supertype).as_class() else {
                continue;
            };
            reporter.report_on(
                source,
                &errors::SEALED_SUPERTYPE_IN_LOCAL_CLASS,
                (class_decl.class_kind, supertype_decl.class_kind),
                &context,
            );
            return Ok(());
        }

        let package = session.package_of(class);
        let base_package = session.package_of(supertype);
        if package != base_package {
            reporter.report_on(
                source,
                &errors::SEALED_INHERITOR_IN_DIFFERENT_PACKAGE,
                (dotted(package), dotted(base_package)),
                &context,
            );
        }
        if session.module_of(class) != session.module_of(supertype) {
            reporter.report_on(
                source,
                &errors::SEALED_INHERITOR_IN_DIFFERENT_MODULE,
                (),
                &context,
            );
        }
    }
    Ok(())
}

/// The non-local sealed class behind a supertype, if any.
fn sealed_supertype(session: &Session, ty: kfir_tree::TypeId) -> Option<DeclId> {
    session.class_of(ty).filter(|&supertype| {
        !session.is_local(supertype) && session.decl(supertype).modality() == Some(Modality::Sealed)
    })
}

fn dotted(package: &str) -> String {
    package.replace('/', ".")
}
