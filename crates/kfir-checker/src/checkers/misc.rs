//! Small single-rule checkers.

use super::owning_class;
use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_tree::{DeclId, Modifiers, Session, class_ids};

/// At most one `companion object` per class.
pub fn check_companions(
    class: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let Some(class_decl) = session.decl(class).as_class() else {
        return Ok(());
    };
    let mut companions = class_decl.members.iter().map(|&member| session.decl(member)).filter(
        |member| member.as_class().is_some() && member.has_modifier(Modifiers::COMPANION),
    );
    let _first = companions.next();
    for extra in companions {
        let context = context.with_suppressed_diagnostics(&extra.annotations);
        reporter.report_on(extra.source, &errors::MANY_COMPANION_OBJECTS, (), &context);
    }
    Ok(())
}

pub fn check_lateinit(
    property: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let declaration = session.decl(property);
    let Some(property_decl) = declaration.as_property() else {
        return Ok(());
    };
    let ty = property_decl.return_type.ty;
    if !declaration.has_modifier(Modifiers::LATEINIT) || session.is_error(ty) {
        return Ok(());
    }

    let local = session.is_local(property);
    let custom_accessor = |accessor: Option<DeclId>| {
        accessor.is_some_and(|accessor| !session.decl(accessor).has_fake_source())
    };
    let reason = if !declaration.is_var() {
        Some("is allowed only on mutable properties")
    } else if property_decl.initializer.is_some() {
        Some(if local {
            "is not allowed on local variables with initializer"
        } else {
            "is not allowed on properties with initializer"
        })
    } else if property_decl.delegate.is_some() {
        Some("is not allowed on delegated properties")
    } else if session.is_nullable(ty) {
        Some("is not allowed on properties of a type with nullable upper bound")
    } else if is_primitive(session, ty) {
        Some(if local {
            "is not allowed on local variables of primitive types"
        } else {
            "is not allowed on properties of primitive types"
        })
    } else if custom_accessor(property_decl.getter) || custom_accessor(property_decl.setter) {
        Some("is not allowed on properties with a custom getter or setter")
    } else {
        None
    };

    if let Some(reason) = reason {
        reporter.report_on(
            declaration.source,
            &errors::INAPPLICABLE_LATEINIT_MODIFIER,
            (reason,),
            context,
        );
    }
    Ok(())
}

fn is_primitive(session: &Session, ty: kfir_tree::TypeId) -> bool {
    session
        .class_of(ty)
        .and_then(|class| session.class_id_of(class))
        .is_some_and(|class_id| class_ids::PRIMITIVES.contains(&class_id))
}

/// `init { }` blocks cannot appear in interfaces.
pub fn check_anonymous_initializer(
    initializer: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let Some(class) = owning_class(context, initializer) else {
        return Ok(());
    };
    let is_interface = session
        .decl(class)
        .as_class()
        .is_some_and(|class| class.class_kind.is_interface());
    if is_interface {
        reporter.report_on(
            session.decl(initializer).source,
            &errors::ANONYMOUS_INITIALIZER_IN_INTERFACE,
            (),
            context,
        );
    }
    Ok(())
}
