//! Inline functions and accessors: parameter modifiers, overridability and
//! the body walk of [`InlineBodyVisitor`].

use super::inline_visitor::InlineBodyVisitor;
use super::owning_class;
use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_tree::{DeclId, Declaration, EffectiveVisibility, Modifiers, Session, class_ids};

pub fn check(
    function: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let declaration = session.decl(function);
    if declaration.as_function().is_none() && declaration.as_accessor().is_none() {
        return Ok(());
    }
    if !is_inline(session, declaration) {
        check_parameters_of_non_inline(declaration, context, reporter);
        return Ok(());
    }

    if let Some(body) = declaration.body() {
        InlineBodyVisitor::new(session, function).visit_body(body, context, reporter)?;
    }
    if declaration.as_function().is_some() {
        check_function(function, context, reporter);
    }
    Ok(())
}

/// Accessors of an `inline` property are inline too.
fn is_inline(session: &Session, declaration: &Declaration) -> bool {
    declaration.is_inline()
        || (declaration.as_accessor().is_some()
            && declaration
                .parent
                .is_some_and(|property| session.decl(property).is_inline()))
}

fn check_parameters_of_non_inline(
    declaration: &Declaration,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    for &parameter in declaration.value_parameters() {
        let parameter = session.decl(parameter);
        if parameter.has_modifier(Modifiers::NOINLINE) || parameter.has_modifier(Modifiers::CROSSINLINE)
        {
            let context = context.with_suppressed_diagnostics(&parameter.annotations);
            reporter.report_on(
                parameter.source,
                &errors::ILLEGAL_INLINE_PARAMETER_MODIFIER,
                (),
                &context,
            );
        }
    }
}

fn check_function(
    function: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let declaration = session.decl(function);
    let overrides_something =
        declaration.is_override() && !session.direct_overridden(function).is_empty();

    check_parameters(declaration, function, overrides_something, context, reporter);
    check_nothing_to_inline(declaration, function, context, reporter);

    if can_be_inlined(declaration, function, context, reporter) && overrides_something {
        reporter.report_on(declaration.source, &errors::OVERRIDE_BY_INLINE, (), context);
    }
}

fn check_parameters(
    declaration: &Declaration,
    function: DeclId,
    overrides_something: bool,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let is_suspend = declaration.has_modifier(Modifiers::SUSPEND);
    for &parameter in declaration.value_parameters() {
        let parameter_decl = session.decl(parameter);
        let Some(type_ref) = parameter_decl.return_type_ref() else {
            continue;
        };
        let context = context.with_suppressed_diagnostics(&parameter_decl.annotations);
        let source = parameter_decl.source;
        let is_functional = session.is_functional_type(type_ref.ty);
        let is_noinline = parameter_decl.has_modifier(Modifiers::NOINLINE);

        if !is_functional && (is_noinline || parameter_decl.has_modifier(Modifiers::CROSSINLINE)) {
            reporter.report_on(source, &errors::ILLEGAL_INLINE_PARAMETER_MODIFIER, (), &context);
        }
        if is_noinline {
            continue;
        }
        if session.is_suspend_functional_type(type_ref.ty)
            && !parameter_decl.has_modifier(Modifiers::CROSSINLINE)
            && !is_suspend
        {
            reporter.report_on(
                source,
                &errors::INLINE_SUSPEND_FUNCTION_TYPE_UNSUPPORTED,
                (),
                &context,
            );
        }
        if is_functional && session.type_data(type_ref.ty).is_nullable() {
            reporter.report_on(
                source,
                &errors::NULLABLE_INLINE_PARAMETER,
                (parameter, function),
                &context,
            );
        }
    }

    if overrides_something {
        for &parameter in declaration.type_parameters() {
            let parameter = session.decl(parameter);
            if parameter.has_modifier(Modifiers::REIFIED) {
                reporter.report_on(
                    parameter.source,
                    &errors::REIFIED_TYPE_PARAMETER_IN_OVERRIDE,
                    (),
                    context,
                );
            }
        }
    }
}

fn check_nothing_to_inline(
    declaration: &Declaration,
    function: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    if declaration.has_modifier(Modifiers::EXPECT) || declaration.has_modifier(Modifiers::SUSPEND) {
        return;
    }
    let has_reified = declaration
        .type_parameters()
        .iter()
        .any(|&parameter| session.decl(parameter).has_modifier(Modifiers::REIFIED));
    if has_reified {
        return;
    }
    let has_inlinable_parameter = declaration.value_parameters().iter().any(|&parameter| {
        let parameter = session.decl(parameter);
        !parameter.has_modifier(Modifiers::NOINLINE)
            && parameter.return_type_ref().is_some_and(|type_ref| {
                !session.type_data(type_ref.ty).is_nullable()
                    && session.is_functional_type(type_ref.ty)
            })
    });
    if has_inlinable_parameter || session.has_annotation(function, class_ids::INLINE_ONLY) {
        return;
    }
    reporter.report_on(declaration.source, &errors::NOTHING_TO_INLINE, (), context);
}

/// Members must be final unless they are private to their class.
fn can_be_inlined(
    declaration: &Declaration,
    function: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> bool {
    let session = context.session();
    if owning_class(context, function).is_none()
        || session.effective_visibility(function) == EffectiveVisibility::PrivateInClass
    {
        return true;
    }
    if !declaration.is_final() {
        reporter.report_on(declaration.source, &errors::DECLARATION_CANT_BE_INLINED, (), context);
        return false;
    }
    true
}
