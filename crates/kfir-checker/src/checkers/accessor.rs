//! Property accessors against their property: visibility, abstractness,
//! types and delegation.

use super::{can_have_abstract_members, owning_class};
use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_common::FakeSourceKind;
use kfir_tree::{DeclId, Declaration, Modality, Modifiers, PropertyDecl, Visibility};
use std::cmp::Ordering;

pub fn check(
    property: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let declaration = session.decl(property);
    let Some(property_decl) = declaration.as_property() else {
        return Ok(());
    };
    let accessors = Accessors {
        property,
        declaration,
        property_decl,
        is_member: owning_class(context, property).is_some(),
        legally_abstract: declaration.is_abstract()
            && context
                .find_closest(|decl| decl.as_class().is_some())
                .is_some_and(|class| can_have_abstract_members(context, class)),
    };
    if let Some(getter) = property_decl.getter {
        let context = context.with_suppressed_diagnostics(&session.decl(getter).annotations);
        accessors.check_getter(getter, &context, reporter);
    }
    if let Some(setter) = property_decl.setter {
        let context = context.with_suppressed_diagnostics(&session.decl(setter).annotations);
        accessors.check_setter(setter, &context, reporter);
    }
    Ok(())
}

struct Accessors<'a> {
    property: DeclId,
    declaration: &'a Declaration,
    property_decl: &'a PropertyDecl,
    /// Declared in a class, as opposed to top level or local.
    is_member: bool,
    legally_abstract: bool,
}

impl Accessors<'_> {
    fn check_getter(
        &self,
        getter: DeclId,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let session = context.session();
        let getter_decl = session.decl(getter);
        let Some(accessor) = getter_decl.as_accessor() else {
            return;
        };
        self.check_delegated(getter_decl, accessor.body.is_some(), context, reporter);

        if getter_decl.visibility() != self.declaration.visibility() {
            reporter.report_on(
                getter_decl.source,
                &errors::GETTER_VISIBILITY_DIFFERS_FROM_PROPERTY_VISIBILITY,
                (),
                context,
            );
        }
        // Any `abstract` member, whether or not its class may declare one.
        if self.is_member
            && accessor.body.is_some()
            && self.property_decl.delegate.is_none()
            && self.declaration.is_abstract()
        {
            reporter.report_on(
                getter_decl.source,
                &errors::ABSTRACT_PROPERTY_WITH_GETTER,
                (),
                context,
            );
        }

        let return_type = &accessor.return_type;
        if return_type.is_implicit() {
            return;
        }
        let property_type = self.property_decl.return_type.ty;
        if session.is_error(property_type) || session.is_error(return_type.ty) {
            return;
        }
        if return_type.ty != property_type {
            let context = context.with_suppressed_diagnostics(&return_type.annotations);
            reporter.report_on(
                return_type.source,
                &errors::WRONG_GETTER_RETURN_TYPE,
                (property_type, return_type.ty),
                &context,
            );
        }
    }

    fn check_setter(
        &self,
        setter: DeclId,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let session = context.session();
        let setter_decl = session.decl(setter);
        let Some(accessor) = setter_decl.as_accessor() else {
            return;
        };
        let source = setter_decl.source;

        if !self.declaration.is_var() {
            reporter.report_on(source, &errors::VAL_WITH_SETTER, (), context);
        }
        self.check_delegated(setter_decl, accessor.body.is_some(), context, reporter);

        let own = setter_decl.visibility();
        let property_visibility = self.declaration.visibility();
        if matches!(
            own.partial_cmp(&property_visibility),
            None | Some(Ordering::Greater)
        ) {
            reporter.report_on(
                source,
                &errors::SETTER_VISIBILITY_INCONSISTENT_WITH_PROPERTY_VISIBILITY,
                (),
                context,
            );
        }
        if self.is_member && self.property_decl.delegate.is_none() {
            if own == Visibility::Private && property_visibility != Visibility::Private {
                if self.legally_abstract {
                    reporter.report_on(
                        source,
                        &errors::PRIVATE_SETTER_FOR_ABSTRACT_PROPERTY,
                        (),
                        context,
                    );
                } else if self.declaration.modality() == Some(Modality::Open) {
                    reporter.report_on(
                        source,
                        &errors::PRIVATE_SETTER_FOR_OPEN_PROPERTY,
                        (),
                        context,
                    );
                }
            }
            if self.legally_abstract && accessor.body.is_some() {
                reporter.report_on(source, &errors::ABSTRACT_PROPERTY_WITH_SETTER, (), context);
            }
        }

        let Some(parameter) = accessor.value_parameter else {
            return;
        };
        let parameter_decl = session.decl(parameter);
        if parameter_decl.has_modifier(Modifiers::VARARG) {
            return;
        }
        let Some(parameter_type) = parameter_decl.return_type_ref() else {
            return;
        };
        let property_type = self.property_decl.return_type.ty;
        if session.is_error(property_type) || session.is_error(parameter_type.ty) {
            return;
        }
        if parameter_type.ty != property_type {
            let context = context.with_suppressed_diagnostics(&parameter_decl.annotations);
            reporter.report_on(
                parameter_type.source,
                &errors::WRONG_SETTER_PARAMETER_TYPE,
                (property_type, parameter_type.ty),
                &context,
            );
        }

        if !session.is_unit(accessor.return_type.ty) {
            let context = context.with_suppressed_diagnostics(&accessor.return_type.annotations);
            reporter.report_on(
                accessor.return_type.source,
                &errors::WRONG_SETTER_RETURN_TYPE,
                (),
                &context,
            );
        }
    }

    /// Accessors of a delegated property are generated; written bodies are not allowed.
    fn check_delegated(
        &self,
        accessor: &Declaration,
        has_body: bool,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let generated = accessor.source.and_then(|source| source.fake_kind())
            == Some(FakeSourceKind::DelegatedPropertyAccessor);
        if self.property_decl.delegate.is_some() && has_body && !generated {
            tracing::trace!(property = ?self.property, "accessor body on delegated property");
            reporter.report_on(
                accessor.source,
                &errors::ACCESSOR_FOR_DELEGATED_PROPERTY,
                (),
                context,
            );
        }
    }
}
