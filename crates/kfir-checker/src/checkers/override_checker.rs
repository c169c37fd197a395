//! Override compatibility of a class's functions and properties.
//!
//! For every member the supertype scope answers which members it directly
//! overrides; the checks then run in a fixed order: presence of `override`,
//! modality of the bases, `var`/`val` mutability, visibility, deprecation and
//! finally the return type.

use crate::context::CheckerContext;
use crate::diagnostics::errors;
use crate::diagnostics::{DiagnosticReporter, Member};
use crate::error::CheckResult;
use kfir_common::FakeSourceKind;
use kfir_tree::{
    ConstValue, DeclId, DeclKindTag, Modality, OverriddenMember, Session, Visibility, class_ids,
};
use std::cmp::Ordering;

pub fn check(
    class: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let Some(class_decl) = session.decl(class).as_class() else {
        return Ok(());
    };
    for &member in &class_decl.members {
        let declaration = session.decl(member);
        if !matches!(declaration.tag(), DeclKindTag::Function | DeclKindTag::Property) {
            continue;
        }
        let member_context = context.with_suppressed_diagnostics(&declaration.annotations);
        check_member(member, class, &member_context, reporter);
    }
    Ok(())
}

fn check_member(
    member: DeclId,
    class: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let declaration = session.decl(member);
    let overridden: Vec<OverriddenMember> = session.direct_overridden(member).into_iter().collect();

    if !declaration.is_override() {
        let Some(first) = overridden.first() else {
            return;
        };
        let source = declaration.source;
        match source.and_then(|source| source.fake_kind()) {
            Some(FakeSourceKind::DataClassGeneratedMembers) => {
                if let Some(base) = overridden.iter().find(|base| session.decl(base.decl).is_final()) {
                    reporter.report_on(
                        session.decl(class).source,
                        &errors::DATA_CLASS_OVERRIDE_CONFLICT,
                        (Member(member), Member(base.decl)),
                        context,
                    );
                }
            }
            None | Some(FakeSourceKind::PropertyFromParameter) => {
                reporter.report_on_with_related(
                    source,
                    &errors::VIRTUAL_MEMBER_HIDDEN,
                    (Member(member), first.owner),
                    &[first.decl],
                    context,
                );
            }
            Some(_) => {}
        }
        return;
    }

    if overridden.is_empty() {
        reporter.report_on(
            declaration.source,
            &errors::NOTHING_TO_OVERRIDE,
            (Member(member),),
            context,
        );
        return;
    }

    if let Some(base) = overridden
        .iter()
        .find(|base| matches!(session.decl(base.decl).modality(), None | Some(Modality::Final)))
    {
        reporter.report_on_with_related(
            declaration.source,
            &errors::OVERRIDING_FINAL_MEMBER,
            (Member(base.decl), base.owner),
            &[base.decl],
            context,
        );
    }

    if declaration.tag() == DeclKindTag::Property && !declaration.is_var() {
        if let Some(base) = overridden.iter().find(|base| session.decl(base.decl).is_var()) {
            reporter.report_on(
                declaration.source,
                &errors::VAR_OVERRIDDEN_BY_VAL,
                (Member(member), Member(base.decl)),
                context,
            );
        }
    }

    let bases: Vec<DeclId> = overridden.iter().map(|base| base.decl).collect();
    check_visibility(member, &bases, context, reporter);
    if !has_visible_base(session, member, &bases) {
        reporter.report_on(
            declaration.source,
            &errors::CANNOT_OVERRIDE_INVISIBLE_MEMBER,
            (Member(member), Member(bases[0])),
            context,
        );
    }

    check_deprecation(member, &bases, context, reporter);

    if let Some(base) = first_return_type_violation(session, member, &overridden) {
        let factory = match (declaration.tag(), declaration.is_var()) {
            (DeclKindTag::Property, true) => &errors::VAR_TYPE_MISMATCH_ON_OVERRIDE,
            (DeclKindTag::Property, false) => &errors::PROPERTY_TYPE_MISMATCH_ON_OVERRIDE,
            _ => &errors::RETURN_TYPE_MISMATCH_ON_OVERRIDE,
        };
        reporter.report_on_with_related(
            declaration.source,
            factory,
            (Member(member), Member(base)),
            &[base],
            context,
        );
    }
}

/// Visibility of an override against its bases. Properties delegate to their
/// accessors: the getter against the bases' getters (or the bases themselves),
/// the setter against the bases' setters.
fn check_visibility(
    member: DeclId,
    bases: &[DeclId],
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    if bases.is_empty() {
        return;
    }
    let session = context.session();
    let declaration = session.decl(member);

    if let Some(property) = declaration.as_property() {
        if let Some(getter) = property.getter {
            let base_getters: Vec<DeclId> = bases
                .iter()
                .map(|&base| {
                    session
                        .decl(base)
                        .as_property()
                        .and_then(|base_property| base_property.getter)
                        .unwrap_or(base)
                })
                .collect();
            check_visibility(getter, &base_getters, context, reporter);
        }
        if let Some(setter) = property.setter {
            let base_setters: Vec<DeclId> = bases
                .iter()
                .filter_map(|&base| {
                    session
                        .decl(base)
                        .as_property()
                        .and_then(|base_property| base_property.setter)
                })
                .collect();
            check_visibility(setter, &base_setters, context, reporter);
        }
        return;
    }

    let own = declaration.visibility();
    let mut ordered: Vec<(DeclId, Option<Ordering>)> = bases
        .iter()
        .map(|&base| (base, own.partial_cmp(&session.decl(base).visibility())))
        .collect();
    // Incomparable pairs first, then weakest first.
    ordered.sort_by_key(|&(_, ordering)| match ordering {
        None => 0,
        Some(Ordering::Less) => 1,
        Some(_) => 2,
    });

    let anchor = report_anchor(session, member);
    for (base, ordering) in ordered {
        let factory = match ordering {
            None => &errors::CANNOT_CHANGE_ACCESS_PRIVILEGE,
            Some(Ordering::Less) => &errors::CANNOT_WEAKEN_ACCESS_PRIVILEGE,
            Some(_) => continue,
        };
        let owner = session.containing_class(base).unwrap_or(base);
        reporter.report_on_with_related(
            anchor,
            factory,
            (own, Member(base), owner),
            &[base],
            context,
        );
        break;
    }
}

/// Default accessors have no text of their own; report on the property.
fn report_anchor(session: &Session, decl: DeclId) -> Option<kfir_common::SourceElement> {
    let declaration = session.decl(decl);
    if declaration.as_accessor().is_some() && declaration.has_fake_source() {
        return declaration.parent.and_then(|property| session.decl(property).source);
    }
    declaration.source
}

/// A base is visible unless it is private or `internal` to another module.
fn has_visible_base(session: &Session, member: DeclId, bases: &[DeclId]) -> bool {
    let module = session.module_of(member);
    bases.iter().any(|&base| match session.decl(base).visibility() {
        Visibility::Private | Visibility::PrivateToThis | Visibility::Local => false,
        Visibility::Internal => session.module_of(base) == module,
        Visibility::Public | Visibility::Protected => true,
    })
}

fn check_deprecation(
    member: DeclId,
    bases: &[DeclId],
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    if session.has_annotation(member, class_ids::DEPRECATED) {
        return;
    }
    for &base in bases {
        let Some(deprecated) =
            session.find_annotation(&session.decl(base).annotations, class_ids::DEPRECATED)
        else {
            continue;
        };
        let message = match deprecated.argument("message") {
            Some(ConstValue::String(message)) => message.clone(),
            _ => String::new(),
        };
        reporter.report_on(
            session.decl(member).source,
            &errors::OVERRIDE_DEPRECATION,
            (Member(base), message),
            context,
        );
        return;
    }
}

/// First base whose (substituted) type the member's type does not conform to.
/// `var` bases require equal types, everything else a subtype.
fn first_return_type_violation(
    session: &Session,
    member: DeclId,
    overridden: &[OverriddenMember],
) -> Option<DeclId> {
    let own = session.decl(member).return_type_ref()?.ty;
    if session.is_error(own) {
        return None;
    }
    overridden.iter().find_map(|base| {
        let declaration = session.decl(base.decl);
        let theirs = declaration.return_type_ref()?.ty;
        let theirs = session.substitute(theirs, &base.substitution);
        let conforms = if declaration.tag() == DeclKindTag::Property && declaration.is_var() {
            session.equal_types(own, theirs)
        } else {
            session.is_subtype(own, theirs)
        };
        (!conforms).then_some(base.decl)
    })
}
