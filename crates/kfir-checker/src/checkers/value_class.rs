//! `value class` and legacy `inline class` declarations.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use kfir_common::{FakeSourceKind, LanguageFeature};
use kfir_tree::{
    ClassKind, DeclId, DeclKind, Declaration, Modality, Modifiers, Session, TypeData, TypeId,
    TypeProjection, class_ids, member_names,
};
use rustc_hash::FxHashSet;

pub(crate) fn is_value_class(declaration: &Declaration) -> bool {
    declaration.as_class().is_some()
        && (declaration.has_modifier(Modifiers::VALUE)
            || declaration.has_modifier(Modifiers::INLINE_CLASS))
}

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
    if !is_value_class(declaration) {
        return Ok(());
    }

    if declaration.has_modifier(Modifiers::INNER) || session.is_local(class) {
        reporter.report_on(declaration.source, &errors::VALUE_CLASS_NOT_TOP_LEVEL, (), context);
    }
    if declaration.modality() != Some(Modality::Final) {
        reporter.report_on(declaration.source, &errors::VALUE_CLASS_NOT_FINAL, (), context);
    }

    for entry in &class_decl.supertypes {
        let supertype = session.class_of(entry.type_ref.ty);
        let is_interface = supertype.is_some_and(|supertype| {
            session
                .decl(supertype)
                .as_class()
                .is_some_and(|class| class.class_kind.is_interface())
        });
        let is_any = supertype.is_some_and(|supertype| session.is_class(supertype, class_ids::ANY));
        if !is_interface && !is_any {
            let context = context.with_suppressed_diagnostics(&entry.type_ref.annotations);
            reporter.report_on(
                entry.type_ref.source,
                &errors::VALUE_CLASS_CANNOT_EXTEND_CLASSES,
                (),
                &context,
            );
        }
    }

    if is_cloneable(session, class) {
        reporter.report_on(
            declaration.source,
            &errors::VALUE_CLASS_CANNOT_BE_CLONEABLE,
            (),
            context,
        );
    }

    let mut primary = None;
    for &member in &class_decl.members {
        let member_decl = session.decl(member);
        let context = context.with_suppressed_diagnostics(&member_decl.annotations);
        match &member_decl.kind {
            DeclKind::Constructor(constructor) if constructor.is_primary => primary = Some(member),
            DeclKind::Constructor(constructor) => {
                if let Some(body) = constructor.body {
                    reporter.report_on(
                        session.expr(body).source,
                        &errors::SECONDARY_CONSTRUCTOR_WITH_BODY_INSIDE_VALUE_CLASS,
                        (),
                        &context,
                    );
                }
            }
            DeclKind::Class(_) => {
                if member_decl.has_modifier(Modifiers::INNER) {
                    reporter.report_on(
                        member_decl.source,
                        &errors::INNER_CLASS_INSIDE_VALUE_CLASS,
                        (),
                        &context,
                    );
                }
            }
            DeclKind::Function(_) => {
                if member_names::VALUE_CLASS_RESERVED.contains(&member_decl.name.as_str()) {
                    reporter.report_on(
                        member_decl.source,
                        &errors::RESERVED_MEMBER_INSIDE_VALUE_CLASS,
                        (member_decl.name.clone(),),
                        &context,
                    );
                }
            }
            DeclKind::Property(property) => {
                if is_parameter_property(member_decl) {
                    continue;
                }
                if let Some(delegate) = property.delegate {
                    reporter.report_on(
                        session.expr(delegate).source,
                        &errors::DELEGATED_PROPERTY_INSIDE_VALUE_CLASS,
                        (),
                        &context,
                    );
                } else if property.has_backing_field && !member_decl.has_fake_source() {
                    reporter.report_on(
                        member_decl.source,
                        &errors::PROPERTY_WITH_BACKING_FIELD_INSIDE_VALUE_CLASS,
                        (),
                        &context,
                    );
                }
            }
            _ => {}
        }
    }

    let Some(primary) = primary.filter(|&primary| !session.decl(primary).has_fake_source()) else {
        reporter.report_on(
            declaration.source,
            &errors::ABSENCE_OF_PRIMARY_CONSTRUCTOR_FOR_VALUE_CLASS,
            (),
            context,
        );
        return Ok(());
    };
    let primary_decl = session.decl(primary);
    let parameters = primary_decl.value_parameters();
    let context = context.with_suppressed_diagnostics(&primary_decl.annotations);

    if session.supports_feature(LanguageFeature::ValueClasses) {
        if parameters.is_empty() {
            reporter.report_on(
                primary_decl.source,
                &errors::VALUE_CLASS_EMPTY_CONSTRUCTOR,
                (),
                &context,
            );
            return Ok(());
        }
    } else if parameters.len() != 1 {
        reporter.report_on(
            primary_decl.source,
            &errors::INLINE_CLASS_CONSTRUCTOR_WRONG_PARAMETERS_SIZE,
            (),
            &context,
        );
        return Ok(());
    }

    for &parameter in parameters {
        let parameter_decl = session.decl(parameter);
        let context = context.with_suppressed_diagnostics(&parameter_decl.annotations);
        check_underlying_parameter(class, parameter, &context, reporter);
    }
    Ok(())
}

fn check_underlying_parameter(
    class: DeclId,
    parameter: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) {
    let session = context.session();
    let declaration = session.decl(parameter);
    let Some(value_parameter) = declaration.as_value_parameter() else {
        return;
    };
    let type_ref = &value_parameter.type_ref;

    let property = session.decl(class).as_class().and_then(|class| {
        class.members.iter().copied().find(|&member| {
            session
                .decl(member)
                .as_property()
                .is_some_and(|property| property.from_parameter == Some(parameter))
        })
    });
    let not_final_read_only = property.is_none_or(|property| {
        let property = session.decl(property);
        declaration.has_modifier(Modifiers::VARARG)
            || property.is_var()
            || property.modality() == Some(Modality::Open)
    });

    if not_final_read_only {
        reporter.report_on(
            declaration.source,
            &errors::VALUE_CLASS_CONSTRUCTOR_NOT_FINAL_READ_ONLY_PARAMETER,
            (),
            context,
        );
    } else if is_inapplicable_parameter_type(session, type_ref.ty) {
        let generic_underlying = session.type_parameter_of(type_ref.ty).is_some()
            || is_generic_array_of_type_parameter(session, type_ref.ty);
        if !(generic_underlying && session.supports_feature(LanguageFeature::GenericInlineClassParameter)) {
            reporter.report_on(
                type_ref.source,
                &errors::VALUE_CLASS_HAS_INAPPLICABLE_PARAMETER_TYPE,
                (type_ref.ty,),
                context,
            );
        }
    } else if is_recursive(session, type_ref.ty, &mut FxHashSet::default()) {
        let context = context.with_suppressed_diagnostics(&type_ref.annotations);
        reporter.report_on(
            type_ref.source,
            &errors::VALUE_CLASS_CANNOT_BE_RECURSIVE,
            (),
            &context,
        );
    }
}

fn is_parameter_property(declaration: &Declaration) -> bool {
    declaration
        .as_property()
        .is_some_and(|property| property.from_parameter.is_some())
        && declaration.source.and_then(|source| source.fake_kind())
            == Some(FakeSourceKind::PropertyFromParameter)
}

fn is_cloneable(session: &Session, class: DeclId) -> bool {
    session.is_class(class, class_ids::CLONEABLE)
        || session
            .supertype_classes(class)
            .into_iter()
            .any(|supertype| session.is_class(supertype, class_ids::CLONEABLE))
}

fn is_inapplicable_parameter_type(session: &Session, ty: TypeId) -> bool {
    session.is_unit(ty)
        || session.is_nothing(ty)
        || session.type_parameter_of(ty).is_some()
        || is_generic_array_of_type_parameter(session, ty)
}

/// `Array<T>`, `Array<Array<T>>`, ... for a type parameter `T`.
fn is_generic_array_of_type_parameter(session: &Session, ty: TypeId) -> bool {
    let TypeData::Class {
        classifier,
        arguments,
        ..
    } = session.type_data(session.fully_expand(ty))
    else {
        return false;
    };
    if !session.is_class(classifier, class_ids::ARRAY) {
        return false;
    }
    match arguments.first() {
        Some(TypeProjection::Type { ty: element, .. }) => {
            session.type_parameter_of(*element).is_some()
                || is_generic_array_of_type_parameter(session, *element)
        }
        _ => false,
    }
}

/// A value class whose underlying type leads back to itself.
fn is_recursive(session: &Session, ty: TypeId, visited: &mut FxHashSet<TypeId>) -> bool {
    let Some(class) = session.class_of(ty) else {
        return false;
    };
    let declaration = session.decl(class);
    let Some(class_decl) = declaration.as_class() else {
        return false;
    };
    if !is_value_class(declaration) || class_decl.class_kind != ClassKind::Class {
        return false;
    }
    let Some(primary) = class_decl.members.iter().copied().find(|&member| {
        session
            .decl(member)
            .as_constructor()
            .is_some_and(|constructor| constructor.is_primary)
    }) else {
        return false;
    };
    if !visited.insert(ty) {
        return true;
    }
    let recursive = session.decl(primary).value_parameters().iter().any(|&parameter| {
        session
            .decl(parameter)
            .return_type_ref()
            .is_some_and(|type_ref| is_recursive(session, type_ref.ty, visited))
    });
    visited.remove(&ty);
    recursive
}
