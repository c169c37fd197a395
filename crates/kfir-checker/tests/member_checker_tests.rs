//! Member-level checkers: property accessors, `lateinit`, type parameter
//! bounds and use-site projections.

use kfir_checker::{CheckerOptions, check_file, registry_for};
use kfir_common::{Diagnostic, LanguageVersionSettings};
use kfir_tree::{
    ClassKind, DeclId, GraphBuilder, Modality, Modifiers, ProjectionKind, Session, TypeId,
    TypeRef, Variance, Visibility,
};

fn check(session: &Session, file: DeclId) -> Vec<Diagnostic> {
    let options = CheckerOptions::default();
    let registry = registry_for(&options);
    check_file(session, file, &registry, &options).expect("no invariant violation")
}

fn names(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.factory.as_str()).collect()
}

fn setter_parameter(b: &GraphBuilder, setter: DeclId) -> DeclId {
    b.decl(setter)
        .as_accessor()
        .and_then(|accessor| accessor.value_parameter)
        .expect("setter parameter")
}

// =============================================================================
// Accessors
// =============================================================================

#[test]
fn test_getter_visibility_must_match_property() {
    let mut b = GraphBuilder::new();
    let file = b.file("getter.kt");
    let int = b.int_type();
    let p = b.property(file, "p", int).id();
    let getter = b.getter(p).visibility(Visibility::Private).id();
    let anchor = b.decl(getter).source.expect("source");
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["GETTER_VISIBILITY_DIFFERS_FROM_PROPERTY_VISIBILITY"],
        "got: {found:?}"
    );
    assert_eq!(found[0].start, anchor.start);
}

#[test]
fn test_setter_on_val() {
    let mut b = GraphBuilder::new();
    let file = b.file("val.kt");
    let int = b.int_type();
    let p = b.property(file, "p", int).id();
    let _ = b.setter(p).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["VAL_WITH_SETTER"], "got: {found:?}");
}

#[test]
fn test_setter_more_visible_than_property() {
    let mut b = GraphBuilder::new();
    let file = b.file("visibility.kt");
    let int = b.int_type();
    let p = b
        .property(file, "p", int)
        .visibility(Visibility::Private)
        .modifiers(Modifiers::VAR)
        .id();
    let _ = b.setter(p).visibility(Visibility::Public).id();
    let narrower = b.property(file, "q", int).modifiers(Modifiers::VAR).id();
    let _ = b.setter(narrower).visibility(Visibility::Private).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["SETTER_VISIBILITY_INCONSISTENT_WITH_PROPERTY_VISIBILITY"],
        "got: {found:?}"
    );
}

#[test]
fn test_private_setter_of_open_property() {
    let mut b = GraphBuilder::new();
    let file = b.file("open.kt");
    let int = b.int_type();
    let class = b.class(file, "C").modality(Modality::Open).id();
    let p = b
        .property(class, "p", int)
        .modality(Modality::Open)
        .modifiers(Modifiers::VAR)
        .id();
    let _ = b.setter(p).visibility(Visibility::Private).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["PRIVATE_SETTER_FOR_OPEN_PROPERTY"], "got: {found:?}");
}

#[test]
fn test_abstract_property_accessors() {
    let mut b = GraphBuilder::new();
    let file = b.file("abstract.kt");
    let int = b.int_type();
    let class = b.class(file, "C").modality(Modality::Abstract).id();

    let with_getter = b
        .property(class, "size", int)
        .modality(Modality::Abstract)
        .id();
    let getter = b.getter(with_getter).id();
    let getter_body = b.block(Vec::new());
    b.set_body(getter, getter_body);

    let with_setter = b
        .property(class, "count", int)
        .modality(Modality::Abstract)
        .modifiers(Modifiers::VAR)
        .id();
    let setter = b.setter(with_setter).visibility(Visibility::Private).id();
    let setter_body = b.block(Vec::new());
    b.set_body(setter, setter_body);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec![
            "ABSTRACT_PROPERTY_WITH_GETTER",
            "PRIVATE_SETTER_FOR_ABSTRACT_PROPERTY",
            "ABSTRACT_PROPERTY_WITH_SETTER",
        ],
        "got: {found:?}"
    );
}

#[test]
fn test_accessor_types_must_match_property() {
    let mut b = GraphBuilder::new();
    let file = b.file("types.kt");
    let int = b.int_type();
    let string = b.string_type();

    let read = b.property(file, "read", int).id();
    let written_return = b.type_ref(string);
    let _ = b.getter(read).type_ref(written_return).id();

    let write = b.property(file, "write", int).modifiers(Modifiers::VAR).id();
    let setter = b.setter(write).id();
    let parameter = setter_parameter(&b, setter);
    let written_parameter = b.type_ref(string);
    let _ = b.handle(parameter).type_ref(written_parameter).id();

    let same = b.property(file, "same", int).id();
    let written_same = b.type_ref(int);
    let _ = b.getter(same).type_ref(written_same).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["WRONG_GETTER_RETURN_TYPE", "WRONG_SETTER_PARAMETER_TYPE"],
        "got: {found:?}"
    );
    assert_eq!(found[0].arguments, vec!["Int", "String"]);
    assert_eq!(found[1].arguments, vec!["Int", "String"]);
}

#[test]
fn test_written_getter_on_delegated_property() {
    let mut b = GraphBuilder::new();
    let file = b.file("delegated.kt");
    let int = b.int_type();
    let provide = b.function(file, "provide", int).id();
    let p = b.property(file, "p", int).id();
    let delegate = b.call(provide, &[]);
    b.set_delegate(p, delegate);
    let getter = b.getter(p).id();
    let body = b.block(Vec::new());
    b.set_body(getter, body);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["ACCESSOR_FOR_DELEGATED_PROPERTY"], "got: {found:?}");
}

// =============================================================================
// lateinit
// =============================================================================

#[derive(Clone, Copy, Debug)]
enum Lateinit {
    Val,
    Initialized,
    Delegated,
    Nullable,
    Primitive,
    CustomGetter,
    Plain,
}

fn lateinit_case(case: Lateinit) -> Vec<Diagnostic> {
    let mut b = GraphBuilder::new();
    let file = b.file("lateinit.kt");
    let int = b.int_type();
    let string = b.string_type();
    let ty = match case {
        Lateinit::Nullable => b.nullable(string),
        Lateinit::Primitive => int,
        _ => string,
    };
    let modifiers = match case {
        Lateinit::Val => Modifiers::LATEINIT,
        _ => Modifiers::LATEINIT | Modifiers::VAR,
    };
    let p = b.property(file, "p", ty).modifiers(modifiers).id();
    match case {
        Lateinit::Initialized => {
            let value = b.int_literal(1);
            b.set_initializer(p, value);
        }
        Lateinit::Delegated => {
            let provide = b.function(file, "provide", string).id();
            let delegate = b.call(provide, &[]);
            b.set_delegate(p, delegate);
        }
        Lateinit::CustomGetter => {
            let _ = b.getter(p).id();
        }
        _ => {}
    }
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");
    check(&s, file)
}

#[test]
fn test_lateinit_reasons() {
    let cases = [
        (Lateinit::Val, "is allowed only on mutable properties"),
        (Lateinit::Initialized, "is not allowed on properties with initializer"),
        (Lateinit::Delegated, "is not allowed on delegated properties"),
        (
            Lateinit::Nullable,
            "is not allowed on properties of a type with nullable upper bound",
        ),
        (Lateinit::Primitive, "is not allowed on properties of primitive types"),
        (
            Lateinit::CustomGetter,
            "is not allowed on properties with a custom getter or setter",
        ),
    ];
    for (case, reason) in cases {
        let found = lateinit_case(case);
        assert_eq!(
            names(&found),
            vec!["INAPPLICABLE_LATEINIT_MODIFIER"],
            "{case:?}: {found:?}"
        );
        assert_eq!(found[0].arguments, vec![reason], "{case:?}");
    }
    let found = lateinit_case(Lateinit::Plain);
    assert!(found.is_empty(), "got: {found:?}");
}

// =============================================================================
// Type parameter bounds
// =============================================================================

fn bound_source(b: &GraphBuilder, parameter: DeclId, index: usize) -> u32 {
    b.decl(parameter)
        .as_type_parameter()
        .and_then(|parameter| parameter.bounds.get(index))
        .and_then(|bound| bound.source)
        .expect("bound source")
        .start
}

#[test]
fn test_final_upper_bound() {
    let mut b = GraphBuilder::new();
    let file = b.file("final_bound.kt");
    let unit = b.unit_type();
    let string = b.string_type();
    let any = b.any_type();
    let f = b.function(file, "f", unit).id();
    let _ = b.type_parameter(f, "T", Variance::Invariant).bound(string).id();
    let _ = b.type_parameter(f, "U", Variance::Invariant).bound(any).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["FINAL_UPPER_BOUND"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["String"]);
}

#[test]
fn test_type_parameter_bound_excludes_other_bounds() {
    let mut b = GraphBuilder::new();
    let file = b.file("bounded.kt");
    let unit = b.unit_type();
    let any = b.any_type();
    let f = b.function(file, "f", unit).id();
    let t = b.type_parameter(f, "T", Variance::Invariant).id();
    let t_type = b.type_parameter_type(t);
    let u = b
        .type_parameter(f, "U", Variance::Invariant)
        .bound(t_type)
        .bound(any)
        .id();
    let _ = b.type_parameter(f, "V", Variance::Invariant).bound(t_type).id();
    let anchor = b.decl(u).source.expect("source");
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["BOUNDS_NOT_ALLOWED_IF_BOUNDED_BY_TYPE_PARAMETER"],
        "got: {found:?}"
    );
    assert_eq!(found[0].start, anchor.start);
}

#[test]
fn test_repeated_and_extra_class_bounds() {
    let mut b = GraphBuilder::new();
    let file = b.file("uniqueness.kt");
    let unit = b.unit_type();
    let shape = b.class(file, "Shape").class_kind(ClassKind::Interface).id();
    let shape_type = b.class_type(shape, &[]);
    let first = b.class(file, "First").modality(Modality::Open).id();
    let second = b.class(file, "Second").modality(Modality::Open).id();
    let first_type = b.class_type(first, &[]);
    let second_type = b.class_type(second, &[]);

    let f = b.function(file, "f", unit).id();
    let repeated = b
        .type_parameter(f, "T", Variance::Invariant)
        .bound(shape_type)
        .bound(shape_type)
        .id();
    let classes = b
        .type_parameter(f, "U", Variance::Invariant)
        .bound(first_type)
        .bound(shape_type)
        .bound(second_type)
        .id();
    let expected = vec![bound_source(&b, repeated, 1), bound_source(&b, classes, 2)];
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["REPEATED_BOUND", "ONLY_ONE_CLASS_BOUND_ALLOWED"],
        "got: {found:?}"
    );
    let starts: Vec<u32> = found.iter().map(|d| d.start).collect();
    assert_eq!(starts, expected);
}

#[test]
fn test_unrelated_final_bounds_conflict() {
    let mut b = GraphBuilder::new();
    let file = b.file("conflict.kt");
    let unit = b.unit_type();
    let string = b.string_type();
    let int = b.int_type();
    let f = b.function(file, "f", unit).id();
    let _ = b
        .type_parameter(f, "T", Variance::Invariant)
        .bound(string)
        .bound(int)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec![
            "FINAL_UPPER_BOUND",
            "FINAL_UPPER_BOUND",
            "ONLY_ONE_CLASS_BOUND_ALLOWED",
            "CONFLICTING_UPPER_BOUNDS",
        ],
        "got: {found:?}"
    );
    assert_eq!(found[3].arguments, vec!["T"]);
}

#[test]
fn test_type_alias_parameters_take_no_bounds() {
    let mut b = GraphBuilder::new();
    let file = b.file("alias_bound.kt");
    let any = b.any_type();
    let placeholder = b.unit_type();
    let alias = b.type_alias(file, "Id", placeholder).id();
    let _ = b.type_parameter(alias, "T", Variance::Invariant).bound(any).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["BOUND_ON_TYPE_ALIAS_PARAMETER_NOT_ALLOWED"],
        "got: {found:?}"
    );
}

// =============================================================================
// Use-site projections
// =============================================================================

/// A written `<ty>` whose single argument has its own written reference.
fn written_with_argument(b: &mut GraphBuilder, ty: TypeId, argument: TypeId) -> TypeRef {
    let argument_ref = b.type_ref(argument);
    b.type_ref(ty).with_arguments(vec![argument_ref])
}

fn projected(b: &mut GraphBuilder, class: DeclId, kind: ProjectionKind, argument: TypeId) -> TypeId {
    b.projected_type(class, &[GraphBuilder::projection(kind, argument)])
}

#[test]
fn test_projection_against_declaration_variance() {
    let mut b = GraphBuilder::new();
    let file = b.file("projection.kt");
    let int = b.int_type();
    let source = b.class(file, "Source").id();
    b.type_parameter(source, "T", Variance::Out);

    let conflicting = projected(&mut b, source, ProjectionKind::In, int);
    let redundant = projected(&mut b, source, ProjectionKind::Out, int);
    let plain = b.class_type(source, &[int]);
    for (name, ty) in [("a", conflicting), ("b", redundant), ("c", plain)] {
        let written = written_with_argument(&mut b, ty, int);
        let _ = b.property(file, name, ty).type_ref(written).id();
    }
    // Without written argument references nothing is anchored.
    let _ = b.property(file, "d", conflicting).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["CONFLICTING_PROJECTION", "REDUNDANT_PROJECTION"],
        "got: {found:?}"
    );
}

#[test]
fn test_projection_in_nested_argument() {
    let mut b = GraphBuilder::new();
    let file = b.file("nested.kt");
    let int = b.int_type();
    let source = b.class(file, "Source").id();
    b.type_parameter(source, "T", Variance::Out);
    let holder = b.class(file, "Holder").id();
    b.type_parameter(holder, "T", Variance::Invariant);

    let inner = projected(&mut b, source, ProjectionKind::In, int);
    let outer = b.class_type(holder, &[inner]);
    let inner_ref = written_with_argument(&mut b, inner, int);
    let anchor = inner_ref.arguments[0].source.expect("source");
    let outer_ref = b.type_ref(outer).with_arguments(vec![inner_ref]);
    let _ = b.property(file, "p", outer).type_ref(outer_ref).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["CONFLICTING_PROJECTION"], "got: {found:?}");
    assert_eq!(found[0].start, anchor.start);
}

#[test]
fn test_projection_conflicting_after_alias_expansion() {
    let mut b = GraphBuilder::new();
    let file = b.file("alias.kt");
    let int = b.int_type();
    let cell = b.class(file, "Cell").id();
    b.type_parameter(cell, "X", Variance::Invariant);

    // typealias Writer<Y> = Cell<in Y>
    let placeholder = b.unit_type();
    let writer = b.type_alias(file, "Writer", placeholder).id();
    let y = b.type_parameter(writer, "Y", Variance::Invariant).id();
    let y_type = b.type_parameter_type(y);
    let cell_in_y = projected(&mut b, cell, ProjectionKind::In, y_type);
    let expansion = b.type_ref(cell_in_y);
    b.set_alias_expansion(writer, expansion);

    let conflicting = projected(&mut b, writer, ProjectionKind::Out, int);
    let agreeing = projected(&mut b, writer, ProjectionKind::In, int);
    for (name, ty) in [("a", conflicting), ("b", agreeing)] {
        let written = written_with_argument(&mut b, ty, int);
        let _ = b.property(file, name, ty).type_ref(written).id();
    }
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["CONFLICTING_PROJECTION_IN_TYPEALIAS_EXPANSION"],
        "got: {found:?}"
    );
}
