//! Tests for subtyping, alias expansion and type rendering.

use kfir_common::LanguageVersionSettings;
use kfir_tree::{
    ClassKind, GraphBuilder, Modality, ProjectionKind, Session, TypeId, TypeInterner,
    TypeProjection, Variance, class_ids,
};

struct Fixture {
    session: Session,
    int: TypeId,
    int_nullable: TypeId,
    string: TypeId,
    any: TypeId,
    any_nullable: TypeId,
    nothing: TypeId,
}

fn primitives(build: impl FnOnce(&mut GraphBuilder)) -> Fixture {
    let mut b = GraphBuilder::new();
    build(&mut b);
    let int = b.int_type();
    let int_nullable = b.nullable(int);
    let string = b.string_type();
    let any = b.any_type();
    let any_nullable = b.nullable(any);
    let nothing = b.builtin(class_ids::NOTHING);
    let session = b
        .finish(LanguageVersionSettings::default())
        .expect("graph should validate");
    Fixture {
        session,
        int,
        int_nullable,
        string,
        any,
        any_nullable,
        nothing,
    }
}

#[test]
fn test_builtin_hierarchy() {
    let f = primitives(|_| {});
    let s = &f.session;
    assert!(s.is_subtype(f.int, f.any));
    assert!(s.is_subtype(f.int, f.any_nullable));
    assert!(s.is_subtype(f.nothing, f.string));
    assert!(!s.is_subtype(f.int, f.string));
    assert!(!s.is_subtype(f.any, f.int));
}

#[test]
fn test_nullability_is_respected() {
    let f = primitives(|_| {});
    let s = &f.session;
    assert!(s.is_subtype(f.int, f.int_nullable));
    assert!(!s.is_subtype(f.int_nullable, f.int));
    assert!(!s.is_subtype(f.any_nullable, f.any));
    assert!(s.is_nullable(f.int_nullable));
    assert!(!s.is_nullable(f.int));
}

#[test]
fn test_error_type_is_compatible_both_ways() {
    let f = primitives(|_| {});
    let s = &f.session;
    assert!(s.is_subtype(TypeInterner::ERROR, f.int));
    assert!(s.is_subtype(f.string, TypeInterner::ERROR));
}

#[test]
fn test_declaration_site_variance() {
    let mut b = GraphBuilder::new();
    let file = b.file("variance.kt");
    let source = b.class(file, "Source").class_kind(ClassKind::Interface).id();
    b.type_parameter(source, "T", Variance::Out);
    let sink = b.class(file, "Sink").class_kind(ClassKind::Interface).id();
    b.type_parameter(sink, "T", Variance::In);
    let cell = b.class(file, "Cell").id();
    b.type_parameter(cell, "T", Variance::Invariant);

    let int = b.int_type();
    let any = b.any_type();
    let source_int = b.class_type(source, &[int]);
    let source_any = b.class_type(source, &[any]);
    let sink_int = b.class_type(sink, &[int]);
    let sink_any = b.class_type(sink, &[any]);
    let cell_int = b.class_type(cell, &[int]);
    let cell_any = b.class_type(cell, &[any]);
    let cell_out_any = b.projected_type(cell, &[GraphBuilder::projection(ProjectionKind::Out, any)]);
    let cell_in_int = b.projected_type(cell, &[GraphBuilder::projection(ProjectionKind::In, int)]);
    let cell_star = b.projected_type(cell, &[TypeProjection::Star]);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert!(s.is_subtype(source_int, source_any));
    assert!(!s.is_subtype(source_any, source_int));
    assert!(s.is_subtype(sink_any, sink_int));
    assert!(!s.is_subtype(sink_int, sink_any));
    assert!(!s.is_subtype(cell_int, cell_any));
    assert!(s.is_subtype(cell_int, cell_out_any));
    assert!(s.is_subtype(cell_any, cell_in_int));
    assert!(!s.is_subtype(cell_out_any, cell_int));
    assert!(s.is_subtype(cell_out_any, cell_star));
}

#[test]
fn test_supertype_arguments_are_substituted() {
    let mut b = GraphBuilder::new();
    let file = b.file("lists.kt");
    let list = b.class(file, "List").class_kind(ClassKind::Interface).id();
    let element = b.type_parameter(list, "E", Variance::Out).id();
    let _ = element;
    let int_list = b.class(file, "IntList").id();
    let int = b.int_type();
    let list_of_int = b.class_type(list, &[int]);
    b.add_supertype(int_list, list_of_int);

    let any = b.any_type();
    let string = b.string_type();
    let list_of_any = b.class_type(list, &[any]);
    let list_of_string = b.class_type(list, &[string]);
    let int_list_type = b.class_type(int_list, &[]);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert!(s.is_subtype(int_list_type, list_of_any));
    assert!(!s.is_subtype(int_list_type, list_of_string));
    assert_eq!(s.find_supertype(int_list_type, list), Some(list_of_int));
}

#[test]
fn test_alias_expands_to_target() {
    let mut b = GraphBuilder::new();
    let file = b.file("alias.kt");
    let string = b.string_type();
    let alias = b.type_alias(file, "Name", string).id();
    let name = b.class_type(alias, &[]);
    let nullable_name = b.nullable(name);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert!(s.is_abbreviation(name));
    assert_eq!(s.fully_expand(name), string);
    assert!(s.equal_types(name, string));
    assert!(s.is_nullable(nullable_name));
    assert_eq!(s.class_of(nullable_name), s.class_by_id(class_ids::STRING));
}

#[test]
fn test_cyclic_alias_expands_to_error() {
    let mut b = GraphBuilder::new();
    let file = b.file("cycle.kt");
    let first = b.type_alias(file, "First", TypeInterner::ERROR).id();
    let second = b.type_alias(file, "Second", TypeInterner::ERROR).id();
    let first_type = b.class_type(first, &[]);
    let second_type = b.class_type(second, &[]);
    let first_ref = b.type_ref(second_type);
    let second_ref = b.type_ref(first_type);
    b.set_alias_expansion(first, first_ref);
    b.set_alias_expansion(second, second_ref);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert_eq!(s.fully_expand(first_type), TypeInterner::ERROR);
    assert!(s.is_error(second_type));
}

#[test]
fn test_recursive_bound_terminates() {
    let mut b = GraphBuilder::new();
    let file = b.file("comparable.kt");
    let comparable = b.class(file, "Comparable").class_kind(ClassKind::Interface).id();
    b.type_parameter(comparable, "T", Variance::In);
    let sort = b.function(file, "sort", TypeInterner::ERROR).id();
    let t = b.type_parameter(sort, "T", Variance::Invariant).id();
    let t_type = b.type_parameter_type(t);
    let bound = b.class_type(comparable, &[t_type]);
    let _ = b.handle(t).bound(bound);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert!(s.is_subtype(t_type, bound));
    assert!(!s.is_nullable(t_type));
}

#[test]
fn test_unbounded_type_parameter_is_nullable() {
    let mut b = GraphBuilder::new();
    let file = b.file("generic.kt");
    let id = b.function(file, "id", TypeInterner::ERROR).id();
    let t = b.type_parameter(id, "T", Variance::Invariant).id();
    let t_type = b.type_parameter_type(t);
    let any = b.any_type();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert!(s.is_nullable(t_type));
    assert!(!s.is_subtype(t_type, any));
    assert!(s.is_subtype(t_type, s.nullable_any()));
}

#[test]
fn test_render_function_and_generic_types() {
    let mut b = GraphBuilder::new();
    let file = b.file("render.kt");
    let holder = b.class(file, "Holder").modality(Modality::Open).id();
    b.type_parameter(holder, "T", Variance::Out);
    let int = b.int_type();
    let string = b.string_type();
    let function = b.function_type(&[int], string);
    let nullable_function = b.nullable(function);
    let holder_type = b.projected_type(holder, &[GraphBuilder::projection(ProjectionKind::In, int)]);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert_eq!(s.render_type(function), "(Int) -> String");
    assert_eq!(s.render_type(nullable_function), "((Int) -> String)?");
    assert_eq!(s.render_type(holder_type), "Holder<in Int>");
    assert!(s.is_functional_type(function));
    assert!(!s.is_reflect_functional_type(function));
}
