//! Tests for overridden-member lookup through supertype scopes.

use kfir_common::LanguageVersionSettings;
use kfir_tree::{ClassKind, GraphBuilder, Modality, Modifiers, Variance, Visibility};

#[test]
fn test_finds_member_in_direct_supertype() {
    let mut b = GraphBuilder::new();
    let file = b.file("base.kt");
    let unit = b.unit_type();
    let base = b.class(file, "Base").modality(Modality::Open).id();
    let base_run = b.function(base, "run", unit).modality(Modality::Open).id();
    let derived = b.class(file, "Derived").id();
    let base_type = b.class_type(base, &[]);
    b.add_supertype(derived, base_type);
    let derived_run = b
        .function(derived, "run", unit)
        .modifiers(Modifiers::OVERRIDE)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let overridden = s.direct_overridden(derived_run);
    let decls: Vec<_> = overridden.iter().map(|member| member.decl).collect();
    assert_eq!(decls, vec![base_run], "got: {decls:?}");
    assert_eq!(overridden[0].owner, base);
}

#[test]
fn test_skips_intermediate_class_without_member() {
    let mut b = GraphBuilder::new();
    let file = b.file("chain.kt");
    let unit = b.unit_type();
    let top = b.class(file, "Top").modality(Modality::Open).id();
    let top_run = b.function(top, "run", unit).modality(Modality::Open).id();
    let middle = b.class(file, "Middle").modality(Modality::Open).id();
    let top_type = b.class_type(top, &[]);
    b.add_supertype(middle, top_type);
    let bottom = b.class(file, "Bottom").id();
    let middle_type = b.class_type(middle, &[]);
    b.add_supertype(bottom, middle_type);
    let bottom_run = b
        .function(bottom, "run", unit)
        .modifiers(Modifiers::OVERRIDE)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let decls: Vec<_> = s
        .direct_overridden(bottom_run)
        .iter()
        .map(|member| member.decl)
        .collect();
    assert_eq!(decls, vec![top_run], "got: {decls:?}");
}

#[test]
fn test_generic_parameter_types_match_after_substitution() {
    let mut b = GraphBuilder::new();
    let file = b.file("generic.kt");
    let unit = b.unit_type();
    let int = b.int_type();
    let string = b.string_type();
    let consumer = b.class(file, "Consumer").class_kind(ClassKind::Interface).id();
    let t = b.type_parameter(consumer, "T", Variance::In).id();
    let t_type = b.type_parameter_type(t);
    let accept = b
        .function(consumer, "accept", unit)
        .modality(Modality::Abstract)
        .id();
    b.value_parameter(accept, "value", t_type);

    let int_consumer = b.class(file, "IntConsumer").id();
    let consumer_of_int = b.class_type(consumer, &[int]);
    b.add_supertype(int_consumer, consumer_of_int);
    let accept_int = b
        .function(int_consumer, "accept", unit)
        .modifiers(Modifiers::OVERRIDE)
        .id();
    b.value_parameter(accept_int, "value", int);
    let accept_string = b.function(int_consumer, "accept", unit).id();
    b.value_parameter(accept_string, "value", string);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let overridden = s.direct_overridden(accept_int);
    assert_eq!(overridden.len(), 1);
    assert_eq!(overridden[0].decl, accept);
    assert_eq!(overridden[0].substitution.get(&t), Some(&int));
    assert!(s.direct_overridden(accept_string).is_empty());
}

#[test]
fn test_private_members_are_not_overridden() {
    let mut b = GraphBuilder::new();
    let file = b.file("private.kt");
    let unit = b.unit_type();
    let base = b.class(file, "Base").modality(Modality::Open).id();
    let _ = b.function(base, "secret", unit).visibility(Visibility::Private);
    let derived = b.class(file, "Derived").id();
    let base_type = b.class_type(base, &[]);
    b.add_supertype(derived, base_type);
    let secret = b.function(derived, "secret", unit).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    assert!(s.direct_overridden(secret).is_empty());
}

#[test]
fn test_property_overrides_and_closure() {
    let mut b = GraphBuilder::new();
    let file = b.file("props.kt");
    let int = b.int_type();
    let named = b.class(file, "Named").class_kind(ClassKind::Interface).id();
    let named_size = b.property(named, "size", int).modality(Modality::Abstract).id();
    let sized = b.class(file, "Sized").class_kind(ClassKind::Interface).id();
    let named_type = b.class_type(named, &[]);
    b.add_supertype(sized, named_type);
    let sized_size = b
        .property(sized, "size", int)
        .modality(Modality::Abstract)
        .modifiers(Modifiers::OVERRIDE)
        .id();
    let box_class = b.class(file, "Box").id();
    let sized_type = b.class_type(sized, &[]);
    b.add_supertype(box_class, sized_type);
    let box_size = b
        .property(box_class, "size", int)
        .modifiers(Modifiers::OVERRIDE)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let direct: Vec<_> = s.direct_overridden(box_size).iter().map(|m| m.decl).collect();
    assert_eq!(direct, vec![sized_size]);
    assert_eq!(s.all_overridden(box_size), vec![sized_size, named_size]);
}

fn deep_chain(levels: usize) -> (kfir_tree::Session, kfir_tree::DeclId, kfir_tree::DeclId) {
    let mut b = GraphBuilder::new();
    let file = b.file("deep.kt");
    let unit = b.unit_type();
    let top = b.class(file, "C0").modality(Modality::Open).id();
    let top_run = b.function(top, "run", unit).modality(Modality::Open).id();
    let mut previous = top;
    for level in 1..levels {
        let class = b.class(file, &format!("C{level}")).modality(Modality::Open).id();
        let supertype = b.class_type(previous, &[]);
        b.add_supertype(class, supertype);
        previous = class;
    }
    let run = b
        .function(previous, "run", unit)
        .modifiers(Modifiers::OVERRIDE)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");
    (s, top_run, run)
}

#[test]
fn test_search_reaches_member_through_long_chain() {
    let (s, top_run, run) = deep_chain(60);
    let decls: Vec<_> = s.direct_overridden(run).iter().map(|member| member.decl).collect();
    assert_eq!(decls, vec![top_run]);
}

#[test]
fn test_search_stops_past_the_supertype_depth_limit() {
    let (s, _, run) = deep_chain(500);
    assert!(s.direct_overridden(run).is_empty());
}
