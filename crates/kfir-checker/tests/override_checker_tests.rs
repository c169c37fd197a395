//! Tests for override compatibility: modifiers, modality, visibility and types.

use kfir_checker::{CheckerOptions, check_file, registry_for};
use kfir_common::{Diagnostic, LanguageVersionSettings};
use kfir_tree::{
    ClassKind, ConstValue, DeclId, GraphBuilder, Modality, Modifiers, Session, Variance, Visibility,
};

fn check(session: &Session, file: DeclId) -> Vec<Diagnostic> {
    let options = CheckerOptions::default();
    let registry = registry_for(&options);
    check_file(session, file, &registry, &options).expect("no invariant violation")
}

fn names(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.factory.as_str()).collect()
}

/// `open class A { <base> }` and `class B : A() { <derived> }`.
struct Pair {
    b: GraphBuilder,
    file: DeclId,
    a: DeclId,
    derived: DeclId,
}

fn pair() -> Pair {
    let mut b = GraphBuilder::new();
    let file = b.file("pair.kt");
    let a = b.class(file, "A").modality(Modality::Open).id();
    let derived = b.class(file, "B").id();
    let a_type = b.class_type(a, &[]);
    b.add_supertype(derived, a_type);
    Pair { b, file, a, derived }
}

#[test]
fn test_override_without_base_is_nothing_to_override() {
    let Pair {
        mut b,
        file,
        derived,
        ..
    } = pair();
    let unit = b.unit_type();
    let _ = b.function(derived, "f", unit).modifiers(Modifiers::OVERRIDE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["NOTHING_TO_OVERRIDE"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["B.f"]);
}

#[test]
fn test_missing_override_hides_virtual_member() {
    let Pair {
        mut b,
        file,
        a,
        derived,
    } = pair();
    let unit = b.unit_type();
    let _ = b.function(a, "f", unit).modality(Modality::Open).id();
    b.function(derived, "f", unit);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["VIRTUAL_MEMBER_HIDDEN"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["B.f", "A"]);
    assert_eq!(found[0].related_information.len(), 1);
}

#[test]
fn test_overriding_final_member() {
    let Pair {
        mut b,
        file,
        a,
        derived,
    } = pair();
    let unit = b.unit_type();
    b.function(a, "f", unit);
    let _ = b.function(derived, "f", unit).modifiers(Modifiers::OVERRIDE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["OVERRIDING_FINAL_MEMBER"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["A.f", "A"]);
}

#[test]
fn test_var_overridden_by_val() {
    let Pair {
        mut b,
        file,
        a,
        derived,
    } = pair();
    let int = b.int_type();
    let _ = b
        .property(a, "p", int)
        .modifiers(Modifiers::VAR)
        .modality(Modality::Open)
        .id();
    let _ = b.property(derived, "p", int).modifiers(Modifiers::OVERRIDE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["VAR_OVERRIDDEN_BY_VAL"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["B.p", "A.p"]);
}

fn visibility_case(base: Visibility, derived: Visibility) -> Vec<String> {
    let Pair {
        mut b,
        file,
        a,
        derived: class,
    } = pair();
    let unit = b.unit_type();
    let _ = b
        .function(a, "f", unit)
        .modality(Modality::Open)
        .visibility(base)
        .id();
    let _ = b
        .function(class, "f", unit)
        .modifiers(Modifiers::OVERRIDE)
        .visibility(derived)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");
    check(&s, file).into_iter().map(|d| d.factory).collect()
}

#[test]
fn test_visibility_table() {
    use Visibility::{Internal, Private, Protected, Public};
    let cases: [(Visibility, Visibility, &[&str]); 9] = [
        (Public, Protected, &["CANNOT_WEAKEN_ACCESS_PRIVILEGE"]),
        (Public, Internal, &["CANNOT_WEAKEN_ACCESS_PRIVILEGE"]),
        (Public, Private, &["CANNOT_WEAKEN_ACCESS_PRIVILEGE"]),
        (Protected, Internal, &["CANNOT_CHANGE_ACCESS_PRIVILEGE"]),
        (Internal, Protected, &["CANNOT_CHANGE_ACCESS_PRIVILEGE"]),
        (Protected, Public, &[]),
        (Internal, Public, &[]),
        (Public, Public, &[]),
        // A private base is not overridable at all.
        (Private, Public, &["NOTHING_TO_OVERRIDE"]),
    ];
    for (base, derived, expected) in cases {
        let found = visibility_case(base, derived);
        assert_eq!(found, expected, "base {base:?}, override {derived:?}");
    }
}

#[test]
fn test_access_privilege_names_the_overriding_visibility() {
    let Pair {
        mut b,
        file,
        a,
        derived,
    } = pair();
    let unit = b.unit_type();
    let _ = b
        .function(a, "f", unit)
        .modality(Modality::Open)
        .visibility(Visibility::Protected)
        .id();
    let _ = b
        .function(derived, "f", unit)
        .modifiers(Modifiers::OVERRIDE)
        .visibility(Visibility::Internal)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["CANNOT_CHANGE_ACCESS_PRIVILEGE"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["internal", "A.f", "A"]);
}

#[test]
fn test_weakened_property_reports_on_property() {
    let Pair {
        mut b,
        file,
        a,
        derived,
    } = pair();
    let int = b.int_type();
    let _ = b.property(a, "p", int).modality(Modality::Open).id();
    let p = b
        .property(derived, "p", int)
        .modifiers(Modifiers::OVERRIDE)
        .visibility(Visibility::Protected)
        .id();
    let anchor = b.decl(p).source.expect("source");
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["CANNOT_WEAKEN_ACCESS_PRIVILEGE"], "got: {found:?}");
    assert_eq!(found[0].start, anchor.start);
    assert_eq!(found[0].arguments, vec!["protected", "A.<get-p>", "A"]);
}

#[test]
fn test_internal_member_of_other_module_is_invisible() {
    let mut b = GraphBuilder::new();
    let library = b.library_file("lib.kt", "lib");
    let file = b.file("main.kt");
    let unit = b.unit_type();
    let base = b.class(library, "Base").modality(Modality::Open).id();
    let _ = b
        .function(base, "f", unit)
        .modality(Modality::Open)
        .visibility(Visibility::Internal)
        .id();
    let derived = b.class(file, "Derived").id();
    let base_type = b.class_type(base, &[]);
    b.add_supertype(derived, base_type);
    let _ = b.function(derived, "f", unit).modifiers(Modifiers::OVERRIDE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["CANNOT_OVERRIDE_INVISIBLE_MEMBER"], "got: {found:?}");
}

#[test]
fn test_override_of_deprecated_member() {
    let Pair {
        mut b,
        file,
        a,
        derived,
    } = pair();
    let unit = b.unit_type();
    let deprecated = b
        .annotation("kotlin/Deprecated")
        .with_argument("message", ConstValue::String("use g".into()));
    let _ = b
        .function(a, "f", unit)
        .modality(Modality::Open)
        .annotation(deprecated)
        .id();
    let _ = b.function(derived, "f", unit).modifiers(Modifiers::OVERRIDE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["OVERRIDE_DEPRECATION"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["A.f", "use g"]);
}

#[test]
fn test_deprecated_override_of_deprecated_member_is_fine() {
    let Pair {
        mut b,
        file,
        a,
        derived,
    } = pair();
    let unit = b.unit_type();
    let on_base = b.annotation("kotlin/Deprecated");
    let on_override = b.annotation("kotlin/Deprecated");
    let _ = b
        .function(a, "f", unit)
        .modality(Modality::Open)
        .annotation(on_base)
        .id();
    let _ = b
        .function(derived, "f", unit)
        .modifiers(Modifiers::OVERRIDE)
        .annotation(on_override)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert!(found.is_empty(), "got: {found:?}");
}

#[test]
fn test_property_type_mismatch() {
    let Pair {
        mut b,
        file,
        a,
        derived,
    } = pair();
    let int = b.int_type();
    let any = b.any_type();
    let _ = b.property(a, "p", int).modality(Modality::Open).id();
    let _ = b.property(derived, "p", any).modifiers(Modifiers::OVERRIDE).id();
    let _ = b
        .property(a, "q", int)
        .modifiers(Modifiers::VAR)
        .modality(Modality::Open)
        .id();
    let nothing = b.builtin("kotlin/Nothing");
    let _ = b
        .property(derived, "q", nothing)
        .modifiers(Modifiers::OVERRIDE | Modifiers::VAR)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["PROPERTY_TYPE_MISMATCH_ON_OVERRIDE", "VAR_TYPE_MISMATCH_ON_OVERRIDE"],
        "got: {found:?}"
    );
}

#[test]
fn test_return_types_compared_after_substitution() {
    let mut b = GraphBuilder::new();
    let file = b.file("generic.kt");
    let int = b.int_type();
    let string = b.string_type();
    let boxed = b.class(file, "Box").class_kind(ClassKind::Interface).id();
    let t = b.type_parameter(boxed, "T", Variance::Invariant).id();
    let t_type = b.type_parameter_type(t);
    let _ = b.function(boxed, "get", t_type).modality(Modality::Abstract).id();
    let _ = b.function(boxed, "name", t_type).modality(Modality::Abstract).id();

    let int_box = b.class(file, "IntBox").id();
    let box_of_int = b.class_type(boxed, &[int]);
    b.add_supertype(int_box, box_of_int);
    let _ = b.function(int_box, "get", int).modifiers(Modifiers::OVERRIDE).id();
    let _ = b.function(int_box, "name", string).modifiers(Modifiers::OVERRIDE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["RETURN_TYPE_MISMATCH_ON_OVERRIDE"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["IntBox.name", "Box.name"]);
}
