//! Annotation applications and annotation class declarations.

use kfir_checker::{CheckerOptions, check_file, registry_for};
use kfir_common::{Diagnostic, LanguageFeature, LanguageVersionSettings};
use kfir_tree::{
    Annotation, ClassKind, ConstValue, DeclId, ExprKind, GraphBuilder, Modifiers, Session,
    UseSiteTarget,
};

fn check(session: &Session, file: DeclId) -> Vec<Diagnostic> {
    let options = CheckerOptions::default();
    let registry = registry_for(&options);
    check_file(session, file, &registry, &options).expect("no invariant violation")
}

fn names(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.factory.as_str()).collect()
}

fn enum_entry(class: &str, entry: &str) -> ConstValue {
    ConstValue::Enum {
        class: class.into(),
        entry: entry.into(),
    }
}

/// `@Target(<entries>)`.
fn target(b: &mut GraphBuilder, entries: &[&str]) -> Annotation {
    let values = entries
        .iter()
        .map(|entry| enum_entry("kotlin/annotation/AnnotationTarget", entry))
        .collect();
    b.annotation("kotlin/annotation/Target")
        .with_argument("allowedTargets", ConstValue::Array(values))
}

/// `@Retention(<entry>)`.
fn retention(b: &mut GraphBuilder, entry: &str) -> Annotation {
    b.annotation("kotlin/annotation/Retention").with_argument(
        "value",
        enum_entry("kotlin/annotation/AnnotationRetention", entry),
    )
}

/// `annotation class <name>` carrying the given meta-annotations.
fn annotation_class(
    b: &mut GraphBuilder,
    parent: DeclId,
    name: &str,
    meta: Vec<Annotation>,
) -> DeclId {
    let mut class = b.class(parent, name).class_kind(ClassKind::AnnotationClass);
    for annotation in meta {
        class = class.annotation(annotation);
    }
    class.id()
}

#[test]
fn test_annotation_on_wrong_target() {
    let mut b = GraphBuilder::new();
    let file = b.file("target.kt");
    let function_only = target(&mut b, &["FUNCTION"]);
    let marker = annotation_class(&mut b, file, "OnFunctions", vec![function_only]);
    let applied = b.annotation_of(marker);
    let anchor = applied.source.expect("source");
    let _ = b.class(file, "C").annotation(applied).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["WRONG_ANNOTATION_TARGET"], "got: {found:?}");
    assert_eq!(found[0].arguments, vec!["class"]);
    assert_eq!(found[0].start, anchor.start);
}

#[test]
fn test_getter_use_site_on_val_is_applicable() {
    let mut b = GraphBuilder::new();
    let file = b.file("getter.kt");
    let int = b.int_type();
    let marker = annotation_class(&mut b, file, "Marker", Vec::new());
    let on_getter = b.annotation_of(marker).with_use_site(UseSiteTarget::Get);
    let _ = b.property(file, "p", int).annotation(on_getter).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert!(found.is_empty(), "got: {found:?}");
}

#[test]
fn test_delegate_use_site_needs_delegated_property() {
    let mut b = GraphBuilder::new();
    let file = b.file("delegate.kt");
    let int = b.int_type();
    let marker = annotation_class(&mut b, file, "Marker", Vec::new());
    let on_delegate = b.annotation_of(marker).with_use_site(UseSiteTarget::Delegate);
    let _ = b.property(file, "p", int).annotation(on_delegate).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["INAPPLICABLE_TARGET_PROPERTY_HAS_NO_DELEGATE"],
        "got: {found:?}"
    );
}

#[test]
fn test_set_use_site_on_val_is_immutable() {
    let mut b = GraphBuilder::new();
    let file = b.file("setter.kt");
    let int = b.int_type();
    let marker = annotation_class(&mut b, file, "Marker", Vec::new());
    let on_setter = b.annotation_of(marker).with_use_site(UseSiteTarget::Set);
    let _ = b.property(file, "p", int).annotation(on_setter).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert!(
        names(&found).contains(&"INAPPLICABLE_TARGET_PROPERTY_IMMUTABLE"),
        "got: {found:?}"
    );
    assert_eq!(found[0].arguments, vec!["set"]);
}

#[test]
fn test_repeated_annotation_unless_repeatable() {
    let mut b = GraphBuilder::new();
    let file = b.file("repeated.kt");
    let once = annotation_class(&mut b, file, "Once", Vec::new());
    let repeatable = b.annotation("kotlin/annotation/Repeatable");
    let many = annotation_class(&mut b, file, "Many", vec![repeatable]);
    let first = b.annotation_of(once);
    let second = b.annotation_of(once);
    let anchor = second.source.expect("source");
    let many_first = b.annotation_of(many);
    let many_second = b.annotation_of(many);
    let _ = b
        .class(file, "C")
        .annotation(first)
        .annotation(second)
        .annotation(many_first)
        .annotation(many_second)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["REPEATED_ANNOTATION"], "got: {found:?}");
    assert_eq!(found[0].start, anchor.start);
}

#[test]
fn test_same_annotation_with_different_use_sites_is_not_repeated() {
    let mut b = GraphBuilder::new();
    let file = b.file("use_sites.kt");
    let int = b.int_type();
    let marker = annotation_class(&mut b, file, "Marker", Vec::new());
    let on_property = b.annotation_of(marker);
    let on_getter = b.annotation_of(marker).with_use_site(UseSiteTarget::Get);
    let _ = b
        .property(file, "p", int)
        .annotation(on_property)
        .annotation(on_getter)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert!(found.is_empty(), "got: {found:?}");
}

fn repeated_on_getter(settings: LanguageVersionSettings) -> Vec<Diagnostic> {
    let mut b = GraphBuilder::new();
    let file = b.file("accessor.kt");
    let int = b.int_type();
    let marker = annotation_class(&mut b, file, "Marker", Vec::new());
    let on_getter = b.annotation_of(marker).with_use_site(UseSiteTarget::Get);
    let p = b.property(file, "p", int).annotation(on_getter).id();
    let direct = b.annotation_of(marker);
    let _ = b.getter(p).annotation(direct).id();
    let s = b.finish(settings).expect("valid graph");
    check(&s, file)
}

#[test]
fn test_use_site_annotation_repeated_on_accessor() {
    let found = repeated_on_getter(LanguageVersionSettings::default());
    assert_eq!(names(&found), vec!["REPEATED_ANNOTATION_WARNING"], "got: {found:?}");

    let settings = LanguageVersionSettings::default()
        .with_feature(LanguageFeature::ProhibitRepeatedUseSiteTargetAnnotations, true);
    let found = repeated_on_getter(settings);
    assert_eq!(names(&found), vec!["REPEATED_ANNOTATION"], "got: {found:?}");
}

#[test]
fn test_annotation_class_parameter_shapes() {
    let mut b = GraphBuilder::new();
    let file = b.file("shape.kt");
    let int = b.int_type();
    let string = b.string_type();
    let nullable_string = b.nullable(string);
    let plain = b.class(file, "Plain").id();
    let plain_type = b.class_type(plain, &[]);

    let shape = annotation_class(&mut b, file, "Shape", Vec::new());
    let constructor = b.constructor(shape, true).id();
    let _ = b
        .value_parameter(constructor, "ok", int)
        .modifiers(Modifiers::VAL)
        .id();
    b.value_parameter(constructor, "bare", int);
    let _ = b
        .value_parameter(constructor, "mutable", int)
        .modifiers(Modifiers::VAR)
        .id();
    let _ = b
        .value_parameter(constructor, "optional", nullable_string)
        .modifiers(Modifiers::VAL)
        .id();
    let _ = b
        .value_parameter(constructor, "object", plain_type)
        .modifiers(Modifiers::VAL)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec![
            "MISSING_VAL_ON_ANNOTATION_PARAMETER",
            "VAR_ANNOTATION_PARAMETER",
            "NULLABLE_TYPE_OF_ANNOTATION_MEMBER",
            "INVALID_TYPE_OF_ANNOTATION_MEMBER",
        ],
        "got: {found:?}"
    );
}

#[test]
fn test_annotation_class_members_and_supertypes() {
    let mut b = GraphBuilder::new();
    let file = b.file("members.kt");
    let unit = b.unit_type();
    let marker_interface = b
        .class(file, "Marker")
        .class_kind(ClassKind::Interface)
        .id();
    let marker_type = b.class_type(marker_interface, &[]);
    let shape = annotation_class(&mut b, file, "Shape", Vec::new());
    b.add_supertype(shape, marker_type);
    b.function(shape, "describe", unit);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(
        names(&found),
        vec!["SUPERTYPES_FOR_ANNOTATION_CLASS", "ANNOTATION_CLASS_MEMBER"],
        "got: {found:?}"
    );
}

#[test]
fn test_local_annotation_class() {
    let mut b = GraphBuilder::new();
    let file = b.file("local.kt");
    let unit = b.unit_type();
    let f = b.function(file, "f", unit).id();
    let local = annotation_class(&mut b, f, "Local", Vec::new());
    let statement = b.expr(ExprKind::LocalDeclaration { declaration: local }, unit);
    let body = b.block(vec![statement]);
    b.set_body(f, body);
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check(&s, file);
    assert_eq!(names(&found), vec!["LOCAL_ANNOTATION_CLASS_ERROR"], "got: {found:?}");
}

fn expression_annotation(retention_entry: Option<&str>, settings: LanguageVersionSettings) -> Vec<Diagnostic> {
    let mut b = GraphBuilder::new();
    let file = b.file("retention.kt");
    let mut meta = vec![target(&mut b, &["EXPRESSION"])];
    if let Some(entry) = retention_entry {
        meta.push(retention(&mut b, entry));
    }
    annotation_class(&mut b, file, "Traced", meta);
    let s = b.finish(settings).expect("valid graph");
    check(&s, file)
}

#[test]
fn test_expression_annotation_requires_source_retention() {
    let found = expression_annotation(None, LanguageVersionSettings::default());
    assert_eq!(
        names(&found),
        vec!["RESTRICTED_RETENTION_FOR_EXPRESSION_ANNOTATION"],
        "got: {found:?}"
    );

    let found = expression_annotation(Some("BINARY"), LanguageVersionSettings::default());
    assert_eq!(
        names(&found),
        vec!["RESTRICTED_RETENTION_FOR_EXPRESSION_ANNOTATION"],
        "got: {found:?}"
    );

    let found = expression_annotation(Some("SOURCE"), LanguageVersionSettings::default());
    assert!(found.is_empty(), "got: {found:?}");

    let found = expression_annotation(None, LanguageVersionSettings::empty());
    assert_eq!(
        names(&found),
        vec!["RESTRICTED_RETENTION_FOR_EXPRESSION_ANNOTATION_WARNING"],
        "got: {found:?}"
    );
}
