//! Tests for `@Suppress` scoping, global suppression and warnings-as-errors.

use kfir_checker::{CheckerOptions, check_file, registry_for};
use kfir_common::{Diagnostic, DiagnosticCategory, LanguageVersionSettings};
use kfir_tree::{DeclId, GraphBuilder, Modality, Modifiers, Session};

fn check_with(session: &Session, file: DeclId, options: &CheckerOptions) -> Vec<Diagnostic> {
    check_file(session, file, &registry_for(options), options).expect("no invariant violation")
}

fn names(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.factory.as_str()).collect()
}

#[test]
fn test_suppress_on_member_silences_its_diagnostic() {
    let mut b = GraphBuilder::new();
    let file = b.file("member.kt");
    let unit = b.unit_type();
    let class = b.class(file, "C").id();
    let suppress = b.suppress(&["NOTHING_TO_OVERRIDE"]);
    let _ = b
        .function(class, "f", unit)
        .modifiers(Modifiers::OVERRIDE)
        .annotation(suppress)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check_with(&s, file, &CheckerOptions::default());
    assert!(found.is_empty(), "got: {found:?}");
}

#[test]
fn test_suppress_on_class_covers_members() {
    let mut b = GraphBuilder::new();
    let file = b.file("class.kt");
    let unit = b.unit_type();
    let suppress = b.suppress(&["NOTHING_TO_OVERRIDE"]);
    let class = b.class(file, "C").annotation(suppress).id();
    let _ = b.function(class, "f", unit).modifiers(Modifiers::OVERRIDE).id();
    let _ = b.function(class, "g", unit).modifiers(Modifiers::OVERRIDE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check_with(&s, file, &CheckerOptions::default());
    assert!(found.is_empty(), "got: {found:?}");
}

#[test]
fn test_suppression_does_not_leak_to_siblings() {
    let mut b = GraphBuilder::new();
    let file = b.file("siblings.kt");
    let unit = b.unit_type();
    let class = b.class(file, "C").id();
    let suppress = b.suppress(&["NOTHING_TO_OVERRIDE"]);
    let _ = b
        .function(class, "quiet", unit)
        .modifiers(Modifiers::OVERRIDE)
        .annotation(suppress)
        .id();
    let loud = b
        .function(class, "loud", unit)
        .modifiers(Modifiers::OVERRIDE)
        .id();
    let anchor = b.decl(loud).source.expect("source");
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check_with(&s, file, &CheckerOptions::default());
    assert_eq!(names(&found), vec!["NOTHING_TO_OVERRIDE"], "got: {found:?}");
    assert_eq!(found[0].start, anchor.start);
    assert_eq!(found[0].arguments, vec!["C.loud"]);
}

#[test]
fn test_warnings_category_silences_only_warnings() {
    let mut b = GraphBuilder::new();
    let file = b.file("category.kt");
    let unit = b.unit_type();
    let suppress = b.suppress(&["warnings"]);
    let class = b.class(file, "C").annotation(suppress).id();
    // `inline fun g()` with nothing to inline is a warning.
    let _ = b.function(class, "g", unit).modifiers(Modifiers::INLINE).id();
    let _ = b.function(class, "f", unit).modifiers(Modifiers::OVERRIDE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check_with(&s, file, &CheckerOptions::default());
    assert_eq!(names(&found), vec!["NOTHING_TO_OVERRIDE"], "got: {found:?}");
}

#[test]
fn test_global_suppress_option() {
    let mut b = GraphBuilder::new();
    let file = b.file("global.kt");
    let unit = b.unit_type();
    let _ = b.function(file, "g", unit).modifiers(Modifiers::INLINE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check_with(&s, file, &CheckerOptions::default());
    assert_eq!(names(&found), vec!["NOTHING_TO_INLINE"], "got: {found:?}");
    assert_eq!(found[0].category, DiagnosticCategory::Warning);

    let options = CheckerOptions {
        suppress: vec!["NOTHING_TO_INLINE".to_string()],
        ..CheckerOptions::default()
    };
    let found = check_with(&s, file, &options);
    assert!(found.is_empty(), "got: {found:?}");
}

#[test]
fn test_warnings_as_errors_promotes_category() {
    let mut b = GraphBuilder::new();
    let file = b.file("promote.kt");
    let unit = b.unit_type();
    let _ = b.function(file, "g", unit).modifiers(Modifiers::INLINE).id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let options = CheckerOptions {
        warnings_as_errors: true,
        ..CheckerOptions::default()
    };
    let found = check_with(&s, file, &options);
    assert_eq!(names(&found), vec!["NOTHING_TO_INLINE"], "got: {found:?}");
    assert_eq!(found[0].category, DiagnosticCategory::Error);
    assert!(found[0].is_error());
}

#[test]
fn test_suppressed_warning_stays_suppressed_under_warnings_as_errors() {
    let mut b = GraphBuilder::new();
    let file = b.file("promote.kt");
    let unit = b.unit_type();
    let suppress = b.suppress(&["warnings"]);
    let _ = b
        .function(file, "g", unit)
        .modifiers(Modifiers::INLINE)
        .annotation(suppress)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let options = CheckerOptions {
        warnings_as_errors: true,
        ..CheckerOptions::default()
    };
    let found = check_with(&s, file, &options);
    assert!(found.is_empty(), "got: {found:?}");
}

#[test]
fn test_suppress_on_parameter_covers_parameter_diagnostics() {
    let mut b = GraphBuilder::new();
    let file = b.file("parameter.kt");
    let unit = b.unit_type();
    let int = b.int_type();
    let open = b.class(file, "Open").modality(Modality::Open).id();
    let f = b.function(open, "f", unit).id();
    let suppress = b.suppress(&["ILLEGAL_INLINE_PARAMETER_MODIFIER"]);
    let _ = b
        .value_parameter(f, "x", int)
        .modifiers(Modifiers::NOINLINE)
        .annotation(suppress)
        .id();
    let s = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let found = check_with(&s, file, &CheckerOptions::default());
    assert!(found.is_empty(), "got: {found:?}");
}
