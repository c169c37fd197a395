//! Tests for the persistent checker context.

use kfir_checker::CheckerContext;
use kfir_common::{DiagnosticCategory, LanguageVersionSettings};
use kfir_tree::{DeclId, GraphBuilder, Modality, ResolvePhase, Session};

struct Fixture {
    session: Session,
    file: DeclId,
    outer: DeclId,
    inner: DeclId,
    run: DeclId,
    sibling: DeclId,
}

fn fixture() -> Fixture {
    let mut b = GraphBuilder::new();
    let file = b.file("context.kt");
    let unit = b.unit_type();
    let outer = b.class(file, "Outer").modality(Modality::Open).id();
    let inner = b.class(outer, "Inner").id();
    let run = b.function(inner, "run", unit).id();
    let sibling = b.function(outer, "sibling", unit).id();
    let session = b.finish(LanguageVersionSettings::default()).expect("valid graph");
    Fixture {
        session,
        file,
        outer,
        inner,
        run,
        sibling,
    }
}

#[test]
fn test_with_declaration_leaves_original_untouched() {
    let f = fixture();
    let root = CheckerContext::new(&f.session, f.file).with_declaration(f.file);
    let nested = root.with_declaration(f.outer).with_declaration(f.inner);

    assert_eq!(root.depth(), 1);
    assert_eq!(root.current(), Some(f.file));
    assert_eq!(nested.depth(), 3);
    assert_eq!(nested.current(), Some(f.inner));
    assert_eq!(nested.container(), Some(f.outer));
}

#[test]
fn test_sibling_branches_do_not_observe_each_other() {
    let f = fixture();
    let outer = CheckerContext::new(&f.session, f.file)
        .with_declaration(f.file)
        .with_declaration(f.outer);
    let left = outer.with_declaration(f.inner).with_declaration(f.run);
    let right = outer.with_declaration(f.sibling);

    assert_eq!(left.containing_declarations(), vec![f.file, f.outer, f.inner, f.run]);
    assert_eq!(right.containing_declarations(), vec![f.file, f.outer, f.sibling]);
    assert_eq!(outer.containing_declarations(), vec![f.file, f.outer]);
}

#[test]
fn test_containing_declarations_are_outermost_first() {
    let f = fixture();
    let context = CheckerContext::new(&f.session, f.file)
        .with_declaration(f.file)
        .with_declaration(f.outer)
        .with_declaration(f.inner)
        .with_declaration(f.run);

    let innermost: Vec<DeclId> = context.declarations_innermost_first().collect();
    assert_eq!(innermost, vec![f.run, f.inner, f.outer, f.file]);
    assert_eq!(context.containing_declarations(), vec![f.file, f.outer, f.inner, f.run]);
}

#[test]
fn test_find_closest_and_closest_class() {
    let f = fixture();
    let context = CheckerContext::new(&f.session, f.file)
        .with_declaration(f.file)
        .with_declaration(f.outer)
        .with_declaration(f.inner)
        .with_declaration(f.run);

    assert_eq!(context.find_closest(|decl| decl.as_class().is_some()), Some(f.inner));
    assert_eq!(context.find_closest(|decl| decl.as_file().is_some()), Some(f.file));
    assert_eq!(context.find_closest(|decl| decl.as_constructor().is_some()), None);
    assert_eq!(context.closest_class_except(f.inner), Some(f.outer));
    assert_eq!(context.closest_class_except(f.run), Some(f.inner));
}

#[test]
fn test_suppression_by_name_and_category() {
    let f = fixture();
    let root = CheckerContext::new(&f.session, f.file);
    assert!(!root.is_suppressed("UNUSED_EXPRESSION", DiagnosticCategory::Warning));

    let by_name = root.with_suppressed_names(["UNUSED_EXPRESSION"]);
    assert!(by_name.is_suppressed("UNUSED_EXPRESSION", DiagnosticCategory::Warning));
    assert!(!by_name.is_suppressed("NOTHING_TO_INLINE", DiagnosticCategory::Warning));

    let by_category = root.with_suppressed_names(["warnings"]);
    assert!(by_category.is_suppressed("NOTHING_TO_INLINE", DiagnosticCategory::Warning));
    assert!(!by_category.is_suppressed("NOTHING_TO_OVERRIDE", DiagnosticCategory::Error));

    let errors = root.with_suppressed_names(["errors"]);
    assert!(errors.is_suppressed("NOTHING_TO_OVERRIDE", DiagnosticCategory::Error));
}

#[test]
fn test_suppression_frames_stack_and_stay_scoped() {
    let f = fixture();
    let root = CheckerContext::new(&f.session, f.file);
    let outer = root.with_suppressed_names(["A"]);
    let inner = outer.with_suppressed_names(["B"]);

    assert!(inner.is_suppressed("A", DiagnosticCategory::Error));
    assert!(inner.is_suppressed("B", DiagnosticCategory::Error));
    assert!(!outer.is_suppressed("B", DiagnosticCategory::Error));
    assert!(!root.is_suppressed("A", DiagnosticCategory::Error));

    let mut names = inner.suppressed_names();
    names.sort();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_suppress_annotation_opens_frame() {
    let mut b = GraphBuilder::new();
    let file = b.file("suppress.kt");
    let suppress = b.suppress(&["NOTHING_TO_OVERRIDE", "REDUNDANT_PROJECTION"]);
    let deprecated = b.annotation("kotlin/Deprecated");
    let session = b.finish(LanguageVersionSettings::default()).expect("valid graph");

    let root = CheckerContext::new(&session, file);
    let context = root.with_suppressed_diagnostics(&[deprecated.clone(), suppress]);
    assert!(context.is_suppressed("NOTHING_TO_OVERRIDE", DiagnosticCategory::Error));
    assert!(context.is_suppressed("REDUNDANT_PROJECTION", DiagnosticCategory::Warning));

    // Annotations other than @Suppress push nothing.
    let untouched = root.with_suppressed_diagnostics(&[deprecated]);
    assert!(untouched.suppressed_names().is_empty());
}

#[test]
fn test_empty_suppression_list_pushes_no_frame() {
    let f = fixture();
    let root = CheckerContext::new(&f.session, f.file);
    let same = root.with_suppressed_names(Vec::<String>::new());
    assert!(same.suppressed_names().is_empty());
    assert_eq!(same.depth(), root.depth());
}

#[test]
fn test_required_phase_defaults_to_body_resolve() {
    let f = fixture();
    let root = CheckerContext::new(&f.session, f.file);
    assert_eq!(root.required_phase(), ResolvePhase::BodyResolve);

    let relaxed = root.with_required_phase(ResolvePhase::Types);
    assert_eq!(relaxed.required_phase(), ResolvePhase::Types);
    assert_eq!(root.required_phase(), ResolvePhase::BodyResolve);
    assert_eq!(relaxed.file_path(), "context.kt");
    assert_eq!(relaxed.file(), f.file);
}
