//! Tests for the diagnostic model, source anchors and feature settings.

use kfir_common::{
    Diagnostic, DiagnosticCategory, FakeSourceKind, LanguageFeature, LanguageVersionSettings,
    SourceElement, format_message,
};

#[test]
fn test_format_message_fills_positional_placeholders() {
    let text = format_message("''{0}'' hides member of supertype ''{1}''", &["f", "A"]);
    assert_eq!(text, "''f'' hides member of supertype ''A''");
}

#[test]
fn test_format_message_repeated_placeholder() {
    assert_eq!(format_message("{0} and {0}", &["x"]), "x and x");
}

#[test]
fn test_diagnostic_json_omits_empty_collections() {
    let diagnostic = Diagnostic::new(
        "a.kt".to_string(),
        3,
        4,
        DiagnosticCategory::Error,
        "NOTHING_TO_OVERRIDE",
        "'f' overrides nothing".to_string(),
        Vec::new(),
    );
    let json = serde_json::to_string(&diagnostic).unwrap();
    assert!(!json.contains("related_information"), "got: {json}");
    assert!(!json.contains("arguments"), "got: {json}");

    let related = diagnostic.with_related("a.kt".to_string(), 0, 1, "here".to_string());
    assert_eq!(related.related_information.len(), 1);
    assert!(related.is_error());
}

#[test]
fn test_source_element_fake_kind() {
    let real = SourceElement::real(10, 5);
    assert!(!real.is_fake());
    assert_eq!(real.end(), 15);

    let fake = real.with_fake_kind(FakeSourceKind::DefaultAccessor);
    assert!(fake.is_fake());
    assert_eq!(fake.fake_kind(), Some(FakeSourceKind::DefaultAccessor));
    assert_eq!(fake.start, real.start);
}

#[test]
fn test_language_settings_defaults_and_toggles() {
    let settings = LanguageVersionSettings::default();
    assert!(settings.supports_feature(LanguageFeature::RepeatableAnnotations));
    assert!(!settings.supports_feature(LanguageFeature::ProhibitProtectedCallFromInline));

    let settings = settings.with_feature(LanguageFeature::ProhibitProtectedCallFromInline, true);
    assert!(settings.supports_feature(LanguageFeature::ProhibitProtectedCallFromInline));

    let empty = LanguageVersionSettings::empty();
    assert!(empty.enabled_features().is_empty());
}

#[test]
fn test_category_suppression_names() {
    assert_eq!(DiagnosticCategory::Warning.suppression_name(), "warnings");
    assert_eq!(DiagnosticCategory::Error.as_str(), "error");
}
