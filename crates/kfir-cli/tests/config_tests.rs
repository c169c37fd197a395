//! `kfir.json` parsing, discovery and command-line overrides.

use kfir_checker::CheckerOptions;
use kfir_cli::args::{CheckArgs, OutputFormat};
use kfir_cli::config::{
    CONFIG_FILE_NAME, config_path_for, load_config, parse_config, resolve_options,
};
use kfir_common::LanguageFeature;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn check_args(graph: PathBuf) -> CheckArgs {
    CheckArgs {
        graph,
        config: None,
        format: OutputFormat::Text,
        no_color: true,
        jobs: None,
        warnings_as_errors: false,
        suppress: Vec::new(),
    }
}

#[test]
fn test_parse_config_accepts_comments_and_trailing_commas() {
    let source = r#"{
        // promote everything
        "warningsAsErrors": true,
        /* names are factory names or categories */
        "suppress": ["FINAL_UPPER_BOUND", "warnings",],
        "enableFeatures": ["ValueClasses"],
        "disableFeatures": ["RepeatableAnnotations"],
        "disabledCheckers": ["lateinit"],
    }"#;
    let options = parse_config(source).expect("valid config");
    assert!(options.warnings_as_errors);
    assert_eq!(options.suppress, vec!["FINAL_UPPER_BOUND", "warnings"]);
    assert_eq!(options.enable_features, vec![LanguageFeature::ValueClasses]);
    assert_eq!(options.disable_features, vec![LanguageFeature::RepeatableAnnotations]);
    assert_eq!(options.disabled_checkers, vec!["lateinit"]);

    let settings = options.language_settings();
    assert!(settings.supports_feature(LanguageFeature::ValueClasses));
    assert!(!settings.supports_feature(LanguageFeature::RepeatableAnnotations));
}

#[test]
fn test_parse_config_missing_fields_use_defaults() {
    assert_eq!(parse_config("{}").expect("valid config"), CheckerOptions::default());
}

#[test]
fn test_parse_config_rejects_unknown_feature() {
    let result = parse_config(r#"{"enableFeatures": ["TimeTravel"]}"#);
    assert!(result.is_err());
}

#[test]
fn test_load_config_error_names_the_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"suppress\": ").expect("write config");
    let error = load_config(&path).expect_err("truncated config");
    assert!(format!("{error:#}").contains("broken.json"), "error: {error:#}");
}

#[test]
fn test_config_is_discovered_next_to_the_graph() {
    let dir = TempDir::new().expect("temp dir");
    let graph = dir.path().join("graph.json");
    assert_eq!(config_path_for(&graph, None), None);

    let config = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&config, "{}").expect("write config");
    assert_eq!(config_path_for(&graph, None), Some(config));
}

#[test]
fn test_explicit_config_wins_over_discovery() {
    let dir = TempDir::new().expect("temp dir");
    let graph = dir.path().join("graph.json");
    fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").expect("write config");
    let explicit = dir.path().join("other.json");
    assert_eq!(config_path_for(&graph, Some(&explicit)), Some(explicit));
}

#[test]
fn test_command_line_flags_apply_on_top_of_the_config() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{"suppress": ["UNUSED_EXPRESSION"], "disabledCheckers": ["lateinit"]}"#,
    )
    .expect("write config");

    let mut args = check_args(dir.path().join("graph.json"));
    args.warnings_as_errors = true;
    args.suppress = vec!["UNUSED_EXPRESSION".to_string(), "NOTHING_TO_INLINE".to_string()];
    let options = resolve_options(&args).expect("options");

    assert!(options.warnings_as_errors);
    assert_eq!(options.suppress, vec!["UNUSED_EXPRESSION", "NOTHING_TO_INLINE"]);
    assert_eq!(options.disabled_checkers, vec!["lateinit"]);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let mut args = check_args(dir.path().join("graph.json"));
    args.config = Some(dir.path().join("absent.json"));
    assert!(resolve_options(&args).is_err());
}
