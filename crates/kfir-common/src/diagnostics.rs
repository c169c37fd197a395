//! Diagnostic types produced by the checker.
//!
//! A diagnostic is identified by the name of the factory that created it
//! (e.g. `NOTHING_TO_OVERRIDE`), not by a numeric code. Message templates use
//! `{0}`, `{1}`, ... placeholders which are filled in by [`format_message`].

use serde::{Deserialize, Serialize};

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Info = 2,
}

impl DiagnosticCategory {
    /// The name used in `@Suppress` arguments to silence a whole category.
    #[must_use]
    pub const fn suppression_name(self) -> &'static str {
        match self {
            Self::Warning => "warnings",
            Self::Error => "errors",
            Self::Info => "infos",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Related information for a diagnostic (e.g. the overridden declaration).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

/// A reported rule violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    /// Name of the factory that produced this diagnostic.
    pub factory: String,
    /// Rendered positional arguments, in factory order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    #[must_use]
    pub fn new(
        file: String,
        start: u32,
        length: u32,
        category: DiagnosticCategory,
        factory: &str,
        message: String,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category,
            factory: factory.to_string(),
            arguments,
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message,
        });
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
