use colored::Colorize;

use kfir_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

use crate::driver::CheckOutcome;

/// Renders diagnostics as `file:offset - category FACTORY: message` lines.
///
/// The graph carries no source text, so locations are character offsets.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = format_location(&diagnostic.file, diagnostic.start);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_factory(&diagnostic.factory));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    /// `Found 2 errors and 1 warning in 3 files.`
    pub fn summary(&self, outcome: &CheckOutcome) -> String {
        let errors = outcome.error_count();
        let warnings = outcome.warning_count();
        let files = outcome.files_checked;
        if errors == 0 && warnings == 0 {
            let text = format!("No problems found in {files} {}.", plural(files, "file"));
            return if self.color { text.green().to_string() } else { text };
        }
        let text = format!(
            "Found {errors} {} and {warnings} {} in {files} {}.",
            plural(errors, "error"),
            plural(warnings, "warning"),
            plural(files, "file"),
        );
        if !self.color {
            return text;
        }
        if errors > 0 {
            text.red().bold().to_string()
        } else {
            text.yellow().bold().to_string()
        }
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        let location = format_location(&related.file, related.start);
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!("{prefix}: {location} - {}", related.message_text)
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Info => label.cyan().bold().to_string(),
        }
    }

    fn format_factory(&self, factory: &str) -> String {
        if self.color {
            factory.bright_blue().to_string()
        } else {
            factory.to_string()
        }
    }
}

fn format_location(file: &str, offset: u32) -> String {
    if file.is_empty() {
        format!("<unknown>:{offset}")
    } else {
        format!("{file}:{offset}")
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

/// Pretty-printed JSON array of `diagnostics`.
pub fn render_json(diagnostics: &[Diagnostic]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diagnostics)
}
