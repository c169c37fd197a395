//! The diagnostic sink and the suppression-aware `report_on` entry point.

use crate::context::CheckerContext;
use crate::diagnostics::factory::{DiagnosticArgs, DiagnosticFactory};
use kfir_common::{Diagnostic, DiagnosticCategory, SourceElement};
use kfir_tree::DeclId;
use rustc_hash::FxHashSet;

/// Append-only sink for one file-check invocation.
pub trait DiagnosticReporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl dyn DiagnosticReporter + '_ {
    /// Create and record a diagnostic at `source` unless a live suppression
    /// frame silences it. A missing source drops the diagnostic.
    pub fn report_on<A: DiagnosticArgs>(
        &mut self,
        source: Option<SourceElement>,
        factory: &DiagnosticFactory<A>,
        args: A,
        context: &CheckerContext<'_>,
    ) {
        self.report_on_with_related(source, factory, args, &[], context);
    }

    /// Like [`report_on`](Self::report_on), pointing at related declarations.
    pub fn report_on_with_related<A: DiagnosticArgs>(
        &mut self,
        source: Option<SourceElement>,
        factory: &DiagnosticFactory<A>,
        args: A,
        related: &[DeclId],
        context: &CheckerContext<'_>,
    ) {
        let Some(source) = source else {
            tracing::trace!(factory = factory.name, "no source to anchor diagnostic");
            return;
        };
        if context.is_suppressed(factory.name, factory.severity) {
            tracing::trace!(factory = factory.name, start = source.start, "suppressed");
            return;
        }
        let session = context.session();
        let (arguments, message) = factory.render(&args, session);
        let mut diagnostic = Diagnostic::new(
            context.file_path().to_string(),
            source.start,
            source.length,
            factory.severity,
            factory.name,
            message,
            arguments,
        );
        for &decl in related {
            if let Some(anchor) = session.decl(decl).source {
                diagnostic = diagnostic.with_related(
                    session.file_path(decl).to_string(),
                    anchor.start,
                    anchor.length,
                    format!("'{}' is declared here", session.render_decl(decl)),
                );
            }
        }
        self.report(diagnostic);
    }
}

/// Collects the diagnostics of one file.
///
/// The same factory reported twice at the same span is recorded once.
#[derive(Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(String, u32, u32)>,
    warnings_as_errors: bool,
}

impl DiagnosticCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Names of the collected factories, in report order.
    #[must_use]
    pub fn factory_names(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .map(|diagnostic| diagnostic.factory.as_str())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticReporter for DiagnosticCollector {
    fn report(&mut self, mut diagnostic: Diagnostic) {
        let key = (diagnostic.factory.clone(), diagnostic.start, diagnostic.length);
        if !self.seen.insert(key) {
            return;
        }
        if self.warnings_as_errors && diagnostic.category == DiagnosticCategory::Warning {
            diagnostic.category = DiagnosticCategory::Error;
        }
        tracing::debug!(
            factory = %diagnostic.factory,
            start = diagnostic.start,
            "diagnostic reported"
        );
        self.diagnostics.push(diagnostic);
    }
}
