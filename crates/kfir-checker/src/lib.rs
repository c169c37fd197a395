//! Semantic checker engine over a resolved declaration graph.
//!
//! This crate is organized into several modules:
//! - `context` - `CheckerContext`, the persistent state threaded through a walk
//! - `diagnostics` - diagnostic factories, the reporter sink and suppression
//! - `registry` - kind-indexed checker tables
//! - `dispatch` - the declaration walk that runs the registered checkers
//! - `checkers` - the structural rule checkers and the inline body visitor
//! - `usage` - the expression-usage classifier
//! - `options` - `CheckerOptions` loaded by the driver
//! - `error` - `InvariantViolation`, the internal-bug error type

pub mod checkers;
pub mod context;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod options;
pub mod registry;
pub mod usage;

pub use context::CheckerContext;
pub use diagnostics::{
    DeprecationDiagnosticFactory, DiagnosticCollector, DiagnosticFactory, DiagnosticReporter,
};
pub use dispatch::CheckerDispatcher;
pub use error::{CheckResult, InvariantViolation};
pub use options::CheckerOptions;
pub use registry::CheckerRegistry;

use kfir_common::Diagnostic;
use kfir_tree::{DeclId, Session};

/// Default registry without the checkers `options` disables.
#[must_use]
pub fn registry_for(options: &CheckerOptions) -> CheckerRegistry {
    let mut registry = CheckerRegistry::with_defaults();
    for name in &options.disabled_checkers {
        if !registry.disable(name) {
            tracing::warn!(checker = %name, "unknown checker in disabledCheckers");
        }
    }
    registry
}

/// Check one file with its own collector and return what it reported.
pub fn check_file(
    session: &Session,
    file: DeclId,
    registry: &CheckerRegistry,
    options: &CheckerOptions,
) -> Result<Vec<Diagnostic>, InvariantViolation> {
    let mut collector = DiagnosticCollector::new().with_warnings_as_errors(options.warnings_as_errors);
    CheckerDispatcher::new(registry).check_file(session, file, &options.suppress, &mut collector)?;
    Ok(collector.into_diagnostics())
}
