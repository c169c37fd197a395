//! Diagnostic factories and the reporter sink.

pub mod errors;
pub mod factory;
pub mod reporter;

pub use factory::{DeprecationDiagnosticFactory, DiagnosticArgs, DiagnosticFactory, Member, RenderArg};
pub use reporter::{DiagnosticCollector, DiagnosticReporter};
