//! Common types and utilities for the kfir semantic checker.
//!
//! This crate provides foundational types used across all kfir crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, `format_message`)
//! - Source anchors (`SourceElement`, `SourceKind`, `FakeSourceKind`)
//! - Language feature flags (`LanguageFeature`, `LanguageVersionSettings`)
//! - Centralized limits and the shared `RecursionGuard`

// Diagnostic model shared by the checker and the driver
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, format_message};

// Source anchors (real vs compiler-synthesized)
pub mod source;
pub use source::{FakeSourceKind, SourceElement, SourceKind};

// Language-version gated behavior
pub mod features;
pub use features::{LanguageFeature, LanguageVersionSettings};

// Centralized limits and thresholds
pub mod limits;

// Cycle detection / depth limiting for recursive walks
pub mod recursion;
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
