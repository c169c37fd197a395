//! Internal invariant violations.
//!
//! These are bugs in the checker tables or in the upstream graph producer,
//! never user errors. They abort the check of the current file and carry
//! enough context to be reported as a crash.

use kfir_tree::ResolvePhase;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A declaration reached the dispatcher before resolution finished.
    #[error(
        "{checker}: {node} in {file} is resolved to phase {actual:?}, but {expected:?} is required"
    )]
    Unresolved {
        checker: &'static str,
        node: String,
        file: String,
        expected: ResolvePhase,
        actual: ResolvePhase,
    },

    /// An expression shape no case of a structural analysis covers.
    #[error("{checker}: unexpected {actual} in {file} at {node}, expected {expected}")]
    UnreachableUsageShape {
        checker: &'static str,
        node: String,
        file: String,
        expected: &'static str,
        actual: String,
    },

    /// Traversal nested deeper than the centralized limit.
    #[error("{checker}: nesting limit of {limit} exceeded at {node} in {file}")]
    NestingLimit {
        checker: &'static str,
        node: String,
        file: String,
        limit: u32,
    },
}

impl InvariantViolation {
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::Unresolved { file, .. }
            | Self::UnreachableUsageShape { file, .. }
            | Self::NestingLimit { file, .. } => file,
        }
    }

    #[must_use]
    pub fn checker(&self) -> &'static str {
        match self {
            Self::Unresolved { checker, .. }
            | Self::UnreachableUsageShape { checker, .. }
            | Self::NestingLimit { checker, .. } => checker,
        }
    }
}

/// Result of running one checker on one node.
pub type CheckResult = Result<(), InvariantViolation>;
