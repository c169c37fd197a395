//! Centralized limits and thresholds for the checker.
//!
//! Recursion limits for type walks live in
//! [`RecursionProfile`](crate::recursion::RecursionProfile); the constants
//! here bound tree walks that only need a depth counter.

// =============================================================================
// Tree walk limits
// =============================================================================

/// Maximum nesting of declarations the dispatcher will descend into.
///
/// Local classes inside functions inside local classes can nest arbitrarily;
/// past this depth the dispatcher reports an invariant violation instead of
/// overflowing the stack.
pub const MAX_DECLARATION_NESTING: u32 = 256;

/// Maximum nesting of expressions the dispatcher walks inside one body.
pub const MAX_EXPRESSION_NESTING: u32 = 2_000;

/// Maximum number of parent hops the usage classifier may take while
/// ascending through transparent wrappers (parentheses, labels, blocks).
pub const MAX_USAGE_ASCENT: u32 = 1_000;

/// Maximum depth of nested type aliases followed during full expansion.
pub const MAX_ALIAS_EXPANSION_DEPTH: u32 = 64;

// =============================================================================
// Capacity hints
// =============================================================================

/// Typical number of direct overridden members per declaration.
pub const OVERRIDDEN_INLINE_CAPACITY: usize = 2;

/// Typical number of names listed in a single `@Suppress`.
pub const SUPPRESSION_INLINE_CAPACITY: usize = 4;
