//! Tests for the shared recursion guard.

use kfir_common::{RecursionGuard, RecursionProfile, RecursionResult};

#[test]
fn test_enter_leave_tracks_depth() {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::Subtyping);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.enter(2u32), RecursionResult::Entered);
    assert_eq!(guard.depth(), 2);
    guard.leave(2);
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_exceeded());
}

#[test]
fn test_reentering_visiting_key_is_cycle() {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::DeclarationGraph);
    assert!(guard.enter(7u32).is_entered());
    let result = guard.enter(7u32);
    assert!(result.is_cycle(), "expected cycle, got: {result:?}");
    assert!(guard.is_visiting(&7));
    guard.leave(7);
}

#[test]
fn test_depth_limit_is_sticky() {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::Custom {
        max_depth: 2,
        max_iterations: 100,
    });
    assert!(guard.enter(1u32).is_entered());
    assert!(guard.enter(2u32).is_entered());
    assert_eq!(guard.enter(3u32), RecursionResult::DepthExceeded);
    guard.leave(2);
    guard.leave(1);
    assert!(guard.is_exceeded());
}

#[test]
fn test_iteration_limit() {
    let mut guard = RecursionGuard::new(10, 3);
    for key in 0u32..3 {
        assert!(guard.enter(key).is_entered());
        guard.leave(key);
    }
    assert_eq!(guard.enter(99u32), RecursionResult::IterationExceeded);
}

#[test]
fn test_scope_runs_closure_and_leaves() {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeExpansion);
    let value = guard.scope(1u32, |inner| {
        assert!(inner.enter(1).is_cycle());
        inner.depth()
    });
    assert_eq!(value, Ok(1));
    assert_eq!(guard.depth(), 0);
}
