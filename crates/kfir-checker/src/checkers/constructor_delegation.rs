//! Secondary constructors: delegation cycles and the mandatory primary call.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use indexmap::IndexSet;
use kfir_tree::{DeclId, Modifiers, Session};

pub fn check(
    class: DeclId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    let Some(class_decl) = session.decl(class).as_class() else {
        return Ok(());
    };

    let mut cyclic: IndexSet<DeclId> = IndexSet::new();
    let mut secondary: IndexSet<DeclId> = IndexSet::new();
    let mut has_primary = false;
    for &member in &class_decl.members {
        let Some(constructor) = session.decl(member).as_constructor() else {
            continue;
        };
        if constructor.is_primary {
            has_primary = true;
            continue;
        }
        secondary.insert(member);
        if let Some(cycle) = find_cycle(session, member, &cyclic) {
            tracing::debug!(
                class = %session.render_decl(class),
                length = cycle.len(),
                "constructor delegation cycle"
            );
            cyclic.extend(cycle);
        }
    }
    secondary.retain(|constructor| !cyclic.contains(constructor));

    let is_expect = std::iter::once(class)
        .chain(session.ancestors(class))
        .any(|decl| session.decl(decl).has_modifier(Modifiers::EXPECT));

    if has_primary && !is_expect {
        for &constructor in &secondary {
            let declaration = session.decl(constructor);
            let context = context.with_suppressed_diagnostics(&declaration.annotations);
            let delegation = declaration
                .as_constructor()
                .and_then(|constructor| constructor.delegation.as_ref());
            if delegation.is_some_and(|delegation| delegation.is_this) {
                continue;
            }
            let anchor = delegation
                .and_then(|delegation| delegation.source)
                .or(declaration.source);
            reporter.report_on(
                anchor,
                &errors::PRIMARY_CONSTRUCTOR_DELEGATION_CALL_EXPECTED,
                (),
                &context,
            );
        }
    }

    for &constructor in &cyclic {
        let declaration = session.decl(constructor);
        let context = context.with_suppressed_diagnostics(&declaration.annotations);
        let anchor = declaration
            .as_constructor()
            .and_then(|constructor| constructor.delegation.as_ref())
            .and_then(|delegation| delegation.source);
        reporter.report_on(
            anchor,
            &errors::CYCLIC_CONSTRUCTOR_DELEGATION_CALL,
            (),
            &context,
        );
    }
    Ok(())
}

fn delegated(session: &Session, constructor: DeclId) -> Option<DeclId> {
    session
        .decl(constructor)
        .as_constructor()?
        .delegation
        .as_ref()?
        .target
        .filter(|&target| session.decl(target).as_constructor().is_some())
}

fn is_primary(session: &Session, constructor: DeclId) -> bool {
    session
        .decl(constructor)
        .as_constructor()
        .is_some_and(|constructor| constructor.is_primary)
}

/// Constructors visited on the way into a cycle (or into a constructor
/// already known to be cyclic), starting at `start`.
fn find_cycle(
    session: &Session,
    start: DeclId,
    known: &IndexSet<DeclId>,
) -> Option<IndexSet<DeclId>> {
    let mut visited = IndexSet::new();
    visited.insert(start);
    let mut current = start;
    let mut next = delegated(session, start);
    while let Some(target) = next {
        if is_primary(session, current) {
            break;
        }
        if visited.contains(&target) || known.contains(&target) {
            return Some(visited);
        }
        current = target;
        next = delegated(session, target);
        visited.insert(current);
    }
    None
}
