//! Side-effect-free expressions whose value nobody reads.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::diagnostics::errors;
use crate::error::CheckResult;
use crate::usage;
use kfir_tree::{AccessKind, ExprId, ExprKind, ExprParent, Session};

pub fn check(
    expr: ExprId,
    context: &CheckerContext<'_>,
    reporter: &mut dyn DiagnosticReporter,
) -> CheckResult {
    let session = context.session();
    if !is_side_effect_free(session, expr) {
        return Ok(());
    }
    if !usage::is_used(session, expr)? {
        reporter.report_on(session.expr(expr).source, &errors::UNUSED_EXPRESSION, (), context);
    }
    Ok(())
}

fn is_side_effect_free(session: &Session, expr: ExprId) -> bool {
    let expression = session.expr(expr);
    match &expression.kind {
        ExprKind::Literal { .. }
        | ExprKind::Lambda { .. }
        | ExprKind::This { .. }
        | ExprKind::StringTemplate { .. }
        | ExprKind::CallableReference { .. } => true,
        ExprKind::Name { resolved, .. } => {
            let plain_read = resolved
                .as_ref()
                .is_some_and(|resolution| resolution.kind == AccessKind::VariableAccess);
            // A selector or callee is judged as part of the enclosing expression.
            let nested = match expression.parent {
                Some(ExprParent::Expr(parent)) => match &session.expr(parent).kind {
                    ExprKind::Qualified { selector, .. } => *selector == expr,
                    ExprKind::Call { callee, .. } => *callee == expr,
                    ExprKind::CallableReference { .. } => true,
                    _ => false,
                },
                _ => false,
            };
            plain_read && !nested
        }
        _ => false,
    }
}
