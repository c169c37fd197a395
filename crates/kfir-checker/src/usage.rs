//! Expression-usage classifier.
//!
//! Decides whether an expression's value is consumed by its syntactic
//! parent. `is_used` rejects the kinds that never produce a usable value and
//! otherwise asks `does_parent_use_child`, which is keyed on the parent's
//! kind. Transparent wrappers (parentheses, labels, annotations, containers,
//! blocks) reduce to whether the wrapper itself is used, so the two functions
//! recurse into each other while ascending the tree.
//!
//! The ascent is bounded by [`MAX_USAGE_ASCENT`]; exceeding it or meeting a
//! parent that cannot own the child is an [`InvariantViolation`].

use crate::error::InvariantViolation;
use kfir_common::limits::MAX_USAGE_ASCENT;
use kfir_tree::{AccessKind, DeclId, DeclKind, ExprId, ExprKind, ExprParent, Resolution, Session};

const CHECKER: &str = "usage-classifier";

/// Whether the value of `expr` is used.
pub fn is_used(session: &Session, expr: ExprId) -> Result<bool, InvariantViolation> {
    UsageClassifier::new(session).is_used(expr)
}

/// Whether `parent` consumes the value of its direct child `child`.
pub fn does_parent_use_child(
    session: &Session,
    parent: ExprParent,
    child: ExprId,
) -> Result<bool, InvariantViolation> {
    UsageClassifier::new(session).does_parent_use_child(parent, child)
}

struct UsageClassifier<'s> {
    session: &'s Session,
    hops: u32,
}

impl<'s> UsageClassifier<'s> {
    const fn new(session: &'s Session) -> Self {
        Self { session, hops: 0 }
    }

    fn is_used(&mut self, expr: ExprId) -> Result<bool, InvariantViolation> {
        self.hops += 1;
        if self.hops > MAX_USAGE_ASCENT {
            tracing::warn!(?expr, limit = MAX_USAGE_ASCENT, "usage ascent limit reached");
            return Err(InvariantViolation::NestingLimit {
                checker: CHECKER,
                node: format!("{expr:?}"),
                file: self.file_of(expr).to_string(),
                limit: MAX_USAGE_ASCENT,
            });
        }

        let session = self.session;
        let expression = session.expr(expr);
        match &expression.kind {
            // `Nothing`-typed jumps.
            ExprKind::Throw { .. }
            | ExprKind::Return { .. }
            | ExprKind::Break { .. }
            | ExprKind::Continue { .. } => Ok(false),
            // Loops.
            ExprKind::While { .. } | ExprKind::DoWhile { .. } | ExprKind::For { .. } => Ok(false),
            // The operator token itself.
            ExprKind::OperationReference { .. } => Ok(false),
            // Statements that declare something are not expressions.
            ExprKind::LocalVariable { .. }
            | ExprKind::Destructuring { .. }
            | ExprKind::LocalDeclaration { .. } => Ok(false),
            _ => match expression.parent {
                Some(parent) => self.does_parent_use_child(parent, expr),
                // Nothing owns it, so nothing consumes it.
                None => Ok(false),
            },
        }
    }

    fn does_parent_use_child(
        &mut self,
        parent: ExprParent,
        child: ExprId,
    ) -> Result<bool, InvariantViolation> {
        match parent {
            ExprParent::Decl(decl) => self.declaration_uses_child(decl, child),
            ExprParent::Expr(parent) => self.expression_uses_child(parent, child),
        }
    }

    fn declaration_uses_child(
        &mut self,
        decl: DeclId,
        child: ExprId,
    ) -> Result<bool, InvariantViolation> {
        let session = self.session;
        let declaration = session.decl(decl);
        let child_ty = session.expr(child).ty;
        match &declaration.kind {
            DeclKind::Function(function) => {
                if function.body != Some(child) {
                    return Ok(false);
                }
                let returns_value = !session.is_unit(function.return_type.ty);
                if function.has_block_body {
                    Ok(returns_value)
                } else {
                    Ok(returns_value || session.is_unit(child_ty))
                }
            }
            DeclKind::PropertyAccessor(accessor) => {
                if accessor.body != Some(child) {
                    return Ok(false);
                }
                if accessor.is_getter {
                    Ok(session.equal_types(child_ty, accessor.return_type.ty))
                } else {
                    Ok(true)
                }
            }
            DeclKind::Property(property) => {
                Ok(property.initializer == Some(child) || property.delegate == Some(child))
            }
            DeclKind::ValueParameter(parameter) => Ok(parameter.default_value == Some(child)),
            DeclKind::Constructor(constructor) => Ok(constructor
                .delegation
                .as_ref()
                .is_some_and(|delegation| delegation.arguments.contains(&child))),
            DeclKind::AnonymousInitializer(_) => Ok(false),
            DeclKind::Class(class)
                if class
                    .supertypes
                    .iter()
                    .any(|entry| entry.delegate == Some(child)) =>
            {
                Ok(true)
            }
            DeclKind::Class(_)
            | DeclKind::File(_)
            | DeclKind::TypeAlias(_)
            | DeclKind::TypeParameter(_) => Err(self.unreachable(
                child,
                "an expression owner",
                format!("{} '{}'", declaration.tag(), declaration.name),
            )),
        }
    }

    fn expression_uses_child(
        &mut self,
        parent: ExprId,
        child: ExprId,
    ) -> Result<bool, InvariantViolation> {
        let session = self.session;
        let expression = session.expr(parent);
        let used = match &expression.kind {
            ExprKind::ValueArgument { expression, .. } => *expression == child,
            // The container is transparent: ask the grandparent about the container.
            ExprKind::Container { .. } => return self.ascend(parent),
            ExprKind::WhenEntry {
                conditions, body, ..
            } => {
                if conditions.contains(&child) {
                    true
                } else if *body == child {
                    match expression.parent {
                        Some(ExprParent::Expr(owner))
                            if matches!(session.expr(owner).kind, ExprKind::When { .. }) =>
                        {
                            self.is_used(owner)?
                        }
                        _ => return Err(self.unexpected_owner(parent, "when")),
                    }
                } else {
                    false
                }
            }
            ExprKind::WhenCondition { .. } => match expression.parent {
                Some(ExprParent::Expr(owner))
                    if matches!(session.expr(owner).kind, ExprKind::WhenEntry { .. }) =>
                {
                    return self.does_parent_use_child(ExprParent::Expr(owner), parent);
                }
                _ => return Err(self.unexpected_owner(parent, "when entry")),
            },
            ExprKind::StringTemplateEntry { expression } => *expression == Some(child),
            ExprKind::Catch { .. } => match expression.parent {
                Some(ExprParent::Expr(owner))
                    if matches!(session.expr(owner).kind, ExprKind::Try { .. }) =>
                {
                    return self.does_parent_use_child(ExprParent::Expr(owner), parent);
                }
                _ => return Err(self.unexpected_owner(parent, "try")),
            },
            ExprKind::Finally { .. } => false,
            ExprKind::Block { statements } => {
                statements.last() == Some(&child) && self.is_used(parent)?
            }
            ExprKind::Lambda {
                body, return_type, ..
            } => *body == child && !session.is_unit(*return_type),
            ExprKind::Destructuring { initializer, .. } => *initializer == child,
            ExprKind::LocalVariable { initializer, .. } => *initializer == Some(child),
            ExprKind::Binary { left, right, .. } => *left == child || *right == child,
            ExprKind::Assignment { target, value, .. } => *target == child || *value == child,
            ExprKind::TypeCast { left, .. } | ExprKind::Is { left, .. } => *left == child,
            ExprKind::Unary { base, .. } => *base == child,
            ExprKind::Qualified {
                receiver, selector, ..
            } => *receiver == child || (*selector == child && self.is_used(parent)?),
            ExprKind::ArrayAccess { array, indices } => {
                *array == child || indices.contains(&child)
            }
            ExprKind::Call {
                callee,
                arguments,
                resolved,
            } => {
                if arguments.contains(&child) {
                    true
                } else {
                    *callee == child && self.callee_is_value(child, resolved.as_ref())
                }
            }
            ExprKind::CollectionLiteral { elements } => elements.contains(&child),
            ExprKind::Annotated { base, .. } | ExprKind::Labeled { base, .. } => {
                *base == child && self.is_used(parent)?
            }
            ExprKind::CallableReference { lhs, .. } => {
                *lhs == Some(child) && self.callee_is_value(child, None)
            }
            ExprKind::Parenthesized { .. } => return self.ascend(parent),
            ExprKind::When { subject, entries } => {
                *subject == Some(child)
                    && entries.first().is_some_and(|&first| !self.is_else_entry(first))
            }
            ExprKind::Throw { value } => *value == child,
            ExprKind::Try {
                body,
                catches,
                finally,
            } => {
                (*body == child || catches.contains(&child) || *finally == Some(child))
                    && self.is_used(parent)?
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                *condition == child
                    || ((*then_branch == child || *else_branch == Some(child))
                        && self.is_used(parent)?)
            }
            ExprKind::For { range, .. } => *range == child,
            ExprKind::While { condition, .. } | ExprKind::DoWhile { condition, .. } => {
                *condition == child
            }
            ExprKind::Return { value, .. } => *value == Some(child),
            // Leaves and nodes whose children are not value positions.
            ExprKind::Name { .. }
            | ExprKind::OperationReference { .. }
            | ExprKind::Break { .. }
            | ExprKind::Continue { .. }
            | ExprKind::LocalDeclaration { .. }
            | ExprKind::This { .. }
            | ExprKind::Super { .. }
            | ExprKind::ObjectLiteral { .. }
            | ExprKind::Literal { .. }
            | ExprKind::StringTemplate { .. } => false,
        };
        Ok(used)
    }

    /// A wrapper is used iff its own parent uses it.
    fn ascend(&mut self, wrapper: ExprId) -> Result<bool, InvariantViolation> {
        self.hops += 1;
        match self.session.expr(wrapper).parent {
            Some(parent) if self.hops <= MAX_USAGE_ASCENT => {
                self.does_parent_use_child(parent, wrapper)
            }
            Some(_) => Err(InvariantViolation::NestingLimit {
                checker: CHECKER,
                node: format!("{wrapper:?}"),
                file: self.file_of(wrapper).to_string(),
                limit: MAX_USAGE_ASCENT,
            }),
            None => Ok(false),
        }
    }

    /// A bare name in callee or `::` position is a value only when it reads a
    /// variable (`val f = { 54 }; f()`), not when it names a function.
    fn callee_is_value(&self, callee: ExprId, call: Option<&Resolution>) -> bool {
        match &self.session.expr(callee).kind {
            ExprKind::Name { resolved, .. } => {
                let reads_variable = resolved
                    .as_ref()
                    .is_some_and(|resolution| resolution.kind == AccessKind::VariableAccess);
                let invokes_variable =
                    call.is_some_and(|resolution| resolution.kind == AccessKind::VariableInvoke);
                reads_variable || invokes_variable
            }
            _ => true,
        }
    }

    fn is_else_entry(&self, entry: ExprId) -> bool {
        matches!(
            self.session.expr(entry).kind,
            ExprKind::WhenEntry { is_else: true, .. }
        )
    }

    fn unexpected_owner(&self, node: ExprId, expected: &'static str) -> InvariantViolation {
        let actual = match self.session.expr(node).parent {
            Some(ExprParent::Expr(owner)) => format!("{:?}", self.session.expr(owner).kind.tag()),
            Some(ExprParent::Decl(owner)) => self.session.decl(owner).tag().to_string(),
            None => "no owner".to_string(),
        };
        self.unreachable(node, expected, actual)
    }

    fn unreachable(
        &self,
        node: ExprId,
        expected: &'static str,
        actual: String,
    ) -> InvariantViolation {
        tracing::debug!(?node, expected, %actual, "unreachable usage shape");
        InvariantViolation::UnreachableUsageShape {
            checker: CHECKER,
            node: format!("{:?} {node:?}", self.session.expr(node).kind.tag()),
            file: self.file_of(node).to_string(),
            expected,
            actual,
        }
    }

    /// Path of the file owning `expr`, found through its declaration owner.
    fn file_of(&self, expr: ExprId) -> &'s str {
        let session = self.session;
        let mut current = expr;
        for _ in 0..=MAX_USAGE_ASCENT {
            match session.expr(current).parent {
                Some(ExprParent::Expr(parent)) => current = parent,
                Some(ExprParent::Decl(owner)) => return session.file_path(owner),
                None => return "",
            }
        }
        ""
    }
}
