//! Walk over the body of an inline function.
//!
//! A single pass classifies every call, read and write in the body:
//!
//! - *inalienable* parameters (non-nullable, non-`noinline` parameters of a
//!   non-reflect function type) may only be invoked or handed to an inline
//!   parameter of another inline function
//! - callees must be at least as visible as the inline function itself
//!   (`@PublishedApi internal` counts as public)
//! - `super` calls in public inline functions must stay inside a local or
//!   anonymous class
//! - a direct call back to the inline function is recursion
//!
//! Local declarations and object literals in the body are walked too, with
//! their own suppression frames.

use crate::context::CheckerContext;
use crate::diagnostics::{DiagnosticFactory, DiagnosticReporter, errors};
use crate::dispatch::{child_declarations, expression_roots};
use crate::error::{CheckResult, InvariantViolation};
use kfir_common::SourceElement;
use kfir_common::limits::MAX_EXPRESSION_NESTING;
use kfir_tree::{
    AccessKind, ClassKind, DeclId, DeclKindTag, EffectiveVisibility, ExprId, ExprKind, ExprParent,
    Modifiers, Resolution, Session, Symbol, Visibility, class_ids, member_names,
};
use smallvec::SmallVec;

const CHECKER: &str = "inline-declaration";

pub(crate) struct InlineBodyVisitor<'s> {
    session: &'s Session,
    function: DeclId,
    effective_visibility: EffectiveVisibility,
    inalienable: SmallVec<[DeclId; 4]>,
    /// Classes entered through local declarations, innermost last.
    classes: Vec<DeclId>,
}

impl<'s> InlineBodyVisitor<'s> {
    pub(crate) fn new(session: &'s Session, function: DeclId) -> Self {
        let inalienable = session
            .decl(function)
            .value_parameters()
            .iter()
            .copied()
            .filter(|&parameter| is_inalienable(session, parameter))
            .collect();
        Self {
            session,
            function,
            effective_visibility: session.effective_visibility(function),
            inalienable,
            classes: Vec::new(),
        }
    }

    pub(crate) fn visit_body(
        &mut self,
        body: ExprId,
        context: &CheckerContext<'s>,
        reporter: &mut dyn DiagnosticReporter,
    ) -> CheckResult {
        tracing::trace!(
            function = ?self.function,
            inalienable = self.inalienable.len(),
            "walk inline body"
        );
        self.visit_expression(body, context, reporter, 0)
    }

    fn visit_expression(
        &mut self,
        expr: ExprId,
        context: &CheckerContext<'s>,
        reporter: &mut dyn DiagnosticReporter,
        depth: u32,
    ) -> CheckResult {
        let session = self.session;
        if depth >= MAX_EXPRESSION_NESTING {
            return Err(InvariantViolation::NestingLimit {
                checker: CHECKER,
                node: format!("{expr:?}"),
                file: context.file_path().to_string(),
                limit: MAX_EXPRESSION_NESTING,
            });
        }
        let expression = session.expr(expr);

        let annotated;
        let context = match &expression.kind {
            ExprKind::Annotated { annotations, .. } => {
                annotated = context.with_suppressed_diagnostics(annotations);
                &annotated
            }
            ExprKind::LocalDeclaration { declaration } => {
                return self.visit_declaration(*declaration, context, reporter, depth + 1);
            }
            ExprKind::ObjectLiteral { class } => {
                return self.visit_declaration(*class, context, reporter, depth + 1);
            }
            ExprKind::Call {
                resolved: Some(resolution),
                ..
            } => {
                self.check_receivers(expr, resolution, context, reporter);
                self.check_arguments(resolution, context, reporter);
                self.check_access(expr, resolution.target, resolution, context, reporter);
                context
            }
            ExprKind::Name {
                resolved: Some(resolution),
                ..
            } => {
                if !self.is_callee_of_call(expr) {
                    self.check_access(expr, resolution.target, resolution, context, reporter);
                    self.check_receivers(expr, resolution, context, reporter);
                }
                context
            }
            ExprKind::Assignment {
                resolved: Some(resolution),
                ..
            } => {
                let setter = resolution
                    .target_decl()
                    .and_then(|property| session.decl(property).as_property())
                    .and_then(|property| property.setter);
                if let Some(setter) = setter {
                    self.check_access(expr, Symbol::Decl(setter), resolution, context, reporter);
                }
                context
            }
            _ => context,
        };

        for child in expression.kind.children() {
            self.visit_expression(child, context, reporter, depth + 1)?;
        }
        Ok(())
    }

    fn visit_declaration(
        &mut self,
        decl: DeclId,
        context: &CheckerContext<'s>,
        reporter: &mut dyn DiagnosticReporter,
        depth: u32,
    ) -> CheckResult {
        let declaration = self.session.decl(decl);
        let context = context
            .with_suppressed_diagnostics(&declaration.annotations)
            .with_declaration(decl);
        let is_class = declaration.as_class().is_some();
        if is_class {
            self.classes.push(decl);
        }
        for root in expression_roots(&declaration.kind) {
            self.visit_expression(root, &context, reporter, depth)?;
        }
        for child in child_declarations(&declaration.kind) {
            self.visit_declaration(child, &context, reporter, depth + 1)?;
        }
        if is_class {
            self.classes.pop();
        }
        Ok(())
    }

    fn check_receivers(
        &self,
        expr: ExprId,
        resolution: &Resolution,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let session = self.session;
        let receivers = [resolution.dispatch_receiver, resolution.extension_receiver];
        for receiver in receivers.into_iter().flatten() {
            let Some(Symbol::Decl(symbol)) = self.symbol_of(receiver) else {
                continue;
            };
            if !self.inalienable.contains(&symbol) || self.is_function_invoke(resolution.target) {
                continue;
            }
            let source = session.expr(receiver).source.or(session.expr(expr).source);
            reporter.report_on(source, &errors::USAGE_IS_NOT_INLINABLE, (symbol,), context);
        }
    }

    fn check_arguments(
        &self,
        resolution: &Resolution,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let session = self.session;
        let Some(callee) = resolution
            .target_decl()
            .filter(|&callee| session.decl(callee).as_function().is_some())
        else {
            return;
        };
        let callee_is_inline = session.decl(callee).is_inline();
        for mapping in &resolution.argument_mapping {
            let argument = self.unwrap_argument(mapping.argument);
            let Some(Symbol::Decl(symbol)) = self.symbol_of(argument) else {
                continue;
            };
            if !self.inalienable.contains(&symbol) {
                continue;
            }
            let parameter = session.decl(mapping.parameter);
            let factory: &DiagnosticFactory<(DeclId,)> = if !callee_is_inline
                || parameter.has_modifier(Modifiers::NOINLINE)
            {
                &errors::USAGE_IS_NOT_INLINABLE
            } else if parameter.has_modifier(Modifiers::CROSSINLINE)
                && !session.decl(symbol).has_modifier(Modifiers::CROSSINLINE)
            {
                &errors::NON_LOCAL_RETURN_NOT_ALLOWED
            } else {
                continue;
            };
            reporter.report_on(session.expr(argument).source, factory, (symbol,), context);
        }
    }

    fn check_access(
        &self,
        expr: ExprId,
        target: Symbol,
        resolution: &Resolution,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let session = self.session;
        let Some(source) = session.expr(expr).source else {
            return;
        };
        let Symbol::Decl(target) = target else {
            return;
        };
        if !is_callable(session, target) {
            return;
        }

        if self.inalienable.contains(&target) && !self.is_part_of_call(expr) {
            reporter.report_on(Some(source), &errors::USAGE_IS_NOT_INLINABLE, (target,), context);
        }
        self.check_visibility(target, resolution.dispatch_receiver, source, context, reporter);
        if target == self.function {
            tracing::debug!(function = %session.render_decl(target), "inline recursion");
            reporter.report_on(Some(source), &errors::RECURSION_IN_INLINE, (target,), context);
        }
    }

    fn check_visibility(
        &self,
        called: DeclId,
        dispatch_receiver: Option<ExprId>,
        source: SourceElement,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let session = self.session;
        let declaration = session.decl(called);
        if declaration.name == member_names::FIELD {
            return;
        }
        let recorded = session
            .published_api_effective_visibility(called)
            .unwrap_or_else(|| session.effective_visibility(called));
        let called_visibility = match recorded {
            EffectiveVisibility::Local => EffectiveVisibility::Public,
            other => other,
        };
        let inline_is_public = self.effective_visibility.public_api();

        if inline_is_public
            && !called_visibility.public_api()
            && declaration.visibility() != Visibility::Local
        {
            reporter.report_on(
                Some(source),
                &errors::NON_PUBLIC_CALL_FROM_PUBLIC_INLINE,
                (called, self.function),
                context,
            );
        } else {
            if !self.effective_visibility.private_api() && self.is_inside_private_class(called) {
                reporter.report_on(
                    Some(source),
                    &errors::PRIVATE_CLASS_MEMBER_FROM_INLINE,
                    (called, self.function),
                    context,
                );
            }
            if inline_is_public {
                self.check_super_call(called, dispatch_receiver, context, reporter);
            }
        }

        if inline_is_public
            && self.effective_visibility.to_visibility() != Visibility::Protected
            && called_visibility.to_visibility() == Visibility::Protected
        {
            let arguments = (called, self.function);
            if declaration.as_constructor().is_some() {
                reporter.report_on(
                    Some(source),
                    &errors::PROTECTED_CONSTRUCTOR_CALL_FROM_PUBLIC_INLINE,
                    arguments,
                    context,
                );
            } else {
                let factory = errors::PROTECTED_CALL_FROM_PUBLIC_INLINE.choose(session.settings());
                reporter.report_on(Some(source), factory, arguments, context);
            }
        }
    }

    fn check_super_call(
        &self,
        called: DeclId,
        dispatch_receiver: Option<ExprId>,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) {
        let session = self.session;
        let Some(receiver) = dispatch_receiver else {
            return;
        };
        let receiver_expr = session.expr(receiver);
        if !matches!(receiver_expr.kind, ExprKind::Super { .. }) {
            return;
        }
        let Some(class) = self
            .classes
            .last()
            .copied()
            .or_else(|| session.containing_class(self.function))
        else {
            return;
        };
        let defined_in_function = session
            .decl(class)
            .as_class()
            .is_some_and(|data| data.class_kind == ClassKind::AnonymousObject)
            || session.is_local(class);
        if !defined_in_function {
            reporter.report_on(
                receiver_expr.source,
                &errors::SUPER_CALL_FROM_PUBLIC_INLINE,
                (called,),
                context,
            );
        }
    }

    fn is_inside_private_class(&self, called: DeclId) -> bool {
        let session = self.session;
        let Some(class) = session.containing_class(called) else {
            return false;
        };
        let declaration = session.decl(class);
        let anonymous = declaration
            .as_class()
            .is_some_and(|data| data.class_kind == ClassKind::AnonymousObject);
        !anonymous && declaration.visibility().is_private()
    }

    /// `invoke` of a built-in function type.
    fn is_function_invoke(&self, target: Symbol) -> bool {
        let session = self.session;
        match target {
            Symbol::FunctionInvoke { .. } => true,
            Symbol::Decl(decl) => {
                session.decl(decl).name == member_names::INVOKE
                    && session
                        .containing_class(decl)
                        .and_then(|class| session.class_id_of(class))
                        .is_some_and(|class_id| {
                            class_ids::function_arity(class_id).is_some()
                                || class_ids::is_suspend_function(class_id)
                        })
            }
            Symbol::Local(_) => false,
        }
    }

    /// Whether `expr` is the explicit receiver, the invoked value or a
    /// value argument of the closest enclosing call.
    fn is_part_of_call(&self, expr: ExprId) -> bool {
        let session = self.session;
        let mut current = expr;
        while let Some(ExprParent::Expr(parent)) = session.expr(current).parent {
            match &session.expr(parent).kind {
                ExprKind::Parenthesized { .. } | ExprKind::ValueArgument { .. } => {
                    current = parent;
                }
                ExprKind::Qualified { receiver, .. } => {
                    if *receiver == current {
                        return true;
                    }
                    current = parent;
                }
                ExprKind::Call {
                    callee,
                    arguments,
                    resolved,
                } => {
                    if *callee == current {
                        return true;
                    }
                    if arguments
                        .iter()
                        .any(|&argument| self.unwrap_argument(argument) == expr)
                    {
                        return true;
                    }
                    return resolved.as_ref().is_some_and(|resolution| {
                        resolution.dispatch_receiver == Some(expr)
                            || resolution.extension_receiver == Some(expr)
                    });
                }
                _ => return false,
            }
        }
        false
    }

    /// A name that only spells out the function of its parent call.
    fn is_callee_of_call(&self, expr: ExprId) -> bool {
        let session = self.session;
        let Some(ExprParent::Expr(parent)) = session.expr(expr).parent else {
            return false;
        };
        match &session.expr(parent).kind {
            ExprKind::Call {
                callee,
                resolved: Some(resolution),
                ..
            } => *callee == expr && resolution.kind != AccessKind::VariableInvoke,
            _ => false,
        }
    }

    fn unwrap_argument(&self, mut expr: ExprId) -> ExprId {
        loop {
            match &self.session.expr(expr).kind {
                ExprKind::ValueArgument { expression, .. } => expr = *expression,
                ExprKind::Parenthesized { inner } => expr = *inner,
                _ => return expr,
            }
        }
    }

    /// What a receiver or argument expression refers to.
    fn symbol_of(&self, expr: ExprId) -> Option<Symbol> {
        let expr = self.unwrap_argument(expr);
        match &self.session.expr(expr).kind {
            ExprKind::Qualified { selector, .. } => self.symbol_of(*selector),
            kind => kind.resolution().map(|resolution| resolution.target),
        }
    }
}

/// A parameter whose argument is substituted into the inlined body.
fn is_inalienable(session: &Session, parameter: DeclId) -> bool {
    let declaration = session.decl(parameter);
    if declaration.has_modifier(Modifiers::NOINLINE) {
        return false;
    }
    let Some(type_ref) = declaration.return_type_ref() else {
        return false;
    };
    !session.type_data(type_ref.ty).is_nullable()
        && session.is_functional_type(type_ref.ty)
        && !session.is_reflect_functional_type(type_ref.ty)
}

fn is_callable(session: &Session, decl: DeclId) -> bool {
    matches!(
        session.decl(decl).tag(),
        DeclKindTag::Function
            | DeclKindTag::Property
            | DeclKindTag::PropertyAccessor
            | DeclKindTag::ValueParameter
            | DeclKindTag::Constructor
    )
}
