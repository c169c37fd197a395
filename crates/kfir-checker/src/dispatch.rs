//! Declaration walk that drives the registered checkers.
//!
//! The walk is pre-order. At each declaration the dispatcher:
//! 1. verifies the node reached the required resolve phase
//! 2. opens the node's suppression frame and pushes it onto the context
//! 3. runs the basic and kind-specific checkers in registration order
//! 4. runs the type-reference checkers on the node's written types
//! 5. walks the node's expression bodies (local declarations found there
//!    are dispatched like any other declaration)
//! 6. recurses into the child declarations with the extended context
//!
//! A checker's `Err` is an internal invariant violation and aborts the
//! walk; rule violations only ever produce diagnostics.

use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::error::{CheckResult, InvariantViolation};
use crate::registry::CheckerRegistry;
use kfir_common::limits::{MAX_DECLARATION_NESTING, MAX_EXPRESSION_NESTING};
use kfir_tree::{DeclId, DeclKind, ExprId, ExprKind, Session, TypeRef};
use smallvec::SmallVec;

pub struct CheckerDispatcher<'r> {
    registry: &'r CheckerRegistry,
}

impl<'r> CheckerDispatcher<'r> {
    #[must_use]
    pub const fn new(registry: &'r CheckerRegistry) -> Self {
        Self { registry }
    }

    /// Check one file. `suppressed` seeds the root suppression frame.
    pub fn check_file(
        &self,
        session: &Session,
        file: DeclId,
        suppressed: &[String],
        reporter: &mut dyn DiagnosticReporter,
    ) -> CheckResult {
        let _span = tracing::debug_span!("check_file", path = session.file_path(file)).entered();
        let context =
            CheckerContext::new(session, file).with_suppressed_names(suppressed.iter().cloned());
        self.check_declaration(file, &context, reporter)
    }

    /// Check `decl` and everything below it. `context` is the context of
    /// the declaration's container.
    pub fn check_declaration(
        &self,
        decl: DeclId,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) -> CheckResult {
        let session = context.session();
        let declaration = session.decl(decl);

        if declaration.phase < context.required_phase() {
            return Err(InvariantViolation::Unresolved {
                checker: "dispatcher",
                node: session.render_decl(decl),
                file: context.file_path().to_string(),
                expected: context.required_phase(),
                actual: declaration.phase,
            });
        }
        if context.depth() >= MAX_DECLARATION_NESTING {
            return Err(InvariantViolation::NestingLimit {
                checker: "dispatcher",
                node: session.render_decl(decl),
                file: context.file_path().to_string(),
                limit: MAX_DECLARATION_NESTING,
            });
        }

        let context = context
            .with_suppressed_diagnostics(&declaration.annotations)
            .with_declaration(decl);
        let kind = declaration.tag();
        tracing::debug!(?decl, %kind, name = %declaration.name, "dispatch declaration");

        for checker in self.registry.declaration_checkers(kind) {
            tracing::trace!(checker = checker.name, ?decl, "run declaration checker");
            (checker.check)(decl, &context, reporter)?;
        }

        if !self.registry.type_ref_checkers().is_empty() {
            for type_ref in written_types(&declaration.kind) {
                self.check_type_ref(type_ref, &context, reporter)?;
            }
        }

        for root in expression_roots(&declaration.kind) {
            self.check_expression(root, &context, reporter, 0)?;
        }

        for child in child_declarations(&declaration.kind) {
            self.check_declaration(child, &context, reporter)?;
        }
        Ok(())
    }

    fn check_type_ref(
        &self,
        type_ref: &TypeRef,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
    ) -> CheckResult {
        let context = context.with_suppressed_diagnostics(&type_ref.annotations);
        for checker in self.registry.type_ref_checkers() {
            tracing::trace!(checker = checker.name, "run type reference checker");
            (checker.check)(type_ref, &context, reporter)?;
        }
        Ok(())
    }

    fn check_expression(
        &self,
        expr: ExprId,
        context: &CheckerContext<'_>,
        reporter: &mut dyn DiagnosticReporter,
        depth: u32,
    ) -> CheckResult {
        let session = context.session();
        if depth >= MAX_EXPRESSION_NESTING {
            return Err(InvariantViolation::NestingLimit {
                checker: "dispatcher",
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
                return self.check_declaration(*declaration, context, reporter);
            }
            _ => context,
        };

        for checker in self.registry.expression_checkers(expression.kind.tag()) {
            tracing::trace!(checker = checker.name, ?expr, "run expression checker");
            (checker.check)(expr, context, reporter)?;
        }
        for child in expression.kind.children() {
            self.check_expression(child, context, reporter, depth + 1)?;
        }
        Ok(())
    }
}

/// Written (non-inferred) type references in a declaration's signature.
fn written_types(kind: &DeclKind) -> SmallVec<[&TypeRef; 4]> {
    let mut out: SmallVec<[&TypeRef; 4]> = SmallVec::new();
    match kind {
        DeclKind::Function(function) => {
            out.extend(function.receiver.as_ref());
            out.push(&function.return_type);
        }
        DeclKind::Property(property) => {
            out.extend(property.receiver.as_ref());
            out.push(&property.return_type);
        }
        DeclKind::ValueParameter(parameter) => out.push(&parameter.type_ref),
        DeclKind::TypeParameter(parameter) => out.extend(parameter.bounds.iter()),
        DeclKind::TypeAlias(alias) => out.push(&alias.expanded),
        DeclKind::Class(class) => out.extend(class.supertypes.iter().map(|entry| &entry.type_ref)),
        DeclKind::File(_)
        | DeclKind::PropertyAccessor(_)
        | DeclKind::AnonymousInitializer(_)
        | DeclKind::Constructor(_) => {}
    }
    out.retain(|type_ref| !type_ref.is_implicit());
    out
}

/// Expressions owned directly by a declaration.
pub(crate) fn expression_roots(kind: &DeclKind) -> SmallVec<[ExprId; 4]> {
    let mut out = SmallVec::new();
    match kind {
        DeclKind::Function(function) => out.extend(function.body),
        DeclKind::Property(property) => {
            out.extend(property.initializer);
            out.extend(property.delegate);
        }
        DeclKind::PropertyAccessor(accessor) => out.extend(accessor.body),
        DeclKind::ValueParameter(parameter) => out.extend(parameter.default_value),
        DeclKind::AnonymousInitializer(initializer) => out.extend(initializer.body),
        DeclKind::Constructor(constructor) => {
            if let Some(delegation) = &constructor.delegation {
                out.extend(delegation.arguments.iter().copied());
            }
            out.extend(constructor.body);
        }
        DeclKind::Class(class) => {
            out.extend(class.supertypes.iter().filter_map(|entry| entry.delegate));
        }
        DeclKind::File(_) | DeclKind::TypeAlias(_) | DeclKind::TypeParameter(_) => {}
    }
    out
}

/// Child declarations in source order.
pub(crate) fn child_declarations(kind: &DeclKind) -> SmallVec<[DeclId; 8]> {
    let mut out = SmallVec::new();
    match kind {
        DeclKind::File(file) => out.extend(file.declarations.iter().copied()),
        DeclKind::Class(class) => {
            out.extend(class.type_parameters.iter().copied());
            out.extend(class.members.iter().copied());
        }
        DeclKind::Function(function) => {
            out.extend(function.type_parameters.iter().copied());
            out.extend(function.value_parameters.iter().copied());
        }
        DeclKind::Property(property) => {
            out.extend(property.type_parameters.iter().copied());
            out.extend(property.getter);
            out.extend(property.setter);
        }
        DeclKind::PropertyAccessor(accessor) => out.extend(accessor.value_parameter),
        DeclKind::TypeAlias(alias) => out.extend(alias.type_parameters.iter().copied()),
        DeclKind::Constructor(constructor) => {
            out.extend(constructor.value_parameters.iter().copied());
        }
        DeclKind::TypeParameter(_)
        | DeclKind::ValueParameter(_)
        | DeclKind::AnonymousInitializer(_) => {}
    }
    out
}
