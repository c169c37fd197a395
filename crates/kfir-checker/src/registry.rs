//! Kind-indexed checker tables.
//!
//! Each declaration kind maps to an ordered list of checkers. "Basic"
//! checkers run on every declaration before the kind-specific ones;
//! expression checkers are keyed by expression kind and type-reference
//! checkers run on every written type in a signature. Registration order is
//! the execution order, so diagnostics come out in a stable order.

use crate::checkers;
use crate::context::CheckerContext;
use crate::diagnostics::DiagnosticReporter;
use crate::error::CheckResult;
use indexmap::IndexMap;
use kfir_tree::{DeclId, DeclKindTag, ExprId, ExprKindTag, TypeRef};

pub type DeclarationCheck =
    fn(DeclId, &CheckerContext<'_>, &mut dyn DiagnosticReporter) -> CheckResult;
pub type ExpressionCheck =
    fn(ExprId, &CheckerContext<'_>, &mut dyn DiagnosticReporter) -> CheckResult;
pub type TypeRefCheck =
    fn(&TypeRef, &CheckerContext<'_>, &mut dyn DiagnosticReporter) -> CheckResult;

#[derive(Clone, Copy)]
pub struct DeclarationChecker {
    pub name: &'static str,
    pub check: DeclarationCheck,
}

#[derive(Clone, Copy)]
pub struct ExpressionChecker {
    pub name: &'static str,
    pub check: ExpressionCheck,
}

#[derive(Clone, Copy)]
pub struct TypeRefChecker {
    pub name: &'static str,
    pub check: TypeRefCheck,
}

#[derive(Clone, Default)]
pub struct CheckerRegistry {
    basic: Vec<DeclarationChecker>,
    declarations: IndexMap<DeclKindTag, Vec<DeclarationChecker>>,
    expressions: IndexMap<ExprKindTag, Vec<ExpressionChecker>>,
    type_refs: Vec<TypeRefChecker>,
}

impl CheckerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in checker, in reporting order.
    #[must_use]
    pub fn with_defaults() -> Self {
        use DeclKindTag as K;
        let mut registry = Self::new();

        registry.register_basic("annotation", checkers::annotation::check);

        registry.register(&[K::Class], "override", checkers::override_checker::check);
        registry.register(&[K::Class], "class-variance", checkers::variance::check);
        registry.register(&[K::Class], "annotation-class", checkers::annotation_class::check);
        registry.register(&[K::Class], "value-class", checkers::value_class::check);
        registry.register(&[K::Class], "supertypes", checkers::supertypes::check);
        registry.register(&[K::Class], "sealed-supertype", checkers::sealed::check);
        registry.register(
            &[K::Class],
            "constructor-delegation",
            checkers::constructor_delegation::check,
        );
        registry.register(&[K::Class], "companion-objects", checkers::misc::check_companions);

        registry.register(&[K::Property], "accessor-types", checkers::accessor::check);
        registry.register(&[K::Property], "lateinit", checkers::misc::check_lateinit);
        registry.register(
            &[K::TypeParameter],
            "type-parameter-bounds",
            checkers::type_parameter_bounds::check,
        );
        registry.register(
            &[K::Function, K::PropertyAccessor],
            "inline-declaration",
            checkers::inline::check,
        );
        registry.register(
            &[K::AnonymousInitializer],
            "anonymous-initializer",
            checkers::misc::check_anonymous_initializer,
        );

        registry.register_type_ref("projection-relation", checkers::projection::check);

        registry.register_expression(
            &[
                ExprKindTag::Literal,
                ExprKindTag::Name,
                ExprKindTag::Lambda,
                ExprKindTag::This,
                ExprKindTag::StringTemplate,
                ExprKindTag::CallableReference,
            ],
            "unused-expression",
            checkers::unused_expression::check,
        );
        registry
    }

    /// Add a checker that runs on every declaration kind.
    pub fn register_basic(&mut self, name: &'static str, check: DeclarationCheck) -> &mut Self {
        self.basic.push(DeclarationChecker { name, check });
        self
    }

    pub fn register(
        &mut self,
        kinds: &[DeclKindTag],
        name: &'static str,
        check: DeclarationCheck,
    ) -> &mut Self {
        for &kind in kinds {
            self.declarations
                .entry(kind)
                .or_default()
                .push(DeclarationChecker { name, check });
        }
        self
    }

    pub fn register_expression(
        &mut self,
        kinds: &[ExprKindTag],
        name: &'static str,
        check: ExpressionCheck,
    ) -> &mut Self {
        for &kind in kinds {
            self.expressions
                .entry(kind)
                .or_default()
                .push(ExpressionChecker { name, check });
        }
        self
    }

    pub fn register_type_ref(&mut self, name: &'static str, check: TypeRefCheck) -> &mut Self {
        self.type_refs.push(TypeRefChecker { name, check });
        self
    }

    /// Remove every checker registered under `name`. Returns whether any was removed.
    pub fn disable(&mut self, name: &str) -> bool {
        let before = self.len();
        self.basic.retain(|checker| checker.name != name);
        for checkers in self.declarations.values_mut() {
            checkers.retain(|checker| checker.name != name);
        }
        for checkers in self.expressions.values_mut() {
            checkers.retain(|checker| checker.name != name);
        }
        self.type_refs.retain(|checker| checker.name != name);
        self.len() != before
    }

    /// Checkers for a declaration of `kind`: basic first, then kind-specific.
    pub fn declaration_checkers(
        &self,
        kind: DeclKindTag,
    ) -> impl Iterator<Item = &DeclarationChecker> + '_ {
        self.basic
            .iter()
            .chain(self.declarations.get(&kind).into_iter().flatten())
    }

    pub fn expression_checkers(
        &self,
        kind: ExprKindTag,
    ) -> impl Iterator<Item = &ExpressionChecker> + '_ {
        self.expressions.get(&kind).into_iter().flatten()
    }

    #[must_use]
    pub fn type_ref_checkers(&self) -> &[TypeRefChecker] {
        &self.type_refs
    }

    #[must_use]
    pub fn has_expression_checkers(&self) -> bool {
        self.expressions.values().any(|checkers| !checkers.is_empty())
    }

    /// Distinct checker names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        let all = self
            .basic
            .iter()
            .map(|checker| checker.name)
            .chain(self.declarations.values().flatten().map(|checker| checker.name))
            .chain(self.type_refs.iter().map(|checker| checker.name))
            .chain(self.expressions.values().flatten().map(|checker| checker.name));
        for name in all {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Total number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.basic.len()
            + self.declarations.values().map(Vec::len).sum::<usize>()
            + self.expressions.values().map(Vec::len).sum::<usize>()
            + self.type_refs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
