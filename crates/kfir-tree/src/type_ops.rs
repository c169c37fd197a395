//! Type queries: substitution, alias expansion, supertypes and subtyping.
//!
//! All operations work on interned [`TypeId`]s and return interned results.
//! Recursive walks (alias chains, supertype closures, subtype checks) are
//! bounded by [`RecursionGuard`]s so malformed graphs cannot hang a checker.

use crate::ids::{DeclId, TypeId};
use crate::names::class_ids;
use crate::session::Session;
use crate::types::{TypeAttributes, TypeData, TypeInterner, TypeProjection};
use crate::variance::{EffectiveProjection, ProjectionKind, Variance};
use kfir_common::{RecursionGuard, RecursionProfile, RecursionResult};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

/// Type parameter to replacement type.
pub type Substitution = FxHashMap<DeclId, TypeId>;

/// Flavor of a built-in function type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionalKind {
    Function,
    SuspendFunction,
    /// `KFunctionN` / `KSuspendFunctionN`.
    Reflect,
}

impl Session {
    /// Nullable `Any`, the implicit upper bound.
    #[must_use]
    pub fn nullable_any(&self) -> TypeId {
        match self.class_by_id(class_ids::ANY) {
            Some(any) => self.intern(TypeData::class(any, []).with_nullability(true)),
            None => TypeInterner::ERROR,
        }
    }

    /// Map the type parameters of `classifier` to `arguments`; star projections map to `Any?`.
    #[must_use]
    pub fn arguments_substitution(&self, classifier: DeclId, arguments: &[TypeProjection]) -> Substitution {
        self.decl(classifier)
            .type_parameters()
            .iter()
            .zip(arguments)
            .map(|(&parameter, argument)| {
                (parameter, argument.ty().unwrap_or_else(|| self.nullable_any()))
            })
            .collect()
    }

    #[must_use]
    pub fn substitute(&self, ty: TypeId, substitution: &Substitution) -> TypeId {
        if substitution.is_empty() {
            return ty;
        }
        match self.type_data(ty) {
            TypeData::TypeParameter {
                parameter,
                nullable,
                attributes,
            } => match substitution.get(&parameter) {
                Some(&replacement) => {
                    let data = self.type_data(replacement);
                    let merged = data.attributes() | attributes;
                    let nullable = nullable || data.is_nullable();
                    self.intern(data.with_nullability(nullable).with_attributes(merged))
                }
                None => ty,
            },
            TypeData::Class {
                classifier,
                arguments,
                nullable,
                attributes,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| match *argument {
                        TypeProjection::Star => TypeProjection::Star,
                        TypeProjection::Type { kind, ty } => TypeProjection::Type {
                            kind,
                            ty: self.substitute(ty, substitution),
                        },
                    })
                    .collect();
                self.intern(TypeData::Class {
                    classifier,
                    arguments,
                    nullable,
                    attributes,
                })
            }
            TypeData::Error => ty,
        }
    }

    /// Expand a chain of type aliases at the top level.
    ///
    /// Arguments are left as written. A cyclic alias chain expands to the error type.
    #[must_use]
    pub fn fully_expand(&self, ty: TypeId) -> TypeId {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeExpansion);
        let mut current = ty;
        let mut entered = Vec::new();
        let result = loop {
            let TypeData::Class {
                classifier,
                arguments,
                nullable,
                attributes,
            } = self.type_data(current)
            else {
                break current;
            };
            let Some(alias) = self.decl(classifier).as_type_alias() else {
                break current;
            };
            match guard.enter(classifier) {
                RecursionResult::Entered => entered.push(classifier),
                other => {
                    trace!(?classifier, ?other, "alias expansion stopped");
                    break TypeInterner::ERROR;
                }
            }
            let substitution = self.arguments_substitution(classifier, &arguments);
            let expanded = self.substitute(alias.expanded.ty, &substitution);
            let data = self.type_data(expanded);
            if matches!(data, TypeData::Error) {
                break TypeInterner::ERROR;
            }
            let nullable = nullable || data.is_nullable();
            let attributes = attributes | data.attributes();
            current = self.intern(data.with_nullability(nullable).with_attributes(attributes));
        };
        for classifier in entered.into_iter().rev() {
            guard.leave(classifier);
        }
        result
    }

    /// Whether `ty` is written through a type alias.
    #[must_use]
    pub fn is_abbreviation(&self, ty: TypeId) -> bool {
        matches!(
            self.type_data(ty),
            TypeData::Class { classifier, .. } if self.decl(classifier).as_type_alias().is_some()
        )
    }

    /// Class declaration of an expanded class type.
    #[must_use]
    pub fn class_of(&self, ty: TypeId) -> Option<DeclId> {
        match self.type_data(self.fully_expand(ty)) {
            TypeData::Class { classifier, .. } if self.decl(classifier).as_class().is_some() => {
                Some(classifier)
            }
            _ => None,
        }
    }

    /// Type parameter of a type-parameter type.
    #[must_use]
    pub fn type_parameter_of(&self, ty: TypeId) -> Option<DeclId> {
        match self.type_data(self.fully_expand(ty)) {
            TypeData::TypeParameter { parameter, .. } => Some(parameter),
            _ => None,
        }
    }

    /// Marked nullable, or a type parameter that may be instantiated with a nullable type.
    #[must_use]
    pub fn is_nullable(&self, ty: TypeId) -> bool {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeExpansion);
        self.is_nullable_guarded(ty, &mut guard)
    }

    fn is_nullable_guarded(&self, ty: TypeId, guard: &mut RecursionGuard<TypeId>) -> bool {
        match self.type_data(self.fully_expand(ty)) {
            TypeData::Class { nullable, .. } => nullable,
            TypeData::TypeParameter {
                parameter,
                nullable,
                ..
            } => {
                if nullable {
                    return true;
                }
                let Some(data) = self.decl(parameter).as_type_parameter() else {
                    return false;
                };
                if data.bounds.is_empty() {
                    return true;
                }
                guard
                    .scope(ty, |guard| {
                        data.bounds
                            .iter()
                            .all(|bound| self.is_nullable_guarded(bound.ty, guard))
                    })
                    .unwrap_or(false)
            }
            TypeData::Error => false,
        }
    }

    #[must_use]
    pub fn is_error(&self, ty: TypeId) -> bool {
        matches!(self.type_data(self.fully_expand(ty)), TypeData::Error)
    }

    fn is_builtin(&self, ty: TypeId, class_id: &str, nullable: bool) -> bool {
        let data = self.type_data(self.fully_expand(ty));
        data.is_nullable() == nullable
            && self
                .class_of(ty)
                .is_some_and(|class| self.is_class(class, class_id))
    }

    #[must_use]
    pub fn is_unit(&self, ty: TypeId) -> bool {
        self.is_builtin(ty, class_ids::UNIT, false)
    }

    #[must_use]
    pub fn is_nothing(&self, ty: TypeId) -> bool {
        self.is_builtin(ty, class_ids::NOTHING, false)
    }

    #[must_use]
    pub fn is_any(&self, ty: TypeId) -> bool {
        self.is_builtin(ty, class_ids::ANY, false)
    }

    #[must_use]
    pub fn functional_kind(&self, ty: TypeId) -> Option<FunctionalKind> {
        let class = self.class_of(ty)?;
        let class_id = self.class_id_of(class)?;
        if class_ids::is_suspend_function(class_id) {
            Some(FunctionalKind::SuspendFunction)
        } else if class_ids::function_arity(class_id).is_some() {
            Some(FunctionalKind::Function)
        } else if class_id.starts_with(class_ids::KFUNCTION_PREFIX)
            || class_id.starts_with(class_ids::KSUSPEND_FUNCTION_PREFIX)
        {
            Some(FunctionalKind::Reflect)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_functional_type(&self, ty: TypeId) -> bool {
        self.functional_kind(ty).is_some()
    }

    #[must_use]
    pub fn is_suspend_functional_type(&self, ty: TypeId) -> bool {
        self.functional_kind(ty) == Some(FunctionalKind::SuspendFunction)
    }

    #[must_use]
    pub fn is_reflect_functional_type(&self, ty: TypeId) -> bool {
        self.functional_kind(ty) == Some(FunctionalKind::Reflect)
    }

    /// Declared supertypes of a class; an empty list means `Any`.
    #[must_use]
    pub fn direct_supertypes(&self, class: DeclId) -> SmallVec<[TypeId; 2]> {
        let Some(data) = self.decl(class).as_class() else {
            return SmallVec::new();
        };
        let mut out: SmallVec<[TypeId; 2]> = data
            .supertypes
            .iter()
            .map(|entry| entry.type_ref.ty)
            .collect();
        if out.is_empty() && data.class_id.as_str() != class_ids::ANY {
            out.push(self.builtin_type(class_ids::ANY));
        }
        out
    }

    /// The parameterization of `target` among the supertypes of `ty` (including itself).
    #[must_use]
    pub fn find_supertype(&self, ty: TypeId, target: DeclId) -> Option<TypeId> {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::SupertypeClosure);
        self.find_supertype_guarded(ty, target, &mut guard)
    }

    fn find_supertype_guarded(
        &self,
        ty: TypeId,
        target: DeclId,
        guard: &mut RecursionGuard<DeclId>,
    ) -> Option<TypeId> {
        let expanded = self.fully_expand(ty);
        let TypeData::Class {
            classifier,
            arguments,
            ..
        } = self.type_data(expanded)
        else {
            return None;
        };
        if classifier == target {
            return Some(expanded);
        }
        let substitution = self.arguments_substitution(classifier, &arguments);
        guard
            .scope(classifier, |guard| {
                self.direct_supertypes(classifier)
                    .into_iter()
                    .find_map(|supertype| {
                        let supertype = self.substitute(supertype, &substitution);
                        self.find_supertype_guarded(supertype, target, guard)
                    })
            })
            .ok()
            .flatten()
    }

    /// Every class reachable through supertypes, `class` excluded.
    #[must_use]
    pub fn supertype_classes(&self, class: DeclId) -> Vec<DeclId> {
        let mut out = Vec::new();
        let mut stack: Vec<DeclId> = vec![class];
        while let Some(current) = stack.pop() {
            for supertype in self.direct_supertypes(current) {
                if let Some(next) = self.class_of(supertype) {
                    if next != class && !out.contains(&next) {
                        out.push(next);
                        stack.push(next);
                    }
                }
            }
        }
        out
    }

    #[must_use]
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        TypeChecker::new(self).check(sub, sup)
    }

    /// Mutual subtyping.
    #[must_use]
    pub fn equal_types(&self, a: TypeId, b: TypeId) -> bool {
        a == b || (self.is_subtype(a, b) && self.is_subtype(b, a))
    }

    /// Render a type the way diagnostics print it.
    #[must_use]
    pub fn render_type(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.render_into(ty, &mut out, 0);
        out
    }

    fn render_into(&self, ty: TypeId, out: &mut String, depth: u32) {
        if depth > kfir_common::limits::MAX_ALIAS_EXPANSION_DEPTH {
            out.push_str("...");
            return;
        }
        match self.type_data(ty) {
            TypeData::Error => out.push_str("<error>"),
            TypeData::TypeParameter {
                parameter, nullable, ..
            } => {
                out.push_str(&self.decl(parameter).name);
                if nullable {
                    out.push('?');
                }
            }
            TypeData::Class {
                classifier,
                arguments,
                nullable,
                attributes,
            } => {
                let is_function = self
                    .class_id_of(classifier)
                    .is_some_and(|id| class_ids::function_arity(id).is_some())
                    && arguments.last().and_then(TypeProjection::ty).is_some();
                if is_function {
                    if nullable {
                        out.push('(');
                    }
                    self.render_function(&arguments, attributes, out, depth);
                    if nullable {
                        out.push_str(")?");
                    }
                    return;
                }
                out.push_str(&self.render_decl(classifier));
                if !arguments.is_empty() {
                    out.push('<');
                    for (index, argument) in arguments.iter().enumerate() {
                        if index > 0 {
                            out.push_str(", ");
                        }
                        self.render_projection(argument, out, depth);
                    }
                    out.push('>');
                }
                if nullable {
                    out.push('?');
                }
            }
        }
    }

    fn render_projection(&self, projection: &TypeProjection, out: &mut String, depth: u32) {
        match *projection {
            TypeProjection::Star => out.push('*'),
            TypeProjection::Type { kind, ty } => {
                if kind != ProjectionKind::Invariant {
                    out.push_str(kind.keyword());
                    out.push(' ');
                }
                self.render_into(ty, out, depth + 1);
            }
        }
    }

    fn render_function(
        &self,
        arguments: &[TypeProjection],
        attributes: TypeAttributes,
        out: &mut String,
        depth: u32,
    ) {
        let Some((result, mut parameters)) = arguments.split_last() else {
            return;
        };
        if attributes.contains(TypeAttributes::EXTENSION_FUNCTION) {
            if let Some((receiver, rest)) = parameters.split_first() {
                self.render_projection(receiver, out, depth);
                out.push('.');
                parameters = rest;
            }
        }
        out.push('(');
        for (index, parameter) in parameters.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            self.render_projection(parameter, out, depth);
        }
        out.push_str(") -> ");
        self.render_projection(result, out, depth);
    }
}

/// Structural subtype checker with cycle detection.
///
/// Re-entering a pair that is already being checked assumes success
/// (coinductive), which makes recursive generic bounds such as
/// `T : Comparable<T>` terminate.
pub struct TypeChecker<'s> {
    session: &'s Session,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'s> TypeChecker<'s> {
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            guard: RecursionGuard::with_profile(RecursionProfile::Subtyping),
        }
    }

    pub fn check(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        match self.guard.enter((sub, sup)) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => return false,
        }
        let result = self.check_inner(sub, sup);
        self.guard.leave((sub, sup));
        result
    }

    fn check_inner(&mut self, sub: TypeId, sup: TypeId) -> bool {
        let session = self.session;
        let sub = session.fully_expand(sub);
        let sup = session.fully_expand(sup);
        let sub_data = session.type_data(sub);
        let sup_data = session.type_data(sup);

        if matches!(sub_data, TypeData::Error) || matches!(sup_data, TypeData::Error) {
            return true;
        }
        if sup_data.is_nullable()
            && session
                .class_of(sup)
                .is_some_and(|class| session.is_class(class, class_ids::ANY))
        {
            return true;
        }
        if session.is_nullable(sub) && !session.is_nullable(sup) {
            return false;
        }
        if session
            .class_of(sub)
            .is_some_and(|class| session.is_class(class, class_ids::NOTHING))
        {
            return true;
        }

        match (&sub_data, &sup_data) {
            (
                TypeData::TypeParameter { parameter: a, .. },
                TypeData::TypeParameter { parameter: b, .. },
            ) if a == b => true,
            (TypeData::TypeParameter { parameter, .. }, _) => {
                let bounds: SmallVec<[TypeId; 2]> = session
                    .decl(*parameter)
                    .as_type_parameter()
                    .map(|data| data.bounds.iter().map(|bound| bound.ty).collect())
                    .unwrap_or_default();
                if bounds.is_empty() {
                    return self.check(session.nullable_any(), sup);
                }
                bounds.into_iter().any(|bound| self.check(bound, sup))
            }
            (_, TypeData::TypeParameter { .. }) => false,
            (TypeData::Class { .. }, TypeData::Class { classifier, arguments, .. }) => {
                let non_null_sub = session.intern(sub_data.clone().with_nullability(false));
                let Some(found) = session.find_supertype(non_null_sub, *classifier) else {
                    return false;
                };
                let found_data = session.type_data(found);
                let parameters = session.decl(*classifier).type_parameters().to_vec();
                parameters
                    .iter()
                    .zip(found_data.arguments().iter().zip(arguments.iter()))
                    .all(|(&parameter, (found_arg, sup_arg))| {
                        self.check_argument(parameter, *found_arg, *sup_arg)
                    })
            }
            _ => false,
        }
    }

    fn check_argument(
        &mut self,
        parameter: DeclId,
        found: TypeProjection,
        expected: TypeProjection,
    ) -> bool {
        let declared = self
            .session
            .decl(parameter)
            .as_type_parameter()
            .map_or(Variance::Invariant, |data| data.variance);
        let effective = |projection: TypeProjection| match projection.kind().variance() {
            Some(variance) => EffectiveProjection::compute(declared, variance),
            None => EffectiveProjection::Star,
        };
        let (TypeProjection::Type { ty: expected_ty, .. }, TypeProjection::Type { ty: found_ty, .. }) =
            (expected, found)
        else {
            return matches!(expected, TypeProjection::Star);
        };
        match (effective(found), effective(expected)) {
            (_, EffectiveProjection::Star) => true,
            (EffectiveProjection::Out | EffectiveProjection::Invariant, EffectiveProjection::Out) => {
                self.check(found_ty, expected_ty)
            }
            (EffectiveProjection::In | EffectiveProjection::Invariant, EffectiveProjection::In) => {
                self.check(expected_ty, found_ty)
            }
            (EffectiveProjection::Invariant, EffectiveProjection::Invariant) => {
                self.check(found_ty, expected_ty) && self.check(expected_ty, found_ty)
            }
            _ => false,
        }
    }
}
