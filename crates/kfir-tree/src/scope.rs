//! Member scopes: which supertype members a declaration overrides.

use crate::decl::DeclKindTag;
use crate::ids::{DeclId, TypeId};
use crate::session::Session;
use crate::type_ops::Substitution;
use crate::types::TypeData;
use kfir_common::limits::OVERRIDDEN_INLINE_CAPACITY;
use kfir_common::{RecursionGuard, RecursionProfile, RecursionResult};
use smallvec::SmallVec;

/// A supertype member overridden by some declaration.
#[derive(Clone, Debug)]
pub struct OverriddenMember {
    pub decl: DeclId,
    /// Class declaring `decl`.
    pub owner: DeclId,
    /// Maps the owner's type parameters (and the member's own type
    /// parameters) into the overriding declaration's terms.
    pub substitution: Substitution,
}

pub type OverriddenMembers = SmallVec<[OverriddenMember; OVERRIDDEN_INLINE_CAPACITY]>;

impl Session {
    /// Members of the closest supertypes that `member` overrides.
    ///
    /// Each direct supertype is searched for a matching member; when a
    /// supertype declares none, its own supertypes are searched instead.
    #[must_use]
    pub fn direct_overridden(&self, member: DeclId) -> OverriddenMembers {
        let mut out = OverriddenMembers::new();
        let declaration = self.decl(member);
        if !matches!(declaration.tag(), DeclKindTag::Function | DeclKindTag::Property) {
            return out;
        }
        let Some(class) = declaration.parent.filter(|&parent| self.decl(parent).as_class().is_some())
        else {
            return out;
        };
        let mut guard = RecursionGuard::with_profile(RecursionProfile::SupertypeClosure);
        let walked = guard.scope(class, |guard| {
            for supertype in self.direct_supertypes(class) {
                self.collect_overridden(member, supertype, &Substitution::default(), guard, &mut out);
            }
        });
        if let Err(denied) = walked {
            self.log_denied_supertype_walk(class, denied);
        }
        out
    }

    fn collect_overridden(
        &self,
        member: DeclId,
        supertype: TypeId,
        outer: &Substitution,
        guard: &mut RecursionGuard<DeclId>,
        out: &mut OverriddenMembers,
    ) {
        let supertype = self.substitute(self.fully_expand(supertype), outer);
        let TypeData::Class {
            classifier,
            arguments,
            ..
        } = self.type_data(supertype)
        else {
            return;
        };
        let Some(class) = self.decl(classifier).as_class() else {
            return;
        };
        let substitution = self.arguments_substitution(classifier, &arguments);

        let mut found = false;
        for &candidate in &class.members {
            if let Some(full) = self.matches_signature(member, candidate, &substitution) {
                found = true;
                if !out.iter().any(|existing| existing.decl == candidate) {
                    out.push(OverriddenMember {
                        decl: candidate,
                        owner: classifier,
                        substitution: full,
                    });
                }
            }
        }
        if found {
            return;
        }
        let walked = guard.scope(classifier, |guard| {
            for next in self.direct_supertypes(classifier) {
                self.collect_overridden(member, next, &substitution, guard, out);
            }
        });
        if let Err(denied) = walked {
            self.log_denied_supertype_walk(classifier, denied);
        }
    }

    /// Cycles log at debug level, exhausted limits at warn.
    fn log_denied_supertype_walk(&self, class: DeclId, denied: RecursionResult) {
        if denied.is_cycle() {
            tracing::debug!(class = %self.render_decl(class), "supertype cycle in override search");
        } else {
            tracing::warn!(
                class = %self.render_decl(class),
                ?denied,
                "override search stopped"
            );
        }
    }

    /// Substitution under which `candidate` has the same signature as `member`.
    fn matches_signature(
        &self,
        member: DeclId,
        candidate: DeclId,
        class_substitution: &Substitution,
    ) -> Option<Substitution> {
        let own = self.decl(member);
        let other = self.decl(candidate);
        if own.tag() != other.tag() || own.name != other.name || other.visibility().is_private() {
            return None;
        }
        let own_type_parameters = own.type_parameters();
        let other_type_parameters = other.type_parameters();
        if own_type_parameters.len() != other_type_parameters.len()
            || own.value_parameters().len() != other.value_parameters().len()
            || own.receiver_type_ref().is_some() != other.receiver_type_ref().is_some()
        {
            return None;
        }

        let mut substitution = class_substitution.clone();
        for (&theirs, &ours) in other_type_parameters.iter().zip(own_type_parameters) {
            substitution.insert(theirs, self.intern(TypeData::type_parameter(ours)));
        }

        if let (Some(ours), Some(theirs)) = (own.receiver_type_ref(), other.receiver_type_ref()) {
            if !self.equal_types(ours.ty, self.substitute(theirs.ty, &substitution)) {
                return None;
            }
        }
        for (&ours, &theirs) in own.value_parameters().iter().zip(other.value_parameters()) {
            let ours = self.decl(ours).return_type_ref()?.ty;
            let theirs = self.decl(theirs).return_type_ref()?.ty;
            if !self.equal_types(ours, self.substitute(theirs, &substitution)) {
                return None;
            }
        }
        Some(substitution)
    }

    /// Transitive closure of [`Session::direct_overridden`].
    #[must_use]
    pub fn all_overridden(&self, member: DeclId) -> Vec<DeclId> {
        let mut out = Vec::new();
        let mut stack = vec![member];
        while let Some(current) = stack.pop() {
            for overridden in self.direct_overridden(current) {
                if !out.contains(&overridden.decl) {
                    out.push(overridden.decl);
                    stack.push(overridden.decl);
                }
            }
        }
        out
    }
}
