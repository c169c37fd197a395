//! Checker context: the state threaded through a declaration walk.
//!
//! A `CheckerContext` is a persistent value. `with_declaration` and
//! `with_suppressed_diagnostics` return a new context that shares every
//! frame of the old one through `Arc` links; nothing reachable from a
//! context is ever mutated. Sibling branches of the walk therefore never
//! observe each other's frames, and the same declaration can be checked
//! again under a different ancestor chain without any locking.

use kfir_common::DiagnosticCategory;
use kfir_common::limits::SUPPRESSION_INLINE_CAPACITY;
use kfir_tree::{Annotation, DeclId, Declaration, ResolvePhase, Session, class_ids};
use smallvec::SmallVec;
use std::sync::Arc;

struct DeclFrame {
    decl: DeclId,
    depth: u32,
    parent: Option<Arc<DeclFrame>>,
}

struct SuppressionFrame {
    names: SmallVec<[String; SUPPRESSION_INLINE_CAPACITY]>,
    parent: Option<Arc<SuppressionFrame>>,
}

#[derive(Clone)]
pub struct CheckerContext<'s> {
    session: &'s Session,
    file: DeclId,
    declarations: Option<Arc<DeclFrame>>,
    suppressions: Option<Arc<SuppressionFrame>>,
    required_phase: ResolvePhase,
}

impl<'s> CheckerContext<'s> {
    /// Root context for checking `file`.
    #[must_use]
    pub fn new(session: &'s Session, file: DeclId) -> Self {
        Self {
            session,
            file,
            declarations: None,
            suppressions: None,
            required_phase: ResolvePhase::BodyResolve,
        }
    }

    #[must_use]
    pub fn session(&self) -> &'s Session {
        self.session
    }

    #[must_use]
    pub fn file(&self) -> DeclId {
        self.file
    }

    #[must_use]
    pub fn file_path(&self) -> &'s str {
        self.session.file_path(self.file)
    }

    #[must_use]
    pub fn required_phase(&self) -> ResolvePhase {
        self.required_phase
    }

    #[must_use]
    pub fn with_required_phase(&self, phase: ResolvePhase) -> Self {
        Self {
            required_phase: phase,
            ..self.clone()
        }
    }

    /// Push `decl` as the innermost containing declaration.
    #[must_use]
    pub fn with_declaration(&self, decl: DeclId) -> Self {
        let depth = self.depth() + 1;
        Self {
            declarations: Some(Arc::new(DeclFrame {
                decl,
                depth,
                parent: self.declarations.clone(),
            })),
            ..self.clone()
        }
    }

    /// Push a suppression frame for any `@Suppress` among `annotations`.
    ///
    /// Returns an unchanged copy when nothing is suppressed.
    #[must_use]
    pub fn with_suppressed_diagnostics(&self, annotations: &[Annotation]) -> Self {
        let names: SmallVec<[String; SUPPRESSION_INLINE_CAPACITY]> = annotations
            .iter()
            .filter(|annotation| self.session.is_class(annotation.class, class_ids::SUPPRESS))
            .flat_map(|annotation| {
                annotation
                    .arguments
                    .iter()
                    .flat_map(|(_, value)| value.strings())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        self.with_suppressed_names(names)
    }

    /// Push a suppression frame listing factory or category names.
    #[must_use]
    pub fn with_suppressed_names<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: SmallVec<[String; SUPPRESSION_INLINE_CAPACITY]> =
            names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return self.clone();
        }
        Self {
            suppressions: Some(Arc::new(SuppressionFrame {
                names,
                parent: self.suppressions.clone(),
            })),
            ..self.clone()
        }
    }

    /// Whether a diagnostic named `factory` of `category` is silenced by a live frame.
    #[must_use]
    pub fn is_suppressed(&self, factory: &str, category: DiagnosticCategory) -> bool {
        let category_name = category.suppression_name();
        let mut frame = self.suppressions.as_deref();
        while let Some(current) = frame {
            if current
                .names
                .iter()
                .any(|name| name == factory || name == category_name)
            {
                return true;
            }
            frame = current.parent.as_deref();
        }
        false
    }

    /// Number of containing declarations.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.declarations.as_ref().map_or(0, |frame| frame.depth)
    }

    /// Innermost containing declaration (the node being checked, during dispatch).
    #[must_use]
    pub fn current(&self) -> Option<DeclId> {
        self.declarations.as_ref().map(|frame| frame.decl)
    }

    /// The declaration containing [`current`](Self::current).
    #[must_use]
    pub fn container(&self) -> Option<DeclId> {
        self.declarations
            .as_ref()
            .and_then(|frame| frame.parent.as_ref())
            .map(|frame| frame.decl)
    }

    /// Innermost-first walk over the containing declarations.
    pub fn declarations_innermost_first(&self) -> impl Iterator<Item = DeclId> + '_ {
        std::iter::successors(self.declarations.as_deref(), |frame| frame.parent.as_deref())
            .map(|frame| frame.decl)
    }

    /// Containing declarations, outermost first.
    #[must_use]
    pub fn containing_declarations(&self) -> Vec<DeclId> {
        let mut out: Vec<DeclId> = self.declarations_innermost_first().collect();
        out.reverse();
        out
    }

    /// First containing declaration, innermost first, that satisfies `predicate`.
    pub fn find_closest(&self, predicate: impl Fn(&Declaration) -> bool) -> Option<DeclId> {
        self.declarations_innermost_first()
            .find(|&decl| predicate(self.session.decl(decl)))
    }

    /// Closest containing class, `skip` excluded.
    #[must_use]
    pub fn closest_class_except(&self, skip: DeclId) -> Option<DeclId> {
        self.declarations_innermost_first()
            .filter(|&decl| decl != skip)
            .find(|&decl| self.session.decl(decl).as_class().is_some())
    }

    /// Flatten `@Suppress` arguments for diagnostics rendering.
    #[must_use]
    pub fn suppressed_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut frame = self.suppressions.as_deref();
        while let Some(current) = frame {
            out.extend(current.names.iter().cloned());
            frame = current.parent.as_deref();
        }
        out
    }
}
