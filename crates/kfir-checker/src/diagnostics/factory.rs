//! Typed diagnostic factories.
//!
//! A factory fixes a diagnostic's name, severity, message template and the
//! shape of its arguments. Arguments are rendered to text when the
//! diagnostic is created, so a collected [`Diagnostic`](kfir_common::Diagnostic)
//! no longer refers to the graph.

use kfir_common::{DiagnosticCategory, LanguageFeature, LanguageVersionSettings};
use kfir_tree::{
    ClassKind, DeclId, EffectiveVisibility, Modality, Session, TypeId, UseSiteTarget, Variance,
    Visibility,
};
use std::marker::PhantomData;

/// A value that can appear as a diagnostic argument.
pub trait RenderArg {
    fn render(&self, session: &Session) -> String;
}

impl RenderArg for DeclId {
    fn render(&self, session: &Session) -> String {
        session.render_decl(*self)
    }
}

impl RenderArg for TypeId {
    fn render(&self, session: &Session) -> String {
        session.render_type(*self)
    }
}

impl RenderArg for String {
    fn render(&self, _: &Session) -> String {
        self.clone()
    }
}

impl RenderArg for &str {
    fn render(&self, _: &Session) -> String {
        (*self).to_string()
    }
}

impl RenderArg for usize {
    fn render(&self, _: &Session) -> String {
        self.to_string()
    }
}

impl RenderArg for Visibility {
    fn render(&self, _: &Session) -> String {
        self.keyword().to_string()
    }
}

impl RenderArg for EffectiveVisibility {
    fn render(&self, _: &Session) -> String {
        self.to_string()
    }
}

impl RenderArg for Variance {
    fn render(&self, _: &Session) -> String {
        self.label().to_string()
    }
}

impl RenderArg for Modality {
    fn render(&self, _: &Session) -> String {
        self.keyword().to_string()
    }
}

impl RenderArg for ClassKind {
    fn render(&self, _: &Session) -> String {
        self.label().to_string()
    }
}

impl RenderArg for UseSiteTarget {
    fn render(&self, _: &Session) -> String {
        self.keyword().to_string()
    }
}

/// A member rendered together with its owner, e.g. `Base.run`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Member(pub DeclId);

impl RenderArg for Member {
    fn render(&self, session: &Session) -> String {
        let name = session.render_decl(self.0);
        match session.containing_class(self.0) {
            Some(owner) => format!("{}.{name}", session.render_decl(owner)),
            None => name,
        }
    }
}

/// The argument tuple of a factory.
pub trait DiagnosticArgs {
    fn render_all(&self, session: &Session) -> Vec<String>;
}

impl DiagnosticArgs for () {
    fn render_all(&self, _: &Session) -> Vec<String> {
        Vec::new()
    }
}

macro_rules! impl_diagnostic_args {
    ($($name:ident : $index:tt),+) => {
        impl<$($name: RenderArg),+> DiagnosticArgs for ($($name,)+) {
            fn render_all(&self, session: &Session) -> Vec<String> {
                vec![$(self.$index.render(session)),+]
            }
        }
    };
}

impl_diagnostic_args!(A: 0);
impl_diagnostic_args!(A: 0, B: 1);
impl_diagnostic_args!(A: 0, B: 1, C: 2);
impl_diagnostic_args!(A: 0, B: 1, C: 2, D: 3);

/// A diagnostic kind with arguments of type `A`.
pub struct DiagnosticFactory<A> {
    pub name: &'static str,
    pub severity: DiagnosticCategory,
    /// Message with `{0}`, `{1}`, ... placeholders.
    pub template: &'static str,
    args: PhantomData<fn(A)>,
}

impl<A> DiagnosticFactory<A> {
    #[must_use]
    pub const fn error(name: &'static str, template: &'static str) -> Self {
        Self {
            name,
            severity: DiagnosticCategory::Error,
            template,
            args: PhantomData,
        }
    }

    #[must_use]
    pub const fn warning(name: &'static str, template: &'static str) -> Self {
        Self {
            name,
            severity: DiagnosticCategory::Warning,
            template,
            args: PhantomData,
        }
    }
}

impl<A: DiagnosticArgs> DiagnosticFactory<A> {
    /// Rendered arguments and message.
    #[must_use]
    pub fn render(&self, args: &A, session: &Session) -> (Vec<String>, String) {
        let arguments = args.render_all(session);
        let refs: Vec<&str> = arguments.iter().map(String::as_str).collect();
        let message = kfir_common::format_message(self.template, &refs);
        (arguments, message)
    }
}

/// A warning that becomes an error once `feature` is supported.
pub struct DeprecationDiagnosticFactory<A> {
    pub feature: LanguageFeature,
    pub warning: DiagnosticFactory<A>,
    pub error: DiagnosticFactory<A>,
}

impl<A> DeprecationDiagnosticFactory<A> {
    #[must_use]
    pub const fn new(
        feature: LanguageFeature,
        warning: DiagnosticFactory<A>,
        error: DiagnosticFactory<A>,
    ) -> Self {
        Self {
            feature,
            warning,
            error,
        }
    }

    #[must_use]
    pub fn choose(&self, settings: &LanguageVersionSettings) -> &DiagnosticFactory<A> {
        if settings.supports_feature(self.feature) {
            &self.error
        } else {
            &self.warning
        }
    }
}
