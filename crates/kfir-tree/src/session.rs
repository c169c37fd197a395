//! The session: a validated resolved graph plus symbol lookup.
//!
//! `Session` is the read-only collaborator every checker queries. Everything
//! except the type interner is immutable after construction, and the
//! interner is internally synchronized, so a `&Session` can be shared by
//! threads checking different files.

use crate::annotations::Annotation;
use crate::decl::{DeclKind, Declaration};
use crate::error::GraphError;
use crate::expr::Expression;
use crate::ids::{ClassId, DeclId, ExprId, TypeId};
use crate::names::class_ids;
use crate::types::{TypeData, TypeInterner};
use crate::visibility::{EffectiveVisibility, Visibility};
use kfir_common::{LanguageFeature, LanguageVersionSettings};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Serializable form of a resolved program.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Graph {
    pub decls: Vec<Declaration>,
    pub exprs: Vec<Expression>,
    pub types: TypeInterner,
    /// Every file, including library files.
    pub files: Vec<DeclId>,
}

impl Graph {
    pub fn from_json(text: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string(self)?)
    }
}

pub struct Session {
    graph: Graph,
    classes: FxHashMap<ClassId, DeclId>,
    settings: LanguageVersionSettings,
}

impl Session {
    /// Validate `graph` and index its classes.
    pub fn new(graph: Graph, settings: LanguageVersionSettings) -> Result<Self, GraphError> {
        validate(&graph)?;
        let mut classes = FxHashMap::default();
        for (index, decl) in graph.decls.iter().enumerate() {
            if let DeclKind::Class(class) = &decl.kind {
                if class.is_local {
                    continue;
                }
                if classes
                    .insert(class.class_id.clone(), DeclId(index as u32))
                    .is_some()
                {
                    return Err(GraphError::DuplicateClassId(class.class_id.clone()));
                }
            }
        }
        tracing::debug!(
            decls = graph.decls.len(),
            exprs = graph.exprs.len(),
            types = graph.types.len(),
            "session created"
        );
        Ok(Self {
            graph,
            classes,
            settings,
        })
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub fn settings(&self) -> &LanguageVersionSettings {
        &self.settings
    }

    #[must_use]
    pub fn supports_feature(&self, feature: LanguageFeature) -> bool {
        self.settings.supports_feature(feature)
    }

    /// Declaration by id. Ids are validated when the session is built.
    #[inline]
    #[must_use]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.graph.decls[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn expr(&self, id: ExprId) -> &Expression {
        &self.graph.exprs[id.index()]
    }

    #[must_use]
    pub fn types(&self) -> &TypeInterner {
        &self.graph.types
    }

    #[inline]
    #[must_use]
    pub fn type_data(&self, id: TypeId) -> TypeData {
        self.graph.types.lookup(id)
    }

    #[inline]
    pub fn intern(&self, data: TypeData) -> TypeId {
        self.graph.types.intern(data)
    }

    /// Files to check (library files excluded).
    pub fn source_files(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.graph.files.iter().copied().filter(|&file| {
            self.decl(file)
                .as_file()
                .is_some_and(|data| !data.is_library)
        })
    }

    #[must_use]
    pub fn class_by_id(&self, class_id: &str) -> Option<DeclId> {
        self.classes.get(&ClassId::new(class_id)).copied()
    }

    /// Non-null class type of a class without arguments; the error type if unknown.
    #[must_use]
    pub fn builtin_type(&self, class_id: &str) -> TypeId {
        match self.class_by_id(class_id) {
            Some(class) => self.intern(TypeData::class(class, [])),
            None => TypeInterner::ERROR,
        }
    }

    /// Ancestors from the direct parent outward.
    pub fn ancestors(&self, decl: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        std::iter::successors(self.decl(decl).parent, move |&current| {
            self.decl(current).parent
        })
    }

    #[must_use]
    pub fn file_of(&self, decl: DeclId) -> Option<DeclId> {
        if self.decl(decl).as_file().is_some() {
            return Some(decl);
        }
        self.ancestors(decl)
            .find(|&ancestor| self.decl(ancestor).as_file().is_some())
    }

    #[must_use]
    pub fn file_path(&self, decl: DeclId) -> &str {
        self.file_of(decl)
            .and_then(|file| self.decl(file).as_file())
            .map_or("", |file| file.path.as_str())
    }

    #[must_use]
    pub fn package_of(&self, decl: DeclId) -> &str {
        if let Some(class) = self.decl(decl).as_class() {
            return class.class_id.package();
        }
        self.file_of(decl)
            .and_then(|file| self.decl(file).as_file())
            .map_or("", |file| file.package.as_str())
    }

    #[must_use]
    pub fn module_of(&self, decl: DeclId) -> &str {
        self.file_of(decl)
            .and_then(|file| self.decl(file).as_file())
            .map_or("", |file| file.module.as_str())
    }

    /// Nearest enclosing class, excluding `decl` itself.
    #[must_use]
    pub fn containing_class(&self, decl: DeclId) -> Option<DeclId> {
        self.ancestors(decl)
            .find(|&ancestor| self.decl(ancestor).as_class().is_some())
    }

    /// Declared inside a function, accessor, constructor or initializer body.
    #[must_use]
    pub fn is_local(&self, decl: DeclId) -> bool {
        let is_local_class =
            |id: DeclId| self.decl(id).as_class().is_some_and(|class| class.is_local);
        if is_local_class(decl) {
            return true;
        }
        let mut child = decl;
        for ancestor in self.ancestors(decl) {
            if is_local_class(ancestor) {
                return true;
            }
            let owner = self.decl(ancestor);
            let owns_body = matches!(
                owner.kind,
                DeclKind::Function(_)
                    | DeclKind::PropertyAccessor(_)
                    | DeclKind::Constructor(_)
                    | DeclKind::AnonymousInitializer(_)
            );
            let in_signature = owner.value_parameters().contains(&child)
                || owner.type_parameters().contains(&child);
            if owns_body && !in_signature {
                return true;
            }
            child = ancestor;
        }
        false
    }

    #[must_use]
    pub fn class_id_of(&self, decl: DeclId) -> Option<&str> {
        self.decl(decl).as_class().map(|class| class.class_id.as_str())
    }

    #[must_use]
    pub fn is_class(&self, decl: DeclId, class_id: &str) -> bool {
        self.class_id_of(decl) == Some(class_id)
    }

    #[must_use]
    pub fn find_annotation<'a>(
        &self,
        annotations: &'a [Annotation],
        class_id: &str,
    ) -> Option<&'a Annotation> {
        annotations
            .iter()
            .find(|annotation| self.is_class(annotation.class, class_id))
    }

    #[must_use]
    pub fn has_annotation(&self, decl: DeclId, class_id: &str) -> bool {
        self.find_annotation(&self.decl(decl).annotations, class_id)
            .is_some()
    }

    /// Visibility once containers are taken into account.
    #[must_use]
    pub fn effective_visibility(&self, decl: DeclId) -> EffectiveVisibility {
        if self.is_local(decl) {
            return EffectiveVisibility::Local;
        }
        let mut result = self.own_effective_visibility(decl);
        let mut container_is_public = true;
        for ancestor in self.ancestors(decl) {
            if self.decl(ancestor).as_class().is_none() {
                continue;
            }
            let container = self.own_effective_visibility(ancestor);
            container_is_public &= container == EffectiveVisibility::Public;
            result = result.lower_bound(container);
        }
        if result == EffectiveVisibility::Protected && !container_is_public {
            result = EffectiveVisibility::ProtectedBound;
        }
        result
    }

    /// Effective visibility for inline-call purposes: `@PublishedApi internal`
    /// declarations count as public.
    #[must_use]
    pub fn published_api_effective_visibility(&self, decl: DeclId) -> Option<EffectiveVisibility> {
        let declaration = self.decl(decl);
        if declaration.visibility() != Visibility::Internal
            || !self.has_annotation(decl, class_ids::PUBLISHED_API)
        {
            return None;
        }
        let mut result = EffectiveVisibility::Public;
        for ancestor in self.ancestors(decl) {
            if self.decl(ancestor).as_class().is_some() {
                result = result.lower_bound(self.own_effective_visibility(ancestor));
            }
        }
        Some(result)
    }

    fn own_effective_visibility(&self, decl: DeclId) -> EffectiveVisibility {
        match self.decl(decl).visibility() {
            Visibility::Public => EffectiveVisibility::Public,
            Visibility::Protected => EffectiveVisibility::Protected,
            Visibility::Internal => EffectiveVisibility::Internal,
            Visibility::Private | Visibility::PrivateToThis => {
                if self.containing_class(decl).is_some() {
                    EffectiveVisibility::PrivateInClass
                } else {
                    EffectiveVisibility::PrivateInFile
                }
            }
            Visibility::Local => EffectiveVisibility::Local,
        }
    }

    /// Human-readable name of a declaration for diagnostic arguments.
    #[must_use]
    pub fn render_decl(&self, decl: DeclId) -> String {
        let declaration = self.decl(decl);
        match &declaration.kind {
            DeclKind::Constructor(_) => self
                .containing_class(decl)
                .map_or_else(|| "<init>".to_string(), |class| {
                    format!("constructor {}", self.decl(class).name)
                }),
            DeclKind::PropertyAccessor(accessor) => {
                let prefix = if accessor.is_getter { "get" } else { "set" };
                let property = declaration
                    .parent
                    .map_or("", |parent| self.decl(parent).name.as_str());
                format!("<{prefix}-{property}>")
            }
            _ => declaration.name.clone(),
        }
    }
}

fn validate(graph: &Graph) -> Result<(), GraphError> {
    let decl_count = graph.decls.len();
    let expr_count = graph.exprs.len();
    let check_decl = |owner: &str, id: DeclId| {
        if id.index() < decl_count {
            Ok(())
        } else {
            Err(GraphError::DanglingDeclaration {
                owner: owner.to_string(),
                missing: id,
            })
        }
    };
    let check_expr = |owner: &str, id: ExprId| {
        if id.index() < expr_count {
            Ok(())
        } else {
            Err(GraphError::DanglingExpression {
                owner: owner.to_string(),
                missing: id,
            })
        }
    };

    for &file in &graph.files {
        check_decl("file list", file)?;
        if graph.decls[file.index()].as_file().is_none() {
            return Err(GraphError::NotAFile(file));
        }
    }

    for decl in &graph.decls {
        let owner = decl.name.as_str();
        if let Some(parent) = decl.parent {
            check_decl(owner, parent)?;
        }
        for annotation in &decl.annotations {
            check_decl(owner, annotation.class)?;
        }
        for id in decl.type_parameters().iter().chain(decl.value_parameters()) {
            check_decl(owner, *id)?;
        }
        if let Some(body) = decl.body() {
            check_expr(owner, body)?;
        }
        match &decl.kind {
            DeclKind::File(file) => {
                for &member in &file.declarations {
                    check_decl(owner, member)?;
                }
            }
            DeclKind::Class(class) => {
                for &member in &class.members {
                    check_decl(owner, member)?;
                }
                for supertype in &class.supertypes {
                    if let Some(delegate) = supertype.delegate {
                        check_expr(owner, delegate)?;
                    }
                }
            }
            DeclKind::Property(property) => {
                for accessor in [property.getter, property.setter].into_iter().flatten() {
                    check_decl(owner, accessor)?;
                }
                for expr in [property.initializer, property.delegate]
                    .into_iter()
                    .flatten()
                {
                    check_expr(owner, expr)?;
                }
            }
            DeclKind::ValueParameter(parameter) => {
                if let Some(default) = parameter.default_value {
                    check_expr(owner, default)?;
                }
            }
            DeclKind::Constructor(constructor) => {
                if let Some(delegation) = &constructor.delegation {
                    if let Some(target) = delegation.target {
                        check_decl(owner, target)?;
                    }
                }
            }
            DeclKind::Function(_)
            | DeclKind::PropertyAccessor(_)
            | DeclKind::TypeAlias(_)
            | DeclKind::TypeParameter(_)
            | DeclKind::AnonymousInitializer(_) => {}
        }
    }

    for (index, expr) in graph.exprs.iter().enumerate() {
        let owner = format!("expr#{index}");
        for child in expr.kind.children() {
            check_expr(&owner, child)?;
        }
    }
    Ok(())
}
