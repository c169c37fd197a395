//! Programmatic construction of resolved graphs.
//!
//! `GraphBuilder` seeds a library file with the built-in classes the
//! checkers recognize (`Any`, `Unit`, function types, `@Suppress`, ...) and
//! offers small helpers for adding user declarations, types and
//! expressions. Every element created through the builder gets a distinct
//! real source span so diagnostics can be told apart in tests.
//!
//! ```ignore
//! let mut b = GraphBuilder::new();
//! let file = b.file("main.kt");
//! let base = b.class(file, "Base").modality(Modality::Open).id();
//! let unit = b.unit_type();
//! let run = b.function(base, "run", unit).modality(Modality::Open).id();
//! let session = b.finish(LanguageVersionSettings::default())?;
//! ```

use crate::annotations::{Annotation, ConstValue};
use crate::decl::{
    AccessorDecl, AnonymousInitializerDecl, ClassDecl, ClassKind, ConstructorDecl, DeclKind,
    DeclStatus, Declaration, DelegationCall, FileDecl, FunctionDecl, Modifiers, PropertyDecl,
    ResolvePhase, SupertypeEntry, TypeAliasDecl, TypeParameterDecl, ValueParameterDecl,
};
use crate::error::GraphError;
use crate::expr::{AccessKind, ExprKind, ExprParent, Expression, Resolution, Symbol};
use crate::ids::{ClassId, DeclId, ExprId, TypeId};
use crate::names::class_ids;
use crate::session::{Graph, Session};
use crate::types::{TypeAttributes, TypeData, TypeInterner, TypeProjection, TypeRef};
use crate::variance::{ProjectionKind, Variance};
use crate::visibility::{Modality, Visibility};
use kfir_common::{FakeSourceKind, LanguageVersionSettings, SourceElement};
use rustc_hash::FxHashMap;

const SPAN_LENGTH: u32 = 4;
const MAX_BUILTIN_FUNCTION_ARITY: usize = 3;

pub struct GraphBuilder {
    graph: Graph,
    classes: FxHashMap<String, DeclId>,
    next_offset: u32,
    library: DeclId,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// A builder whose graph already contains the built-in library.
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Self {
            graph: Graph::default(),
            classes: FxHashMap::default(),
            next_offset: 0,
            library: DeclId(0),
        };
        builder.library = builder.push_file("kotlin/builtins.kt", "kotlin", true);
        builder.seed_builtins();
        builder
    }

    fn seed_builtins(&mut self) {
        self.builtin_class(class_ids::ANY, ClassKind::Class, Modality::Open, &[]);
        self.builtin_class(class_ids::NOTHING, ClassKind::Class, Modality::Final, &[]);
        self.builtin_class(class_ids::UNIT, ClassKind::Object, Modality::Final, &[]);
        self.builtin_class(class_ids::NUMBER, ClassKind::Class, Modality::Abstract, &[]);
        for class_id in class_ids::PRIMITIVES
            .into_iter()
            .chain(class_ids::UNSIGNED)
            .chain([class_ids::STRING])
            .chain(class_ids::PRIMITIVE_ARRAYS)
            .chain(class_ids::UNSIGNED_ARRAYS)
        {
            self.builtin_class(class_id, ClassKind::Class, Modality::Final, &[]);
        }
        self.builtin_class(class_ids::ARRAY, ClassKind::Class, Modality::Final, &[("T", Variance::Invariant)]);
        self.builtin_class(class_ids::KCLASS, ClassKind::Interface, Modality::Abstract, &[("T", Variance::Invariant)]);
        self.builtin_class(class_ids::ENUM, ClassKind::Class, Modality::Abstract, &[("E", Variance::Invariant)]);
        self.builtin_class(class_ids::CLONEABLE, ClassKind::Interface, Modality::Abstract, &[]);
        let annotation = self.builtin_class(class_ids::ANNOTATION, ClassKind::Interface, Modality::Abstract, &[]);
        let annotation_type = self.class_type(annotation, &[]);

        for class_id in [
            class_ids::SUPPRESS,
            class_ids::TARGET,
            class_ids::RETENTION,
            class_ids::REPEATABLE,
            class_ids::DEPRECATED,
            class_ids::DEPRECATED_SINCE_KOTLIN,
            class_ids::UNSAFE_VARIANCE,
            class_ids::PUBLISHED_API,
            class_ids::JVM_INLINE,
            class_ids::INLINE_ONLY,
        ] {
            let class = self.builtin_class(class_id, ClassKind::AnnotationClass, Modality::Final, &[]);
            self.add_supertype(class, annotation_type);
        }

        for arity in 0..=MAX_BUILTIN_FUNCTION_ARITY {
            for prefix in [
                class_ids::FUNCTION_PREFIX,
                class_ids::SUSPEND_FUNCTION_PREFIX,
                class_ids::KFUNCTION_PREFIX,
            ] {
                self.builtin_function_class(prefix, arity);
            }
        }
    }

    fn builtin_function_class(&mut self, prefix: &str, arity: usize) -> DeclId {
        let mut parameters: Vec<(String, Variance)> =
            (1..=arity).map(|index| (format!("P{index}"), Variance::In)).collect();
        parameters.push(("R".to_string(), Variance::Out));
        let names: Vec<(&str, Variance)> = parameters
            .iter()
            .map(|(name, variance)| (name.as_str(), *variance))
            .collect();
        let class_id = format!("{prefix}{arity}");
        let class = self.builtin_class(&class_id, ClassKind::Interface, Modality::Abstract, &names);
        let type_parameters = self.graph.decls[class.index()].type_parameters().to_vec();
        let Some((&result, inputs)) = type_parameters.split_last() else {
            return class;
        };
        let result_type = self.type_parameter_type(result);
        let invoke = self
            .function(class, "invoke", result_type)
            .modality(Modality::Abstract)
            .modifiers(Modifiers::OPERATOR)
            .id();
        for (index, &input) in inputs.iter().enumerate() {
            let ty = self.type_parameter_type(input);
            self.value_parameter(invoke, &format!("p{}", index + 1), ty);
        }
        class
    }

    fn builtin_class(
        &mut self,
        class_id: &str,
        kind: ClassKind,
        modality: Modality,
        type_parameters: &[(&str, Variance)],
    ) -> DeclId {
        let name = ClassId::new(class_id).short_name().to_string();
        let library = self.library;
        let id = self.push_decl(
            name,
            Some(library),
            DeclKind::Class(ClassDecl {
                class_id: ClassId::new(class_id),
                class_kind: kind,
                is_local: false,
                type_parameters: Vec::new(),
                supertypes: Vec::new(),
                members: Vec::new(),
            }),
            Some(modality),
        );
        self.attach(library, id);
        self.classes.insert(class_id.to_string(), id);
        for &(name, variance) in type_parameters {
            self.type_parameter(id, name, variance);
        }
        id
    }

    fn fresh_source(&mut self) -> SourceElement {
        let start = self.next_offset;
        self.next_offset += SPAN_LENGTH + 1;
        SourceElement::real(start, SPAN_LENGTH)
    }

    fn push_decl(
        &mut self,
        name: impl Into<String>,
        parent: Option<DeclId>,
        kind: DeclKind,
        modality: Option<Modality>,
    ) -> DeclId {
        let id = DeclId(self.graph.decls.len() as u32);
        let source = self.fresh_source();
        self.graph.decls.push(Declaration {
            name: name.into(),
            source: Some(source),
            parent,
            annotations: Vec::new(),
            status: DeclStatus {
                visibility: Visibility::Public,
                modality,
                modifiers: Modifiers::empty(),
            },
            phase: ResolvePhase::BodyResolve,
            kind,
        });
        id
    }

    fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.graph.decls[id.index()]
    }

    /// Register `child` in the member list of a file or class.
    fn attach(&mut self, parent: DeclId, child: DeclId) {
        match &mut self.decl_mut(parent).kind {
            DeclKind::File(file) => file.declarations.push(child),
            DeclKind::Class(class) => class.members.push(child),
            _ => {}
        }
    }

    fn push_file(&mut self, path: &str, package: &str, is_library: bool) -> DeclId {
        let id = self.push_decl(
            path,
            None,
            DeclKind::File(FileDecl {
                path: path.to_string(),
                package: package.to_string(),
                module: if is_library { "stdlib" } else { "main" }.to_string(),
                declarations: Vec::new(),
                is_library,
            }),
            None,
        );
        self.graph.files.push(id);
        id
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// A source file in the root package.
    pub fn file(&mut self, path: &str) -> DeclId {
        self.push_file(path, "", false)
    }

    /// A source file in `package` (`/`-separated).
    pub fn file_in_package(&mut self, path: &str, package: &str) -> DeclId {
        self.push_file(path, package, false)
    }

    /// A library file; its declarations are resolved but never checked.
    pub fn library_file(&mut self, path: &str, package: &str) -> DeclId {
        self.push_file(path, package, true)
    }

    pub fn class(&mut self, parent: DeclId, name: &str) -> DeclBuilder<'_> {
        let (class_id, is_local) = self.class_id_for(parent, name);
        let id = self.push_decl(
            name,
            Some(parent),
            DeclKind::Class(ClassDecl {
                class_id: class_id.clone(),
                class_kind: ClassKind::Class,
                is_local,
                type_parameters: Vec::new(),
                supertypes: Vec::new(),
                members: Vec::new(),
            }),
            Some(Modality::Final),
        );
        self.attach(parent, id);
        if !is_local {
            self.classes.insert(class_id.0, id);
        }
        self.handle(id)
    }

    fn class_id_for(&self, parent: DeclId, name: &str) -> (ClassId, bool) {
        let owner = &self.graph.decls[parent.index()];
        match &owner.kind {
            DeclKind::File(file) if file.package.is_empty() => (ClassId::new(name), false),
            DeclKind::File(file) => (ClassId::new(format!("{}/{name}", file.package)), false),
            DeclKind::Class(class) => (
                ClassId::new(format!("{}.{name}", class.class_id)),
                class.is_local,
            ),
            _ => (
                ClassId::new(format!("<local>/{name}@{}", self.graph.decls.len())),
                true,
            ),
        }
    }

    pub fn function(&mut self, parent: DeclId, name: &str, return_type: TypeId) -> DeclBuilder<'_> {
        let source = self.fresh_source();
        let id = self.push_decl(
            name,
            Some(parent),
            DeclKind::Function(FunctionDecl {
                type_parameters: Vec::new(),
                receiver: None,
                value_parameters: Vec::new(),
                return_type: TypeRef::new(return_type, Some(source)),
                body: None,
                has_block_body: true,
            }),
            Some(Modality::Final),
        );
        self.attach(parent, id);
        self.handle(id)
    }

    /// A property with a default getter; `var` properties also get a default setter.
    pub fn property(&mut self, parent: DeclId, name: &str, ty: TypeId) -> DeclBuilder<'_> {
        let source = self.fresh_source();
        let id = self.push_decl(
            name,
            Some(parent),
            DeclKind::Property(PropertyDecl {
                type_parameters: Vec::new(),
                receiver: None,
                return_type: TypeRef::new(ty, Some(source)),
                initializer: None,
                delegate: None,
                getter: None,
                setter: None,
                has_backing_field: true,
                from_parameter: None,
            }),
            Some(Modality::Final),
        );
        self.attach(parent, id);
        self.default_accessor(id, true);
        self.handle(id)
    }

    fn property_type(&self, property: DeclId) -> TypeId {
        self.graph.decls[property.index()]
            .return_type_ref()
            .map_or(TypeInterner::ERROR, |type_ref| type_ref.ty)
    }

    fn default_accessor(&mut self, property: DeclId, is_getter: bool) -> DeclId {
        let property_source = self.graph.decls[property.index()].source;
        let fake = property_source
            .map(|source| source.with_fake_kind(FakeSourceKind::DefaultAccessor));
        let accessor = self.push_accessor(property, is_getter);
        self.decl_mut(accessor).source = fake;
        if let Some(parameter) = self.graph.decls[accessor.index()]
            .as_accessor()
            .and_then(|data| data.value_parameter)
        {
            self.decl_mut(parameter).source = fake;
        }
        accessor
    }

    fn push_accessor(&mut self, property: DeclId, is_getter: bool) -> DeclId {
        let property_type = self.property_type(property);
        let return_type = if is_getter {
            property_type
        } else {
            self.builtin(class_ids::UNIT)
        };
        let name = if is_getter { "<get>" } else { "<set>" };
        let modality = self.graph.decls[property.index()].modality();
        let visibility = self.graph.decls[property.index()].visibility();
        let accessor = self.push_decl(
            name,
            Some(property),
            DeclKind::PropertyAccessor(AccessorDecl {
                is_getter,
                return_type: TypeRef::implicit(return_type),
                value_parameter: None,
                body: None,
                has_block_body: false,
            }),
            modality,
        );
        self.decl_mut(accessor).status.visibility = visibility;
        if !is_getter {
            let parameter = self.push_decl(
                "value",
                Some(accessor),
                DeclKind::ValueParameter(ValueParameterDecl {
                    type_ref: TypeRef::implicit(property_type),
                    default_value: None,
                }),
                None,
            );
            if let DeclKind::PropertyAccessor(data) = &mut self.decl_mut(accessor).kind {
                data.value_parameter = Some(parameter);
            }
        }
        if let DeclKind::Property(data) = &mut self.decl_mut(property).kind {
            if is_getter {
                data.getter = Some(accessor);
            } else {
                data.setter = Some(accessor);
            }
        }
        accessor
    }

    /// Replace the default getter with a user-written one.
    pub fn getter(&mut self, property: DeclId) -> DeclBuilder<'_> {
        let accessor = self.push_accessor(property, true);
        self.handle(accessor)
    }

    /// Replace the default setter with a user-written one.
    pub fn setter(&mut self, property: DeclId) -> DeclBuilder<'_> {
        let accessor = self.push_accessor(property, false);
        self.handle(accessor)
    }

    /// Drop an accessor, e.g. for a `val` without a setter.
    pub fn remove_setter(&mut self, property: DeclId) {
        if let DeclKind::Property(data) = &mut self.decl_mut(property).kind {
            data.setter = None;
        }
    }

    pub fn type_parameter(&mut self, owner: DeclId, name: &str, variance: Variance) -> DeclBuilder<'_> {
        let index = self.graph.decls[owner.index()].type_parameters().len() as u32;
        let id = self.push_decl(
            name,
            Some(owner),
            DeclKind::TypeParameter(TypeParameterDecl {
                variance,
                bounds: Vec::new(),
                index,
            }),
            None,
        );
        match &mut self.decl_mut(owner).kind {
            DeclKind::Class(data) => data.type_parameters.push(id),
            DeclKind::Function(data) => data.type_parameters.push(id),
            DeclKind::Property(data) => data.type_parameters.push(id),
            DeclKind::TypeAlias(data) => data.type_parameters.push(id),
            _ => {}
        }
        self.handle(id)
    }

    pub fn value_parameter(&mut self, owner: DeclId, name: &str, ty: TypeId) -> DeclBuilder<'_> {
        let source = self.fresh_source();
        let id = self.push_decl(
            name,
            Some(owner),
            DeclKind::ValueParameter(ValueParameterDecl {
                type_ref: TypeRef::new(ty, Some(source)),
                default_value: None,
            }),
            None,
        );
        match &mut self.decl_mut(owner).kind {
            DeclKind::Function(data) => data.value_parameters.push(id),
            DeclKind::Constructor(data) => data.value_parameters.push(id),
            DeclKind::PropertyAccessor(data) => data.value_parameter = Some(id),
            _ => {}
        }
        self.handle(id)
    }

    pub fn constructor(&mut self, class: DeclId, is_primary: bool) -> DeclBuilder<'_> {
        let id = self.push_decl(
            "<init>",
            Some(class),
            DeclKind::Constructor(ConstructorDecl {
                is_primary,
                value_parameters: Vec::new(),
                delegation: None,
                body: None,
            }),
            Some(Modality::Final),
        );
        self.attach(class, id);
        self.handle(id)
    }

    /// `: this(...)` / `: super(...)` on a constructor.
    pub fn delegate_constructor(&mut self, constructor: DeclId, is_this: bool, target: Option<DeclId>) {
        let source = self.fresh_source();
        if let DeclKind::Constructor(data) = &mut self.decl_mut(constructor).kind {
            data.delegation = Some(DelegationCall {
                is_this,
                target,
                source: Some(source),
                arguments: Vec::new(),
            });
        }
    }

    pub fn type_alias(&mut self, parent: DeclId, name: &str, expanded: TypeId) -> DeclBuilder<'_> {
        let source = self.fresh_source();
        let id = self.push_decl(
            name,
            Some(parent),
            DeclKind::TypeAlias(TypeAliasDecl {
                type_parameters: Vec::new(),
                expanded: TypeRef::new(expanded, Some(source)),
            }),
            None,
        );
        self.attach(parent, id);
        self.handle(id)
    }

    /// Replace the expansion of an alias after its type parameters exist.
    pub fn set_alias_expansion(&mut self, alias: DeclId, expanded: TypeRef) {
        if let DeclKind::TypeAlias(data) = &mut self.decl_mut(alias).kind {
            data.expanded = expanded;
        }
    }

    pub fn anonymous_initializer(&mut self, class: DeclId) -> DeclBuilder<'_> {
        let id = self.push_decl(
            "<init-block>",
            Some(class),
            DeclKind::AnonymousInitializer(AnonymousInitializerDecl { body: None }),
            None,
        );
        self.attach(class, id);
        self.handle(id)
    }

    pub fn add_supertype(&mut self, class: DeclId, ty: TypeId) -> &mut Self {
        let source = self.fresh_source();
        self.add_supertype_ref(class, TypeRef::new(ty, Some(source)))
    }

    pub fn add_supertype_ref(&mut self, class: DeclId, type_ref: TypeRef) -> &mut Self {
        if let DeclKind::Class(data) = &mut self.decl_mut(class).kind {
            data.supertypes.push(SupertypeEntry {
                type_ref,
                delegate: None,
            });
        }
        self
    }

    pub fn handle(&mut self, id: DeclId) -> DeclBuilder<'_> {
        DeclBuilder { builder: self, id }
    }

    #[must_use]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.graph.decls[id.index()]
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn intern(&mut self, data: TypeData) -> TypeId {
        self.graph.types.intern(data)
    }

    #[must_use]
    pub fn class_decl(&self, class_id: &str) -> Option<DeclId> {
        self.classes.get(class_id).copied()
    }

    /// Non-null type of a built-in (or previously declared) class by id.
    pub fn builtin(&mut self, class_id: &str) -> TypeId {
        match self.class_decl(class_id) {
            Some(class) => self.class_type(class, &[]),
            None => TypeInterner::ERROR,
        }
    }

    pub fn unit_type(&mut self) -> TypeId {
        self.builtin(class_ids::UNIT)
    }

    pub fn int_type(&mut self) -> TypeId {
        self.builtin(class_ids::INT)
    }

    pub fn string_type(&mut self) -> TypeId {
        self.builtin(class_ids::STRING)
    }

    pub fn any_type(&mut self) -> TypeId {
        self.builtin(class_ids::ANY)
    }

    pub fn class_type(&mut self, class: DeclId, arguments: &[TypeId]) -> TypeId {
        self.intern(TypeData::class(
            class,
            arguments.iter().map(|&ty| TypeProjection::invariant(ty)),
        ))
    }

    pub fn projected_type(&mut self, class: DeclId, arguments: &[TypeProjection]) -> TypeId {
        self.intern(TypeData::class(class, arguments.iter().copied()))
    }

    pub fn type_parameter_type(&mut self, parameter: DeclId) -> TypeId {
        self.intern(TypeData::type_parameter(parameter))
    }

    pub fn nullable(&mut self, ty: TypeId) -> TypeId {
        let data = self.graph.types.lookup(ty).with_nullability(true);
        self.intern(data)
    }

    pub fn with_attributes(&mut self, ty: TypeId, attributes: TypeAttributes) -> TypeId {
        let data = self.graph.types.lookup(ty);
        let merged = data.attributes() | attributes;
        self.intern(data.with_attributes(merged))
    }

    /// `(A, B) -> R`, `suspend (A) -> R` or `KFunctionN` depending on `prefix`.
    pub fn function_type_with(&mut self, prefix: &str, parameters: &[TypeId], result: TypeId) -> TypeId {
        let class_id = format!("{prefix}{}", parameters.len());
        let Some(class) = self.class_decl(&class_id) else {
            return TypeInterner::ERROR;
        };
        let mut arguments = parameters.to_vec();
        arguments.push(result);
        self.class_type(class, &arguments)
    }

    pub fn function_type(&mut self, parameters: &[TypeId], result: TypeId) -> TypeId {
        self.function_type_with(class_ids::FUNCTION_PREFIX, parameters, result)
    }

    pub fn projection(kind: ProjectionKind, ty: TypeId) -> TypeProjection {
        match kind {
            ProjectionKind::Star => TypeProjection::Star,
            kind => TypeProjection::Type { kind, ty },
        }
    }

    /// A written type reference with a fresh real source.
    pub fn type_ref(&mut self, ty: TypeId) -> TypeRef {
        let source = self.fresh_source();
        TypeRef::new(ty, Some(source))
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    /// An application of the class `class_id` with a fresh source.
    pub fn annotation(&mut self, class_id: &str) -> Annotation {
        let class = self.class_decl(class_id).unwrap_or(self.library);
        self.annotation_of(class)
    }

    pub fn annotation_of(&mut self, class: DeclId) -> Annotation {
        let source = self.fresh_source();
        Annotation::new(class, Some(source))
    }

    /// `@Suppress("A", "B")`.
    pub fn suppress(&mut self, names: &[&str]) -> Annotation {
        let values = names
            .iter()
            .map(|name| ConstValue::String((*name).to_string()))
            .collect();
        self.annotation(class_ids::SUPPRESS)
            .with_argument("names", ConstValue::Array(values))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Add an expression and point its children back at it.
    pub fn expr(&mut self, kind: ExprKind, ty: TypeId) -> ExprId {
        let id = ExprId(self.graph.exprs.len() as u32);
        for child in kind.children() {
            if let Some(expr) = self.graph.exprs.get_mut(child.index()) {
                expr.parent = Some(ExprParent::Expr(id));
            }
        }
        let source = self.fresh_source();
        self.graph.exprs.push(Expression {
            kind,
            source: Some(source),
            ty,
            parent: None,
        });
        id
    }

    #[must_use]
    pub fn expression(&self, id: ExprId) -> &Expression {
        &self.graph.exprs[id.index()]
    }

    pub fn int_literal(&mut self, value: i64) -> ExprId {
        let ty = self.int_type();
        self.expr(ExprKind::Literal { value: ConstValue::Int(value) }, ty)
    }

    pub fn block(&mut self, statements: Vec<ExprId>) -> ExprId {
        let ty = match statements.last() {
            Some(&last) => self.graph.exprs[last.index()].ty,
            None => self.unit_type(),
        };
        self.expr(ExprKind::Block { statements }, ty)
    }

    /// Read of a declaration (`x`).
    pub fn read(&mut self, target: DeclId) -> ExprId {
        let name = self.graph.decls[target.index()].name.clone();
        let ty = self.graph.decls[target.index()]
            .return_type_ref()
            .map_or(TypeInterner::ERROR, |type_ref| type_ref.ty);
        self.expr(
            ExprKind::Name {
                name,
                resolved: Some(Resolution::new(Symbol::Decl(target), AccessKind::VariableAccess)),
            },
            ty,
        )
    }

    pub fn value_argument(&mut self, expression: ExprId) -> ExprId {
        let ty = self.graph.exprs[expression.index()].ty;
        self.expr(
            ExprKind::ValueArgument {
                name: None,
                expression,
                spread: false,
            },
            ty,
        )
    }

    /// `target(arguments...)`; each argument is wrapped and mapped to the
    /// parameter at the same position.
    pub fn call(&mut self, target: DeclId, arguments: &[ExprId]) -> ExprId {
        self.call_with(target, arguments, |resolution| resolution)
    }

    /// Like [`GraphBuilder::call`], with a hook to add receivers to the resolution.
    pub fn call_with(
        &mut self,
        target: DeclId,
        arguments: &[ExprId],
        customize: impl FnOnce(Resolution) -> Resolution,
    ) -> ExprId {
        let declaration = &self.graph.decls[target.index()];
        let name = declaration.name.clone();
        let parameters = declaration.value_parameters().to_vec();
        let is_constructor = declaration.as_constructor().is_some();
        let ty = match declaration.parent {
            Some(class) if is_constructor => self.class_type(class, &[]),
            _ => declaration
                .return_type_ref()
                .map_or(TypeInterner::ERROR, |type_ref| type_ref.ty),
        };
        let kind = if is_constructor {
            AccessKind::ConstructorCall
        } else {
            AccessKind::FunctionCall
        };
        let callee = self.expr(ExprKind::Name { name, resolved: None }, ty);
        let mut resolution = Resolution::new(Symbol::Decl(target), kind);
        let mut wrapped = Vec::with_capacity(arguments.len());
        for (index, &argument) in arguments.iter().enumerate() {
            let value = self.value_argument(argument);
            if let Some(&parameter) = parameters.get(index) {
                resolution = resolution.with_argument(value, parameter);
            }
            wrapped.push(value);
        }
        let resolution = customize(resolution);
        self.expr(
            ExprKind::Call {
                callee,
                arguments: wrapped,
                resolved: Some(resolution),
            },
            ty,
        )
    }

    /// A `return value` from `target`.
    pub fn return_expr(&mut self, value: Option<ExprId>, target: Option<DeclId>) -> ExprId {
        let ty = self.builtin(class_ids::NOTHING);
        self.expr(ExprKind::Return { value, target }, ty)
    }

    /// Attach `body` to a function, accessor, constructor or initializer.
    pub fn set_body(&mut self, decl: DeclId, body: ExprId) {
        match &mut self.decl_mut(decl).kind {
            DeclKind::Function(data) => data.body = Some(body),
            DeclKind::PropertyAccessor(data) => {
                data.body = Some(body);
                data.has_block_body = true;
            }
            DeclKind::Constructor(data) => data.body = Some(body),
            DeclKind::AnonymousInitializer(data) => data.body = Some(body),
            _ => return,
        }
        self.graph.exprs[body.index()].parent = Some(ExprParent::Decl(decl));
    }

    /// `fun f() = expr`.
    pub fn set_expression_body(&mut self, decl: DeclId, body: ExprId) {
        self.set_body(decl, body);
        match &mut self.decl_mut(decl).kind {
            DeclKind::Function(data) => data.has_block_body = false,
            DeclKind::PropertyAccessor(data) => data.has_block_body = false,
            _ => {}
        }
    }

    pub fn set_initializer(&mut self, property: DeclId, initializer: ExprId) {
        if let DeclKind::Property(data) = &mut self.decl_mut(property).kind {
            data.initializer = Some(initializer);
            self.graph.exprs[initializer.index()].parent = Some(ExprParent::Decl(property));
        }
    }

    pub fn set_delegate(&mut self, property: DeclId, delegate: ExprId) {
        if let DeclKind::Property(data) = &mut self.decl_mut(property).kind {
            data.delegate = Some(delegate);
            data.has_backing_field = false;
            self.graph.exprs[delegate.index()].parent = Some(ExprParent::Decl(property));
        }
    }

    pub fn set_default_value(&mut self, parameter: DeclId, value: ExprId) {
        if let DeclKind::ValueParameter(data) = &mut self.decl_mut(parameter).kind {
            data.default_value = Some(value);
            self.graph.exprs[value.index()].parent = Some(ExprParent::Decl(parameter));
        }
    }

    /// The graph built so far, without validation.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn finish(self, settings: LanguageVersionSettings) -> Result<Session, GraphError> {
        Session::new(self.graph, settings)
    }
}

/// Chainable edits of one declaration.
pub struct DeclBuilder<'b> {
    builder: &'b mut GraphBuilder,
    id: DeclId,
}

impl DeclBuilder<'_> {
    #[must_use]
    pub const fn id(&self) -> DeclId {
        self.id
    }

    fn decl(&mut self) -> &mut Declaration {
        self.builder.decl_mut(self.id)
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.decl().status.visibility = visibility;
        self.sync_accessors();
        self
    }

    #[must_use]
    pub fn modality(mut self, modality: Modality) -> Self {
        self.decl().status.modality = Some(modality);
        self.sync_accessors();
        self
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.decl().status.modifiers |= modifiers;
        if modifiers.contains(Modifiers::VAR) {
            let setter = self
                .builder
                .decl(self.id)
                .as_property()
                .map(|property| property.setter.is_none());
            if setter == Some(true) {
                self.builder.default_accessor(self.id, false);
            }
        }
        self
    }

    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.decl().annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn phase(mut self, phase: ResolvePhase) -> Self {
        self.decl().phase = phase;
        self
    }

    #[must_use]
    pub fn source(mut self, source: Option<SourceElement>) -> Self {
        self.decl().source = source;
        self
    }

    /// Mark the declaration as compiler-generated.
    #[must_use]
    pub fn fake(mut self, kind: FakeSourceKind) -> Self {
        let decl = self.decl();
        decl.source = decl.source.map(|source| source.with_fake_kind(kind));
        self
    }

    #[must_use]
    pub fn class_kind(mut self, kind: ClassKind) -> Self {
        let modality = match kind {
            ClassKind::Interface => Some(Modality::Abstract),
            ClassKind::EnumClass | ClassKind::EnumEntry | ClassKind::Object
            | ClassKind::AnonymousObject | ClassKind::AnnotationClass => Some(Modality::Final),
            ClassKind::Class => None,
        };
        let decl = self.decl();
        if let DeclKind::Class(data) = &mut decl.kind {
            data.class_kind = kind;
        }
        if let Some(modality) = modality {
            decl.status.modality = Some(modality);
        }
        self
    }

    /// Declared type of a property, parameter or function, with its accessors kept in sync.
    #[must_use]
    pub fn type_ref(mut self, type_ref: TypeRef) -> Self {
        let ty = type_ref.ty;
        match &mut self.decl().kind {
            DeclKind::Function(data) => data.return_type = type_ref,
            DeclKind::Property(data) => data.return_type = type_ref,
            DeclKind::PropertyAccessor(data) => data.return_type = type_ref,
            DeclKind::ValueParameter(data) => data.type_ref = type_ref,
            _ => {}
        }
        let accessors = self
            .builder
            .decl(self.id)
            .as_property()
            .map(|property| (property.getter, property.setter));
        if let Some((getter, setter)) = accessors {
            if let Some(getter) = getter {
                if let DeclKind::PropertyAccessor(data) = &mut self.builder.decl_mut(getter).kind {
                    data.return_type.ty = ty;
                }
            }
            let parameter = setter.and_then(|setter| {
                self.builder.decl(setter).as_accessor().and_then(|data| data.value_parameter)
            });
            if let Some(parameter) = parameter {
                if let DeclKind::ValueParameter(data) = &mut self.builder.decl_mut(parameter).kind {
                    data.type_ref.ty = ty;
                }
            }
        }
        self
    }

    /// An inferred (implicit) declared type.
    #[must_use]
    pub fn implicit_type(self) -> Self {
        let ty = self
            .builder
            .decl(self.id)
            .return_type_ref()
            .map_or(TypeInterner::ERROR, |type_ref| type_ref.ty);
        let source = self
            .builder
            .decl(self.id)
            .source
            .map(|source| source.with_fake_kind(FakeSourceKind::ImplicitType));
        self.type_ref(TypeRef::new(ty, source))
    }

    #[must_use]
    pub fn receiver(mut self, ty: TypeId) -> Self {
        let type_ref = self.builder.type_ref(ty);
        match &mut self.decl().kind {
            DeclKind::Function(data) => data.receiver = Some(type_ref),
            DeclKind::Property(data) => data.receiver = Some(type_ref),
            _ => {}
        }
        self
    }

    #[must_use]
    pub fn bound(mut self, ty: TypeId) -> Self {
        let type_ref = self.builder.type_ref(ty);
        if let DeclKind::TypeParameter(data) = &mut self.decl().kind {
            data.bounds.push(type_ref);
        }
        self
    }

    #[must_use]
    pub fn local(mut self) -> Self {
        if let DeclKind::Class(data) = &mut self.decl().kind {
            data.is_local = true;
        }
        self
    }

    /// Property declared by a primary constructor parameter.
    #[must_use]
    pub fn from_parameter(mut self, parameter: DeclId) -> Self {
        if let DeclKind::Property(data) = &mut self.decl().kind {
            data.from_parameter = Some(parameter);
        }
        self.fake(FakeSourceKind::PropertyFromParameter)
    }

    #[must_use]
    pub fn without_backing_field(mut self) -> Self {
        if let DeclKind::Property(data) = &mut self.decl().kind {
            data.has_backing_field = false;
        }
        self
    }

    fn sync_accessors(&mut self) {
        let status = self.builder.decl(self.id).status;
        let accessors = self
            .builder
            .decl(self.id)
            .as_property()
            .map(|property| [property.getter, property.setter]);
        for accessor in accessors.into_iter().flatten().flatten() {
            let accessor = self.builder.decl_mut(accessor);
            accessor.status.visibility = status.visibility;
            accessor.status.modality = status.modality;
        }
    }
}
