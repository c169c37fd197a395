//! Expression nodes.
//!
//! Expressions keep the syntactic shape the usage classifier needs
//! (parentheses, labels, value-argument wrappers, `when` entries) together
//! with the resolution results the inline checker needs (resolved targets,
//! receivers, argument-to-parameter mapping).

use crate::annotations::{Annotation, ConstValue};
use crate::ids::{DeclId, ExprId, TypeId};
use crate::types::TypeRef;
use kfir_common::SourceElement;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// What a name or call resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// A declaration in the graph (function, property, parameter, constructor, class).
    Decl(DeclId),
    /// A local variable introduced by a `LocalVariable` expression.
    Local(ExprId),
    /// `invoke` of a built-in function type.
    FunctionInvoke { function_type: TypeId },
}

/// Shape of a resolved reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessKind {
    /// Plain read of a variable or property (`x`, `a.x`).
    VariableAccess,
    /// Named function call (`f()`).
    FunctionCall,
    /// Call of a value of function type (`x()` where `x: () -> Unit`).
    VariableInvoke,
    ConstructorCall,
    /// Reference to a class or object by name.
    Qualifier,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentMapping {
    /// The `ValueArgument` (or lambda) expression.
    pub argument: ExprId,
    pub parameter: DeclId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub target: Symbol,
    pub kind: AccessKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_receiver: Option<ExprId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_receiver: Option<ExprId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub argument_mapping: Vec<ArgumentMapping>,
}

impl Resolution {
    #[must_use]
    pub const fn new(target: Symbol, kind: AccessKind) -> Self {
        Self {
            target,
            kind,
            dispatch_receiver: None,
            extension_receiver: None,
            argument_mapping: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_dispatch_receiver(mut self, receiver: ExprId) -> Self {
        self.dispatch_receiver = Some(receiver);
        self
    }

    #[must_use]
    pub const fn with_extension_receiver(mut self, receiver: ExprId) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    #[must_use]
    pub fn with_argument(mut self, argument: ExprId, parameter: DeclId) -> Self {
        self.argument_mapping.push(ArgumentMapping {
            argument,
            parameter,
        });
        self
    }

    #[must_use]
    pub const fn target_decl(&self) -> Option<DeclId> {
        match self.target {
            Symbol::Decl(decl) => Some(decl),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Block {
        statements: Vec<ExprId>,
    },
    /// Simple name: variable read, or the callee of a call.
    Name {
        name: String,
        resolved: Option<Resolution>,
    },
    /// `receiver.selector` or `receiver?.selector`.
    Qualified {
        receiver: ExprId,
        selector: ExprId,
        safe: bool,
    },
    Call {
        callee: ExprId,
        /// `ValueArgument` wrappers and trailing lambdas.
        arguments: Vec<ExprId>,
        resolved: Option<Resolution>,
    },
    ValueArgument {
        name: Option<String>,
        expression: ExprId,
        spread: bool,
    },
    /// Syntactic holder of an `if` branch or loop body.
    Container {
        inner: ExprId,
    },
    If {
        condition: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    },
    When {
        subject: Option<ExprId>,
        entries: Vec<ExprId>,
    },
    WhenEntry {
        conditions: Vec<ExprId>,
        body: ExprId,
        is_else: bool,
    },
    WhenCondition {
        expression: ExprId,
    },
    Try {
        body: ExprId,
        catches: Vec<ExprId>,
        finally: Option<ExprId>,
    },
    Catch {
        parameter: String,
        body: ExprId,
    },
    Finally {
        body: ExprId,
    },
    Throw {
        value: ExprId,
    },
    Return {
        value: Option<ExprId>,
        /// Function or lambda returned from.
        target: Option<DeclId>,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    While {
        condition: ExprId,
        body: ExprId,
    },
    DoWhile {
        body: ExprId,
        condition: ExprId,
    },
    For {
        variable: String,
        range: ExprId,
        body: ExprId,
    },
    /// The operator token of a binary or unary expression.
    OperationReference {
        token: String,
    },
    Binary {
        operation: ExprId,
        left: ExprId,
        right: ExprId,
    },
    /// `left as Type`, `left as? Type`.
    TypeCast {
        left: ExprId,
        type_ref: TypeRef,
        safe: bool,
    },
    Is {
        left: ExprId,
        type_ref: TypeRef,
        negated: bool,
    },
    Unary {
        operation: ExprId,
        base: ExprId,
        prefix: bool,
    },
    Assignment {
        target: ExprId,
        value: ExprId,
        /// Property or local written to.
        resolved: Option<Resolution>,
    },
    /// Lambda literal; `return_type` is the inferred return type of its body.
    Lambda {
        parameters: Vec<String>,
        body: ExprId,
        return_type: TypeId,
    },
    Parenthesized {
        inner: ExprId,
    },
    Labeled {
        label: String,
        base: ExprId,
    },
    Annotated {
        annotations: Vec<Annotation>,
        base: ExprId,
    },
    /// `lhs::callee` or `lhs::class`.
    CallableReference {
        lhs: Option<ExprId>,
        callee: ExprId,
    },
    ArrayAccess {
        array: ExprId,
        indices: Vec<ExprId>,
    },
    CollectionLiteral {
        elements: Vec<ExprId>,
    },
    LocalVariable {
        name: String,
        is_var: bool,
        type_ref: Option<TypeRef>,
        initializer: Option<ExprId>,
    },
    Destructuring {
        entries: Vec<String>,
        initializer: ExprId,
    },
    /// Local class, object or function declared as a statement.
    LocalDeclaration {
        declaration: DeclId,
    },
    This {
        label: Option<String>,
    },
    /// `super` or `super<T>`; `class` is the class whose member is referenced.
    Super {
        class: Option<DeclId>,
    },
    ObjectLiteral {
        class: DeclId,
    },
    Literal {
        value: ConstValue,
    },
    StringTemplate {
        entries: Vec<ExprId>,
    },
    StringTemplateEntry {
        expression: Option<ExprId>,
    },
}

/// Payload-free discriminant of [`ExprKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExprKindTag {
    Block,
    Name,
    Qualified,
    Call,
    ValueArgument,
    Container,
    If,
    When,
    WhenEntry,
    WhenCondition,
    Try,
    Catch,
    Finally,
    Throw,
    Return,
    Break,
    Continue,
    While,
    DoWhile,
    For,
    OperationReference,
    Binary,
    TypeCast,
    Is,
    Unary,
    Assignment,
    Lambda,
    Parenthesized,
    Labeled,
    Annotated,
    CallableReference,
    ArrayAccess,
    CollectionLiteral,
    LocalVariable,
    Destructuring,
    LocalDeclaration,
    This,
    Super,
    ObjectLiteral,
    Literal,
    StringTemplate,
    StringTemplateEntry,
}

impl ExprKind {
    #[must_use]
    pub const fn tag(&self) -> ExprKindTag {
        match self {
            Self::Block { .. } => ExprKindTag::Block,
            Self::Name { .. } => ExprKindTag::Name,
            Self::Qualified { .. } => ExprKindTag::Qualified,
            Self::Call { .. } => ExprKindTag::Call,
            Self::ValueArgument { .. } => ExprKindTag::ValueArgument,
            Self::Container { .. } => ExprKindTag::Container,
            Self::If { .. } => ExprKindTag::If,
            Self::When { .. } => ExprKindTag::When,
            Self::WhenEntry { .. } => ExprKindTag::WhenEntry,
            Self::WhenCondition { .. } => ExprKindTag::WhenCondition,
            Self::Try { .. } => ExprKindTag::Try,
            Self::Catch { .. } => ExprKindTag::Catch,
            Self::Finally { .. } => ExprKindTag::Finally,
            Self::Throw { .. } => ExprKindTag::Throw,
            Self::Return { .. } => ExprKindTag::Return,
            Self::Break { .. } => ExprKindTag::Break,
            Self::Continue { .. } => ExprKindTag::Continue,
            Self::While { .. } => ExprKindTag::While,
            Self::DoWhile { .. } => ExprKindTag::DoWhile,
            Self::For { .. } => ExprKindTag::For,
            Self::OperationReference { .. } => ExprKindTag::OperationReference,
            Self::Binary { .. } => ExprKindTag::Binary,
            Self::TypeCast { .. } => ExprKindTag::TypeCast,
            Self::Is { .. } => ExprKindTag::Is,
            Self::Unary { .. } => ExprKindTag::Unary,
            Self::Assignment { .. } => ExprKindTag::Assignment,
            Self::Lambda { .. } => ExprKindTag::Lambda,
            Self::Parenthesized { .. } => ExprKindTag::Parenthesized,
            Self::Labeled { .. } => ExprKindTag::Labeled,
            Self::Annotated { .. } => ExprKindTag::Annotated,
            Self::CallableReference { .. } => ExprKindTag::CallableReference,
            Self::ArrayAccess { .. } => ExprKindTag::ArrayAccess,
            Self::CollectionLiteral { .. } => ExprKindTag::CollectionLiteral,
            Self::LocalVariable { .. } => ExprKindTag::LocalVariable,
            Self::Destructuring { .. } => ExprKindTag::Destructuring,
            Self::LocalDeclaration { .. } => ExprKindTag::LocalDeclaration,
            Self::This { .. } => ExprKindTag::This,
            Self::Super { .. } => ExprKindTag::Super,
            Self::ObjectLiteral { .. } => ExprKindTag::ObjectLiteral,
            Self::Literal { .. } => ExprKindTag::Literal,
            Self::StringTemplate { .. } => ExprKindTag::StringTemplate,
            Self::StringTemplateEntry { .. } => ExprKindTag::StringTemplateEntry,
        }
    }

    /// Direct expression children in source order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprId; 4]> {
        let mut out = SmallVec::new();
        match self {
            Self::Block { statements } => out.extend(statements.iter().copied()),
            Self::Name { .. }
            | Self::OperationReference { .. }
            | Self::Break { .. }
            | Self::Continue { .. }
            | Self::LocalDeclaration { .. }
            | Self::This { .. }
            | Self::Super { .. }
            | Self::ObjectLiteral { .. }
            | Self::Literal { .. } => {}
            Self::Qualified {
                receiver, selector, ..
            } => out.extend([*receiver, *selector]),
            Self::Call {
                callee, arguments, ..
            } => {
                out.push(*callee);
                out.extend(arguments.iter().copied());
            }
            Self::ValueArgument { expression, .. } => out.push(*expression),
            Self::Container { inner } | Self::Parenthesized { inner } => out.push(*inner),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.extend([*condition, *then_branch]);
                out.extend(*else_branch);
            }
            Self::When { subject, entries } => {
                out.extend(*subject);
                out.extend(entries.iter().copied());
            }
            Self::WhenEntry {
                conditions, body, ..
            } => {
                out.extend(conditions.iter().copied());
                out.push(*body);
            }
            Self::WhenCondition { expression } => out.push(*expression),
            Self::Try {
                body,
                catches,
                finally,
            } => {
                out.push(*body);
                out.extend(catches.iter().copied());
                out.extend(*finally);
            }
            Self::Catch { body, .. } | Self::Finally { body } => out.push(*body),
            Self::Throw { value } => out.push(*value),
            Self::Return { value, .. } => out.extend(*value),
            Self::While { condition, body } => out.extend([*condition, *body]),
            Self::DoWhile { body, condition } => out.extend([*body, *condition]),
            Self::For { range, body, .. } => out.extend([*range, *body]),
            Self::Binary {
                operation,
                left,
                right,
            } => out.extend([*left, *operation, *right]),
            Self::TypeCast { left, .. } | Self::Is { left, .. } => out.push(*left),
            Self::Unary {
                operation,
                base,
                prefix,
            } => {
                if *prefix {
                    out.extend([*operation, *base]);
                } else {
                    out.extend([*base, *operation]);
                }
            }
            Self::Assignment { target, value, .. } => out.extend([*target, *value]),
            Self::Lambda { body, .. } => out.push(*body),
            Self::Labeled { base, .. } | Self::Annotated { base, .. } => out.push(*base),
            Self::CallableReference { lhs, callee } => {
                out.extend(*lhs);
                out.push(*callee);
            }
            Self::ArrayAccess { array, indices } => {
                out.push(*array);
                out.extend(indices.iter().copied());
            }
            Self::CollectionLiteral { elements } => out.extend(elements.iter().copied()),
            Self::LocalVariable { initializer, .. } => out.extend(*initializer),
            Self::Destructuring { initializer, .. } => out.push(*initializer),
            Self::StringTemplate { entries } => out.extend(entries.iter().copied()),
            Self::StringTemplateEntry { expression } => out.extend(*expression),
        }
        out
    }

    /// Resolution attached to a name, call or assignment.
    #[must_use]
    pub const fn resolution(&self) -> Option<&Resolution> {
        match self {
            Self::Name { resolved, .. }
            | Self::Call { resolved, .. }
            | Self::Assignment { resolved, .. } => resolved.as_ref(),
            _ => None,
        }
    }
}

/// The syntactic owner of an expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprParent {
    Expr(ExprId),
    Decl(DeclId),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExprKind,
    pub source: Option<SourceElement>,
    /// Resolved type of the expression's value.
    pub ty: TypeId,
    pub parent: Option<ExprParent>,
}
