//! Every diagnostic the checkers report, grouped by rule family.

use super::factory::{DeprecationDiagnosticFactory, DiagnosticFactory, Member};
use kfir_common::LanguageFeature;
use kfir_tree::{ClassKind, DeclId, TypeId, UseSiteTarget, Variance, Visibility};

type Factory0 = DiagnosticFactory<()>;
type Factory1<A> = DiagnosticFactory<(A,)>;
type Factory2<A, B> = DiagnosticFactory<(A, B)>;
type Factory3<A, B, C> = DiagnosticFactory<(A, B, C)>;
type Factory4<A, B, C, D> = DiagnosticFactory<(A, B, C, D)>;

// =============================================================================
// Overrides
// =============================================================================

pub const NOTHING_TO_OVERRIDE: Factory1<Member> =
    DiagnosticFactory::error("NOTHING_TO_OVERRIDE", "'{0}' overrides nothing");
pub const CANNOT_OVERRIDE_INVISIBLE_MEMBER: Factory2<Member, Member> = DiagnosticFactory::error(
    "CANNOT_OVERRIDE_INVISIBLE_MEMBER",
    "'{0}' has no access to '{1}', so it cannot override it",
);
pub const VIRTUAL_MEMBER_HIDDEN: Factory2<Member, DeclId> = DiagnosticFactory::error(
    "VIRTUAL_MEMBER_HIDDEN",
    "'{0}' hides member of supertype '{1}' and needs 'override' modifier",
);
pub const DATA_CLASS_OVERRIDE_CONFLICT: Factory2<Member, Member> = DiagnosticFactory::error(
    "DATA_CLASS_OVERRIDE_CONFLICT",
    "Function '{0}' generated for the data class conflicts with member of supertype '{1}'",
);
pub const OVERRIDING_FINAL_MEMBER: Factory2<Member, DeclId> = DiagnosticFactory::error(
    "OVERRIDING_FINAL_MEMBER",
    "'{0}' in '{1}' is final and cannot be overridden",
);
pub const VAR_OVERRIDDEN_BY_VAL: Factory2<Member, Member> = DiagnosticFactory::error(
    "VAR_OVERRIDDEN_BY_VAL",
    "Var-property '{1}' cannot be overridden by val-property '{0}'",
);
pub const CANNOT_WEAKEN_ACCESS_PRIVILEGE: Factory3<Visibility, Member, DeclId> =
    DiagnosticFactory::error(
        "CANNOT_WEAKEN_ACCESS_PRIVILEGE",
        "Cannot weaken access privilege '{0}' for '{1}' in '{2}'",
    );
pub const CANNOT_CHANGE_ACCESS_PRIVILEGE: Factory3<Visibility, Member, DeclId> =
    DiagnosticFactory::error(
        "CANNOT_CHANGE_ACCESS_PRIVILEGE",
        "Cannot change access privilege '{0}' for '{1}' in '{2}'",
    );
pub const RETURN_TYPE_MISMATCH_ON_OVERRIDE: Factory2<Member, Member> = DiagnosticFactory::error(
    "RETURN_TYPE_MISMATCH_ON_OVERRIDE",
    "Return type of '{0}' is not a subtype of the return type of the overridden member '{1}'",
);
pub const PROPERTY_TYPE_MISMATCH_ON_OVERRIDE: Factory2<Member, Member> = DiagnosticFactory::error(
    "PROPERTY_TYPE_MISMATCH_ON_OVERRIDE",
    "Type of '{0}' is not a subtype of the overridden property '{1}'",
);
pub const VAR_TYPE_MISMATCH_ON_OVERRIDE: Factory2<Member, Member> = DiagnosticFactory::error(
    "VAR_TYPE_MISMATCH_ON_OVERRIDE",
    "Type of '{0}' doesn't match the type of the overridden var-property '{1}'",
);
pub const OVERRIDE_DEPRECATION: Factory2<Member, String> = DiagnosticFactory::warning(
    "OVERRIDE_DEPRECATION",
    "This declaration overrides deprecated member '{0}' but is not deprecated itself: {1}",
);

// =============================================================================
// Variance and projections
// =============================================================================

pub const TYPE_VARIANCE_CONFLICT_ERROR: Factory4<DeclId, Variance, Variance, TypeId> =
    DiagnosticFactory::error(
        "TYPE_VARIANCE_CONFLICT_ERROR",
        "Type parameter {0} is declared as '{1}' but occurs in '{2}' position in type {3}",
    );
pub const TYPE_VARIANCE_CONFLICT_IN_EXPANDED_TYPE: Factory4<DeclId, Variance, Variance, TypeId> =
    DiagnosticFactory::error(
        "TYPE_VARIANCE_CONFLICT_IN_EXPANDED_TYPE",
        "Type parameter {0} is declared as '{1}' but occurs in '{2}' position in abbreviated type {3}",
    );
pub const CONFLICTING_PROJECTION: Factory1<TypeId> = DiagnosticFactory::error(
    "CONFLICTING_PROJECTION",
    "Projection is conflicting with variance of the corresponding type parameter of '{0}'. Remove the projection or replace it with '*'",
);
pub const CONFLICTING_PROJECTION_IN_TYPEALIAS_EXPANSION: Factory1<TypeId> =
    DiagnosticFactory::error(
        "CONFLICTING_PROJECTION_IN_TYPEALIAS_EXPANSION",
        "Projection is conflicting with variance of the corresponding type parameter of '{0}' in the expanded type",
    );
pub const REDUNDANT_PROJECTION: Factory1<TypeId> = DiagnosticFactory::warning(
    "REDUNDANT_PROJECTION",
    "Projection is redundant: the corresponding type parameter of '{0}' has the same variance",
);

// =============================================================================
// Annotation classes
// =============================================================================

pub const LOCAL_ANNOTATION_CLASS_ERROR: Factory0 =
    DiagnosticFactory::error("LOCAL_ANNOTATION_CLASS_ERROR", "Annotation class cannot be local");
pub const SUPERTYPES_FOR_ANNOTATION_CLASS: Factory0 = DiagnosticFactory::error(
    "SUPERTYPES_FOR_ANNOTATION_CLASS",
    "Annotation class cannot have supertypes",
);
pub const ANNOTATION_CLASS_MEMBER: Factory0 = DiagnosticFactory::error(
    "ANNOTATION_CLASS_MEMBER",
    "Members are prohibited in annotation classes",
);
pub const MISSING_VAL_ON_ANNOTATION_PARAMETER: Factory0 = DiagnosticFactory::error(
    "MISSING_VAL_ON_ANNOTATION_PARAMETER",
    "'val' keyword is missing on annotation parameter",
);
pub const VAR_ANNOTATION_PARAMETER: Factory0 = DiagnosticFactory::error(
    "VAR_ANNOTATION_PARAMETER",
    "An annotation parameter cannot be 'var'",
);
pub const NULLABLE_TYPE_OF_ANNOTATION_MEMBER: Factory0 = DiagnosticFactory::error(
    "NULLABLE_TYPE_OF_ANNOTATION_MEMBER",
    "An annotation parameter cannot be nullable",
);
pub const INVALID_TYPE_OF_ANNOTATION_MEMBER: Factory0 = DiagnosticFactory::error(
    "INVALID_TYPE_OF_ANNOTATION_MEMBER",
    "Invalid type of annotation member",
);
pub static RESTRICTED_RETENTION_FOR_EXPRESSION_ANNOTATION: DeprecationDiagnosticFactory<()> =
    DeprecationDiagnosticFactory::new(
        LanguageFeature::RestrictRetentionForExpressionAnnotations,
        DiagnosticFactory::warning(
            "RESTRICTED_RETENTION_FOR_EXPRESSION_ANNOTATION_WARNING",
            "Expression annotations with retention other than SOURCE are deprecated",
        ),
        DiagnosticFactory::error(
            "RESTRICTED_RETENTION_FOR_EXPRESSION_ANNOTATION",
            "Expression annotations with retention other than SOURCE are prohibited",
        ),
    );
pub const CYCLE_IN_ANNOTATION_PARAMETER: Factory0 = DiagnosticFactory::error(
    "CYCLE_IN_ANNOTATION_PARAMETER",
    "Type of this parameter is cyclic",
);

// =============================================================================
// Annotation applications
// =============================================================================

pub const WRONG_ANNOTATION_TARGET: Factory1<&'static str> = DiagnosticFactory::error(
    "WRONG_ANNOTATION_TARGET",
    "This annotation is not applicable to target '{0}'",
);
pub const WRONG_ANNOTATION_TARGET_WITH_USE_SITE_TARGET: Factory2<&'static str, UseSiteTarget> =
    DiagnosticFactory::error(
        "WRONG_ANNOTATION_TARGET_WITH_USE_SITE_TARGET",
        "This annotation is not applicable to target '{0}' and use site target '@{1}'",
    );
pub const INAPPLICABLE_TARGET_ON_PROPERTY: Factory1<UseSiteTarget> = DiagnosticFactory::error(
    "INAPPLICABLE_TARGET_ON_PROPERTY",
    "'@{0}:' annotations could be applied only to property declarations",
);
pub const INAPPLICABLE_TARGET_PROPERTY_IMMUTABLE: Factory1<UseSiteTarget> =
    DiagnosticFactory::error(
        "INAPPLICABLE_TARGET_PROPERTY_IMMUTABLE",
        "'@{0}:' annotations could be applied only to mutable properties",
    );
pub const INAPPLICABLE_TARGET_PROPERTY_HAS_NO_DELEGATE: Factory0 = DiagnosticFactory::error(
    "INAPPLICABLE_TARGET_PROPERTY_HAS_NO_DELEGATE",
    "'@delegate:' annotations could be applied only to delegated properties",
);
pub const INAPPLICABLE_PARAM_TARGET: Factory0 = DiagnosticFactory::error(
    "INAPPLICABLE_PARAM_TARGET",
    "'@param:' annotations could be applied only to primary constructor parameters",
);
pub const INAPPLICABLE_FILE_TARGET: Factory0 = DiagnosticFactory::error(
    "INAPPLICABLE_FILE_TARGET",
    "'@file:' annotations can only be applied before package declaration",
);
pub const REDUNDANT_ANNOTATION_TARGET: Factory1<UseSiteTarget> = DiagnosticFactory::warning(
    "REDUNDANT_ANNOTATION_TARGET",
    "Redundant annotation target '{0}'",
);
pub const REPEATED_ANNOTATION: Factory0 =
    DiagnosticFactory::error("REPEATED_ANNOTATION", "This annotation is not repeatable");
pub static REPEATED_USE_SITE_TARGET_ANNOTATION: DeprecationDiagnosticFactory<()> =
    DeprecationDiagnosticFactory::new(
        LanguageFeature::ProhibitRepeatedUseSiteTargetAnnotations,
        DiagnosticFactory::warning(
            "REPEATED_ANNOTATION_WARNING",
            "This annotation is not repeatable",
        ),
        DiagnosticFactory::error("REPEATED_ANNOTATION", "This annotation is not repeatable"),
    );

// =============================================================================
// Value classes
// =============================================================================

pub const VALUE_CLASS_NOT_TOP_LEVEL: Factory0 = DiagnosticFactory::error(
    "VALUE_CLASS_NOT_TOP_LEVEL",
    "Value classes cannot be local or inner",
);
pub const VALUE_CLASS_NOT_FINAL: Factory0 =
    DiagnosticFactory::error("VALUE_CLASS_NOT_FINAL", "Value classes can be only final");
pub const VALUE_CLASS_CANNOT_EXTEND_CLASSES: Factory0 = DiagnosticFactory::error(
    "VALUE_CLASS_CANNOT_EXTEND_CLASSES",
    "Value class cannot extend classes",
);
pub const VALUE_CLASS_CANNOT_BE_CLONEABLE: Factory0 = DiagnosticFactory::error(
    "VALUE_CLASS_CANNOT_BE_CLONEABLE",
    "Value class cannot be Cloneable",
);
pub const SECONDARY_CONSTRUCTOR_WITH_BODY_INSIDE_VALUE_CLASS: Factory0 = DiagnosticFactory::error(
    "SECONDARY_CONSTRUCTOR_WITH_BODY_INSIDE_VALUE_CLASS",
    "Secondary constructors with bodies are reserved for future releases",
);
pub const INNER_CLASS_INSIDE_VALUE_CLASS: Factory0 = DiagnosticFactory::error(
    "INNER_CLASS_INSIDE_VALUE_CLASS",
    "Value class cannot have inner classes",
);
pub const RESERVED_MEMBER_INSIDE_VALUE_CLASS: Factory1<String> = DiagnosticFactory::error(
    "RESERVED_MEMBER_INSIDE_VALUE_CLASS",
    "Member with the name '{0}' is reserved for future releases",
);
pub const DELEGATED_PROPERTY_INSIDE_VALUE_CLASS: Factory0 = DiagnosticFactory::error(
    "DELEGATED_PROPERTY_INSIDE_VALUE_CLASS",
    "Value class cannot have delegated properties",
);
pub const PROPERTY_WITH_BACKING_FIELD_INSIDE_VALUE_CLASS: Factory0 = DiagnosticFactory::error(
    "PROPERTY_WITH_BACKING_FIELD_INSIDE_VALUE_CLASS",
    "Value class cannot have properties with backing fields",
);
pub const ABSENCE_OF_PRIMARY_CONSTRUCTOR_FOR_VALUE_CLASS: Factory0 = DiagnosticFactory::error(
    "ABSENCE_OF_PRIMARY_CONSTRUCTOR_FOR_VALUE_CLASS",
    "Primary constructor is required for value class",
);
pub const VALUE_CLASS_EMPTY_CONSTRUCTOR: Factory0 = DiagnosticFactory::error(
    "VALUE_CLASS_EMPTY_CONSTRUCTOR",
    "Value class must have at least one primary constructor parameter",
);
pub const INLINE_CLASS_CONSTRUCTOR_WRONG_PARAMETERS_SIZE: Factory0 = DiagnosticFactory::error(
    "INLINE_CLASS_CONSTRUCTOR_WRONG_PARAMETERS_SIZE",
    "Inline class must have exactly one primary constructor parameter",
);
pub const VALUE_CLASS_CONSTRUCTOR_NOT_FINAL_READ_ONLY_PARAMETER: Factory0 =
    DiagnosticFactory::error(
        "VALUE_CLASS_CONSTRUCTOR_NOT_FINAL_READ_ONLY_PARAMETER",
        "Value class primary constructor must only have final read-only (val) property parameter",
    );
pub const VALUE_CLASS_HAS_INAPPLICABLE_PARAMETER_TYPE: Factory1<TypeId> = DiagnosticFactory::error(
    "VALUE_CLASS_HAS_INAPPLICABLE_PARAMETER_TYPE",
    "Value class cannot have value parameter of type '{0}'",
);
pub const VALUE_CLASS_CANNOT_BE_RECURSIVE: Factory0 = DiagnosticFactory::error(
    "VALUE_CLASS_CANNOT_BE_RECURSIVE",
    "Value class cannot be recursive",
);

// =============================================================================
// Supertypes
// =============================================================================

pub const NULLABLE_SUPERTYPE: Factory0 =
    DiagnosticFactory::error("NULLABLE_SUPERTYPE", "A supertype cannot be nullable");
pub const SUPERTYPE_APPEARS_TWICE: Factory0 =
    DiagnosticFactory::error("SUPERTYPE_APPEARS_TWICE", "A supertype appears twice");
pub const MANY_CLASSES_IN_SUPERTYPE_LIST: Factory0 = DiagnosticFactory::error(
    "MANY_CLASSES_IN_SUPERTYPE_LIST",
    "Only one class may appear in a supertype list",
);
pub const INTERFACE_WITH_SUPERCLASS: Factory0 = DiagnosticFactory::error(
    "INTERFACE_WITH_SUPERCLASS",
    "An interface cannot inherit from a class",
);
pub const FINAL_SUPERTYPE: Factory0 = DiagnosticFactory::error(
    "FINAL_SUPERTYPE",
    "This type is final, so it cannot be inherited from",
);
pub const SINGLETON_IN_SUPERTYPE: Factory0 =
    DiagnosticFactory::error("SINGLETON_IN_SUPERTYPE", "Cannot inherit from a singleton");
pub const CLASS_CANNOT_BE_EXTENDED_DIRECTLY: Factory1<DeclId> = DiagnosticFactory::error(
    "CLASS_CANNOT_BE_EXTENDED_DIRECTLY",
    "Class {0} cannot be extended directly",
);
pub const PROJECTION_IN_IMMEDIATE_ARGUMENT_TO_SUPERTYPE: Factory0 = DiagnosticFactory::error(
    "PROJECTION_IN_IMMEDIATE_ARGUMENT_TO_SUPERTYPE",
    "Projections are not allowed for immediate arguments of a supertype",
);
pub const ANNOTATION_ON_SUPERCLASS: Factory0 = DiagnosticFactory::error(
    "ANNOTATION_ON_SUPERCLASS",
    "Annotations on superclass are meaningless",
);

// =============================================================================
// Sealed hierarchies
// =============================================================================

pub const SEALED_INHERITOR_IN_DIFFERENT_PACKAGE: Factory2<String, String> =
    DiagnosticFactory::error(
        "SEALED_INHERITOR_IN_DIFFERENT_PACKAGE",
        "Inheritor of sealed class or interface declared in package '{0}' but it must be in package '{1}' where base class is declared",
    );
pub const SEALED_INHERITOR_IN_DIFFERENT_MODULE: Factory0 = DiagnosticFactory::error(
    "SEALED_INHERITOR_IN_DIFFERENT_MODULE",
    "Inheritance of sealed classes or interfaces from different module is prohibited",
);
pub const SEALED_SUPERTYPE_IN_LOCAL_CLASS: Factory2<ClassKind, ClassKind> =
    DiagnosticFactory::error(
        "SEALED_SUPERTYPE_IN_LOCAL_CLASS",
        "Local {0} cannot extend a sealed {1}",
    );

// =============================================================================
// Constructors and class structure
// =============================================================================

pub const CYCLIC_CONSTRUCTOR_DELEGATION_CALL: Factory0 = DiagnosticFactory::error(
    "CYCLIC_CONSTRUCTOR_DELEGATION_CALL",
    "There's a cycle in the delegation calls chain",
);
pub const PRIMARY_CONSTRUCTOR_DELEGATION_CALL_EXPECTED: Factory0 = DiagnosticFactory::error(
    "PRIMARY_CONSTRUCTOR_DELEGATION_CALL_EXPECTED",
    "Primary constructor call expected",
);
pub const MANY_COMPANION_OBJECTS: Factory0 = DiagnosticFactory::error(
    "MANY_COMPANION_OBJECTS",
    "Only one companion object is allowed per class",
);
pub const ANONYMOUS_INITIALIZER_IN_INTERFACE: Factory0 = DiagnosticFactory::error(
    "ANONYMOUS_INITIALIZER_IN_INTERFACE",
    "Anonymous initializers are not allowed in interfaces",
);

// =============================================================================
// Properties and accessors
// =============================================================================

pub const GETTER_VISIBILITY_DIFFERS_FROM_PROPERTY_VISIBILITY: Factory0 = DiagnosticFactory::error(
    "GETTER_VISIBILITY_DIFFERS_FROM_PROPERTY_VISIBILITY",
    "Getter visibility must be the same as property visibility",
);
pub const ABSTRACT_PROPERTY_WITH_GETTER: Factory0 = DiagnosticFactory::error(
    "ABSTRACT_PROPERTY_WITH_GETTER",
    "Property with 'abstract' modifier cannot have a getter",
);
pub const WRONG_GETTER_RETURN_TYPE: Factory2<TypeId, TypeId> = DiagnosticFactory::error(
    "WRONG_GETTER_RETURN_TYPE",
    "Getter return type must be equal to the type of the property, i.e. '{0}', but was '{1}'",
);
pub const VAL_WITH_SETTER: Factory0 =
    DiagnosticFactory::error("VAL_WITH_SETTER", "A 'val'-property cannot have a setter");
pub const SETTER_VISIBILITY_INCONSISTENT_WITH_PROPERTY_VISIBILITY: Factory0 =
    DiagnosticFactory::error(
        "SETTER_VISIBILITY_INCONSISTENT_WITH_PROPERTY_VISIBILITY",
        "Setter visibility must be the same or less permissive than property visibility",
    );
pub const PRIVATE_SETTER_FOR_ABSTRACT_PROPERTY: Factory0 = DiagnosticFactory::error(
    "PRIVATE_SETTER_FOR_ABSTRACT_PROPERTY",
    "Private setters are not allowed for abstract properties",
);
pub const PRIVATE_SETTER_FOR_OPEN_PROPERTY: Factory0 = DiagnosticFactory::error(
    "PRIVATE_SETTER_FOR_OPEN_PROPERTY",
    "Private setters are not allowed for open properties",
);
pub const ABSTRACT_PROPERTY_WITH_SETTER: Factory0 = DiagnosticFactory::error(
    "ABSTRACT_PROPERTY_WITH_SETTER",
    "Property with 'abstract' modifier cannot have a setter",
);
pub const WRONG_SETTER_PARAMETER_TYPE: Factory2<TypeId, TypeId> = DiagnosticFactory::error(
    "WRONG_SETTER_PARAMETER_TYPE",
    "Setter parameter type must be equal to the type of the property, i.e. '{0}', but was '{1}'",
);
pub const WRONG_SETTER_RETURN_TYPE: Factory0 =
    DiagnosticFactory::error("WRONG_SETTER_RETURN_TYPE", "Setter return type must be Unit");
pub const ACCESSOR_FOR_DELEGATED_PROPERTY: Factory0 = DiagnosticFactory::error(
    "ACCESSOR_FOR_DELEGATED_PROPERTY",
    "Delegated property cannot have accessors with non-default implementations",
);
pub const INAPPLICABLE_LATEINIT_MODIFIER: Factory1<&'static str> = DiagnosticFactory::error(
    "INAPPLICABLE_LATEINIT_MODIFIER",
    "'lateinit' modifier {0}",
);

// =============================================================================
// Type parameter bounds
// =============================================================================

pub const FINAL_UPPER_BOUND: Factory1<TypeId> = DiagnosticFactory::warning(
    "FINAL_UPPER_BOUND",
    "'{0}' is a final type, and thus a value of the type parameter is predetermined",
);
pub const BOUNDS_NOT_ALLOWED_IF_BOUNDED_BY_TYPE_PARAMETER: Factory0 = DiagnosticFactory::error(
    "BOUNDS_NOT_ALLOWED_IF_BOUNDED_BY_TYPE_PARAMETER",
    "Type parameter cannot have any other bounds if it's bounded by another type parameter",
);
pub const ONLY_ONE_CLASS_BOUND_ALLOWED: Factory0 = DiagnosticFactory::error(
    "ONLY_ONE_CLASS_BOUND_ALLOWED",
    "Only one of the upper bounds can be a class",
);
pub const REPEATED_BOUND: Factory0 =
    DiagnosticFactory::error("REPEATED_BOUND", "Type parameter already has this bound");
pub const CONFLICTING_UPPER_BOUNDS: Factory1<DeclId> = DiagnosticFactory::error(
    "CONFLICTING_UPPER_BOUNDS",
    "Upper bounds of {0} have empty intersection",
);
pub const BOUND_ON_TYPE_ALIAS_PARAMETER_NOT_ALLOWED: Factory0 = DiagnosticFactory::error(
    "BOUND_ON_TYPE_ALIAS_PARAMETER_NOT_ALLOWED",
    "Bounds are not allowed on type alias parameters",
);

// =============================================================================
// Inline functions
// =============================================================================

pub const USAGE_IS_NOT_INLINABLE: Factory1<DeclId> = DiagnosticFactory::error(
    "USAGE_IS_NOT_INLINABLE",
    "Illegal usage of inline-parameter '{0}'. Add 'noinline' modifier to the parameter declaration",
);
pub const NON_LOCAL_RETURN_NOT_ALLOWED: Factory1<DeclId> = DiagnosticFactory::error(
    "NON_LOCAL_RETURN_NOT_ALLOWED",
    "Can't inline '{0}' here: it may contain non-local returns",
);
pub const NON_PUBLIC_CALL_FROM_PUBLIC_INLINE: Factory2<DeclId, DeclId> = DiagnosticFactory::error(
    "NON_PUBLIC_CALL_FROM_PUBLIC_INLINE",
    "Public-API inline function '{1}' cannot access non-public-API '{0}'",
);
pub const PRIVATE_CLASS_MEMBER_FROM_INLINE: Factory2<DeclId, DeclId> = DiagnosticFactory::error(
    "PRIVATE_CLASS_MEMBER_FROM_INLINE",
    "Non-private inline function '{1}' cannot access members of private classes: '{0}'",
);
pub const PROTECTED_CONSTRUCTOR_CALL_FROM_PUBLIC_INLINE: Factory2<DeclId, DeclId> =
    DiagnosticFactory::error(
        "PROTECTED_CONSTRUCTOR_CALL_FROM_PUBLIC_INLINE",
        "Protected constructor call '{0}' from public-API inline function '{1}' is prohibited",
    );
pub static PROTECTED_CALL_FROM_PUBLIC_INLINE: DeprecationDiagnosticFactory<(DeclId, DeclId)> =
    DeprecationDiagnosticFactory::new(
        LanguageFeature::ProhibitProtectedCallFromInline,
        DiagnosticFactory::warning(
            "PROTECTED_CALL_FROM_PUBLIC_INLINE",
            "Protected function call '{0}' from public-API inline function '{1}' is deprecated",
        ),
        DiagnosticFactory::error(
            "PROTECTED_CALL_FROM_PUBLIC_INLINE_ERROR",
            "Protected function call '{0}' from public-API inline function '{1}' is prohibited",
        ),
    );
pub const SUPER_CALL_FROM_PUBLIC_INLINE: Factory1<DeclId> = DiagnosticFactory::error(
    "SUPER_CALL_FROM_PUBLIC_INLINE",
    "Accessing super members from public-API inline function '{0}' is prohibited",
);
pub const RECURSION_IN_INLINE: Factory1<DeclId> = DiagnosticFactory::error(
    "RECURSION_IN_INLINE",
    "Inline function '{0}' cannot be recursive",
);
pub const ILLEGAL_INLINE_PARAMETER_MODIFIER: Factory0 = DiagnosticFactory::error(
    "ILLEGAL_INLINE_PARAMETER_MODIFIER",
    "Modifier is allowed only for function parameters of an inline function",
);
pub const NULLABLE_INLINE_PARAMETER: Factory2<DeclId, DeclId> = DiagnosticFactory::error(
    "NULLABLE_INLINE_PARAMETER",
    "Inline-parameter '{0}' of '{1}' must not be nullable. Add 'noinline' modifier to the parameter declaration or make its type not nullable",
);
pub const INLINE_SUSPEND_FUNCTION_TYPE_UNSUPPORTED: Factory0 = DiagnosticFactory::error(
    "INLINE_SUSPEND_FUNCTION_TYPE_UNSUPPORTED",
    "Inline suspend function types are not supported",
);
pub const REIFIED_TYPE_PARAMETER_IN_OVERRIDE: Factory0 = DiagnosticFactory::error(
    "REIFIED_TYPE_PARAMETER_IN_OVERRIDE",
    "Override by a function with reified type parameter",
);
pub const NOTHING_TO_INLINE: Factory0 = DiagnosticFactory::warning(
    "NOTHING_TO_INLINE",
    "Expected performance impact from inlining is insignificant. Inlining works best for functions with parameters of function types",
);
pub const DECLARATION_CANT_BE_INLINED: Factory0 = DiagnosticFactory::error(
    "DECLARATION_CANT_BE_INLINED",
    "'inline' modifier is not allowed on virtual members. Only private or final members can be inlined",
);
pub const OVERRIDE_BY_INLINE: Factory0 =
    DiagnosticFactory::warning("OVERRIDE_BY_INLINE", "Override by an inline function");

// =============================================================================
// Expressions
// =============================================================================

pub const UNUSED_EXPRESSION: Factory0 =
    DiagnosticFactory::warning("UNUSED_EXPRESSION", "The expression is unused");
