//! Well-known class ids and member names.

/// Class ids of the built-in and standard library classes the checkers
/// recognize by identity.
pub mod class_ids {
    pub const ANY: &str = "kotlin/Any";
    pub const NOTHING: &str = "kotlin/Nothing";
    pub const UNIT: &str = "kotlin/Unit";
    pub const BOOLEAN: &str = "kotlin/Boolean";
    pub const CHAR: &str = "kotlin/Char";
    pub const BYTE: &str = "kotlin/Byte";
    pub const SHORT: &str = "kotlin/Short";
    pub const INT: &str = "kotlin/Int";
    pub const LONG: &str = "kotlin/Long";
    pub const FLOAT: &str = "kotlin/Float";
    pub const DOUBLE: &str = "kotlin/Double";
    pub const UBYTE: &str = "kotlin/UByte";
    pub const USHORT: &str = "kotlin/UShort";
    pub const UINT: &str = "kotlin/UInt";
    pub const ULONG: &str = "kotlin/ULong";
    pub const STRING: &str = "kotlin/String";
    pub const NUMBER: &str = "kotlin/Number";
    pub const ARRAY: &str = "kotlin/Array";
    pub const ENUM: &str = "kotlin/Enum";
    pub const CLONEABLE: &str = "kotlin/Cloneable";
    pub const ANNOTATION: &str = "kotlin/Annotation";
    pub const KCLASS: &str = "kotlin/reflect/KClass";

    pub const SUPPRESS: &str = "kotlin/Suppress";
    pub const UNSAFE_VARIANCE: &str = "kotlin/UnsafeVariance";
    pub const PUBLISHED_API: &str = "kotlin/PublishedApi";
    pub const DEPRECATED: &str = "kotlin/Deprecated";
    pub const DEPRECATED_SINCE_KOTLIN: &str = "kotlin/DeprecatedSinceKotlin";
    pub const INLINE_ONLY: &str = "kotlin/internal/InlineOnly";
    pub const JVM_INLINE: &str = "kotlin/jvm/JvmInline";
    pub const TARGET: &str = "kotlin/annotation/Target";
    pub const RETENTION: &str = "kotlin/annotation/Retention";
    pub const REPEATABLE: &str = "kotlin/annotation/Repeatable";

    /// `kotlin/Function0` .. `kotlin/Function22` share this prefix.
    pub const FUNCTION_PREFIX: &str = "kotlin/Function";
    /// `kotlin/coroutines/SuspendFunction0` ..
    pub const SUSPEND_FUNCTION_PREFIX: &str = "kotlin/coroutines/SuspendFunction";
    /// `kotlin/reflect/KFunction0` .. (reflection types are not inlinable)
    pub const KFUNCTION_PREFIX: &str = "kotlin/reflect/KFunction";
    pub const KSUSPEND_FUNCTION_PREFIX: &str = "kotlin/reflect/KSuspendFunction";

    pub const PRIMITIVES: [&str; 8] = [BOOLEAN, CHAR, BYTE, SHORT, INT, LONG, FLOAT, DOUBLE];
    pub const UNSIGNED: [&str; 4] = [UBYTE, USHORT, UINT, ULONG];

    pub const PRIMITIVE_ARRAYS: [&str; 8] = [
        "kotlin/BooleanArray",
        "kotlin/CharArray",
        "kotlin/ByteArray",
        "kotlin/ShortArray",
        "kotlin/IntArray",
        "kotlin/LongArray",
        "kotlin/FloatArray",
        "kotlin/DoubleArray",
    ];
    pub const UNSIGNED_ARRAYS: [&str; 4] = [
        "kotlin/UByteArray",
        "kotlin/UShortArray",
        "kotlin/UIntArray",
        "kotlin/ULongArray",
    ];

    /// Arity of `kotlin/FunctionN` or `kotlin/coroutines/SuspendFunctionN`.
    #[must_use]
    pub fn function_arity(class_id: &str) -> Option<usize> {
        class_id
            .strip_prefix(FUNCTION_PREFIX)
            .or_else(|| class_id.strip_prefix(SUSPEND_FUNCTION_PREFIX))
            .and_then(|arity| arity.parse().ok())
    }

    #[must_use]
    pub fn is_suspend_function(class_id: &str) -> bool {
        class_id.starts_with(SUSPEND_FUNCTION_PREFIX) && function_arity(class_id).is_some()
    }

    #[must_use]
    pub fn is_primitive_array(class_id: &str) -> bool {
        PRIMITIVE_ARRAYS.contains(&class_id)
    }

    #[must_use]
    pub fn is_unsigned_array(class_id: &str) -> bool {
        UNSIGNED_ARRAYS.contains(&class_id)
    }
}

/// Member names with special meaning.
pub mod member_names {
    pub const INVOKE: &str = "invoke";
    pub const EQUALS: &str = "equals";
    pub const HASH_CODE: &str = "hashCode";
    pub const TO_STRING: &str = "toString";
    pub const BOX: &str = "box";
    pub const UNBOX: &str = "unbox";
    pub const FIELD: &str = "field";

    /// Members a value class may not declare.
    pub const VALUE_CLASS_RESERVED: [&str; 4] = [BOX, UNBOX, EQUALS, HASH_CODE];
}
