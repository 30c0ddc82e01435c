// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-language type and literal rules.
//!
//! The built-in table is created lazily on first use and never mutated, so it can
//! be read from any number of threads rendering independent units.

use crate::domain::errors::{GenerationError, Result};
use crate::domain::typed_value::{format_f32, format_f64};
use crate::domain::TypeKind;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// How one target language spells types and literals.
///
/// Custom exporters can declare their own rules as a `static`; kinds mapped to
/// `None` are reported as [`GenerationError::UnsupportedTypeForTarget`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRules {
    /// Language id the rules belong to.
    pub language: &'static str,
    /// Native type per kind, indexed by [`TypeKind::index`].
    pub native_types: [Option<&'static str>; 6],
    /// Suffix appended to `float` literals.
    pub float_suffix: &'static str,
    /// Suffix appended to `double` literals.
    pub double_suffix: &'static str,
    /// Literal for `true`.
    pub true_literal: &'static str,
    /// Literal for `false`.
    pub false_literal: &'static str,
    /// Inclusive range of integers the native integer type holds exactly.
    pub integer_range: Option<(i64, i64)>,
    /// Words that cannot be used as identifiers.
    pub reserved_words: &'static [&'static str],
}

impl TypeRules {
    /// The native type for `kind`, if the language has one.
    pub fn native_type(&self, kind: TypeKind) -> Option<&'static str> {
        self.native_types[kind.index()]
    }

    /// The native type for `kind`, or an error naming `property`.
    pub fn require_native_type(&self, kind: TypeKind, property: &str) -> Result<&'static str> {
        self.native_type(kind)
            .ok_or_else(|| GenerationError::UnsupportedTypeForTarget {
                language: self.language.to_string(),
                property: property.to_string(),
                kind,
            })
    }

    /// The boolean literal for `value`.
    pub fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            self.true_literal
        } else {
            self.false_literal
        }
    }

    /// An integer literal, failing when the native type cannot hold `value`.
    pub fn int_literal(&self, property: &str, value: i64) -> Result<String> {
        if let Some((min, max)) = self.integer_range {
            if value < min || value > max {
                return Err(GenerationError::UnrepresentableValue {
                    language: self.language.to_string(),
                    property: property.to_string(),
                    message: format!("{} is outside [{}, {}]", value, min, max),
                });
            }
        }
        Ok(value.to_string())
    }

    /// A `float` literal with the language's suffix.
    pub fn float_literal(&self, value: f32) -> String {
        format!("{}{}", format_f32(value), self.float_suffix)
    }

    /// A `double` literal with the language's suffix.
    pub fn double_literal(&self, value: f64) -> String {
        format!("{}{}", format_f64(value), self.double_suffix)
    }

    /// Returns `true` if `name` is reserved in this language.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Fails with `ReservedIdentifier` when `name` is reserved.
    pub fn check_identifier(&self, name: &str) -> Result<()> {
        if self.is_reserved(name) {
            return Err(GenerationError::ReservedIdentifier {
                language: self.language.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

const I32_RANGE: Option<(i64, i64)> = Some((i32::MIN as i64, i32::MAX as i64));
// Number.MAX_SAFE_INTEGER
const SAFE_INTEGER: Option<(i64, i64)> = Some((-(1 << 53) + 1, (1 << 53) - 1));

const C_RESERVED: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Bool",
];

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

const JS_RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "prototype",
    "constructor", "name", "length",
];

const PYTHON_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
    // Names the generated annotations refer to; a field binding one breaks the next line.
    "Final", "typing", "bool", "int", "float", "str",
];

const GO_RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Rules of the `c` exporter.
pub static C_RULES: TypeRules = TypeRules {
    language: "c",
    native_types: [
        Some("unsigned char"),
        Some("int"),
        Some("float"),
        Some("double"),
        Some("const char*"),
        Some("const char*"),
    ],
    float_suffix: "f",
    double_suffix: "",
    true_literal: "1",
    false_literal: "0",
    integer_range: I32_RANGE,
    reserved_words: C_RESERVED,
};

/// Rules of the `java` exporter.
pub static JAVA_RULES: TypeRules = TypeRules {
    language: "java",
    native_types: [
        Some("boolean"),
        Some("int"),
        Some("float"),
        Some("double"),
        Some("String"),
        Some("String"),
    ],
    float_suffix: "f",
    double_suffix: "d",
    true_literal: "true",
    false_literal: "false",
    integer_range: I32_RANGE,
    reserved_words: JAVA_RESERVED,
};

/// Rules of the `javascript` exporter.
pub static JAVASCRIPT_RULES: TypeRules = TypeRules {
    language: "javascript",
    native_types: [
        Some("boolean"),
        Some("number"),
        Some("number"),
        Some("number"),
        Some("string"),
        Some("RegExp"),
    ],
    float_suffix: "",
    double_suffix: "",
    true_literal: "true",
    false_literal: "false",
    integer_range: SAFE_INTEGER,
    reserved_words: JS_RESERVED,
};

/// Rules of the `typescript` exporter.
pub static TYPESCRIPT_RULES: TypeRules = TypeRules {
    language: "typescript",
    native_types: [
        Some("boolean"),
        Some("number"),
        Some("number"),
        Some("number"),
        Some("string"),
        Some("RegExp"),
    ],
    float_suffix: "",
    double_suffix: "",
    true_literal: "true",
    false_literal: "false",
    integer_range: SAFE_INTEGER,
    reserved_words: JS_RESERVED,
};

/// Rules of the `python` exporter.
pub static PYTHON_RULES: TypeRules = TypeRules {
    language: "python",
    native_types: [
        Some("bool"),
        Some("int"),
        Some("float"),
        Some("float"),
        Some("str"),
        Some("str"),
    ],
    float_suffix: "",
    double_suffix: "",
    true_literal: "True",
    false_literal: "False",
    integer_range: None,
    reserved_words: PYTHON_RESERVED,
};

/// Rules of the `go` exporter.
pub static GO_RULES: TypeRules = TypeRules {
    language: "go",
    native_types: [
        Some("bool"),
        Some("int64"),
        Some("float32"),
        Some("float64"),
        Some("string"),
        Some("string"),
    ],
    float_suffix: "",
    double_suffix: "",
    true_literal: "true",
    false_literal: "false",
    integer_range: None,
    reserved_words: GO_RESERVED,
};

static BUILTIN_RULES: Lazy<IndexMap<&'static str, &'static TypeRules>> = Lazy::new(|| {
    [
        &C_RULES,
        &JAVA_RULES,
        &JAVASCRIPT_RULES,
        &TYPESCRIPT_RULES,
        &PYTHON_RULES,
        &GO_RULES,
    ]
    .into_iter()
    .map(|rules| (rules.language, rules))
    .collect()
});

/// Rules of a built-in language.
///
/// # Examples
///
/// ```
/// use hexgen::domain::{builtin_rules, TypeKind};
///
/// let java = builtin_rules("java").unwrap();
/// assert_eq!(java.native_type(TypeKind::Float), Some("float"));
/// assert_eq!(java.float_literal(322.0), "322.0f");
/// assert!(builtin_rules("cobol").is_none());
/// ```
pub fn builtin_rules(language: &str) -> Option<&'static TypeRules> {
    BUILTIN_RULES.get(language).copied()
}

/// Ids of all built-in languages, in table order.
pub fn builtin_languages() -> impl Iterator<Item = &'static str> {
    BUILTIN_RULES.keys().copied()
}
