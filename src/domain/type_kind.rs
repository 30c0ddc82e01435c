// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical value kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a configuration property.
///
/// `Regex` holds text like `String` but is rendered with each target's
/// regular-expression conventions instead of its string-literal conventions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// `bool`
    #[serde(rename = "bool")]
    Boolean,
    /// `int`, a signed 64-bit integer
    #[serde(rename = "int")]
    Integer,
    /// `float`, a 32-bit float
    #[serde(rename = "float")]
    Float,
    /// `double`, a 64-bit float
    #[serde(rename = "double")]
    Double,
    /// `string`
    #[serde(rename = "string")]
    String,
    /// `regex`
    #[serde(rename = "regex")]
    Regex,
}

impl TypeKind {
    /// All kinds, in table order.
    pub const ALL: [TypeKind; 6] = [
        TypeKind::Boolean,
        TypeKind::Integer,
        TypeKind::Float,
        TypeKind::Double,
        TypeKind::String,
        TypeKind::Regex,
    ];

    /// The tag used for this kind in declarations.
    pub fn tag(self) -> &'static str {
        match self {
            TypeKind::Boolean => "bool",
            TypeKind::Integer => "int",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::String => "string",
            TypeKind::Regex => "regex",
        }
    }

    /// Position of this kind in `ALL`, used to index per-kind tables.
    pub fn index(self) -> usize {
        match self {
            TypeKind::Boolean => 0,
            TypeKind::Integer => 1,
            TypeKind::Float => 2,
            TypeKind::Double => 3,
            TypeKind::String => 4,
            TypeKind::Regex => 5,
        }
    }

    /// Returns `true` for `String` and `Regex`.
    pub fn is_textual(self) -> bool {
        matches!(self, TypeKind::String | TypeKind::Regex)
    }

    /// Returns `true` for `Integer`, `Float` and `Double`.
    pub fn is_numeric(self) -> bool {
        matches!(self, TypeKind::Integer | TypeKind::Float | TypeKind::Double)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a type tag is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeTag(pub String);

impl fmt::Display for UnknownTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type tag '{}'", self.0)
    }
}

impl std::error::Error for UnknownTypeTag {}

impl FromStr for TypeKind {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TypeKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_parse_back() {
        for kind in TypeKind::ALL {
            assert_eq!(kind.tag().parse::<TypeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_tag() {
        let err = "list".parse::<TypeKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown type tag 'list'");
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, kind) in TypeKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_classification() {
        assert!(TypeKind::Regex.is_textual());
        assert!(!TypeKind::Boolean.is_textual());
        assert!(TypeKind::Float.is_numeric());
        assert!(!TypeKind::String.is_numeric());
    }

    #[test]
    fn test_serde_uses_tags() {
        let kind: TypeKind = serde_yaml::from_str("double").unwrap();
        assert_eq!(kind, TypeKind::Double);
        assert_eq!(serde_yaml::to_string(&TypeKind::Regex).unwrap().trim(), "regex");
    }
}
