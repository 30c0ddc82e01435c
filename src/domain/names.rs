// SPDX-License-Identifier: MIT OR Apache-2.0

//! Newtypes for property names and unit identifiers.
//!
//! `PropertyName` is validated on construction so every name that reaches an
//! exporter is a plain identifier. `UnitId` is free-form: it names a configuration
//! unit (usually after its definition file) and seeds the generated type name.

use crate::domain::errors::{GenerationError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

/// Returns `true` if `name` is a valid property name.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// A validated property name.
///
/// # Examples
///
/// ```
/// use hexgen::domain::PropertyName;
///
/// let name = PropertyName::new("myBoolean").unwrap();
/// assert_eq!(name.as_str(), "myBoolean");
/// assert!(PropertyName::new("1st").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PropertyName(String);

impl PropertyName {
    /// Creates a property name, rejecting anything that is not an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if is_identifier(&name) {
            Ok(PropertyName(name))
        } else {
            Err(GenerationError::InvalidName { name })
        }
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the name into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for PropertyName {
    type Error = GenerationError;

    fn try_from(s: &str) -> Result<Self> {
        PropertyName::new(s)
    }
}

impl TryFrom<String> for PropertyName {
    type Error = GenerationError;

    fn try_from(s: String) -> Result<Self> {
        PropertyName::new(s)
    }
}

impl<'de> Deserialize<'de> for PropertyName {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        PropertyName::new(raw).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for PropertyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a configuration unit.
///
/// # Examples
///
/// ```
/// use hexgen::domain::UnitId;
///
/// let id = UnitId::from("test-config");
/// assert_eq!(id.as_str(), "test-config");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Creates a new `UnitId` from a `String`.
    pub fn new(id: String) -> Self {
        UnitId(id)
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        UnitId(s)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        UnitId(s.to_string())
    }
}

impl AsRef<str> for UnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_valid_names() {
        for name in ["a", "_hidden", "myBoolean", "MY_CONST_2", "x1"] {
            assert!(PropertyName::new(name).is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "1abc", "my-name", "with space", "dotted.name", "ümlaut"] {
            let err = PropertyName::new(name).unwrap_err();
            assert!(matches!(err, GenerationError::InvalidName { .. }), "accepted {name}");
        }
    }

    #[test]
    fn test_property_name_display() {
        let name = PropertyName::new("myFloat").unwrap();
        assert_eq!(format!("{}", name), "myFloat");
        assert_eq!(name.clone().into_string(), "myFloat");
    }

    #[test]
    fn test_property_name_try_from() {
        let name: PropertyName = "myInteger".try_into().unwrap();
        assert_eq!(name.as_str(), "myInteger");
        let bad: Result<PropertyName> = String::from("0x").try_into();
        assert!(bad.is_err());
    }

    #[test]
    fn test_property_name_deserialize_validates() {
        let ok: PropertyName = serde_yaml::from_str("myRegex").unwrap();
        assert_eq!(ok.as_str(), "myRegex");
        let bad: std::result::Result<PropertyName, _> = serde_yaml::from_str("'not valid'");
        assert!(bad.is_err());
    }

    #[test]
    fn test_unit_id_hash() {
        let mut map = HashMap::new();
        map.insert(UnitId::from("base"), 1);
        assert_eq!(map.get(&UnitId::from("base".to_string())), Some(&1));
        assert_eq!(map.get(&UnitId::from("other")), None);
    }

    #[test]
    fn test_unit_id_display() {
        let id = UnitId::new("test-config".to_string());
        assert_eq!(id.to_string(), "test-config");
        assert_eq!(id.as_ref(), "test-config");
    }
}
