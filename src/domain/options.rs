// SPDX-License-Identifier: MIT OR Apache-2.0

//! Export targets and their options.
//!
//! Option values are loosely typed the way a definition file provides them; typed
//! accessors convert them at the point of use and report the offending option name.

use crate::domain::errors::{GenerationError, Result};
use crate::domain::NamingConvention;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT: usize = 4;

/// Option keys understood by the built-in exporters.
pub const COMMON_OPTIONS: &[&str] = &["indent", "property_naming", "type_naming", "type_name"];

/// A single option value.
///
/// # Examples
///
/// ```
/// use hexgen::domain::OptionValue;
///
/// assert_eq!(OptionValue::from("yes").as_bool("flag").unwrap(), true);
/// assert_eq!(OptionValue::from(2).as_i64("indent").unwrap(), 2);
/// assert!(OptionValue::from(true).as_str("package").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A boolean option.
    Bool(bool),
    /// An integer option.
    Int(i64),
    /// A string option.
    Str(String),
}

impl OptionValue {
    /// Converts the value to a boolean.
    ///
    /// Strings are accepted case-insensitively: `true`, `yes`, `1`, `on` and
    /// `false`, `no`, `0`, `off`.
    pub fn as_bool(&self, option: &str) -> Result<bool> {
        match self {
            OptionValue::Bool(b) => Ok(*b),
            OptionValue::Int(0) => Ok(false),
            OptionValue::Int(1) => Ok(true),
            OptionValue::Str(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" => Ok(false),
                _ => Err(invalid(option, format!("'{}' is not a boolean", s))),
            },
            other => Err(invalid(option, format!("{} is not a boolean", other))),
        }
    }

    /// Converts the value to an `i64`, parsing strings.
    pub fn as_i64(&self, option: &str) -> Result<i64> {
        match self {
            OptionValue::Int(i) => Ok(*i),
            OptionValue::Str(s) => s.trim().parse::<i64>().map_err(|e| GenerationError::InvalidOption {
                option: option.to_string(),
                message: format!("'{}' is not an integer: {}", s, e),
            }),
            OptionValue::Bool(b) => Err(invalid(option, format!("{} is not an integer", b))),
        }
    }

    /// Returns the value as a string slice. Only string values are accepted.
    pub fn as_str(&self, option: &str) -> Result<&str> {
        match self {
            OptionValue::Str(s) => Ok(s),
            other => Err(invalid(option, format!("{} is not a string", other))),
        }
    }
}

fn invalid(option: &str, message: String) -> GenerationError {
    GenerationError::InvalidOption {
        option: option.to_string(),
        message,
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Str(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<i32> for OptionValue {
    fn from(i: i32) -> Self {
        OptionValue::Int(i64::from(i))
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

/// The options of one export target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportOptions(BTreeMap<String, OptionValue>);

impl ExportOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        ExportOptions(BTreeMap::new())
    }

    /// Sets an option, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the raw value of an option.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// Iterates over all options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Spaces per indentation level. Negative values fall back to the default.
    pub fn indent(&self) -> Result<usize> {
        match self.get("indent") {
            None => Ok(DEFAULT_INDENT),
            Some(value) => {
                let indent = value.as_i64("indent")?;
                Ok(usize::try_from(indent).unwrap_or(DEFAULT_INDENT))
            }
        }
    }

    /// A string option, if set.
    pub fn string(&self, key: &str) -> Result<Option<&str>> {
        self.get(key).map(|v| v.as_str(key)).transpose()
    }

    /// A string option the language cannot do without.
    pub fn require_string(&self, language: &str, key: &str) -> Result<&str> {
        self.string(key)?.ok_or_else(|| GenerationError::MissingOption {
            language: language.to_string(),
            option: key.to_string(),
        })
    }

    /// A naming convention option, if set.
    pub fn naming(&self, key: &str) -> Result<Option<NamingConvention>> {
        match self.string(key)? {
            None => Ok(None),
            Some(s) => s.parse().map(Some).map_err(|message| GenerationError::InvalidOption {
                option: key.to_string(),
                message,
            }),
        }
    }

    /// Logs every option not in `known`; such options are ignored.
    pub fn log_unrecognized(&self, language: &str, known: &[&str]) {
        for (key, _) in self.iter() {
            if !COMMON_OPTIONS.contains(&key) && !known.contains(&key) {
                tracing::debug!("Ignoring option '{}' for language '{}'", key, language);
            }
        }
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for ExportOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ExportOptions(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A language to render plus its options.
///
/// # Examples
///
/// ```
/// use hexgen::domain::ExportTarget;
///
/// let target = ExportTarget::new("java").with_option("package", "my.test.package");
/// assert_eq!(target.language, "java");
/// assert_eq!(target.options.string("package").unwrap(), Some("my.test.package"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTarget {
    /// The exporter's language id.
    pub language: String,
    /// Options passed to the exporter.
    #[serde(default)]
    pub options: ExportOptions,
}

impl ExportTarget {
    /// Creates a target with no options.
    pub fn new(language: impl Into<String>) -> Self {
        ExportTarget {
            language: language.into(),
            options: ExportOptions::new(),
        }
    }

    /// Adds an option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.set(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_defaults() {
        let mut options = ExportOptions::new();
        assert_eq!(options.indent().unwrap(), 4);
        options.set("indent", 2);
        assert_eq!(options.indent().unwrap(), 2);
        options.set("indent", -3);
        assert_eq!(options.indent().unwrap(), DEFAULT_INDENT);
        options.set("indent", "8");
        assert_eq!(options.indent().unwrap(), 8);
        options.set("indent", true);
        assert!(matches!(options.indent(), Err(GenerationError::InvalidOption { .. })));
    }

    #[test]
    fn test_require_string() {
        let options: ExportOptions = [("package", "myconfig")].into_iter().collect();
        assert_eq!(options.require_string("go", "package").unwrap(), "myconfig");
        let err = ExportOptions::new().require_string("go", "package").unwrap_err();
        assert!(matches!(err, GenerationError::MissingOption { .. }));
    }

    #[test]
    fn test_naming_option() {
        let options: ExportOptions = [("property_naming", "screaming_snake"), ("type_naming", "shout")]
            .into_iter()
            .collect();
        assert_eq!(
            options.naming("property_naming").unwrap(),
            Some(NamingConvention::ScreamingSnake)
        );
        assert!(options.naming("type_naming").is_err());
        assert_eq!(options.naming("missing").unwrap(), None);
    }

    #[test]
    fn test_bool_conversions() {
        assert!(OptionValue::from("ON").as_bool("x").unwrap());
        assert!(!OptionValue::from(0).as_bool("x").unwrap());
        assert!(OptionValue::from(7).as_bool("x").is_err());
        assert!(OptionValue::from("maybe").as_bool("x").is_err());
    }

    #[test]
    fn test_target_deserializes_from_yaml() {
        let yaml = "language: java\noptions:\n  package: my.test.package\n  indent: 2\n  strict: true\n";
        let target: ExportTarget = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(target.language, "java");
        assert_eq!(target.options.get("indent"), Some(&OptionValue::Int(2)));
        assert_eq!(target.options.get("strict"), Some(&OptionValue::Bool(true)));

        let bare: ExportTarget = serde_yaml::from_str("language: c").unwrap();
        assert!(bare.options.iter().next().is_none());
    }
}
