// SPDX-License-Identifier: MIT OR Apache-2.0

//! Naming conventions for generated identifiers.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A casing style applied to property or type names.
///
/// # Examples
///
/// ```
/// use hexgen::domain::NamingConvention;
///
/// assert_eq!(NamingConvention::Snake.apply("myBoolean"), "my_boolean");
/// assert_eq!(NamingConvention::Pascal.apply("test-config"), "TestConfig");
/// assert_eq!("kebap".parse::<NamingConvention>().unwrap(), NamingConvention::Kebab);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum NamingConvention {
    /// `my_property`
    Snake,
    /// `MY_PROPERTY`
    ScreamingSnake,
    /// `myProperty`
    Camel,
    /// `MyProperty`
    Pascal,
    /// `my-property`
    Kebab,
}

impl NamingConvention {
    /// Converts `name` to this convention.
    pub fn apply(self, name: &str) -> String {
        match self {
            NamingConvention::Snake => name.to_snake_case(),
            NamingConvention::ScreamingSnake => name.to_shouty_snake_case(),
            NamingConvention::Camel => name.to_lower_camel_case(),
            NamingConvention::Pascal => name.to_upper_camel_case(),
            NamingConvention::Kebab => name.to_kebab_case(),
        }
    }

    /// Returns `true` if converted names are valid identifiers in C-like languages.
    pub fn yields_identifiers(self) -> bool {
        self != NamingConvention::Kebab
    }

    fn as_str(self) -> &'static str {
        match self {
            NamingConvention::Snake => "snake",
            NamingConvention::ScreamingSnake => "screaming_snake",
            NamingConvention::Camel => "camel",
            NamingConvention::Pascal => "pascal",
            NamingConvention::Kebab => "kebab",
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingConvention {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "snake" => Ok(NamingConvention::Snake),
            "screaming_snake" => Ok(NamingConvention::ScreamingSnake),
            "camel" => Ok(NamingConvention::Camel),
            "pascal" => Ok(NamingConvention::Pascal),
            "kebab" | "kebap" => Ok(NamingConvention::Kebab),
            other => Err(format!("unknown naming convention '{}'", other)),
        }
    }
}

impl TryFrom<String> for NamingConvention {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}
