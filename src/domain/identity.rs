// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity of the tool that produced a generated file.

use serde::{Deserialize, Serialize};

/// Name, version and homepage written into every generated banner.
///
/// # Examples
///
/// ```
/// use hexgen::domain::GeneratorIdentity;
///
/// let identity = GeneratorIdentity::new("confluent", "0.1.1")
///     .with_homepage("https://pypi.org/project/confluent/");
/// assert_eq!(
///     identity.banner(),
///     "Generated with confluent v0.1.1 (https://pypi.org/project/confluent/)."
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorIdentity {
    /// Tool name.
    pub name: String,
    /// Tool version.
    pub version: String,
    /// Optional homepage.
    #[serde(default)]
    pub homepage: Option<String>,
}

impl GeneratorIdentity {
    /// Creates an identity without a homepage.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        GeneratorIdentity {
            name: name.into(),
            version: version.into(),
            homepage: None,
        }
    }

    /// Sets the homepage.
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }

    /// The identity of this crate, taken from its package metadata.
    pub fn this_crate() -> Self {
        let identity = GeneratorIdentity::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        match env!("CARGO_PKG_HOMEPAGE") {
            "" => identity,
            homepage => identity.with_homepage(homepage),
        }
    }

    /// The banner line, without comment markers.
    pub fn banner(&self) -> String {
        match &self.homepage {
            Some(homepage) => format!("Generated with {} v{} ({}).", self.name, self.version, homepage),
            None => format!("Generated with {} v{}.", self.name, self.version),
        }
    }
}

impl Default for GeneratorIdentity {
    fn default() -> Self {
        GeneratorIdentity::this_crate()
    }
}
