// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.
//!
//! `test-config` exercises every value kind, a hidden property, both derived
//! forms and an inclusion of `test-include` at its end.

use hexgen::prelude::*;

/// Definition of the `test-config` unit.
#[allow(dead_code)]
pub const TEST_CONFIG: &str = r#"
- name: myBoolean
  type: bool
  value: true
- name: myInteger
  type: int
  value: 142
- name: myFloat
  type: float
  value: 322.0
- name: myCombinedFloat
  type: float
  value: ${myInteger} * ${myFloat}
- name: myDouble
  type: double
  value: 233.9
- name: myRegex
  type: regex
  value: Test Reg(E|e)x
  comment: Just another RegEx.
- name: myString
  type: string
  value: Hello World
  hidden: true
- name: mySubstitutedString
  type: string
  value: Sometimes I just want to scream ${myString}!
- name: myCombinedString
  type: string
  value: I am telling you that ${myIncludedString}.
- include: test-include
"#;

/// Definition of the `test-include` unit.
#[allow(dead_code)]
pub const TEST_INCLUDE: &str = r#"
- name: myIncludedString
  type: string
  value: this string got included from test-include.yaml
"#;

/// Parses a unit definition.
#[allow(dead_code)]
pub fn parse_unit(id: &str, yaml: &str) -> ConfigurationUnit {
    let raw: Vec<RawDeclaration> = serde_yaml::from_str(yaml).expect("fixture is valid YAML");
    ConfigurationUnit::from_declarations(id, raw).expect("fixture declarations are valid")
}

/// The `test-config` unit.
#[allow(dead_code)]
pub fn test_config() -> ConfigurationUnit {
    parse_unit("test-config", TEST_CONFIG)
}

/// A source that knows `test-include`.
#[allow(dead_code)]
pub fn source() -> InMemoryUnitSource {
    InMemoryUnitSource::new().with_unit(parse_unit("test-include", TEST_INCLUDE))
}

/// The identity used in every golden file.
#[allow(dead_code)]
pub fn identity() -> GeneratorIdentity {
    GeneratorIdentity::new("hexgen", "0.1.0").with_homepage("https://github.com/cryptidtech/hexgen")
}

/// A pipeline with every built-in exporter and the golden identity.
#[allow(dead_code)]
pub fn pipeline() -> GenerationPipeline {
    GenerationPipeline::builder()
        .with_default_exporters()
        .with_identity(identity())
        .build()
        .expect("built-in exporters have distinct languages")
}

/// Every built-in target with the options it needs.
#[allow(dead_code)]
pub fn all_targets() -> Vec<ExportTarget> {
    vec![
        ExportTarget::new("c"),
        ExportTarget::new("java").with_option("package", "my.test.config"),
        ExportTarget::new("javascript"),
        ExportTarget::new("typescript"),
        ExportTarget::new("python"),
        ExportTarget::new("go").with_option("package", "myconfig"),
    ]
}
