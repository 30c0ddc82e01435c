// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generates constants for every built-in language.
//!
//! This example demonstrates:
//! - Reading unit definitions and export targets from YAML
//! - Including one unit in another through an in-memory source
//! - Substitution and combination of properties
//! - Rendering every target and collecting the output in a sink
//!
//! To run this example:
//! ```bash
//! RUST_LOG=debug cargo run --example generate_constants
//! ```

use hexgen::prelude::*;

const SERVER: &str = r#"
- name: host
  type: string
  value: localhost
- name: port
  type: int
  value: 8080
  comment: Port the server listens on.
- name: secure
  type: bool
  value: yes
- name: url
  type: string
  value: http://${host}:${port}/?secure=${secure}
- include: limits
"#;

const LIMITS: &str = r#"
- name: timeoutSeconds
  type: double
  value: 2.5
- name: retries
  type: int
  value: 3
- name: budgetSeconds
  type: double
  value: ${timeoutSeconds} * (${retries} + 1)
- name: idPattern
  type: regex
  value: ^[a-z]+/\d+$
"#;

const TARGETS: &str = r#"
- language: c
- language: java
  options:
    package: com.example.config
    property_naming: screaming_snake
- language: javascript
  options:
    module: esm
- language: typescript
- language: python
  options:
    property_naming: snake
- language: go
  options:
    package: config
"#;

fn parse(id: &str, yaml: &str) -> std::result::Result<ConfigurationUnit, Box<dyn std::error::Error>> {
    let raw: Vec<RawDeclaration> = serde_yaml::from_str(yaml)?;
    Ok(ConfigurationUnit::from_declarations(id, raw)?)
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== hexgen: Generate Constants ===\n");

    let source = InMemoryUnitSource::new().with_unit(parse("limits", LIMITS)?);
    let server = parse("server-config", SERVER)?;
    let targets: Vec<ExportTarget> = serde_yaml::from_str(TARGETS)?;

    let pipeline = GenerationPipeline::with_defaults()?;
    println!("Registered languages: {}\n", pipeline.languages().join(", "));

    let sink = MemorySink::new();
    pipeline.generate_into(&server, &source, &targets, &sink)?;

    for record in sink.records() {
        println!("--- {} ({}) ---", record.unit, record.language);
        println!("{}", record.text);
    }

    // Resolution errors are reported before anything is rendered
    let mut broken = ConfigurationUnit::new("broken");
    broken.declare_combined("a", TypeKind::Integer, "${b} + 1", None)?;
    broken.declare_combined("b", TypeKind::Integer, "${a} * 2", None)?;
    match pipeline.generate(&broken, &source, &targets) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("✗ {}", e),
    }

    Ok(())
}
