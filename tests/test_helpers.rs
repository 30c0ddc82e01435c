// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities and mock implementations for testing.
//!
//! This module provides a third-party style exporter built on the public
//! rendering helpers and a sink that refuses writes, and checks how the
//! pipeline treats them.

#![cfg(all(
    feature = "c",
    feature = "java",
    feature = "javascript",
    feature = "typescript",
    feature = "python",
    feature = "go"
))]

mod common;

use hexgen::adapters::render::{NamingDefaults, RenderContext};
use hexgen::prelude::*;
use hexgen::domain::TypeRules;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Rules of a `.properties` file: everything is text, regexes are not supported.
static PROPERTIES_RULES: TypeRules = TypeRules {
    language: "properties",
    native_types: [
        Some("boolean"),
        Some("integer"),
        Some("float"),
        Some("double"),
        Some("string"),
        None,
    ],
    float_suffix: "",
    double_suffix: "",
    true_literal: "true",
    false_literal: "false",
    integer_range: None,
    reserved_words: &[],
};

/// An exporter for Java `.properties` files.
///
/// Keys are prefixed with the type name in snake case.
#[derive(Debug, Default)]
pub struct PropertiesExporter {
    renders: AtomicUsize,
}

impl Exporter for PropertiesExporter {
    fn language(&self) -> &str {
        "properties"
    }

    fn type_rules(&self) -> &TypeRules {
        &PROPERTIES_RULES
    }

    fn render(
        &self,
        unit: &ResolvedUnit,
        options: &ExportOptions,
        identity: &GeneratorIdentity,
    ) -> Result<String> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let ctx = RenderContext::new(
            unit,
            options,
            identity,
            &PROPERTIES_RULES,
            self.known_options(),
            NamingDefaults {
                property: None,
                type_name: NamingConvention::Snake,
            },
        )?;
        let mut out = format!("# {}\n", ctx.banner());
        for field in &ctx.fields {
            let literal = ctx.literal(field, |s| s.replace('\n', "\\n"), |s| s.to_string())?;
            out.push_str(&format!("{}.{}={}\n", ctx.type_name, field.name, literal));
        }
        Ok(out)
    }
}

/// A sink that rejects every write.
#[derive(Debug, Default)]
pub struct RejectingSink {
    attempts: AtomicUsize,
}

impl OutputSink for RejectingSink {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn write(&self, _unit: &UnitId, _language: &str, _text: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(GenerationError::ReservedIdentifier {
            language: "disk".to_string(),
            name: "full".to_string(),
        })
    }
}

fn pipeline_with(exporter: Arc<PropertiesExporter>) -> GenerationPipeline {
    GenerationPipeline::builder()
        .with_default_exporters()
        .with_exporter(exporter)
        .with_identity(common::identity())
        .build()
        .unwrap()
}

#[test]
fn test_custom_exporter_renders() {
    let exporter = Arc::new(PropertiesExporter::default());
    let pipeline = pipeline_with(Arc::clone(&exporter));

    let mut unit = ConfigurationUnit::new("ServerConfig");
    unit.add_property("host", TypeKind::String, "localhost", None).unwrap();
    unit.add_property("port", TypeKind::Integer, 8080i64, None).unwrap();

    let generated = pipeline
        .generate(&unit, &InMemoryUnitSource::new(), &[ExportTarget::new("properties")])
        .unwrap();
    let expected = "\
# Generated with hexgen v0.1.0 (https://github.com/cryptidtech/hexgen).
server_config.host=localhost
server_config.port=8080
";
    assert_eq!(generated.get("properties"), Some(expected));
    assert_eq!(exporter.renders.load(Ordering::SeqCst), 1);
    assert!(pipeline.languages().contains(&"properties"));
}

#[test]
fn test_unsupported_type_for_target() {
    let exporter = Arc::new(PropertiesExporter::default());
    let err = pipeline_with(exporter)
        .generate(&common::test_config(), &common::source(), &[ExportTarget::new("properties")])
        .unwrap_err();
    assert!(matches!(
        err,
        GenerationError::UnsupportedTypeForTarget { ref language, ref property, kind }
            if language == "properties" && property == "myRegex" && kind == TypeKind::Regex
    ));
}

#[test]
fn test_option_errors_precede_rendering() {
    let exporter = Arc::new(PropertiesExporter::default());
    let targets = [
        ExportTarget::new("python"),
        ExportTarget::new("go"),
        ExportTarget::new("properties"),
    ];
    let err = pipeline_with(Arc::clone(&exporter))
        .generate(&common::test_config(), &common::source(), &targets)
        .unwrap_err();
    assert!(matches!(err, GenerationError::MissingOption { .. }));
    assert_eq!(exporter.renders.load(Ordering::SeqCst), 0);
}

#[test]
fn test_custom_exporter_cannot_shadow_builtin() {
    struct FakePython;

    impl Exporter for FakePython {
        fn language(&self) -> &str {
            "python"
        }

        fn type_rules(&self) -> &TypeRules {
            &PROPERTIES_RULES
        }

        fn render(&self, _: &ResolvedUnit, _: &ExportOptions, _: &GeneratorIdentity) -> Result<String> {
            Ok(String::new())
        }
    }

    let result = GenerationPipeline::builder()
        .with_default_exporters()
        .with_exporter(Arc::new(FakePython))
        .build();
    assert!(matches!(result, Err(GenerationError::DuplicateExporter { .. })));
}

#[test]
fn test_sink_errors_are_wrapped() {
    let sink = RejectingSink::default();
    let err = common::pipeline()
        .generate_into(&common::test_config(), &common::source(), &common::all_targets(), &sink)
        .unwrap_err();
    match err {
        GenerationError::SinkError { sink_name, source, .. } => {
            assert_eq!(sink_name, "rejecting");
            assert!(source.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_generate_all_with_shared_source() {
    let mut other = ConfigurationUnit::new("other-config");
    other.include("test-include");
    other.declare_substituted("shout", "${myIncludedString}!", None).unwrap();
    let units = [common::test_config(), other];

    let generated = common::pipeline()
        .generate_all(&units, &common::source(), &common::all_targets())
        .unwrap();
    assert_eq!(generated.len(), 2);
    assert_eq!(generated[0].get("go"), Some(include_str!("golden/test_config.go")));
    assert!(generated[1]
        .get("python")
        .unwrap()
        .contains("shout: Final[str] = 'this string got included from test-include.yaml!'"));
}
