// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation pipeline implementation.
//!
//! This module provides the default implementation of the `GenerationService`
//! trait. The pipeline owns one exporter per language, resolves each unit once and
//! hands the frozen result to every requested exporter.

use crate::domain::{
    ConfigurationUnit, ExportTarget, GeneratedUnit, GenerationError, GenerationService,
    GeneratorIdentity, ResolvedUnit, Result, UnitId, UnitState,
};
use crate::ports::{Exporter, OutputSink, UnitSource};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Default implementation of the generation service.
///
/// # Examples
///
/// ```rust
/// use hexgen::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pipeline = GenerationPipeline::builder()
///     .with_default_exporters()
///     .with_identity(GeneratorIdentity::new("hexgen", "0.1.0"))
///     .build()?;
///
/// let mut unit = ConfigurationUnit::new("app-config");
/// unit.add_property("retries", TypeKind::Integer, 3i64, None)?;
///
/// let targets = [ExportTarget::new("python"), ExportTarget::new("go").with_option("package", "config")];
/// let generated = pipeline.generate(&unit, &InMemoryUnitSource::new(), &targets)?;
/// assert!(generated.get("python").unwrap().contains("retries: Final[int] = 3"));
/// # Ok(())
/// # }
/// ```
pub struct GenerationPipeline {
    /// Exporters keyed by language, in registration order
    exporters: IndexMap<String, Arc<dyn Exporter>>,
    identity: GeneratorIdentity,
}

impl GenerationPipeline {
    /// Creates a new pipeline builder.
    pub fn builder() -> GenerationPipelineBuilder {
        GenerationPipelineBuilder::new()
    }

    /// Creates a pipeline with every built-in exporter and this crate's identity.
    pub fn with_defaults() -> Result<Self> {
        Self::builder().with_default_exporters().build()
    }

    /// The exporter registered for `language`.
    pub fn exporter(&self, language: &str) -> Option<&Arc<dyn Exporter>> {
        self.exporters.get(language)
    }

    /// The identity written into every banner.
    pub fn identity(&self) -> &GeneratorIdentity {
        &self.identity
    }

    /// Generates `unit` for every target and hands the outputs to `sink`.
    ///
    /// Nothing reaches the sink unless every target rendered.
    pub fn generate_into(
        &self,
        unit: &ConfigurationUnit,
        source: &dyn UnitSource,
        targets: &[ExportTarget],
        sink: &dyn OutputSink,
    ) -> Result<GeneratedUnit> {
        let generated = self.generate(unit, source, targets)?;
        for (language, text) in generated.iter() {
            sink.write(generated.id(), language, text)
                .map_err(|e| sink_error(sink, e))?;
            tracing::debug!(
                "Wrote {} output of unit '{}' to sink '{}'",
                language,
                generated.id(),
                sink.name()
            );
        }
        Ok(generated)
    }

    /// Generates independent units in parallel.
    ///
    /// Results come back in input order. The first failing unit, in input order,
    /// fails the whole call.
    pub fn generate_all(
        &self,
        units: &[ConfigurationUnit],
        source: &dyn UnitSource,
        targets: &[ExportTarget],
    ) -> Result<Vec<GeneratedUnit>> {
        let plan = self.plan(targets)?;
        let results: Vec<Result<GeneratedUnit>> = std::thread::scope(|scope| {
            let handles: Vec<_> = units
                .iter()
                .map(|unit| {
                    let plan = &plan;
                    scope.spawn(move || self.run(unit, source, plan))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });
        results.into_iter().collect()
    }

    /// Matches every target with its exporter and validates its options.
    fn plan<'t>(&self, targets: &'t [ExportTarget]) -> Result<Vec<(&'t ExportTarget, &dyn Exporter)>> {
        let mut seen = HashSet::new();
        let mut plan = Vec::with_capacity(targets.len());
        for target in targets {
            let exporter = self.exporters.get(&target.language).ok_or_else(|| {
                GenerationError::UnknownLanguage {
                    language: target.language.clone(),
                }
            })?;
            if !seen.insert(target.language.as_str()) {
                return Err(GenerationError::InvalidOption {
                    option: "language".to_string(),
                    message: format!("'{}' is requested more than once", target.language),
                });
            }
            exporter.validate_options(&target.options)?;
            plan.push((target, exporter.as_ref()));
        }
        Ok(plan)
    }

    fn run(
        &self,
        unit: &ConfigurationUnit,
        source: &dyn UnitSource,
        plan: &[(&ExportTarget, &dyn Exporter)],
    ) -> Result<GeneratedUnit> {
        let mut state = UnitState::Declared;
        let resolved = self.resolve_tracked(unit, source, &mut state)?;

        let mut generated = GeneratedUnit::new(unit.id().clone());
        for (target, exporter) in plan {
            match exporter.render(&resolved, &target.options, &self.identity) {
                Ok(text) => generated.insert(target.language.clone(), text),
                Err(e) => {
                    advance(unit.id(), &mut state, UnitState::Failed);
                    tracing::debug!("Rendering unit '{}' as {} failed: {}", unit.id(), target.language, e);
                    return Err(e);
                }
            }
        }
        advance(unit.id(), &mut state, UnitState::Rendered);
        Ok(generated)
    }

    fn resolve_tracked(
        &self,
        unit: &ConfigurationUnit,
        source: &dyn UnitSource,
        state: &mut UnitState,
    ) -> Result<Arc<ResolvedUnit>> {
        advance(unit.id(), state, UnitState::Resolving);
        match unit.resolve_with(source) {
            Ok(resolved) => {
                advance(unit.id(), state, UnitState::Resolved);
                Ok(Arc::new(resolved))
            }
            Err(e) => {
                advance(unit.id(), state, UnitState::Failed);
                tracing::debug!("Resolving unit '{}' failed: {}", unit.id(), e);
                Err(e)
            }
        }
    }
}

fn advance(unit: &UnitId, state: &mut UnitState, next: UnitState) {
    debug_assert!(state.can_transition_to(next), "{} -> {}", state, next);
    tracing::debug!("Unit '{}': {} -> {}", unit, state, next);
    *state = next;
}

fn sink_error(sink: &dyn OutputSink, error: GenerationError) -> GenerationError {
    match error {
        e @ GenerationError::SinkError { .. } => e,
        other => GenerationError::SinkError {
            sink_name: sink.name().to_string(),
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

impl GenerationService for GenerationPipeline {
    fn resolve(&self, unit: &ConfigurationUnit, source: &dyn UnitSource) -> Result<Arc<ResolvedUnit>> {
        let mut state = UnitState::Declared;
        self.resolve_tracked(unit, source, &mut state)
    }

    fn generate(
        &self,
        unit: &ConfigurationUnit,
        source: &dyn UnitSource,
        targets: &[ExportTarget],
    ) -> Result<GeneratedUnit> {
        let plan = self.plan(targets)?;
        self.run(unit, source, &plan)
    }

    fn languages(&self) -> Vec<&str> {
        self.exporters.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for GenerationPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("languages", &self.languages())
            .field("identity", &self.identity)
            .finish()
    }
}

/// Builder for constructing a `GenerationPipeline`.
///
/// # Examples
///
/// ```rust
/// use hexgen::adapters::PythonExporter;
/// use hexgen::service::GenerationPipelineBuilder;
/// use std::sync::Arc;
///
/// # fn main() -> hexgen::domain::Result<()> {
/// let pipeline = GenerationPipelineBuilder::new()
///     .with_exporter(Arc::new(PythonExporter::new()))
///     .build()?;
/// assert!(pipeline.exporter("python").is_some());
/// # Ok(())
/// # }
/// ```
pub struct GenerationPipelineBuilder {
    exporters: Vec<Arc<dyn Exporter>>,
    identity: Option<GeneratorIdentity>,
}

impl GenerationPipelineBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            exporters: Vec::new(),
            identity: None,
        }
    }

    /// Registers an exporter.
    pub fn with_exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporters.push(exporter);
        self
    }

    /// Registers every exporter enabled at compile time.
    pub fn with_default_exporters(mut self) -> Self {
        self.exporters.extend(crate::adapters::default_exporters());
        self
    }

    /// Sets the identity written into banners. Defaults to this crate's.
    pub fn with_identity(mut self, identity: GeneratorIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateExporter` if two exporters claim the same language.
    pub fn build(self) -> Result<GenerationPipeline> {
        let mut exporters: IndexMap<String, Arc<dyn Exporter>> = IndexMap::new();
        for exporter in self.exporters {
            let language = exporter.language().to_string();
            if exporters.contains_key(&language) {
                return Err(GenerationError::DuplicateExporter { language });
            }
            tracing::debug!("Registered exporter for '{}'", language);
            exporters.insert(language, exporter);
        }
        Ok(GenerationPipeline {
            exporters,
            identity: self.identity.unwrap_or_default(),
        })
    }
}

impl Default for GenerationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryUnitSource, MemorySink};
    use crate::domain::type_rules::PYTHON_RULES;
    use crate::domain::{ExportOptions, TypeKind, TypeRules};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Mock exporter for testing
    struct MockExporter {
        language: String,
        fail: bool,
    }

    impl MockExporter {
        fn new(language: &str) -> Arc<dyn Exporter> {
            Arc::new(Self {
                language: language.to_string(),
                fail: false,
            })
        }

        fn failing(language: &str) -> Arc<dyn Exporter> {
            Arc::new(Self {
                language: language.to_string(),
                fail: true,
            })
        }
    }

    impl Exporter for MockExporter {
        fn language(&self) -> &str {
            &self.language
        }

        fn type_rules(&self) -> &TypeRules {
            &PYTHON_RULES
        }

        fn render(
            &self,
            unit: &ResolvedUnit,
            _options: &ExportOptions,
            identity: &GeneratorIdentity,
        ) -> Result<String> {
            if self.fail {
                return Err(GenerationError::UnrepresentableValue {
                    language: self.language.clone(),
                    property: "any".to_string(),
                    message: "always fails".to_string(),
                });
            }
            Ok(format!("{}:{}:{}:{}", self.language, unit.id(), unit.len(), identity.name))
        }
    }

    struct CountingSource {
        inner: InMemoryUnitSource,
        lookups: AtomicUsize,
    }

    impl UnitSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn get(&self, id: &UnitId) -> Result<Option<ConfigurationUnit>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.get(id)
        }
    }

    fn pipeline() -> GenerationPipeline {
        GenerationPipeline::builder()
            .with_exporter(MockExporter::new("alpha"))
            .with_exporter(MockExporter::new("beta"))
            .with_exporter(MockExporter::failing("broken"))
            .with_identity(GeneratorIdentity::new("gen", "1.0"))
            .build()
            .unwrap()
    }

    fn unit(id: &str) -> ConfigurationUnit {
        let mut unit = ConfigurationUnit::new(id);
        unit.add_property("value", TypeKind::Integer, 1i64, None).unwrap();
        unit
    }

    #[test]
    fn test_builder_rejects_duplicate_exporter() {
        let result = GenerationPipeline::builder()
            .with_exporter(MockExporter::new("alpha"))
            .with_exporter(MockExporter::new("alpha"))
            .build();
        assert!(matches!(
            result,
            Err(GenerationError::DuplicateExporter { ref language }) if language == "alpha"
        ));
    }

    #[test]
    fn test_languages_in_registration_order() {
        assert_eq!(pipeline().languages(), ["alpha", "beta", "broken"]);
    }

    #[test]
    fn test_outputs_follow_target_order() {
        let targets = [ExportTarget::new("beta"), ExportTarget::new("alpha")];
        let generated = pipeline()
            .generate(&unit("app"), &InMemoryUnitSource::new(), &targets)
            .unwrap();
        let languages: Vec<&str> = generated.languages().collect();
        assert_eq!(languages, ["beta", "alpha"]);
        assert_eq!(generated.get("alpha"), Some("alpha:app:1:gen"));
    }

    #[test]
    fn test_unknown_language_checked_before_resolution() {
        let mut broken = ConfigurationUnit::new("app");
        broken.declare_combined("x", TypeKind::Integer, "${missing} + 1", None).unwrap();
        let err = pipeline()
            .generate(&broken, &InMemoryUnitSource::new(), &[ExportTarget::new("cobol")])
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnknownLanguage { ref language } if language == "cobol"));
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let targets = [ExportTarget::new("alpha"), ExportTarget::new("alpha")];
        let err = pipeline()
            .generate(&unit("app"), &InMemoryUnitSource::new(), &targets)
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOption { ref option, .. } if option == "language"));
    }

    #[test]
    fn test_unit_resolved_once_for_all_targets() {
        let source = CountingSource {
            inner: InMemoryUnitSource::new().with_unit(unit("base")),
            lookups: AtomicUsize::new(0),
        };
        let mut app = ConfigurationUnit::new("app");
        app.include("base");
        let targets = [ExportTarget::new("alpha"), ExportTarget::new("beta")];
        let generated = pipeline().generate(&app, &source, &targets).unwrap();
        assert_eq!(generated.len(), 2);
        assert_eq!(source.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sink_untouched_on_failure() {
        let sink = MemorySink::new();
        let targets = [ExportTarget::new("alpha"), ExportTarget::new("broken")];
        let result = pipeline().generate_into(&unit("app"), &InMemoryUnitSource::new(), &targets, &sink);
        assert!(matches!(result, Err(GenerationError::UnrepresentableValue { .. })));
        assert!(sink.is_empty());

        let targets = [ExportTarget::new("alpha"), ExportTarget::new("beta")];
        pipeline()
            .generate_into(&unit("app"), &InMemoryUnitSource::new(), &targets, &sink)
            .unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get(&UnitId::from("app"), "beta").as_deref(), Some("beta:app:1:gen"));
    }

    #[test]
    fn test_generate_all_keeps_input_order() {
        let units: Vec<ConfigurationUnit> = (0..8).map(|i| unit(&format!("unit{}", i))).collect();
        let generated = pipeline()
            .generate_all(&units, &InMemoryUnitSource::new(), &[ExportTarget::new("alpha")])
            .unwrap();
        let ids: Vec<&str> = generated.iter().map(|g| g.id().as_str()).collect();
        let expected: Vec<String> = (0..8).map(|i| format!("unit{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_generate_all_reports_first_failure() {
        let mut first_bad = ConfigurationUnit::new("first");
        first_bad.declare_combined("x", TypeKind::Integer, "${nope}", None).unwrap();
        let mut second_bad = ConfigurationUnit::new("second");
        second_bad.include("absent");
        let units = [unit("ok"), first_bad, second_bad];
        let err = pipeline()
            .generate_all(&units, &InMemoryUnitSource::new(), &[ExportTarget::new("alpha")])
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnknownReference { .. }));
    }

    #[test]
    fn test_resolve_is_shared() {
        let resolved = pipeline().resolve(&unit("app"), &InMemoryUnitSource::new()).unwrap();
        let shared = Arc::clone(&resolved);
        assert_eq!(shared.get("value").map(|p| p.kind), Some(TypeKind::Integer));
    }
}
