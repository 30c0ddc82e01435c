// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation service trait definition.
//!
//! This module defines the `GenerationService` trait, the main interface for turning
//! configuration units into source files, together with the per-unit state machine
//! and the output type it produces.

use crate::domain::{ConfigurationUnit, ExportTarget, ResolvedUnit, Result, UnitId};
use crate::ports::UnitSource;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// The main generation service trait.
///
/// # Examples
///
/// ```rust
/// use hexgen::domain::{
///     ConfigurationUnit, ExportTarget, GeneratedUnit, GenerationService, ResolvedUnit, Result,
/// };
/// use hexgen::ports::UnitSource;
/// use std::sync::Arc;
///
/// struct Resolver;
///
/// impl GenerationService for Resolver {
///     fn resolve(
///         &self,
///         unit: &ConfigurationUnit,
///         source: &dyn UnitSource,
///     ) -> Result<Arc<ResolvedUnit>> {
///         unit.resolve_with(source).map(Arc::new)
///     }
///
///     fn generate(
///         &self,
///         unit: &ConfigurationUnit,
///         _source: &dyn UnitSource,
///         _targets: &[ExportTarget],
///     ) -> Result<GeneratedUnit> {
///         Ok(GeneratedUnit::new(unit.id().clone()))
///     }
///
///     fn languages(&self) -> Vec<&str> {
///         vec![]
///     }
/// }
/// ```
pub trait GenerationService {
    /// Splices inclusions and evaluates every derived property of `unit`.
    ///
    /// The result is frozen and shared; exporters only read it.
    fn resolve(&self, unit: &ConfigurationUnit, source: &dyn UnitSource)
        -> Result<Arc<ResolvedUnit>>;

    /// Resolves `unit` once and renders it for every target, in target order.
    ///
    /// Fails on the first error without returning partial output.
    fn generate(
        &self,
        unit: &ConfigurationUnit,
        source: &dyn UnitSource,
        targets: &[ExportTarget],
    ) -> Result<GeneratedUnit>;

    /// Languages this service can render.
    fn languages(&self) -> Vec<&str>;
}

/// Where a unit is in its trip through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitState {
    /// Built from declarations, nothing evaluated yet.
    Declared,
    /// Inclusions and derived values are being resolved.
    Resolving,
    /// Frozen and ready for exporters.
    Resolved,
    /// Rendered for every target.
    Rendered,
    /// Resolution or rendering failed; terminal.
    Failed,
}

impl UnitState {
    /// Returns `true` if moving from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: UnitState) -> bool {
        matches!(
            (self, next),
            (UnitState::Declared, UnitState::Resolving)
                | (UnitState::Resolving, UnitState::Resolved)
                | (UnitState::Resolving, UnitState::Failed)
                | (UnitState::Resolved, UnitState::Rendered)
                | (UnitState::Resolved, UnitState::Failed)
        )
    }

    /// Returns `true` for `Rendered` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, UnitState::Rendered | UnitState::Failed)
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitState::Declared => "declared",
            UnitState::Resolving => "resolving",
            UnitState::Resolved => "resolved",
            UnitState::Rendered => "rendered",
            UnitState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Rendered source text of one unit, keyed by language in target order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedUnit {
    id: UnitId,
    outputs: IndexMap<String, String>,
}

impl GeneratedUnit {
    /// Creates an empty result for `id`.
    pub fn new(id: UnitId) -> Self {
        GeneratedUnit {
            id,
            outputs: IndexMap::new(),
        }
    }

    /// Adds the output for `language`.
    pub fn insert(&mut self, language: impl Into<String>, text: String) {
        self.outputs.insert(language.into(), text);
    }

    /// The id of the unit that was rendered.
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// The output for `language`.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.outputs.get(language).map(String::as_str)
    }

    /// Languages and outputs in target order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outputs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Languages in target order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    /// Number of outputs.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns `true` if nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Consumes the result, returning the outputs.
    pub fn into_outputs(self) -> IndexMap<String, String> {
        self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            UnitState::Declared,
            UnitState::Resolving,
            UnitState::Resolved,
            UnitState::Rendered,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        assert!(UnitState::Rendered.is_terminal());
    }

    #[test]
    fn test_failure_transitions() {
        assert!(UnitState::Resolving.can_transition_to(UnitState::Failed));
        assert!(UnitState::Resolved.can_transition_to(UnitState::Failed));
        assert!(!UnitState::Declared.can_transition_to(UnitState::Resolved));
        assert!(!UnitState::Failed.can_transition_to(UnitState::Resolving));
        assert!(!UnitState::Rendered.can_transition_to(UnitState::Resolving));
    }

    #[test]
    fn test_generated_unit_keeps_target_order() {
        let mut generated = GeneratedUnit::new(UnitId::from("app"));
        generated.insert("python", "py".to_string());
        generated.insert("c", "c".to_string());
        let languages: Vec<&str> = generated.languages().collect();
        assert_eq!(languages, ["python", "c"]);
        assert_eq!(generated.get("c"), Some("c"));
        assert_eq!(generated.len(), 2);
        assert_eq!(generated.id().as_str(), "app");
    }
}
