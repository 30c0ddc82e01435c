// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory unit source.
//!
//! Holds configuration units by id so that inclusions can be resolved without a
//! definition-file reader. Units can be added after the source is shared.

use crate::domain::{ConfigurationUnit, GenerationError, Result, UnitId};
use crate::ports::UnitSource;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A `UnitSource` backed by a map of units.
///
/// # Examples
///
/// ```rust
/// use hexgen::adapters::InMemoryUnitSource;
/// use hexgen::domain::{ConfigurationUnit, TypeKind, UnitId};
/// use hexgen::ports::UnitSource;
///
/// let mut shared = ConfigurationUnit::new("shared");
/// shared.add_property("retries", TypeKind::Integer, 3i64, None).unwrap();
///
/// let source = InMemoryUnitSource::new().with_unit(shared);
/// assert!(source.get(&UnitId::from("shared")).unwrap().is_some());
/// assert!(source.get(&UnitId::from("missing")).unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct InMemoryUnitSource {
    name: String,
    units: RwLock<HashMap<UnitId, ConfigurationUnit>>,
}

impl InMemoryUnitSource {
    /// Creates an empty source named `memory`.
    pub fn new() -> Self {
        Self::named("memory")
    }

    /// Creates an empty source with a custom name.
    pub fn named(name: impl Into<String>) -> Self {
        InMemoryUnitSource {
            name: name.into(),
            units: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a unit, builder style.
    pub fn with_unit(mut self, unit: ConfigurationUnit) -> Self {
        self.units
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit.id().clone(), unit);
        self
    }

    /// Adds or replaces a unit, returning the one it replaced.
    pub fn insert(&self, unit: ConfigurationUnit) -> Result<Option<ConfigurationUnit>> {
        let mut units = self.units.write().map_err(|_| self.poisoned())?;
        tracing::debug!("Registering unit '{}' in source '{}'", unit.id(), self.name);
        Ok(units.insert(unit.id().clone(), unit))
    }

    /// Number of units held.
    pub fn len(&self) -> usize {
        self.units.read().map(|units| units.len()).unwrap_or(0)
    }

    /// Returns `true` if the source holds no units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned(&self) -> GenerationError {
        GenerationError::SourceError {
            source_name: self.name.clone(),
            message: "unit map lock poisoned".to_string(),
            source: None,
        }
    }
}

impl Default for InMemoryUnitSource {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitSource for InMemoryUnitSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, id: &UnitId) -> Result<Option<ConfigurationUnit>> {
        let units = self.units.read().map_err(|_| self.poisoned())?;
        Ok(units.get(id).cloned())
    }
}
