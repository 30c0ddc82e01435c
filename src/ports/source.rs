// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unit source trait definition.
//!
//! This module defines the `UnitSource` trait, the port through which the inclusion
//! resolver looks up units referenced by inclusion points. A definition-file front
//! end, a database or a fixed in-memory table can all serve as a source.

use crate::domain::{ConfigurationUnit, Result, UnitId};

/// A trait for looking up configuration units by id.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so independent units can be resolved on
/// several threads against one source.
///
/// # Examples
///
/// ```rust
/// use hexgen::ports::UnitSource;
/// use hexgen::domain::{ConfigurationUnit, Result, TypeKind, UnitId};
///
/// struct OneUnit;
///
/// impl UnitSource for OneUnit {
///     fn name(&self) -> &str {
///         "one-unit"
///     }
///
///     fn get(&self, id: &UnitId) -> Result<Option<ConfigurationUnit>> {
///         if id.as_str() != "base" {
///             return Ok(None);
///         }
///         let mut unit = ConfigurationUnit::new("base");
///         unit.add_property("retries", TypeKind::Integer, 3i64, None)?;
///         Ok(Some(unit))
///     }
/// }
///
/// let mut app = ConfigurationUnit::new("app");
/// app.include("base");
/// let resolved = app.resolve_with(&OneUnit).unwrap();
/// assert_eq!(resolved.len(), 1);
/// ```
pub trait UnitSource: Send + Sync {
    /// Returns the name of this source.
    ///
    /// The name is used in log messages and in `SourceError`s.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hexgen::ports::UnitSource;
    /// # use hexgen::domain::{ConfigurationUnit, Result, UnitId};
    /// # struct Empty;
    /// # impl UnitSource for Empty {
    /// #     fn name(&self) -> &str { "empty" }
    /// #     fn get(&self, _id: &UnitId) -> Result<Option<ConfigurationUnit>> { Ok(None) }
    /// # }
    /// assert_eq!(Empty.name(), "empty");
    /// ```
    fn name(&self) -> &str;

    /// Looks up a unit.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(unit))` - The unit was found
    /// * `Ok(None)` - The source does not know the id
    /// * `Err(GenerationError)` - The lookup itself failed
    fn get(&self, id: &UnitId) -> Result<Option<ConfigurationUnit>>;
}
