// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of a unit into concrete, ordered property values.
//!
//! Resolution runs in three steps: inclusions are spliced, a dependency graph is
//! built from every combination and substitution, and derived values are evaluated
//! in topological order. The result is frozen; exporters only ever see a
//! [`ResolvedUnit`].

use crate::domain::errors::{GenerationError, Result};
use crate::domain::expression::coerce_to_kind;
use crate::domain::graph::DependencyGraph;
use crate::domain::inclusion::{splice, SplicedUnit};
use crate::domain::typed_value::TypedValue;
use crate::domain::unit::{ConfigurationUnit, Definition};
use crate::domain::{PropertyName, TypeKind, UnitId};
use crate::ports::UnitSource;
use std::collections::HashMap;

/// A property with its final value.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// The property name.
    pub name: PropertyName,
    /// The declared kind.
    pub kind: TypeKind,
    /// The resolved value, always of `kind`.
    pub value: TypedValue,
    /// Comment emitted next to the generated field.
    pub comment: Option<String>,
    /// Hidden properties are not exported.
    pub hidden: bool,
    /// The unit whose declaration won.
    pub origin: UnitId,
}

/// The immutable, fully resolved form of a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedUnit {
    id: UnitId,
    properties: Vec<Property>,
}

impl ResolvedUnit {
    /// The id of the unit that was resolved.
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// All properties, hidden ones included, in final order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Properties an exporter emits, in final order.
    pub fn exported(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| !p.hidden)
    }

    /// Looks up a property by name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name.as_str() == name)
    }

    /// Number of properties, hidden ones included.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the unit has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

struct NoUnits;

impl UnitSource for NoUnits {
    fn name(&self) -> &str {
        "none"
    }

    fn get(&self, _id: &UnitId) -> Result<Option<ConfigurationUnit>> {
        Ok(None)
    }
}

impl ConfigurationUnit {
    /// Resolves a unit that has no inclusion points.
    ///
    /// Any inclusion fails with `UnknownUnit`; use [`ConfigurationUnit::resolve_with`]
    /// to provide included units.
    pub fn resolve(&self) -> Result<ResolvedUnit> {
        self.resolve_with(&NoUnits)
    }

    /// Resolves the unit, looking up included units in `source`.
    pub fn resolve_with(&self, source: &dyn UnitSource) -> Result<ResolvedUnit> {
        tracing::debug!("Resolving unit '{}'", self.id());
        let spliced = splice(self, source)?;
        resolve_spliced(spliced)
    }
}

/// Evaluates every derived entry of a spliced unit.
pub fn resolve_spliced(spliced: SplicedUnit) -> Result<ResolvedUnit> {
    let SplicedUnit { id, entries } = spliced;

    let positions: HashMap<&PropertyName, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (&e.declaration.name, i))
        .collect();

    let mut graph = DependencyGraph::new(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        for reference in entry.declaration.references() {
            let dependency =
                *positions
                    .get(reference)
                    .ok_or_else(|| GenerationError::UnknownReference {
                        unit: entry.origin.to_string(),
                        property: entry.declaration.name.to_string(),
                        reference: reference.to_string(),
                    })?;
            graph.add_dependency(i, dependency);
        }
    }

    let order = graph
        .topological_order()
        .map_err(|members| GenerationError::CyclicReference {
            unit: id.to_string(),
            cycle: members
                .into_iter()
                .map(|i| entries[i].declaration.name.to_string())
                .collect(),
        })?;

    let mut values: Vec<Option<TypedValue>> = vec![None; entries.len()];
    for i in order {
        let entry = &entries[i];
        let decl = &entry.declaration;
        let lookup = |name: &PropertyName| positions.get(name).and_then(|&j| values[j].as_ref());
        let expression_error = |message: String| GenerationError::ExpressionType {
            unit: entry.origin.to_string(),
            property: decl.name.to_string(),
            message,
        };

        let value = match &decl.definition {
            Definition::Literal(value) => value.clone(),
            Definition::Combined(expr) => {
                let raw = expr.evaluate(&lookup).map_err(expression_error)?;
                coerce_to_kind(raw, decl.kind).map_err(expression_error)?
            }
            Definition::Substituted(template) => {
                TypedValue::Text(template.render(&lookup).map_err(expression_error)?)
            }
        };
        if decl.is_derived() {
            tracing::debug!("Resolved '{}' to {}", decl.name, value);
        }
        values[i] = Some(value);
    }

    let properties = entries
        .into_iter()
        .zip(values)
        .map(|(entry, value)| {
            let decl = entry.declaration;
            let value = value.ok_or_else(|| GenerationError::ExpressionType {
                unit: entry.origin.to_string(),
                property: decl.name.to_string(),
                message: "no value was computed".to_string(),
            })?;
            Ok(Property {
                name: decl.name,
                kind: decl.kind,
                value,
                comment: decl.comment,
                hidden: decl.hidden,
                origin: entry.origin,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Resolved unit '{}' with {} properties", id, properties.len());
    Ok(ResolvedUnit { id, properties })
}
