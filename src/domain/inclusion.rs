// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inclusion resolution.
//!
//! Included units are spliced in place of their inclusion point, recursively. When a
//! name shows up again, the later declaration replaces value and comment while the
//! entry keeps the position of the first occurrence.

use crate::domain::errors::{GenerationError, Result};
use crate::domain::unit::{ConfigurationUnit, Declaration, UnitItem};
use crate::domain::{PropertyName, UnitId};
use crate::ports::UnitSource;
use indexmap::IndexMap;

/// A declaration after splicing, remembering which unit it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct SplicedEntry {
    /// The unit that declared the winning definition.
    pub origin: UnitId,
    /// The winning declaration.
    pub declaration: Declaration,
}

/// The flat, ordered declarations of a unit and everything it includes.
#[derive(Clone, Debug, PartialEq)]
pub struct SplicedUnit {
    /// The root unit's id.
    pub id: UnitId,
    /// Entries in final order.
    pub entries: Vec<SplicedEntry>,
}

/// Splices every included unit into `unit`.
///
/// Fails with `CyclicInclude` when a unit includes itself directly or
/// transitively, and with `UnknownUnit` when `source` cannot provide an included
/// unit. Including the same unit along two different paths is allowed.
pub fn splice(unit: &ConfigurationUnit, source: &dyn UnitSource) -> Result<SplicedUnit> {
    let mut resolver = InclusionResolver {
        source,
        stack: Vec::new(),
        entries: IndexMap::new(),
    };
    resolver.splice_unit(unit)?;

    tracing::debug!(
        "Spliced unit '{}' into {} entries",
        unit.id(),
        resolver.entries.len()
    );

    Ok(SplicedUnit {
        id: unit.id().clone(),
        entries: resolver.entries.into_values().collect(),
    })
}

struct InclusionResolver<'s> {
    source: &'s dyn UnitSource,
    stack: Vec<UnitId>,
    entries: IndexMap<PropertyName, SplicedEntry>,
}

impl InclusionResolver<'_> {
    fn splice_unit(&mut self, unit: &ConfigurationUnit) -> Result<()> {
        self.stack.push(unit.id().clone());

        for item in unit.items() {
            match item {
                UnitItem::Property(decl) => self.merge(unit.id(), decl)?,
                UnitItem::Include(child_id) => {
                    if let Some(start) = self.stack.iter().position(|id| id == child_id) {
                        let mut chain: Vec<String> =
                            self.stack[start..].iter().map(|id| id.to_string()).collect();
                        chain.push(child_id.to_string());
                        return Err(GenerationError::CyclicInclude { chain });
                    }

                    let child = self.source.get(child_id)?.ok_or_else(|| {
                        GenerationError::UnknownUnit {
                            unit: child_id.to_string(),
                            included_by: unit.id().to_string(),
                        }
                    })?;

                    tracing::debug!(
                        "Including unit '{}' into '{}' from source '{}'",
                        child_id,
                        unit.id(),
                        self.source.name()
                    );
                    self.splice_unit(&child)?;
                }
            }
        }

        self.stack.pop();
        Ok(())
    }

    fn merge(&mut self, origin: &UnitId, decl: &Declaration) -> Result<()> {
        if let Some(existing) = self.entries.get(&decl.name) {
            let conflicting = existing.declaration.is_derived()
                && decl.is_derived()
                && (existing.declaration.kind != decl.kind
                    || existing.declaration.definition != decl.definition);
            if conflicting {
                return Err(GenerationError::DuplicateName {
                    unit: origin.to_string(),
                    name: decl.name.to_string(),
                });
            }
            tracing::debug!(
                "Property '{}' from unit '{}' overrides the one from '{}'",
                decl.name,
                origin,
                existing.origin
            );
        }

        // IndexMap keeps the original slot when a key is inserted again.
        self.entries.insert(
            decl.name.clone(),
            SplicedEntry {
                origin: origin.clone(),
                declaration: decl.clone(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::unit::Definition;
    use crate::domain::{TypeKind, TypedValue};
    use std::collections::HashMap;

    struct Units(HashMap<UnitId, ConfigurationUnit>);

    impl Units {
        fn new(units: Vec<ConfigurationUnit>) -> Self {
            Units(units.into_iter().map(|u| (u.id().clone(), u)).collect())
        }
    }

    impl UnitSource for Units {
        fn name(&self) -> &str {
            "units"
        }

        fn get(&self, id: &UnitId) -> Result<Option<ConfigurationUnit>> {
            Ok(self.0.get(id).cloned())
        }
    }

    fn names(spliced: &SplicedUnit) -> Vec<&str> {
        spliced
            .entries
            .iter()
            .map(|e| e.declaration.name.as_str())
            .collect()
    }

    fn literal(entry: &SplicedEntry) -> &TypedValue {
        match &entry.declaration.definition {
            Definition::Literal(v) => v,
            other => panic!("not a literal: {other:?}"),
        }
    }

    #[test]
    fn test_splice_at_inclusion_point() {
        let mut base = ConfigurationUnit::new("base");
        base.add_property("b1", TypeKind::Integer, 1i64, None).unwrap();
        base.add_property("b2", TypeKind::Integer, 2i64, None).unwrap();

        let mut app = ConfigurationUnit::new("app");
        app.add_property("a1", TypeKind::Integer, 0i64, None).unwrap();
        app.include("base");
        app.add_property("a2", TypeKind::Integer, 3i64, None).unwrap();

        let spliced = splice(&app, &Units::new(vec![base])).unwrap();
        assert_eq!(names(&spliced), ["a1", "b1", "b2", "a2"]);
        assert_eq!(spliced.entries[1].origin, UnitId::from("base"));
    }

    #[test]
    fn test_later_definition_wins_keeping_position() {
        let mut base = ConfigurationUnit::new("base");
        base.add_property("x", TypeKind::Integer, 2i64, Some("from base")).unwrap();

        let mut app = ConfigurationUnit::new("app");
        app.add_property("x", TypeKind::Integer, 1i64, Some("from app")).unwrap();
        app.add_property("y", TypeKind::Integer, 5i64, None).unwrap();
        app.include("base");

        let spliced = splice(&app, &Units::new(vec![base])).unwrap();
        assert_eq!(names(&spliced), ["x", "y"]);
        assert_eq!(literal(&spliced.entries[0]), &TypedValue::Int(2));
        assert_eq!(
            spliced.entries[0].declaration.comment.as_deref(),
            Some("from base")
        );
    }

    #[test]
    fn test_transitive_inclusion() {
        let mut leaf = ConfigurationUnit::new("leaf");
        leaf.add_property("l", TypeKind::Boolean, true, None).unwrap();
        let mut mid = ConfigurationUnit::new("mid");
        mid.include("leaf");
        mid.add_property("m", TypeKind::Boolean, false, None).unwrap();
        let mut root = ConfigurationUnit::new("root");
        root.include("mid");

        let spliced = splice(&root, &Units::new(vec![leaf, mid])).unwrap();
        assert_eq!(names(&spliced), ["l", "m"]);
    }

    #[test]
    fn test_cycle_reports_chain() {
        let mut a = ConfigurationUnit::new("a");
        a.include("b");
        let mut b = ConfigurationUnit::new("b");
        b.include("a");

        let source = Units::new(vec![a.clone(), b]);
        let err = splice(&a, &source).unwrap_err();
        match err {
            GenerationError::CyclicInclude { chain } => assert_eq!(chain, ["a", "b", "a"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_self_inclusion() {
        let mut a = ConfigurationUnit::new("a");
        a.include("a");
        let err = splice(&a, &Units::new(vec![])).unwrap_err();
        assert!(matches!(err, GenerationError::CyclicInclude { .. }));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut shared = ConfigurationUnit::new("shared");
        shared.add_property("s", TypeKind::Integer, 1i64, None).unwrap();
        let mut left = ConfigurationUnit::new("left");
        left.include("shared");
        let mut right = ConfigurationUnit::new("right");
        right.include("shared");
        let mut root = ConfigurationUnit::new("root");
        root.include("left");
        root.include("right");

        let spliced = splice(&root, &Units::new(vec![shared, left, right])).unwrap();
        assert_eq!(names(&spliced), ["s"]);
    }

    #[test]
    fn test_unknown_unit() {
        let mut app = ConfigurationUnit::new("app");
        app.include("ghost");
        let err = splice(&app, &Units::new(vec![])).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UnknownUnit { ref unit, ref included_by } if unit == "ghost" && included_by == "app"
        ));
    }

    #[test]
    fn test_conflicting_derived_definitions() {
        let mut base = ConfigurationUnit::new("base");
        base.declare_combined("total", TypeKind::Integer, "1 + 1", None).unwrap();
        let mut app = ConfigurationUnit::new("app");
        app.declare_combined("total", TypeKind::Integer, "2 + 2", None).unwrap();
        app.include("base");

        let err = splice(&app, &Units::new(vec![base])).unwrap_err();
        assert!(matches!(err, GenerationError::DuplicateName { .. }));
    }

    #[test]
    fn test_identical_derived_definitions_merge() {
        let mut base = ConfigurationUnit::new("base");
        base.declare_substituted("greeting", "Hi ${name}", None).unwrap();
        let mut app = ConfigurationUnit::new("app");
        app.declare_substituted("greeting", "Hi ${name}", Some("same")).unwrap();
        app.include("base");

        let spliced = splice(&app, &Units::new(vec![base])).unwrap();
        assert_eq!(spliced.entries.len(), 1);
        assert_eq!(spliced.entries[0].origin, UnitId::from("base"));
    }

    #[test]
    fn test_literal_overrides_derived() {
        let mut base = ConfigurationUnit::new("base");
        base.add_property("total", TypeKind::Integer, 9i64, None).unwrap();
        let mut app = ConfigurationUnit::new("app");
        app.declare_combined("total", TypeKind::Integer, "2 + 2", None).unwrap();
        app.include("base");

        let spliced = splice(&app, &Units::new(vec![base])).unwrap();
        assert_eq!(literal(&spliced.entries[0]), &TypedValue::Int(9));
    }
}
