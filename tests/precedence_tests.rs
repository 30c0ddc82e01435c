// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for inclusion precedence.
//!
//! Later declarations win: a unit's own property declared after an inclusion
//! overrides the included one, and an included property overrides an earlier
//! declaration of the including unit. The overridden slot keeps its position.

mod common;

use hexgen::prelude::*;

fn names(unit: &ResolvedUnit) -> Vec<&str> {
    unit.exported().map(|p| p.name.as_str()).collect()
}

fn base() -> ConfigurationUnit {
    let mut base = ConfigurationUnit::new("base");
    base.add_property("host", TypeKind::String, "base.local", Some("From base."))
        .unwrap();
    base.add_property("port", TypeKind::Integer, 80i64, None).unwrap();
    base
}

#[test]
fn test_own_declaration_after_include_wins() {
    let source = InMemoryUnitSource::new().with_unit(base());
    let mut app = ConfigurationUnit::new("app");
    app.include("base");
    app.add_property("port", TypeKind::Integer, 8080i64, None).unwrap();

    let resolved = app.resolve_with(&source).unwrap();
    assert_eq!(names(&resolved), ["host", "port"]);
    let port = resolved.get("port").unwrap();
    assert_eq!(port.value, TypedValue::Int(8080));
    assert_eq!(port.origin.as_str(), "app");
    assert_eq!(resolved.get("host").unwrap().origin.as_str(), "base");
}

#[test]
fn test_include_after_declaration_wins_but_keeps_position() {
    let source = InMemoryUnitSource::new().with_unit(base());
    let mut app = ConfigurationUnit::new("app");
    app.add_property("port", TypeKind::Integer, 8080i64, Some("App port.")).unwrap();
    app.add_property("debug", TypeKind::Boolean, true, None).unwrap();
    app.include("base");

    let resolved = app.resolve_with(&source).unwrap();
    assert_eq!(names(&resolved), ["port", "debug", "host"]);
    let port = resolved.get("port").unwrap();
    assert_eq!(port.value, TypedValue::Int(80));
    assert_eq!(port.comment, None);
}

#[test]
fn test_derived_property_sees_overriding_value() {
    let source = InMemoryUnitSource::new().with_unit(base());
    let mut app = ConfigurationUnit::new("app");
    app.include("base");
    app.declare_substituted("url", "http://${host}:${port}", None).unwrap();
    app.add_property("host", TypeKind::String, "app.local", None).unwrap();

    let resolved = app.resolve_with(&source).unwrap();
    assert_eq!(
        resolved.get("url").unwrap().value,
        TypedValue::from("http://app.local:80")
    );
}

#[test]
fn test_conflicting_derived_definitions() {
    let mut shared = ConfigurationUnit::new("shared");
    shared.add_property("a", TypeKind::Integer, 1i64, None).unwrap();
    shared.declare_combined("twice", TypeKind::Integer, "${a} * 2", None).unwrap();
    let source = InMemoryUnitSource::new().with_unit(shared);

    let mut app = ConfigurationUnit::new("app");
    app.declare_combined("twice", TypeKind::Integer, "${a} + ${a}", None).unwrap();
    app.include("shared");

    let err = app.resolve_with(&source).unwrap_err();
    assert!(matches!(err, GenerationError::DuplicateName { ref name, .. } if name == "twice"));
}

#[test]
fn test_same_unit_on_two_paths() {
    let mut left = ConfigurationUnit::new("left");
    left.include("base");
    let mut right = ConfigurationUnit::new("right");
    right.include("base");
    let source = InMemoryUnitSource::new()
        .with_unit(base())
        .with_unit(left)
        .with_unit(right);

    let mut app = ConfigurationUnit::new("app");
    app.include("left");
    app.include("right");
    let resolved = app.resolve_with(&source).unwrap();
    assert_eq!(names(&resolved), ["host", "port"]);
}

#[test]
fn test_cyclic_include_reports_chain() {
    let mut a = ConfigurationUnit::new("a");
    a.include("b");
    let mut b = ConfigurationUnit::new("b");
    b.include("c");
    let mut c = ConfigurationUnit::new("c");
    c.include("b");
    let source = InMemoryUnitSource::new().with_unit(b).with_unit(c);

    let err = a.resolve_with(&source).unwrap_err();
    match err {
        GenerationError::CyclicInclude { chain } => assert_eq!(chain, ["b", "c", "b"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_self_include() {
    let mut a = ConfigurationUnit::new("a");
    a.include("a");
    let err = a.resolve_with(&InMemoryUnitSource::new()).unwrap_err();
    assert!(matches!(err, GenerationError::CyclicInclude { .. }));
}

#[test]
fn test_unknown_include() {
    let err = common::test_config()
        .resolve_with(&InMemoryUnitSource::new())
        .unwrap_err();
    assert!(matches!(
        err,
        GenerationError::UnknownUnit { ref unit, ref included_by }
            if unit == "test-include" && included_by == "test-config"
    ));
}

#[test]
fn test_cyclic_reference_names_members() {
    let mut unit = ConfigurationUnit::new("loop");
    unit.declare_combined("a", TypeKind::Integer, "${b} + 1", None).unwrap();
    unit.declare_combined("b", TypeKind::Integer, "${a} + 1", None).unwrap();
    unit.add_property("c", TypeKind::Integer, 3i64, None).unwrap();

    match unit.resolve().unwrap_err() {
        GenerationError::CyclicReference { cycle, .. } => {
            assert!(cycle.contains(&"a".to_string()));
            assert!(cycle.contains(&"b".to_string()));
            assert!(!cycle.contains(&"c".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}
