// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the configuration model and its resolution.
//!
//! This module holds the types every other layer builds on: value kinds and
//! typed values, units and their declarations, the expression and template
//! languages, inclusion and dependency resolution, per-language type rules,
//! export targets and errors. It does not know about any concrete exporter.

pub mod errors;
pub mod expression;
pub mod graph;
pub mod identity;
pub mod inclusion;
pub mod names;
pub mod naming;
pub mod options;
pub mod resolution;
pub mod service;
pub mod template;
pub mod type_kind;
pub mod type_rules;
pub mod typed_value;
pub mod unit;

// Re-export commonly used types
pub use errors::{GenerationError, Result};
pub use expression::{Expression, SyntaxError};
pub use identity::GeneratorIdentity;
pub use names::{is_identifier, PropertyName, UnitId};
pub use naming::NamingConvention;
pub use options::{ExportOptions, ExportTarget, OptionValue};
pub use resolution::{Property, ResolvedUnit};
pub use service::{GeneratedUnit, GenerationService, UnitState};
pub use template::Template;
pub use type_kind::TypeKind;
pub use type_rules::{builtin_languages, builtin_rules, TypeRules};
pub use typed_value::{Fragment, Text, TypedValue};
pub use unit::{ConfigurationUnit, Declaration, Definition, RawDeclaration, RawValue, UnitItem};
