// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the generator.
//!
//! This module defines every error that can occur while declaring a configuration
//! unit, resolving it, or rendering it for a target language. All errors use
//! `thiserror` and carry enough context (unit, property, language) to locate the
//! offending declaration.

use crate::domain::TypeKind;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The main error type for generation operations.
///
/// Every variant is deterministic given fixed input, so none of them is retried.
/// The enum is marked `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use hexgen::domain::errors::GenerationError;
///
/// fn lookup() -> Result<(), GenerationError> {
///     Err(GenerationError::UnknownReference {
///         unit: "app".to_string(),
///         property: "greeting".to_string(),
///         reference: "name".to_string(),
///     })
/// }
///
/// assert!(lookup().unwrap_err().to_string().contains("greeting"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// A name was declared twice in one declaration scope, or two derived
    /// entries with different definitions collided during inclusion.
    #[error("Property '{name}' is already declared in unit '{unit}'")]
    DuplicateName {
        /// The unit in which the collision happened
        unit: String,
        /// The colliding property name
        name: String,
    },

    /// A combination or substitution refers to an undeclared name.
    #[error("Property '{property}' in unit '{unit}' references unknown property '{reference}'")]
    UnknownReference {
        /// The unit declaring the referencing property
        unit: String,
        /// The referencing property
        property: String,
        /// The name that could not be found
        reference: String,
    },

    /// The combination/substitution dependency graph has no topological order.
    #[error("Cyclic reference in unit '{unit}' between: {}", .cycle.join(", "))]
    CyclicReference {
        /// The unit being resolved
        unit: String,
        /// The properties taking part in the cycle, in declaration order
        cycle: Vec<String>,
    },

    /// The inclusion graph has a cycle.
    #[error("Cyclic inclusion: {}", .chain.join(" -> "))]
    CyclicInclude {
        /// The chain of unit ids, ending with the unit that closes the cycle
        chain: Vec<String>,
    },

    /// An exporter has no representation for a kind.
    #[error("Language '{language}' cannot represent {kind} (property '{property}')")]
    UnsupportedTypeForTarget {
        /// The target language
        language: String,
        /// The property whose kind is unsupported
        property: String,
        /// The unsupported kind
        kind: TypeKind,
    },

    /// A name is not a valid identifier.
    #[error("'{name}' is not a valid property name")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// A declaration used an unknown type tag.
    #[error("Unknown property type '{tag}' for property '{property}'")]
    UnknownType {
        /// The property being declared
        property: String,
        /// The unrecognised tag
        tag: String,
    },

    /// A value does not fit the declared kind.
    #[error("Invalid {kind} value for property '{property}': {message}")]
    InvalidValue {
        /// The property being declared or resolved
        property: String,
        /// The declared kind
        kind: TypeKind,
        /// What was wrong with the value
        message: String,
        /// The underlying conversion error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A combination expression could not be parsed.
    #[error("Invalid expression for property '{property}': {message}")]
    InvalidExpression {
        /// The property being declared
        property: String,
        /// The syntax problem
        message: String,
    },

    /// A substitution template could not be parsed.
    #[error("Invalid template for property '{property}': {message}")]
    InvalidTemplate {
        /// The property being declared
        property: String,
        /// The syntax problem
        message: String,
    },

    /// Evaluating a combination failed (type mismatch, overflow, division by zero).
    #[error("Cannot evaluate property '{property}' in unit '{unit}': {message}")]
    ExpressionType {
        /// The unit declaring the property
        unit: String,
        /// The property being evaluated
        property: String,
        /// Why evaluation failed
        message: String,
    },

    /// An inclusion refers to a unit the unit source does not know.
    #[error("Unit '{included_by}' includes unknown unit '{unit}'")]
    UnknownUnit {
        /// The missing unit
        unit: String,
        /// The unit holding the inclusion point
        included_by: String,
    },

    /// A target names a language no exporter is registered for.
    #[error("No exporter registered for language '{language}'")]
    UnknownLanguage {
        /// The requested language id
        language: String,
    },

    /// Two exporters were registered for one language.
    #[error("More than one exporter registered for language '{language}'")]
    DuplicateExporter {
        /// The language id registered twice
        language: String,
    },

    /// A required target option is missing.
    #[error("Language '{language}' requires option '{option}'")]
    MissingOption {
        /// The target language
        language: String,
        /// The missing option
        option: String,
    },

    /// A target option has the wrong type or an unacceptable value.
    #[error("Invalid option '{option}': {message}")]
    InvalidOption {
        /// The offending option
        option: String,
        /// What was wrong with it
        message: String,
    },

    /// A value cannot be represented exactly by the target's native type.
    #[error("Language '{language}' cannot represent the value of property '{property}': {message}")]
    UnrepresentableValue {
        /// The target language
        language: String,
        /// The property holding the value
        property: String,
        /// Why the value does not fit
        message: String,
    },

    /// A (possibly converted) name collides with a reserved word of the target.
    #[error("'{name}' is a reserved word in language '{language}'")]
    ReservedIdentifier {
        /// The target language
        language: String,
        /// The rejected identifier
        name: String,
    },

    /// An error occurred in a unit source.
    #[error("Unit source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred while handing rendered text to a sink.
    #[error("Output sink '{sink_name}' error: {message}")]
    SinkError {
        /// The name of the sink
        sink_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GenerationError {
    /// Creates an `InvalidValue` error from a `ParseIntError`.
    pub fn from_parse_int_error(property: &str, kind: TypeKind, err: ParseIntError) -> Self {
        GenerationError::InvalidValue {
            property: property.to_string(),
            kind,
            message: "not an integer".to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates an `InvalidValue` error from a `ParseFloatError`.
    pub fn from_parse_float_error(property: &str, kind: TypeKind, err: ParseFloatError) -> Self {
        GenerationError::InvalidValue {
            property: property.to_string(),
            kind,
            message: "not a number".to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates an `InvalidValue` error without an underlying cause.
    pub fn invalid_value(property: &str, kind: TypeKind, message: impl Into<String>) -> Self {
        GenerationError::InvalidValue {
            property: property.to_string(),
            kind,
            message: message.into(),
            source: None,
        }
    }
}

/// A specialized Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;
