// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture generator of typed configuration constants.
//!
//! This crate turns configuration units (named, typed properties, some derived from
//! others by arithmetic combination or string substitution, some pulled in from
//! included units) into type-safe constant declarations for several programming
//! languages.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and logic (`ConfigurationUnit`, `TypedValue`,
//!   expressions, templates, inclusion and resolution, type rules, errors)
//! - **Ports**: Trait definitions at the seams (`UnitSource`, `Exporter`, `OutputSink`)
//! - **Adapters**: One exporter per target language plus in-memory sources and sinks
//! - **Service**: The generation pipeline that orchestrates everything
//!
//! # Features
//!
//! - **Six Languages**: C, Java, JavaScript, TypeScript, Python and Go
//! - **Derived Properties**: `${name}` substitution and arithmetic/logic combination
//! - **Inclusion**: Units can splice in other units, with later declarations winning
//! - **Target Checks**: Reserved words, integer ranges and name collisions are
//!   reported before any text is produced
//!
//! # Feature Flags
//!
//! - `c`, `java`, `javascript`, `typescript`, `python`, `go`: One flag per built-in
//!   exporter (all default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use hexgen::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let mut unit = ConfigurationUnit::new("server-config");
//! unit.add_property("host", TypeKind::String, "localhost", None)?;
//! unit.add_property("port", TypeKind::Integer, 8080i64, Some("Listening port."))?;
//! unit.declare_substituted("url", "http://${host}:${port}", None)?;
//!
//! let pipeline = GenerationPipeline::builder()
//!     .with_default_exporters()
//!     .with_identity(GeneratorIdentity::new("hexgen", "0.1.0"))
//!     .build()?;
//! let generated = pipeline.generate(
//!     &unit,
//!     &InMemoryUnitSource::new(),
//!     &[ExportTarget::new("typescript")],
//! )?;
//!
//! let text = generated.get("typescript").unwrap();
//! assert!(text.contains("public static readonly url: string = 'http://localhost:8080';"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigurationUnit, ExportOptions, ExportTarget, GeneratedUnit, GenerationError,
        GenerationService, GeneratorIdentity, NamingConvention, RawDeclaration, ResolvedUnit,
        Result, TypeKind, TypedValue, UnitId,
    };
    pub use crate::ports::{Exporter, OutputSink, UnitSource};
    pub use crate::service::{GenerationPipeline, GenerationPipelineBuilder};

    pub use crate::adapters::{InMemoryUnitSource, MemorySink};

    // Re-export exporters based on feature flags
    #[cfg(feature = "c")]
    pub use crate::adapters::CExporter;
    #[cfg(feature = "go")]
    pub use crate::adapters::GoExporter;
    #[cfg(feature = "java")]
    pub use crate::adapters::JavaExporter;
    #[cfg(feature = "javascript")]
    pub use crate::adapters::JavaScriptExporter;
    #[cfg(feature = "python")]
    pub use crate::adapters::PythonExporter;
    #[cfg(feature = "typescript")]
    pub use crate::adapters::TypeScriptExporter;
}
