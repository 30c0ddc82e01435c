// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing the exporters and in-memory collaborators.
//!
//! Every built-in target language has its own exporter behind a feature flag. The
//! in-memory unit source and sink are always available.

pub mod memory_sink;
pub mod memory_source;
pub mod render;

#[cfg(feature = "c")]
pub mod c;
#[cfg(feature = "go")]
pub mod go;
#[cfg(feature = "java")]
pub mod java;
#[cfg(feature = "javascript")]
pub mod javascript;
#[cfg(feature = "python")]
pub mod python;
#[cfg(feature = "typescript")]
pub mod typescript;

pub use memory_sink::{MemorySink, SinkRecord};
pub use memory_source::InMemoryUnitSource;

// Re-export exporters based on feature flags
#[cfg(feature = "c")]
pub use c::CExporter;
#[cfg(feature = "go")]
pub use go::GoExporter;
#[cfg(feature = "java")]
pub use java::JavaExporter;
#[cfg(feature = "javascript")]
pub use javascript::{JavaScriptExporter, ModuleStyle};
#[cfg(feature = "python")]
pub use python::PythonExporter;
#[cfg(feature = "typescript")]
pub use typescript::TypeScriptExporter;

use crate::ports::Exporter;
use std::sync::Arc;

/// One instance of every exporter enabled at compile time.
///
/// # Examples
///
/// ```rust
/// let languages: Vec<String> = hexgen::adapters::default_exporters()
///     .iter()
///     .map(|e| e.language().to_string())
///     .collect();
/// assert!(languages.contains(&"python".to_string()));
/// ```
pub fn default_exporters() -> Vec<Arc<dyn Exporter>> {
    #[allow(unused_mut)]
    let mut exporters: Vec<Arc<dyn Exporter>> = Vec::new();
    #[cfg(feature = "c")]
    exporters.push(Arc::new(CExporter::new()));
    #[cfg(feature = "java")]
    exporters.push(Arc::new(JavaExporter::new()));
    #[cfg(feature = "javascript")]
    exporters.push(Arc::new(JavaScriptExporter::new()));
    #[cfg(feature = "typescript")]
    exporters.push(Arc::new(TypeScriptExporter::new()));
    #[cfg(feature = "python")]
    exporters.push(Arc::new(PythonExporter::new()));
    #[cfg(feature = "go")]
    exporters.push(Arc::new(GoExporter::new()));
    exporters
}
