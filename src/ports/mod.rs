// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) at the seams of the generator:
//! where included units come from, how a language is rendered and where rendered
//! text goes. These traits are implemented by adapters in the adapters layer.

pub mod exporter;
pub mod sink;
pub mod source;

// Re-export commonly used types
pub use exporter::Exporter;
pub use sink::OutputSink;
pub use source::UnitSource;
