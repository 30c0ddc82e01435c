// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the generation pipeline.
//!
//! This module contains the concrete implementation of the `GenerationService`
//! trait, which ties unit sources, exporters and output sinks together.

pub mod pipeline;

// Re-export commonly used types
pub use pipeline::{GenerationPipeline, GenerationPipelineBuilder};
