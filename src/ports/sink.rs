// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output sink trait definition.
//!
//! Rendering never touches the file system. A sink receives each finished output
//! and decides where it goes.

use crate::domain::{Result, UnitId};

/// A trait for consumers of rendered source text.
///
/// The pipeline only calls a sink once every target of a unit rendered
/// successfully, so a sink never sees partial results.
///
/// # Examples
///
/// ```rust
/// use hexgen::ports::OutputSink;
/// use hexgen::domain::{Result, UnitId};
///
/// struct Stdout;
///
/// impl OutputSink for Stdout {
///     fn name(&self) -> &str {
///         "stdout"
///     }
///
///     fn write(&self, unit: &UnitId, language: &str, text: &str) -> Result<()> {
///         println!("// {} ({})\n{}", unit, language, text);
///         Ok(())
///     }
/// }
/// ```
pub trait OutputSink: Send + Sync {
    /// Returns the name of this sink, used in log messages and `SinkError`s.
    fn name(&self) -> &str;

    /// Receives the rendered text of `unit` for `language`.
    fn write(&self, unit: &UnitId, language: &str, text: &str) -> Result<()>;
}
