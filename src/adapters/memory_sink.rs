// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory output sink.

use crate::domain::{GenerationError, Result, UnitId};
use crate::ports::OutputSink;
use std::sync::RwLock;

/// One rendered file received by a `MemorySink`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkRecord {
    /// The unit that was rendered.
    pub unit: UnitId,
    /// The target language.
    pub language: String,
    /// The rendered source text.
    pub text: String,
}

/// An `OutputSink` that keeps every write in arrival order.
///
/// # Examples
///
/// ```rust
/// use hexgen::adapters::MemorySink;
/// use hexgen::domain::UnitId;
/// use hexgen::ports::OutputSink;
///
/// let sink = MemorySink::new();
/// sink.write(&UnitId::from("app"), "c", "/* c */").unwrap();
/// assert_eq!(sink.get(&UnitId::from("app"), "c").as_deref(), Some("/* c */"));
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug)]
pub struct MemorySink {
    name: String,
    records: RwLock<Vec<SinkRecord>>,
}

impl MemorySink {
    /// Creates an empty sink named `memory`.
    pub fn new() -> Self {
        MemorySink {
            name: "memory".to_string(),
            records: RwLock::new(Vec::new()),
        }
    }

    /// All records received so far.
    pub fn records(&self) -> Vec<SinkRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// The most recent text written for `unit` and `language`.
    pub fn get(&self, unit: &UnitId, language: &str) -> Option<String> {
        let records = self.records.read().ok()?;
        records
            .iter()
            .rev()
            .find(|r| &r.unit == unit && r.language == language)
            .map(|r| r.text.clone())
    }

    /// Number of writes received.
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, unit: &UnitId, language: &str, text: &str) -> Result<()> {
        let mut records = self.records.write().map_err(|_| GenerationError::SinkError {
            sink_name: self.name.clone(),
            message: "record list lock poisoned".to_string(),
            source: None,
        })?;
        records.push(SinkRecord {
            unit: unit.clone(),
            language: language.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
