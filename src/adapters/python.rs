// SPDX-License-Identifier: MIT OR Apache-2.0

//! Python exporter.
//!
//! Renders a class whose attributes are annotated with `typing.Final`. Regex
//! values are written as raw strings whenever a raw string can hold them.

use crate::adapters::render::{
    escape_string, sanitize_comment, ControlEscape, NamingDefaults, RenderContext,
};
use crate::domain::type_rules::PYTHON_RULES;
use crate::domain::{
    ExportOptions, GeneratorIdentity, NamingConvention, ResolvedUnit, Result, TypeRules,
};
use crate::ports::Exporter;

/// Exporter for the `python` language id.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonExporter;

impl PythonExporter {
    /// Creates a new Python exporter.
    pub fn new() -> Self {
        PythonExporter
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", escape_string(s, '\'', ControlEscape::Hex))
}

// A raw string cannot contain its quote or a line break, cannot end in an odd
// number of backslashes, and is unreadable with control characters.
fn fits_raw_string(s: &str) -> bool {
    let trailing = s.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 0 && !s.chars().any(|c| c == '\'' || c.is_ascii_control())
}

fn regex(s: &str) -> String {
    if fits_raw_string(s) {
        format!("r'{}'", s)
    } else {
        quote(s)
    }
}

impl Exporter for PythonExporter {
    fn language(&self) -> &str {
        "python"
    }

    fn type_rules(&self) -> &TypeRules {
        &PYTHON_RULES
    }

    fn render(
        &self,
        unit: &ResolvedUnit,
        options: &ExportOptions,
        identity: &GeneratorIdentity,
    ) -> Result<String> {
        let ctx = RenderContext::new(
            unit,
            options,
            identity,
            &PYTHON_RULES,
            self.known_options(),
            NamingDefaults {
                property: None,
                type_name: NamingConvention::Pascal,
            },
        )?;
        let pad = ctx.pad(1);

        let mut out = String::new();
        out.push_str(&format!("# {}\n", sanitize_comment(&ctx.banner(), false)));
        out.push_str("from typing import Final\n\n\n");
        out.push_str(&format!("class {}:\n", ctx.type_name));
        if ctx.fields.is_empty() {
            out.push_str(&format!("{}pass\n", pad));
        }
        for field in &ctx.fields {
            let literal = ctx.literal(field, quote, regex)?;
            out.push_str(&format!(
                "{}{}: Final[{}] = {}",
                pad, field.name, field.native_type, literal
            ));
            if let Some(comment) = &field.property.comment {
                out.push_str(&format!("  # {}", sanitize_comment(comment, false)));
            }
            out.push('\n');
        }

        Ok(out)
    }
}
