// SPDX-License-Identifier: MIT OR Apache-2.0

//! C header exporter.
//!
//! Renders a header with an include guard and a single `const` instance of an
//! anonymous struct:
//!
//! ```c
//! #ifndef TEST_CONFIG_H
//! #define TEST_CONFIG_H
//!
//! /* Generated with hexgen v0.1.0. */
//! const struct {
//!     unsigned char myBoolean;
//!     int myInteger;
//! } TestConfig = {
//!     1,
//!     142,
//! };
//!
//! #endif /* TEST_CONFIG_H */
//! ```
//!
//! C has no regex literal, so regex values are written as ordinary strings.

use crate::adapters::render::{
    escape_string, sanitize_comment, ControlEscape, NamingDefaults, RenderContext,
};
use crate::domain::type_rules::C_RULES;
use crate::domain::{
    ExportOptions, GeneratorIdentity, NamingConvention, ResolvedUnit, Result, TypeRules,
};
use crate::ports::Exporter;

/// Exporter for the `c` language id.
#[derive(Debug, Default, Clone, Copy)]
pub struct CExporter;

impl CExporter {
    /// Creates a new C exporter.
    pub fn new() -> Self {
        CExporter
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", break_trigraphs(&escape_string(s, '"', ControlEscape::Octal)))
}

// `??/` and friends are replaced before lexing in C99 and C11.
fn break_trigraphs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = None;
    for c in s.chars() {
        if c == '?' && prev == Some('?') {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

impl Exporter for CExporter {
    fn language(&self) -> &str {
        "c"
    }

    fn type_rules(&self) -> &TypeRules {
        &C_RULES
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
            &C_RULES,
            self.known_options(),
            NamingDefaults {
                property: None,
                type_name: NamingConvention::Pascal,
            },
        )?;
        let guard = format!("{}_H", NamingConvention::ScreamingSnake.apply(&ctx.type_name));
        let pad = ctx.pad(1);

        let mut out = String::new();
        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        out.push_str(&format!("/* {} */\n", sanitize_comment(&ctx.banner(), true)));
        out.push_str("const struct {\n");
        for field in &ctx.fields {
            out.push_str(&format!("{}{} {};", pad, field.native_type, field.name));
            if let Some(comment) = &field.property.comment {
                out.push_str(&format!(" /* {} */", sanitize_comment(comment, true)));
            }
            out.push('\n');
        }
        out.push_str(&format!("}} {} = {{\n", ctx.type_name));
        for field in &ctx.fields {
            let literal = ctx.literal(field, quote, quote)?;
            out.push_str(&format!("{pad}{literal},\n"));
        }
        out.push_str("};\n\n");
        out.push_str(&format!("#endif /* {guard} */\n"));

        Ok(out)
    }
}
