// SPDX-License-Identifier: MIT OR Apache-2.0

//! TypeScript exporter.
//!
//! Renders an exported class of typed `public static readonly` fields. Regex
//! values become `RegExp` literals.

use crate::adapters::render::{
    escape_string, sanitize_comment, slash_regex, ControlEscape, NamingDefaults, RenderContext,
};
use crate::domain::type_rules::TYPESCRIPT_RULES;
use crate::domain::{
    ExportOptions, GeneratorIdentity, NamingConvention, ResolvedUnit, Result, TypeRules,
};
use crate::ports::Exporter;

/// Exporter for the `typescript` language id.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptExporter;

impl TypeScriptExporter {
    /// Creates a new TypeScript exporter.
    pub fn new() -> Self {
        TypeScriptExporter
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", escape_string(s, '\'', ControlEscape::Unicode))
}

impl Exporter for TypeScriptExporter {
    fn language(&self) -> &str {
        "typescript"
    }

    fn type_rules(&self) -> &TypeRules {
        &TYPESCRIPT_RULES
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
            &TYPESCRIPT_RULES,
            self.known_options(),
            NamingDefaults {
                property: None,
                type_name: NamingConvention::Pascal,
            },
        )?;
        let pad = ctx.pad(1);

        let mut out = String::new();
        out.push_str(&format!("// {}\n", sanitize_comment(&ctx.banner(), false)));
        out.push_str(&format!("export class {} {{\n", ctx.type_name));
        for field in &ctx.fields {
            let literal = ctx.literal(field, quote, slash_regex)?;
            out.push_str(&format!(
                "{}public static readonly {}: {} = {};",
                pad, field.name, field.native_type, literal
            ));
            if let Some(comment) = &field.property.comment {
                out.push_str(&format!(" // {}", sanitize_comment(comment, false)));
            }
            out.push('\n');
        }
        out.push_str("}\n");

        Ok(out)
    }
}
