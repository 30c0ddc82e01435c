// SPDX-License-Identifier: MIT OR Apache-2.0

//! JavaScript exporter.
//!
//! Renders a class of static getters, exported either as a CommonJS module
//! (`module.exports = T;`, the default) or as an ES module (`export class T`),
//! chosen with the `module` option.

use crate::adapters::render::{
    escape_string, sanitize_comment, slash_regex, ControlEscape, NamingDefaults, RenderContext,
};
use crate::domain::type_rules::JAVASCRIPT_RULES;
use crate::domain::{
    ExportOptions, GenerationError, GeneratorIdentity, NamingConvention, ResolvedUnit, Result,
    TypeRules,
};
use crate::ports::Exporter;

/// Module system of the generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStyle {
    /// `module.exports = T;`
    CommonJs,
    /// `export class T`
    Esm,
}

impl ModuleStyle {
    fn from_options(options: &ExportOptions) -> Result<Self> {
        match options.string("module")? {
            None | Some("commonjs") => Ok(ModuleStyle::CommonJs),
            Some("esm") => Ok(ModuleStyle::Esm),
            Some(other) => Err(GenerationError::InvalidOption {
                option: "module".to_string(),
                message: format!("expected 'commonjs' or 'esm', got '{}'", other),
            }),
        }
    }
}

/// Exporter for the `javascript` language id.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaScriptExporter;

impl JavaScriptExporter {
    /// Creates a new JavaScript exporter.
    pub fn new() -> Self {
        JavaScriptExporter
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", escape_string(s, '\'', ControlEscape::Unicode))
}

impl Exporter for JavaScriptExporter {
    fn language(&self) -> &str {
        "javascript"
    }

    fn type_rules(&self) -> &TypeRules {
        &JAVASCRIPT_RULES
    }

    fn known_options(&self) -> &[&str] {
        &["module"]
    }

    fn validate_options(&self, options: &ExportOptions) -> Result<()> {
        ModuleStyle::from_options(options).map(|_| ())
    }

    fn render(
        &self,
        unit: &ResolvedUnit,
        options: &ExportOptions,
        identity: &GeneratorIdentity,
    ) -> Result<String> {
        let style = ModuleStyle::from_options(options)?;
        let ctx = RenderContext::new(
            unit,
            options,
            identity,
            &JAVASCRIPT_RULES,
            self.known_options(),
            NamingDefaults {
                property: None,
                type_name: NamingConvention::Pascal,
            },
        )?;
        let pad = ctx.pad(1);

        let mut out = String::new();
        out.push_str(&format!("// {}\n", sanitize_comment(&ctx.banner(), false)));
        let export = if style == ModuleStyle::Esm { "export " } else { "" };
        out.push_str(&format!("{}class {} {{\n", export, ctx.type_name));
        for field in &ctx.fields {
            let literal = ctx.literal(field, quote, slash_regex)?;
            out.push_str(&format!(
                "{}static get {}() {{ return {}; }}",
                pad, field.name, literal
            ));
            if let Some(comment) = &field.property.comment {
                out.push_str(&format!(" // {}", sanitize_comment(comment, false)));
            }
            out.push('\n');
        }
        out.push_str("}\n");
        if style == ModuleStyle::CommonJs {
            out.push_str(&format!("module.exports = {};\n", ctx.type_name));
        }

        Ok(out)
    }
}
