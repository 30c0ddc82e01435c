// SPDX-License-Identifier: MIT OR Apache-2.0

//! Go exporter.
//!
//! Renders a package-level variable holding an anonymous struct, with field
//! names and types aligned the way `gofmt` lays them out. The `package` option is
//! required.

use crate::adapters::render::{
    escape_string, sanitize_comment, ControlEscape, NamingDefaults, RenderContext,
};
use crate::domain::type_rules::GO_RULES;
use crate::domain::{
    ExportOptions, GenerationError, GeneratorIdentity, NamingConvention, ResolvedUnit, Result,
    TypeRules,
};
use crate::ports::Exporter;
use once_cell::sync::Lazy;
use regex::Regex;

static PACKAGE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]+$").expect("valid package pattern"));

/// Exporter for the `go` language id.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoExporter;

impl GoExporter {
    /// Creates a new Go exporter.
    pub fn new() -> Self {
        GoExporter
    }

    fn package<'o>(&self, options: &'o ExportOptions) -> Result<&'o str> {
        let package = options.require_string("go", "package")?;
        if !PACKAGE_NAME.is_match(package) || GO_RULES.is_reserved(package) {
            return Err(GenerationError::InvalidOption {
                option: "package".to_string(),
                message: format!("'{}' is not a valid Go package name", package),
            });
        }
        Ok(package)
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape_string(s, '"', ControlEscape::Hex))
}

fn regex(s: &str) -> String {
    let raw_ok = !s.chars().any(|c| c == '`' || c == '\r');
    if s.contains('\\') && raw_ok {
        format!("`{}`", s)
    } else {
        quote(s)
    }
}

impl Exporter for GoExporter {
    fn language(&self) -> &str {
        "go"
    }

    fn type_rules(&self) -> &TypeRules {
        &GO_RULES
    }

    fn known_options(&self) -> &[&str] {
        &["package"]
    }

    fn validate_options(&self, options: &ExportOptions) -> Result<()> {
        self.package(options).map(|_| ())
    }

    fn render(
        &self,
        unit: &ResolvedUnit,
        options: &ExportOptions,
        identity: &GeneratorIdentity,
    ) -> Result<String> {
        let package = self.package(options)?;
        let ctx = RenderContext::new(
            unit,
            options,
            identity,
            &GO_RULES,
            self.known_options(),
            NamingDefaults {
                property: None,
                type_name: NamingConvention::Pascal,
            },
        )?;
        let pad = ctx.pad(1);
        let width = ctx.name_width();

        let mut out = String::new();
        out.push_str(&format!("package {}\n\n", package));
        out.push_str(&format!("// {}\n", sanitize_comment(&ctx.banner(), false)));
        out.push_str(&format!("var {} = struct {{\n", ctx.type_name));
        for field in &ctx.fields {
            out.push_str(&format!(
                "{}{:<width$} {}",
                pad,
                field.name,
                field.native_type,
                width = width
            ));
            if let Some(comment) = &field.property.comment {
                out.push_str(&format!(" // {}", sanitize_comment(comment, false)));
            }
            out.push('\n');
        }
        out.push_str("}{\n");
        for field in &ctx.fields {
            let literal = ctx.literal(field, quote, regex)?;
            out.push_str(&format!(
                "{}{:<width$} {},\n",
                pad,
                format!("{}:", field.name),
                literal,
                width = width + 1
            ));
        }
        out.push_str("}\n");

        Ok(out)
    }
}
