// SPDX-License-Identifier: MIT OR Apache-2.0

//! Java exporter.
//!
//! Renders a `public final class` of `public static final` constants inside the
//! package given by the required `package` option. Java has no regex literal, so
//! regex values are written as ordinary strings.

use crate::adapters::render::{
    escape_string, sanitize_comment, ControlEscape, NamingDefaults, RenderContext,
};
use crate::domain::type_rules::JAVA_RULES;
use crate::domain::{
    is_identifier, ExportOptions, GenerationError, GeneratorIdentity, NamingConvention,
    ResolvedUnit, Result, TypeRules,
};
use crate::ports::Exporter;

/// Exporter for the `java` language id.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaExporter;

impl JavaExporter {
    /// Creates a new Java exporter.
    pub fn new() -> Self {
        JavaExporter
    }

    fn package<'o>(&self, options: &'o ExportOptions) -> Result<&'o str> {
        let package = options.require_string("java", "package")?;
        if !package.split('.').all(is_identifier) {
            return Err(GenerationError::InvalidOption {
                option: "package".to_string(),
                message: format!("'{}' is not a valid Java package name", package),
            });
        }
        Ok(package)
    }
}

// Octal escapes: `\u` sequences are translated before lexing in Java source.
fn quote(s: &str) -> String {
    format!("\"{}\"", escape_string(s, '"', ControlEscape::Octal))
}

// A `\u000a` would end a line comment before the lexer sees it.
fn comment(s: &str) -> String {
    sanitize_comment(s, false).replace("\\u", "\\ u")
}

impl Exporter for JavaExporter {
    fn language(&self) -> &str {
        "java"
    }

    fn type_rules(&self) -> &TypeRules {
        &JAVA_RULES
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
            &JAVA_RULES,
            self.known_options(),
            NamingDefaults {
                property: None,
                type_name: NamingConvention::Pascal,
            },
        )?;
        let pad = ctx.pad(1);

        let mut out = String::new();
        out.push_str(&format!("package {};\n\n", package));
        out.push_str(&format!("// {}\n", comment(&ctx.banner())));
        out.push_str(&format!("public final class {} {{\n", ctx.type_name));
        for field in &ctx.fields {
            let literal = ctx.literal(field, quote, quote)?;
            out.push_str(&format!(
                "{}public static final {} {} = {};",
                pad, field.native_type, field.name, literal
            ));
            if let Some(text) = &field.property.comment {
                out.push_str(&format!(" // {}", comment(text)));
            }
            out.push('\n');
        }
        out.push_str("}\n");

        Ok(out)
    }
}
