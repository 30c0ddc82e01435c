// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared rendering machinery for the built-in exporters.
//!
//! `RenderContext` applies the parts of the exporter contract every language has
//! in common: option handling, naming conventions, reserved-word and collision
//! checks, native type lookup and scalar literals. The escaping helpers cover the
//! string and regex literal forms used by the built-in languages.

use crate::domain::{
    is_identifier, ExportOptions, GenerationError, GeneratorIdentity, NamingConvention, Property,
    ResolvedUnit, Result, Text, TypeKind, TypeRules, TypedValue,
};
use std::collections::HashSet;

/// Naming defaults of one exporter, used when the target sets no override.
#[derive(Clone, Copy, Debug)]
pub struct NamingDefaults {
    /// Convention for field names; `None` keeps declared names.
    pub property: Option<NamingConvention>,
    /// Convention for the generated type name.
    pub type_name: NamingConvention,
}

/// An exported property with its generated name and native type.
#[derive(Debug)]
pub struct Field<'a> {
    /// The resolved property.
    pub property: &'a Property,
    /// The name after the naming convention was applied.
    pub name: String,
    /// The target's native type for the property kind.
    pub native_type: &'static str,
}

/// Everything an exporter needs to lay out one file.
#[derive(Debug)]
pub struct RenderContext<'a> {
    /// The target's type rules.
    pub rules: &'a TypeRules,
    /// The generator identity written into the banner.
    pub identity: &'a GeneratorIdentity,
    /// The generated aggregate's name.
    pub type_name: String,
    /// Exported properties in final order.
    pub fields: Vec<Field<'a>>,
    indent: usize,
}

impl<'a> RenderContext<'a> {
    /// Prepares a unit for rendering.
    pub fn new(
        unit: &'a ResolvedUnit,
        options: &ExportOptions,
        identity: &'a GeneratorIdentity,
        rules: &'a TypeRules,
        known_options: &[&str],
        defaults: NamingDefaults,
    ) -> Result<Self> {
        let language = rules.language;
        options.log_unrecognized(language, known_options);

        let indent = options.indent()?;
        let property_naming = options.naming("property_naming")?.or(defaults.property);
        let type_naming = options
            .naming("type_naming")?
            .unwrap_or(defaults.type_name);

        let base_name = options.string("type_name")?.unwrap_or(unit.id().as_str());
        let type_name = type_naming.apply(base_name);
        if !is_identifier(&type_name) {
            return Err(GenerationError::InvalidOption {
                option: "type_naming".to_string(),
                message: format!("'{}' is not a valid type name", type_name),
            });
        }
        rules.check_identifier(&type_name)?;

        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        for property in unit.exported() {
            let name = match property_naming {
                Some(convention) => convention.apply(property.name.as_str()),
                None => property.name.to_string(),
            };
            if !is_identifier(&name) {
                return Err(GenerationError::InvalidOption {
                    option: "property_naming".to_string(),
                    message: format!("'{}' is not a valid field name", name),
                });
            }
            rules.check_identifier(&name)?;
            if !seen.insert(name.clone()) {
                return Err(GenerationError::DuplicateName {
                    unit: unit.id().to_string(),
                    name,
                });
            }
            let native_type = rules.require_native_type(property.kind, property.name.as_str())?;
            fields.push(Field {
                property,
                name,
                native_type,
            });
        }

        tracing::debug!(
            "Rendering unit '{}' as {} type '{}' with {} fields",
            unit.id(),
            language,
            type_name,
            fields.len()
        );

        Ok(RenderContext {
            rules,
            identity,
            type_name,
            fields,
            indent,
        })
    }

    /// Whitespace for `level` indentation levels.
    pub fn pad(&self, level: usize) -> String {
        " ".repeat(self.indent * level)
    }

    /// The banner line, without comment markers.
    pub fn banner(&self) -> String {
        self.identity.banner()
    }

    /// Renders text, spelling embedded booleans with this language's literals.
    pub fn text(&self, text: &Text) -> String {
        text.render_with(self.rules.true_literal, self.rules.false_literal)
    }

    /// The literal for a field's value.
    ///
    /// Scalars are rendered from the type rules; `string` and `regex` values are
    /// handed to the language's own quoting functions.
    pub fn literal(
        &self,
        field: &Field<'_>,
        string: impl Fn(&str) -> String,
        regex: impl Fn(&str) -> String,
    ) -> Result<String> {
        let property = field.property;
        match &property.value {
            TypedValue::Bool(b) => Ok(self.rules.bool_literal(*b).to_string()),
            TypedValue::Int(i) => self.rules.int_literal(property.name.as_str(), *i),
            TypedValue::Float(v) => Ok(self.rules.float_literal(*v)),
            TypedValue::Double(v) => Ok(self.rules.double_literal(*v)),
            TypedValue::Text(text) if property.kind == TypeKind::Regex => Ok(regex(&self.text(text))),
            TypedValue::Text(text) => Ok(string(&self.text(text))),
        }
    }

    /// Length of the longest field name.
    pub fn name_width(&self) -> usize {
        self.fields.iter().map(|f| f.name.len()).max().unwrap_or(0)
    }
}

/// How control characters are escaped inside quoted strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEscape {
    /// `\ooo`, valid in C and Java.
    Octal,
    /// `\xhh`, valid in Python and Go.
    Hex,
    /// `\uhhhh`, valid in JavaScript.
    Unicode,
}

/// Escapes `s` for a string literal delimited by `quote`.
///
/// # Examples
///
/// ```
/// use hexgen::adapters::render::{escape_string, ControlEscape};
///
/// assert_eq!(escape_string("say \"hi\"\n", '"', ControlEscape::Octal), r#"say \"hi\"\n"#);
/// assert_eq!(escape_string("a\\d", '\'', ControlEscape::Hex), r"a\\d");
/// ```
pub fn escape_string(s: &str, quote: char, control: ControlEscape) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => {
                let code = c as u32;
                match control {
                    ControlEscape::Octal => out.push_str(&format!("\\{:03o}", code)),
                    ControlEscape::Hex => out.push_str(&format!("\\x{:02x}", code)),
                    ControlEscape::Unicode => out.push_str(&format!("\\u{:04x}", code)),
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// A regex literal `/…/` as used by JavaScript and TypeScript.
///
/// Unescaped slashes and line breaks are escaped; existing escapes are kept. An
/// empty pattern becomes `/(?:)/` since `//` starts a comment.
pub fn slash_regex(pattern: &str) -> String {
    if pattern.is_empty() {
        return "/(?:)/".to_string();
    }
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('/');
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                match chars.next() {
                    Some('\n') => out.push('n'),
                    Some('\r') => out.push('r'),
                    Some('\u{2028}') => out.push_str("u2028"),
                    Some('\u{2029}') => out.push_str("u2029"),
                    Some(next) => out.push(next),
                    None => out.push('\\'),
                }
            }
            '/' => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('/');
    out
}

/// Characters any of the generated languages treats as a line terminator.
const LINE_BREAKS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Collapses a comment onto one line.
///
/// Line breaks, including U+2028 and U+2029, become single spaces. With `block`
/// set, `*/` is broken up so the comment cannot end early.
pub fn sanitize_comment(comment: &str, block: bool) -> String {
    let single_line = comment
        .split(&LINE_BREAKS[..])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if block {
        single_line.replace("*/", "* /")
    } else {
        single_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{builtin_rules, ConfigurationUnit};

    fn unit() -> ResolvedUnit {
        let mut unit = ConfigurationUnit::new("test-config");
        unit.add_property("myBoolean", TypeKind::Boolean, true, None).unwrap();
        unit.add_property("my_boolean", TypeKind::Boolean, false, None).unwrap();
        unit.add_property("hiddenOne", TypeKind::Integer, 1i64, None).unwrap();
        unit.hide("hiddenOne").unwrap();
        unit.resolve().unwrap()
    }

    fn defaults() -> NamingDefaults {
        NamingDefaults {
            property: None,
            type_name: NamingConvention::Pascal,
        }
    }

    #[test]
    fn test_context_skips_hidden_properties() {
        let unit = unit();
        let identity = GeneratorIdentity::new("t", "1");
        let rules = builtin_rules("python").unwrap();
        let ctx =
            RenderContext::new(&unit, &ExportOptions::new(), &identity, rules, &[], defaults()).unwrap();
        assert_eq!(ctx.type_name, "TestConfig");
        let names: Vec<&str> = ctx.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["myBoolean", "my_boolean"]);
        assert_eq!(ctx.fields[0].native_type, "bool");
        assert_eq!(ctx.pad(2), "        ");
    }

    #[test]
    fn test_naming_collision() {
        let unit = unit();
        let identity = GeneratorIdentity::new("t", "1");
        let rules = builtin_rules("python").unwrap();
        let options: ExportOptions = [("property_naming", "snake")].into_iter().collect();
        let err = RenderContext::new(&unit, &options, &identity, rules, &[], defaults()).unwrap_err();
        assert!(matches!(err, GenerationError::DuplicateName { ref name, .. } if name == "my_boolean"));
    }

    #[test]
    fn test_type_name_option_and_kebab_rejection() {
        let unit = unit();
        let identity = GeneratorIdentity::new("t", "1");
        let rules = builtin_rules("java").unwrap();
        let options: ExportOptions = [("type_name", "app_settings")].into_iter().collect();
        let ctx = RenderContext::new(&unit, &options, &identity, rules, &[], defaults()).unwrap();
        assert_eq!(ctx.type_name, "AppSettings");

        let options: ExportOptions = [("type_naming", "kebab")].into_iter().collect();
        let err = RenderContext::new(&unit, &options, &identity, rules, &[], defaults()).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOption { .. }));
    }

    #[test]
    fn test_reserved_type_name() {
        let unit = unit();
        let identity = GeneratorIdentity::new("t", "1");
        let rules = builtin_rules("java").unwrap();
        let options: ExportOptions = [("type_name", "class"), ("type_naming", "snake")]
            .into_iter()
            .collect();
        let err = RenderContext::new(&unit, &options, &identity, rules, &[], defaults()).unwrap_err();
        assert!(matches!(err, GenerationError::ReservedIdentifier { .. }));
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape_string("\u{7}", '"', ControlEscape::Octal), "\\007");
        assert_eq!(escape_string("\u{1b}", '\'', ControlEscape::Hex), "\\x1b");
        assert_eq!(escape_string("\u{0}", '\'', ControlEscape::Unicode), "\\u0000");
        assert_eq!(escape_string("it's", '"', ControlEscape::Octal), "it's");
        assert_eq!(escape_string("grüße", '"', ControlEscape::Octal), "grüße");
    }

    #[test]
    fn test_slash_regex() {
        assert_eq!(slash_regex("Test Reg(E|e)x"), "/Test Reg(E|e)x/");
        assert_eq!(slash_regex("a/b"), "/a\\/b/");
        assert_eq!(slash_regex("a\\/b"), "/a\\/b/");
        assert_eq!(slash_regex("\\d+"), "/\\d+/");
        assert_eq!(slash_regex(""), "/(?:)/");
        assert_eq!(slash_regex("x\\"), "/x\\\\/");
        assert_eq!(slash_regex("a\u{2028}b"), "/a\\u2028b/");
    }

    #[test]
    fn test_sanitize_comment() {
        assert_eq!(sanitize_comment("first\nsecond\r\nthird", false), "first second third");
        assert_eq!(sanitize_comment("ends */ early", true), "ends * / early");
        assert_eq!(sanitize_comment("ends */ early", false), "ends */ early");
        assert_eq!(
            sanitize_comment("note\u{2028}throw 1;\u{2029}done", false),
            "note throw 1; done"
        );
    }
}
