// SPDX-License-Identifier: MIT OR Apache-2.0

//! Substitution templates: text with `${name}` placeholders.
//!
//! `$${` is an escape for a literal `${`.

use crate::domain::expression::SyntaxError;
use crate::domain::typed_value::{Text, TypedValue};
use crate::domain::PropertyName;
use std::fmt;

/// One piece of a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Characters copied as they are.
    Literal(String),
    /// A placeholder replaced by the referenced property's value.
    Reference(PropertyName),
}

/// A parsed substitution template.
///
/// # Examples
///
/// ```
/// use hexgen::domain::Template;
///
/// let template = Template::parse("Sometimes I just want to scream ${greeting}!").unwrap();
/// assert!(template.has_references());
///
/// let escaped = Template::parse("cost: $${price}").unwrap();
/// assert!(!escaped.has_references());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses a template.
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while !rest.is_empty() {
            let offset = source.len() - rest.len();
            if let Some(after) = rest.strip_prefix("$${") {
                literal.push_str("${");
                rest = after;
            } else if let Some(after) = rest.strip_prefix("${") {
                let close = after
                    .find('}')
                    .ok_or_else(|| SyntaxError::new(offset, "unclosed placeholder"))?;
                let raw = after[..close].trim();
                let name = PropertyName::new(raw).map_err(|_| {
                    SyntaxError::new(offset, format!("'{}' is not a valid property name", raw))
                })?;
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Reference(name));
                rest = &after[close + 1..];
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    literal.push(c);
                }
                rest = chars.as_str();
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template { segments })
    }

    /// Returns the segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` if the template has at least one placeholder.
    pub fn has_references(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Reference(_)))
    }

    /// Every referenced property, in order of first appearance.
    pub fn references(&self) -> Vec<&PropertyName> {
        let mut out: Vec<&PropertyName> = Vec::new();
        for segment in &self.segments {
            if let Segment::Reference(name) = segment {
                if !out.contains(&name) {
                    out.push(name);
                }
            }
        }
        out
    }

    /// Substitutes every placeholder with the stringified value from `lookup`.
    pub fn render<'v, F>(&self, lookup: &F) -> Result<Text, String>
    where
        F: Fn(&PropertyName) -> Option<&'v TypedValue>,
    {
        let mut text = Text::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => text.push_str(s),
                Segment::Reference(name) => {
                    let value = lookup(name).ok_or_else(|| format!("'{}' has no value", name))?;
                    text.append(&value.stringify());
                }
            }
        }
        Ok(text)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => f.write_str(&s.replace("${", "$${"))?,
                Segment::Reference(name) => write!(f, "${{{}}}", name)?,
            }
        }
        Ok(())
    }
}
