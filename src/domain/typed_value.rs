// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed property values.
//!
//! A `TypedValue` is independent of any rendering target. Text values are kept as
//! a sequence of fragments so that booleans substituted into a string can be
//! spelled by each exporter in its own canonical way (`true`, `True`, `1`).

use crate::domain::TypeKind;
use std::fmt;

/// One piece of a text value.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    /// Literal characters.
    Literal(String),
    /// A boolean whose spelling is decided by the target language.
    Bool(bool),
}

/// A text value made of literal characters and embedded booleans.
///
/// Adjacent literals are always merged and empty literals are never stored, so
/// two texts that render the same way compare equal.
///
/// # Examples
///
/// ```
/// use hexgen::domain::Text;
///
/// let mut text = Text::plain("enabled=");
/// text.push_bool(true);
/// assert_eq!(text.render_with("True", "False"), "enabled=True");
/// assert_eq!(text.render_with("1", "0"), "enabled=1");
/// assert_eq!(text.as_plain(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Text(Vec<Fragment>);

impl Text {
    /// Creates an empty text.
    pub fn new() -> Self {
        Text(Vec::new())
    }

    /// Creates a text holding only literal characters.
    pub fn plain(s: impl Into<String>) -> Self {
        let mut text = Text::new();
        text.push_str(&s.into());
        text
    }

    /// Appends literal characters.
    pub fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        match self.0.last_mut() {
            Some(Fragment::Literal(last)) => last.push_str(s),
            _ => self.0.push(Fragment::Literal(s.to_string())),
        }
    }

    /// Appends a boolean whose spelling is deferred to render time.
    pub fn push_bool(&mut self, value: bool) {
        self.0.push(Fragment::Bool(value));
    }

    /// Appends every fragment of `other`.
    pub fn append(&mut self, other: &Text) {
        for fragment in &other.0 {
            match fragment {
                Fragment::Literal(s) => self.push_str(s),
                Fragment::Bool(b) => self.push_bool(*b),
            }
        }
    }

    /// Returns the fragments.
    pub fn fragments(&self) -> &[Fragment] {
        &self.0
    }

    /// Returns `true` if the text renders to nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the text as a plain string if it embeds no booleans.
    pub fn as_plain(&self) -> Option<&str> {
        match self.0.as_slice() {
            [] => Some(""),
            [Fragment::Literal(s)] => Some(s),
            _ => None,
        }
    }

    /// Renders the text, spelling embedded booleans with the given words.
    pub fn render_with(&self, true_word: &str, false_word: &str) -> String {
        let mut out = String::new();
        for fragment in &self.0 {
            match fragment {
                Fragment::Literal(s) => out.push_str(s),
                Fragment::Bool(true) => out.push_str(true_word),
                Fragment::Bool(false) => out.push_str(false_word),
            }
        }
        out
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with("true", "false"))
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::plain(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::plain(s)
    }
}

/// Formats an `f32` in shortest round-trip form, always with a fractional part
/// or an exponent (`322.0`, `233.9`, `1e20`).
pub fn format_f32(value: f32) -> String {
    format!("{:?}", value)
}

/// Formats an `f64` in shortest round-trip form, always with a fractional part
/// or an exponent.
pub fn format_f64(value: f64) -> String {
    format!("{:?}", value)
}

/// A concrete property value.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 32-bit float.
    Float(f32),
    /// A 64-bit float.
    Double(f64),
    /// Text, used by both `String` and `Regex` kinds.
    Text(Text),
}

impl TypedValue {
    /// The kind a value of this shape belongs to (`Text` reports `String`).
    pub fn natural_kind(&self) -> TypeKind {
        match self {
            TypedValue::Bool(_) => TypeKind::Boolean,
            TypedValue::Int(_) => TypeKind::Integer,
            TypedValue::Float(_) => TypeKind::Float,
            TypedValue::Double(_) => TypeKind::Double,
            TypedValue::Text(_) => TypeKind::String,
        }
    }

    /// Returns `true` if this value can be stored in a property of `kind`.
    pub fn fits(&self, kind: TypeKind) -> bool {
        match self {
            TypedValue::Text(_) => kind.is_textual(),
            other => other.natural_kind() == kind,
        }
    }

    /// Returns `true` if the value is a non-finite float.
    pub fn is_non_finite(&self) -> bool {
        match self {
            TypedValue::Float(v) => !v.is_finite(),
            TypedValue::Double(v) => !v.is_finite(),
            _ => false,
        }
    }

    /// Converts the value to text the way substitutions embed it.
    pub fn stringify(&self) -> Text {
        match self {
            TypedValue::Bool(b) => {
                let mut text = Text::new();
                text.push_bool(*b);
                text
            }
            TypedValue::Int(i) => Text::plain(i.to_string()),
            TypedValue::Float(v) => Text::plain(format_f32(*v)),
            TypedValue::Double(v) => Text::plain(format_f64(*v)),
            TypedValue::Text(t) => t.clone(),
        }
    }

    /// Returns the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Int(i) => Some(*i as f64),
            TypedValue::Float(v) => Some(f64::from(*v)),
            TypedValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text, if this is one.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            TypedValue::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stringify())
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Bool(b)
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Int(i)
    }
}

impl From<i32> for TypedValue {
    fn from(i: i32) -> Self {
        TypedValue::Int(i64::from(i))
    }
}

impl From<f32> for TypedValue {
    fn from(v: f32) -> Self {
        TypedValue::Float(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Double(v)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::Text(Text::plain(s))
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::Text(Text::plain(s))
    }
}

impl From<Text> for TypedValue {
    fn from(t: Text) -> Self {
        TypedValue::Text(t)
    }
}
