// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration units and their declarations.
//!
//! A unit is an ordered list of property declarations and inclusion points. Literal
//! properties carry their value; combined and substituted properties carry an
//! unevaluated definition that is only computed during resolution.

use crate::domain::errors::{GenerationError, Result};
use crate::domain::expression::{coerce_to_kind, Expression};
use crate::domain::template::Template;
use crate::domain::typed_value::TypedValue;
use crate::domain::{PropertyName, TypeKind, UnitId};
use serde::{Deserialize, Serialize};

/// How a property obtains its value.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    /// A value given directly.
    Literal(TypedValue),
    /// A value computed from an expression.
    Combined(Expression),
    /// Text with placeholders for other properties.
    Substituted(Template),
}

/// A single property declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    /// The property name.
    pub name: PropertyName,
    /// The declared kind.
    pub kind: TypeKind,
    /// Where the value comes from.
    pub definition: Definition,
    /// Comment emitted next to the generated field.
    pub comment: Option<String>,
    /// Hidden properties are resolved but never exported.
    pub hidden: bool,
}

impl Declaration {
    /// Returns `true` for combined and substituted properties.
    pub fn is_derived(&self) -> bool {
        !matches!(self.definition, Definition::Literal(_))
    }

    /// Properties this declaration depends on.
    pub fn references(&self) -> Vec<&PropertyName> {
        match &self.definition {
            Definition::Literal(_) => Vec::new(),
            Definition::Combined(expr) => expr.references(),
            Definition::Substituted(template) => template.references(),
        }
    }
}

/// An entry of a unit: a declaration or an inclusion point.
#[derive(Clone, Debug, PartialEq)]
pub enum UnitItem {
    /// A property declared by the unit itself.
    Property(Declaration),
    /// Another unit spliced in at this position.
    Include(UnitId),
}

/// An ordered set of declarations and inclusion points.
///
/// # Examples
///
/// ```
/// use hexgen::domain::{ConfigurationUnit, TypeKind};
///
/// let mut unit = ConfigurationUnit::new("test-config");
/// unit.add_property("myFloat", TypeKind::Float, 322.0f32, None).unwrap();
/// unit.declare_combined("myCombinedFloat", TypeKind::Float, "${myFloat} + 45402.0", None)
///     .unwrap();
///
/// let resolved = unit.resolve().unwrap();
/// assert_eq!(resolved.get("myCombinedFloat").unwrap().value.as_f64(), Some(45724.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationUnit {
    id: UnitId,
    items: Vec<UnitItem>,
}

impl ConfigurationUnit {
    /// Creates an empty unit.
    pub fn new(id: impl Into<UnitId>) -> Self {
        ConfigurationUnit {
            id: id.into(),
            items: Vec::new(),
        }
    }

    /// The unit's id.
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Declarations and inclusion points in declaration order.
    pub fn items(&self) -> &[UnitItem] {
        &self.items
    }

    /// The unit's own declarations, in order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter().filter_map(|item| match item {
            UnitItem::Property(decl) => Some(decl),
            UnitItem::Include(_) => None,
        })
    }

    /// Ids of included units, in order.
    pub fn includes(&self) -> impl Iterator<Item = &UnitId> {
        self.items.iter().filter_map(|item| match item {
            UnitItem::Include(id) => Some(id),
            UnitItem::Property(_) => None,
        })
    }

    /// Looks up one of the unit's own declarations.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations().find(|d| d.name.as_str() == name)
    }

    /// Declares a literal property.
    ///
    /// Integers are accepted for `float` and `double` properties, and floats of
    /// either width for both float kinds. Anything else must match the kind.
    pub fn add_property(
        &mut self,
        name: &str,
        kind: TypeKind,
        value: impl Into<TypedValue>,
        comment: Option<&str>,
    ) -> Result<&Declaration> {
        let value = check_literal(name, kind, value.into())?;
        self.push(name, kind, Definition::Literal(value), comment)
    }

    /// Declares a property computed from an expression over other properties.
    pub fn declare_combined(
        &mut self,
        name: &str,
        kind: TypeKind,
        expression: &str,
        comment: Option<&str>,
    ) -> Result<&Declaration> {
        let expr = Expression::parse(expression).map_err(|e| GenerationError::InvalidExpression {
            property: name.to_string(),
            message: e.to_string(),
        })?;
        self.push(name, kind, Definition::Combined(expr), comment)
    }

    /// Declares a string property with `${name}` placeholders.
    pub fn declare_substituted(
        &mut self,
        name: &str,
        template: &str,
        comment: Option<&str>,
    ) -> Result<&Declaration> {
        self.declare_template(name, TypeKind::String, template, comment)
    }

    /// Declares a regex property with `${name}` placeholders.
    pub fn declare_substituted_regex(
        &mut self,
        name: &str,
        template: &str,
        comment: Option<&str>,
    ) -> Result<&Declaration> {
        self.declare_template(name, TypeKind::Regex, template, comment)
    }

    fn declare_template(
        &mut self,
        name: &str,
        kind: TypeKind,
        template: &str,
        comment: Option<&str>,
    ) -> Result<&Declaration> {
        let template = Template::parse(template).map_err(|e| GenerationError::InvalidTemplate {
            property: name.to_string(),
            message: e.to_string(),
        })?;
        self.push(name, kind, Definition::Substituted(template), comment)
    }

    /// Marks a declared property as hidden.
    pub fn hide(&mut self, name: &str) -> Result<()> {
        let unit = self.id.to_string();
        let decl = self
            .items
            .iter_mut()
            .find_map(|item| match item {
                UnitItem::Property(decl) if decl.name.as_str() == name => Some(decl),
                _ => None,
            })
            .ok_or_else(|| GenerationError::UnknownReference {
                unit,
                property: name.to_string(),
                reference: name.to_string(),
            })?;
        decl.hidden = true;
        Ok(())
    }

    /// Records an inclusion point at the current position.
    pub fn include(&mut self, unit: impl Into<UnitId>) {
        self.items.push(UnitItem::Include(unit.into()));
    }

    fn push(
        &mut self,
        name: &str,
        kind: TypeKind,
        definition: Definition,
        comment: Option<&str>,
    ) -> Result<&Declaration> {
        let name = PropertyName::new(name)?;
        if self.get(name.as_str()).is_some() {
            return Err(GenerationError::DuplicateName {
                unit: self.id.to_string(),
                name: name.into_string(),
            });
        }
        self.items.push(UnitItem::Property(Declaration {
            name,
            kind,
            definition,
            comment: comment.map(str::to_string),
            hidden: false,
        }));
        match self.items.last() {
            Some(UnitItem::Property(decl)) => Ok(decl),
            _ => unreachable!("a property was just pushed"),
        }
    }

    /// Builds a unit from raw declarations, as produced by a definition reader.
    ///
    /// String values containing `${` become substitutions for textual kinds and
    /// combinations for every other kind.
    pub fn from_declarations<I>(id: impl Into<UnitId>, declarations: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawDeclaration>,
    {
        let mut unit = ConfigurationUnit::new(id);
        for raw in declarations {
            unit.add_raw(raw)?;
        }
        tracing::debug!(
            "Built unit '{}' with {} items",
            unit.id,
            unit.items.len()
        );
        Ok(unit)
    }

    fn add_raw(&mut self, raw: RawDeclaration) -> Result<()> {
        if raw.ignore {
            tracing::debug!(
                "Skipping ignored declaration {:?} in unit '{}'",
                raw.name.as_deref().or(raw.include.as_deref()).unwrap_or_default(),
                self.id
            );
            return Ok(());
        }
        if let Some(include) = raw.include {
            self.include(include);
        }
        let name = match raw.name {
            Some(name) => name,
            None if raw.type_tag.is_none() && raw.value.is_none() && raw.combine.is_none() => {
                return Ok(())
            }
            None => {
                return Err(GenerationError::InvalidName {
                    name: String::new(),
                })
            }
        };
        let tag = raw.type_tag.unwrap_or_default();
        let kind: TypeKind = tag.parse().map_err(|_| GenerationError::UnknownType {
            property: name.clone(),
            tag: tag.clone(),
        })?;
        let comment = raw.comment.as_deref();

        match (raw.combine, raw.value) {
            (Some(expression), _) => {
                self.declare_combined(&name, kind, &expression, comment)?;
            }
            (None, Some(RawValue::Str(s))) if s.contains("${") => {
                if kind.is_textual() {
                    self.declare_template(&name, kind, &s, comment)?;
                } else {
                    self.declare_combined(&name, kind, &s, comment)?;
                }
            }
            (None, Some(value)) => {
                let value = coerce_raw(&name, kind, value)?;
                self.push(&name, kind, Definition::Literal(value), comment)?;
            }
            (None, None) => {
                return Err(GenerationError::invalid_value(&name, kind, "missing value"));
            }
        }

        if raw.hidden {
            self.hide(&name)?;
        }
        Ok(())
    }
}

/// A declaration as read from a definition source, before validation.
///
/// # Examples
///
/// ```
/// use hexgen::domain::{ConfigurationUnit, RawDeclaration};
///
/// let yaml = r#"
/// - name: myBoolean
///   type: bool
///   value: "yes"
/// - name: myInteger
///   type: int
///   value: 142
///   comment: The answer, roughly.
/// "#;
/// let raw: Vec<RawDeclaration> = serde_yaml::from_str(yaml).unwrap();
/// let unit = ConfigurationUnit::from_declarations("test-config", raw).unwrap();
/// assert_eq!(unit.declarations().count(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDeclaration {
    /// Property name.
    #[serde(default)]
    pub name: Option<String>,
    /// Type tag (`bool`, `int`, `float`, `double`, `string`, `regex`).
    #[serde(default, rename = "type")]
    pub type_tag: Option<String>,
    /// The literal value, or a template/expression when it contains `${`.
    #[serde(default)]
    pub value: Option<RawValue>,
    /// Comment for the generated field.
    #[serde(default)]
    pub comment: Option<String>,
    /// Resolve but do not export.
    #[serde(default)]
    pub hidden: bool,
    /// Id of a unit to include at this position.
    #[serde(default)]
    pub include: Option<String>,
    /// Explicit combination expression.
    #[serde(default)]
    pub combine: Option<String>,
    /// Skip this entry, include or property, entirely.
    #[serde(default)]
    pub ignore: bool,
}

/// A loosely typed value from a definition source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
}

fn check_literal(name: &str, kind: TypeKind, value: TypedValue) -> Result<TypedValue> {
    if value.is_non_finite() {
        return Err(GenerationError::invalid_value(name, kind, "value is not finite"));
    }
    let widening = matches!(
        (kind, &value),
        (TypeKind::Float | TypeKind::Double, TypedValue::Int(_) | TypedValue::Float(_) | TypedValue::Double(_))
    );
    if widening {
        return coerce_to_kind(value, kind)
            .map_err(|message| GenerationError::invalid_value(name, kind, message));
    }
    if value.fits(kind) {
        Ok(value)
    } else {
        Err(GenerationError::invalid_value(
            name,
            kind,
            format!("a {} value cannot be stored", value.natural_kind()),
        ))
    }
}

fn coerce_raw(name: &str, kind: TypeKind, raw: RawValue) -> Result<TypedValue> {
    let value = match (kind, raw) {
        (TypeKind::Boolean, RawValue::Bool(b)) => TypedValue::Bool(b),
        (TypeKind::Boolean, RawValue::Int(i @ (0 | 1))) => TypedValue::Bool(i == 1),
        (TypeKind::Boolean, RawValue::Str(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => TypedValue::Bool(true),
            "false" | "no" | "0" | "off" => TypedValue::Bool(false),
            _ => {
                return Err(GenerationError::invalid_value(
                    name,
                    kind,
                    format!("'{}' is not a boolean", s),
                ))
            }
        },
        (TypeKind::Integer, RawValue::Int(i)) => TypedValue::Int(i),
        (TypeKind::Integer, RawValue::Str(s)) => TypedValue::Int(
            s.trim()
                .parse::<i64>()
                .map_err(|e| GenerationError::from_parse_int_error(name, kind, e))?,
        ),
        (TypeKind::Float, RawValue::Int(i)) => TypedValue::Float(i as f32),
        (TypeKind::Float, RawValue::Float(v)) => TypedValue::Float(v as f32),
        (TypeKind::Float, RawValue::Str(s)) => TypedValue::Float(
            s.trim()
                .parse::<f32>()
                .map_err(|e| GenerationError::from_parse_float_error(name, kind, e))?,
        ),
        (TypeKind::Double, RawValue::Int(i)) => TypedValue::Double(i as f64),
        (TypeKind::Double, RawValue::Float(v)) => TypedValue::Double(v),
        (TypeKind::Double, RawValue::Str(s)) => TypedValue::Double(
            s.trim()
                .parse::<f64>()
                .map_err(|e| GenerationError::from_parse_float_error(name, kind, e))?,
        ),
        (TypeKind::String | TypeKind::Regex, RawValue::Str(s)) => TypedValue::from(s),
        (TypeKind::String | TypeKind::Regex, RawValue::Bool(b)) => TypedValue::from(b.to_string()),
        (TypeKind::String | TypeKind::Regex, RawValue::Int(i)) => TypedValue::from(i.to_string()),
        (TypeKind::String | TypeKind::Regex, RawValue::Float(v)) => {
            TypedValue::from(crate::domain::typed_value::format_f64(v))
        }
        (kind, other) => {
            return Err(GenerationError::invalid_value(
                name,
                kind,
                format!("{:?} does not fit", other),
            ))
        }
    };
    if value.is_non_finite() {
        return Err(GenerationError::invalid_value(name, kind, "value is not finite"));
    }
    Ok(value)
}
