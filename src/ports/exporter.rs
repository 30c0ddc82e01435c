// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exporter trait definition.
//!
//! An exporter turns a resolved unit into the complete source text of one target
//! language. Exporters are stateless: the same unit, options and identity always
//! give byte-identical output.

use crate::domain::{ExportOptions, GeneratorIdentity, ResolvedUnit, Result, TypeRules};

/// A trait for per-language renderers.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one exporter instance serves every unit
/// and may be called from several threads at once.
///
/// # Examples
///
/// ```rust
/// use hexgen::ports::Exporter;
/// use hexgen::domain::{
///     ExportOptions, GeneratorIdentity, ResolvedUnit, Result, TypeKind, TypeRules,
/// };
///
/// static INI_RULES: TypeRules = TypeRules {
///     language: "ini",
///     native_types: [Some("bool"), Some("int"), None, None, Some("str"), None],
///     float_suffix: "",
///     double_suffix: "",
///     true_literal: "true",
///     false_literal: "false",
///     integer_range: None,
///     reserved_words: &[],
/// };
///
/// struct IniExporter;
///
/// impl Exporter for IniExporter {
///     fn language(&self) -> &str {
///         "ini"
///     }
///
///     fn type_rules(&self) -> &TypeRules {
///         &INI_RULES
///     }
///
///     fn render(
///         &self,
///         unit: &ResolvedUnit,
///         _options: &ExportOptions,
///         identity: &GeneratorIdentity,
///     ) -> Result<String> {
///         let mut out = format!("; {}\n[{}]\n", identity.banner(), unit.id());
///         for property in unit.exported() {
///             INI_RULES.require_native_type(property.kind, property.name.as_str())?;
///             out.push_str(&format!("{} = {}\n", property.name, property.value));
///         }
///         Ok(out)
///     }
/// }
/// ```
pub trait Exporter: Send + Sync {
    /// The language id targets use to select this exporter (`"java"`, `"go"`, ...).
    fn language(&self) -> &str;

    /// How this language spells types and literals.
    fn type_rules(&self) -> &TypeRules;

    /// Option keys this exporter reads beyond the common ones.
    ///
    /// Other keys are ignored and logged at debug level.
    fn known_options(&self) -> &[&str] {
        &[]
    }

    /// Checks options before anything is resolved.
    ///
    /// The pipeline calls this for every target first, so a missing or malformed
    /// option fails the invocation before any unit is touched.
    fn validate_options(&self, _options: &ExportOptions) -> Result<()> {
        Ok(())
    }

    /// Renders the complete source file for `unit`.
    ///
    /// # Errors
    ///
    /// * `UnsupportedTypeForTarget` - a property kind has no native type
    /// * `UnrepresentableValue` - a value does not fit the native type
    /// * `ReservedIdentifier` / `DuplicateName` - generated names are unusable
    /// * `MissingOption` / `InvalidOption` - options are missing or malformed
    fn render(
        &self,
        unit: &ResolvedUnit,
        options: &ExportOptions,
        identity: &GeneratorIdentity,
    ) -> Result<String>;
}
