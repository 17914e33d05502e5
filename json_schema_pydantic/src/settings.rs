//! Settings for JSON Schema to Pydantic code generation.
//!
//! Every table the compiler consults lives here so that a different target
//! type system can be plugged in without touching the compiler itself.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::gate::Draft;

/// Model name used when neither the caller nor the schema supplies one.
pub const DEFAULT_MODEL_NAME: &str = "GeneratedModel";

/// Target type used for unknown or missing JSON Schema types.
pub const DEFAULT_FALLBACK_TYPE: &str = "Any";

/// How constraint keys are spelled in the generated `Field(...)` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKeyStyle {
    /// Emit keys exactly as they appear in the schema (`maxLength`).
    #[default]
    Preserve,
    /// Convert keys to `snake_case` (`max_length`).
    SnakeCase,
}

/// Settings that control code generation behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateSettings {
    /// JSON Schema primitive type name to target type name.
    pub type_map: BTreeMap<String, String>,

    /// Target type for a `type` missing from `type_map` (or no `type` at all).
    pub fallback_type: String,

    /// Constraint keys whose values are emitted as quoted string literals.
    pub quoted_keys: BTreeSet<String>,

    /// Subset of the quoted keys whose values are emitted as raw string
    /// literals, leaving backslashes untouched.
    pub raw_string_keys: BTreeSet<String>,

    /// Model name used when neither the caller nor the schema's `name` key
    /// provides one.
    pub default_model_name: String,

    /// Spelling of constraint keys in the emitted text.
    pub constraint_key_style: ConstraintKeyStyle,

    /// Meta-schema dialect the schema gate validates against.
    pub draft: Draft,

    /// When true, the schema gate also compiles every property `pattern` as an
    /// ECMAScript regular expression and rejects the schema if one fails.
    ///
    /// **Default: false (disabled).** Draft-07 only annotates `pattern` with
    /// `"format": "regex"`, which meta-schema validation does not enforce.
    pub deny_invalid_patterns: bool,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        let type_map: BTreeMap<String, String> = [
            ("string", "str"),
            ("integer", "int"),
            ("boolean", "bool"),
            ("number", "float"),
            ("array", "List"),
            ("object", "Dict"),
        ]
        .into_iter()
        .map(|(json_type, target)| (json_type.to_string(), target.to_string()))
        .collect();

        let quoted_keys: BTreeSet<String> = [
            "alias",
            "validation_alias",
            "serialization_alias",
            "title",
            "description",
            "discriminator",
            "pattern",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            type_map,
            fallback_type: DEFAULT_FALLBACK_TYPE.to_string(),
            quoted_keys,
            raw_string_keys: BTreeSet::from(["pattern".to_string()]),
            default_model_name: DEFAULT_MODEL_NAME.to_string(),
            constraint_key_style: ConstraintKeyStyle::default(),
            draft: Draft::default(),
            deny_invalid_patterns: false,
        }
    }
}

impl GenerateSettings {
    /// Resolve a JSON Schema `type` value to its target type name.
    ///
    /// Total: anything not in `type_map` resolves to `fallback_type`.
    #[must_use]
    pub fn resolve_type(&self, json_type: Option<&str>) -> &str {
        json_type
            .and_then(|t| self.type_map.get(t))
            .map_or(self.fallback_type.as_str(), String::as_str)
    }
}
