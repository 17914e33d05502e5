//! Schema gate: structural validation of a schema document before compilation.
//!
//! The document is checked against the meta-schema of a fixed JSON Schema
//! draft. A rejection is a value, not a panic; the caller decides whether to
//! abort.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::settings::GenerateSettings;

/// JSON Schema dialects the gate can validate against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Draft {
    Draft4,
    Draft6,
    #[default]
    Draft7,
    Draft201909,
    Draft202012,
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            Self::Draft4 => "draft-04",
            Self::Draft6 => "draft-06",
            Self::Draft7 => "draft-07",
            Self::Draft201909 => "2019-09",
            Self::Draft202012 => "2020-12",
        };
        f.write_str(name)
    }
}

/// Why a schema document was refused by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRejection {
    message: String,
}

impl SchemaRejection {
    /// Wrap a checker's explanation of why the document was refused.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable explanation from the underlying checker.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SchemaRejection {}

/// Validates the structural legality of a schema document for a dialect.
pub trait SchemaChecker {
    /// # Errors
    ///
    /// Returns `SchemaRejection` describing the first violation found.
    fn check(&self, schema: &Value, draft: Draft) -> Result<(), SchemaRejection>;
}

/// `SchemaChecker` backed by the `jsonschema` crate's bundled meta-schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaSchemaChecker;

impl SchemaChecker for MetaSchemaChecker {
    fn check(&self, schema: &Value, draft: Draft) -> Result<(), SchemaRejection> {
        let result = match draft {
            Draft::Draft4 => jsonschema::draft4::meta::validate(schema),
            Draft::Draft6 => jsonschema::draft6::meta::validate(schema),
            Draft::Draft7 => jsonschema::draft7::meta::validate(schema),
            Draft::Draft201909 => jsonschema::draft201909::meta::validate(schema),
            Draft::Draft202012 => jsonschema::draft202012::meta::validate(schema),
        };
        result.map_err(|e| SchemaRejection::new(e.to_string()))
    }
}

/// Run the gate with the default `MetaSchemaChecker`.
///
/// # Errors
///
/// Returns `SchemaRejection` if the document violates the configured draft's
/// meta-schema, or (with `deny_invalid_patterns`) if a `pattern` is not a
/// valid regular expression.
pub fn check_schema(schema: &Value, settings: &GenerateSettings) -> Result<(), SchemaRejection> {
    check_schema_with(&MetaSchemaChecker, schema, settings)
}

/// Run the gate with a caller-supplied checker.
///
/// # Errors
///
/// See [`check_schema`].
pub fn check_schema_with<C: SchemaChecker + ?Sized>(
    checker: &C,
    schema: &Value,
    settings: &GenerateSettings,
) -> Result<(), SchemaRejection> {
    if let Err(rejection) = checker.check(schema, settings.draft) {
        debug!(draft = %settings.draft, %rejection, "schema rejected by meta-schema");
        return Err(rejection);
    }
    if settings.deny_invalid_patterns {
        check_patterns(schema, "")?;
    }
    debug!(draft = %settings.draft, "schema accepted");
    Ok(())
}

/// Append an RFC 6901 segment (`~` -> `~0`, `/` -> `~1`).
fn pointer_child(parent: &str, segment: &str) -> String {
    let escaped: String = segment.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}

/// Compile every `pattern` reachable through `properties` and `items`.
fn check_patterns(schema: &Value, path: &str) -> Result<(), SchemaRejection> {
    let Some(obj) = schema.as_object() else {
        return Ok(());
    };

    if let Some(pattern) = obj.get("pattern").and_then(Value::as_str)
        && let Err(e) = regress::Regex::new(pattern)
    {
        let at: String = pointer_child(path, "pattern");
        return Err(SchemaRejection::new(format!(
            "{at}: {pattern:?} is not a valid regular expression: {e}"
        )));
    }

    if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
        let properties_path: String = pointer_child(path, "properties");
        for (name, descriptor) in properties {
            check_patterns(descriptor, &pointer_child(&properties_path, name))?;
        }
    }
    if let Some(items) = obj.get("items") {
        check_patterns(items, &pointer_child(path, "items"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct RejectAll;

    impl SchemaChecker for RejectAll {
        fn check(&self, _schema: &Value, draft: Draft) -> Result<(), SchemaRejection> {
            Err(SchemaRejection::new(format!("nothing is valid under {draft}")))
        }
    }

    #[test]
    fn valid_draft7_schema_passes() {
        let schema: Value = json!({
            "name": "Example",
            "type": "object",
            "required": ["kind"],
            "properties": {
                "kind": { "type": "string", "maxLength": 32 },
                "version": { "type": "string", "pattern": "^(0|[1-9]\\d*)$" }
            }
        });
        assert!(check_schema(&schema, &GenerateSettings::default()).is_ok());
    }

    #[test]
    fn empty_schema_passes() {
        assert!(check_schema(&json!({}), &GenerateSettings::default()).is_ok());
    }

    #[test]
    fn required_as_string_is_rejected() {
        let schema: Value = json!({
            "required": "kind",
            "properties": { "kind": { "type": "string" } }
        });
        let rejection: SchemaRejection =
            check_schema(&schema, &GenerateSettings::default()).unwrap_err();
        assert!(!rejection.message().is_empty());
    }

    #[test]
    fn properties_as_array_is_rejected() {
        let schema: Value = json!({ "properties": ["kind"] });
        assert!(check_schema(&schema, &GenerateSettings::default()).is_err());
    }

    #[test]
    fn unknown_type_name_is_rejected_by_meta_schema() {
        let schema: Value = json!({
            "properties": { "x": { "type": "frobnicate" } }
        });
        assert!(check_schema(&schema, &GenerateSettings::default()).is_err());
    }

    #[test]
    fn custom_checker_is_authoritative() {
        let actual: SchemaRejection =
            check_schema_with(&RejectAll, &json!({}), &GenerateSettings::default()).unwrap_err();
        assert_eq!("nothing is valid under draft-07", actual.message());
    }

    #[test]
    fn invalid_pattern_passes_unless_denied() {
        let schema: Value = json!({
            "properties": {
                "code": { "type": "string", "pattern": "([a-z]" }
            }
        });
        let lenient = GenerateSettings::default();
        assert!(check_schema(&schema, &lenient).is_ok());

        let strict = GenerateSettings {
            deny_invalid_patterns: true,
            ..GenerateSettings::default()
        };
        let rejection: SchemaRejection = check_schema(&schema, &strict).unwrap_err();
        assert!(
            rejection
                .message()
                .starts_with("/properties/code/pattern: \"([a-z]\" is not a valid")
        );
    }

    #[test]
    fn nested_item_patterns_are_checked() {
        let schema: Value = json!({
            "properties": {
                "tags": {
                    "type": "array",
                    "items": { "type": "string", "pattern": "(abc" }
                }
            }
        });
        let strict = GenerateSettings {
            deny_invalid_patterns: true,
            ..GenerateSettings::default()
        };
        let rejection: SchemaRejection = check_schema(&schema, &strict).unwrap_err();
        assert!(
            rejection
                .message()
                .starts_with("/properties/tags/items/pattern:")
        );
    }

    #[test]
    fn pointer_child_escapes_segments() {
        assert_eq!("/properties/a~1b", pointer_child("/properties", "a/b"));
        assert_eq!("/a~0b", pointer_child("", "a~b"));
    }
}
