//! Field compiler: turns schema properties into language-agnostic field
//! declarations.
//!
//! Nothing here fails. An unknown `type` degrades to the fallback type and an
//! unsupported constraint value is dropped.

use heck::ToSnakeCase;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::schema::{PropertyDescriptor, Schema};
use crate::settings::{ConstraintKeyStyle, GenerateSettings};

/// How a constraint value must be written in the target language.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintValue {
    /// Quoted string literal.
    Quoted(Value),
    /// Raw string literal; backslashes are kept as written.
    RawString(Value),
    /// The value's natural literal, unquoted.
    Literal(Value),
}

/// One `key=value` argument of the generated `Field(...)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub key: String,
    pub value: ConstraintValue,
}

/// One compiled model field.
///
/// `annotated` is tracked separately from `constraints` because a required
/// field can be annotated yet end up with no renderable constraint once
/// composite values are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: String,
    pub required: bool,
    pub annotated: bool,
    pub constraints: Vec<Constraint>,
}

/// Compile every property of `schema`, in document order.
#[must_use]
pub fn compile_fields(schema: &Schema<'_>, settings: &GenerateSettings) -> Vec<FieldDecl> {
    schema
        .properties
        .iter()
        .map(|(name, descriptor)| {
            compile_field(name, *descriptor, schema.required.contains(name), settings)
        })
        .collect()
}

/// Compile one property.
#[must_use]
pub fn compile_field(
    name: &str,
    descriptor: PropertyDescriptor<'_>,
    required: bool,
    settings: &GenerateSettings,
) -> FieldDecl {
    let json_type: Option<&str> = descriptor.json_type();
    let type_name: String = settings.resolve_type(json_type).to_string();
    if let Some(t) = json_type
        && !settings.type_map.contains_key(t)
    {
        warn!(field = name, json_type = t, fallback = %type_name, "unknown type");
    }

    let annotated: bool = !descriptor.is_bare();
    let constraints: Vec<Constraint> = if annotated {
        descriptor
            .constraints()
            .filter(|(key, value)| {
                // Composite values are only dropped for required fields.
                let composite: bool = value.is_object() || value.is_array();
                if required && composite {
                    warn!(field = name, constraint = key, "dropping composite constraint value");
                }
                !(required && composite)
            })
            .map(|(key, value)| classify_constraint(key, value, required, settings))
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        field = name,
        type_name = %type_name,
        required,
        annotated,
        constraints = constraints.len(),
        "compiled field"
    );

    FieldDecl {
        name: name.to_string(),
        type_name,
        required,
        annotated,
        constraints,
    }
}

/// Quoted and raw-string keys are only honored on required fields; optional
/// fields write every value as its natural literal.
fn classify_constraint(
    key: &str,
    value: &Value,
    required: bool,
    settings: &GenerateSettings,
) -> Constraint {
    let emitted_key: String = match settings.constraint_key_style {
        ConstraintKeyStyle::Preserve => key.to_string(),
        ConstraintKeyStyle::SnakeCase => key.to_snake_case(),
    };
    let in_set =
        |set: &BTreeSet<String>| -> bool { set.contains(key) || set.contains(&emitted_key) };

    let value: ConstraintValue = if required && in_set(&settings.raw_string_keys) {
        ConstraintValue::RawString(value.clone())
    } else if required && in_set(&settings.quoted_keys) {
        ConstraintValue::Quoted(value.clone())
    } else {
        ConstraintValue::Literal(value.clone())
    };

    Constraint {
        key: emitted_key,
        value,
    }
}
