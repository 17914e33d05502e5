//! Model emitter: renders compiled field declarations as target-language text.

use serde_json::Value;

use crate::field::{Constraint, ConstraintValue, FieldDecl};

/// A target dialect for generated models.
pub trait ModelRenderer {
    /// Import boilerplate written before the model in a generated file.
    fn preamble(&self) -> &str;

    /// One field declaration, without indentation or trailing newline.
    fn render_field(&self, field: &FieldDecl) -> String;

    /// A complete model definition named `name`.
    ///
    /// The name is emitted as given; supplying a legal identifier is the
    /// caller's responsibility.
    fn render_model(&self, name: &str, fields: &[FieldDecl]) -> String;
}

/// Pydantic v2 `BaseModel` dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PydanticRenderer;

const INDENT: &str = "    ";

impl ModelRenderer for PydanticRenderer {
    fn preamble(&self) -> &str {
        "from pydantic import *\nfrom typing import *\n\n\n"
    }

    fn render_field(&self, field: &FieldDecl) -> String {
        let inner: String = if field.annotated {
            let mut args: String = String::new();
            for constraint in &field.constraints {
                args.push_str(&render_constraint(constraint));
                args.push(',');
            }
            format!("Annotated[{}, Field({args})]", field.type_name)
        } else {
            field.type_name.clone()
        };

        if field.required {
            format!("{}: {inner}", field.name)
        } else {
            format!("{}: Optional[{inner}] = None", field.name)
        }
    }

    fn render_model(&self, name: &str, fields: &[FieldDecl]) -> String {
        let mut out: String = format!("class {name}(BaseModel):\n");
        if fields.is_empty() {
            out.push_str(INDENT);
            out.push_str("pass\n");
        }
        for field in fields {
            out.push_str(INDENT);
            out.push_str(&self.render_field(field));
            out.push('\n');
        }
        out
    }
}

fn render_constraint(constraint: &Constraint) -> String {
    let value: String = match &constraint.value {
        ConstraintValue::Quoted(v) => {
            let escaped: String = text_of(v).replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        }
        ConstraintValue::RawString(v) => format!("r\"{}\"", text_of(v)),
        ConstraintValue::Literal(v) => text_of(v),
    };
    format!("{}={value}", constraint.key)
}

/// Text of a value as it appears unquoted: strings verbatim, everything else
/// as a Python literal.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => python_literal(other),
    }
}

fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            let escaped: String = s.replace('\\', "\\\\").replace('\'', "\\'");
            format!("'{escaped}'")
        }
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(key, v)| {
                    let key_literal: String = python_literal(&Value::String(key.clone()));
                    format!("{key_literal}: {}", python_literal(v))
                })
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}
