use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::warn;

/// Root schema document, reduced to the keys the compiler reads.
///
/// Built leniently from a `serde_json::Value`: a key with an unexpected shape
/// is treated as absent rather than failing. Property order follows the
/// document (`serde_json` is built with `preserve_order`).
#[derive(Debug, Default)]
pub struct Schema<'a> {
    pub name: Option<&'a str>,
    pub required: BTreeSet<&'a str>,
    pub properties: Vec<(&'a str, PropertyDescriptor<'a>)>,
}

impl<'a> Schema<'a> {
    /// Read `name`, `required` and `properties` from a parsed document.
    ///
    /// A non-object root yields an empty schema.
    #[must_use]
    pub fn from_value(value: &'a Value) -> Self {
        let Some(root) = value.as_object() else {
            return Self::default();
        };

        let name: Option<&str> = match root.get("name") {
            None => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                warn!(name = %other, "ignoring non-string model name");
                None
            }
        };

        let required: BTreeSet<&str> = root
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let properties: Vec<(&str, PropertyDescriptor<'_>)> = root
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(key, descriptor)| (key.as_str(), PropertyDescriptor::new(descriptor)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name,
            required,
            properties,
        }
    }
}

/// Constraint mapping for one property.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor<'a> {
    entries: Option<&'a Map<String, Value>>,
}

impl<'a> PropertyDescriptor<'a> {
    /// Non-object descriptors (e.g. the boolean schema `true`) behave as `{}`.
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self {
            entries: value.as_object(),
        }
    }

    /// The `type` keyword when it is a single type name.
    #[must_use]
    pub fn json_type(self) -> Option<&'a str> {
        self.entries?.get("type")?.as_str()
    }

    /// A descriptor with exactly one key is bare; anything else is annotated.
    #[must_use]
    pub fn is_bare(self) -> bool {
        self.entries.map_or(0, Map::len) == 1
    }

    /// Every key except `type`, in document order.
    pub fn constraints(self) -> impl Iterator<Item = (&'a str, &'a Value)> + use<'a> {
        self.entries
            .into_iter()
            .flat_map(Map::iter)
            .filter(|(key, _)| key.as_str() != "type")
            .map(|(key, value)| (key.as_str(), value))
    }
}
