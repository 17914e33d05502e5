//! REST emitter: FastAPI CRUD endpoints for a generated model.
//!
//! Depends only on the model's name and the REST configuration document, never
//! on compiled field declarations.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::GenError;

/// Keys with a fixed route of their own; never repeated as configuration routes.
const RESERVED_KEYS: &[&str] = &["state", "configuration"];

/// REST configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    /// Route prefix, e.g. `engine` for `/engine/`.
    pub kind: String,

    /// Name of the generated model class the endpoints operate on.
    pub name: String,

    /// Accepted in any JSON shape and ignored.
    #[serde(default)]
    pub version: Option<Value>,

    /// Accepted in any JSON shape and ignored.
    #[serde(default)]
    pub description: Option<Value>,

    /// Each key gets its own `PUT /{kind}/{uuid}/{key}` route; values are ignored.
    #[serde(default)]
    pub configuration: Map<String, Value>,
}

impl RestConfig {
    /// Refuse configurations that would render broken routes or imports.
    ///
    /// # Errors
    ///
    /// Returns `GenError::GenericError` if `kind` or `name` is blank.
    pub fn check(&self) -> Result<(), GenError> {
        if self.kind.trim().is_empty() {
            return Err("REST configuration `kind` must not be empty".into());
        }
        if self.name.trim().is_empty() {
            return Err("REST configuration `name` must not be empty".into());
        }
        Ok(())
    }
}

/// Render the FastAPI module for `config`.
#[must_use]
pub fn render_rest(config: &RestConfig) -> String {
    let kind: &str = &config.kind;
    let name: &str = &config.name;

    let mut out: String = format!(
        r#"from uuid import UUID
from db.create_table import App
from fastapi import FastAPI
from sqlalchemy.orm import declarative_base
from sqlalchemy import create_engine, insert, select, delete, update
from db.config import host, user, password, db_name, port
from generated_model import {name}

app = FastAPI()
Base = declarative_base()
engine = create_engine(f'postgresql://{{user}}:{{password}}@{{host}}:{{port}}/{{db_name}}', future=True)

@app.post("/{kind}/", response_model={name})
def save_item(item: {name}):
    with engine.connect() as conn:
        statement = insert(App).values(kind=item.kind, name=item.name, version=item.version,
                                          description=item.description, json_data=item.model_dump_json())
        conn.execute(statement)
        conn.commit()
    return item

@app.get("/{kind}/{{uuid}}/")
def get_item(uuid: UUID):
    with engine.connect() as conn:
        statement = select(App).where(App.uuid==uuid)
        res = conn.execute(statement).fetchall()
    return res

@app.get("/{kind}/{{uuid}}/state")
def get_item_state(uuid: UUID):
    with engine.connect() as conn:
        statement = select(App.state).where(App.uuid==uuid)
        res = conn.execute(statement).fetchall()
    return res

@app.delete("/{kind}/{{uuid}}/")
def delete_item(uuid: UUID):
    with engine.connect() as conn:
        statement = delete(App).where(App.uuid==uuid)
        res = conn.execute(statement)
        conn.commit()
    return res

@app.put("/{kind}/{{uuid}}/state", response_model=str)
def update_state(uuid: UUID, state: str):
    with engine.connect() as conn:
        statement = update(App).where(App.uuid==uuid).values(state=state)
        conn.execute(statement)
        conn.commit()
    return state
"#
    );

    out.push_str(&update_route(kind, "configuration"));
    let mut routes: usize = 0;
    for key in config.configuration.keys() {
        if RESERVED_KEYS.contains(&key.as_str()) {
            warn!(key = %key, "configuration key shadows a fixed route; skipping");
            continue;
        }
        out.push_str(&update_route(kind, key));
        routes += 1;
    }

    debug!(
        kind,
        model = name,
        routes,
        "rendered rest module"
    );
    out
}

/// `PUT /{kind}/{uuid}/{key}` storing a dict under column `key`.
fn update_route(kind: &str, key: &str) -> String {
    format!(
        r#"
@app.put("/{kind}/{{uuid}}/{key}", response_model=dict)
def update_{key}(uuid: UUID, {key}: dict):
    with engine.connect() as conn:
        statement = update(App).where(App.uuid==uuid).values({key}={key})
        conn.execute(statement)
        conn.commit()
    return {key}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> RestConfig {
        serde_json::from_str(json).expect("rest config should deserialize")
    }

    #[test]
    fn fixed_routes_use_kind_and_model_name() {
        let actual: String = render_rest(&config(r#"{ "kind": "engine", "name": "Example" }"#));

        assert!(actual.contains("from generated_model import Example\n"));
        assert!(actual.contains("@app.post(\"/engine/\", response_model=Example)\n"));
        assert!(actual.contains("def save_item(item: Example):\n"));
        assert!(actual.contains("@app.get(\"/engine/{uuid}/\")\n"));
        assert!(actual.contains("@app.get(\"/engine/{uuid}/state\")\n"));
        assert!(actual.contains("@app.delete(\"/engine/{uuid}/\")\n"));
        assert!(actual.contains("@app.put(\"/engine/{uuid}/state\", response_model=str)\n"));
        assert!(actual.contains(
            "engine = create_engine(f'postgresql://{user}:{password}@{host}:{port}/{db_name}', future=True)\n"
        ));
    }

    #[test]
    fn configuration_keys_get_routes_in_document_order() {
        let actual: String = render_rest(&config(
            r#"{
                "kind": "engine",
                "name": "Example",
                "version": "1.0.0",
                "description": "demo",
                "configuration": { "specification": {}, "settings": {} }
            }"#,
        ));

        let configuration: usize = actual
            .find("def update_configuration(uuid: UUID, configuration: dict):")
            .expect("configuration route");
        let specification: usize = actual
            .find("def update_specification(uuid: UUID, specification: dict):")
            .expect("specification route");
        let settings: usize = actual
            .find("def update_settings(uuid: UUID, settings: dict):")
            .expect("settings route");
        assert!(configuration < specification && specification < settings);
        assert!(actual.contains(".values(settings=settings)\n"));
        assert!(actual.ends_with("    return settings\n"));
    }

    #[test]
    fn reserved_configuration_keys_are_not_duplicated() {
        let actual: String = render_rest(&config(
            r#"{ "kind": "app", "name": "App", "configuration": { "configuration": 1, "state": 2 } }"#,
        ));
        assert_eq!(1, actual.matches("def update_configuration(").count());
        assert_eq!(1, actual.matches("def update_state(").count());
    }

    #[test]
    fn version_and_description_accept_any_shape() {
        let parsed: RestConfig = config(
            r#"{ "kind": "engine", "name": "Example", "version": 2, "description": ["a"] }"#,
        );
        assert_eq!(Some(serde_json::json!(2)), parsed.version);
        assert!(parsed.check().is_ok());
    }

    #[test]
    fn blank_kind_or_name_is_refused() {
        let blank_kind: GenError = config(r#"{ "kind": " ", "name": "Example" }"#)
            .check()
            .unwrap_err();
        assert_eq!(
            "REST configuration `kind` must not be empty",
            blank_kind.to_string()
        );

        let blank_name: GenError = config(r#"{ "kind": "engine", "name": "" }"#)
            .check()
            .unwrap_err();
        assert!(matches!(blank_name, GenError::GenericError(_)));
    }

    #[test]
    fn missing_required_keys_fail_to_deserialize() {
        let result: Result<RestConfig, serde_json::Error> =
            serde_json::from_str(r#"{ "kind": "engine" }"#);
        assert!(result.is_err());
    }
}
