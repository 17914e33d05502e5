//! Generate Pydantic models and FastAPI CRUD endpoints from JSON Schema.
//!
//! The pipeline is: [`check_schema`] (schema gate) -> [`compile_fields`]
//! (field compiler) -> [`ModelRenderer::render_model`] (model emitter).
//! [`compile_model`] runs the last two steps and is pure; the `generate_*`
//! functions add the gate and the file or writer I/O around it.

mod emit;
mod error;
mod field;
mod gate;
mod rest;
mod schema;
mod settings;

pub use emit::{ModelRenderer, PydanticRenderer};
pub use error::GenError;
pub use field::{Constraint, ConstraintValue, FieldDecl, compile_field, compile_fields};
pub use gate::{
    Draft, MetaSchemaChecker, SchemaChecker, SchemaRejection, check_schema, check_schema_with,
};
pub use rest::{RestConfig, render_rest};
pub use schema::{PropertyDescriptor, Schema};
pub use settings::{
    ConstraintKeyStyle, DEFAULT_FALLBACK_TYPE, DEFAULT_MODEL_NAME, GenerateSettings,
};

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the generated model module inside the output directory.
pub const MODEL_FILE_NAME: &str = "generated_model.py";

/// File name of the generated REST module inside the output directory.
pub const REST_FILE_NAME: &str = "generated_rest.py";

/// Compile a parsed schema into a Pydantic model class.
///
/// The model is named `name` if given, else the schema's `name` key, else
/// `settings.default_model_name`. The schema gate is not run; call
/// [`check_schema`] first when the input is untrusted.
#[must_use]
pub fn compile_model(schema: &Value, name: Option<&str>, settings: &GenerateSettings) -> String {
    compile_model_with(&PydanticRenderer, schema, name, settings)
}

/// [`compile_model`] with a caller-supplied dialect.
#[must_use]
pub fn compile_model_with<R: ModelRenderer + ?Sized>(
    renderer: &R,
    schema: &Value,
    name: Option<&str>,
    settings: &GenerateSettings,
) -> String {
    let parsed: Schema<'_> = Schema::from_value(schema);
    let model_name: &str = name
        .or(parsed.name)
        .unwrap_or(settings.default_model_name.as_str());
    let fields: Vec<FieldDecl> = compile_fields(&parsed, settings);
    renderer.render_model(model_name, &fields)
}

/// Parse, gate and compile a JSON Schema string, writing the preamble and the
/// model to `writer`.
///
/// The writer can be any type implementing `Write`, such as `File`, `Vec<u8>`, or
/// `Cursor<Vec<u8>>`, enabling easy unit testing without file system interaction.
///
/// # Errors
///
/// Returns `GenError` if the schema JSON is invalid, the schema gate rejects
/// the document (nothing is written in that case), or writing fails.
pub fn generate_to_writer<W: Write>(
    schema_json: &str,
    name: Option<&str>,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), GenError> {
    let schema: Value = serde_json::from_str(schema_json)?;
    check_schema(&schema, settings)?;
    let model: String = compile_model(&schema, name, settings);
    writer.write_all(PydanticRenderer.preamble().as_bytes())?;
    writer.write_all(model.as_bytes())?;
    Ok(())
}

/// Generate `generated_model.py` in `out_dir` from a JSON Schema file.
///
/// # Errors
///
/// Returns `GenError` if reading the input file fails, the schema JSON is
/// invalid, the schema gate rejects it, or writing the output file fails.
pub fn generate_model_file(
    input_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    name: Option<&str>,
    settings: &GenerateSettings,
) -> Result<PathBuf, GenError> {
    let schema_json: String = std::fs::read_to_string(input_path)?;
    let mut rendered: Vec<u8> = Vec::new();
    generate_to_writer(&schema_json, name, &mut rendered, settings)?;

    let output_path: PathBuf = out_dir.as_ref().join(MODEL_FILE_NAME);
    std::fs::write(&output_path, rendered)?;
    info!(path = %output_path.display(), "wrote model");
    Ok(output_path)
}

/// Generate `generated_rest.py` in `out_dir` from a REST configuration file.
///
/// # Errors
///
/// Returns `GenError` if reading the input file fails, the configuration is
/// not valid JSON, `kind`/`name` is missing or blank, or writing the output file fails.
pub fn generate_rest_file(
    input_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> Result<PathBuf, GenError> {
    let config_json: String = std::fs::read_to_string(input_path)?;
    let config: RestConfig = serde_json::from_str(&config_json)?;
    config.check()?;

    let output_path: PathBuf = out_dir.as_ref().join(REST_FILE_NAME);
    std::fs::write(&output_path, render_rest(&config))?;
    info!(path = %output_path.display(), "wrote rest endpoints");
    Ok(output_path)
}
