use std::error;
use std::fmt;

use crate::gate::SchemaRejection;

/// Error type for Pydantic model and REST generation operations.
#[derive(Debug)]
pub enum GenError {
    /// Invalid input outside the schema gate's reach (e.g., a blank REST `kind`).
    GenericError(String),

    /// I/O error (e.g., reading a schema file, writing a generated file).
    IoError(std::io::Error),

    /// JSON parsing error.
    JsonError(serde_json::Error),

    /// The schema gate rejected the document; no model text was produced.
    InvalidSchema(SchemaRejection),
}

impl error::Error for GenError {}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenericError(message) => write!(f, "{message}"),
            Self::IoError(io_error) => fmt::Display::fmt(io_error, f),
            Self::JsonError(json_error) => fmt::Display::fmt(json_error, f),
            Self::InvalidSchema(rejection) => write!(f, "Schema is invalid: {rejection}"),
        }
    }
}

impl From<&str> for GenError {
    fn from(message: &str) -> Self {
        Self::GenericError(message.to_string())
    }
}

impl From<std::io::Error> for GenError {
    fn from(io_error: std::io::Error) -> Self {
        Self::IoError(io_error)
    }
}

impl From<serde_json::Error> for GenError {
    fn from(json_error: serde_json::Error) -> Self {
        Self::JsonError(json_error)
    }
}

impl From<SchemaRejection> for GenError {
    fn from(rejection: SchemaRejection) -> Self {
        Self::InvalidSchema(rejection)
    }
}
