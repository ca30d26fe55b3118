//! Domain models for files and batches.

use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};

pub mod batch;
pub mod file;
pub mod status;

// Re-export commonly used types
pub use batch::{Batch, BatchUpdate, BatchWithFile, NewBatch};
pub use file::{File, FileSummary, FileUpdate, NewFile};
pub use status::Status;

/// Free-form key/value document stored as a JSON object.
pub type Document = serde_json::Map<String, JsonValue>;

/// Generate a time-ordered identifier for a new entity.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Unwrap a stored JSON value that must be an object.
pub(crate) fn document_from_json(value: JsonValue, context: &str) -> AppResult<Document> {
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(AppError::Database(format!(
            "{} is not a JSON object (found {})",
            context,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
