//! Batch domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{Document, FileSummary, Status, document_from_json, new_id};
use crate::entity::batch;
use crate::error::AppResult;

/// One processing unit belonging to a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,
    pub status: Status,
    pub results: Option<Document>,
    pub file_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Batch {
    pub fn from_entity(m: batch::Model) -> AppResult<Self> {
        let results = match m.results {
            Some(value) => Some(document_from_json(
                value,
                &format!("results of batch {}", m.id),
            )?),
            None => None,
        };

        Ok(Self {
            id: m.id,
            status: m.status,
            results,
            file_id: m.file_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// A batch with its owning file loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchWithFile {
    #[serde(flatten)]
    pub batch: Batch,
    pub file: FileSummary,
}

/// Input for creating a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBatch {
    pub id: String,
    pub file_id: String,
    pub status: Status,
    #[serde(default)]
    pub results: Option<Document>,
}

impl NewBatch {
    /// New batch for `file_id` with a generated identifier and no results.
    pub fn new(file_id: impl Into<String>, status: Status) -> Self {
        Self {
            id: new_id(),
            file_id: file_id.into(),
            status,
            results: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_results(mut self, results: Document) -> Self {
        self.results = Some(results);
        self
    }

    pub(crate) fn results_json(&self) -> Option<JsonValue> {
        self.results.clone().map(JsonValue::Object)
    }
}

/// Mutable fields of a batch.
///
/// `results: Some(None)` clears the stored results; `None` leaves them unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchUpdate {
    pub status: Option<Status>,
    pub results: Option<Option<Document>>,
}

impl BatchUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_results(mut self, results: Document) -> Self {
        self.results = Some(Some(results));
        self
    }

    pub fn clear_results(mut self) -> Self {
        self.results = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.results.is_none()
    }
}
