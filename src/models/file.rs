//! File domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{Batch, Document, Status, document_from_json, new_id};
use crate::entity::file;
use crate::error::AppResult;

/// A file together with its batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub name: String,
    pub content: Document,
    pub status: Status,
    pub batches: Vec<Batch>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Build from a SeaORM row and its already-loaded batches.
    pub fn from_entity(m: file::Model, batches: Vec<Batch>) -> AppResult<Self> {
        let summary = FileSummary::from_entity(m)?;
        Ok(Self {
            id: summary.id,
            name: summary.name,
            content: summary.content,
            status: summary.status,
            batches,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        })
    }
}

/// A file without its batches, used as the owner reference of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: String,
    pub name: String,
    pub content: Document,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileSummary {
    pub fn from_entity(m: file::Model) -> AppResult<Self> {
        let content = document_from_json(m.content, &format!("content of file {}", m.id))?;
        Ok(Self {
            id: m.id,
            name: m.name,
            content,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// Input for creating a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFile {
    pub id: String,
    pub name: String,
    pub content: Document,
    pub status: Status,
}

impl NewFile {
    /// New file with a generated identifier.
    pub fn new(name: impl Into<String>, content: Document, status: Status) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            content,
            status,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub(crate) fn content_json(&self) -> JsonValue {
        JsonValue::Object(self.content.clone())
    }
}

/// Mutable fields of a file. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl FileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_content(mut self, content: Document) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none() && self.status.is_none()
    }
}
