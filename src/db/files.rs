//! Database queries for files.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::entity::file::{self, ActiveModel, Entity as FileEntity};
use crate::error::{AppError, AppResult};
use crate::models::{File, FileUpdate, NewFile};

use super::batches::load_batches;
use super::{DbPool, commit, update_error};

impl DbPool {
    /// Insert a new file. The returned file has no batches yet.
    pub async fn create_file(&self, new: NewFile) -> AppResult<File> {
        let now = Utc::now();
        let txn = self.begin().await?;

        let model = ActiveModel {
            id: Set(new.id.clone()),
            name: Set(new.name.clone()),
            content: Set(new.content_json()),
            status: Set(new.status),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert file {}: {}", new.id, e)))?;

        commit(txn).await?;
        debug!(file_id = %inserted.id, status = %inserted.status, "Created file");

        File::from_entity(inserted, Vec::new())
    }

    /// Get a file by ID with its batches loaded.
    pub async fn get_file(&self, id: &str) -> AppResult<Option<File>> {
        let txn = self.begin().await?;

        let Some(model) = find_file(&txn, id).await? else {
            commit(txn).await?;
            return Ok(None);
        };

        let batches = load_batches(&txn, &model.id).await?;
        commit(txn).await?;

        File::from_entity(model, batches).map(Some)
    }

    /// Overwrite the fields set in `update`.
    ///
    /// An empty update writes nothing and returns the stored file.
    pub async fn update_file(&self, id: &str, update: FileUpdate) -> AppResult<File> {
        let txn = self.begin().await?;

        let existing = find_file(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {}", id)))?;

        let model = if update.is_empty() {
            existing
        } else {
            let mut active: ActiveModel = existing.into();
            if let Some(name) = update.name {
                active.name = Set(name);
            }
            if let Some(content) = update.content {
                active.content = Set(JsonValue::Object(content));
            }
            if let Some(status) = update.status {
                active.status = Set(status);
            }
            active.updated_at = Set(Utc::now());

            active
                .update(&txn)
                .await
                .map_err(|e| update_error("File", id, e))?
        };

        let batches = load_batches(&txn, &model.id).await?;
        commit(txn).await?;
        debug!(file_id = %id, "Updated file");

        File::from_entity(model, batches)
    }

    /// Delete a file. Its batches are removed by the foreign key cascade.
    ///
    /// Returns false if no file had this ID.
    pub async fn delete_file(&self, id: &str) -> AppResult<bool> {
        let txn = self.begin().await?;

        let result = FileEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete file {}: {}", id, e)))?;

        commit(txn).await?;
        debug!(file_id = %id, deleted = result.rows_affected, "Deleted file");

        Ok(result.rows_affected > 0)
    }
}

pub(crate) async fn find_file<C>(conn: &C, id: &str) -> AppResult<Option<file::Model>>
where
    C: sea_orm::ConnectionTrait,
{
    FileEntity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get file {}: {}", id, e)))
}
