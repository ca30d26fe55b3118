//! Database queries for batches.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::entity::batch::{self, ActiveModel, Entity as BatchEntity};
use crate::entity::file::Entity as FileEntity;
use crate::error::{AppError, AppResult};
use crate::models::{Batch, BatchUpdate, BatchWithFile, FileSummary, NewBatch};

use super::files::find_file;
use super::{DbPool, commit, update_error};

impl DbPool {
    /// Insert a new batch owned by an existing file.
    pub async fn create_batch(&self, new: NewBatch) -> AppResult<Batch> {
        let now = Utc::now();
        let txn = self.begin().await?;

        if find_file(&txn, &new.file_id).await?.is_none() {
            return Err(AppError::NotFound(format!("File {}", new.file_id)));
        }

        let model = ActiveModel {
            id: Set(new.id.clone()),
            status: Set(new.status),
            results: Set(new.results_json()),
            file_id: Set(new.file_id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert batch {}: {}", new.id, e)))?;

        commit(txn).await?;
        debug!(batch_id = %inserted.id, file_id = %inserted.file_id, "Created batch");

        Batch::from_entity(inserted)
    }

    /// Get a batch by ID with its owning file loaded.
    pub async fn get_batch(&self, id: &str) -> AppResult<Option<BatchWithFile>> {
        let txn = self.begin().await?;

        let Some(model) = find_batch(&txn, id).await? else {
            commit(txn).await?;
            return Ok(None);
        };

        let file = model
            .find_related(FileEntity)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get file of batch {}: {}", id, e)))?
            .ok_or_else(|| {
                AppError::Database(format!(
                    "Batch {} references missing file {}",
                    id, model.file_id
                ))
            })?;

        commit(txn).await?;

        Ok(Some(BatchWithFile {
            batch: Batch::from_entity(model)?,
            file: FileSummary::from_entity(file)?,
        }))
    }

    /// Overwrite the fields set in `update`.
    ///
    /// An empty update writes nothing and returns the stored batch.
    pub async fn update_batch(&self, id: &str, update: BatchUpdate) -> AppResult<Batch> {
        let txn = self.begin().await?;

        let existing = find_batch(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Batch {}", id)))?;

        let model = if update.is_empty() {
            existing
        } else {
            let mut active: ActiveModel = existing.into();
            if let Some(status) = update.status {
                active.status = Set(status);
            }
            if let Some(results) = update.results {
                active.results = Set(results.map(JsonValue::Object));
            }
            active.updated_at = Set(Utc::now());

            active
                .update(&txn)
                .await
                .map_err(|e| update_error("Batch", id, e))?
        };

        commit(txn).await?;
        debug!(batch_id = %id, status = %model.status, "Updated batch");

        Batch::from_entity(model)
    }

    /// All batches of a file, ordered by ID.
    pub async fn list_batches(&self, file_id: &str) -> AppResult<Vec<Batch>> {
        let txn = self.begin().await?;
        let batches = load_batches(&txn, file_id).await?;
        commit(txn).await?;

        Ok(batches)
    }
}

async fn find_batch<C>(conn: &C, id: &str) -> AppResult<Option<batch::Model>>
where
    C: ConnectionTrait,
{
    BatchEntity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get batch {}: {}", id, e)))
}

pub(crate) async fn load_batches<C>(conn: &C, file_id: &str) -> AppResult<Vec<Batch>>
where
    C: ConnectionTrait,
{
    BatchEntity::find()
        .filter(batch::Column::FileId.eq(file_id))
        .order_by_asc(batch::Column::Id)
        .all(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get batches for file {}: {}", file_id, e)))?
        .into_iter()
        .map(Batch::from_entity)
        .collect()
}
