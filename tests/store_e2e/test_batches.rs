//! E2E tests: batch ownership and updates.

use filestore_lib::db::DbPool;
use filestore_lib::models::{BatchUpdate, Document, NewBatch, Status};
use serde_json::json;

use super::test_helpers::*;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_batch_appears_in_file_collection() {
    let pool = create_test_pool().await;
    let file = pool.create_file(sample_file()).await.unwrap();

    let batch = pool
        .create_batch(NewBatch::new(&file.id, Status::InProgress))
        .await
        .unwrap();

    let fetched = pool.get_file(&file.id).await.unwrap().unwrap();
    assert_eq!(fetched.batches.len(), 1);
    assert_eq!(fetched.batches[0].id, batch.id);
    assert_eq!(fetched.batches[0].file_id, file.id);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_get_batch_includes_owner() {
    let pool = create_test_pool().await;
    let file = pool.create_file(sample_file()).await.unwrap();
    let batch = pool
        .create_batch(NewBatch::new(&file.id, Status::Completed))
        .await
        .unwrap();

    let found = pool.get_batch(&batch.id).await.unwrap().unwrap();
    assert_eq!(found.file.id, file.id);
    assert_eq!(found.file.name, file.name);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_batch_for_unknown_file_is_not_found() {
    let pool = create_test_pool().await;

    let err = pool
        .create_batch(NewBatch::new(unique_id("ghost"), Status::InProgress))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_update_and_clear_results() {
    let pool = create_test_pool().await;
    let file = pool.create_file(sample_file()).await.unwrap();
    let batch = pool
        .create_batch(NewBatch::new(&file.id, Status::InProgress))
        .await
        .unwrap();

    let mut results = Document::new();
    results.insert("rows".to_string(), json!(42));

    let updated = pool
        .update_batch(
            &batch.id,
            BatchUpdate::new()
                .with_status(Status::Completed)
                .with_results(results.clone()),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, Status::Completed);
    assert_eq!(updated.results, Some(results));

    let cleared = pool
        .update_batch(&batch.id, BatchUpdate::new().clear_results())
        .await
        .unwrap();
    assert_eq!(cleared.status, Status::Completed);
    assert!(cleared.results.is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_with_pool_closes_after_use() {
    let file_id = DbPool::with_pool(&test_config(), async |pool: &DbPool| {
        pool.create_all_tables().await?;
        let file = pool.create_file(sample_file()).await?;
        Ok(file.id)
    })
    .await
    .unwrap();

    let pool = create_test_pool().await;
    assert!(pool.get_file(&file_id).await.unwrap().is_some());
}
