//! E2E tests: file create/read/update/delete.

use filestore_lib::models::{FileUpdate, NewBatch, Status};

use super::test_helpers::*;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_create_then_get_file() {
    let pool = create_test_pool().await;
    let new = sample_file();

    let created = pool.create_file(new.clone()).await.unwrap();
    assert_eq!(created.id, new.id);
    assert!(created.batches.is_empty());

    let fetched = pool.get_file(&new.id).await.unwrap().expect("file should exist");
    assert_eq!(fetched.name, "invoice.pdf");
    assert_eq!(fetched.content, sample_content());
    assert_eq!(fetched.status, Status::InProgress);
    assert!(fetched.batches.is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_get_unknown_file_is_none() {
    let pool = create_test_pool().await;
    assert!(pool.get_file(&unique_id("ghost")).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_update_name_keeps_other_fields() {
    let pool = create_test_pool().await;
    let created = pool.create_file(sample_file()).await.unwrap();

    pool.update_file(&created.id, FileUpdate::new().with_name("renamed.pdf"))
        .await
        .unwrap();

    let fetched = pool.get_file(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "renamed.pdf");
    assert_eq!(fetched.content, created.content);
    assert_eq!(fetched.status, created.status);
    assert_eq!(fetched.created_at, created.created_at);
    assert!(fetched.updated_at >= created.updated_at);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_duplicate_file_id_is_rejected() {
    let pool = create_test_pool().await;
    let new = sample_file();

    pool.create_file(new.clone()).await.unwrap();
    assert!(pool.create_file(new).await.is_err());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_delete_file_cascades_to_batches() {
    let pool = create_test_pool().await;
    let file = pool.create_file(sample_file()).await.unwrap();

    let first = pool
        .create_batch(NewBatch::new(&file.id, Status::Completed))
        .await
        .unwrap();
    let second = pool
        .create_batch(NewBatch::new(&file.id, Status::Failed))
        .await
        .unwrap();

    assert!(pool.delete_file(&file.id).await.unwrap());

    assert!(pool.get_file(&file.id).await.unwrap().is_none());
    assert!(pool.get_batch(&first.id).await.unwrap().is_none());
    assert!(pool.get_batch(&second.id).await.unwrap().is_none());
    assert!(pool.list_batches(&file.id).await.unwrap().is_empty());

    assert!(!pool.delete_file(&file.id).await.unwrap());
}
